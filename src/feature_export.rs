use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::assembler::FeatureTable;

const SHEET_NAME: &str = "features";

fn header(table: &FeatureTable) -> Vec<String> {
    let mut out = [
        "match_index",
        "date",
        "surface",
        "tourney_level",
        "player1",
        "player2",
        "target",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect::<Vec<_>>();
    out.extend(table.model_columns());
    out
}

/// One sheet: identifying columns, the target, then the model features.
pub fn export_feature_table(path: &Path, table: &FeatureTable) -> Result<()> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        write_table(sheet, table)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_table(sheet: &mut Worksheet, table: &FeatureTable) -> Result<()> {
    for (col, name) in header(table).iter().enumerate() {
        sheet
            .write_string(0, col as u16, name)
            .context("write header")?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        sheet.write_number(r, 0, row.match_index as f64)?;
        sheet.write_string(r, 1, row.date.format("%Y-%m-%d").to_string())?;
        sheet.write_string(r, 2, row.surface.label())?;
        sheet.write_string(r, 3, row.tourney_level.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 4, row.player1.as_str())?;
        sheet.write_string(r, 5, row.player2.as_str())?;
        sheet.write_number(r, 6, row.target as f64)?;
        for (offset, value) in row.model_vector().into_iter().enumerate() {
            sheet.write_number(r, (7 + offset) as u16, value)?;
        }
    }
    Ok(())
}

pub fn export_feature_json(path: &Path, table: &FeatureTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let json = serde_json::to_string(table).context("serialize feature table")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
