use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::assembler::HistorySnapshot;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    snapshot: HistorySnapshot,
}

pub fn save_snapshot(path: &Path, snapshot: &HistorySnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        snapshot: snapshot.clone(),
    };
    let json = serde_json::to_string(&file).context("serialize history snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write history snapshot")?;
    fs::rename(&tmp, path).context("swap history snapshot")?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<HistorySnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read history snapshot {}", path.display()))?;
    let file = serde_json::from_str::<SnapshotFile>(&raw).context("invalid history snapshot json")?;
    if file.version != SNAPSHOT_VERSION {
        return Err(anyhow!(
            "snapshot version {} not supported (want {SNAPSHOT_VERSION})",
            file.version
        ));
    }
    Ok(file.snapshot)
}
