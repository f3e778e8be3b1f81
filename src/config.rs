use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

pub const DEFAULT_WIN_PCT: f64 = 0.5;
pub const DEFAULT_RANK: f64 = 2000.0;
pub const DEFAULT_ROLE_SEED: u64 = 42;
pub const DEFAULT_FORM_WINDOWS: &[usize] = &[5, 10];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub windows: Vec<usize>,
    pub default_win_pct: f64,
    pub default_rank: f64,
    pub role_seed: u64,
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            windows: DEFAULT_FORM_WINDOWS.to_vec(),
            default_win_pct: DEFAULT_WIN_PCT,
            default_rank: DEFAULT_RANK,
            role_seed: DEFAULT_ROLE_SEED,
            start_year: 2014,
            end_year: 2024,
        }
    }
}

impl FeatureConfig {
    /// Defaults overridden by `ATP_*` env vars; unparsable values are ignored.
    pub fn from_env() -> Self {
        let d = Self::default();
        let windows = std::env::var("ATP_FORM_WINDOWS")
            .ok()
            .map(|raw| parse_windows(&raw))
            .filter(|w| !w.is_empty())
            .unwrap_or(d.windows);
        Self {
            windows,
            default_win_pct: env_parse("ATP_DEFAULT_WIN_PCT")
                .filter(|p: &f64| (0.0..=1.0).contains(p))
                .unwrap_or(d.default_win_pct),
            default_rank: env_parse("ATP_DEFAULT_RANK").unwrap_or(d.default_rank),
            role_seed: env_parse("ATP_ROLE_SEED").unwrap_or(d.role_seed),
            start_year: env_parse("ATP_START_YEAR").unwrap_or(d.start_year),
            end_year: env_parse("ATP_END_YEAR").unwrap_or(d.end_year),
        }
    }

    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.windows.is_empty() {
            return Err(FeatureError::EmptyWindowSet);
        }
        if self.windows.contains(&0) {
            return Err(FeatureError::ZeroWindow);
        }
        Ok(())
    }

    pub fn max_window(&self) -> usize {
        self.windows.iter().copied().max().unwrap_or(0)
    }
}

/// Value of `--name=value` or `--name value`; blank values are ignored.
pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix)
            && !raw.trim().is_empty()
        {
            return Some(raw.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse::<T>().ok()
}

fn parse_windows(raw: &str) -> Vec<usize> {
    let mut out = raw
        .split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
        .collect::<Vec<_>>();
    out.sort_unstable();
    out.dedup();
    out
}
