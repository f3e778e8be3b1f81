pub mod assembler;
pub mod config;
pub mod error;
pub mod feature_export;
pub mod head_to_head;
pub mod inference;
pub mod logging;
pub mod match_store;
pub mod preprocess;
pub mod raw_csv;
pub mod records;
pub mod rolling_form;
pub mod score;
pub mod snapshot;
pub mod surface_history;

pub use assembler::{Assembled, FeatureRow, FeatureTable, HistorySnapshot, assemble};
pub use config::FeatureConfig;
pub use error::FeatureError;
pub use records::{GameTally, MatchRecord, PlayerId, Role, Surface};
