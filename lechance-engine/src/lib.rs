pub mod candidates;
pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod ranker;
pub mod report;
pub mod rng;
pub mod scorer;
pub mod stationary;
pub mod transition;

pub use config::{CandidateMode, RngKind, ScoreConfig};
pub use error::ScoreError;
pub use history::HistorySeries;
pub use pipeline::{run, run_with, ScoreOutcome};
pub use scorer::ScoredGrid;
