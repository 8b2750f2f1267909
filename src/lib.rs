//! Talent matcher library: résumé extraction, skill signals and candidate ranking

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{Result, TalentMatchError};
pub use processing::engine::MatchEngine;
pub use processing::records::{CandidateRecord, JobRequirement, MatchResult};
pub use service::MatchService;
