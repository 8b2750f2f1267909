//! Text processing and matching module

pub mod records;
pub mod text_processor;
pub mod similarity;
pub mod evidence;
pub mod signals;
pub mod policy;
pub mod query_matcher;
pub mod requirement_matcher;
pub mod engine;
