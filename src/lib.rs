pub mod input;
pub mod lexicon;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod stats;
