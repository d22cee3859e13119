pub mod argument;
pub mod concern;
pub mod flags;
pub mod quality;
pub mod response;
pub mod snapshot;
pub mod stats;
pub mod text_signals;
pub mod thresholds;
