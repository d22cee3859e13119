pub mod auxiliary;
pub mod defs;
pub mod matching;

pub use defs::{ConcernDef, WeightedPattern, concern_def, concern_registry};

#[cfg(test)]
#[path = "../../tests/src_inline/lexicon/tests.rs"]
mod tests;
