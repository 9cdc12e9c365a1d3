//! Bundled training data

pub mod iris;

pub use self::iris::*;
