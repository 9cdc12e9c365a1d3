//! Core types for the SVM classifier

pub mod error;
pub mod types;

pub use self::error::*;
pub use self::types::*;
