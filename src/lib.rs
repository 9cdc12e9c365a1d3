//! Linear SVM iris classifier with an HTTP prediction API
//!
//! Trains a one-vs-one linear SVM on the bundled iris dataset, persists the
//! fitted model as a JSON artifact, and serves predictions from it over two
//! HTTP routes (`GET /settings`, `POST /predict`).

pub mod cache;
pub mod config;
pub mod core;
pub mod data;
pub mod kernel;
pub mod multiclass;
pub mod optimizer;
pub mod persistence;
pub mod server;
pub mod solver;

// Re-export main types for convenience
pub use crate::cache::KernelCache;
pub use crate::config::ServerConfig;
pub use crate::core::types::*;
pub use crate::data::IrisDataset;
pub use crate::kernel::{Kernel, LinearKernel};
pub use crate::multiclass::{ClassPrediction, OneVsOneSVM, PairwiseModel};
pub use crate::optimizer::{SVMOptimizer, TrainedSVM};
pub use crate::persistence::SerializableModel;
pub use crate::server::{app, serve, AppState};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
