//! Binary SVM solver
//!
//! Sequential Minimal Optimization per Platt, "Fast Training of Support
//! Vector Machines using Sequential Minimal Optimization".

pub mod smo;

pub use self::smo::*;
