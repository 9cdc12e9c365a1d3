//! Bundled iris dataset
//!
//! The classic 150-sample iris table: four measurements in centimeters per
//! sample and one of three integer class codes (0 setosa, 1 versicolor,
//! 2 virginica). The CSV ships inside the binary, so training needs no
//! external input.

use crate::core::{ClassSample, ClfError, Result, SparseVector};

/// Embedded CSV source of the dataset
const IRIS_CSV: &str = include_str!("../../data/iris.csv");

/// Number of features per sample
pub const N_FEATURES: usize = 4;

/// Column names of the feature matrix
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "sepal.length",
    "sepal.width",
    "petal.length",
    "petal.width",
];

/// In-memory iris dataset
#[derive(Debug, Clone)]
pub struct IrisDataset {
    samples: Vec<ClassSample>,
}

impl IrisDataset {
    /// Load the bundled dataset
    pub fn load() -> Result<Self> {
        Self::parse(IRIS_CSV)
    }

    /// Parse a dataset from CSV text
    ///
    /// Expects four numeric feature columns followed by an integer class
    /// column. A leading header row is skipped when its first field is not
    /// numeric.
    pub fn parse(content: &str) -> Result<Self> {
        let mut samples = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if line_no == 0 && fields[0].parse::<f64>().is_err() {
                continue; // header row
            }

            if fields.len() != N_FEATURES + 1 {
                return Err(ClfError::ParseError(format!(
                    "line {}: expected {} columns, got {}",
                    line_no + 1,
                    N_FEATURES + 1,
                    fields.len()
                )));
            }

            let mut values = [0.0; N_FEATURES];
            for (i, field) in fields[..N_FEATURES].iter().enumerate() {
                values[i] = field.parse::<f64>().map_err(|_| {
                    ClfError::ParseError(format!(
                        "line {}: invalid feature value '{field}'",
                        line_no + 1
                    ))
                })?;
            }

            let class = fields[N_FEATURES].parse::<u32>().map_err(|_| {
                ClfError::ParseError(format!(
                    "line {}: invalid class code '{}'",
                    line_no + 1,
                    fields[N_FEATURES]
                ))
            })?;

            samples.push(ClassSample::new(SparseVector::from_dense(&values), class));
        }

        if samples.is_empty() {
            return Err(ClfError::EmptyDataset);
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[ClassSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples carrying the given class code
    pub fn class_count(&self, class: u32) -> usize {
        self.samples.iter().filter(|s| s.class == class).count()
    }
}
