//! Configuration schema types for `depthaa.toml`
//!
//! Defines the structure and validation rules for depthaa configuration.

use crate::antialias::FilterParams;
use crate::output::OutputFormat;
use crate::sampler::SamplerSettings;
use serde::{Deserialize, Serialize};

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Appended to the input stem when no output path is given
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Encoding of written depth maps
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_suffix() -> String {
    "_aa".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { suffix: default_suffix(), format: OutputFormat::default() }
    }
}

/// Execution settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Worker threads for the filter pass (0 = one per core)
    #[serde(default)]
    pub jobs: usize,
}

/// Complete depthaa.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DepthaaConfig {
    /// Filter tuning
    #[serde(default)]
    pub filter: FilterParams,
    /// Depth sampling
    #[serde(default)]
    pub sampling: SamplerSettings,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Execution settings
    #[serde(default)]
    pub run: RunConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "filter.max_steps")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "depthaa.toml: '{}' {}", self.field, self.message)
    }
}

impl DepthaaConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigValidationError { field: field.to_string(), message: message.to_string() });
        };

        let filter = &self.filter;

        if !filter.invalid_threshold.is_finite() || filter.invalid_threshold < 0.0 {
            push("filter.invalid_threshold", "must be a non-negative number");
        }

        if !filter.min_steps.is_finite() || filter.min_steps.min_element() <= 0.0 {
            push("filter.min_steps", "components must be positive");
        }

        if !filter.max_steps.is_finite() || filter.max_steps.cmplt(filter.min_steps).any() {
            push("filter.max_steps", "components must be at least filter.min_steps");
        }

        if !filter.ring_shift.is_finite() {
            push("filter.ring_shift", "must be a finite number");
        }

        if !filter.reduce_mul.is_finite() || filter.reduce_mul < 0.0 {
            push("filter.reduce_mul", "must be a non-negative number");
        }

        // reduce_min bounds the division in the edge estimator
        if !filter.reduce_min.is_finite() || filter.reduce_min <= 0.0 {
            push("filter.reduce_min", "must be a positive number");
        }

        if !filter.near_offset.is_finite() || filter.near_offset <= 0.0 {
            push("filter.near_offset", "must be a positive number");
        }

        if !filter.far_offset.is_finite() || filter.far_offset <= filter.near_offset {
            push("filter.far_offset", "must be greater than filter.near_offset");
        }

        if !self.sampling.border_depth.is_finite() {
            push("sampling.border_depth", "must be a finite number");
        }

        // An empty suffix would name the output after its input
        if self.output.suffix.is_empty() {
            push("output.suffix", "must not be empty");
        } else if self.output.suffix.contains(['/', '\\']) {
            push("output.suffix", "must not contain path separators");
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
