use serde::{Deserialize, Serialize};

use crate::{DEFAULT_BUFFER_RADIUS_M, DEFAULT_MERGE_TOLERANCE, DEFAULT_PENALTY_SCALE, Error};

/// Build-time configuration of the graph compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum coordinate distance (degrees) at which two segment
    /// endpoints collapse into one node.
    pub merge_tolerance: f64,
    /// Radius in meters of the disc buffered around each sample.
    pub buffer_radius_m: f64,
    /// Distance-equivalent cost of a fully uncovered segment.
    pub penalty_scale: f64,
    /// Honor `oneway` segment attributes by omitting the reverse edge.
    pub directed: bool,
    /// Samples scoring below this value are ignored during attribution.
    pub min_score: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
            buffer_radius_m: DEFAULT_BUFFER_RADIUS_M,
            penalty_scale: DEFAULT_PENALTY_SCALE,
            directed: false,
            min_score: 0.0,
        }
    }
}

impl GraphConfig {
    /// Rejects contradictory configuration before any build work starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for negative or non-finite
    /// tolerances, radii or penalties.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("merge_tolerance", self.merge_tolerance),
            ("buffer_radius_m", self.buffer_radius_m),
            ("penalty_scale", self.penalty_scale),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }
        if !self.min_score.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "min_score must be finite, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GraphConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_values_fail_fast() {
        let config = GraphConfig {
            penalty_scale: -1.0,
            ..GraphConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = GraphConfig {
            buffer_radius_m: f64::NAN,
            ..GraphConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
