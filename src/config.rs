use std::error::Error;
use std::fmt;

/// Shared tolerance for float zero tests. Explicit epsilon comparisons
/// everywhere; never `== 0.` on a computed float.
pub const EPSILON: f64 = 1e-9;

/// Table geometry, centered around (0, 0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    pub half_width: f64,
    pub half_height: f64,
    pub ball_radius: f64,
}

impl Default for TableConfig {
    /// A 9 x 21 ball-radii half-extent table with radius-3 balls.
    fn default() -> TableConfig {
        let ball_radius = 3.0;
        TableConfig {
            half_width: 9.0 * ball_radius,
            half_height: 21.0 * ball_radius,
            ball_radius,
        }
    }
}

impl TableConfig {
    pub fn validate(self) -> Result<TableConfig, ConfigError> {
        let finite = self.half_width.is_finite()
            && self.half_height.is_finite()
            && self.ball_radius.is_finite();
        if !finite || self.half_width <= 0. || self.half_height <= 0. {
            return Err(ConfigError::NonPositiveExtent);
        }
        if self.ball_radius <= 0. {
            return Err(ConfigError::NonPositiveRadius);
        }
        if self.ball_radius >= self.half_width.min(self.half_height) {
            return Err(ConfigError::RadiusExceedsTable);
        }
        Ok(self)
    }
}

/// Empirical tuning constants. The defaults come from hand-validation on a
/// sixteen-ball break; none of the magnitudes are load-bearing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuningConfig {
    /// Each tick, every moving ball's speed is multiplied by this.
    pub friction_fraction: f64,
    /// At or below this speed, friction stops the ball outright.
    pub stop_threshold: f64,
    /// Fraction of the relative normal velocity exchanged by colliding
    /// balls. Lowering it below 1 bleeds kinetic energy while still
    /// conserving momentum.
    pub restitution: f64,
    /// Small negative time threshold letting near-simultaneous collisions
    /// register despite floating point error.
    pub rewind_margin: f64,
    /// Safety cap on resolve-loop passes within one tick.
    pub max_iterations: u32,
}

impl Default for TuningConfig {
    fn default() -> TuningConfig {
        TuningConfig {
            friction_fraction: 0.99,
            stop_threshold: 0.01,
            restitution: 0.99,
            rewind_margin: -1e-6,
            max_iterations: 50,
        }
    }
}

impl TuningConfig {
    pub fn validate(self) -> Result<TuningConfig, ConfigError> {
        if !self.friction_fraction.is_finite()
            || self.friction_fraction <= 0.
            || self.friction_fraction >= 1.
        {
            return Err(ConfigError::FrictionOutOfRange);
        }
        if !self.stop_threshold.is_finite() || self.stop_threshold < 0. {
            return Err(ConfigError::FrictionOutOfRange);
        }
        if !self.restitution.is_finite() || self.restitution <= 0. || self.restitution > 1. {
            return Err(ConfigError::RestitutionOutOfRange);
        }
        if !self.rewind_margin.is_finite() || self.rewind_margin > 0. {
            return Err(ConfigError::PositiveRewindMargin);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCap);
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveExtent,
    NonPositiveRadius,
    RadiusExceedsTable,
    FrictionOutOfRange,
    RestitutionOutOfRange,
    PositiveRewindMargin,
    ZeroIterationCap,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::NonPositiveExtent => "table extents must be finite and positive",
            ConfigError::NonPositiveRadius => "ball radius must be finite and positive",
            ConfigError::RadiusExceedsTable => "ball radius does not fit inside the table",
            ConfigError::FrictionOutOfRange => {
                "friction fraction must lie in (0, 1) with a non-negative stop threshold"
            }
            ConfigError::RestitutionOutOfRange => "restitution must lie in (0, 1]",
            ConfigError::PositiveRewindMargin => "rewind margin must be zero or negative",
            ConfigError::ZeroIterationCap => "resolve loop needs at least one iteration",
        };
        write!(f, "{}", msg)
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TableConfig::default().validate().is_ok());
        assert!(TuningConfig::default().validate().is_ok());
    }

    #[test]
    fn oversized_ball_is_rejected() {
        let table = TableConfig {
            half_width: 2.,
            half_height: 10.,
            ball_radius: 2.,
        };
        assert_eq!(table.validate(), Err(ConfigError::RadiusExceedsTable));
    }

    #[test]
    fn bad_tuning_is_rejected() {
        let mut tuning = TuningConfig::default();
        tuning.restitution = 1.5;
        assert_eq!(tuning.validate(), Err(ConfigError::RestitutionOutOfRange));

        let mut tuning = TuningConfig::default();
        tuning.rewind_margin = 1e-6;
        assert_eq!(tuning.validate(), Err(ConfigError::PositiveRewindMargin));

        let mut tuning = TuningConfig::default();
        tuning.max_iterations = 0;
        assert_eq!(tuning.validate(), Err(ConfigError::ZeroIterationCap));
    }
}
