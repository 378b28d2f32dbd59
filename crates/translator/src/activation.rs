use shared::domain::ControlKind;
use thiserror::Error;

/// Upper bound on reported progress; a full bar is never shown.
pub const PROGRESS_CEILING: f64 = 0.999;
pub const DEFAULT_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("activation threshold must be within (0, 1], got {0}")]
pub struct ThresholdError(pub f64);

/// Fraction of the crowd (or mean deflection) a control must exceed to fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ThresholdError(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    pub activated: bool,
    pub progress: f64,
}

impl Activation {
    const IDLE: Activation = Activation {
        activated: false,
        progress: 0.0,
    };
}

/// Decides whether one aggregate sample fires its control.
///
/// Joystick means are judged by magnitude, so both deflection directions
/// share the threshold. NaN never activates.
pub fn evaluate(kind: ControlKind, mean: f64, threshold: Threshold) -> Activation {
    let magnitude = match kind {
        ControlKind::Tactile => mean,
        ControlKind::Joystick => mean.abs(),
    };
    if magnitude > threshold.0 {
        Activation {
            activated: true,
            progress: PROGRESS_CEILING.min(magnitude / threshold.0),
        }
    } else {
        Activation::IDLE
    }
}

#[cfg(test)]
#[path = "tests/activation_tests.rs"]
mod tests;
