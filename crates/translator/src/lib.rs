use shared::{
    domain::ControlKind,
    protocol::{Progress, ProgressUpdate, Report},
};
use tracing::debug;

pub mod activation;
pub mod mapping;

pub use activation::{evaluate, Activation, Threshold, ThresholdError};
pub use mapping::{
    Action, AxisBinding, AxisDirection, ControlKey, ControlMap, MappingError, TactileBinding,
    UnmappedControlError,
};

/// What one report asks of the outside world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    /// In sample order, tactile first.
    pub actions: Vec<Action>,
    /// Exactly one entry per input sample.
    pub feedback: Vec<Progress>,
}

impl Translation {
    pub fn progress_update(&self) -> ProgressUpdate {
        ProgressUpdate {
            progress: self.feedback.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Translator {
    map: ControlMap,
    threshold: Threshold,
}

impl Translator {
    pub fn new(map: ControlMap, threshold: Threshold) -> Self {
        Self { map, threshold }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn map(&self) -> &ControlMap {
        &self.map
    }

    /// Translates a report with no memory of earlier ones.
    ///
    /// An unmapped activated control fails the whole report so nothing
    /// partial reaches the dispatcher or the stream.
    pub fn translate(&self, report: &Report) -> Result<Translation, UnmappedControlError> {
        let mut translation = Translation {
            actions: Vec::new(),
            feedback: Vec::with_capacity(report.sample_count()),
        };

        for sample in &report.tactile {
            let activation = evaluate(ControlKind::Tactile, sample.down_mean, self.threshold);
            if activation.activated {
                let action = self.map.resolve(&ControlKey::Tactile { code: sample.code })?;
                translation.actions.push(action.clone());
            }
            translation.feedback.push(Progress {
                target: ControlKind::Tactile,
                code: sample.code,
                progress: activation.progress,
            });
        }

        for sample in &report.joystick {
            let activation = evaluate(ControlKind::Joystick, sample.info_mean, self.threshold);
            if activation.activated {
                // Activation implies a non-zero mean, so a direction exists.
                if let Some(direction) = AxisDirection::of(sample.info_mean) {
                    let key = ControlKey::Joystick {
                        axis: sample.axis,
                        direction,
                    };
                    translation.actions.push(self.map.resolve(&key)?.clone());
                }
            }
            translation.feedback.push(Progress {
                target: ControlKind::Joystick,
                code: sample.axis,
                progress: activation.progress,
            });
        }

        debug!(
            samples = report.sample_count(),
            actions = translation.actions.len(),
            "translated report"
        );
        Ok(translation)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(ControlMap::tetris(), Threshold::default())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
