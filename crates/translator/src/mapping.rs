use std::{
    collections::{hash_map::Entry, HashMap},
    fmt,
};

use serde::{Deserialize, Serialize};
use shared::domain::ControlKind;
use thiserror::Error;

/// Symbolic key name handed to the action dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    Positive,
    Negative,
}

impl AxisDirection {
    /// Direction of a joystick mean. Zero and NaN have none.
    pub fn of(mean: f64) -> Option<Self> {
        if mean > 0.0 {
            Some(AxisDirection::Positive)
        } else if mean < 0.0 {
            Some(AxisDirection::Negative)
        } else {
            None
        }
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisDirection::Positive => f.write_str("+"),
            AxisDirection::Negative => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Tactile { code: u32 },
    Joystick { axis: u32, direction: AxisDirection },
}

impl ControlKey {
    pub fn kind(&self) -> ControlKind {
        match self {
            ControlKey::Tactile { .. } => ControlKind::Tactile,
            ControlKey::Joystick { .. } => ControlKind::Joystick,
        }
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlKey::Tactile { code } => write!(f, "tactile {code}"),
            ControlKey::Joystick { axis, direction } => write!(f, "joystick axis {axis} ({direction})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no action mapped for {key}")]
pub struct UnmappedControlError {
    pub key: ControlKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("{0} is bound more than once")]
    DuplicateBinding(ControlKey),
    #[error("empty action name for {0}")]
    EmptyAction(ControlKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TactileBinding {
    pub code: u32,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub axis: u32,
    pub positive: String,
    pub negative: String,
}

/// Read-only lookup from a control to the action it triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlMap {
    entries: HashMap<ControlKey, Action>,
}

impl ControlMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tetris layout: arrows move and drop, `z`/`Up` rotate, `c` swaps hold.
    pub fn tetris() -> Self {
        Self::new()
            .with_tactile(65, "Left")
            .with_tactile(68, "Right")
            .with_tactile(81, "z")
            .with_tactile(69, "Up")
            .with_tactile(67, "c")
            .with_tactile(83, "Down")
            .with_axis(0, "Right", "Left")
            .with_axis(1, "Down", "c")
    }

    pub fn with_tactile(mut self, code: u32, action: impl Into<String>) -> Self {
        self.entries
            .insert(ControlKey::Tactile { code }, Action::new(action));
        self
    }

    pub fn with_axis(
        mut self,
        axis: u32,
        positive: impl Into<String>,
        negative: impl Into<String>,
    ) -> Self {
        self.entries.insert(
            ControlKey::Joystick {
                axis,
                direction: AxisDirection::Positive,
            },
            Action::new(positive),
        );
        self.entries.insert(
            ControlKey::Joystick {
                axis,
                direction: AxisDirection::Negative,
            },
            Action::new(negative),
        );
        self
    }

    pub fn from_bindings(
        tactile: &[TactileBinding],
        joystick: &[AxisBinding],
    ) -> Result<Self, MappingError> {
        let mut map = Self::new();
        for binding in tactile {
            map.insert(ControlKey::Tactile { code: binding.code }, &binding.action)?;
        }
        for binding in joystick {
            map.insert(
                ControlKey::Joystick {
                    axis: binding.axis,
                    direction: AxisDirection::Positive,
                },
                &binding.positive,
            )?;
            map.insert(
                ControlKey::Joystick {
                    axis: binding.axis,
                    direction: AxisDirection::Negative,
                },
                &binding.negative,
            )?;
        }
        Ok(map)
    }

    fn insert(&mut self, key: ControlKey, action: &str) -> Result<(), MappingError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(MappingError::EmptyAction(key));
        }
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(MappingError::DuplicateBinding(key)),
            Entry::Vacant(slot) => {
                slot.insert(Action::new(action));
                Ok(())
            }
        }
    }

    pub fn resolve(&self, key: &ControlKey) -> Result<&Action, UnmappedControlError> {
        self.entries
            .get(key)
            .ok_or(UnmappedControlError { key: *key })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/mapping_tests.rs"]
mod tests;
