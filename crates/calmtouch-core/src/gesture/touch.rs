use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::position::NormalizedPosition;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f64,
    pub height: f64,
}

impl Screen {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite() {
            Ok(())
        } else {
            Err(ValidationError::InvalidScreen {
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn position_of(&self, y: f64) -> NormalizedPosition {
        NormalizedPosition::from_touch(y, self.height)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}

/// Raw touch coordinates in screen points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One event from the touch source. End and cancel ignore the coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub at_ms: u64,
}

impl TouchEvent {
    pub fn start(x: f64, y: f64, at_ms: u64) -> Self {
        Self { phase: TouchPhase::Start, x, y, at_ms }
    }

    pub fn moved(x: f64, y: f64, at_ms: u64) -> Self {
        Self { phase: TouchPhase::Move, x, y, at_ms }
    }

    pub fn end(at_ms: u64) -> Self {
        Self { phase: TouchPhase::End, x: 0.0, y: 0.0, at_ms }
    }

    pub fn cancel(at_ms: u64) -> Self {
        Self { phase: TouchPhase::Cancel, x: 0.0, y: 0.0, at_ms }
    }
}

/// A recorded gesture: screen size plus time-ordered touch events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchScript {
    #[serde(default)]
    pub screen: Screen,
    pub events: Vec<TouchEvent>,
}

impl TouchScript {
    /// Timestamps must not go backwards and phases must follow
    /// `start (move)* (end | cancel)`, repeated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.screen.validate()?;
        let mut last_at = 0;
        let mut held = false;
        for (index, event) in self.events.iter().enumerate() {
            if event.at_ms < last_at {
                return Err(ValidationError::OutOfOrder { index, at_ms: event.at_ms });
            }
            last_at = event.at_ms;
            let ok = match event.phase {
                TouchPhase::Start => !held,
                TouchPhase::Move | TouchPhase::End | TouchPhase::Cancel => held,
            };
            if !ok {
                return Err(ValidationError::UnexpectedPhase { index, phase: event.phase });
            }
            held = event.phase == TouchPhase::Start || event.phase == TouchPhase::Move;
        }
        Ok(())
    }

    /// Reads and validates a JSON script file.
    ///
    /// # Errors
    ///
    /// `CoreError::Io` if the file cannot be read, `CoreError::Json` if it is
    /// not a script, `CoreError::Validation` if the events are malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let script: TouchScript = serde_json::from_str(&content)?;
        script.validate()?;
        Ok(script)
    }

    pub fn last_at_ms(&self) -> u64 {
        self.events.last().map(|e| e.at_ms).unwrap_or(0)
    }
}
