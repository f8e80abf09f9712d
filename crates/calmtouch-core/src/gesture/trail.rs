//! Decaying trail of recent touch points.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::intensity::IntensityTier;
use crate::position::NormalizedPosition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    /// Points older than this are dropped.
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    /// How long the trail lingers after the finger lifts.
    #[serde(default = "default_clear_grace_ms")]
    pub clear_grace_ms: u64,
}

fn default_max_age_ms() -> u64 {
    1000
}
fn default_max_points() -> usize {
    15
}
fn default_clear_grace_ms() -> u64 {
    500
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_age_ms: default_max_age_ms(),
            max_points: default_max_points(),
            clear_grace_ms: default_clear_grace_ms(),
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_age_ms == 0 {
            return Err(ConfigError::invalid("engine.trail.max_age_ms", "must be positive"));
        }
        if self.max_points == 0 {
            return Err(ConfigError::invalid("engine.trail.max_points", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub position: NormalizedPosition,
    pub tier: IntensityTier,
    pub at_ms: u64,
}

impl TrailPoint {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.at_ms)
    }
}

/// Oldest point first, newest last.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `point` and prunes relative to its timestamp.
    pub fn push(&mut self, point: TrailPoint, config: &TrailConfig) {
        let now_ms = point.at_ms;
        self.points.push_back(point);
        self.prune(now_ms, config);
    }

    pub fn prune(&mut self, now_ms: u64, config: &TrailConfig) {
        while self
            .points
            .front()
            .is_some_and(|p| p.age_ms(now_ms) > config.max_age_ms)
        {
            self.points.pop_front();
        }
        while self.points.len() > config.max_points {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&TrailPoint> {
        self.points.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: u64, at_ms: u64) -> TrailPoint {
        TrailPoint {
            x: i as f64,
            y: 0.0,
            position: NormalizedPosition::TOP,
            tier: IntensityTier::Heavy,
            at_ms,
        }
    }

    #[test]
    fn keeps_fifteen_most_recent() {
        let cfg = TrailConfig::default();
        let mut trail = Trail::new();
        for i in 0..20 {
            trail.push(point(i, i * 40), &cfg);
        }
        assert_eq!(trail.len(), 15);
        let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs.first(), Some(&5.0));
        assert_eq!(trail.latest().map(|p| p.x), Some(19.0));
    }

    #[test]
    fn drops_points_older_than_max_age() {
        let cfg = TrailConfig::default();
        let mut trail = Trail::new();
        trail.push(point(0, 0), &cfg);
        trail.push(point(1, 500), &cfg);
        trail.push(point(2, 1000), &cfg);
        assert_eq!(trail.len(), 3, "exactly max_age old is kept");
        trail.push(point(3, 1001), &cfg);
        assert_eq!(trail.iter().map(|p| p.x).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn prune_without_push_ages_out() {
        let cfg = TrailConfig::default();
        let mut trail = Trail::new();
        trail.push(point(0, 0), &cfg);
        trail.prune(2_000, &cfg);
        assert!(trail.is_empty());
    }

    #[test]
    fn config_rejects_zero_limits() {
        let cfg = TrailConfig {
            max_points: 0,
            ..TrailConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
