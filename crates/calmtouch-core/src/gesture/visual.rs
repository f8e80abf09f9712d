//! Render-ready visual state: the halo under the finger and the fading trail.
//!
//! The engine never draws; it publishes positions, opacities, scales and
//! colors for whatever renders the screen.

use serde::Serialize;

use super::touch::TouchPoint;
use super::trail::{Trail, TrailConfig};
use crate::intensity::IntensityTier;

pub const HALO_COLOR: &str = "rgba(255, 255, 255, 0.9)";

/// Trail tint per tier, from the screen's background gradient.
pub fn tier_color(tier: IntensityTier) -> &'static str {
    match tier {
        IntensityTier::Silent => "#F5F5F5",
        IntensityTier::VeryLight => "#C2D9CB",
        IntensityTier::Light => "#8FBAA3",
        IntensityTier::Medium => "#5D8390",
        IntensityTier::Heavy => "#2A4B7C",
    }
}

/// Scale the halo reaches at the top of a pulse.
pub fn halo_peak_scale(tier: IntensityTier) -> f64 {
    match tier {
        IntensityTier::Silent => 1.0,
        IntensityTier::VeryLight => 1.1,
        IntensityTier::Light => 1.2,
        IntensityTier::Medium => 1.3,
        IntensityTier::Heavy => 1.4,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Halo {
    pub x: f64,
    pub y: f64,
    pub tier: IntensityTier,
    pub peak_scale: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailSprite {
    pub x: f64,
    pub y: f64,
    /// 1.0 when fresh, 0.0 at `max_age_ms`.
    pub opacity: f64,
    pub scale: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VisualState {
    pub halo: Option<Halo>,
    pub trail: Vec<TrailSprite>,
}

impl VisualState {
    pub(crate) fn build(touch: Option<(TouchPoint, IntensityTier)>, trail: &Trail, config: &TrailConfig, now_ms: u64) -> Self {
        let halo = touch.map(|(point, tier)| Halo {
            x: point.x,
            y: point.y,
            tier,
            peak_scale: halo_peak_scale(tier),
            color: HALO_COLOR,
        });
        let max_age = config.max_age_ms as f64;
        let trail = trail
            .iter()
            .filter(|p| p.age_ms(now_ms) <= config.max_age_ms)
            .map(|p| {
                let freshness = 1.0 - p.age_ms(now_ms) as f64 / max_age;
                TrailSprite {
                    x: p.x,
                    y: p.y,
                    opacity: freshness,
                    scale: 0.5 + 0.5 * freshness,
                    color: tier_color(p.tier),
                }
            })
            .collect();
        Self { halo, trail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::trail::TrailPoint;
    use crate::position::NormalizedPosition;

    #[test]
    fn sprites_fade_with_age() {
        let cfg = TrailConfig::default();
        let mut trail = Trail::new();
        for (i, at_ms) in [0u64, 500, 1000].into_iter().enumerate() {
            trail.push(
                TrailPoint {
                    x: i as f64,
                    y: 0.0,
                    position: NormalizedPosition::TOP,
                    tier: IntensityTier::Heavy,
                    at_ms,
                },
                &cfg,
            );
        }
        let state = VisualState::build(None, &trail, &cfg, 1000);
        let opacities: Vec<f64> = state.trail.iter().map(|s| s.opacity).collect();
        assert_eq!(opacities, vec![0.0, 0.5, 1.0]);
        assert_eq!(state.trail[2].scale, 1.0);
        assert_eq!(state.trail[0].color, "#2A4B7C");
        assert!(state.halo.is_none());
    }

    #[test]
    fn halo_follows_touch_and_tier() {
        let state = VisualState::build(
            Some((TouchPoint { x: 10.0, y: 20.0 }, IntensityTier::Medium)),
            &Trail::new(),
            &TrailConfig::default(),
            0,
        );
        let halo = state.halo.unwrap();
        assert_eq!((halo.x, halo.y), (10.0, 20.0));
        assert_eq!(halo.peak_scale, 1.3);
    }
}
