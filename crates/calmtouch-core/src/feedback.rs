//! Haptic feedback capability.
//!
//! The engine never talks to a platform API directly. Hosts hand a
//! [`FeedbackSink`] to every call that may fire a pulse; a failing sink only
//! degrades the session to visual feedback.

use crate::error::FeedbackError;
use crate::intensity::IntensityTier;

/// Fire-and-forget haptic pulse.
///
/// Implementations must not block: the pulse loop may call `pulse` as often
/// as the cadence floor allows.
pub trait FeedbackSink {
    fn pulse(&mut self, tier: IntensityTier) -> Result<(), FeedbackError>;
}

impl<S: FeedbackSink + ?Sized> FeedbackSink for &mut S {
    fn pulse(&mut self, tier: IntensityTier) -> Result<(), FeedbackError> {
        (**self).pulse(tier)
    }
}

impl<S: FeedbackSink + ?Sized> FeedbackSink for Box<S> {
    fn pulse(&mut self, tier: IntensityTier) -> Result<(), FeedbackError> {
        (**self).pulse(tier)
    }
}

/// Discards every pulse.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FeedbackSink for NullSink {
    fn pulse(&mut self, _tier: IntensityTier) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Keeps every delivered tier in order. Useful for hosts that batch pulses
/// and for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pulses: Vec<IntensityTier>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulses(&self) -> &[IntensityTier] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

impl FeedbackSink for RecordingSink {
    fn pulse(&mut self, tier: IntensityTier) -> Result<(), FeedbackError> {
        self.pulses.push(tier);
        Ok(())
    }
}

/// Logs each pulse through `tracing` instead of vibrating.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FeedbackSink for TracingSink {
    fn pulse(&mut self, tier: IntensityTier) -> Result<(), FeedbackError> {
        tracing::info!(%tier, "haptic pulse");
        Ok(())
    }
}

/// Sink for devices without haptics.
#[derive(Debug, Clone)]
pub struct UnavailableSink {
    reason: String,
}

impl UnavailableSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl FeedbackSink for UnavailableSink {
    fn pulse(&mut self, _tier: IntensityTier) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire<S: FeedbackSink>(mut sink: S, tier: IntensityTier) -> Result<(), FeedbackError> {
        sink.pulse(tier)
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        fire(&mut sink, IntensityTier::Light).unwrap();
        fire(&mut sink, IntensityTier::Heavy).unwrap();
        assert_eq!(sink.pulses(), &[IntensityTier::Light, IntensityTier::Heavy]);
    }

    #[test]
    fn boxed_sinks_forward() {
        let boxed: Box<dyn FeedbackSink> = Box::new(UnavailableSink::new("no motor"));
        assert_eq!(
            fire(boxed, IntensityTier::Medium),
            Err(FeedbackError::Unavailable("no motor".into()))
        );
    }
}
