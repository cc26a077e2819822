//! Scroll-bound animation
//!
//! A [`Scrub`] maps a progress value onto property values directly. There is
//! no playback state: applying progress `p` always produces the same output
//! regardless of which samples came before, so a newer sample simply
//! overwrites the previous one.

use crate::easing::Easing;
use crate::values::{Interpolate, Property, PropertyStore, TargetId};

/// Scroll offsets between which progress runs from 0.0 to 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRange {
    pub start: f32,
    pub end: f32,
}

impl ScrollRange {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Normalize a scroll offset into 0.0..=1.0
    pub fn progress(&self, offset: f32) -> f32 {
        if !offset.is_finite() {
            return 0.0;
        }
        let span = self.end - self.start;
        if span <= 0.0 {
            return if offset >= self.end { 1.0 } else { 0.0 };
        }
        ((offset - self.start) / span).clamp(0.0, 1.0)
    }

    pub fn len(&self) -> f32 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

/// One property driven by scrub progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrubTrack {
    pub target: TargetId,
    pub property: Property,
    pub from: f32,
    pub to: f32,
    pub easing: Easing,
}

impl ScrubTrack {
    pub fn new(target: TargetId, property: Property, from: f32, to: f32) -> Self {
        Self {
            target,
            property,
            from,
            to,
            easing: Easing::Linear,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn sample(&self, progress: f32) -> f32 {
        self.from.lerp(&self.to, self.easing.apply(sanitize(progress)))
    }
}

/// A set of tracks scrubbed together
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scrub {
    tracks: Vec<ScrubTrack>,
}

impl Scrub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track (builder pattern)
    pub fn track(mut self, track: ScrubTrack) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn tracks(&self) -> &[ScrubTrack] {
        &self.tracks
    }

    /// Values every track takes at `progress`
    pub fn sample(&self, progress: f32) -> impl Iterator<Item = (TargetId, Property, f32)> + '_ {
        self.tracks
            .iter()
            .map(move |t| (t.target, t.property, t.sample(progress)))
    }

    /// Write the values at `progress` into `store`
    pub fn apply(&self, progress: f32, store: &mut impl PropertyStore) {
        for (target, property, value) in self.sample(progress) {
            store.set_property(target, property, value);
        }
    }
}

fn sanitize(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}
