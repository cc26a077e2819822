//! Timeline orchestration
//!
//! A timeline is an ordered batch of [`Step`]s. Each step tweens a set of
//! properties on one render target. Where a step starts is declared with a
//! [`Position`] relative to what was added before it, and resolved to an
//! absolute start time when the step is added.
//!
//! Start values are captured lazily: the first tick on which a step is active
//! reads the target's current values from the [`PropertyStore`]. This lets
//! consecutive steps on the same property chain naturally (the second step
//! starts wherever the first left it).
//!
//! # Example
//!
//! ```ignore
//! let mut timeline = Timeline::new();
//! timeline.add(Step::to(flap, PropertyValues::new().with(Property::RotateX, 180.0))
//!     .duration(1500)
//!     .easing(Easing::EaseInOutCubic));
//! timeline.add(Step::set(flap, PropertyValues::new().with(Property::ZIndex, -10.0)));
//! timeline.add(Step::to(card, PropertyValues::new().with(Property::Y, -75.0))
//!     .duration(400)
//!     .position(Position::Overlap(200))); // starts 200ms before the flap finishes
//! ```

use crate::easing::Easing;
use crate::values::{Interpolate, PropertyStore, PropertyValues, TargetId};

/// Where a step starts, relative to the steps added before it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    /// At the current end of the timeline
    #[default]
    After,
    /// `ms` before the current end of the timeline (clamped at 0)
    Overlap(u32),
    /// At an absolute time from the start of the timeline
    At(u32),
    /// At the same time the previously added step starts
    WithPrevious,
}

/// One tween of a render target towards a set of property values
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub target: TargetId,
    pub to: PropertyValues,
    pub duration_ms: u32,
    pub easing: Easing,
    pub position: Position,
}

impl Step {
    /// Tween `target` towards `to`
    pub fn to(target: TargetId, to: PropertyValues) -> Self {
        Self {
            target,
            to,
            duration_ms: 0,
            easing: Easing::Linear,
            position: Position::After,
        }
    }

    /// Instantaneous property set with no transition
    pub fn set(target: TargetId, to: PropertyValues) -> Self {
        Self::to(target, to)
    }

    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Identifier of a step inside one timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineEntryId(u32);

#[derive(Clone, Debug)]
struct TimelineEntry {
    id: TimelineEntryId,
    step: Step,
    start_ms: f32,
    /// Captured the first time the step becomes active
    from: Option<PropertyValues>,
}

impl TimelineEntry {
    fn end_ms(&self) -> f32 {
        self.start_ms + self.step.duration_ms as f32
    }

    fn local_progress(&self, time_ms: f32) -> f32 {
        if self.step.duration_ms == 0 {
            return 1.0;
        }
        ((time_ms - self.start_ms) / self.step.duration_ms as f32).clamp(0.0, 1.0)
    }

    fn apply(&mut self, time_ms: f32, store: &mut impl PropertyStore) {
        let target = self.step.target;
        let eased = self.step.easing.apply(self.local_progress(time_ms));
        let from = self.from.get_or_insert_with(|| {
            self.step
                .to
                .iter()
                .map(|(property, _)| {
                    let current = store
                        .property(target, property)
                        .unwrap_or_else(|| property.default_value());
                    (property, current)
                })
                .collect()
        });

        for (property, end) in self.step.to.iter() {
            let value = if property.is_discrete() {
                end
            } else {
                let start = from.get(property).unwrap_or(end);
                start.lerp(&end, eased)
            };
            store.set_property(target, property, value);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlayState {
    Idle,
    Playing,
    Finished,
}

/// An ordered batch of steps played as one unit
#[derive(Clone, Debug)]
pub struct Timeline {
    /// Sorted by start time; ties keep insertion order
    entries: Vec<TimelineEntry>,
    next_id: u32,
    end_ms: f32,
    last_start_ms: f32,
    time_ms: f32,
    state: PlayState,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            end_ms: 0.0,
            last_start_ms: 0.0,
            time_ms: 0.0,
            state: PlayState::Idle,
        }
    }

    /// Add a step, resolving its position against the steps added so far
    pub fn add(&mut self, step: Step) -> TimelineEntryId {
        let start_ms = match step.position {
            Position::After => self.end_ms,
            Position::Overlap(ms) => (self.end_ms - ms as f32).max(0.0),
            Position::At(ms) => ms as f32,
            Position::WithPrevious => self.last_start_ms,
        };

        let id = TimelineEntryId(self.next_id);
        self.next_id += 1;

        let entry = TimelineEntry {
            id,
            step,
            start_ms,
            from: None,
        };
        self.end_ms = self.end_ms.max(entry.end_ms());
        self.last_start_ms = start_ms;

        let index = self.entries.partition_point(|e| e.start_ms <= start_ms);
        self.entries.insert(index, entry);
        id
    }

    /// Add a step (builder pattern)
    pub fn then(mut self, step: Step) -> Self {
        self.add(step);
        self
    }

    /// Total duration in milliseconds
    pub fn duration_ms(&self) -> f32 {
        self.end_ms
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Entry IDs in insertion order
    pub fn entry_ids(&self) -> Vec<TimelineEntryId> {
        let mut ids: Vec<_> = self.entries.iter().map(|e| e.id).collect();
        ids.sort();
        ids
    }

    /// Resolved start time of an entry
    pub fn start_time(&self, id: TimelineEntryId) -> Option<f32> {
        self.entry(id).map(|e| e.start_ms)
    }

    pub fn step(&self, id: TimelineEntryId) -> Option<&Step> {
        self.entry(id).map(|e| &e.step)
    }

    fn entry(&self, id: TimelineEntryId) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Reset to time 0 and start playing
    pub fn start(&mut self) {
        self.time_ms = 0.0;
        self.state = PlayState::Playing;
        for entry in &mut self.entries {
            entry.from = None;
        }
    }

    /// Stop without finishing. Values already written stay where they are.
    pub fn stop(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Idle;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlayState::Finished
    }

    /// Overall progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.end_ms <= 0.0 {
            return if self.is_finished() { 1.0 } else { 0.0 };
        }
        (self.time_ms / self.end_ms).clamp(0.0, 1.0)
    }

    /// Advance by `dt_ms` and write every active step into `store`
    ///
    /// Returns true exactly once: on the tick that finishes the timeline.
    /// On that tick every step is written at its end value.
    pub fn tick(&mut self, dt_ms: f32, store: &mut impl PropertyStore) -> bool {
        if self.state != PlayState::Playing {
            return false;
        }

        self.time_ms = (self.time_ms + dt_ms.max(0.0)).min(self.end_ms);
        let time_ms = self.time_ms;

        for entry in self.entries.iter_mut().filter(|e| e.start_ms <= time_ms) {
            entry.apply(time_ms, store);
        }

        if self.time_ms >= self.end_ms {
            self.state = PlayState::Finished;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Property, RenderTargets, TargetProps};

    fn values(property: Property, value: f32) -> PropertyValues {
        PropertyValues::new().with(property, value)
    }

    #[test]
    fn test_positions_resolve_against_timeline_end() {
        let mut targets = RenderTargets::new();
        let a = targets.insert(TargetProps::default());

        let mut timeline = Timeline::new();
        let first = timeline.add(Step::to(a, values(Property::RotateX, 180.0)).duration(1500));
        let swap = timeline.add(Step::set(a, values(Property::ZIndex, -10.0)));
        let lift = timeline.add(
            Step::to(a, values(Property::Y, -75.0))
                .duration(400)
                .position(Position::Overlap(200)),
        );
        let parallel = timeline.add(
            Step::to(a, values(Property::Opacity, 0.5))
                .duration(100)
                .position(Position::WithPrevious),
        );
        let absolute = timeline.add(
            Step::to(a, values(Property::Scale, 2.0))
                .duration(50)
                .position(Position::At(10)),
        );

        assert_eq!(timeline.start_time(first), Some(0.0));
        assert_eq!(timeline.start_time(swap), Some(1500.0));
        assert_eq!(timeline.start_time(lift), Some(1300.0));
        assert_eq!(timeline.start_time(parallel), Some(1300.0));
        assert_eq!(timeline.start_time(absolute), Some(10.0));
        assert_eq!(timeline.duration_ms(), 1700.0);
        assert_eq!(timeline.entry_ids(), vec![first, swap, lift, parallel, absolute]);
    }

    #[test]
    fn test_overlap_clamps_at_zero() {
        let mut targets = RenderTargets::new();
        let a = targets.insert(TargetProps::default());

        let mut timeline = Timeline::new();
        let id = timeline.add(
            Step::to(a, values(Property::X, 10.0))
                .duration(100)
                .position(Position::Overlap(500)),
        );
        assert_eq!(timeline.start_time(id), Some(0.0));
    }

    #[test]
    fn test_tick_interpolates_and_finishes_once() {
        let mut targets = RenderTargets::new();
        let a = targets.insert(TargetProps::default());

        let mut timeline =
            Timeline::new().then(Step::to(a, values(Property::Y, -100.0)).duration(1000));
        timeline.start();

        assert!(!timeline.tick(500.0, &mut targets));
        let y = targets.property(a, Property::Y).unwrap();
        assert!((y + 50.0).abs() < 1e-4);
        assert!((timeline.progress() - 0.5).abs() < 1e-6);

        assert!(timeline.tick(600.0, &mut targets));
        assert_eq!(targets.property(a, Property::Y), Some(-100.0));
        assert!(timeline.is_finished());

        // Further ticks never report completion again
        assert!(!timeline.tick(100.0, &mut targets));
    }

    #[test]
    fn test_chained_steps_capture_from_values_lazily() {
        let mut targets = RenderTargets::new();
        let a = targets.insert(TargetProps::default());

        let mut timeline = Timeline::new()
            .then(Step::to(a, values(Property::Y, -75.0)).duration(100))
            .then(Step::to(a, values(Property::Y, -400.0)).duration(100));
        timeline.start();

        timeline.tick(100.0, &mut targets);
        assert_eq!(targets.property(a, Property::Y), Some(-75.0));

        timeline.tick(50.0, &mut targets);
        let y = targets.property(a, Property::Y).unwrap();
        assert!((y - (-75.0 + (-400.0 + 75.0) * 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_large_tick_jumps_to_end_values() {
        let mut targets = RenderTargets::new();
        let a = targets.insert(TargetProps::default());
        let b = targets.insert(TargetProps::default());

        let mut timeline = Timeline::new()
            .then(Step::to(a, values(Property::RotateX, 180.0)).duration(1500))
            .then(Step::set(a, values(Property::ZIndex, -10.0)))
            .then(
                Step::to(b, values(Property::Opacity, 0.0))
                    .duration(800)
                    .position(Position::At(0)),
            );
        timeline.start();

        assert!(timeline.tick(60_000.0, &mut targets));
        assert_eq!(targets.property(a, Property::RotateX), Some(180.0));
        assert_eq!(targets.property(a, Property::ZIndex), Some(-10.0));
        assert_eq!(targets.property(b, Property::Opacity), Some(0.0));
    }

    #[test]
    fn test_empty_timeline_finishes_on_first_tick() {
        let mut targets = RenderTargets::new();
        let mut timeline = Timeline::new();
        timeline.start();
        assert!(timeline.tick(0.0, &mut targets));
        assert_eq!(timeline.progress(), 1.0);
    }

    #[test]
    fn test_idle_timeline_does_not_write() {
        let mut targets = RenderTargets::new();
        let a = targets.insert(TargetProps::default());
        let mut timeline = Timeline::new().then(Step::to(a, values(Property::X, 5.0)).duration(10));

        assert!(!timeline.tick(100.0, &mut targets));
        assert_eq!(targets.property(a, Property::X), Some(0.0));

        timeline.start();
        timeline.stop();
        assert!(!timeline.tick(100.0, &mut targets));
        assert!(!timeline.is_playing());
    }
}
