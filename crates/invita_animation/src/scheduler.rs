//! Animation scheduler
//!
//! Owns every render target and every playing timeline, and advances the
//! timelines each frame. Components never hold the scheduler itself: they get
//! a [`SchedulerHandle`], a weak reference whose operations quietly no-op once
//! the scheduler is gone.
//!
//! Playing a timeline returns a [`Playback`] carrying a [`Completion`] signal.
//! The signal settles exactly once, either to complete (the timeline ran to
//! its end) or to abandoned (it was cancelled, or the scheduler was dropped
//! while it was still playing).

use crate::scrub::Scrub;
use crate::timeline::Timeline;
use crate::values::{Property, PropertyStore, PropertyValues, RenderTargets, TargetId, TargetProps};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;

new_key_type! {
    /// Handle to a playing timeline
    pub struct TimelineId;
}

const PENDING: u8 = 0;
const COMPLETE: u8 = 1;
const ABANDONED: u8 = 2;

/// Settled state of a [`Completion`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionStatus {
    Pending,
    Complete,
    Abandoned,
}

/// Completion signal of one played timeline
///
/// Clones share the same signal.
#[derive(Clone, Debug)]
pub struct Completion {
    state: Arc<AtomicU8>,
}

impl Completion {
    fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    pub fn status(&self) -> CompletionStatus {
        match self.state.load(Ordering::Acquire) {
            COMPLETE => CompletionStatus::Complete,
            ABANDONED => CompletionStatus::Abandoned,
            _ => CompletionStatus::Pending,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == CompletionStatus::Complete
    }

    pub fn is_abandoned(&self) -> bool {
        self.status() == CompletionStatus::Abandoned
    }

    pub fn is_pending(&self) -> bool {
        self.status() == CompletionStatus::Pending
    }

    /// Settle the signal. Only the first call has any effect.
    fn settle(&self, value: u8) -> bool {
        self.state
            .compare_exchange(PENDING, value, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// A timeline handed to the scheduler
#[derive(Clone, Debug)]
pub struct Playback {
    pub id: TimelineId,
    pub completion: Completion,
}

struct ScheduledTimeline {
    timeline: Timeline,
    completion: Completion,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    targets: RenderTargets,
    timelines: SlotMap<TimelineId, ScheduledTimeline>,
    last_frame: Instant,
}

impl SchedulerInner {
    fn advance(&mut self, dt_ms: f32) -> bool {
        let SchedulerInner {
            targets, timelines, ..
        } = self;

        let mut finished = Vec::new();
        for (id, scheduled) in timelines.iter_mut() {
            if scheduled.timeline.tick(dt_ms, targets) {
                finished.push(id);
            }
        }

        for id in finished {
            if let Some(scheduled) = timelines.remove(id) {
                scheduled.completion.settle(COMPLETE);
                tracing::debug!(
                    "timeline {:?} complete after {}ms",
                    id,
                    scheduled.timeline.duration_ms()
                );
            }
        }

        !timelines.is_empty()
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The animation scheduler that ticks all playing timelines
///
/// Typically owned by the frame loop and shared via [`SchedulerHandle`].
///
/// ```ignore
/// let scheduler = AnimationScheduler::new();
/// let handle = scheduler.handle();
/// // ...each frame
/// scheduler.tick();
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                targets: RenderTargets::new(),
                timelines: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Tick all timelines by the wall-clock time since the previous frame
    ///
    /// Returns true if any timelines are still playing.
    pub fn tick(&self) -> bool {
        let mut inner = lock(&self.inner);
        let now = Instant::now();
        let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
        inner.last_frame = now;
        inner.advance(dt_ms)
    }

    /// Tick all timelines by an explicit frame time
    pub fn tick_by(&self, dt_ms: f32) -> bool {
        let mut inner = lock(&self.inner);
        inner.last_frame = Instant::now();
        inner.advance(dt_ms)
    }

    pub fn has_active_animations(&self) -> bool {
        !lock(&self.inner).timelines.is_empty()
    }

    pub fn timeline_count(&self) -> usize {
        lock(&self.inner).timelines.len()
    }

    pub fn target_count(&self) -> usize {
        lock(&self.inner).targets.len()
    }

    /// Read access to the render targets (the renderer's view of the scene)
    ///
    /// `f` runs while the scheduler is locked. Calling back into a
    /// [`SchedulerHandle`] of this scheduler from inside `f` deadlocks; copy
    /// out what you need and use the handle afterwards.
    pub fn with_targets<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RenderTargets) -> R,
    {
        f(&lock(&self.inner).targets)
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        for (_, scheduled) in inner.timelines.drain() {
            scheduled.completion.settle(ABANDONED);
        }
    }
}

/// A weak handle to the animation scheduler
///
/// It won't prevent the scheduler from being dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    fn with_inner<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut SchedulerInner) -> R,
    {
        self.inner.upgrade().map(|inner| f(&mut lock(&inner)))
    }

    // =========================================================================
    // Render Targets
    // =========================================================================

    /// Register a render target and return its ID
    pub fn register_target(&self, props: TargetProps) -> Option<TargetId> {
        self.with_inner(|inner| inner.targets.insert(props))
    }

    pub fn remove_target(&self, id: TargetId) {
        self.with_inner(|inner| inner.targets.remove(id));
    }

    pub fn contains_target(&self, id: TargetId) -> bool {
        self.with_inner(|inner| inner.targets.contains(id))
            .unwrap_or(false)
    }

    pub fn target(&self, id: TargetId) -> Option<TargetProps> {
        self.with_inner(|inner| inner.targets.get(id).copied())
            .flatten()
    }

    pub fn property(&self, id: TargetId, property: Property) -> Option<f32> {
        self.with_inner(|inner| inner.targets.property(id, property))
            .flatten()
    }

    /// Set properties instantly, without a transition
    ///
    /// Returns false if the target (or the scheduler) no longer exists.
    pub fn set_properties(&self, id: TargetId, values: &PropertyValues) -> bool {
        self.with_inner(|inner| match inner.targets.get_mut(id) {
            Some(props) => {
                props.apply(values);
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    // =========================================================================
    // Timelines
    // =========================================================================

    /// Start playing a timeline from time 0
    pub fn play(&self, mut timeline: Timeline) -> Option<Playback> {
        self.with_inner(|inner| {
            // Reset last_frame so the first wall-clock tick doesn't jump
            inner.last_frame = Instant::now();
            timeline.start();
            let duration_ms = timeline.duration_ms();
            let completion = Completion::new();
            let id = inner.timelines.insert(ScheduledTimeline {
                timeline,
                completion: completion.clone(),
            });
            tracing::debug!("timeline {:?} started ({}ms)", id, duration_ms);
            Playback { id, completion }
        })
    }

    /// Stop a timeline and settle its completion as abandoned
    ///
    /// Values already written stay as they are. Returns false if the timeline
    /// had already finished.
    pub fn cancel(&self, id: TimelineId) -> bool {
        self.with_inner(|inner| match inner.timelines.remove(id) {
            Some(scheduled) => {
                scheduled.completion.settle(ABANDONED);
                tracing::debug!("timeline {:?} abandoned", id);
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    pub fn is_playing(&self, id: TimelineId) -> bool {
        self.with_inner(|inner| inner.timelines.contains_key(id))
            .unwrap_or(false)
    }

    /// Overall progress of a playing timeline
    pub fn timeline_progress(&self, id: TimelineId) -> Option<f32> {
        self.with_inner(|inner| inner.timelines.get(id).map(|s| s.timeline.progress()))
            .flatten()
    }

    // =========================================================================
    // Scroll-bound mode
    // =========================================================================

    /// Apply a scrub at `progress`, synchronously
    pub fn scrub(&self, scrub: &Scrub, progress: f32) -> bool {
        self.with_inner(|inner| scrub.apply(progress, &mut inner.targets))
            .is_some()
    }

    /// Check if the scheduler still exists
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
