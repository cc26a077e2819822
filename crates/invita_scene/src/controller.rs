//! Scene controller
//!
//! The only stateful component of the presentation. It owns the
//! [`SceneState`], validates triggers against it, builds the timeline for a
//! discrete transition and hands it to the animation engine. The state commit
//! is attached to the timeline's completion signal and runs in [`sync`] at
//! most once, after the timeline has finished. Until then the state still
//! reads as the source of the transition and every further discrete trigger
//! is ignored.
//!
//! Scroll progress is handled separately: it maps straight onto the leaf
//! rotation with no timeline and no pending work.
//!
//! Every guard is a silent no-op. Triggers return whether they did anything,
//! which callers are free to ignore.
//!
//! # Example
//!
//! ```ignore
//! let scheduler = AnimationScheduler::new();
//! let mut scene = SceneController::new(scheduler.handle(), SceneConfig::default());
//! scene.mount();
//! scene.resize(400.0, 800.0);
//!
//! scene.advance(); // on click
//!
//! // each frame
//! scheduler.tick();
//! scene.sync();
//!
//! scene.on_scroll_offset(window_scroll_y); // on scroll
//! ```
//!
//! [`sync`]: SceneController::sync

use invita_animation::{CompletionStatus, Playback, SchedulerHandle, Scrub, Timeline};

use crate::config::SceneConfig;
use crate::state::{Phase, SceneState, TransitionKind};
use crate::transitions;
use crate::viewport::{Size, ViewportScale};
use crate::views::{EnvelopeView, FoldingCardView};

/// A discrete transition waiting for its timeline to finish
#[derive(Debug)]
struct PendingCommit {
    kind: TransitionKind,
    playback: Playback,
}

/// Mounted views plus the scrub that drives the card leaves
#[derive(Debug)]
struct Views {
    envelope: EnvelopeView,
    card: FoldingCardView,
    leaves: Scrub,
}

pub struct SceneController {
    handle: SchedulerHandle,
    config: SceneConfig,
    views: Option<Views>,
    state: SceneState,
    pending: Option<PendingCommit>,
    viewport: ViewportScale,
    scroll_progress: f32,
    timelines_started: usize,
}

impl SceneController {
    /// Create an unmounted controller resting at Closed
    pub fn new(handle: SchedulerHandle, config: SceneConfig) -> Self {
        Self {
            handle,
            config,
            views: None,
            state: SceneState::Closed,
            pending: None,
            viewport: ViewportScale::UNIT,
            scroll_progress: 0.0,
            timelines_started: 0,
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Register the envelope and folding card with the engine
    ///
    /// Returns false if the engine is gone. Mounting twice is a no-op.
    pub fn mount(&mut self) -> bool {
        if self.views.is_some() {
            return true;
        }

        let Some(envelope) = EnvelopeView::mount(&self.handle, &self.config) else {
            return false;
        };
        let Some(card) = FoldingCardView::mount(&self.handle, &self.config) else {
            envelope.unmount(&self.handle);
            return false;
        };
        let Some(leaves) = transitions::leaves(&card, &self.config) else {
            envelope.unmount(&self.handle);
            card.unmount(&self.handle);
            return false;
        };

        tracing::debug!("scene mounted in state {}", self.state);
        self.views = Some(Views {
            envelope,
            card,
            leaves,
        });
        true
    }

    /// Remove the views; an in-flight transition is abandoned without commit
    pub fn unmount(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.handle.cancel(pending.playback.id);
        }
        if let Some(views) = self.views.take() {
            views.envelope.unmount(&self.handle);
            views.card.unmount(&self.handle);
            tracing::debug!("scene unmounted in state {}", self.state);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.views.is_some()
    }

    pub fn envelope(&self) -> Option<&EnvelopeView> {
        self.views.as_ref().map(|v| &v.envelope)
    }

    pub fn card(&self) -> Option<&FoldingCardView> {
        self.views.as_ref().map(|v| &v.card)
    }

    /// Views whose every region still has a live target
    fn ready_views(&self) -> Option<&Views> {
        self.views.as_ref().filter(|v| {
            v.envelope.regions().is_ready(&self.handle) && v.card.regions().is_ready(&self.handle)
        })
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Last committed state
    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        match &self.pending {
            Some(pending) => Phase::Transitioning {
                kind: pending.kind,
                from: self.state,
                via: pending.kind.waypoint(),
                to: pending.kind.target(),
            },
            None => Phase::Idle(self.state),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of discrete timelines started so far
    pub fn timelines_started(&self) -> usize {
        self.timelines_started
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Commit the pending transition if its timeline has finished
    ///
    /// Returns the state committed by this call. An abandoned timeline clears
    /// the pending transition without committing anything.
    pub fn sync(&mut self) -> Option<SceneState> {
        let status = self.pending.as_ref()?.playback.completion.status();
        match status {
            CompletionStatus::Pending => None,
            CompletionStatus::Abandoned => {
                self.pending = None;
                None
            }
            CompletionStatus::Complete => {
                let pending = self.pending.take()?;
                let previous = self.state;
                self.state = pending.kind.target();
                tracing::debug!(
                    "{:?} complete: {} -> {}",
                    pending.kind,
                    previous,
                    self.state
                );
                Some(self.state)
            }
        }
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Click/tap on the envelope
    ///
    /// Starts the transition out of the current state, if it has one and no
    /// other transition is in flight. Returns whether a timeline was started.
    pub fn advance(&mut self) -> bool {
        self.sync();
        if self.pending.is_some() {
            return false;
        }

        let Some(kind) = self.state.click_transition() else {
            return false;
        };

        let Some(views) = self.ready_views() else {
            return false;
        };
        let timeline = match kind {
            TransitionKind::Extract => {
                transitions::extract(&views.envelope, &views.card, &self.config, self.viewport)
            }
            TransitionKind::Close => {
                transitions::close(&views.envelope, &views.card, &self.config, self.viewport)
            }
            TransitionKind::Intro => None,
        };
        match timeline {
            Some(timeline) => self.start(kind, timeline),
            None => false,
        }
    }

    /// Play the entrance animation of the closed envelope
    pub fn play_intro(&mut self) -> bool {
        self.sync();
        if !self.config.intro.enabled || self.pending.is_some() || self.state != SceneState::Closed
        {
            return false;
        }

        let Some(views) = self.ready_views() else {
            return false;
        };
        match transitions::intro(&views.envelope, &self.config) {
            Some(timeline) => self.start(TransitionKind::Intro, timeline),
            None => false,
        }
    }

    /// Normalized scroll progress through the card's scroll range
    ///
    /// Sets the leaf rotation for `progress` directly. Any progress above 0
    /// rests in CardOpen, exactly 0 rests in Extracted. Returns whether the
    /// sample was applied.
    pub fn on_scroll_progress(&mut self, progress: f32) -> bool {
        self.sync();
        if self.pending.is_some() || !self.state.accepts_scroll() {
            return false;
        }
        let Some(views) = self.ready_views() else {
            return false;
        };

        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        if !self.handle.scrub(&views.leaves, progress) {
            return false;
        }
        self.scroll_progress = progress;

        let next = if progress > 0.0 {
            SceneState::CardOpen
        } else {
            SceneState::Extracted
        };
        if next != self.state {
            tracing::debug!("scroll {:.3}: {} -> {}", progress, self.state, next);
            self.state = next;
        }
        true
    }

    /// Raw scroll offset, normalized through the configured scroll range
    pub fn on_scroll_offset(&mut self, offset: f32) -> bool {
        let progress = self.config.card.scroll_range().progress(offset);
        self.on_scroll_progress(progress)
    }

    /// Last applied scroll progress
    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// Recompute the viewport scale
    ///
    /// Timelines built afterwards use the new scale; a timeline already in
    /// flight keeps its distances.
    pub fn resize(&mut self, width: f32, height: f32) -> ViewportScale {
        let envelope = &self.config.envelope;
        self.viewport = ViewportScale::compute(
            Size::new(width, height),
            Size::new(envelope.width, envelope.height),
            envelope.margin,
        );
        self.viewport
    }

    pub fn viewport_scale(&self) -> ViewportScale {
        self.viewport
    }

    /// Envelope size at the current viewport scale
    pub fn envelope_size(&self) -> (u32, u32) {
        let envelope = &self.config.envelope;
        self.viewport
            .scaled_size(Size::new(envelope.width, envelope.height))
    }

    /// Folding card size at the current viewport scale
    pub fn card_size(&self) -> (u32, u32) {
        self.viewport.scaled_size(self.config.card.size())
    }

    fn start(&mut self, kind: TransitionKind, timeline: Timeline) -> bool {
        let Some(playback) = self.handle.play(timeline) else {
            return false;
        };
        tracing::debug!(
            "{:?} started from {} (timeline {:?})",
            kind,
            self.state,
            playback.id
        );
        self.timelines_started += 1;
        self.pending = Some(PendingCommit { kind, playback });
        true
    }
}

impl Drop for SceneController {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{CardRegion, EnvelopeRegion};
    use invita_animation::{AnimationScheduler, Property, TargetProps};

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn scene() -> (AnimationScheduler, SceneController) {
        let scheduler = AnimationScheduler::new();
        let mut controller = SceneController::new(scheduler.handle(), SceneConfig::default());
        assert!(controller.mount());
        (scheduler, controller)
    }

    /// Tick frames until the controller commits, returning what it committed
    fn run_to_commit(
        scheduler: &AnimationScheduler,
        controller: &mut SceneController,
    ) -> Vec<SceneState> {
        let mut commits = Vec::new();
        for _ in 0..1000 {
            scheduler.tick_by(FRAME_MS);
            if let Some(state) = controller.sync() {
                commits.push(state);
            }
            if !controller.is_transitioning() {
                break;
            }
        }
        commits
    }

    fn snapshot(scheduler: &AnimationScheduler, controller: &SceneController) -> Vec<TargetProps> {
        let envelope = controller.envelope().unwrap();
        let card = controller.card().unwrap();
        let ids: Vec<_> = envelope
            .regions()
            .iter()
            .map(|(_, id)| id)
            .chain(card.regions().iter().map(|(_, id)| id))
            .collect();
        scheduler.with_targets(|targets| {
            ids.iter()
                .map(|id| *targets.get(*id).unwrap())
                .collect()
        })
    }

    fn extracted() -> (AnimationScheduler, SceneController) {
        let (scheduler, mut controller) = scene();
        assert!(controller.advance());
        run_to_commit(&scheduler, &mut controller);
        assert_eq!(controller.state(), SceneState::Extracted);
        (scheduler, controller)
    }

    #[test]
    fn test_starts_closed() {
        let (_scheduler, controller) = scene();
        assert_eq!(controller.state(), SceneState::Closed);
        assert_eq!(controller.phase(), Phase::Idle(SceneState::Closed));
        assert_eq!(controller.timelines_started(), 0);
    }

    #[test]
    fn test_extract_commits_once_on_completion() {
        let (scheduler, mut controller) = scene();

        assert!(controller.advance());
        assert!(!controller.advance());
        assert_eq!(controller.timelines_started(), 1);

        // Halfway through, the state still reads as the source
        scheduler.tick_by(1400.0);
        assert_eq!(controller.sync(), None);
        assert_eq!(controller.state(), SceneState::Closed);
        assert!(!controller.advance());
        assert_eq!(
            controller.phase(),
            Phase::Transitioning {
                kind: TransitionKind::Extract,
                from: SceneState::Closed,
                via: Some(SceneState::Open),
                to: SceneState::Extracted,
            }
        );

        let commits = run_to_commit(&scheduler, &mut controller);
        assert_eq!(commits, vec![SceneState::Extracted]);
        assert_eq!(controller.sync(), None);
        assert_eq!(controller.state(), SceneState::Extracted);
        assert_eq!(controller.timelines_started(), 1);
    }

    #[test]
    fn test_extract_end_values() {
        let (scheduler, controller) = extracted();
        let envelope = controller.envelope().unwrap();
        let card = controller.card().unwrap();

        scheduler.with_targets(|targets| {
            let flap = targets.get(envelope.flap().unwrap()).unwrap();
            assert_eq!(flap.get(Property::RotateX), 180.0);
            assert_eq!(flap.get(Property::ZIndex), -10.0);

            let inner = targets.get(envelope.inner_card().unwrap()).unwrap();
            assert!((inner.get(Property::Y) + 400.0).abs() < 1e-3);
            assert!(inner.get(Property::Opacity).abs() < 1e-5);

            let container = targets.get(envelope.container().unwrap()).unwrap();
            assert!((container.get(Property::Scale) - 0.9).abs() < 1e-5);

            let revealed = targets.get(card.container().unwrap()).unwrap();
            assert!((revealed.get(Property::Opacity) - 1.0).abs() < 1e-5);
            assert!((revealed.get(Property::Scale) - 1.0).abs() < 1e-5);
        });
    }

    #[test]
    fn test_close_round_trip_restores_everything() {
        let (scheduler, mut controller) = scene();
        let initial = snapshot(&scheduler, &controller);

        assert!(controller.advance());
        run_to_commit(&scheduler, &mut controller);
        assert_eq!(controller.state(), SceneState::Extracted);
        assert_ne!(snapshot(&scheduler, &controller), initial);

        assert!(controller.advance());
        let commits = run_to_commit(&scheduler, &mut controller);
        assert_eq!(commits, vec![SceneState::Closed]);

        let restored = snapshot(&scheduler, &controller);
        for (before, after) in initial.iter().zip(&restored) {
            assert!(before.approx_eq(after, 1e-3), "{before:?} != {after:?}");
        }
    }

    #[test]
    fn test_triggers_without_transition_are_ignored() {
        // Scroll while closed
        let (_scheduler, mut controller) = scene();
        assert!(!controller.on_scroll_progress(0.5));
        assert_eq!(controller.state(), SceneState::Closed);
        assert_eq!(controller.timelines_started(), 0);

        // Advance while the card is open
        let (_scheduler, mut controller) = extracted();
        assert!(controller.on_scroll_progress(0.5));
        assert_eq!(controller.state(), SceneState::CardOpen);
        assert!(!controller.advance());
        assert_eq!(controller.state(), SceneState::CardOpen);
        assert_eq!(controller.timelines_started(), 1);
        assert!(!controller.is_transitioning());
    }

    #[test]
    fn test_scroll_is_ignored_mid_flight() {
        let (scheduler, mut controller) = extracted();
        assert!(controller.advance());
        scheduler.tick_by(100.0);

        assert!(!controller.on_scroll_progress(1.0));
        let leaf = controller.card().unwrap().left_leaf().unwrap();
        assert_eq!(scheduler.handle().property(leaf, Property::RotateY), Some(0.0));
    }

    #[test]
    fn test_scroll_scrubs_leaves_reversibly() {
        let (scheduler, mut controller) = extracted();
        let handle = scheduler.handle();
        let card = controller.card().unwrap();
        let left = card.left_leaf().unwrap();
        let right = card.right_leaf().unwrap();

        assert!(controller.on_scroll_progress(0.0));
        assert_eq!(controller.state(), SceneState::Extracted);
        assert!(controller.on_scroll_progress(1.0));
        assert_eq!(controller.state(), SceneState::CardOpen);
        assert_eq!(handle.property(left, Property::RotateY), Some(-180.0));
        assert_eq!(handle.property(right, Property::RotateY), Some(180.0));

        assert!(controller.on_scroll_progress(0.0));
        assert_eq!(controller.state(), SceneState::Extracted);
        assert_eq!(handle.property(left, Property::RotateY), Some(0.0));
        assert_eq!(handle.property(right, Property::RotateY), Some(0.0));

        // Jumping into the middle needs no earlier samples
        assert!(controller.on_scroll_progress(0.25));
        assert_eq!(handle.property(left, Property::RotateY), Some(-45.0));
        assert_eq!(scheduler.timeline_count(), 0);
    }

    #[test]
    fn test_scroll_offset_uses_configured_range() {
        let (scheduler, mut controller) = extracted();
        let right = controller.card().unwrap().right_leaf().unwrap();

        assert!(controller.on_scroll_offset(300.0));
        assert_eq!(controller.scroll_progress(), 0.5);
        assert_eq!(scheduler.handle().property(right, Property::RotateY), Some(90.0));

        assert!(controller.on_scroll_offset(10_000.0));
        assert_eq!(controller.scroll_progress(), 1.0);
        assert!(controller.on_scroll_offset(-50.0));
        assert_eq!(controller.state(), SceneState::Extracted);
    }

    #[test]
    fn test_unmounted_controller_ignores_triggers() {
        let scheduler = AnimationScheduler::new();
        let mut controller = SceneController::new(scheduler.handle(), SceneConfig::default());

        assert!(!controller.advance());
        assert!(!controller.play_intro());
        assert_eq!(controller.timelines_started(), 0);
        assert_eq!(controller.state(), SceneState::Closed);
    }

    #[test]
    fn test_missing_region_suppresses_transition() {
        let (scheduler, mut controller) = scene();
        let flap = controller.envelope().unwrap().region(EnvelopeRegion::Flap).unwrap();
        scheduler.handle().remove_target(flap);

        assert!(!controller.advance());
        assert_eq!(controller.timelines_started(), 0);
        assert!(controller.card().unwrap().region(CardRegion::InnerPage).is_some());
    }

    #[test]
    fn test_unmount_mid_flight_abandons() {
        let (scheduler, mut controller) = scene();
        assert!(controller.advance());
        scheduler.tick_by(500.0);

        controller.unmount();
        assert!(!controller.is_transitioning());
        run_to_commit(&scheduler, &mut controller);
        assert_eq!(controller.state(), SceneState::Closed);
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.target_count(), 0);
        assert!(!controller.advance());
    }

    #[test]
    fn test_scheduler_drop_abandons_without_commit() {
        let (scheduler, mut controller) = scene();
        assert!(controller.advance());
        drop(scheduler);

        assert_eq!(controller.sync(), None);
        assert_eq!(controller.state(), SceneState::Closed);
        assert!(!controller.is_transitioning());
        assert!(!controller.advance());
    }

    #[test]
    fn test_intro_blocks_advance_and_keeps_closed() {
        let (scheduler, mut controller) = scene();
        let container = controller.envelope().unwrap().container().unwrap();

        assert!(controller.play_intro());
        assert_eq!(
            controller.phase(),
            Phase::Transitioning {
                kind: TransitionKind::Intro,
                from: SceneState::Closed,
                via: None,
                to: SceneState::Closed,
            }
        );
        scheduler.tick_by(1.0);
        let scale = scheduler.handle().property(container, Property::Scale).unwrap();
        assert!(scale < 0.1);
        assert!(!controller.advance());

        let commits = run_to_commit(&scheduler, &mut controller);
        assert_eq!(commits, vec![SceneState::Closed]);
        assert_eq!(scheduler.handle().property(container, Property::Scale), Some(1.0));
        assert_eq!(scheduler.handle().property(container, Property::Rotation), Some(0.0));
        assert!(controller.advance());
    }

    #[test]
    fn test_intro_only_when_closed() {
        let (_scheduler, mut controller) = extracted();
        assert!(!controller.play_intro());

        let scheduler = AnimationScheduler::new();
        let mut config = SceneConfig::default();
        config.intro.enabled = false;
        let mut controller = SceneController::new(scheduler.handle(), config);
        controller.mount();
        assert!(!controller.play_intro());
    }

    #[test]
    fn test_resize_scales_new_timelines() {
        let (scheduler, mut controller) = scene();
        let scale = controller.resize(400.0, 800.0);
        assert!((scale.value() - 368.0 / 480.0).abs() < 1e-6);
        assert_eq!(controller.envelope_size().0, 368);
        assert_eq!(controller.card_size(), (343, 438));

        assert!(controller.advance());
        run_to_commit(&scheduler, &mut controller);

        let inner = controller.envelope().unwrap().inner_card().unwrap();
        let y = scheduler.handle().property(inner, Property::Y).unwrap();
        assert!((y - (-400.0 * scale.value())).abs() < 1e-3);
    }
}
