//! Invita Animation System
//!
//! Timeline orchestration and scroll-bound scrubbing over engine-owned
//! render targets.
//!
//! # Features
//!
//! - **Timelines**: Ordered steps positioned after, overlapping, or alongside
//!   earlier steps, with lazily captured start values
//! - **Easing**: Power, sine and back curves, parseable from GSAP-style names
//! - **Scheduler**: Frame ticking with a once-only completion signal per timeline
//! - **Scrubbing**: Pure progress-to-value mapping for scroll-driven motion
//! - **Render Targets**: Property bags the engine mutates and renderers read

pub mod easing;
pub mod scheduler;
pub mod scrub;
pub mod timeline;
pub mod values;

pub use easing::{Easing, UnknownEasing};
pub use scheduler::{
    AnimationScheduler, Completion, CompletionStatus, Playback, SchedulerHandle, TimelineId,
};
pub use scrub::{ScrollRange, Scrub, ScrubTrack};
pub use timeline::{Position, Step, Timeline, TimelineEntryId};
pub use values::{
    Interpolate, Property, PropertyStore, PropertyValues, RenderTargets, TargetId, TargetProps,
};
