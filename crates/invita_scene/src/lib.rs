//! Invita Scene
//!
//! State machine and choreography of the envelope invitation.
//!
//! The scene rests in one of four states. Click/tap triggers play discrete
//! timelines between them that commit only when they finish, and the
//! folding card's leaves follow scroll progress directly.
//!
//! ```text
//!  Closed ──advance──▶ (Open) ──▶ Extracted ◀──scroll = 0── CardOpen
//!    ▲                                │  ──scroll > 0──▶
//!    └──────────────advance───────────┘
//! ```
//!
//! # Modules
//!
//! - [`controller`]: Owns the state, validates triggers, commits on completion
//! - [`transitions`]: Timeline builders for each discrete transition
//! - [`views`]: Envelope and folding card regions mapped to render targets
//! - [`viewport`]: Single scale factor for small viewports
//! - [`config`]: Every animation constant, loadable from `invita.toml`

pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod transitions;
pub mod viewport;
pub mod views;

pub use config::{
    CardConfig, CloseConfig, EnvelopeConfig, ExtractConfig, IntroConfig, OpenConfig, SceneConfig,
    CONFIG_FILE,
};
pub use controller::SceneController;
pub use error::{ConfigError, Result};
pub use state::{Phase, SceneState, TransitionKind};
pub use viewport::{Size, ViewportScale};
pub use views::{CardRegion, EnvelopeRegion, EnvelopeView, FoldingCardView, Region, RegionMap};
