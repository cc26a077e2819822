//! Scene states and the transitions between them

use std::fmt;

/// Where the presentation currently rests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SceneState {
    /// Envelope sealed, flap down
    #[default]
    Closed,
    /// Flap open, card still inside. Only ever a waypoint of the opening transition.
    Open,
    /// Folding card revealed with both leaves shut
    Extracted,
    /// Folding card leaves partly or fully opened by scrolling
    CardOpen,
}

impl SceneState {
    /// Click/tap transition out of this state, if it has one
    pub fn click_transition(self) -> Option<TransitionKind> {
        TransitionKind::CLICK
            .iter()
            .copied()
            .find(|kind| kind.source() == self)
    }

    /// Target of the click/tap transition out of this state
    pub fn advance_target(self) -> Option<SceneState> {
        self.click_transition().map(TransitionKind::target)
    }

    /// Whether scroll progress drives the folding card in this state
    pub fn accepts_scroll(self) -> bool {
        matches!(self, SceneState::Extracted | SceneState::CardOpen)
    }

    pub fn name(self) -> &'static str {
        match self {
            SceneState::Closed => "closed",
            SceneState::Open => "open",
            SceneState::Extracted => "extracted",
            SceneState::CardOpen => "cardOpen",
        }
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which discrete transition a timeline plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Entrance animation; leaves the state at Closed
    Intro,
    /// Closed to Extracted, passing through Open
    Extract,
    /// Extracted back to Closed
    Close,
}

impl TransitionKind {
    /// Transitions started by a click/tap
    pub const CLICK: [TransitionKind; 2] = [TransitionKind::Extract, TransitionKind::Close];

    pub fn source(self) -> SceneState {
        match self {
            TransitionKind::Intro | TransitionKind::Extract => SceneState::Closed,
            TransitionKind::Close => SceneState::Extracted,
        }
    }

    pub fn target(self) -> SceneState {
        match self {
            TransitionKind::Intro | TransitionKind::Close => SceneState::Closed,
            TransitionKind::Extract => SceneState::Extracted,
        }
    }

    /// Transient state passed through on the way to the target
    pub fn waypoint(self) -> Option<SceneState> {
        match self {
            TransitionKind::Extract => Some(SceneState::Open),
            _ => None,
        }
    }
}

/// What the controller is doing right now
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Resting in a state, ready for triggers
    Idle(SceneState),
    /// A discrete timeline is in flight; the state is still `from`
    Transitioning {
        kind: TransitionKind,
        from: SceneState,
        /// Waypoint passed on the way, never committed
        via: Option<SceneState>,
        to: SceneState,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_table() {
        assert_eq!(SceneState::Closed.advance_target(), Some(SceneState::Extracted));
        assert_eq!(SceneState::Extracted.advance_target(), Some(SceneState::Closed));
        assert_eq!(SceneState::Open.advance_target(), None);
        assert_eq!(SceneState::CardOpen.advance_target(), None);
    }

    #[test]
    fn test_click_transitions() {
        assert_eq!(SceneState::Closed.click_transition(), Some(TransitionKind::Extract));
        assert_eq!(SceneState::Extracted.click_transition(), Some(TransitionKind::Close));
        assert_eq!(SceneState::Open.click_transition(), None);
        assert_eq!(SceneState::CardOpen.click_transition(), None);
    }

    #[test]
    fn test_transition_kinds_match_table() {
        for kind in [TransitionKind::Extract, TransitionKind::Close] {
            assert_eq!(kind.source().advance_target(), Some(kind.target()));
        }
        assert_eq!(TransitionKind::Intro.source(), TransitionKind::Intro.target());
        assert_eq!(TransitionKind::Extract.waypoint(), Some(SceneState::Open));
    }

    #[test]
    fn test_scroll_states() {
        assert!(!SceneState::Closed.accepts_scroll());
        assert!(!SceneState::Open.accepts_scroll());
        assert!(SceneState::Extracted.accepts_scroll());
        assert!(SceneState::CardOpen.accepts_scroll());
    }
}
