//! Envelope and folding card views
//!
//! Each view owns a table from its named sub-regions to render targets in the
//! animation engine. Mounting registers the targets with their resting
//! properties; the controller only ever looks regions up through the table.
//! A region whose target has disappeared from the engine is treated as not
//! mounted yet.

use std::fmt;
use std::hash::Hash;

use invita_animation::{Property, SchedulerHandle, TargetId, TargetProps};
use rustc_hash::FxHashMap;

use crate::config::SceneConfig;

/// A named sub-region of a view
pub trait Region: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Every region of the view, in mount order
    const ALL: &'static [Self];

    /// Kebab-case lookup name, e.g. `"left-leaf"`
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.name() == name)
    }
}

/// Explicit region to render target table
#[derive(Clone, Debug)]
pub struct RegionMap<R: Region> {
    targets: FxHashMap<R, TargetId>,
}

impl<R: Region> RegionMap<R> {
    /// Register every region with the engine
    ///
    /// Returns None if the scheduler is gone. Targets registered before the
    /// failure are removed again.
    fn mount(handle: &SchedulerHandle, initial: impl Fn(R) -> TargetProps) -> Option<Self> {
        let mut targets = FxHashMap::default();
        for region in R::ALL.iter().copied() {
            match handle.register_target(initial(region)) {
                Some(id) => {
                    targets.insert(region, id);
                }
                None => {
                    for id in targets.values() {
                        handle.remove_target(*id);
                    }
                    return None;
                }
            }
        }
        Some(Self { targets })
    }

    fn unmount(&self, handle: &SchedulerHandle) {
        for id in self.targets.values() {
            handle.remove_target(*id);
        }
    }

    pub fn get(&self, region: R) -> Option<TargetId> {
        self.targets.get(&region).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<TargetId> {
        R::from_name(name).and_then(|r| self.get(r))
    }

    /// Regions and their targets in mount order
    pub fn iter(&self) -> impl Iterator<Item = (R, TargetId)> + '_ {
        R::ALL
            .iter()
            .filter_map(move |r| self.get(*r).map(|id| (*r, id)))
    }

    /// Whether every region still has a live target
    pub fn is_ready(&self, handle: &SchedulerHandle) -> bool {
        R::ALL
            .iter()
            .all(|r| self.get(*r).is_some_and(|id| handle.contains_target(id)))
    }
}

// =============================================================================
// Envelope
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeRegion {
    /// Whole envelope; faded and shrunk when the card comes out
    Container,
    /// Hinged top flap
    Flap,
    /// Slot inside the envelope that holds the inner card
    ContentSlot,
    /// Card lifted out of the slot
    InnerCard,
}

impl Region for EnvelopeRegion {
    const ALL: &'static [Self] = &[
        EnvelopeRegion::Container,
        EnvelopeRegion::Flap,
        EnvelopeRegion::ContentSlot,
        EnvelopeRegion::InnerCard,
    ];

    fn name(self) -> &'static str {
        match self {
            EnvelopeRegion::Container => "container",
            EnvelopeRegion::Flap => "flap",
            EnvelopeRegion::ContentSlot => "content-slot",
            EnvelopeRegion::InnerCard => "inner-card",
        }
    }
}

/// The envelope's render targets
#[derive(Clone, Debug)]
pub struct EnvelopeView {
    regions: RegionMap<EnvelopeRegion>,
}

impl EnvelopeView {
    pub fn mount(handle: &SchedulerHandle, config: &SceneConfig) -> Option<Self> {
        let flap_z = config.envelope.flap_z_index;
        let regions = RegionMap::mount(handle, |region| {
            let mut props = TargetProps::default();
            if region == EnvelopeRegion::Flap {
                props.set(Property::ZIndex, flap_z);
            }
            props
        })?;
        Some(Self { regions })
    }

    pub fn unmount(&self, handle: &SchedulerHandle) {
        self.regions.unmount(handle);
    }

    pub fn regions(&self) -> &RegionMap<EnvelopeRegion> {
        &self.regions
    }

    pub fn region(&self, region: EnvelopeRegion) -> Option<TargetId> {
        self.regions.get(region)
    }

    pub fn container(&self) -> Option<TargetId> {
        self.region(EnvelopeRegion::Container)
    }

    pub fn flap(&self) -> Option<TargetId> {
        self.region(EnvelopeRegion::Flap)
    }

    pub fn content_slot(&self) -> Option<TargetId> {
        self.region(EnvelopeRegion::ContentSlot)
    }

    pub fn inner_card(&self) -> Option<TargetId> {
        self.region(EnvelopeRegion::InnerCard)
    }
}

// =============================================================================
// Folding card
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardRegion {
    Container,
    /// Cover half hinged on the left edge
    LeftLeaf,
    /// Cover half hinged on the right edge
    RightLeaf,
    /// Invitation content behind the leaves
    InnerPage,
}

impl Region for CardRegion {
    const ALL: &'static [Self] = &[
        CardRegion::Container,
        CardRegion::LeftLeaf,
        CardRegion::RightLeaf,
        CardRegion::InnerPage,
    ];

    fn name(self) -> &'static str {
        match self {
            CardRegion::Container => "container",
            CardRegion::LeftLeaf => "left-leaf",
            CardRegion::RightLeaf => "right-leaf",
            CardRegion::InnerPage => "inner-page",
        }
    }
}

/// The folding card's render targets
#[derive(Clone, Debug)]
pub struct FoldingCardView {
    regions: RegionMap<CardRegion>,
}

impl FoldingCardView {
    /// Leaves sit above the inner page
    const LEAF_Z_INDEX: f32 = 2.0;

    /// Mount hidden; the opening transition reveals the container
    pub fn mount(handle: &SchedulerHandle, config: &SceneConfig) -> Option<Self> {
        let hidden_scale = config.card.hidden_scale;
        let regions = RegionMap::mount(handle, |region| {
            let mut props = TargetProps::default();
            match region {
                CardRegion::Container => {
                    props.set(Property::Opacity, 0.0);
                    props.set(Property::Scale, hidden_scale);
                }
                CardRegion::LeftLeaf | CardRegion::RightLeaf => {
                    props.set(Property::ZIndex, Self::LEAF_Z_INDEX);
                }
                CardRegion::InnerPage => {}
            }
            props
        })?;
        Some(Self { regions })
    }

    pub fn unmount(&self, handle: &SchedulerHandle) {
        self.regions.unmount(handle);
    }

    pub fn regions(&self) -> &RegionMap<CardRegion> {
        &self.regions
    }

    pub fn region(&self, region: CardRegion) -> Option<TargetId> {
        self.regions.get(region)
    }

    pub fn container(&self) -> Option<TargetId> {
        self.region(CardRegion::Container)
    }

    pub fn left_leaf(&self) -> Option<TargetId> {
        self.region(CardRegion::LeftLeaf)
    }

    pub fn right_leaf(&self) -> Option<TargetId> {
        self.region(CardRegion::RightLeaf)
    }

    pub fn inner_page(&self) -> Option<TargetId> {
        self.region(CardRegion::InnerPage)
    }
}
