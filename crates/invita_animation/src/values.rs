//! Animatable values and render targets
//!
//! A render target is the engine-side stand-in for a node on screen: a bag of
//! transform and compositing properties that timelines and scrubs write and a
//! renderer reads.

use std::fmt;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a registered render target
    pub struct TargetId;
}

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

/// A property of a render target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Opacity,
    Scale,
    /// Horizontal translation in pixels
    X,
    /// Vertical translation in pixels
    Y,
    /// In-plane rotation in degrees
    Rotation,
    /// Rotation around the horizontal axis in degrees (envelope flap hinge)
    RotateX,
    /// Rotation around the vertical axis in degrees (card leaf hinge)
    RotateY,
    /// Stacking order. Interpolated values are rounded when read.
    ZIndex,
}

impl Property {
    pub const ALL: [Property; 8] = [
        Property::Opacity,
        Property::Scale,
        Property::X,
        Property::Y,
        Property::Rotation,
        Property::RotateX,
        Property::RotateY,
        Property::ZIndex,
    ];

    /// Value a freshly registered target starts with
    pub fn default_value(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            _ => 0.0,
        }
    }

    /// Whether this property snaps instead of interpolating
    pub fn is_discrete(self) -> bool {
        matches!(self, Property::ZIndex)
    }

    pub fn name(self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::Scale => "scale",
            Property::X => "x",
            Property::Y => "y",
            Property::Rotation => "rotation",
            Property::RotateX => "rotateX",
            Property::RotateY => "rotateY",
            Property::ZIndex => "zIndex",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A small set of property assignments, kept in insertion order
///
/// Setting the same property twice replaces the earlier value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyValues {
    values: SmallVec<[(Property, f32); 4]>,
}

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property assignment (builder pattern)
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: Property, value: f32) {
        if let Some(slot) = self.values.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value;
        } else {
            self.values.push((property, value));
        }
    }

    pub fn get(&self, property: Property) -> Option<f32> {
        self.values
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Property, f32)> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = (Property, f32)>>(iter: I) -> Self {
        let mut values = PropertyValues::new();
        for (property, value) in iter {
            values.set(property, value);
        }
        values
    }
}

/// Full property state of one render target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetProps {
    values: [f32; 8],
}

impl Default for TargetProps {
    fn default() -> Self {
        let mut values = [0.0; 8];
        for property in Property::ALL {
            values[property.index()] = property.default_value();
        }
        Self { values }
    }
}

impl TargetProps {
    pub fn get(&self, property: Property) -> f32 {
        let value = self.values[property.index()];
        if property.is_discrete() {
            value.round()
        } else {
            value
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        self.values[property.index()] = value;
    }

    /// Apply every assignment in `values`
    pub fn apply(&mut self, values: &PropertyValues) {
        for (property, value) in values.iter() {
            self.set(property, value);
        }
    }

    /// Check if every property is within `epsilon` of `other`
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        Property::ALL
            .iter()
            .all(|p| self.get(*p).approx_eq(&other.get(*p), epsilon))
    }
}

/// Read/write access to render target properties
///
/// Implemented by [`RenderTargets`]; timelines and scrubs only see this trait.
pub trait PropertyStore {
    /// Current value, or None if the target is not registered
    fn property(&self, target: TargetId, property: Property) -> Option<f32>;

    /// Write a value. Writes to unknown targets are dropped.
    fn set_property(&mut self, target: TargetId, property: Property, value: f32);
}

/// Storage for all render targets known to the engine
#[derive(Debug, Default)]
pub struct RenderTargets {
    targets: SlotMap<TargetId, TargetProps>,
}

impl RenderTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, props: TargetProps) -> TargetId {
        self.targets.insert(props)
    }

    pub fn remove(&mut self, id: TargetId) -> Option<TargetProps> {
        self.targets.remove(id)
    }

    pub fn get(&self, id: TargetId) -> Option<&TargetProps> {
        self.targets.get(id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut TargetProps> {
        self.targets.get_mut(id)
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl PropertyStore for RenderTargets {
    fn property(&self, target: TargetId, property: Property) -> Option<f32> {
        self.targets.get(target).map(|t| t.get(property))
    }

    fn set_property(&mut self, target: TargetId, property: Property, value: f32) {
        if let Some(t) = self.targets.get_mut(target) {
            t.set(property, value);
        }
    }
}
