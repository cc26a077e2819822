//! Viewport scale
//!
//! The envelope is designed at a fixed base size. On small viewports the
//! whole scene (sizes and animation distances) shrinks by one scale factor so
//! the envelope fits with a fixed margin on every side. It never grows past
//! its base size.

/// A width/height pair in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Scale factor derived from the viewport, always within 0.0..=1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportScale(f32);

impl Default for ViewportScale {
    fn default() -> Self {
        Self::UNIT
    }
}

impl ViewportScale {
    pub const UNIT: ViewportScale = ViewportScale(1.0);

    /// Largest scale at which `base` fits inside `viewport` minus `margin` per side
    pub fn compute(viewport: Size, base: Size, margin: f32) -> Self {
        let fit_width = (viewport.width - 2.0 * margin) / base.width;
        let fit_height = (viewport.height - 2.0 * margin) / base.height;
        let scale = fit_width.min(fit_height).min(1.0);
        if scale.is_nan() {
            return Self::UNIT;
        }
        Self(scale.max(0.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Scale a distance (translation, size) by this factor
    pub fn length(self, value: f32) -> f32 {
        value * self.0
    }

    /// Base size scaled to whole pixels, never rounding past the scaled extent
    ///
    /// The scaled extent fits the viewport, so rounding up could overflow a
    /// fractional viewport by a pixel. Only float noise is rounded up.
    pub fn scaled_size(self, base: Size) -> (u32, u32) {
        (
            snap_down(base.width * self.0),
            snap_down(base.height * self.0),
        )
    }
}

fn snap_down(extent: f32) -> u32 {
    const NOISE: f32 = 1e-3;
    (extent + NOISE).floor().max(0.0) as u32
}
