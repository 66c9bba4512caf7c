//! Parameter block passed to the packing engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Operation requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum Opcode {
    /// Pack islands into the unit square.
    #[default]
    Pack,
}

/// Engine parameters for one operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackParams {
    /// Operation to run.
    pub opcode: Opcode,

    /// Device the engine should run on.
    pub device_id: String,

    /// Distance between islands in UV units. Scaled along with the islands
    /// after packing, so it is not preserved exactly. Ignored when
    /// `pixel_margin` is positive.
    pub margin: f32,

    /// Exact distance between islands in texture pixels. Only used when
    /// greater than zero.
    pub pixel_margin: f32,

    /// Distance between islands and the packing box border in pixels.
    /// Zero means half of `pixel_margin`.
    pub pixel_padding: f32,

    /// Texture size used to interpret the pixel margin and padding.
    pub pixel_margin_texture_size: u32,

    /// Keep island scale fixed. The engine reports no-space when islands do
    /// not fit.
    pub fixed_scale: bool,

    /// Rotation step in degrees. `None` keeps the engine default; `Some(0)`
    /// disables rotation.
    pub rotation_step: Option<u32>,

    /// Disable pre-rotation of islands.
    pub prerot_disable: bool,

    /// Scale islands to a common average texel density before packing.
    pub normalize_islands: bool,

    /// Pack selected islands around the unselected ones.
    pub pack_to_others: bool,

    /// Honour the face selection flag. When false every island counts as
    /// selected.
    pub process_unselected: bool,

    /// Ask the engine to render invalid islands. `None` keeps the engine
    /// default.
    pub render_invalid_islands: Option<bool>,
}

impl Default for PackParams {
    fn default() -> Self {
        Self {
            opcode: Opcode::default(),
            device_id: "cpu".to_string(),
            margin: 0.003,
            pixel_margin: 0.0,
            pixel_padding: 0.0,
            pixel_margin_texture_size: 2048,
            fixed_scale: false,
            rotation_step: None,
            prerot_disable: false,
            normalize_islands: false,
            pack_to_others: false,
            process_unselected: false,
            render_invalid_islands: None,
        }
    }
}

impl PackParams {
    /// Creates parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device id.
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    /// Sets the margin in UV units.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    /// Sets the pixel margin, padding and texture size.
    pub fn with_pixel_margin(mut self, margin: f32, padding: f32, texture_size: u32) -> Self {
        self.pixel_margin = margin.max(0.0);
        self.pixel_padding = padding.max(0.0);
        self.pixel_margin_texture_size = texture_size;
        self
    }

    /// Sets whether islands keep their scale.
    pub fn with_fixed_scale(mut self, fixed: bool) -> Self {
        self.fixed_scale = fixed;
        self
    }

    /// Forbids any rotation of islands.
    pub fn without_rotation(mut self) -> Self {
        self.rotation_step = Some(0);
        self.prerot_disable = true;
        self
    }

    /// Sets island normalization.
    pub fn with_normalize_islands(mut self, normalize: bool) -> Self {
        self.normalize_islands = normalize;
        self
    }

    /// Packs selected islands into the space left by unselected ones.
    pub fn with_pack_to_others(mut self, enabled: bool) -> Self {
        self.pack_to_others = enabled;
        self.process_unselected = enabled;
        self
    }

    /// Sets whether invalid islands are rendered.
    pub fn with_render_invalid_islands(mut self, render: bool) -> Self {
        self.render_invalid_islands = Some(render);
        self
    }

    /// Returns true if the pixel margin replaces the UV margin.
    pub fn uses_pixel_margin(&self) -> bool {
        self.pixel_margin > 0.0
    }

    /// Returns true if islands may be rotated.
    pub fn allows_rotation(&self) -> bool {
        self.rotation_step != Some(0)
    }
}
