//! Configuration options for cubepick.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CubePickError, Result};
use crate::transform::TransformOptions;

/// Global configuration options for cubepick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Scale, translation and frustum of the model-view-projection.
    pub transform: TransformOptions,

    /// Time source driving the rotation angle.
    pub clock: ClockMode,

    /// How many times the texture repeats across each face.
    pub uv_repeat: f32,

    /// Clear color of the visible target.
    pub clear_color: [f32; 4],

    /// Fill color of the selection highlight.
    pub highlight_color: [f32; 4],

    /// Object id written by the identity pass and expected by the highlight.
    pub object_id: u32,

    /// Draw id written by the identity pass.
    pub draw_id: u32,

    /// Readback strategy for the identity texel.
    pub readback: ReadbackMode,

    /// Source of the per-triangle index in the identity pass.
    pub primitive_index_source: PrimitiveIndexSource,

    /// Optional image file replacing the default checkerboard.
    pub texture_path: Option<PathBuf>,

    /// Initial window width in physical pixels.
    pub window_width: u32,

    /// Initial window height in physical pixels.
    pub window_height: u32,

    /// Window title.
    pub window_title: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            transform: TransformOptions::default(),
            clock: ClockMode::default(),
            uv_repeat: 2.5,
            clear_color: [0.1, 0.1, 0.1, 1.0],
            highlight_color: [0.9, 0.9, 0.9, 1.0],
            object_id: 1,
            draw_id: 1,
            readback: ReadbackMode::default(),
            primitive_index_source: PrimitiveIndexSource::default(),
            texture_path: None,
            window_width: 800,
            window_height: 600,
            window_title: "cubepick".to_string(),
        }
    }
}

impl Options {
    /// Parses options from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading options from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges that would otherwise produce a degenerate frame.
    pub fn validate(&self) -> Result<()> {
        let frustum = &self.transform.frustum;
        if frustum.near <= 0.0 {
            return Err(invalid("transform.frustum.near", "must be positive"));
        }
        if frustum.far <= frustum.near {
            return Err(invalid("transform.frustum.far", "must exceed near"));
        }
        if frustum.right == frustum.left || frustum.top == frustum.bottom {
            return Err(invalid("transform.frustum", "extents must be non-empty"));
        }
        if self.uv_repeat.is_nan() || self.uv_repeat <= 0.0 {
            return Err(invalid("uv_repeat", "must be positive"));
        }
        // The identity target clears to zero, so zero means "nothing hit".
        if self.object_id == 0 {
            return Err(invalid("object_id", "zero is reserved for background"));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid("window size", "dimensions must be non-zero"));
        }
        match self.clock {
            ClockMode::FrameCounter { degrees_per_frame: rate }
            | ClockMode::Elapsed {
                degrees_per_second: rate,
            } if !rate.is_finite() => Err(invalid("clock", "rotation rate must be finite")),
            _ => Ok(()),
        }
    }
}

fn invalid(name: &'static str, reason: &str) -> CubePickError {
    CubePickError::InvalidOption {
        name,
        reason: reason.to_string(),
    }
}

/// Time source for the rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Angle advances by a fixed amount per rendered frame.
    FrameCounter {
        /// Degrees added per frame.
        degrees_per_frame: f32,
    },
    /// Angle follows wall-clock time since the clock started.
    Elapsed {
        /// Degrees added per second.
        degrees_per_second: f32,
    },
}

impl Default for ClockMode {
    fn default() -> Self {
        Self::FrameCounter {
            degrees_per_frame: 0.0725,
        }
    }
}

impl ClockMode {
    /// The elapsed-time clock at its default rate.
    pub fn elapsed() -> Self {
        Self::Elapsed {
            degrees_per_second: 25.0,
        }
    }
}

/// Strategy for reading the identity texel back to the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReadbackMode {
    /// Stall until the GPU finishes the identity pass, then read this frame's texel.
    #[default]
    Blocking,
    /// Poll without waiting; a frame sees the texel of an earlier frame.
    Deferred,
}

/// Where the identity shader gets the triangle index from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PrimitiveIndexSource {
    /// Derived from the vertex index of the non-indexed triangle list.
    #[default]
    VertexIndex,
    /// The rasterizer's built-in primitive index. Needs adapter support.
    Rasterizer,
}
