//! Identity triples and the cursor-to-texel mapping.
//!
//! The identity pass writes one `(object_id, draw_id, primitive_id)` triple per
//! covered pixel into an unsigned-integer target. A cleared texel is all zeros,
//! which is why object id `0` means background.

use crate::error::{CubePickError, Result};
use crate::geometry::Face;

/// Size in bytes of one identity texel (four `u32` channels).
pub const IDENTITY_TEXEL_SIZE: usize = 16;

/// Object, draw and primitive identifiers read from the identity target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IdentityTriple {
    /// Logical object. Zero for background.
    pub object_id: u32,
    /// Draw call within the object.
    pub draw_id: u32,
    /// Triangle index within the draw call.
    pub primitive_id: u32,
}

impl IdentityTriple {
    /// The cleared texel.
    pub const BACKGROUND: Self = Self::new(0, 0, 0);

    /// Creates a triple.
    pub const fn new(object_id: u32, draw_id: u32, primitive_id: u32) -> Self {
        Self {
            object_id,
            draw_id,
            primitive_id,
        }
    }

    /// Returns true if no object covers the texel.
    pub fn is_background(&self) -> bool {
        self.object_id == 0
    }

    /// Cube face of the primitive, if the index is in range.
    pub fn face(&self) -> Option<Face> {
        Face::from_primitive(self.primitive_id)
    }

    /// Channel values as written by the identity shader. Alpha is unused.
    pub fn to_channels(self) -> [u32; 4] {
        [self.object_id, self.draw_id, self.primitive_id, 0]
    }

    /// Takes the first three channels verbatim.
    pub fn from_channels(channels: [u32; 4]) -> Self {
        Self::new(channels[0], channels[1], channels[2])
    }

    /// Little-endian bytes of one `Rgba32Uint` texel.
    pub fn to_texel_bytes(self) -> [u8; IDENTITY_TEXEL_SIZE] {
        let mut bytes = [0u8; IDENTITY_TEXEL_SIZE];
        for (chunk, channel) in bytes.chunks_exact_mut(4).zip(self.to_channels()) {
            chunk.copy_from_slice(&channel.to_le_bytes());
        }
        bytes
    }

    /// Decodes the first texel in `bytes`. Returns `None` if fewer than 16 bytes.
    pub fn from_texel_bytes(bytes: &[u8]) -> Option<Self> {
        let texel = bytes.get(..IDENTITY_TEXEL_SIZE)?;
        let mut channels = [0u32; 4];
        for (channel, chunk) in channels.iter_mut().zip(texel.chunks_exact(4)) {
            *channel = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Some(Self::from_channels(channels))
    }
}

impl std::fmt::Display for IdentityTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "object {} draw {} primitive {}",
            self.object_id, self.draw_id, self.primitive_id
        )
    }
}

/// Size of the render area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CubePickError::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// `height / width`, the factor applied to the frustum's vertical extents.
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Converts a window cursor to image coordinates, or `None` outside.
    pub fn to_image(&self, cursor: CursorPosition) -> Option<ImageCoord> {
        let x = u32::try_from(cursor.x).ok()?;
        let y = u32::try_from(cursor.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(ImageCoord {
            x,
            y: self.height - 1 - y,
        })
    }

    /// Top-left texel row holding the image-space row `coord.y`.
    pub fn texel_row(&self, coord: ImageCoord) -> u32 {
        self.height - 1 - coord.y
    }
}

/// Cursor in window-client coordinates, origin top-left. May lie outside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

impl CursorPosition {
    /// Sentinel for "no cursor".
    pub const NONE: Self = Self { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncates a fractional window position to its pixel.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_physical(x: f64, y: f64) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }
}

/// Pixel in image coordinates, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageCoord {
    pub x: u32,
    pub y: u32,
}

impl ImageCoord {
    /// Signed pair uploaded as the overlay cursor uniform.
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_uniform(self) -> [i32; 2] {
        [self.x as i32, self.y as i32]
    }
}

/// Overlay cursor uniform for "no cursor".
pub const NO_CURSOR_UNIFORM: [i32; 2] = [-1, -1];
