//! Region selection: restricts inference to a rectangular sub-window of the
//! input.

use serde::{Deserialize, Serialize};

use crate::error::EmbedError;

/// Size of an input in its own coordinate space (pixels for images).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in input coordinates.
///
/// The same type is handed to the caller and to the inference engine, so no
/// conversion happens between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub origin_x: u32,
    #[serde(default)]
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(origin_x: u32, origin_y: u32, width: u32, height: u32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Returns a box covering the whole extent.
    pub fn full(extent: Extent) -> Self {
        Self::new(0, 0, extent.width, extent.height)
    }

    /// Number of covered cells (pixels).
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Validates `region` against `extent` and returns the window to feed to the
/// engine.
///
/// `None` selects the whole input. A region with a zero side, or whose far
/// edge lies past the extent on either axis, is rejected with
/// [`EmbedError::OutOfBounds`].
pub fn select_region(extent: Extent, region: Option<&BoundingBox>) -> Result<BoundingBox, EmbedError> {
    let Some(region) = region else {
        return Ok(BoundingBox::full(extent));
    };

    let out_of_bounds = || EmbedError::OutOfBounds {
        region: *region,
        extent,
    };

    if region.width == 0 || region.height == 0 {
        return Err(out_of_bounds());
    }

    // u64 so that origin + size cannot wrap.
    let right = region.origin_x as u64 + region.width as u64;
    let bottom = region.origin_y as u64 + region.height as u64;
    if right > extent.width as u64 || bottom > extent.height as u64 {
        return Err(out_of_bounds());
    }

    Ok(*region)
}
