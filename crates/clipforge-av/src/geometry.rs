//! Target frame sizes for the two output tiers.
//!
//! Downstream H.264 encodes use 4:2:0 chroma subsampling, so both dimensions
//! must be even. Odd values are always rounded *up*.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed width of the low-definition tier.
pub const LOW_DEF_WIDTH: u32 = 1280;

/// A frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions bumped to the next even value.
    pub fn to_even(self) -> Self {
        Self::new(even(self.width), even(self.height))
    }

    /// `WxH`, the form ffmpeg's `-s` option expects.
    pub fn to_ffmpeg_size(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Round an odd value up to the next even one.
pub const fn even(value: u32) -> u32 {
    if value % 2 == 1 {
        value + 1
    } else {
        value
    }
}

/// High-definition target size.
///
/// Without a requested width, the width is derived from the requested
/// height and the source aspect ratio: `floor(height * src_w / src_h)`.
///
/// # Errors
///
/// [`Error::InvalidInput`] if the source or requested height is zero.
pub fn target_size(
    source: Dimensions,
    requested_width: Option<u32>,
    requested_height: u32,
) -> Result<Dimensions> {
    if requested_height == 0 {
        return Err(Error::InvalidInput("requested height must be positive".into()));
    }

    let width = match requested_width {
        Some(width) => width,
        None => {
            if source.width == 0 || source.height == 0 {
                return Err(Error::InvalidInput(format!(
                    "cannot derive width from source size {source}"
                )));
            }
            scale_floor(requested_height, source.width, source.height)
        }
    };

    Ok(Dimensions::new(width, requested_height).to_even())
}

/// Low-definition size derived from the high-definition one: fixed width of
/// [`LOW_DEF_WIDTH`], height scaled to keep the aspect ratio.
///
/// # Errors
///
/// [`Error::InvalidInput`] if the high-definition width is zero.
pub fn low_def_size(high: Dimensions) -> Result<Dimensions> {
    if high.width == 0 {
        return Err(Error::InvalidInput("high-def width must be positive".into()));
    }
    let height = scale_floor(high.height, LOW_DEF_WIDTH, high.width);
    Ok(Dimensions::new(LOW_DEF_WIDTH, height).to_even())
}

/// `floor(value * num / den)` without intermediate overflow.
fn scale_floor(value: u32, num: u32, den: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(num) / u64::from(den);
    u32::try_from(scaled).unwrap_or(u32::MAX - 1)
}
