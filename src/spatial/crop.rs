//! Square crop windows for candidate photos

use crate::io::error::{MosaicError, invalid_parameter};
use crate::spatial::grid::PixelRect;
use std::fmt;
use std::str::FromStr;

/// Where to keep the square when a landscape photo is cropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CropHint {
    /// Keep the left edge
    Left,
    /// Keep the middle
    #[default]
    Center,
    /// Keep the right edge
    Right,
}

impl CropHint {
    /// Every hint, in display order
    pub const ALL: [Self; 3] = [Self::Center, Self::Left, Self::Right];

    /// Lower-case name used on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for CropHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropHint {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(invalid_parameter(
                "crop_hint",
                &s,
                &"expected one of left, center, right",
            )),
        }
    }
}

/// Largest square inside a `width x height` photo
///
/// Portrait photos are always centred vertically; the hint only applies to
/// the horizontal crop of landscape (or square) photos.
pub const fn square_crop(width: u32, height: u32, hint: CropHint) -> PixelRect {
    if height > width {
        return PixelRect::square(0, (height - width) / 2, width);
    }

    let side = height;
    let spare = width - side;
    let x = match hint {
        CropHint::Left => 0,
        CropHint::Center => spare / 2,
        CropHint::Right => spare,
    };
    PixelRect::square(x, 0, side)
}
