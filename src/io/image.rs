//! Raster loading, saving and resampling

use crate::io::error::{MosaicError, Result, WithPath};
use crate::spatial::grid::PixelRect;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;

/// In-memory 8-bit RGB raster used by every pipeline stage
pub type Raster = RgbImage;

/// Resampling filter for thumbnails and report rescaling
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Decode an image file into an RGB raster
///
/// # Errors
///
/// Returns [`MosaicError::ImageLoad`] if the file cannot be opened or decoded
pub fn load_raster(path: &Path) -> Result<Raster> {
    let img = image::open(path).map_err(|e| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgb8())
}

/// Encode a raster to disk, choosing the format from the file extension
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written to the specified path
pub fn save_raster(raster: &Raster, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }

    raster.save(path).map_err(|e| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy a sub-rectangle out of a raster
///
/// # Errors
///
/// Returns [`MosaicError::InvalidParameter`] if the rectangle extends past the raster
pub fn crop(raster: &Raster, rect: PixelRect) -> Result<Raster> {
    if !rect.fits_within(raster.width(), raster.height()) {
        return Err(crate::io::error::invalid_parameter(
            "crop",
            &format!("{}x{}+{}+{}", rect.width, rect.height, rect.x, rect.y),
            &format!(
                "rectangle exceeds {}x{} raster",
                raster.width(),
                raster.height()
            ),
        ));
    }
    Ok(imageops::crop_imm(raster, rect.x, rect.y, rect.width, rect.height).to_image())
}

/// Rescale a raster to exactly `width x height`
pub fn resize(raster: &Raster, width: u32, height: u32) -> Raster {
    if raster.width() == width && raster.height() == height {
        return raster.clone();
    }
    imageops::resize(raster, width, height, RESIZE_FILTER)
}

/// Convert to luma and back so the raster stays three-channel
pub fn to_greyscale(raster: &Raster) -> Raster {
    let luma = imageops::grayscale(raster);
    RgbImage::from_fn(raster.width(), raster.height(), |x, y| {
        let level = luma.get_pixel_checked(x, y).map_or(0, |p| p.0[0]);
        Rgb([level, level, level])
    })
}
