//! Stitching chosen thumbnails into the output raster

use crate::algorithm::selection::Selection;
use crate::analysis::candidates::Candidate;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::Raster;
use image::Rgb;

/// Build the `x_tiles * T` by `y_tiles * T` mosaic from a selection
///
/// Each output pixel belongs to cell `(px / T, py / T)` and copies pixel
/// `(px % T, py % T)` of that cell's thumbnail.
///
/// # Errors
///
/// Returns an error if:
/// - `thumbnail_size` is zero
/// - A selected index is outside the candidate pool
/// - A selected thumbnail is not `thumbnail_size` square
pub fn compose(
    selection: &Selection,
    candidates: &[Candidate],
    thumbnail_size: u32,
) -> Result<Raster> {
    if thumbnail_size == 0 {
        return Err(invalid_parameter(
            "thumbnail_size",
            &thumbnail_size,
            &"must be strictly positive",
        ));
    }

    for &index in selection.choices() {
        let candidate = candidates
            .get(index)
            .ok_or(MosaicError::InvalidTileIndex {
                index,
                max_tiles: candidates.len(),
            })?;
        let thumbnail = candidate.thumbnail();
        if thumbnail.width() != thumbnail_size || thumbnail.height() != thumbnail_size {
            return Err(invalid_parameter(
                "thumbnail",
                &candidate.source().display(),
                &format!(
                    "is {}x{}, expected {thumbnail_size}x{thumbnail_size}",
                    thumbnail.width(),
                    thumbnail.height()
                ),
            ));
        }
    }

    let width = selection.x_tiles() as u32 * thumbnail_size;
    let height = selection.y_tiles() as u32 * thumbnail_size;

    Ok(Raster::from_fn(width, height, |px, py| {
        let cell_x = (px / thumbnail_size) as usize;
        let cell_y = (py / thumbnail_size) as usize;
        selection
            .choice(cell_x, cell_y)
            .and_then(|index| candidates.get(index))
            .and_then(|candidate| {
                candidate
                    .thumbnail()
                    .get_pixel_checked(px % thumbnail_size, py % thumbnail_size)
            })
            .copied()
            .unwrap_or(Rgb([0, 0, 0]))
    }))
}
