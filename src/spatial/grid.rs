//! Tile grid geometry over the target image
//!
//! Grid coordinates are `(x, y)` with `x` along the width. Arrays built from a
//! layout use ndarray's `[row, col]` order, i.e. `[y, x]`.

use crate::io::error::{Result, invalid_parameter};

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Create a rectangle from its origin and size
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square rectangle with the given origin and side
    pub const fn square(x: u32, y: u32, side: u32) -> Self {
        Self::new(x, y, side, side)
    }

    /// Rectangle covering a whole `width x height` image
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// One past the right edge
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom edge
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the rectangle lies inside a `width x height` image
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Partition of the target image into square cells
///
/// When the image is not an exact multiple of the tile size, the whole
/// remainder is left as a leading border: cells start at `x_offset`/`y_offset`
/// and run to the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of cells across
    pub x_tiles: usize,
    /// Number of cells down
    pub y_tiles: usize,
    /// Side of one cell in target pixels
    pub tile_size: u32,
    /// Unused leading columns
    pub x_offset: u32,
    /// Unused leading rows
    pub y_offset: u32,
}

impl GridLayout {
    /// Compute the layout for a target of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if the tile size is zero or the image is smaller than
    /// one tile in either direction
    pub fn for_image(width: u32, height: u32, tile_size: u32) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &tile_size,
                &"must be strictly positive",
            ));
        }

        let x_tiles = width / tile_size;
        let y_tiles = height / tile_size;
        if x_tiles == 0 || y_tiles == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &tile_size,
                &format!("target image {width}x{height} is smaller than one tile"),
            ));
        }

        Ok(Self {
            x_tiles: x_tiles as usize,
            y_tiles: y_tiles as usize,
            tile_size,
            x_offset: width - x_tiles * tile_size,
            y_offset: height - y_tiles * tile_size,
        })
    }

    /// Total number of cells
    pub const fn tile_count(&self) -> usize {
        self.x_tiles * self.y_tiles
    }

    /// Array shape `(rows, cols)` for per-cell data
    pub const fn shape(&self) -> (usize, usize) {
        (self.y_tiles, self.x_tiles)
    }

    /// Row-major slot index of a cell
    pub const fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.x_tiles + x
    }

    /// Cell coordinates for a row-major slot index
    pub const fn cell_at(&self, index: usize) -> (usize, usize) {
        (index % self.x_tiles, index / self.x_tiles)
    }

    /// Target pixels read by cell `(x, y)`
    pub const fn cell_rect(&self, x: usize, y: usize) -> PixelRect {
        PixelRect::square(
            self.x_offset + x as u32 * self.tile_size,
            self.y_offset + y as u32 * self.tile_size,
            self.tile_size,
        )
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let x_tiles = self.x_tiles;
        (0..self.y_tiles).flat_map(move |y| (0..x_tiles).map(move |x| (x, y)))
    }

    /// Denominator that makes squared grid distances independent of grid size
    pub fn distance_normalization(&self) -> f64 {
        let x = self.x_tiles as f64;
        let y = self.y_tiles as f64;
        x.mul_add(x, y * y)
    }
}

/// Squared distance between two cells divided by `normalization`
pub fn normalized_squared_distance(
    a: (usize, usize),
    b: (usize, usize),
    normalization: f64,
) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    dx.mul_add(dx, dy * dy) / normalization
}
