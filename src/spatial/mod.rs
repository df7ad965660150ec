/// Output raster assembly from chosen thumbnails
pub mod compositor;
/// Crop hints and square crop windows
pub mod crop;
/// Tile grid geometry over the target image
pub mod grid;
