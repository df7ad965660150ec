/// One-to-one assignment when thumbnails may not repeat
pub mod assignment;
/// End-to-end pipeline orchestration
pub mod executor;
/// Spatial penalty on clustered identical choices
pub mod repulsion;
/// Worker pool with batch barriers and indexed result slots
pub mod scheduler;
/// Weighted HSV cost between target cells and candidates
pub mod scoring;
/// Sorted score rows and per-cell candidate choice
pub mod selection;
