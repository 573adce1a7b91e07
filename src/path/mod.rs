//! Path containers shared by the grid-level and abstract searches.

mod generic_path;
pub use generic_path::Path;

mod world;
pub use world::WorldPath;

/// The cost metric of a search.
///
/// Grid-level searches use a fixed-point scale (see [`crate::neighbors`]); abstract
/// searches count grid steps.
pub type Cost = usize;
