/// View functions
///
/// The UI holds no state of its own; everything is derived from the
/// gallery controller and the thumbnail cache.

pub mod grid;
pub mod header;
pub mod spinner;
pub mod tile;
