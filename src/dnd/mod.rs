/// Drag and drop for the tile grid
///
/// - Grid geometry, hit-testing and nearest-center collision (layout.rs)
/// - Mouse/touch activation state machine (sensor.rs)

pub mod layout;
pub mod sensor;

pub use layout::GridLayout;
pub use sensor::{ActivationConstraint, Outcome, Pointer, PointerSensor};
