pub mod color;
/// Frame geometry and colors.
pub mod core;
/// Error type.
pub mod error;
pub(crate) mod math;
