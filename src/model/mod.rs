/// Slide records.
pub mod deck;
/// Design system.
pub mod design;
