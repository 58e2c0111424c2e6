/// Master selection, contrast and logo polarity.
pub mod resolver;
