/// Current-slide state and the keyboard contract.
pub mod navigator;
