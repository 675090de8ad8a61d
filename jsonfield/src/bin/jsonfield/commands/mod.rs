pub mod fill;
pub mod resolve;
pub mod rules;
