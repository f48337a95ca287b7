pub mod contracts;
pub mod plans;
