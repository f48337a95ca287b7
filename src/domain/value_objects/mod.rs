pub mod contracts;
pub mod enums;
pub mod payments;
pub mod plans;
pub mod preview;
