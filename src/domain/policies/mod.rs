pub mod proration;
pub mod renewal;
