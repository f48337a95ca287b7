pub mod contract_statuses;
pub mod payment_actions;
pub mod payment_statuses;
pub mod payment_types;
