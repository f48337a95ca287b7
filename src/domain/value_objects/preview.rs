use serde::{Deserialize, Serialize};

use crate::domain::value_objects::contracts::RenewalWindow;
use crate::domain::value_objects::plans::PlanDto;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PreviewAction {
    Purchase,
    Renew,
    ChangePlan,
}

/// Read-only preview of what confirming a plan would do. The numbers come
/// from the same policy functions the contract use case commits with.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewDto {
    pub plan: PlanDto,
    pub action: PreviewAction,
    pub renewal_window: Option<RenewalWindow>,
    pub credit_minor: Option<i64>,
    pub price_minor: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewParams {
    pub plan_id: i64,
}
