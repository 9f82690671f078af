use serde::{Deserialize, Serialize};

/// Someone who can be notified. The username is the primary key; a person's
/// contact cadence lives in their [`NotificationPlan`](crate::plan::NotificationPlan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub username: String,
    pub full_name: String,
    /// Routing key for VictorOps-style integrations, if the person has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victorops_routing_key: Option<String>,
}
