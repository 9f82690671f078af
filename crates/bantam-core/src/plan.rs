use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to reach one person: an ordered list of contact steps, tried in
/// order until the notification is acknowledged or the steps run out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPlan {
    /// Must match a stored [`Person`](crate::person::Person) username.
    pub username: String,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

/// One stored step of a person's plan. `method` is a scheme-qualified URI
/// such as `sms://15551234567`; it is parsed into a
/// [`ContactTarget`](crate::target::ContactTarget) at resolve time so a typo
/// degrades one step, not the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub method: String,
    /// How often to repeat this step while it is active.
    #[serde(with = "humantime_serde")]
    pub notify_every: Duration,
    /// How long to keep at this step before moving to the next.
    #[serde(with = "humantime_serde")]
    pub notify_until: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_serialize_human_readable() {
        let plan = NotificationPlan {
            username: "lancelot".into(),
            steps: vec![PlanStep {
                method: "sms://15551234567".into(),
                notify_every: Duration::from_secs(120),
                notify_until: Duration::from_secs(600),
            }],
        };
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"2m\""));
        assert!(json.contains("\"10m\""));
        let back: NotificationPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn missing_steps_default_to_empty() {
        let plan: NotificationPlan = serde_json::from_str(r#"{"username":"kay"}"#).unwrap();
        assert!(plan.steps.is_empty());
    }
}
