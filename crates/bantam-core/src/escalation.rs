use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a single escalation tier does. The meaning of the template's
/// `target` depends on the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationMethod {
    /// Notify the on-duty person (`members[0]`). Typically the first tier.
    NotifyOnDuty,
    /// Notify the next member in rotation order. Each occurrence advances
    /// one further; occurrences past the end of the member list are skipped.
    NotifyNextInRotation,
    /// Notify a named person, not necessarily on this team. Target is the
    /// username.
    NotifyOtherPerson,
    /// POST to a webhook. Target is the http(s) URL.
    NotifyWebhook,
    /// Send an email. Target is the address.
    NotifyEmail,
    /// Notify every member in rotation after the on-duty person, one tier
    /// per member.
    NotifyAllInRotation,
}

/// One stored tier of an escalation plan. `wait` is how long the tier is
/// given before escalation proceeds; it drives the give-up interval of
/// tiers synthesized from the template itself (webhook, email), while tiers
/// that expand to a person's plan keep that person's own step timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationStepTemplate {
    #[serde(with = "humantime_serde")]
    pub wait: Duration,
    pub method: EscalationMethod,
    #[serde(default)]
    pub target: String,
}

/// A named, ordered list of escalation tiers, resolved against a team's
/// member list when a team notification is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPlan {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<EscalationStepTemplate>,
}
