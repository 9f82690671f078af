use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schedule governing automatic reordering of a team's member list. Named
/// after the team it rotates. A zero frequency disables automatic rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// How often the rotation advances; zero means never.
    #[serde(with = "humantime_serde")]
    pub frequency: Duration,
    /// Reference instant the rotation cadence is anchored to.
    pub rotate_time: DateTime<Utc>,
}

impl RotationPolicy {
    pub fn rotation_disabled(&self) -> bool {
        self.frequency.is_zero()
    }
}
