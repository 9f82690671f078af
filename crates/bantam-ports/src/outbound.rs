use async_trait::async_trait;

use bantam_core::escalation::EscalationPlan;
use bantam_core::person::Person;
use bantam_core::plan::NotificationPlan;
use bantam_core::rotation::RotationPolicy;
use bantam_core::target::TargetScheme;
use bantam_core::team::Team;

use crate::error::{PortError, SendError};
use crate::types::{Delivery, SendReceipt};

/// A transport capable of delivering one kind of contact attempt. The
/// engine dispatches on `scheme()`.
#[async_trait]
pub trait ContactSender: Send + Sync {
    async fn send(&self, delivery: &Delivery) -> Result<SendReceipt, SendError>;
    fn scheme(&self) -> TargetScheme;
}

#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn save(&self, person: &Person) -> Result<(), PortError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Person>, PortError>;
    async fn list_all(&self) -> Result<Vec<Person>, PortError>;
    async fn delete(&self, username: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait NotificationPlanRepository: Send + Sync {
    async fn save(&self, plan: &NotificationPlan) -> Result<(), PortError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<NotificationPlan>, PortError>;
    async fn delete(&self, username: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn save(&self, team: &Team) -> Result<(), PortError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, PortError>;
    async fn list_all(&self) -> Result<Vec<Team>, PortError>;
    async fn delete(&self, name: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait EscalationPlanRepository: Send + Sync {
    async fn save(&self, plan: &EscalationPlan) -> Result<(), PortError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<EscalationPlan>, PortError>;
    async fn list_all(&self) -> Result<Vec<EscalationPlan>, PortError>;
    async fn delete(&self, name: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait RotationPolicyRepository: Send + Sync {
    async fn save(&self, policy: &RotationPolicy) -> Result<(), PortError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<RotationPolicy>, PortError>;
    async fn list_all(&self) -> Result<Vec<RotationPolicy>, PortError>;
    async fn delete(&self, name: &str) -> Result<(), PortError>;
}
