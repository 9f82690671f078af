use std::time::Duration;

use crate::error::DomainError;
use crate::ids::NotificationId;
use crate::target::ContactTarget;

/// One concrete contact attempt: who to reach and on what cadence.
///
/// `retry` is how often the attempt repeats while the step is active; zero
/// means a single attempt. `give_up` is how long the step stays active
/// before the plan advances; zero means the step never expires and repeats
/// until the notification is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationStep {
    target: ContactTarget,
    retry: Duration,
    give_up: Duration,
}

impl NotificationStep {
    pub fn new(target: ContactTarget, retry: Duration, give_up: Duration) -> Self {
        Self {
            target,
            retry,
            give_up,
        }
    }

    pub fn target(&self) -> &ContactTarget {
        &self.target
    }

    pub fn retry(&self) -> Duration {
        self.retry
    }

    pub fn give_up(&self) -> Duration {
        self.give_up
    }
}

/// One escalation tier: the contact steps tried, in order, before the plan
/// escalates to the next tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationStep {
    steps: Vec<NotificationStep>,
}

impl EscalationStep {
    pub fn new(steps: Vec<NotificationStep>) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::StepRequiresContact);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[NotificationStep] {
        &self.steps
    }
}

/// A fully resolved notification job. All plan indirections are expanded at
/// construction time; the engine executes it without further lookups.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    subject: String,
    message: String,
    steps: Vec<EscalationStep>,
}

impl Notification {
    pub fn new(
        subject: String,
        message: String,
        steps: Vec<EscalationStep>,
    ) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::NotificationRequiresStep);
        }
        Ok(Self {
            id: NotificationId::new(),
            subject,
            message,
            steps,
        })
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn escalation_steps(&self) -> &[EscalationStep] {
        &self.steps
    }
}
