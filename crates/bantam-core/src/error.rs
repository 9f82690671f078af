use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("invalid contact target: {0}")]
    InvalidTarget(String),
    #[error("notification requires at least one escalation step")]
    NotificationRequiresStep,
    #[error("escalation step requires at least one contact step")]
    StepRequiresContact,
}
