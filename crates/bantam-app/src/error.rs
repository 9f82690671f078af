use bantam_core::error::DomainError;
use bantam_ports::error::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("port error: {0}")]
    Port(#[from] PortError),
    #[error("no notification plan for {0}")]
    PlanNotFound(String),
    #[error("no team named {0}")]
    TeamNotFound(String),
    #[error("no escalation plan named {0}")]
    EscalationPlanNotFound(String),
}

impl AppError {
    /// True for the absent-record errors the edge maps to a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PlanNotFound(_)
                | Self::TeamNotFound(_)
                | Self::EscalationPlanNotFound(_)
                | Self::Port(PortError::NotFound)
        )
    }
}
