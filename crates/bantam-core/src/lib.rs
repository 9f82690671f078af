pub mod error;
pub mod escalation;
pub mod ids;
pub mod notification;
pub mod person;
pub mod plan;
pub mod rotation;
pub mod target;
pub mod team;
