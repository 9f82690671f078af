use std::sync::Arc;

use bantam_adapters::persistence::SqliteDb;
use bantam_adapters::transport::TwilioSms;
use bantam_app::engine::Engine;
use bantam_app::resolver::PlanResolver;
use bantam_app::rotation::RotationEngine;

pub type Resolver = PlanResolver<SqliteDb, SqliteDb, SqliteDb>;
pub type Rotations = RotationEngine<SqliteDb, SqliteDb>;

#[derive(Clone)]
pub struct AppState {
    pub db: SqliteDb,
    pub engine: Engine,
    pub resolver: Arc<Resolver>,
    pub rotations: Arc<Rotations>,
    /// Kept for out-of-band clarification and confirmation texts in the
    /// SMS reply handler; `None` when Twilio is not configured.
    pub sms: Option<Arc<TwilioSms>>,
}
