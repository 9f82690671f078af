//! The rotation engine: one watcher task per rotation policy, each waking
//! on the policy's cadence to rotate its team's member order. Decoupled
//! from notification delivery; it only shares the persisted Team and
//! RotationPolicy records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use bantam_core::rotation::RotationPolicy;
use bantam_ports::error::PortError;
use bantam_ports::outbound::{RotationPolicyRepository, TeamRepository};

const UPDATE_DEPTH: usize = 10;

pub struct RotationEngine<R, T> {
    policies: R,
    teams: T,
    watchers: Mutex<HashMap<String, mpsc::Sender<()>>>,
}

impl<R, T> RotationEngine<R, T>
where
    R: RotationPolicyRepository + 'static,
    T: TeamRepository + 'static,
{
    pub fn new(policies: R, teams: T) -> Arc<Self> {
        Arc::new(Self {
            policies,
            teams,
            watchers: Mutex::new(HashMap::new()),
        })
    }

    /// Start a watcher for every stored policy. Called once at boot.
    pub async fn start(self: &Arc<Self>) -> Result<(), PortError> {
        for policy in self.policies.list_all().await? {
            self.update_policy(&policy.name);
        }
        Ok(())
    }

    /// Tell the engine a policy was created, changed, or deleted. An
    /// existing watcher is poked to re-examine its policy; otherwise a new
    /// watcher is spawned.
    pub fn update_policy(self: &Arc<Self>, name: &str) {
        let mut watchers = self.lock();
        if let Some(update_tx) = watchers.get(name) {
            if update_tx.try_send(()).is_ok() {
                debug!(policy = name, "notified existing rotation watcher");
                return;
            }
            // watcher exited (policy was deleted earlier); fall through and
            // replace it
        }
        let (update_tx, update_rx) = mpsc::channel(UPDATE_DEPTH);
        watchers.insert(name.to_string(), update_tx);
        info!(policy = name, "starting rotation watcher");
        tokio::spawn(watch(self.clone(), name.to_string(), update_rx));
    }

    /// True while a watcher task is registered for the policy.
    pub fn watching(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, mpsc::Sender<()>>> {
        self.watchers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn unregister(&self, name: &str) {
        self.lock().remove(name);
    }

    async fn rotate_team(&self, name: &str) {
        match self.teams.find_by_name(name).await {
            Ok(Some(mut team)) => {
                team.rotate();
                info!(team = name, order = ?team.members, "rotated team");
                if let Err(err) = self.teams.save(&team).await {
                    warn!(team = name, %err, "failed to store rotated team");
                }
            }
            Ok(None) => warn!(team = name, "rotation fired for a missing team"),
            Err(err) => warn!(team = name, %err, "failed to look up team for rotation"),
        }
    }
}

enum Refresh {
    Policy(RotationPolicy),
    Deleted,
    Unavailable,
}

async fn refresh<R: RotationPolicyRepository>(policies: &R, name: &str) -> Refresh {
    match policies.find_by_name(name).await {
        Ok(Some(policy)) => Refresh::Policy(policy),
        Ok(None) => Refresh::Deleted,
        Err(err) => {
            warn!(policy = name, %err, "failed to refresh rotation policy");
            Refresh::Unavailable
        }
    }
}

/// One watcher. Re-reads its policy on every poke, sleeps until the next
/// rotation instant, rotates, and re-arms on the fixed frequency. Exits
/// when the policy is deleted.
async fn watch<R, T>(engine: Arc<RotationEngine<R, T>>, name: String, mut update_rx: mpsc::Receiver<()>)
where
    R: RotationPolicyRepository + 'static,
    T: TeamRepository + 'static,
{
    let mut policy = match refresh(&engine.policies, &name).await {
        Refresh::Policy(policy) => policy,
        Refresh::Deleted | Refresh::Unavailable => {
            info!(policy = name, "rotation policy gone before first wake, watcher exiting");
            engine.unregister(&name);
            return;
        }
    };
    let mut wake = next_wake(&policy);

    loop {
        tokio::select! {
            update = update_rx.recv() => match update {
                Some(()) => {
                    debug!(policy = %name, "watcher checking for updates");
                    match refresh(&engine.policies, &name).await {
                        Refresh::Policy(updated) => {
                            policy = updated;
                            wake = next_wake(&policy);
                        }
                        Refresh::Deleted => {
                            info!(policy = %name, "rotation policy was deleted, watcher exiting");
                            engine.unregister(&name);
                            return;
                        }
                        Refresh::Unavailable => {}
                    }
                }
                None => {
                    engine.unregister(&name);
                    return;
                }
            },
            _ = sleep_until(wake) => {
                engine.rotate_team(&name).await;
                // subsequent rotations follow the fixed frequency
                wake = Some(time::Instant::now() + policy.frequency);
            }
        }
    }
}

/// The first wake for a policy. Zero frequency disables rotation; a future
/// reference instant starts the cadence there; a past reference waits out
/// the remainder of the current period so wakes stay aligned to
/// `reference + n * frequency`.
fn next_wake(policy: &RotationPolicy) -> Option<time::Instant> {
    if policy.rotation_disabled() {
        info!(policy = %policy.name, "rotation frequency is zero, disabling rotations");
        return None;
    }

    let now = Utc::now();
    let delay = if policy.rotate_time > now {
        (policy.rotate_time - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    } else {
        let elapsed = (now - policy.rotate_time).to_std().unwrap_or(Duration::ZERO);
        let into_period = Duration::from_nanos(
            (elapsed.as_nanos() % policy.frequency.as_nanos()) as u64,
        );
        policy.frequency - into_period
    };
    debug!(policy = %policy.name, ?delay, "next rotation scheduled");
    Some(time::Instant::now() + delay)
}

async fn sleep_until(deadline: Option<time::Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
