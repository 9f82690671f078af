mod driver;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bantam_core::ids::NotificationId;
use bantam_core::notification::Notification;
use bantam_core::target::TargetScheme;
use bantam_ports::outbound::ContactSender;

const QUEUE_DEPTH: usize = 100;

/// Handle to the notification engine. Cheap to clone; all clones share the
/// same dispatcher and in-flight registry, so independent engines can
/// coexist in one process (and in one test).
#[derive(Clone)]
pub struct Engine {
    submit_tx: mpsc::Sender<Notification>,
    cancel_tx: mpsc::Sender<NotificationId>,
    inner: Arc<EngineInner>,
}

struct EngineInner {
    senders: HashMap<TargetScheme, Arc<dyn ContactSender>>,
    state: Mutex<EngineState>,
}

/// Everything mutated after registration. One lock guards both maps so
/// unregistration can drop a notification and its conversation keys
/// atomically.
#[derive(Default)]
struct EngineState {
    in_flight: HashMap<NotificationId, InFlight>,
    conversations: HashMap<String, NotificationId>,
}

struct InFlight {
    message: String,
    cancel: CancellationToken,
}

impl Engine {
    /// Build an engine over the given transports and start its dispatcher.
    /// Must be called from within a tokio runtime.
    pub fn new(senders: Vec<Arc<dyn ContactSender>>) -> Self {
        let senders = senders.into_iter().map(|s| (s.scheme(), s)).collect();
        let inner = Arc::new(EngineInner {
            senders,
            state: Mutex::new(EngineState::default()),
        });
        let (submit_tx, submit_rx) = mpsc::channel(QUEUE_DEPTH);
        let (cancel_tx, cancel_rx) = mpsc::channel(QUEUE_DEPTH);
        tokio::spawn(dispatch(inner.clone(), submit_rx, cancel_rx));
        Self {
            submit_tx,
            cancel_tx,
            inner,
        }
    }

    /// Queue a resolved notification for execution. Returns as soon as the
    /// job is on the submission queue; the dispatcher registers it and
    /// starts its driver.
    pub async fn enqueue(&self, notification: Notification) {
        if self.submit_tx.send(notification).await.is_err() {
            warn!("engine dispatcher is gone, dropping notification");
        }
    }

    /// Request termination of an in-flight notification. Fire and forget:
    /// an id that is not in flight is logged and ignored, and duplicate
    /// requests are safe.
    pub async fn cancel(&self, id: &NotificationId) {
        if self.cancel_tx.send(id.clone()).await.is_err() {
            warn!("engine dispatcher is gone, dropping cancel request");
        }
    }

    pub fn is_in_flight(&self, id: &NotificationId) -> bool {
        self.inner.lock().in_flight.contains_key(id)
    }

    /// Message body of an in-flight notification, for voice-prompt
    /// generation.
    pub fn message_for(&self, id: &NotificationId) -> Option<String> {
        self.inner
            .lock()
            .in_flight
            .get(id)
            .map(|entry| entry.message.clone())
    }

    /// Record an SMS reply-correlation key for an in-flight notification.
    pub fn set_conversation(&self, key: impl Into<String>, id: NotificationId) {
        self.inner.lock().conversations.insert(key.into(), id);
    }

    /// Look up the notification an inbound reply belongs to.
    pub fn conversation(&self, key: &str) -> Option<NotificationId> {
        self.inner.lock().conversations.get(key).cloned()
    }

    pub fn clear_conversation(&self, key: &str) {
        self.inner.lock().conversations.remove(key);
    }
}

impl EngineInner {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        // a driver that panicked mid-bookkeeping must not wedge the engine
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sender_for(&self, scheme: TargetScheme) -> Option<&Arc<dyn ContactSender>> {
        self.senders.get(&scheme)
    }

    fn record_conversation(&self, key: String, id: NotificationId) {
        self.lock().conversations.insert(key, id);
    }

    /// Remove a finished notification and any conversation keys still
    /// pointing at it. Runs exactly once per notification, from its driver.
    fn unregister(&self, id: &NotificationId) {
        let mut state = self.lock();
        state.in_flight.remove(id);
        state.conversations.retain(|_, v| *v != *id);
    }
}

/// The dispatch loop: owns both inbound queues, registers submissions, and
/// fires cancellation signals. Runs until every engine handle is dropped.
async fn dispatch(
    inner: Arc<EngineInner>,
    mut submit_rx: mpsc::Receiver<Notification>,
    mut cancel_rx: mpsc::Receiver<NotificationId>,
) {
    loop {
        tokio::select! {
            submission = submit_rx.recv() => match submission {
                Some(notification) => register(&inner, notification),
                None => break,
            },
            request = cancel_rx.recv() => match request {
                Some(id) => fire_cancel(&inner, &id),
                None => break,
            },
        }
    }
}

fn register(inner: &Arc<EngineInner>, notification: Notification) {
    let id = notification.id().clone();
    let cancel = CancellationToken::new();
    inner.lock().in_flight.insert(
        id.clone(),
        InFlight {
            message: notification.message().to_string(),
            cancel: cancel.clone(),
        },
    );
    info!(%id, "initiating notification plan");
    tokio::spawn(driver::run(inner.clone(), notification, cancel));
}

fn fire_cancel(inner: &EngineInner, id: &NotificationId) {
    let state = inner.lock();
    match state.in_flight.get(id) {
        // cancelling a token is idempotent, so late or duplicate requests
        // cannot fault a finished driver
        Some(entry) => {
            info!(%id, "sending stop request to the plan driver");
            entry.cancel.cancel();
        }
        None => info!(%id, "cancel requested for unknown notification"),
    }
}
