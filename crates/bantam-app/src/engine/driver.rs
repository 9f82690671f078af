//! The per-notification driver: walks a notification's escalation tiers,
//! re-driving each contact step on its retry cadence until the step's
//! give-up timer moves the plan along or a stop request ends it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use bantam_core::notification::{Notification, NotificationStep};
use bantam_core::target::TargetScheme;
use bantam_ports::types::Delivery;

use super::EngineInner;

/// What ended the wait after one contact attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitOutcome {
    /// The step's give-up timer expired: advance to the next step.
    GiveUp,
    /// The retry timer expired: re-drive the same step.
    Retry,
    /// The stop signal fired: terminate the whole notification.
    Cancelled,
}

/// What ended a whole step.
enum StepOutcome {
    Advance,
    Cancelled,
}

pub(super) async fn run(
    inner: Arc<EngineInner>,
    notification: Notification,
    cancel: CancellationToken,
) {
    let id = notification.id().clone();
    for (tier, escalation) in notification.escalation_steps().iter().enumerate() {
        for step in escalation.steps() {
            match drive_step(&inner, &notification, step, &cancel).await {
                StepOutcome::Advance => {}
                StepOutcome::Cancelled => {
                    info!(%id, "stop request received, terminating notification");
                    inner.unregister(&id);
                    return;
                }
            }
        }
        debug!(%id, tier, "escalation tier exhausted, escalating");
    }
    info!(%id, "exhausted all escalation steps, removing notification");
    inner.unregister(&id);
}

async fn drive_step(
    inner: &EngineInner,
    notification: &Notification,
    step: &NotificationStep,
    cancel: &CancellationToken,
) -> StepOutcome {
    // the give-up timer spans every attempt of this step, so it is armed
    // once; the retry timer is re-armed per attempt
    let give_up = timer(step.give_up());
    tokio::pin!(give_up);

    loop {
        attempt(inner, notification, step).await;
        let retry = timer(step.retry());
        tokio::pin!(retry);

        match await_timers(give_up.as_mut(), retry.as_mut(), cancel).await {
            WaitOutcome::Cancelled => return StepOutcome::Cancelled,
            WaitOutcome::GiveUp => {
                debug!(id = %notification.id(), "step timer expired, proceeding to next step");
                return StepOutcome::Advance;
            }
            WaitOutcome::Retry => {
                debug!(id = %notification.id(), "retry timer fired, re-driving contact step");
            }
        }
    }
}

/// The three-way wait at the heart of the driver. Biased so that the stop
/// signal always wins, and the give-up timer beats the retry timer when
/// both are due: progression takes priority over another retry.
async fn await_timers(
    mut give_up: Pin<&mut impl Future<Output = ()>>,
    mut retry: Pin<&mut impl Future<Output = ()>>,
    cancel: &CancellationToken,
) -> WaitOutcome {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => WaitOutcome::Cancelled,
        _ = &mut give_up => WaitOutcome::GiveUp,
        _ = &mut retry => WaitOutcome::Retry,
    }
}

/// A timer arm. Zero means the timer is disabled and never fires: a zero
/// retry interval is a single attempt, a zero give-up interval is a step
/// that repeats until cancelled.
async fn timer(interval: Duration) {
    if interval.is_zero() {
        std::future::pending::<()>().await
    } else {
        time::sleep(interval).await
    }
}

/// One contact attempt. Transport failures are logged and treated as a
/// completed attempt; the retry timer alone decides whether the step is
/// re-driven.
async fn attempt(inner: &EngineInner, notification: &Notification, step: &NotificationStep) {
    let id = notification.id();
    let target = step.target();

    match target.scheme() {
        TargetScheme::Noop => {
            info!(%id, %target, "noop notification");
            return;
        }
        TargetScheme::Unknown => {
            warn!(%id, %target, "unknown notification scheme");
            return;
        }
        _ => {}
    }

    let Some(sender) = inner.sender_for(target.scheme()) else {
        warn!(%id, %target, "no transport configured for this scheme");
        return;
    };

    info!(%id, %target, "sending notification");
    let delivery = Delivery {
        notification_id: id.clone(),
        address: target.address().to_string(),
        subject: notification.subject().to_string(),
        message: notification.message().to_string(),
    };
    match sender.send(&delivery).await {
        Ok(receipt) => {
            if let Some(key) = receipt.conversation_key {
                inner.record_conversation(key, id.clone());
            }
        }
        Err(err) => warn!(%id, %target, %err, "notification attempt failed"),
    }
}
