//! Twilio-facing callbacks: inbound SMS replies, keypad digits pressed
//! during a call, the TwiML documents that script the call, and delivery
//! status callbacks.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use bantam_core::ids::NotificationId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const CLARIFICATION: &str = "I'm sorry but I don't recognize that response. Please acknowledge \
                             with the three-digit code from the notification you received.";
const CONFIRMATION: &str = "Bantam has received your acknowledgement. Thanks!";

/// Inbound SMS webhook. The conversation key is the sender's number plus
/// the code they texted back; a match stops the notification and clears
/// the conversation entry.
#[derive(Debug, Deserialize)]
pub struct SmsReplyForm {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

pub async fn sms_reply(
    State(state): State<AppState>,
    Form(reply): Form<SmsReplyForm>,
) -> ApiResult<StatusCode> {
    let key = format!("{}::{}", reply.from, reply.body.trim());

    let Some(id) = state.engine.conversation(&key) else {
        info!(from = %reply.from, "unrecognized SMS reply");
        send_text(&state, &reply.from, CLARIFICATION).await;
        return Err(ApiError::NotFound("conversation".into()));
    };
    info!(%id, from = %reply.from, "received SMS acknowledgement");

    if !state.engine.is_in_flight(&id) {
        return Err(ApiError::NotFound(format!("notification {id}")));
    }

    state.engine.clear_conversation(&key);
    state.engine.cancel(&id).await;
    send_text(&state, &reply.from, CONFIRMATION).await;

    Ok(StatusCode::OK)
}

/// Digit-press webhook for in-progress calls. Any digit acknowledges.
#[derive(Debug, Deserialize)]
pub struct DigitsForm {
    #[serde(rename = "Digits", default)]
    pub digits: String,
}

pub async fn receive_digits(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Form(form): Form<DigitsForm>,
) -> ApiResult<Response> {
    if form.digits.is_empty() {
        // answered but nothing pressed; let the call script run its course
        return Ok(twiml("<Response/>".into()));
    }

    let id = parse_id(&uuid)?;
    if !state.engine.is_in_flight(&id) {
        return Err(ApiError::NotFound(format!("notification {uuid}")));
    }

    info!(%id, digits = %form.digits, "digits pressed, stopping notification");
    state.engine.cancel(&id).await;

    Ok(twiml(acknowledged_twiml()))
}

/// The call script Twilio fetches when an outbound call connects: read the
/// message and gather a single digit, posted back to the digits endpoint.
pub async fn twiml_notify(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&uuid)?;
    let Some(message) = state.engine.message_for(&id) else {
        return Err(ApiError::NotFound(format!("notification {uuid}")));
    };

    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <Response><Gather action=\"/callbacks/{uuid}/digits\" numDigits=\"1\" timeout=\"10\">\
         <Say>{}. Press any key to acknowledge this message.</Say>\
         </Gather></Response>",
        escape_xml(&message)
    );
    Ok(twiml(body))
}

pub async fn twiml_acknowledged() -> Response {
    twiml(acknowledged_twiml())
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub uuid: String,
    pub message: String,
}

/// Delivery status callback. Logged only.
pub async fn status_callback(Path(uuid): Path<String>) -> Json<CallbackResponse> {
    info!(uuid = %uuid, "delivery status callback received");
    Json(CallbackResponse {
        uuid,
        message: "Callback received".into(),
    })
}

async fn send_text(state: &AppState, to: &str, message: &str) {
    let Some(sms) = &state.sms else {
        warn!("no SMS transport configured, dropping reply text");
        return;
    };
    if let Err(err) = sms.send_plain(to, message).await {
        warn!(to, %err, "failed to send reply text");
    }
}

fn parse_id(uuid: &str) -> Result<NotificationId, ApiError> {
    NotificationId::parse(uuid).map_err(|_| ApiError::NotFound(format!("notification {uuid}")))
}

fn acknowledged_twiml() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
     <Response><Say>Thank you! Your acknowledgement has been received.</Say><Hangup/></Response>"
        .into()
}

fn twiml(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
