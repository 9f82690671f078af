//! Voice and SMS delivery through the Twilio REST API.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info};

use bantam_core::target::TargetScheme;
use bantam_ports::error::SendError;
use bantam_ports::outbound::ContactSender;
use bantam_ports::types::{Delivery, SendReceipt};

use super::CallbackUrls;

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub call_from_number: String,
    /// Ends with a slash, e.g. `https://api.twilio.com/2010-04-01/Accounts/`.
    pub api_base_url: String,
}

/// Places an outbound call whose call flow is fetched from our TwiML
/// callback, so digits pressed during the call can stop the notification.
pub struct TwilioVoice {
    http: reqwest::Client,
    config: TwilioConfig,
    urls: CallbackUrls,
}

impl TwilioVoice {
    pub fn new(http: reqwest::Client, config: TwilioConfig, urls: CallbackUrls) -> Self {
        Self { http, config, urls }
    }
}

#[async_trait]
impl ContactSender for TwilioVoice {
    async fn send(&self, delivery: &Delivery) -> Result<SendReceipt, SendError> {
        info!(id = %delivery.notification_id, to = %delivery.address, "placing phone call");

        let twiml_url = format!(
            "{}/{}/twiml/notify",
            self.urls.callback_url_base, delivery.notification_id
        );
        let params = [
            ("From", self.config.call_from_number.as_str()),
            ("To", delivery.address.as_str()),
            ("Url", twiml_url.as_str()),
            ("IfMachine", "Hangup"),
            ("Timeout", "20"),
        ];

        let response = self
            .http
            .post(format!(
                "{}{}/Calls.json",
                self.config.api_base_url, self.config.account_sid
            ))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| SendError::DeliveryFailed(e.to_string()))?;

        check_status(response.status())?;
        Ok(SendReceipt::default())
    }

    fn scheme(&self) -> TargetScheme {
        TargetScheme::Voice
    }
}

/// Texts the message with a short acknowledgement code appended; the
/// receipt carries the conversation key that matches an inbound reply
/// containing that code back to the notification.
pub struct TwilioSms {
    http: reqwest::Client,
    config: TwilioConfig,
    urls: CallbackUrls,
}

impl TwilioSms {
    pub fn new(http: reqwest::Client, config: TwilioConfig, urls: CallbackUrls) -> Self {
        Self { http, config, urls }
    }

    /// A text with no acknowledgement code and no conversation bookkeeping,
    /// for clarification and confirmation replies.
    pub async fn send_plain(&self, to: &str, message: &str) -> Result<(), SendError> {
        debug!(to, "sending plain SMS");
        self.post_message(to, message, None).await?;
        Ok(())
    }

    async fn post_message(
        &self,
        to: &str,
        body: &str,
        status_callback: Option<String>,
    ) -> Result<(), SendError> {
        let mut params = vec![
            ("From", self.config.call_from_number.clone()),
            ("To", to.to_string()),
            ("Body", body.to_string()),
        ];
        if let Some(url) = status_callback {
            params.push(("StatusCallback", url));
        }

        let response = self
            .http
            .post(format!(
                "{}{}/Messages.json",
                self.config.api_base_url, self.config.account_sid
            ))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| SendError::DeliveryFailed(e.to_string()))?;

        check_status(response.status())
    }
}

#[async_trait]
impl ContactSender for TwilioSms {
    async fn send(&self, delivery: &Delivery) -> Result<SendReceipt, SendError> {
        let code = ack_code();
        info!(id = %delivery.notification_id, to = %delivery.address, "sending SMS");

        let status_callback = format!(
            "{}/{}/callback",
            self.urls.callback_url_base, delivery.notification_id
        );
        self.post_message(
            &delivery.address,
            &ack_body(&delivery.message, code),
            Some(status_callback),
        )
        .await?;

        Ok(SendReceipt {
            conversation_key: Some(conversation_key(&delivery.address, code)),
            external_id: None,
        })
    }

    fn scheme(&self) -> TargetScheme {
        TargetScheme::Sms
    }
}

fn ack_code() -> u32 {
    rand::thread_rng().gen_range(100..=999)
}

fn ack_body(message: &str, code: u32) -> String {
    format!("{message} - Reply with \"{code}\" to acknowledge")
}

fn conversation_key(recipient: &str, code: u32) -> String {
    format!("{recipient}::{code}")
}

fn check_status(status: reqwest::StatusCode) -> Result<(), SendError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(SendError::DeliveryFailed(format!(
            "twilio returned {status}"
        )))
    }
}
