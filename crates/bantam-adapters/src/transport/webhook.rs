//! Generic webhook delivery: the subject, message, and notification id are
//! POSTed as form fields to the step's literal URL.

use async_trait::async_trait;
use tracing::info;

use bantam_core::target::TargetScheme;
use bantam_ports::error::SendError;
use bantam_ports::outbound::ContactSender;
use bantam_ports::types::{Delivery, SendReceipt};

pub struct WebhookSender {
    http: reqwest::Client,
}

impl WebhookSender {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ContactSender for WebhookSender {
    async fn send(&self, delivery: &Delivery) -> Result<SendReceipt, SendError> {
        info!(id = %delivery.notification_id, url = %delivery.address, "calling webhook");

        let uuid = delivery.notification_id.to_string();
        let params = [
            ("subject", delivery.subject.as_str()),
            ("message", delivery.message.as_str()),
            ("uuid", uuid.as_str()),
        ];

        let response = self
            .http
            .post(&delivery.address)
            .form(&params)
            .send()
            .await
            .map_err(|e| SendError::DeliveryFailed(e.to_string()))?;

        // any non-2xx answer counts as a failed delivery
        if !response.status().is_success() {
            return Err(SendError::DeliveryFailed(format!(
                "webhook returned {}",
                response.status()
            )));
        }
        Ok(SendReceipt::default())
    }

    fn scheme(&self) -> TargetScheme {
        TargetScheme::Webhook
    }
}
