//! Email delivery through the Mailgun v3 messages API: a dual plain/HTML
//! message carrying a one-click stop link for the notification.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use bantam_core::ids::NotificationId;
use bantam_core::target::TargetScheme;
use bantam_ports::error::SendError;
use bantam_ports::outbound::ContactSender;
use bantam_ports::types::{Delivery, SendReceipt};

use super::CallbackUrls;

const DEFAULT_SUBJECT: &str = "Bantam alert received";

#[derive(Debug, Clone, Deserialize)]
pub struct MailgunConfig {
    pub api_key: String,
    pub domain: String,
}

pub struct MailgunSender {
    http: reqwest::Client,
    config: MailgunConfig,
    urls: CallbackUrls,
}

impl MailgunSender {
    pub fn new(http: reqwest::Client, config: MailgunConfig, urls: CallbackUrls) -> Self {
        Self { http, config, urls }
    }

    fn stop_link(&self, id: &NotificationId) -> String {
        format!("{}/{}/stop", self.urls.click_url_base, id)
    }
}

#[async_trait]
impl ContactSender for MailgunSender {
    async fn send(&self, delivery: &Delivery) -> Result<SendReceipt, SendError> {
        info!(id = %delivery.notification_id, to = %delivery.address, "sending email");

        let stop = self.stop_link(&delivery.notification_id);
        let subject = if delivery.subject.is_empty() {
            DEFAULT_SUBJECT
        } else {
            &delivery.subject
        };
        let from = format!("Bantam <bantam@{}>", self.config.domain);
        let text = plain_body(&delivery.message, &stop);
        let html = html_body(&delivery.message, &stop);
        let params = [
            ("from", from.as_str()),
            ("to", delivery.address.as_str()),
            ("subject", subject),
            ("text", text.as_str()),
            ("html", html.as_str()),
        ];

        let response = self
            .http
            .post(format!(
                "https://api.mailgun.net/v3/{}/messages",
                self.config.domain
            ))
            .basic_auth("api", Some(&self.config.api_key))
            .form(&params)
            .send()
            .await
            .map_err(|e| SendError::DeliveryFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SendError::DeliveryFailed(format!(
                "mailgun returned {}",
                response.status()
            )));
        }
        Ok(SendReceipt::default())
    }

    fn scheme(&self) -> TargetScheme {
        TargetScheme::Email
    }
}

fn plain_body(message: &str, stop_link: &str) -> String {
    format!(
        "You've received a message from the Bantam alert system:\n\n{message}\n\n\
         Stop notifications for this alert: {stop_link}"
    )
}

fn html_body(message: &str, stop_link: &str) -> String {
    format!(
        "<html><body>You've received a message from the Bantam alert system:<br><br>\
         {message}<br><br><a href=\"{stop_link}\">Stop notifications for this alert</a>\
         </body></html>"
    )
}
