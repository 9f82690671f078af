pub mod mailgun;
pub mod twilio;
pub mod webhook;

use serde::Deserialize;

pub use mailgun::{MailgunConfig, MailgunSender};
pub use twilio::{TwilioConfig, TwilioSms, TwilioVoice};
pub use webhook::WebhookSender;

/// Where the outside world reaches back in: `callback_url_base` receives
/// Twilio TwiML and status callbacks, `click_url_base` serves the one-click
/// stop links embedded in emails. Both without a trailing slash.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackUrls {
    pub callback_url_base: String,
    pub click_url_base: String,
}
