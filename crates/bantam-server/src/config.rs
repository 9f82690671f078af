use std::path::Path;

use serde::Deserialize;

use bantam_adapters::transport::{CallbackUrls, MailgunConfig, TwilioConfig};

/// Server configuration, loaded from a YAML file. Integrations are
/// optional: a missing section simply leaves that transport unregistered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub integrations: Integrations,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub db_url: String,
    /// Base URL Twilio reaches us back on, without a trailing slash.
    pub callback_url_base: String,
    /// Base URL for one-click stop links, without a trailing slash.
    pub click_url_base: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:21001".into(),
            db_url: "sqlite://bantam.db?mode=rwc".into(),
            callback_url_base: "http://localhost:21001/callbacks".into(),
            click_url_base: "http://localhost:21001/notifications".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Integrations {
    pub twilio: Option<TwilioConfig>,
    pub mailgun: Option<MailgunConfig>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn callback_urls(&self) -> CallbackUrls {
        CallbackUrls {
            callback_url_base: self.service.callback_url_base.clone(),
            click_url_base: self.service.click_url_base.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.service.listen_addr, "0.0.0.0:21001");
        assert!(config.integrations.twilio.is_none());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: Config = serde_yaml::from_str(
            "service:\n  listen_addr: \"127.0.0.1:9000\"\n\
             integrations:\n  twilio:\n    account_sid: AC123\n    auth_token: tok\n    \
             call_from_number: \"+15550001111\"\n    api_base_url: \"https://api.twilio.com/2010-04-01/Accounts/\"\n",
        )
        .unwrap();
        assert_eq!(config.service.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.service.db_url, "sqlite://bantam.db?mode=rwc");
        let twilio = config.integrations.twilio.unwrap();
        assert_eq!(twilio.account_sid, "AC123");
        assert!(config.integrations.mailgun.is_none());
    }
}
