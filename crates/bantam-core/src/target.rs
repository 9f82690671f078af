use std::fmt;

use url::Url;

use crate::error::DomainError;

/// The finite set of contact mechanisms a step can address. Anything the
/// parser does not recognize lands on `Unknown` so a bad scheme degrades a
/// single step instead of a whole plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetScheme {
    Voice,
    Sms,
    Email,
    Webhook,
    Noop,
    Unknown,
}

impl TargetScheme {
    fn from_scheme(scheme: &str) -> Self {
        match scheme {
            "phone" => Self::Voice,
            "sms" => Self::Sms,
            "email" | "mailto" => Self::Email,
            "http" | "https" => Self::Webhook,
            "noop" => Self::Noop,
            _ => Self::Unknown,
        }
    }
}

/// A parsed contact target. `address` is what the matching transport dials:
/// the host part for phone/SMS, `user@host` for email, the full URL for
/// webhooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactTarget {
    scheme: TargetScheme,
    address: String,
    raw: String,
}

impl ContactTarget {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let url = Url::parse(raw).map_err(|_| DomainError::InvalidTarget(raw.into()))?;
        let scheme = TargetScheme::from_scheme(url.scheme());
        let host = url.host_str().unwrap_or_default();

        let address = match scheme {
            TargetScheme::Webhook => raw.to_string(),
            TargetScheme::Email => {
                if url.username().is_empty() {
                    host.to_string()
                } else {
                    format!("{}@{}", url.username(), host)
                }
            }
            _ => host.to_string(),
        };

        if address.is_empty() && !matches!(scheme, TargetScheme::Noop | TargetScheme::Unknown) {
            return Err(DomainError::InvalidTarget(raw.into()));
        }

        Ok(Self {
            scheme,
            address,
            raw: raw.to_string(),
        })
    }

    pub fn scheme(&self) -> TargetScheme {
        self.scheme
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ContactTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_target_uses_host_as_address() {
        let t = ContactTarget::parse("phone://555-1234").unwrap();
        assert_eq!(t.scheme(), TargetScheme::Voice);
        assert_eq!(t.address(), "555-1234");
    }

    #[test]
    fn sms_target_parses() {
        let t = ContactTarget::parse("sms://15551234567").unwrap();
        assert_eq!(t.scheme(), TargetScheme::Sms);
        assert_eq!(t.address(), "15551234567");
    }

    #[test]
    fn email_target_joins_user_and_host() {
        let t = ContactTarget::parse("email://oncall@example.com").unwrap();
        assert_eq!(t.scheme(), TargetScheme::Email);
        assert_eq!(t.address(), "oncall@example.com");
    }

    #[test]
    fn mailto_is_treated_as_email() {
        let t = ContactTarget::parse("mailto://oncall@example.com").unwrap();
        assert_eq!(t.scheme(), TargetScheme::Email);
        assert_eq!(t.address(), "oncall@example.com");
    }

    #[test]
    fn webhook_target_keeps_full_url() {
        let t = ContactTarget::parse("https://hooks.example.com/alert?x=1").unwrap();
        assert_eq!(t.scheme(), TargetScheme::Webhook);
        assert_eq!(t.address(), "https://hooks.example.com/alert?x=1");
    }

    #[test]
    fn noop_target_parses() {
        let t = ContactTarget::parse("noop://555-1234").unwrap();
        assert_eq!(t.scheme(), TargetScheme::Noop);
    }

    #[test]
    fn unrecognized_scheme_is_unknown() {
        let t = ContactTarget::parse("carrier-pigeon://coop").unwrap();
        assert_eq!(t.scheme(), TargetScheme::Unknown);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(ContactTarget::parse("not a uri").is_err());
    }

    #[test]
    fn display_round_trips_raw_form() {
        let t = ContactTarget::parse("sms://15551234567").unwrap();
        assert_eq!(t.to_string(), "sms://15551234567");
    }
}
