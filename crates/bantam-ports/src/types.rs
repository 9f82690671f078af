use bantam_core::ids::NotificationId;

/// One contact attempt handed to a transport adapter. The address is
/// already scheme-stripped: a phone number for voice/SMS, `user@host` for
/// email, a full URL for webhooks.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub notification_id: NotificationId,
    pub address: String,
    pub subject: String,
    pub message: String,
}

/// Delivery metadata returned by transports. A conversation key comes back
/// from transports that arranged an out-of-band acknowledgement channel
/// (the SMS reply code); the engine records it so the inbound reply can be
/// matched to the notification.
#[derive(Debug, Clone, Default)]
pub struct SendReceipt {
    pub conversation_key: Option<String>,
    pub external_id: Option<String>,
}
