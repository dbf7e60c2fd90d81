//! WhatsApp adapter. Implements NotifierPort by sending a message via the Twilio REST API.

use crate::domain::format::format_compact;
use crate::domain::{DomainError, GroupedShoppingList, WeeklyPlan};
use crate::ports::NotifierPort;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const TWILIO_API_URL: &str = "https://api.twilio.com/2010-04-01";
/// Twilio rejects WhatsApp bodies longer than this many characters.
pub const MAX_BODY_CHARS: usize = 1600;
const CHANNEL: &str = "whatsapp";

/// Twilio WhatsApp adapter.
///
/// Requires an account SID and auth token from the Twilio console.
/// `from` is the Twilio (or sandbox) number; `to` the recipient. A missing
/// `whatsapp:` prefix is added.
pub struct WhatsAppNotifier {
    client: Arc<Client>,
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
}

impl WhatsAppNotifier {
    /// Create a new WhatsApp notifier.
    ///
    /// # Arguments
    /// * `account_sid` - Twilio account SID
    /// * `auth_token` - Twilio auth token
    /// * `from` - Sender number, e.g. "whatsapp:+14155238886"
    /// * `to` - Recipient number, e.g. "+6591234567"
    pub fn new(account_sid: String, auth_token: String, from: String, to: String) -> Self {
        Self {
            client: Arc::new(Client::new()),
            account_sid,
            auth_token,
            from: whatsapp_address(&from),
            to: whatsapp_address(&to),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/Accounts/{}/Messages.json", TWILIO_API_URL, self.account_sid)
    }
}

/// Prefix `number` with `whatsapp:` unless already present.
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{}", number)
    }
}

/// Cut `body` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_body(body: &str, max: usize) -> String {
    if body.chars().count() <= max {
        return body.to_string();
    }
    let mut out: String = body.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[async_trait::async_trait]
impl NotifierPort for WhatsAppNotifier {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn deliver(
        &self,
        plan: &WeeklyPlan,
        shopping_list: &GroupedShoppingList,
    ) -> Result<(), DomainError> {
        let body = truncate_body(&format_compact(plan, shopping_list), MAX_BODY_CHARS);
        let form = [
            ("From", self.from.as_str()),
            ("To", self.to.as_str()),
            ("Body", body.as_str()),
        ];

        let res = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| DomainError::delivery(CHANNEL, format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::delivery(
                CHANNEL,
                format!("Twilio API error {}: {}", status, text),
            ));
        }

        let message: MessageResource = res
            .json()
            .await
            .map_err(|e| DomainError::delivery(CHANNEL, format!("Invalid Twilio response: {}", e)))?;
        info!(sid = %message.sid, to = %self.to, "WhatsApp message sent");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_address_prefix() {
        assert_eq!(whatsapp_address("+6591234567"), "whatsapp:+6591234567");
        assert_eq!(whatsapp_address(" whatsapp:+14155238886 "), "whatsapp:+14155238886");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short", 10), "short");
        let cut = truncate_body("🍽️ abcdefghij", 5);
        assert_eq!(cut.chars().count(), 5);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_messages_url() {
        let notifier = WhatsAppNotifier::new(
            "AC123".to_string(),
            "token".to_string(),
            "+1415".to_string(),
            "+65".to_string(),
        );
        assert_eq!(
            notifier.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
        assert_eq!(notifier.from, "whatsapp:+1415");
    }
}
