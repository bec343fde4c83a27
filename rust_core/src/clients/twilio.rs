use super::{MessageAck, MessageSender, NotifyError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Sends WhatsApp messages through the Twilio Messages REST resource.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    #[serde(rename = "To")]
    to: &'a str,
    #[serde(rename = "From")]
    from: &'a str,
    #[serde(rename = "Body")]
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    sid: Option<String>,
}

/// Prefix a phone number with `whatsapp:` unless it already carries it
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else {
        format!("{WHATSAPP_PREFIX}{number}")
    }
}

impl TwilioClient {
    pub fn new(
        base_url: String,
        account_sid: String,
        auth_token: String,
        from_number: &str,
        to_number: &str,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent("FareWatch/1.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            account_sid,
            auth_token,
            from: whatsapp_address(from_number),
            to: whatsapp_address(to_number),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[async_trait]
impl MessageSender for TwilioClient {
    async fn send(&self, body: &str) -> Result<MessageAck, NotifyError> {
        let form = SendRequest {
            to: &self.to,
            from: &self.from,
            body,
        };

        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url()))?;
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        match serde_json::from_str::<SendResponse>(&text) {
            Ok(SendResponse { sid: Some(sid) }) => Ok(MessageAck { sid }),
            _ => Err(NotifyError::MissingSid { body: text }),
        }
    }
}
