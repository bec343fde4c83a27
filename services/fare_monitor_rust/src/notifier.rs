use fare_core::clients::{MessageAck, MessageSender, NotifyError};
use std::sync::Arc;
use tracing::info;

/// Composes the price alert and hands it to the messaging collaborator.
#[derive(Clone)]
pub struct PriceNotifier {
    sender: Arc<dyn MessageSender>,
    destination_label: String,
    currency: String,
}

impl PriceNotifier {
    pub fn new(
        sender: Arc<dyn MessageSender>,
        destination_label: String,
        currency: String,
    ) -> Self {
        Self {
            sender,
            destination_label,
            currency,
        }
    }

    pub fn format_message(&self, price: f64, carrier: &str) -> String {
        format!(
            "New cheapest price to {} found: {:.2} {} with {}.",
            self.destination_label, price, self.currency, carrier
        )
    }

    /// Send one alert. Failures are returned as-is, without retry.
    pub async fn notify(&self, price: f64, carrier: &str) -> Result<MessageAck, NotifyError> {
        let message = self.format_message(price, carrier);
        let ack = self.sender.send(&message).await?;
        info!("Price notification sent: sid={}", ack.sid);
        Ok(ack)
    }
}
