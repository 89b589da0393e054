/// Hands a composed alert to the notification transport, one send per recipient
use log::{info, warn};
use tokio::time::{timeout, Duration};

use crate::alert::compose::AlertBatch;
use crate::error::DeliveryError;
use crate::notify::NotificationTransport;

/// Upper bound on a single delivery call.
const SEND_TIMEOUT_SECS: u64 = 10;

pub const ALERT_SUBJECT: &str = "⚠️ Air Quality Alert";

#[derive(Debug)]
pub struct DispatchOutcome {
    pub recipient: String,
    pub result: Result<(), DeliveryError>,
}

/// Deliver the rendered batch to every recipient independently.
///
/// Returns immediately with no transport call when the batch or the
/// recipient list is empty. One recipient's failure never aborts the
/// attempts for the others; failures are notices, not fatal conditions.
pub async fn dispatch(
    batch: &AlertBatch,
    recipients: &[String],
    transport: &dyn NotificationTransport,
) -> Vec<DispatchOutcome> {
    if batch.is_empty() || recipients.is_empty() {
        return Vec::new();
    }

    let html = batch.to_html();
    let mut outcomes = Vec::with_capacity(recipients.len());

    for recipient in recipients {
        let send = transport.send(recipient, ALERT_SUBJECT, &html);
        let result = match timeout(Duration::from_secs(SEND_TIMEOUT_SECS), send).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout {
                seconds: SEND_TIMEOUT_SECS,
            }),
        };

        match &result {
            Ok(()) => info!(
                "Alert email sent to {} via {}",
                recipient,
                transport.name()
            ),
            Err(e) => warn!("Failed to send alert to {}: {}", recipient, e),
        }

        outcomes.push(DispatchOutcome {
            recipient: recipient.clone(),
            result,
        });
    }

    outcomes
}
