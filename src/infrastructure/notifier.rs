use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::application::usecases::bookings::Notifier;

/// Log-only notifier. Guest-facing delivery (email, push) hangs off the same
/// trait when a real channel is wired in.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: Uuid, event: &str) -> Result<()> {
        info!(%user_id, event, "notifier: booking event");
        Ok(())
    }
}
