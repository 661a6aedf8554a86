use dishpoll_shared::{Level, Notification, NotificationSink};
use tracing::{info, warn};

/// Prints notifications for the person at the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => {
                info!(kind = %notification.level, "{}", notification.message);
                println!("✓ {}", notification.message);
            }
            Level::Info => {
                info!(kind = %notification.level, "{}", notification.message);
                println!("{}", notification.message);
            }
            Level::Error => {
                warn!(kind = %notification.level, "{}", notification.message);
                eprintln!("✗ {}", notification.message);
            }
        }
    }
}
