//! Process-wide settings snapshot with optional hot reload.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::{Settings, SettingsLoader};

/// Shared handle to the current settings view.
///
/// Readers take an `Arc<Settings>` snapshot; a reload publishes a new view
/// wholesale, so a reader never observes a partially merged one.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    sender: Arc<watch::Sender<Arc<Settings>>>,
}

impl SettingsHandle {
    /// Create a handle publishing `settings` as the initial view.
    pub fn new(settings: Settings) -> Self {
        let (sender, _) = watch::channel(Arc::new(settings));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// The view current at the time of the call.
    pub fn snapshot(&self) -> Arc<Settings> {
        Arc::clone(&self.sender.borrow())
    }

    /// Replace the current view.
    pub fn replace(&self, settings: Settings) {
        self.sender.send_replace(Arc::new(settings));
    }

    /// Subscribe to view replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Settings>> {
        self.sender.subscribe()
    }
}

impl From<Settings> for SettingsHandle {
    fn from(settings: Settings) -> Self {
        Self::new(settings)
    }
}

/// Poll the settings files every `interval` and publish a re-resolved view
/// whenever one of them changes.
///
/// A reload that fails to resolve is logged and the previous view stays
/// active.
pub fn spawn_reloader(
    loader: SettingsLoader,
    handle: SettingsHandle,
    interval: Duration,
) -> JoinHandle<()> {
    let mut last = loader.fingerprint();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let current = loader.fingerprint();
            if current == last {
                continue;
            }
            last = current;

            match loader.load() {
                Ok(settings) => {
                    info!(entries = settings.len(), "Settings reloaded");
                    handle.replace(settings);
                }
                Err(e) => {
                    warn!("Settings reload failed, keeping previous view: {}", e);
                }
            }
        }
    })
}
