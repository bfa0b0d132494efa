//! Request log settings, fixed once at startup.

use std::{sync::OnceLock, time::Duration};

use crate::config::ServerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RequestLogSettings {
    pub(super) slow_request: Duration,
    pub(super) accept_remote_parent: bool,
}

impl Default for RequestLogSettings {
    fn default() -> Self {
        Self {
            slow_request: Duration::from_secs(1),
            accept_remote_parent: false,
        }
    }
}

static SETTINGS: OnceLock<RequestLogSettings> = OnceLock::new();

/// First call wins; later calls are ignored.
pub(super) fn install(config: &ServerConfig) {
    _ = SETTINGS.set(RequestLogSettings {
        slow_request: config.logging.slow_request_threshold(),
        accept_remote_parent: config.telemetry.accepts_remote_parent(),
    });
}

pub(super) fn current() -> RequestLogSettings {
    SETTINGS.get().copied().unwrap_or_default()
}
