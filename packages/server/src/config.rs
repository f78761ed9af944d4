//! Command line / environment configuration.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use notifier_shared::time::SystemClock;
use thiserror::Error;

use crate::{infrastructure::messaging_client::BridgeConfig, usecase::ReconnectPolicy};

/// Messaging client implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClientKind {
    /// WhatsApp Web bridge sidecar over HTTP
    Bridge,
    /// Log messages instead of sending them
    DryRun,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("UTC offset of {0} hours is out of range")]
    InvalidUtcOffset(i32),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "notifier-server")]
#[command(about = "Relays payment confirmations to athletes over WhatsApp", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Messaging client implementation
    #[arg(long, env = "MESSAGING_CLIENT", value_enum, default_value_t = ClientKind::Bridge)]
    pub client: ClientKind,

    /// Base URL of the WhatsApp Web bridge
    #[arg(long, env = "BRIDGE_URL", default_value = "http://127.0.0.1:8085")]
    pub bridge_url: String,

    /// Session name used on the bridge
    #[arg(long, env = "CLIENT_ID", default_value = "payment-bot")]
    pub client_id: String,

    /// Interval between bridge session polls, in milliseconds
    #[arg(long, env = "BRIDGE_POLL_INTERVAL_MS", default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Timeout for each bridge request, in seconds
    #[arg(long, env = "BRIDGE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Delay before each reconnect attempt, in seconds
    #[arg(long, env = "RECONNECT_DELAY_SECS", default_value_t = 5)]
    pub reconnect_delay_secs: u64,

    /// Consecutive reconnect attempts before giving up
    #[arg(long, env = "MAX_RECONNECT_ATTEMPTS", default_value_t = 5)]
    pub max_reconnect_attempts: u32,

    /// UTC offset (hours) used for the date printed in messages
    #[arg(long, env = "UTC_OFFSET_HOURS", default_value_t = -3, allow_negative_numbers = true)]
    pub utc_offset_hours: i32,
}

impl Args {
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            delay: Duration::from_secs(self.reconnect_delay_secs),
            max_attempts: self.max_reconnect_attempts,
        }
    }

    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            base_url: self.bridge_url.clone(),
            client_id: self.client_id.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn clock(&self) -> Result<SystemClock, ConfigError> {
        SystemClock::with_utc_offset_hours(self.utc_offset_hours)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_hours))
    }
}
