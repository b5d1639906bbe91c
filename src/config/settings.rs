use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the broker and for logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub log: LogSettings,
}

/// Configuration settings for the broker.
///
/// Controls queue sizing: the shared inbound queue and the per-user mailboxes.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub inbound_capacity: usize,
    pub mailbox_capacity: usize,
}

/// Configuration settings for logging.
#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub broker: Option<PartialBrokerSettings>,
    pub log: Option<PartialLogSettings>,
}

/// Partial broker settings.
///
/// Used for broker configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub inbound_capacity: Option<usize>,
    pub mailbox_capacity: Option<usize>,
}

/// Partial logging settings.
#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            broker: BrokerSettings {
                inbound_capacity: 100,
                mailbox_capacity: 16,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
