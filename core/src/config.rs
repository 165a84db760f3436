use serde::{Deserialize, Serialize};

/// Runtime configuration, loaded from `{data_dir}/civic.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CivicConfig {
    pub escalation:   EscalationConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Seconds between escalation sweeps.
    pub interval_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub email_enabled: bool,
    #[serde(default = "default_true")]
    pub sms_enabled: bool,
    #[serde(default = "default_sms_prefix")]
    pub sms_prefix: String,
    pub email_from: String,
}

fn default_true() -> bool {
    true
}

fn default_sms_prefix() -> String {
    "CivicApp: ".to_string()
}

impl CivicConfig {
    /// Load from the data/ directory.
    /// In tests, use CivicConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/civic.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: CivicConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.escalation.interval_secs == 0 {
            anyhow::bail!("{path}: escalation.interval_secs must be positive");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            escalation: EscalationConfig {
                interval_secs: 300,
                enabled: true,
            },
            notification: NotificationConfig {
                email_enabled: true,
                sms_enabled: true,
                sms_prefix: default_sms_prefix(),
                email_from: "noreply@civic.test".into(),
            },
        }
    }
}
