use crate::provider::{
    CommandProvider, DecisionProvider, HeuristicProfile, HeuristicProvider, ProviderError,
};
use crate::seat::SeatId;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Table settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub starting_stack: u64,
    /// Shown for reference only; nothing is posted.
    pub small_blind: u64,
    /// Amount every seat owes preflop, and the opening raise increment.
    pub big_blind: u64,
    pub decision_timeout_ms: u64,
    pub think_delay_ms: u64,
    pub provider_attempts: u32,
    pub retry_backoff_ms: u64,
    pub seed: Option<u64>,
    pub providers: ProvidersConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_stack: 1000,
            small_blind: 10,
            big_blind: 20,
            decision_timeout_ms: 10_000,
            think_delay_ms: 1000,
            provider_attempts: 2,
            retry_backoff_ms: 1000,
            seed: None,
            providers: ProvidersConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
    pub claude: ProviderConfig,
}

/// How a non-human seat gets its decisions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Heuristic {
        #[serde(default)]
        bluff: Option<f64>,
        #[serde(default)]
        seed: Option<u64>,
    },
    Command {
        command: Vec<String>,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Heuristic { bluff: None, seed: None }
    }
}

impl ProviderConfig {
    pub fn build(&self, seat: SeatId) -> Result<Arc<dyn DecisionProvider>, ProviderError> {
        let provider: Arc<dyn DecisionProvider> = match self {
            ProviderConfig::Heuristic { bluff, seed } => {
                let mut profile = HeuristicProfile::default();
                if let Some(b) = bluff {
                    profile = profile.with_bluff(*b);
                }
                if let Some(s) = seed {
                    profile = profile.with_seed(*s);
                }
                Arc::new(HeuristicProvider::new(seat.name(), profile))
            }
            ProviderConfig::Command { command } => {
                Arc::new(CommandProvider::new(seat.name(), command)?)
            }
        };
        Ok(provider)
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("provider for {seat}: {source}")]
    Provider { seat: SeatId, source: ProviderError },
}

impl TableConfig {
    /// Read a TOML file, then apply `HOLDEM_TRIO_SEED` if set.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let mut cfg = Self::from_toml(&text)?;
        if let Ok(seed) = std::env::var("HOLDEM_TRIO_SEED") {
            if !seed.is_empty() {
                cfg.seed =
                    Some(seed.parse().map_err(|_| ConfigError::Invalid("invalid seed".into()))?);
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_stack == 0 {
            return Err(ConfigError::Invalid("starting_stack must be > 0".into()));
        }
        // Three stacks must sum without overflow.
        if self.starting_stack > u64::MAX / 3 {
            return Err(ConfigError::Invalid(format!(
                "starting_stack must be at most {}",
                u64::MAX / 3
            )));
        }
        if self.big_blind == 0 {
            return Err(ConfigError::Invalid("big_blind must be > 0".into()));
        }
        if self.decision_timeout_ms == 0 {
            return Err(ConfigError::Invalid("decision_timeout_ms must be > 0".into()));
        }
        if self.provider_attempts == 0 {
            return Err(ConfigError::Invalid("provider_attempts must be >= 1".into()));
        }
        for seat in [SeatId::OpenAi, SeatId::Claude] {
            if let Some(ProviderConfig::Command { command }) = self.provider_for(seat) {
                if command.is_empty() {
                    return Err(ConfigError::Invalid(format!("{} command is empty", seat.key())));
                }
            }
        }
        Ok(())
    }

    pub fn provider_for(&self, seat: SeatId) -> Option<&ProviderConfig> {
        match seat {
            SeatId::User => None,
            SeatId::OpenAi => Some(&self.providers.openai),
            SeatId::Claude => Some(&self.providers.claude),
        }
    }

    pub fn timing(&self) -> ProviderTiming {
        ProviderTiming {
            think_delay: Duration::from_millis(self.think_delay_ms),
            timeout: Duration::from_millis(self.decision_timeout_ms),
            attempts: self.provider_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

/// Pacing for provider requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTiming {
    /// Pause before asking; not counted toward `timeout`.
    pub think_delay: Duration,
    /// Bound on the whole request, retries included.
    pub timeout: Duration,
    pub attempts: u32,
    pub backoff: Duration,
}

impl ProviderTiming {
    /// No pauses; used by tests and headless runs.
    pub fn immediate(timeout: Duration) -> Self {
        Self { think_delay: Duration::ZERO, timeout, attempts: 1, backoff: Duration::ZERO }
    }
}
