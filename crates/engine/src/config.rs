use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How deletion eligibility is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterStrategy {
    /// The page request itself is constrained to records finished
    /// before `now - max_age`; everything returned is deleted.
    #[default]
    #[serde(rename = "server")]
    ServerSide,
    /// Pages are fetched unfiltered and the age check happens locally,
    /// record by record, stopping at the first record that is too
    /// young.
    #[serde(rename = "client")]
    ClientSide,
}

impl FromStr for FilterStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(Self::ServerSide),
            "client" => Ok(Self::ClientSide),
            other => Err(format!(
                "unknown filter strategy {other:?}, expected \"server\" or \"client\""
            )),
        }
    }
}

/// Configuration for one cleanup pass.
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Records older than this are eligible for deletion.
    pub max_age: Duration,
    /// Maximum page size per request. Must be greater than zero.
    pub batch_size: usize,
    /// Eligibility strategy.
    pub strategy: FilterStrategy,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            // 28 days.
            max_age: Duration::from_secs(28 * 24 * 60 * 60),
            batch_size: 100,
            strategy: FilterStrategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_from_config_values() {
        assert_eq!(
            "server".parse::<FilterStrategy>().unwrap(),
            FilterStrategy::ServerSide
        );
        assert_eq!(
            "client".parse::<FilterStrategy>().unwrap(),
            FilterStrategy::ClientSide
        );
        assert!("local".parse::<FilterStrategy>().is_err());
    }
}
