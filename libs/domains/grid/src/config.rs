use core_config::{env_or_default, env_parse_optional, env_parse_or, ConfigError, FromEnv};
use std::path::PathBuf;
use std::time::Duration;

/// Placement engine settings.
#[derive(Clone, Debug)]
pub struct PlacementConfig {
    /// Candidates requested from the neighbour index per allocation.
    pub top_n: usize,
    /// Domain the first cell is grown from.
    pub seed_domain: String,
    /// Upper bound on a single neighbour query.
    pub adapter_timeout: Duration,
    /// Seeded RNG for reproducible placement when set.
    pub random_seed: Option<u64>,
    pub embeddings_path: PathBuf,
    pub state_path: PathBuf,
}

impl PlacementConfig {
    pub const DEFAULT_TOP_N: usize = 5;
    pub const DEFAULT_SEED_DOMAIN: &'static str = "google.com";
    pub const DEFAULT_ADAPTER_TIMEOUT_MS: u64 = 5_000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                key: "GRID_TOP_N".to_string(),
                details: "must be at least 1".to_string(),
            });
        }
        if self.seed_domain.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "GRID_SEED_DOMAIN".to_string(),
                details: "must not be empty".to_string(),
            });
        }
        if self.adapter_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "GRID_ADAPTER_TIMEOUT_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl FromEnv for PlacementConfig {
    /// Reads from environment variables:
    /// - GRID_TOP_N: defaults to 5
    /// - GRID_SEED_DOMAIN: defaults to google.com
    /// - GRID_ADAPTER_TIMEOUT_MS: defaults to 5000
    /// - GRID_RANDOM_SEED: optional
    /// - GRID_EMBEDDINGS_PATH: defaults to embeddings.json
    /// - GRID_STATE_PATH: defaults to coordinates_map.json
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            top_n: env_parse_or("GRID_TOP_N", Self::DEFAULT_TOP_N)?,
            seed_domain: env_or_default("GRID_SEED_DOMAIN", Self::DEFAULT_SEED_DOMAIN),
            adapter_timeout: Duration::from_millis(env_parse_or(
                "GRID_ADAPTER_TIMEOUT_MS",
                Self::DEFAULT_ADAPTER_TIMEOUT_MS,
            )?),
            random_seed: env_parse_optional("GRID_RANDOM_SEED")?,
            embeddings_path: env_or_default("GRID_EMBEDDINGS_PATH", "embeddings.json").into(),
            state_path: env_or_default("GRID_STATE_PATH", "coordinates_map.json").into(),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            top_n: Self::DEFAULT_TOP_N,
            seed_domain: Self::DEFAULT_SEED_DOMAIN.to_string(),
            adapter_timeout: Duration::from_millis(Self::DEFAULT_ADAPTER_TIMEOUT_MS),
            random_seed: None,
            embeddings_path: PathBuf::from("embeddings.json"),
            state_path: PathBuf::from("coordinates_map.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "GRID_TOP_N",
        "GRID_SEED_DOMAIN",
        "GRID_ADAPTER_TIMEOUT_MS",
        "GRID_RANDOM_SEED",
        "GRID_EMBEDDINGS_PATH",
        "GRID_STATE_PATH",
    ];

    #[test]
    fn test_placement_config_defaults() {
        temp_env::with_vars(VARS.map(|k| (k, None::<&str>)), || {
            let config = PlacementConfig::from_env().unwrap();
            assert_eq!(config.top_n, 5);
            assert_eq!(config.seed_domain, "google.com");
            assert_eq!(config.adapter_timeout, Duration::from_secs(5));
            assert!(config.random_seed.is_none());
            assert_eq!(config.embeddings_path, PathBuf::from("embeddings.json"));
            assert_eq!(config.state_path, PathBuf::from("coordinates_map.json"));
        });
    }

    #[test]
    fn test_placement_config_custom_values() {
        temp_env::with_vars(
            [
                ("GRID_TOP_N", Some("8")),
                ("GRID_SEED_DOMAIN", Some("wikipedia.org")),
                ("GRID_ADAPTER_TIMEOUT_MS", Some("250")),
                ("GRID_RANDOM_SEED", Some("1234")),
                ("GRID_EMBEDDINGS_PATH", Some("/data/emb.json")),
                ("GRID_STATE_PATH", Some("/data/map.json")),
            ],
            || {
                let config = PlacementConfig::from_env().unwrap();
                assert_eq!(config.top_n, 8);
                assert_eq!(config.seed_domain, "wikipedia.org");
                assert_eq!(config.adapter_timeout, Duration::from_millis(250));
                assert_eq!(config.random_seed, Some(1234));
                assert_eq!(config.state_path, PathBuf::from("/data/map.json"));
            },
        );
    }

    #[test]
    fn test_placement_config_rejects_zero_top_n() {
        temp_env::with_var("GRID_TOP_N", Some("0"), || {
            let err = PlacementConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("GRID_TOP_N"));
        });
    }

    #[test]
    fn test_placement_config_rejects_unparseable_seed() {
        temp_env::with_var("GRID_RANDOM_SEED", Some("not-a-number"), || {
            let err = PlacementConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("GRID_RANDOM_SEED"));
        });
    }
}
