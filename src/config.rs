//! Evaluator configuration.
//!
//! Values come from defaults, then the environment, then explicit
//! `name`/`value` pairs (a front end's option table, the command line).

use std::env;
use std::path::PathBuf;

use log::warn;

/// Environment variable naming the weight file
pub const ENV_NET: &str = "HALFKP_EVAL_NET";

/// Environment variable for the self-check interval
pub const ENV_VERIFY: &str = "HALFKP_EVAL_VERIFY";

/// Default weight file name, resolved relative to the working directory
pub const DEFAULT_NET: &str = "nn.bin";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NnueConfig {
    /// Weight file to load
    pub net_path: PathBuf,
    /// Verify the accumulator against a full rebuild every n incremental
    /// evaluations; 0 disables the check
    pub verify_interval: u32,
}

impl Default for NnueConfig {
    fn default() -> Self {
        NnueConfig {
            net_path: PathBuf::from(DEFAULT_NET),
            verify_interval: 0,
        }
    }
}

impl NnueConfig {
    /// Defaults overridden by `HALFKP_EVAL_NET` and `HALFKP_EVAL_VERIFY`
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = NnueConfig::default();
        if let Ok(path) = env::var(ENV_NET) {
            config.apply_option("evalfile", &path);
        }
        if let Ok(interval) = env::var(ENV_VERIFY) {
            config.apply_option("verify", &interval);
        }
        config
    }

    /// Apply one option. Names are case-insensitive; unknown names and
    /// unparsable values are ignored. Returns whether the option was used.
    pub fn apply_option(&mut self, name: &str, value: &str) -> bool {
        let normalized = name.trim().to_ascii_lowercase();
        let value = value.trim();
        match normalized.as_str() {
            "evalfile" | "nnue" | "net" => {
                if value.is_empty() {
                    return false;
                }
                self.net_path = PathBuf::from(value);
                true
            }
            "verify" | "verify interval" => match value.parse::<u32>() {
                Ok(v) => {
                    self.verify_interval = v;
                    true
                }
                Err(_) => {
                    warn!("Ignoring verify interval '{value}'");
                    false
                }
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NnueConfig::default();
        assert_eq!(config.net_path, PathBuf::from(DEFAULT_NET));
        assert_eq!(config.verify_interval, 0);
    }

    #[test]
    fn test_apply_option_case_insensitive() {
        let mut config = NnueConfig::default();
        assert!(config.apply_option("EvalFile", "nets/halfkp.bin"));
        assert!(config.apply_option(" VERIFY ", "1000"));
        assert_eq!(config.net_path, PathBuf::from("nets/halfkp.bin"));
        assert_eq!(config.verify_interval, 1000);
    }

    #[test]
    fn test_apply_option_rejects_bad_values() {
        let mut config = NnueConfig::default();
        assert!(!config.apply_option("verify", "often"));
        assert!(!config.apply_option("evalfile", "  "));
        assert!(!config.apply_option("hash", "64"));
        assert_eq!(config, NnueConfig::default());
    }
}
