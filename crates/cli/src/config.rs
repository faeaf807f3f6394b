use std::path::PathBuf;

use tasktrack_core::color::DEFAULT_SIMILARITY_THRESHOLD;

/// Runner configuration loaded from environment variables.
///
/// Every field has a default; invalid values are logged and replaced by the
/// default rather than aborting.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Start from the demo categories and welcome task.
    pub seed: bool,
    /// Distance at or below which category colors trigger a warning.
    pub color_threshold: f64,
    /// JSON-lines command script; `None` reads stdin.
    pub script: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            seed: true,
            color_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            script: None,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `TASKTRACK_SEED`            | `true`  |
    /// | `TASKTRACK_COLOR_THRESHOLD` | `50`    |
    /// | `TASKTRACK_SCRIPT`          | stdin   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = match lookup("TASKTRACK_SEED").as_deref().map(str::trim) {
            None => defaults.seed,
            Some(v) => parse_bool(v).unwrap_or_else(|| {
                tracing::warn!(value = v, "TASKTRACK_SEED is not a boolean, using default");
                defaults.seed
            }),
        };

        let color_threshold = match lookup("TASKTRACK_COLOR_THRESHOLD") {
            None => defaults.color_threshold,
            Some(v) => match v.trim().parse::<f64>() {
                Ok(t) if t.is_finite() && t >= 0.0 => t,
                _ => {
                    tracing::warn!(value = %v, "TASKTRACK_COLOR_THRESHOLD is invalid, using default");
                    defaults.color_threshold
                }
            },
        };

        let script = lookup("TASKTRACK_SCRIPT")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            seed,
            color_threshold,
            script,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> RunnerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunnerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]), RunnerConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            ("TASKTRACK_SEED", "off"),
            ("TASKTRACK_COLOR_THRESHOLD", "80.5"),
            ("TASKTRACK_SCRIPT", "commands.jsonl"),
        ]);
        assert!(!config.seed);
        assert_eq!(config.color_threshold, 80.5);
        assert_eq!(config.script, Some(PathBuf::from("commands.jsonl")));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = load(&[
            ("TASKTRACK_SEED", "maybe"),
            ("TASKTRACK_COLOR_THRESHOLD", "-3"),
            ("TASKTRACK_SCRIPT", "  "),
        ]);
        assert_eq!(config, RunnerConfig::default());
    }
}
