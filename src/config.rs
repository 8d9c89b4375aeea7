//! Holds the configuration structure (`Config`) and functionality to
//! load configurations.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

/// Configuration structure that holds the options for one generation
/// run.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path to the code repository.
    pub path: Option<String>,
    /// Extra ignore pattern lines, applied at the root of the scan
    /// ahead of any discovered rule file.
    pub ignore: Option<Vec<String>>,
    /// File path to write the generated prompt.
    pub output: Option<String>,
    /// Delimiter for code blocks in the prompt (e.g., "```").
    pub delimiter: Option<String>,
    /// The programming language of the repository (e.g. "rust",
    /// "python"); selects a set of default ignore patterns.
    pub language: Option<String>,
    /// Prompt lines prepended to the generated output.
    pub prompts: Option<Vec<String>>,
    /// If true, honours per-directory rule files found under the root.
    pub use_rules: Option<bool>,
}

pub const DEFAULT_CONFIG_KEY: &str = "base";

/// Name of the optional configuration file read from the working
/// directory.
pub const CONFIG_FILE_NAME: &str = "pluck.yaml";

/// Creates a default base configuration with sensible defaults.
fn create_default_base_config() -> Config {
    Config {
        path: Some(".".to_string()),
        ignore: None,
        output: Some("pluck.out".to_string()),
        delimiter: Some("```".to_string()),
        language: None,
        prompts: None,
        use_rules: Some(true),
    }
}

/// Loads configuration from a local `pluck.yaml` file.
/// The file can contain a single configuration or multiple named
/// configurations. If no file exists or no 'base' config is found,
/// returns a default 'base' config.
pub fn load_config() -> Result<HashMap<String, Config>, Box<dyn std::error::Error>> {
    load_config_from(Path::new(CONFIG_FILE_NAME))
}

/// Loads configuration from an explicit file path; see [`load_config`].
pub fn load_config_from(
    config_path: &Path,
) -> Result<HashMap<String, Config>, Box<dyn std::error::Error>> {
    // If the config file doesn't exist, return default base config
    if !config_path.exists() {
        let mut configs = HashMap::new();
        configs.insert(DEFAULT_CONFIG_KEY.to_string(), create_default_base_config());
        return Ok(configs);
    }

    let contents = fs::read_to_string(config_path)?;

    // Parse the YAML generically first so we can determine its structure
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
    let mapping = yaml_value
        .as_mapping()
        .ok_or("pluck.yaml must contain a mapping at the top level")?;

    // Set of valid Config field names to distinguish between a single
    // config and a map of configs
    const CONFIG_FIELDS: &[&str] = &[
        "path",
        "ignore",
        "output",
        "delimiter",
        "language",
        "prompts",
        "use_rules",
    ];

    // Check if this is a mixed structure (top-level config fields +
    // nested configs)
    let config_field_keys: Vec<_> = mapping
        .keys()
        .filter_map(|k| k.as_str())
        .filter(|key| CONFIG_FIELDS.contains(key))
        .collect();

    let non_config_keys: Vec<_> = mapping
        .keys()
        .filter_map(|k| k.as_str())
        .filter(|key| !CONFIG_FIELDS.contains(key))
        .collect();

    let mut configs = HashMap::new();

    if config_field_keys.is_empty() {
        // No top-level config fields, treat all keys as named
        // configurations
        configs = serde_yaml::from_value(yaml_value)?;
    } else if non_config_keys.is_empty() {
        // All keys are config fields, treat as single config
        let single_config: Config = serde_yaml::from_value(yaml_value)?;
        configs.insert(DEFAULT_CONFIG_KEY.to_string(), single_config);
    } else {
        // Mixed structure: extract top-level config fields for 'base'
        // and nested configs
        let mut base_config_map = serde_yaml::Mapping::new();
        let mut named_configs = HashMap::new();

        for (key, value) in mapping {
            if let Some(key_str) = key.as_str() {
                if CONFIG_FIELDS.contains(&key_str) {
                    base_config_map.insert(key.clone(), value.clone());
                } else {
                    let named_config: Config = serde_yaml::from_value(value.clone())?;
                    named_configs.insert(key_str.to_string(), named_config);
                }
            }
        }

        if !base_config_map.is_empty() {
            let base_config: Config =
                serde_yaml::from_value(serde_yaml::Value::Mapping(base_config_map))?;
            configs.insert(DEFAULT_CONFIG_KEY.to_string(), base_config);
        }

        configs.extend(named_configs);
    };

    // Ensure there's always a 'base' config available
    if !configs.contains_key(DEFAULT_CONFIG_KEY) {
        configs.insert(DEFAULT_CONFIG_KEY.to_string(), create_default_base_config());
    }

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_default_base() {
        let dir = tempdir().unwrap();
        let configs = load_config_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let base = configs.get(DEFAULT_CONFIG_KEY).unwrap();
        assert_eq!(base.path.as_deref(), Some("."));
        assert_eq!(base.output.as_deref(), Some("pluck.out"));
        assert_eq!(base.use_rules, Some(true));
    }

    #[test]
    fn single_config_lands_under_the_base_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "path: src\ndelimiter: '~~~'\n").unwrap();

        let configs = load_config_from(&path).unwrap();
        let base = configs.get(DEFAULT_CONFIG_KEY).unwrap();
        assert_eq!(base.path.as_deref(), Some("src"));
        assert_eq!(base.delimiter.as_deref(), Some("~~~"));
    }

    #[test]
    fn named_configs_are_kept_apart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "docs:\n  path: docs\nfull:\n  path: .\n  use_rules: false\n",
        )
        .unwrap();

        let configs = load_config_from(&path).unwrap();
        assert_eq!(configs.get("docs").unwrap().path.as_deref(), Some("docs"));
        assert_eq!(configs.get("full").unwrap().use_rules, Some(false));
        // A default base is still synthesized.
        assert!(configs.contains_key(DEFAULT_CONFIG_KEY));
    }

    #[test]
    fn mixed_layout_splits_base_from_named() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "path: .\nignore:\n  - '*.lock'\ndocs:\n  path: docs\n").unwrap();

        let configs = load_config_from(&path).unwrap();
        let base = configs.get(DEFAULT_CONFIG_KEY).unwrap();
        assert_eq!(
            base.ignore.as_deref(),
            Some(&["*.lock".to_string()][..])
        );
        assert_eq!(configs.get("docs").unwrap().path.as_deref(), Some("docs"));
    }
}
