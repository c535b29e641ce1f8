use crate::core::models::TransformerConfig;
use crate::utils::{Logger, Result, TransformError};
use std::path::Path;

/// Name of the transformer config file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "soku.transform.json";

/// Loads `soku.transform.json`, with CLI overrides layered on top
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file if it exists
    pub fn load_from_file(root: &Path) -> Result<Option<TransformerConfig>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(&config_path)?;

        let config: TransformerConfig = serde_json::from_str(&content).map_err(|e| {
            TransformError::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
        })?;

        Ok(Some(config))
    }

    /// CLI flags win over the config file
    pub fn merge_with_cli(
        file_config: Option<TransformerConfig>,
        svg_extensions: Option<Vec<String>>,
        css_module_pattern: Option<String>,
    ) -> TransformerConfig {
        let mut config = file_config.unwrap_or_default();

        if let Some(extensions) = svg_extensions.filter(|e| !e.is_empty()) {
            config.svg_extensions = extensions;
        }
        if let Some(pattern) = css_module_pattern {
            config.css_module_pattern = pattern;
        }

        config
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        serde_json::to_string_pretty(&TransformerConfig::default())
            .unwrap_or_else(|_| "{}".to_string())
    }
}
