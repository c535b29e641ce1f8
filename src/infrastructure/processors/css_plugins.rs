// PostCSS-style plugin chain for author-level CSS transforms

use crate::core::classifier::match_sass;
use crate::core::interfaces::CssAstProcessor;
use crate::utils::{Logger, Result, TransformError};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use serde::Deserialize;
use std::path::Path;

pub trait CssPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn transform(&self, css: &str, filename: &str) -> Result<String>;
}

/// Encode a browser version the way lightningcss expects it
const fn version(major: u32) -> Option<u32> {
    Some(major << 16)
}

/// Reprints the stylesheet for a set of browser targets, lowering whatever they lack
pub struct TargetedPlugin {
    name: &'static str,
    targets: Browsers,
}

impl TargetedPlugin {
    /// Flattens nested rules for browsers released before native CSS nesting
    pub fn nesting() -> Self {
        Self {
            name: "nesting",
            targets: Browsers {
                chrome: version(100),
                edge: version(100),
                firefox: version(100),
                safari: version(15),
                ios_saf: version(15),
                ..Browsers::default()
            },
        }
    }

    /// Adds vendor prefixes for older engines
    pub fn autoprefixer() -> Self {
        Self {
            name: "autoprefixer",
            targets: Browsers {
                chrome: version(60),
                edge: version(79),
                firefox: version(60),
                safari: version(11),
                ios_saf: version(11),
                android: version(60),
                ..Browsers::default()
            },
        }
    }
}

impl CssPlugin for TargetedPlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn transform(&self, css: &str, filename: &str) -> Result<String> {
        let stylesheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename: filename.to_string(),
                ..ParserOptions::default()
            },
        )
        .map_err(|e| TransformError::CssProcessing(format!("{} ({}): {}", filename, self.name, e)))?;

        let result = stylesheet
            .to_css(PrinterOptions {
                targets: Targets::from(self.targets),
                ..PrinterOptions::default()
            })
            .map_err(|e| TransformError::CssProcessing(format!("{} ({}): {}", filename, self.name, e)))?;

        Ok(result.code)
    }
}

/// Plugin list as written in the config file: `["a", "b"]` or `{ "a": {}, "b": {} }`.
/// Both forms run in the order written.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PluginList {
    Names(Vec<String>),
    Table(serde_json::Map<String, serde_json::Value>),
}

#[derive(Debug, Deserialize)]
struct PluginConfigFile {
    #[serde(default)]
    plugins: Option<PluginList>,
}

pub struct CssPluginManager {
    plugins: Vec<Box<dyn CssPlugin>>,
}

impl CssPluginManager {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn add_plugin(&mut self, plugin: Box<dyn CssPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Build the chain from a config file's contents. Unknown plugins are skipped with a warning.
    pub fn from_config(content: &str) -> Result<Self> {
        let config: PluginConfigFile = serde_json::from_str(content)
            .map_err(|e| TransformError::config(format!("Invalid CSS plugin config: {}", e)))?;

        let names: Vec<String> = match config.plugins {
            Some(PluginList::Names(names)) => names,
            Some(PluginList::Table(table)) => table
                .into_iter()
                .filter(|(_, options)| !matches!(options, serde_json::Value::Bool(false)))
                .map(|(name, _)| name)
                .collect(),
            None => Vec::new(),
        };

        let mut manager = Self::new();
        for name in names {
            match name.as_str() {
                "nesting" | "postcss-nesting" => manager.add_plugin(Box::new(TargetedPlugin::nesting())),
                "autoprefixer" => manager.add_plugin(Box::new(TargetedPlugin::autoprefixer())),
                other => Logger::warn(&format!("Unknown CSS plugin '{}' ignored", other)),
            }
        }

        Ok(manager)
    }

    pub fn process(&self, css: &str, filename: &str) -> Result<String> {
        let mut result = css.to_string();

        for plugin in &self.plugins {
            Logger::debug(&format!("CSS plugin {} on {}", plugin.name(), filename));
            result = plugin.transform(&result, filename)?;
        }

        Ok(result)
    }
}

impl Default for CssPluginManager {
    fn default() -> Self {
        Self::new()
    }
}

/// CSS-AST stage: runs the plugins listed in the project's plugin config.
/// Without a config file the source is returned untouched, and so are Sass
/// sources, which the plugins' plain CSS parser cannot read.
pub struct PluginCssAstProcessor {
    config_file: String,
}

impl PluginCssAstProcessor {
    pub fn new() -> Self {
        Self::with_config_file("postcss.config.json")
    }

    pub fn with_config_file(config_file: &str) -> Self {
        Self {
            config_file: config_file.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl CssAstProcessor for PluginCssAstProcessor {
    async fn process(&self, project_root: &Path, src: &str, filename: &str) -> Result<String> {
        if match_sass(filename).is_some() {
            return Ok(src.to_string());
        }

        let config_path = project_root.join(&self.config_file);

        let content = match tokio::fs::read_to_string(&config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(src.to_string()),
            Err(e) => return Err(e.into()),
        };

        let manager = CssPluginManager::from_config(&content)?;
        if manager.is_empty() {
            return Ok(src.to_string());
        }

        manager.process(src, filename)
    }
}

impl Default for PluginCssAstProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_config_is_identity() {
        let root = tempfile::tempdir().unwrap();
        let src = ".a { .b { color: red } }";

        let out = PluginCssAstProcessor::new()
            .process(root.path(), src, "a.css")
            .await
            .unwrap();
        assert_eq!(out, src);
    }

    #[tokio::test]
    async fn test_nesting_plugin_flattens_rules() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("postcss.config.json"), r#"{"plugins": ["nesting"]}"#).unwrap();

        let out = PluginCssAstProcessor::new()
            .process(root.path(), ".a { & .b { color: red } }", "a.css")
            .await
            .unwrap();
        assert!(out.contains(".a .b"));
    }

    #[tokio::test]
    async fn test_plugin_output_is_stable() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("postcss.config.json"),
            r#"{"plugins": {"nesting": {}, "autoprefixer": {}}}"#,
        )
        .unwrap();

        let processor = PluginCssAstProcessor::new();
        let once = processor
            .process(root.path(), ".a { & .b { color: red } }", "a.css")
            .await
            .unwrap();
        let twice = processor.process(root.path(), &once, "a.css").await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_sass_sources_skip_plugins() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("postcss.config.json"), r#"{"plugins": ["autoprefixer"]}"#).unwrap();

        let processor = PluginCssAstProcessor::new();
        let scss = "$brand: #f00;\n.a { color: $brand; }";
        assert_eq!(processor.process(root.path(), scss, "theme.scss").await.unwrap(), scss);

        let sass = "// note\n.btn\n  color: red\n";
        assert_eq!(processor.process(root.path(), sass, "a.module.sass").await.unwrap(), sass);
    }

    #[test]
    fn test_table_form_keeps_written_order() {
        let manager = CssPluginManager::from_config(r#"{"plugins": {"nesting": {}, "autoprefixer": {}}}"#)
            .unwrap();
        let names: Vec<&str> = manager.plugins.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["nesting", "autoprefixer"]);
    }

    #[test]
    fn test_from_config_skips_unknown_and_disabled() {
        let manager = CssPluginManager::from_config(
            r#"{"plugins": {"tailwindcss": {}, "autoprefixer": false, "nesting": {}}}"#,
        )
        .unwrap();
        assert_eq!(manager.len(), 1);

        let manager = CssPluginManager::from_config("{}").unwrap();
        assert!(manager.is_empty());
    }

    #[test]
    fn test_from_config_rejects_malformed_json() {
        assert!(matches!(
            CssPluginManager::from_config("plugins: []"),
            Err(TransformError::Config(_))
        ));
    }
}
