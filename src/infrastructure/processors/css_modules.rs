// CSS Modules: scoped class names with a generated JS mapping

use crate::core::classifier::project_relative;
use crate::core::interfaces::{CssModulesExtractor, CssModulesInput, CssModulesOutput};
use crate::utils::{Logger, Result, TransformError};
use lightningcss::css_modules::{Config as CssModulesConfig, CssModuleExports, CssModuleReference, Pattern};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use std::collections::BTreeMap;

/// Default scoped name: content hash of the file path plus the authored name
pub const DEFAULT_PATTERN: &str = "[hash]_[local]";

pub struct LightningCssModulesExtractor {
    pattern: String,
}

impl LightningCssModulesExtractor {
    pub fn new() -> Self {
        Self::with_pattern(DEFAULT_PATTERN)
    }

    pub fn with_pattern(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }

    fn process(&self, input: &CssModulesInput) -> Result<CssModulesOutput> {
        let pattern = Pattern::parse(&self.pattern).map_err(|e| {
            TransformError::config(format!("Invalid CSS Modules pattern {:?}: {}", self.pattern, e))
        })?;

        // Hash the project-relative path so class names do not depend on the checkout location
        let filename = project_relative(&input.project_root, &input.filename);

        let mut stylesheet = StyleSheet::parse(
            &input.src,
            ParserOptions {
                filename: filename.clone(),
                css_modules: Some(CssModulesConfig {
                    pattern,
                    ..CssModulesConfig::default()
                }),
                ..ParserOptions::default()
            },
        )
        .map_err(|e| TransformError::CssModules(format!("{}: {}", filename, e)))?;

        if input.minify {
            stylesheet
                .minify(MinifyOptions::default())
                .map_err(|e| TransformError::CssModules(format!("{}: {}", filename, e)))?;
        }

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: input.minify,
                ..PrinterOptions::default()
            })
            .map_err(|e| TransformError::CssModules(format!("{}: {}", filename, e)))?;

        let exports = result.exports.map(class_mapping).unwrap_or_default();
        Logger::debug(&format!("{} scoped class name(s) in {}", exports.len(), filename));

        Ok(CssModulesOutput {
            output: format!("module.exports = {};", serde_json::to_string(&exports)?),
            css: result.code,
        })
    }
}

/// Authored name → space-separated scoped names, `composes` included.
/// Cross-file `composes … from` references are not resolved here.
fn class_mapping(exports: CssModuleExports) -> BTreeMap<String, String> {
    exports
        .into_iter()
        .map(|(local, export)| {
            let composed = export.composes.into_iter().filter_map(|reference| match reference {
                CssModuleReference::Local { name } | CssModuleReference::Global { name } => Some(name),
                CssModuleReference::Dependency { .. } => None,
            });

            let classes: Vec<String> = std::iter::once(export.name).chain(composed).collect();
            (local, classes.join(" "))
        })
        .collect()
}

#[async_trait::async_trait]
impl CssModulesExtractor for LightningCssModulesExtractor {
    async fn extract(&self, input: CssModulesInput) -> Result<CssModulesOutput> {
        let _timer = crate::utils::Timer::start(&format!("Extracting CSS Modules {}", input.filename));
        self.process(&input)
    }
}

impl Default for LightningCssModulesExtractor {
    fn default() -> Self {
        Self::new()
    }
}
