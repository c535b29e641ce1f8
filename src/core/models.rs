use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Platform identifier of web-capable builds
pub const WEB_PLATFORM: &str = "web";

/// Transformer configuration shared by every call of a build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerConfig {
    /// Extensions (without the dot) routed to the SVG transformer when `svg-modules` is on
    #[serde(default = "default_svg_extensions")]
    pub svg_extensions: Vec<String>,
    /// Scoped class name pattern for CSS Modules, in lightningcss pattern syntax
    #[serde(default = "default_css_module_pattern")]
    pub css_module_pattern: String,
    /// Extra directories searched by `@use`/`@import` in Sass sources
    #[serde(default)]
    pub sass_load_paths: Vec<PathBuf>,
    /// File in the project root listing CSS-AST plugins
    #[serde(default = "default_css_plugin_config")]
    pub css_plugin_config: String,
}

fn default_svg_extensions() -> Vec<String> {
    vec!["svg".to_string()]
}

fn default_css_module_pattern() -> String {
    "[hash]_[local]".to_string()
}

fn default_css_plugin_config() -> String {
    "postcss.config.json".to_string()
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            svg_extensions: default_svg_extensions(),
            css_module_pattern: default_css_module_pattern(),
            sass_load_paths: Vec::new(),
            css_plugin_config: default_css_plugin_config(),
        }
    }
}

/// How the bundler intends to use the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformType {
    #[default]
    Module,
    Script,
    /// Generic asset marker
    Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Client,
    #[default]
    Other,
}

impl Environment {
    fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("client") => Environment::Client,
            _ => Environment::Other,
        }
    }
}

/// Recognized `customTransformOptions` flags.
///
/// Deserialized from the open option bag the bundler forwards: unknown keys
/// are ignored and missing keys keep their inert default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Value>")]
pub struct CustomTransformOptions {
    #[serde(rename = "svg-modules")]
    pub svg_modules: bool,
    #[serde(rename = "css-modules")]
    pub css_modules: bool,
    pub environment: Environment,
}

impl From<HashMap<String, Value>> for CustomTransformOptions {
    fn from(bag: HashMap<String, Value>) -> Self {
        Self {
            svg_modules: bag.get("svg-modules").is_some_and(is_truthy),
            css_modules: bag.get("css-modules").is_some_and(is_truthy),
            environment: bag
                .get("environment")
                .map(Environment::from_value)
                .unwrap_or_default(),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Per-call build options, read-only for the whole transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    pub platform: String,
    #[serde(default)]
    pub dev: bool,
    #[serde(default)]
    pub minify: bool,
    #[serde(rename = "type", default)]
    pub kind: TransformType,
    #[serde(default)]
    pub custom_transform_options: CustomTransformOptions,
}

impl TransformOptions {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            dev: false,
            minify: false,
            kind: TransformType::Module,
            custom_transform_options: CustomTransformOptions::default(),
        }
    }

    pub fn is_web(&self) -> bool {
        self.platform == WEB_PLATFORM
    }

    pub fn is_client_environment(&self) -> bool {
        self.custom_transform_options.environment == Environment::Client
    }
}

/// Source map segment: generated line, generated column, original line, original column.
/// Lines are 1-based, columns 0-based.
pub type MapSegment = (u32, u32, u32, u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMap {
    pub names: Vec<String>,
    pub mappings: String,
}

/// Compiled stylesheet riding along a JS module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssMetadata {
    pub code: String,
    pub line_count: usize,
    pub map: Vec<MapSegment>,
    pub function_map: Option<FunctionMap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputData {
    pub code: String,
    pub line_count: usize,
    pub map: Vec<MapSegment>,
    pub function_map: Option<FunctionMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<CssMetadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    #[serde(rename = "js/script")]
    Script,
    #[serde(rename = "js/module")]
    Module,
    #[serde(rename = "js/module/asset")]
    ModuleAsset,
}

impl From<TransformType> for OutputType {
    fn from(kind: TransformType) -> Self {
        match kind {
            TransformType::Module => OutputType::Module,
            TransformType::Script => OutputType::Script,
            TransformType::Asset => OutputType::ModuleAsset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputVariant {
    #[serde(rename = "type")]
    pub kind: OutputType,
    pub data: OutputData,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformResponse {
    pub dependencies: Vec<Dependency>,
    pub output: Vec<OutputVariant>,
}
