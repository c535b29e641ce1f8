use crate::core::models::*;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Generic JS/TS/asset transform worker producing the baseline module output
#[async_trait]
pub trait TransformWorker: Send + Sync {
    async fn transform(
        &self,
        config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        data: &[u8],
        options: &TransformOptions,
    ) -> Result<TransformResponse>;
}

/// Turns SVG markup into an importable component module
#[async_trait]
pub trait SvgTransformer: Send + Sync {
    async fn transform(
        &self,
        config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        data: &[u8],
        options: &TransformOptions,
    ) -> Result<TransformResponse>;
}

/// Author-level CSS transforms (plugins) run before anything else
#[async_trait]
pub trait CssAstProcessor: Send + Sync {
    async fn process(&self, project_root: &Path, src: &str, filename: &str) -> Result<String>;
}

/// Concrete Sass-family syntax of a stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SassSyntax {
    /// Indented syntax (`.sass`)
    Sass,
    /// Brace syntax (`.scss`)
    Scss,
}

#[async_trait]
pub trait SassCompiler: Send + Sync {
    async fn compile(
        &self,
        project_root: &Path,
        filename: &str,
        src: &str,
        syntax: SassSyntax,
    ) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct CssTransformInput {
    pub filename: String,
    pub code: String,
    pub source_map: bool,
    pub css_modules: bool,
    pub project_root: PathBuf,
    pub minify: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CssTransformOutput {
    pub code: String,
    pub warnings: Vec<String>,
}

/// Minifier / transform engine for plain stylesheets
#[async_trait]
pub trait CssMinifier: Send + Sync {
    async fn transform(&self, input: CssTransformInput) -> Result<CssTransformOutput>;
}

#[derive(Debug, Clone)]
pub struct CssModulesInput {
    pub filename: String,
    pub src: String,
    pub project_root: PathBuf,
    pub dev: bool,
    pub minify: bool,
    pub source_map: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CssModulesOutput {
    /// Generated JS exposing `class name → scoped class name`
    pub output: String,
    /// Stylesheet with scoped selectors
    pub css: String,
}

#[async_trait]
pub trait CssModulesExtractor: Send + Sync {
    async fn extract(&self, input: CssModulesInput) -> Result<CssModulesOutput>;
}

/// Produces a JS module whose side effect is injecting `src` into the running page
pub trait DevCssWrapper: Send + Sync {
    fn wrap(&self, src: &str, filename: &str) -> String;
}
