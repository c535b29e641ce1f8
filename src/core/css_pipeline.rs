// Stylesheet path: platform stubs, CSS Modules and global CSS

use crate::core::assembler::attach_css;
use crate::core::classifier::{is_css_module, match_sass};
use crate::core::interfaces::{CssModulesInput, CssTransformInput};
use crate::core::models::*;
use crate::core::services::Transformer;
use crate::utils::{Logger, Result, Timer};
use std::path::Path;

/// JS stand-in for CSS Modules on platforms without a DOM
const EMPTY_STYLES_MODULE: &str = "module.exports = {};";

impl Transformer {
    /// Transform a stylesheet into one JS module, with the compiled CSS attached
    /// as metadata on web.
    pub async fn transform_css(
        &self,
        config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        data: &[u8],
        options: &TransformOptions,
    ) -> Result<TransformResponse> {
        let _timer = Timer::start(&format!("Transforming CSS {}", filename));

        if !options.is_web() {
            // No runtime styling off the web; imports of class names still resolve
            let stub = if is_css_module(filename) {
                EMPTY_STYLES_MODULE
            } else {
                ""
            };
            return self
                .worker
                .transform(config, project_root, filename, stub.as_bytes(), options)
                .await;
        }

        let src = String::from_utf8_lossy(data);
        let css = self.preprocess(project_root, filename, &src).await?;

        if is_css_module(filename) {
            self.transform_css_module(config, project_root, filename, css, options)
                .await
        } else {
            self.transform_global_css(config, project_root, filename, css, options)
                .await
        }
    }

    /// CSS-AST plugins, then Sass when the extension asks for it
    async fn preprocess(&self, project_root: &Path, filename: &str, src: &str) -> Result<String> {
        Logger::stage(filename, "css-ast");
        let css = self.css_ast.process(project_root, src, filename).await?;

        match match_sass(filename) {
            Some(syntax) => {
                Logger::stage(filename, "sass");
                self.sass.compile(project_root, filename, &css, syntax).await
            }
            None => Ok(css),
        }
    }

    async fn transform_css_module(
        &self,
        config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        css: String,
        options: &TransformOptions,
    ) -> Result<TransformResponse> {
        Logger::stage(filename, "css-modules");
        let extracted = self
            .css_modules
            .extract(CssModulesInput {
                filename: filename.to_string(),
                src: css,
                project_root: project_root.to_path_buf(),
                dev: options.dev,
                minify: options.minify,
                // Not supported end-to-end yet
                source_map: false,
            })
            .await?;

        let module = self
            .worker
            .transform(config, project_root, filename, extracted.output.as_bytes(), options)
            .await?;

        attach_css(module, extracted.css)
    }

    async fn transform_global_css(
        &self,
        config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        css: String,
        options: &TransformOptions,
    ) -> Result<TransformResponse> {
        Logger::stage(filename, "minify");
        let compiled = self
            .css_minifier
            .transform(CssTransformInput {
                filename: filename.to_string(),
                code: css.clone(),
                source_map: false,
                css_modules: false,
                project_root: project_root.to_path_buf(),
                minify: options.minify,
            })
            .await?;

        if !compiled.warnings.is_empty() {
            // TODO: surface minifier warnings once the bundler has a channel for them
            Logger::debug(&format!(
                "{} CSS warning(s) ignored for {}",
                compiled.warnings.len(),
                filename
            ));
        }

        // Dev injection uses the unminified text; the attached metadata is the compiled text
        let js = if options.dev {
            self.dev_wrapper.wrap(&css, filename)
        } else {
            String::new()
        };

        let module = self
            .worker
            .transform(config, project_root, filename, js.as_bytes(), options)
            .await?;

        attach_css(module, compiled.code)
    }
}
