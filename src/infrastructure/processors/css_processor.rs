use crate::core::interfaces::{CssMinifier, CssTransformInput, CssTransformOutput};
use crate::utils::{Logger, Result, TransformError};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use std::sync::{Arc, RwLock};

/// Plain stylesheet compile/minify step backed by lightningcss
pub struct LightningCssMinifier;

impl LightningCssMinifier {
    pub fn new() -> Self {
        Self
    }

    fn process(&self, input: &CssTransformInput) -> Result<CssTransformOutput> {
        let warnings = Arc::new(RwLock::new(Vec::new()));

        let mut stylesheet = StyleSheet::parse(
            &input.code,
            ParserOptions {
                filename: input.filename.clone(),
                warnings: Some(warnings.clone()),
                ..ParserOptions::default()
            },
        )
        .map_err(|e| {
            TransformError::CssProcessing(format!("{}: {}", input.filename, e))
        })?;

        if input.minify {
            stylesheet
                .minify(MinifyOptions::default())
                .map_err(|e| TransformError::CssProcessing(format!("{}: {}", input.filename, e)))?;
        }

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: input.minify,
                ..PrinterOptions::default()
            })
            .map_err(|e| TransformError::CssProcessing(format!("{}: {}", input.filename, e)))?;

        let warnings = warnings
            .read()
            .map(|w| w.iter().map(|warning| warning.to_string()).collect())
            .unwrap_or_default();

        Ok(CssTransformOutput {
            code: result.code,
            warnings,
        })
    }
}

#[async_trait::async_trait]
impl CssMinifier for LightningCssMinifier {
    async fn transform(&self, input: CssTransformInput) -> Result<CssTransformOutput> {
        let _timer = crate::utils::Timer::start(&format!("Processing CSS {}", input.filename));
        Logger::stage(&input.filename, "lightningcss");

        self.process(&input)
    }
}

impl Default for LightningCssMinifier {
    fn default() -> Self {
        Self::new()
    }
}
