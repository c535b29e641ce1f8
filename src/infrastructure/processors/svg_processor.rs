use crate::core::interfaces::{SvgTransformer, TransformWorker};
use crate::core::models::*;
use crate::utils::{Logger, Result, TransformError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

static PROLOG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<\?xml.*?\?>|<!DOCTYPE[^>]*>|<!--.*?-->").unwrap());

/// Turns an SVG file into a React component module and hands it to the worker
pub struct SvgComponentTransformer {
    worker: Arc<dyn TransformWorker>,
}

impl SvgComponentTransformer {
    pub fn new(worker: Arc<dyn TransformWorker>) -> Self {
        Self { worker }
    }

    /// Generate the component source for one SVG document
    pub fn component_source(markup: &str, filename: &str, platform: &str) -> Result<String> {
        let markup = PROLOG.replace_all(markup, "");
        let markup = markup.trim();

        if !markup.starts_with("<svg") {
            return Err(TransformError::Svg(format!(
                "{} does not contain an <svg> root element",
                filename
            )));
        }

        let xml = serde_json::to_string(markup)?;
        let name = component_name(filename);

        let source = if platform == WEB_PLATFORM {
            format!(
                r#"import * as React from "react";

const xml = {xml};

export default function {name}(props) {{
  return React.createElement("span", Object.assign({{}}, props, {{ dangerouslySetInnerHTML: {{ __html: xml }} }}));
}}
"#
            )
        } else {
            format!(
                r#"import * as React from "react";
import {{ SvgXml }} from "react-native-svg";

const xml = {xml};

export default function {name}(props) {{
  return React.createElement(SvgXml, Object.assign({{ xml }}, props));
}}
"#
            )
        };

        Ok(source)
    }
}

/// `icons/arrow-left.svg` → `SvgArrowLeft`
fn component_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let pascal: String = stem
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    format!("Svg{}", pascal)
}

#[async_trait::async_trait]
impl SvgTransformer for SvgComponentTransformer {
    async fn transform(
        &self,
        config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        data: &[u8],
        options: &TransformOptions,
    ) -> Result<TransformResponse> {
        Logger::stage(filename, "svg");

        let markup = String::from_utf8_lossy(data);
        let source = Self::component_source(&markup, filename, &options.platform)?;

        self.worker
            .transform(config, project_root, filename, source.as_bytes(), options)
            .await
    }
}
