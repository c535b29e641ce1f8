// Soku Transformer - per-file transform step for the bundler
// Routes each file to one pipeline: SVG module, asset, stylesheet, elided server file or plain script

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod utils;

pub use crate::core::classifier::{classify, FileRequest, Route};
pub use crate::core::models::*;
pub use crate::core::services::{Transformer, SERVER_ONLY_PLACEHOLDER};
pub use crate::utils::{Result, TransformError};

use std::path::Path;

/// Transform one file with the default collaborators for `config`
pub async fn transform(
    config: &TransformerConfig,
    project_root: &Path,
    filename: &str,
    data: &[u8],
    options: &TransformOptions,
) -> Result<TransformResponse> {
    Transformer::from_config(config)
        .transform(config, project_root, filename, data, options)
        .await
}

/// Run a stylesheet through the CSS pipeline with the default collaborators for `config`
pub async fn transform_css(
    config: &TransformerConfig,
    project_root: &Path,
    filename: &str,
    data: &[u8],
    options: &TransformOptions,
) -> Result<TransformResponse> {
    Transformer::from_config(config)
        .transform_css(config, project_root, filename, data, options)
        .await
}
