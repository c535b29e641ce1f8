use crate::core::models::{CssMetadata, TransformResponse};
use crate::utils::{count_lines, Result, TransformError};

/// Attach compiled CSS to the single JS module produced by the worker.
///
/// The worker's dependencies are kept as they are; stylesheets never add any.
pub fn attach_css(mut response: TransformResponse, css: String) -> Result<TransformResponse> {
    if response.output.len() != 1 {
        return Err(TransformError::build(format!(
            "expected exactly one JS module output to attach CSS to, got {}",
            response.output.len()
        )));
    }

    let module = &mut response.output[0];
    module.data.css = Some(CssMetadata {
        line_count: count_lines(&css),
        code: css,
        map: Vec::new(),
        function_map: None,
    });

    Ok(response)
}
