use crate::core::interfaces::DevCssWrapper;

/// Attribute tagging injected `<style>` elements with the file they came from
pub const STYLE_ID_ATTRIBUTE: &str = "data-soku-css-hmr";

/// Development wrapper: a JS module that appends the stylesheet to `document.head`
/// and removes it again when the module is hot-replaced.
pub struct StyleInjectionWrapper;

impl StyleInjectionWrapper {
    pub fn new() -> Self {
        Self
    }
}

impl DevCssWrapper for StyleInjectionWrapper {
    fn wrap(&self, src: &str, filename: &str) -> String {
        let css = escape_template_literal(src);
        let id = serde_json::Value::String(html_safe_id(filename)).to_string();

        format!(
            r#"(() => {{
  if (typeof document === 'undefined') {{
    return;
  }}
  const head = document.head || document.getElementsByTagName('head')[0];
  const previous = document.querySelector('style[{attr}=' + JSON.stringify({id}) + ']');
  if (previous) {{
    previous.parentNode.removeChild(previous);
  }}
  const style = document.createElement('style');
  style.setAttribute('{attr}', {id});
  style.appendChild(document.createTextNode(`{css}`));
  head.appendChild(style);
  if (typeof module !== 'undefined' && module.hot) {{
    module.hot.dispose(() => {{
      if (style.parentNode) {{
        style.parentNode.removeChild(style);
      }}
    }});
  }}
}})();"#,
            attr = STYLE_ID_ATTRIBUTE,
            id = id,
            css = css,
        )
    }
}

impl Default for StyleInjectionWrapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for embedding in a JS template literal
fn escape_template_literal(src: &str) -> String {
    src.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Filename reduced to characters that are safe in an HTML attribute value
pub fn html_safe_id(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
