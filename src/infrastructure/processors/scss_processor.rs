use crate::core::interfaces::{SassCompiler, SassSyntax};
use crate::utils::{Logger, Result, TransformError};
use std::path::{Path, PathBuf};

/// SCSS/SASS compiler using the grass crate
///
/// Emits expanded CSS; minification is left to the later CSS stages.
#[derive(Clone, Default)]
pub struct GrassSassCompiler {
    load_paths: Vec<PathBuf>,
}

impl GrassSassCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra directories searched by `@use`/`@import`, relative ones resolved against the project root
    pub fn with_load_paths(load_paths: Vec<PathBuf>) -> Self {
        Self { load_paths }
    }

    /// Load paths for one file: its own directory, the project root, then configured paths
    fn load_paths_for(&self, project_root: &Path, filename: &str) -> Vec<PathBuf> {
        let file_path = project_root.join(filename);
        let mut paths = Vec::new();

        if let Some(dir) = file_path.parent() {
            paths.push(dir.to_path_buf());
        }
        paths.push(project_root.to_path_buf());
        paths.extend(self.load_paths.iter().map(|p| project_root.join(p)));

        paths
    }
}

fn compile_blocking(
    src: String,
    filename: String,
    syntax: SassSyntax,
    load_paths: Vec<PathBuf>,
) -> Result<String> {
    let input_syntax = match syntax {
        SassSyntax::Sass => grass::InputSyntax::Sass,
        SassSyntax::Scss => grass::InputSyntax::Scss,
    };

    let options = load_paths.iter().fold(
        grass::Options::default()
            .input_syntax(input_syntax)
            .style(grass::OutputStyle::Expanded),
        |options, path| options.load_path(path),
    );

    match grass::from_string(src, &options) {
        Ok(css) => {
            Logger::debug(&format!(
                "SCSS compiled successfully: {} -> {} bytes",
                filename,
                css.len()
            ));
            Ok(css)
        }
        Err(e) => {
            let error_msg = format!("{}: {}", filename, e);
            Logger::error(&error_msg);
            Err(TransformError::Sass(error_msg))
        }
    }
}

#[async_trait::async_trait]
impl SassCompiler for GrassSassCompiler {
    async fn compile(
        &self,
        project_root: &Path,
        filename: &str,
        src: &str,
        syntax: SassSyntax,
    ) -> Result<String> {
        let _timer = crate::utils::Timer::start(&format!("Compiling SCSS {}", filename));

        let load_paths = self.load_paths_for(project_root, filename);
        let src = src.to_string();
        let filename = filename.to_string();

        tokio::task::spawn_blocking(move || compile_blocking(src, filename, syntax, load_paths))
            .await
            .map_err(|e| TransformError::Sass(format!("Sass task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn compile(src: &str, syntax: SassSyntax) -> Result<String> {
        GrassSassCompiler::new()
            .compile(Path::new("/project"), "styles.scss", src, syntax)
            .await
    }

    #[tokio::test]
    async fn test_compile_basic_scss() {
        let css = compile("$primary: #333;\nbody { color: $primary; }", SassSyntax::Scss)
            .await
            .unwrap();
        assert!(css.contains("color: #333"));
        assert!(!css.contains('$'));
    }

    #[tokio::test]
    async fn test_compile_nested_scss() {
        let css = compile(".nav { ul { margin: 0; li { display: inline-block; } } }", SassSyntax::Scss)
            .await
            .unwrap();
        assert!(css.contains(".nav ul li"));
    }

    #[tokio::test]
    async fn test_compile_indented_syntax() {
        let css = compile("$gap: 8px\n.row\n  padding: $gap\n", SassSyntax::Sass)
            .await
            .unwrap();
        assert!(css.contains(".row"));
        assert!(css.contains("padding: 8px"));
    }

    #[tokio::test]
    async fn test_compiled_css_is_stable() {
        let once = compile("$c: red;\n.a { .b { color: $c; } }", SassSyntax::Scss)
            .await
            .unwrap();
        let twice = compile(&once, SassSyntax::Scss).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_compile_error_handling() {
        let result = compile("$primary: ;\nbody { color: $primary; }", SassSyntax::Scss).await;
        assert!(matches!(result, Err(TransformError::Sass(_))));
    }

    #[tokio::test]
    async fn test_imports_resolve_from_the_file_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("styles")).unwrap();
        std::fs::write(root.path().join("styles/_vars.scss"), "$accent: #0af;").unwrap();

        let css = GrassSassCompiler::new()
            .compile(
                root.path(),
                "styles/main.scss",
                "@import 'vars';\n.a { color: $accent; }",
                SassSyntax::Scss,
            )
            .await
            .unwrap();
        assert!(css.contains("color: #0af"));
    }
}
