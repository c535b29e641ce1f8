use crate::core::interfaces::TransformWorker;
use crate::core::models::*;
use crate::infrastructure::processors::minifier::OxcMinifier;
use crate::utils::{count_lines, ErrorContext, Logger, Result, TransformError};
use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::Path;
use std::sync::Arc;

/// Baseline worker: parses with oxc, collects static dependencies and
/// minifies on request. Unminified code is emitted as written.
#[derive(Clone)]
pub struct OxcTransformWorker {
    minifier: Arc<OxcMinifier>,
}

struct WorkerOutput {
    code: String,
    map: Vec<MapSegment>,
    dependencies: Vec<Dependency>,
}

impl OxcTransformWorker {
    pub fn new() -> Self {
        Self {
            minifier: Arc::new(OxcMinifier::new()),
        }
    }

    fn transform_script(&self, filename: &str, source: &str, minify: bool) -> Result<WorkerOutput> {
        let allocator = Allocator::default();
        // Generated stand-ins keep the stylesheet/SVG filename, which oxc does not know
        let source_type = SourceType::from_path(filename).unwrap_or_default();

        let parse_result = Parser::new(&allocator, source, source_type).parse();

        if !parse_result.errors.is_empty() {
            let errors: Vec<String> = parse_result
                .errors
                .iter()
                .map(|e| format!("{}", e))
                .collect();
            let mut context = ErrorContext::new()
                .with_file(filename)
                .with_snippet(source.to_string());
            let offset = parse_result.errors[0]
                .labels
                .as_ref()
                .and_then(|labels| labels.first())
                .map(|label| label.offset());
            if let Some(offset) = offset {
                let (line, column) = line_column(source, offset);
                context = context.with_location(line, column);
            }

            return Err(TransformError::parse_with_context(errors.join("\n"), context));
        }

        let mut program = parse_result.program;
        let dependencies = collect_dependencies(&program.body);

        let (code, map) = if minify {
            let code = self.minifier.minify_program(&allocator, &mut program);
            Logger::debug(&format!(
                "Minified {}: {:.1}% smaller",
                filename,
                self.minifier.calculate_reduction(source, &code)
            ));
            (code, Vec::new())
        } else {
            (source.to_string(), identity_map(source))
        };

        Ok(WorkerOutput {
            code,
            map,
            dependencies,
        })
    }
}

#[async_trait::async_trait]
impl TransformWorker for OxcTransformWorker {
    async fn transform(
        &self,
        _config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        data: &[u8],
        options: &TransformOptions,
    ) -> Result<TransformResponse> {
        let _timer = crate::utils::Timer::start(&format!("Worker {}", filename));

        let output = if options.kind == TransformType::Asset {
            let code = asset_registration(project_root, filename)?;
            WorkerOutput {
                map: identity_map(&code),
                code,
                dependencies: Vec::new(),
            }
        } else {
            let source = String::from_utf8(data.to_vec()).map_err(|e| {
                TransformError::parse_with_context(
                    format!("File is not valid UTF-8: {}", e),
                    ErrorContext::new().with_file(filename),
                )
            })?;

            // oxc is CPU bound; keep it off the async executor
            let worker = self.clone();
            let filename = filename.to_string();
            let minify = options.minify;
            tokio::task::spawn_blocking(move || worker.transform_script(&filename, &source, minify))
                .await
                .map_err(|e| TransformError::build(format!("Worker task failed: {}", e)))??
        };

        Ok(TransformResponse {
            dependencies: output.dependencies,
            output: vec![OutputVariant {
                kind: options.kind.into(),
                data: OutputData {
                    line_count: count_lines(&output.code),
                    code: output.code,
                    map: output.map,
                    function_map: None,
                    css: None,
                },
            }],
        })
    }
}

impl Default for OxcTransformWorker {
    fn default() -> Self {
        Self::new()
    }
}

/// Static `import`/`export … from` specifiers in source order, without duplicates
fn collect_dependencies(body: &[Statement<'_>]) -> Vec<Dependency> {
    let mut dependencies: Vec<Dependency> = Vec::new();

    for stmt in body {
        let specifier = match stmt {
            Statement::ImportDeclaration(decl) if !decl.import_kind.is_type() => {
                Some(decl.source.value.as_str())
            }
            Statement::ExportAllDeclaration(decl) if !decl.export_kind.is_type() => {
                Some(decl.source.value.as_str())
            }
            Statement::ExportNamedDeclaration(decl) if !decl.export_kind.is_type() => {
                decl.source.as_ref().map(|source| source.value.as_str())
            }
            _ => None,
        };

        if let Some(name) = specifier {
            if !dependencies.iter().any(|d| d.name == name) {
                dependencies.push(Dependency::new(name));
            }
        }
    }

    dependencies
}

/// 1-based line and column of a byte offset
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

/// One segment per non-empty line, mapping it onto itself
fn identity_map(code: &str) -> Vec<MapSegment> {
    code.lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, _)| {
            let line = i as u32 + 1;
            (line, 0, line, 0)
        })
        .collect()
}

/// Module standing in for a binary asset: its location and type, no contents
fn asset_registration(project_root: &Path, filename: &str) -> Result<String> {
    let path = Path::new(filename);
    let relative_dir = path
        .parent()
        .map(|dir| dir.strip_prefix(project_root).unwrap_or(dir))
        .map(|dir| dir.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();

    let asset = serde_json::json!({
        "__packager_asset": true,
        "name": path.file_stem().and_then(|s| s.to_str()).unwrap_or_default(),
        "type": path.extension().and_then(|s| s.to_str()).unwrap_or_default(),
        "httpServerLocation": format!("/assets/{}", relative_dir.trim_start_matches('/')),
        "fileSystemLocation": project_root.join(&relative_dir).to_string_lossy().to_string(),
    });

    Ok(format!("module.exports = {};", serde_json::to_string(&asset)?))
}
