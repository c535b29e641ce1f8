use crate::core::classifier::{classify, FileRequest, Route};
use crate::core::interfaces::*;
use crate::core::models::*;
use crate::infrastructure::{
    GrassSassCompiler, LightningCssMinifier, LightningCssModulesExtractor, OxcTransformWorker,
    PluginCssAstProcessor, StyleInjectionWrapper, SvgComponentTransformer,
};
use crate::utils::{Logger, Result};
use std::path::Path;
use std::sync::Arc;

/// Replaces the contents of server-only entry files in unminified client builds
pub const SERVER_ONLY_PLACEHOLDER: &str =
    "// This file was removed from the client bundle because it only runs on the server.";

/// Per-file transformer the bundler calls once for every file in the graph.
///
/// Holds no per-call state: concurrent `transform` calls share only the
/// immutable collaborators.
#[derive(Clone)]
pub struct Transformer {
    pub(crate) worker: Arc<dyn TransformWorker>,
    pub(crate) svg: Arc<dyn SvgTransformer>,
    pub(crate) css_ast: Arc<dyn CssAstProcessor>,
    pub(crate) sass: Arc<dyn SassCompiler>,
    pub(crate) css_minifier: Arc<dyn CssMinifier>,
    pub(crate) css_modules: Arc<dyn CssModulesExtractor>,
    pub(crate) dev_wrapper: Arc<dyn DevCssWrapper>,
}

impl Transformer {
    /// Transformer wired with the default oxc, lightningcss and grass collaborators
    pub fn new() -> Self {
        let worker: Arc<dyn TransformWorker> = Arc::new(OxcTransformWorker::new());

        Self {
            svg: Arc::new(SvgComponentTransformer::new(worker.clone())),
            worker,
            css_ast: Arc::new(PluginCssAstProcessor::new()),
            sass: Arc::new(GrassSassCompiler::new()),
            css_minifier: Arc::new(LightningCssMinifier::new()),
            css_modules: Arc::new(LightningCssModulesExtractor::new()),
            dev_wrapper: Arc::new(StyleInjectionWrapper::new()),
        }
    }

    /// Default collaborators tuned by the project's transformer config
    pub fn from_config(config: &TransformerConfig) -> Self {
        Self {
            css_ast: Arc::new(PluginCssAstProcessor::with_config_file(&config.css_plugin_config)),
            sass: Arc::new(GrassSassCompiler::with_load_paths(config.sass_load_paths.clone())),
            css_modules: Arc::new(LightningCssModulesExtractor::with_pattern(
                &config.css_module_pattern,
            )),
            ..Self::new()
        }
    }

    /// Replace the generic worker. The default SVG transformer keeps the worker it was built with.
    pub fn with_worker(mut self, worker: Arc<dyn TransformWorker>) -> Self {
        self.worker = worker;
        self
    }

    pub fn with_svg_transformer(mut self, svg: Arc<dyn SvgTransformer>) -> Self {
        self.svg = svg;
        self
    }

    pub fn with_css_ast(mut self, css_ast: Arc<dyn CssAstProcessor>) -> Self {
        self.css_ast = css_ast;
        self
    }

    pub fn with_sass(mut self, sass: Arc<dyn SassCompiler>) -> Self {
        self.sass = sass;
        self
    }

    pub fn with_css_minifier(mut self, css_minifier: Arc<dyn CssMinifier>) -> Self {
        self.css_minifier = css_minifier;
        self
    }

    pub fn with_css_modules(mut self, css_modules: Arc<dyn CssModulesExtractor>) -> Self {
        self.css_modules = css_modules;
        self
    }

    pub fn with_dev_wrapper(mut self, dev_wrapper: Arc<dyn DevCssWrapper>) -> Self {
        self.dev_wrapper = dev_wrapper;
        self
    }

    /// Route a single file through exactly one transformation path.
    ///
    /// Collaborator errors are returned unchanged; the bundler reports them per file.
    pub async fn transform(
        &self,
        config: &TransformerConfig,
        project_root: &Path,
        filename: &str,
        data: &[u8],
        options: &TransformOptions,
    ) -> Result<TransformResponse> {
        let route = classify(&FileRequest {
            config,
            project_root,
            filename,
            options,
        });
        Logger::route(filename, &route.to_string());

        match route {
            Route::SvgModule => {
                // SVG modules are always importable components, whatever type was requested
                let module_options = TransformOptions {
                    kind: TransformType::Module,
                    ..options.clone()
                };
                self.svg
                    .transform(config, project_root, filename, data, &module_options)
                    .await
            }
            Route::Asset => {
                self.worker
                    .transform(config, project_root, filename, data, options)
                    .await
            }
            Route::Stylesheet => {
                self.transform_css(config, project_root, filename, data, options)
                    .await
            }
            Route::ElidedServerFile => {
                let replacement: &[u8] = if options.minify {
                    b""
                } else {
                    SERVER_ONLY_PLACEHOLDER.as_bytes()
                };
                self.worker
                    .transform(config, project_root, filename, replacement, options)
                    .await
            }
            Route::Default => {
                self.worker
                    .transform(config, project_root, filename, data, options)
                    .await
            }
        }
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::utils::count_lines;
    use std::sync::Mutex;

    /// Worker that echoes its input and records every call
    #[derive(Default)]
    pub struct RecordingWorker {
        pub calls: Mutex<Vec<(String, String, TransformOptions)>>,
    }

    impl RecordingWorker {
        pub fn calls(&self) -> Vec<(String, String, TransformOptions)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl TransformWorker for RecordingWorker {
        async fn transform(
            &self,
            _config: &TransformerConfig,
            _project_root: &Path,
            filename: &str,
            data: &[u8],
            options: &TransformOptions,
        ) -> Result<TransformResponse> {
            let code = String::from_utf8_lossy(data).to_string();
            self.calls
                .lock()
                .unwrap()
                .push((filename.to_string(), code.clone(), options.clone()));

            Ok(TransformResponse {
                dependencies: vec![Dependency::new("worker-dep")],
                output: vec![OutputVariant {
                    kind: options.kind.into(),
                    data: OutputData {
                        line_count: count_lines(&code),
                        code,
                        map: Vec::new(),
                        function_map: None,
                        css: None,
                    },
                }],
            })
        }
    }

    /// SVG transformer that records the options it was handed
    #[derive(Default)]
    pub struct RecordingSvg {
        pub seen: Mutex<Vec<TransformOptions>>,
    }

    #[async_trait::async_trait]
    impl SvgTransformer for RecordingSvg {
        async fn transform(
            &self,
            _config: &TransformerConfig,
            _project_root: &Path,
            _filename: &str,
            _data: &[u8],
            options: &TransformOptions,
        ) -> Result<TransformResponse> {
            self.seen.lock().unwrap().push(options.clone());
            Ok(TransformResponse {
                dependencies: Vec::new(),
                output: vec![OutputVariant {
                    kind: options.kind.into(),
                    data: OutputData {
                        code: "svg".to_string(),
                        line_count: 1,
                        map: Vec::new(),
                        function_map: None,
                        css: None,
                    },
                }],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn transformer(worker: Arc<RecordingWorker>, svg: Arc<RecordingSvg>) -> Transformer {
        Transformer::new().with_worker(worker).with_svg_transformer(svg)
    }

    #[tokio::test]
    async fn test_svg_module_forces_module_type() {
        let worker = Arc::new(RecordingWorker::default());
        let svg = Arc::new(RecordingSvg::default());
        let transformer = transformer(worker.clone(), svg.clone());

        let mut options = TransformOptions::new("ios");
        options.kind = TransformType::Script;
        options.custom_transform_options.svg_modules = true;

        let response = transformer
            .transform(&TransformerConfig::default(), Path::new("/p"), "icon.svg", b"<svg/>", &options)
            .await
            .unwrap();

        assert_eq!(response.output[0].kind, OutputType::Module);
        assert_eq!(svg.seen.lock().unwrap()[0].kind, TransformType::Module);
        assert!(worker.calls().is_empty());
        // The caller's options are untouched
        assert_eq!(options.kind, TransformType::Script);
    }

    #[tokio::test]
    async fn test_asset_goes_straight_to_worker() {
        let worker = Arc::new(RecordingWorker::default());
        let svg = Arc::new(RecordingSvg::default());
        let transformer = transformer(worker.clone(), svg.clone());

        let mut options = TransformOptions::new("web");
        options.kind = TransformType::Asset;
        options.custom_transform_options.css_modules = true;

        let response = transformer
            .transform(&TransformerConfig::default(), Path::new("/p"), "styles.module.css", b"PNG", &options)
            .await
            .unwrap();

        let calls = worker.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "PNG");
        assert_eq!(calls[0].2, options);
        assert_eq!(response.output[0].kind, OutputType::ModuleAsset);
        assert!(response.output[0].data.css.is_none());
    }

    #[tokio::test]
    async fn test_server_only_entry_is_elided_for_client() {
        let worker = Arc::new(RecordingWorker::default());
        let transformer = transformer(worker.clone(), Arc::new(RecordingSvg::default()));

        let mut options = TransformOptions::new("ios");
        options.custom_transform_options.environment = Environment::Client;

        let response = transformer
            .transform(
                &TransformerConfig::default(),
                Path::new("/p"),
                "app/+html.ios.tsx",
                b"export default function Root() { return null; }",
                &options,
            )
            .await
            .unwrap();
        assert_eq!(response.output[0].data.code, SERVER_ONLY_PLACEHOLDER);
        assert_eq!(worker.calls()[0].2, options);

        options.minify = true;
        let response = transformer
            .transform(&TransformerConfig::default(), Path::new("/p"), "app/+html.ios.tsx", b"secret", &options)
            .await
            .unwrap();
        assert_eq!(response.output[0].data.code, "");
    }

    #[tokio::test]
    async fn test_server_only_entry_kept_outside_client_builds() {
        let worker = Arc::new(RecordingWorker::default());
        let transformer = transformer(worker.clone(), Arc::new(RecordingSvg::default()));

        let options = TransformOptions::new("ios");
        let response = transformer
            .transform(&TransformerConfig::default(), Path::new("/p"), "app/+html.tsx", b"server();", &options)
            .await
            .unwrap();

        assert_eq!(response.output[0].data.code, "server();");
    }

    #[tokio::test]
    async fn test_default_route_passes_data_through() {
        let worker = Arc::new(RecordingWorker::default());
        let transformer = transformer(worker.clone(), Arc::new(RecordingSvg::default()));

        let options = TransformOptions::new("web");
        let response = transformer
            .transform(&TransformerConfig::default(), Path::new("/p"), "global.css", b".a{}", &options)
            .await
            .unwrap();

        // Without the css-modules flag stylesheets are left to the worker
        assert_eq!(response.output[0].data.code, ".a{}");
        assert!(response.output[0].data.css.is_none());
        assert_eq!(response.dependencies, vec![Dependency::new("worker-dep")]);
    }
}
