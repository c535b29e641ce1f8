// File classification: pure predicates over a filename and the option flags

use crate::core::interfaces::SassSyntax;
use crate::core::models::{TransformOptions, TransformType, TransformerConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;

static STYLESHEET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(css|s[ac]ss)$").unwrap());

static CSS_MODULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.module(\.(native|ios|android|web))?\.(css|s[ac]ss)$").unwrap()
});

static SERVER_ONLY_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^app/\+html(\.(web|ios|android|native))?\.([cm]js|[tj]sx?)$").unwrap()
});

/// The single path a file takes through the transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SvgModule,
    Asset,
    Stylesheet,
    ElidedServerFile,
    Default,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::SvgModule => "svg-module",
            Route::Asset => "asset",
            Route::Stylesheet => "stylesheet",
            Route::ElidedServerFile => "elided-server-file",
            Route::Default => "default",
        };
        f.write_str(name)
    }
}

/// Everything a routing predicate may look at
#[derive(Debug, Clone, Copy)]
pub struct FileRequest<'a> {
    pub config: &'a TransformerConfig,
    pub project_root: &'a Path,
    pub filename: &'a str,
    pub options: &'a TransformOptions,
}

type Predicate = fn(&FileRequest<'_>) -> bool;

/// Routing table in priority order; the first matching predicate wins
const ROUTES: &[(Route, Predicate)] = &[
    (Route::SvgModule, svg_module_route),
    (Route::Asset, asset_route),
    (Route::Stylesheet, stylesheet_route),
    (Route::ElidedServerFile, server_only_route),
];

fn svg_module_route(request: &FileRequest<'_>) -> bool {
    is_svg_module(request.config, request.filename, request.options)
}

fn asset_route(request: &FileRequest<'_>) -> bool {
    is_asset(request.options)
}

fn stylesheet_route(request: &FileRequest<'_>) -> bool {
    is_css_modules_eligible(request.filename, request.options)
}

fn server_only_route(request: &FileRequest<'_>) -> bool {
    is_server_only_entry(request.project_root, request.filename, request.options)
}

/// Resolve a file to exactly one route. Never fails: unmatched files take `Route::Default`.
pub fn classify(request: &FileRequest<'_>) -> Route {
    ROUTES
        .iter()
        .find(|(_, matches)| matches(request))
        .map(|(route, _)| *route)
        .unwrap_or(Route::Default)
}

pub fn is_svg_module(config: &TransformerConfig, filename: &str, options: &TransformOptions) -> bool {
    if !options.custom_transform_options.svg_modules {
        return false;
    }

    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            config
                .svg_extensions
                .iter()
                .any(|svg| svg.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

pub fn is_asset(options: &TransformOptions) -> bool {
    options.kind == TransformType::Asset
}

/// CSS, SCSS or Sass file
pub fn is_stylesheet(filename: &str) -> bool {
    STYLESHEET.is_match(filename)
}

pub fn is_css_modules_eligible(filename: &str, options: &TransformOptions) -> bool {
    options.custom_transform_options.css_modules && is_stylesheet(filename)
}

/// `*.module.css`, optionally platform-qualified (`*.module.ios.scss`)
pub fn is_css_module(filename: &str) -> bool {
    CSS_MODULE.is_match(filename)
}

pub fn match_sass(filename: &str) -> Option<SassSyntax> {
    match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some("scss") => Some(SassSyntax::Scss),
        Some("sass") => Some(SassSyntax::Sass),
        _ => None,
    }
}

/// `app/+html[.platform].{js,jsx,ts,tsx,cjs,mjs}` in a client build
pub fn is_server_only_entry(project_root: &Path, filename: &str, options: &TransformOptions) -> bool {
    options.is_client_environment()
        && SERVER_ONLY_ENTRY.is_match(&project_relative(project_root, filename))
}

/// Filename relative to the project root with `/` separators
pub fn project_relative(project_root: &Path, filename: &str) -> String {
    let path = Path::new(filename);
    let relative = path.strip_prefix(project_root).unwrap_or(path);

    relative
        .to_string_lossy()
        .replace('\\', "/")
        .trim_start_matches("./")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Environment;

    fn options(platform: &str) -> TransformOptions {
        TransformOptions::new(platform)
    }

    fn request<'a>(
        config: &'a TransformerConfig,
        filename: &'a str,
        options: &'a TransformOptions,
    ) -> FileRequest<'a> {
        FileRequest {
            config,
            project_root: Path::new("/project"),
            filename,
            options,
        }
    }

    #[test]
    fn test_svg_module_requires_flag() {
        let config = TransformerConfig::default();
        let mut opts = options("ios");
        assert!(!is_svg_module(&config, "logo.svg", &opts));

        opts.custom_transform_options.svg_modules = true;
        assert!(is_svg_module(&config, "assets/logo.svg", &opts));
        assert!(!is_svg_module(&config, "logo.png", &opts));
    }

    #[test]
    fn test_stylesheet_patterns() {
        assert!(is_stylesheet("global.css"));
        assert!(is_stylesheet("theme.scss"));
        assert!(is_stylesheet("theme.sass"));
        assert!(!is_stylesheet("styles.css.ts"));

        assert!(is_css_module("Button.module.css"));
        assert!(is_css_module("components/Card.module.ios.scss"));
        assert!(!is_css_module("global.css"));
        assert!(!is_css_module("module.css"));
    }

    #[test]
    fn test_match_sass() {
        assert_eq!(match_sass("a.scss"), Some(SassSyntax::Scss));
        assert_eq!(match_sass("a.module.sass"), Some(SassSyntax::Sass));
        assert_eq!(match_sass("a.css"), None);
    }

    #[test]
    fn test_server_only_entry_only_for_client() {
        let root = Path::new("/project");
        let mut opts = options("ios");
        assert!(!is_server_only_entry(root, "app/+html.tsx", &opts));

        opts.custom_transform_options.environment = Environment::Client;
        assert!(is_server_only_entry(root, "app/+html.tsx", &opts));
        assert!(is_server_only_entry(root, "app/+html.ios.tsx", &opts));
        assert!(is_server_only_entry(root, "/project/app/+html.web.js", &opts));
        assert!(!is_server_only_entry(root, "app/nested/+html.tsx", &opts));
        assert!(!is_server_only_entry(root, "app/+html.css", &opts));
        assert!(!is_server_only_entry(root, "src/app/+html.tsx", &opts));
    }

    #[test]
    fn test_classify_priority() {
        let config = TransformerConfig::default();

        let mut opts = options("web");
        opts.kind = TransformType::Asset;
        opts.custom_transform_options.svg_modules = true;
        opts.custom_transform_options.css_modules = true;
        assert_eq!(classify(&request(&config, "icon.svg", &opts)), Route::SvgModule);
        assert_eq!(classify(&request(&config, "styles.css", &opts)), Route::Asset);

        opts.kind = TransformType::Module;
        opts.custom_transform_options.environment = Environment::Client;
        assert_eq!(classify(&request(&config, "styles.css", &opts)), Route::Stylesheet);
        assert_eq!(
            classify(&request(&config, "app/+html.tsx", &opts)),
            Route::ElidedServerFile
        );
        assert_eq!(classify(&request(&config, "app/index.tsx", &opts)), Route::Default);
    }

    #[test]
    fn test_stylesheet_without_flag_takes_default_route() {
        let config = TransformerConfig::default();
        let opts = options("web");
        assert_eq!(classify(&request(&config, "global.css", &opts)), Route::Default);
    }

    #[test]
    fn test_project_relative() {
        let root = Path::new("/project");
        assert_eq!(project_relative(root, "/project/app/+html.tsx"), "app/+html.tsx");
        assert_eq!(project_relative(root, "./app/index.ts"), "app/index.ts");
        assert_eq!(project_relative(root, "app\\+html.tsx"), "app/+html.tsx");
    }
}
