use crate::core::classifier::{classify, FileRequest};
use crate::core::models::*;
use crate::core::services::Transformer;
use crate::utils::{ConfigLoader, Logger, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "soku-transform")]
#[command(about = "Soku transformer - run a single file through the bundler's per-file transform")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform a file and print the response as JSON
    Transform {
        /// File to transform, relative to the project root
        file: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Print the pipeline a file would be routed to
    Classify {
        /// File to classify, relative to the project root
        file: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Print an example soku.transform.json
    InitConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Module,
    Script,
    Asset,
}

impl From<TypeArg> for TransformType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Module => TransformType::Module,
            TypeArg::Script => TransformType::Script,
            TypeArg::Asset => TransformType::Asset,
        }
    }
}

#[derive(Args)]
pub struct OptionArgs {
    /// Project root directory
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
    /// Target platform (web, ios, android, ...)
    #[arg(short, long, default_value = "web")]
    platform: String,
    /// Development build
    #[arg(long)]
    dev: bool,
    /// Minify output
    #[arg(long)]
    minify: bool,
    /// How the bundler uses the file
    #[arg(long = "type", value_enum, default_value = "module")]
    kind: TypeArg,
    /// Route SVG files to the component transformer
    #[arg(long)]
    svg_modules: bool,
    /// Route stylesheets to the CSS pipeline
    #[arg(long)]
    css_modules: bool,
    /// Build environment; `client` elides server-only entry files
    #[arg(long)]
    environment: Option<String>,
    /// Override the CSS Modules class name pattern
    #[arg(long)]
    css_module_pattern: Option<String>,
    /// Extension routed to the SVG transformer (repeatable); replaces the configured list
    #[arg(long = "svg-extension")]
    svg_extensions: Vec<String>,
}

impl OptionArgs {
    fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            platform: self.platform.clone(),
            dev: self.dev,
            minify: self.minify,
            kind: self.kind.into(),
            custom_transform_options: CustomTransformOptions {
                svg_modules: self.svg_modules,
                css_modules: self.css_modules,
                environment: match self.environment.as_deref() {
                    Some("client") => Environment::Client,
                    _ => Environment::Other,
                },
            },
        }
    }

    fn config(&self) -> Result<TransformerConfig> {
        let file_config = ConfigLoader::load_from_file(&self.root)?;
        Ok(ConfigLoader::merge_with_cli(
            file_config,
            Some(self.svg_extensions.clone()),
            self.css_module_pattern.clone(),
        ))
    }
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Transform { file, options } => self.handle_transform(&file, &options).await,
            Commands::Classify { file, options } => self.handle_classify(&file, &options),
            Commands::InitConfig => {
                println!("{}", ConfigLoader::generate_example());
                Ok(())
            }
        }
    }

    async fn handle_transform(&self, file: &str, args: &OptionArgs) -> Result<()> {
        let config = args.config()?;
        let options = args.transform_options();
        let data = tokio::fs::read(args.root.join(file)).await?;

        let response = Transformer::from_config(&config)
            .transform(&config, &args.root, file, &data, &options)
            .await?;

        Logger::info(&format!(
            "Transformed {} ({} dependencies)",
            file,
            response.dependencies.len()
        ));
        println!("{}", serde_json::to_string_pretty(&response)?);
        Ok(())
    }

    fn handle_classify(&self, file: &str, args: &OptionArgs) -> Result<()> {
        let config = args.config()?;
        let options = args.transform_options();

        let route = classify(&FileRequest {
            config: &config,
            project_root: Path::new(&args.root),
            filename: file,
            options: &options,
        });

        println!("{}", route);
        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}
