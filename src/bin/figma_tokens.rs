//! figma-tokens command line interface
//!
//! # Usage
//!
//! ```bash
//! # Pull variables from the REST API into tokens/design-tokens.json
//! figma-tokens sync
//!
//! # Same, from a plugin export instead of the network
//! figma-tokens sync --method plugin --export figma-export.json
//!
//! # Generate Swift sources from the store
//! figma-tokens generate --out ios/DesignTokens/Generated
//!
//! # Commit the store into the app repository
//! figma-tokens publish --branch main
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use figma_tokens::config::{self, FigmaConfig, GithubConfig, PathsConfig};
use figma_tokens::github::ContentsClient;
use figma_tokens::render::{self, RendererKind};
use figma_tokens::source::{
    sync_to_file, FileContentSource, FileExtractOptions, PluginExportSource, SourceMethod,
    TokenSource, VariablesApiSource,
};
use figma_tokens::tokens::TokenStore;

#[derive(Parser)]
#[command(name = "figma-tokens")]
#[command(version)]
#[command(about = "Sync Figma design tokens into a JSON store and generate Swift from it")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Token store path
    #[arg(long, global = true, env = "TOKENS_FILE")]
    tokens_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch tokens from Figma and overwrite the token store
    Sync(SyncArgs),

    /// Render Swift sources from the token store
    Generate(GenerateArgs),

    /// Commit the token store to a GitHub repository
    Publish {
        /// Path of the store inside the repository (default: GITHUB_TOKENS_PATH)
        #[arg(long)]
        path: Option<String>,

        /// Target branch (default: GITHUB_BRANCH or main)
        #[arg(long)]
        branch: Option<String>,

        /// Commit message
        #[arg(long, default_value = "Update design tokens from Figma")]
        message: String,
    },

    /// Check the token store and print per-category counts
    Validate {
        /// Exit non-zero when any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Sync then generate
    Run {
        #[command(flatten)]
        sync: SyncArgs,

        #[command(flatten)]
        generate: GenerateArgs,
    },
}

#[derive(Args)]
struct SyncArgs {
    /// Source: variables, file or plugin
    #[arg(long, default_value = "variables")]
    method: SourceMethod,

    /// Plugin export JSON (required with --method plugin)
    #[arg(long, env = "FIGMA_PLUGIN_EXPORT")]
    export: Option<PathBuf>,

    /// Do not fill empty categories with built-in defaults (file method only)
    #[arg(long)]
    no_defaults: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Renderer: swift or template
    #[arg(long, default_value = "swift")]
    renderer: RendererKind,

    /// Directory of `<category>.hbs` overrides for the template renderer
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output directory for generated Swift
    #[arg(long, env = "SWIFT_OUTPUT_DIR")]
    out: Option<PathBuf>,
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "figma_tokens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut paths = PathsConfig::from_env();
    if let Some(tokens_file) = cli.tokens_file {
        paths.tokens_file = tokens_file;
    }

    let result = match cli.command {
        Commands::Sync(args) => cmd_sync(&args, &paths).await,
        Commands::Generate(args) => cmd_generate(&args, &paths),
        Commands::Publish {
            path,
            branch,
            message,
        } => cmd_publish(path, branch, &message, &paths).await,
        Commands::Validate { strict } => cmd_validate(&paths, strict),
        Commands::Run { sync, generate } => match cmd_sync(&sync, &paths).await {
            Ok(()) => cmd_generate(&generate, &paths),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

async fn cmd_sync(args: &SyncArgs, paths: &PathsConfig) -> anyhow::Result<()> {
    let filters = match args.method {
        SourceMethod::PluginExport => config::filters_from_env(),
        SourceMethod::Variables | SourceMethod::FileContent => FigmaConfig::from_env()?.filters,
    };
    let source = build_source(args)?;

    let store = sync_to_file(source.as_ref(), &filters, &paths.tokens_file).await?;
    println!(
        "{} {} tokens via {} -> {}",
        "Synced".green().bold(),
        store.len(),
        args.method,
        paths.tokens_file.display()
    );
    print_counts(&store);
    if !store.metadata.note.is_empty() {
        println!("  {}", store.metadata.note.dimmed());
    }
    Ok(())
}

fn build_source(args: &SyncArgs) -> anyhow::Result<Box<dyn TokenSource>> {
    let source: Box<dyn TokenSource> = match args.method {
        SourceMethod::Variables => {
            let config = FigmaConfig::from_env()?;
            Box::new(VariablesApiSource::from_config(&config)?)
        }
        SourceMethod::FileContent => {
            let config = FigmaConfig::from_env()?;
            let options = FileExtractOptions {
                use_defaults: !args.no_defaults,
                ..Default::default()
            };
            Box::new(FileContentSource::from_config(&config, options)?)
        }
        SourceMethod::PluginExport => {
            let Some(export) = &args.export else {
                bail!("--export <PATH> is required with --method plugin");
            };
            Box::new(PluginExportSource::new(export))
        }
    };
    Ok(source)
}

fn cmd_generate(args: &GenerateArgs, paths: &PathsConfig) -> anyhow::Result<()> {
    let store = TokenStore::load(&paths.tokens_file)?;
    let out: &Path = args.out.as_deref().unwrap_or(&paths.output_dir);
    let renderer = render::renderer_for(args.renderer, args.templates.as_deref())?;
    let written = render::generate(&store, renderer.as_ref(), out)?;
    println!(
        "{} {} files with the {} renderer",
        "Generated".green().bold(),
        written.len(),
        renderer.name()
    );
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

async fn cmd_publish(
    path: Option<String>,
    branch: Option<String>,
    message: &str,
    paths: &PathsConfig,
) -> anyhow::Result<()> {
    let config = GithubConfig::from_env()?;
    let store = TokenStore::load(&paths.tokens_file)?;
    let path = path.unwrap_or_else(|| config.path.clone());
    let branch = branch.unwrap_or_else(|| config.branch.clone());

    let client = ContentsClient::from_config(&config)?;
    let commit = client
        .publish_store(&store, &path, &branch, message)
        .await
        .with_context(|| format!("publishing {} to {}", path, config.repository))?;

    println!(
        "{} {}:{} on {}",
        "Published".green().bold(),
        config.repository,
        path,
        branch
    );
    if let Some(commit) = commit {
        println!("  commit {}", commit.dimmed());
    }
    Ok(())
}

fn cmd_validate(paths: &PathsConfig, strict: bool) -> anyhow::Result<()> {
    let store = TokenStore::load(&paths.tokens_file)?;
    println!(
        "{} ({} tokens, {} {})",
        paths.tokens_file.display(),
        store.len(),
        store.metadata.source,
        store.metadata.method
    );
    print_counts(&store);

    let issues = store.validate();
    if issues.is_empty() {
        println!("{}", "OK".green().bold());
        return Ok(());
    }
    if strict {
        for issue in &issues {
            println!("  {} {}", "x".red(), issue);
        }
        bail!("{} issue(s) in token store", issues.len())
    }
    for issue in &issues {
        println!("  {} {}", "warning:".yellow().bold(), issue);
    }
    println!("{} with {} warning(s)", "OK".green().bold(), issues.len());
    Ok(())
}

fn print_counts(store: &TokenStore) {
    for (category, count) in store.counts() {
        let line = format!("  {:<14}{}", category.to_string(), count);
        if count == 0 {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
}
