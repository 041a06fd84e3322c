//! CLI binary entry point for bi-migrate

#[cfg(feature = "cli")]
use anyhow::Context;
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::generate::{GenerateArgs, handle_generate};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::layout::{LayoutArgs, handle_layout};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::parse::{ParseArgs, handle_parse};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::run::{RunArgs, handle_run};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::script::{ScriptArgs, handle_script};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::commands::{SourceArgs, load_config};
#[cfg(feature = "cli")]
use bi_migration_sdk::cli::error::CliError;
#[cfg(feature = "cli")]
use bi_migration_sdk::config::sample_config;
#[cfg(feature = "cli")]
use bi_migration_sdk::events::{EventSink, TracingSink};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bi-migrate")]
#[command(about = "Convert .twb/.twbx workbooks into tabular model artifacts")]
#[command(version)]
struct Cli {
    /// Directory holding .bi-migrate.toml (default: current directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args, Clone)]
struct SourceOpts {
    /// Source type (excel, sharepoint, sql, fabric)
    #[arg(long)]
    source_type: Option<String>,
    /// Source config as a JSON object string
    #[arg(long)]
    source_config: Option<String>,
    /// Saved <reportId>_source.json; overrides --source-type/--source-config
    #[arg(long)]
    source_file: Option<PathBuf>,
}

#[cfg(feature = "cli")]
impl From<SourceOpts> for SourceArgs {
    fn from(opts: SourceOpts) -> Self {
        SourceArgs {
            source_type: opts.source_type,
            source_config: opts.source_config,
            source_file: opts.source_file,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Extract normalized metadata from a .twb or .twbx workbook
    Parse {
        /// Path to .twb or .twbx workbook
        #[arg(short, long)]
        input: PathBuf,
        /// Output parsed metadata JSON path
        #[arg(short, long)]
        output: PathBuf,
        /// Preferred internal .twb member names to try first inside a .twbx
        #[arg(long = "prefer", alias = "prefer-twb", num_args = 0..)]
        prefer: Vec<String>,
        /// Maximum visuals kept per worksheet
        #[arg(long)]
        visual_limit: Option<usize>,
    },
    /// Generate model spec, DAX, visual spec and Power Query artifacts
    Generate {
        /// Parsed metadata JSON
        #[arg(long)]
        input: PathBuf,
        /// Artifact root directory
        #[arg(long, default_value = "artifacts")]
        out: PathBuf,
        #[command(flatten)]
        source: SourceOpts,
        /// Report id used for artifact names
        #[arg(long)]
        report_id: Option<String>,
        /// Write DAX, visual spec and Power Query files in parallel
        #[arg(long)]
        parallel: bool,
        /// Also save the source selection next to the manifest
        #[arg(long)]
        save_source: bool,
    },
    /// Generate the TE3 model-authoring script from a model spec
    Script {
        /// Path to <reportId>_modelspec.json
        #[arg(long)]
        model: PathBuf,
        /// Path to template .csx file (default: bundled template)
        #[arg(long)]
        template: Option<PathBuf>,
        /// Output folder
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Project a visual spec onto a report layout document
    Layout {
        /// Path to <reportId>_visual.json
        #[arg(long)]
        visual: PathBuf,
        /// Dataset the layout binds to
        #[arg(long)]
        dataset: Option<String>,
        /// Output layout JSON path
        #[arg(long, default_value = "report.json")]
        out: PathBuf,
        /// Use random section and visual names
        #[arg(long)]
        random_ids: bool,
    },
    /// Run parse, generate, script and layout in one go
    Run {
        /// Path to .twb or .twbx workbook
        #[arg(short, long)]
        input: PathBuf,
        /// Output root directory
        #[arg(long, default_value = "work")]
        out: PathBuf,
        /// Preferred internal .twb member names to try first inside a .twbx
        #[arg(long = "prefer", alias = "prefer-twb", num_args = 0..)]
        prefer: Vec<String>,
        /// Maximum visuals kept per worksheet
        #[arg(long)]
        visual_limit: Option<usize>,
        #[command(flatten)]
        source: SourceOpts,
        /// Report id used for artifact names (default: workbook file stem)
        #[arg(long)]
        report_id: Option<String>,
        #[arg(long)]
        parallel: bool,
        /// Path to template .csx file (default: bundled template)
        #[arg(long)]
        template: Option<PathBuf>,
        /// Dataset the layout binds to (default: workbook title)
        #[arg(long)]
        dataset: Option<String>,
    },
    /// Print a sample .bi-migrate.toml
    SampleConfig,
}

#[cfg(feature = "cli")]
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", text);
    Ok(())
}

#[cfg(feature = "cli")]
fn run(cli: Cli, events: &dyn EventSink) -> anyhow::Result<()> {
    if let Commands::SampleConfig = cli.command {
        print!("{}", sample_config());
        return Ok(());
    }

    let config = load_config(cli.config_dir.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Parse {
            input,
            output,
            prefer,
            visual_limit,
        } => {
            let args = ParseArgs {
                input,
                output,
                prefer,
                visual_limit,
            };
            handle_parse(&args, &config, events).context("Parse failed")?;
            println!("Parsed metadata written to {}", args.output.display());
        }
        Commands::Generate {
            input,
            out,
            source,
            report_id,
            parallel,
            save_source,
        } => {
            let args = GenerateArgs {
                input,
                out,
                source: source.into(),
                report_id,
                parallel,
                save_source,
            };
            let manifest = handle_generate(&args, &config, events).context("Generation failed")?;
            print_json(&manifest)?;
        }
        Commands::Script {
            model,
            template,
            out,
        } => {
            let args = ScriptArgs {
                model,
                template,
                out,
            };
            let path = handle_script(&args, &config, events).context("Script generation failed")?;
            println!("TE3 script generated: {}", path.display());
        }
        Commands::Layout {
            visual,
            dataset,
            out,
            random_ids,
        } => {
            let args = LayoutArgs {
                visual,
                dataset,
                out,
                random_ids,
            };
            handle_layout(&args, &config, events).context("Layout generation failed")?;
            println!("Generated report layout JSON: {}", args.out.display());
        }
        Commands::Run {
            input,
            out,
            prefer,
            visual_limit,
            source,
            report_id,
            parallel,
            template,
            dataset,
        } => {
            let args = RunArgs {
                input,
                out,
                prefer,
                visual_limit,
                source: source.into(),
                report_id,
                parallel,
                template,
                dataset,
            };
            let summary = handle_run(&args, &config, events).context("Pipeline failed")?;
            print_json(&summary)?;
        }
        Commands::SampleConfig => {}
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli, &TracingSink) {
        eprintln!("Error: {:#}", e);
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
