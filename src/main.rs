use clap::{Parser, Subcommand};
use cwlogs::cli::fetch::FetchArgs;
use cwlogs::cli::list::ListArgs;
use cwlogs::cli::CliError;
use cwlogs::config::{load_or_default, Config};
use cwlogs::remote::{CloudWatchLogsService, LogService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cwlogs")]
#[command(about = "Fetch and follow CloudWatch Logs", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// AWS region, overriding the config file and environment
    #[arg(long, global = true)]
    region: Option<String>,

    /// AWS shared config profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Force colored output
    #[arg(short = 'c', long, global = true, overrides_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, overrides_with = "color")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch logs for a log group
    Fetch(FetchArgs),
    /// List the streams of a log group
    List(ListArgs),
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a starter config file
    Init {
        #[arg(long)]
        stdout: bool,
    },
    /// Check a config file without running anything
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics go to stderr; stdout carries only log output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cwlogs=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init { stdout } => cwlogs::cli::config::init(*stdout, cli.config.as_deref()),
            ConfigAction::Validate => cwlogs::cli::config::validate(cli.config.clone()),
        },
        Commands::Fetch(args) => {
            let config = load_or_default(cli.config.as_deref())?;
            let color = use_color(&cli, &config);
            let service = connect(&cli, &config).await;
            cwlogs::cli::fetch::run(args, &config, service, color).await
        }
        Commands::List(args) => {
            let config = load_or_default(cli.config.as_deref())?;
            let service = connect(&cli, &config).await;
            cwlogs::cli::list::run(args, &config, service).await
        }
    }
}

fn use_color(cli: &Cli, config: &Config) -> bool {
    if cli.no_color {
        false
    } else {
        cli.color || config.output.color
    }
}

async fn connect(cli: &Cli, config: &Config) -> Arc<dyn LogService> {
    let mut aws = config.aws.clone();
    if let Some(region) = &cli.region {
        aws.region = Some(region.clone());
    }
    if let Some(profile) = &cli.profile {
        aws.profile = Some(profile.clone());
    }
    Arc::new(CloudWatchLogsService::from_config(&aws).await)
}
