use anyhow::Context;
use apptrack_core::providers::{GitHubLister, SmtpNotifier};
use apptrack_core::{Config, Dashboard};
use apptrack_tui::App;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "apptrack")]
#[command(version, about = "Track job applications, export reports and mail a weekly summary", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory CSV reports are saved into
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Default recipient for the weekly report email
    #[arg(long, global = true, env = "APPTRACK_REPORT_RECIPIENT")]
    recipient: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the dashboard (default)
    Dashboard,
    /// List the GitHub repositories a token can see
    Repos {
        /// Personal access token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print where the config file lives
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dashboard_mode = matches!(cli.command, None | Some(Commands::Dashboard));
    init_logging(dashboard_mode)?;

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(dir) = cli.output_dir {
        config.reports.output_dir = Some(dir);
    }
    if let Some(recipient) = cli.recipient {
        config.reports.recipient = Some(recipient);
    }

    match cli.command {
        None | Some(Commands::Dashboard) => run_dashboard(config).await,
        Some(Commands::Repos { token }) => print_repositories(config, &token).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { force } => {
                let path = Config::config_path()?;
                if path.exists() && !force {
                    anyhow::bail!(
                        "Config already exists at {} (use --force to overwrite)",
                        path.display()
                    );
                }
                let path = Config::default().save()?;
                println!("Wrote default config to {}", path.display());
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", Config::config_path()?.display());
                Ok(())
            }
        },
    }
}

async fn run_dashboard(config: Config) -> anyhow::Result<()> {
    let app = App::new(config.reports.output_dir(), config.reports.recipient.clone());

    let dashboard = Dashboard::new(
        Box::new(GitHubLister::new(config.github.api_url)),
        Box::new(SmtpNotifier::new(config.smtp)),
        config.reports.week_start,
    );

    tracing::info!("Starting dashboard");
    apptrack_tui::run_tui(app, dashboard).await
}

async fn print_repositories(config: Config, token: &str) -> anyhow::Result<()> {
    let lister = GitHubLister::new(config.github.api_url);
    let dashboard = Dashboard::new(
        Box::new(lister),
        Box::new(SmtpNotifier::new(config.smtp)),
        config.reports.week_start,
    );

    let listing = dashboard.list_repositories(token).await?;

    println!("Repositories for {}:", listing.login);
    for repo in &listing.repos {
        println!(
            "  {:<40} ★ {:<6} forks {:<5} issues {}",
            repo.name, repo.stars, repo.forks, repo.open_issues
        );
        if let Some(description) = &repo.description {
            println!("    {}", description);
        }
        println!("    {}", repo.url);
    }
    println!("{} repositories", listing.repos.len());

    Ok(())
}

/// Logs go to stderr, except while the dashboard owns the terminal
fn init_logging(to_file: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "apptrack=info".into());

    if to_file {
        let log_dir = dirs::data_local_dir()
            .context("Could not find data directory")?
            .join("apptrack");
        std::fs::create_dir_all(&log_dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("apptrack.log"))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
