mod cli;
mod core;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qm", about = "Router bandwidth quota tracking CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the router report and display per-range usage
    Usage {
        /// Repeat the update every N seconds
        #[arg(short, long, value_name = "SECS")]
        watch: Option<u64>,

        /// Include hidden profiles
        #[arg(short, long)]
        all: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage tracked address-range profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Set the router report URL
    SetUrl {
        /// Report page URL (http:// or https://)
        url: String,
    },
    /// Set the report fetch timeout
    SetTimeout {
        /// Timeout in seconds
        secs: u64,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List stored profiles
    List,
    /// Add a profile for an address range
    Add {
        /// Range as A.B.C.D or A.B.C.D-A.B.C.D
        range: String,
        /// Display name
        name: String,
    },
    /// Remove a profile by name
    Remove {
        /// Profile name
        name: String,
    },
    /// Hide a profile from usage output
    Hide {
        /// Profile name
        name: String,
    },
    /// Show a previously hidden profile
    Show {
        /// Profile name
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_default = crate::core::config::AppConfig::load()
        .map(|c| c.settings.default_format)
        .unwrap_or_else(|_| "text".to_string());

    let output_opts = cli::output::OutputOptions {
        format: cli::output::resolve_format(cli.json, cli.format.as_deref(), &config_default),
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color),
        verbose: cli.verbose,
    };

    match cli.command {
        None | Some(Commands::Usage { .. }) => {
            let (watch, all) = match cli.command {
                Some(Commands::Usage { watch, all }) => (watch, all),
                _ => (None, false),
            };
            cli::usage_cmd::run(watch, all, &output_opts).await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
            ConfigAction::SetUrl { url } => cli::config_cmd::set_url(&url, &output_opts)?,
            ConfigAction::SetTimeout { secs } => {
                cli::config_cmd::set_timeout(secs, &output_opts)?
            }
        },
        Some(Commands::Profile { action }) => match action {
            ProfileAction::List => cli::profile_cmd::list(&output_opts)?,
            ProfileAction::Add { range, name } => {
                cli::profile_cmd::add(&range, &name, &output_opts)?
            }
            ProfileAction::Remove { name } => cli::profile_cmd::remove(&name, &output_opts)?,
            ProfileAction::Hide { name } => {
                cli::profile_cmd::set_visible(&name, false, &output_opts)?
            }
            ProfileAction::Show { name } => {
                cli::profile_cmd::set_visible(&name, true, &output_opts)?
            }
        },
    }

    Ok(())
}
