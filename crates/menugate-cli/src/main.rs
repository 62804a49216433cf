mod commands;

use clap::{Parser, Subcommand};
use menugate_shared::{telemetry::init_telemetry, AppConfig};
use uuid::Uuid;

use commands::Context;

#[derive(Parser)]
#[command(name = "menugate")]
#[command(about = "Menu visibility checks and admin toggles for the trading dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bearer token for the dashboard API
    #[arg(short, long, env = "MENUGATE_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve visibility for one or more route paths
    Check {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the sidebar the current catalog produces
    Sidebar,
    /// Clear the local menu cache
    Invalidate,
    /// Catalog administration
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List every menu entry, including disabled ones
    List,
    /// Ask the server to discover newly added routes
    Discover,
    /// Flip one entry between enabled and disabled
    Toggle {
        id: Uuid,
        /// Confirm hiding a section's children
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    init_telemetry(&config.log)?;

    let ctx = Context::new(&config, cli.token)?;

    match cli.command {
        Commands::Check { paths } => commands::check(&ctx, &paths).await,
        Commands::Sidebar => commands::sidebar(&ctx).await,
        Commands::Invalidate => commands::invalidate(&ctx),
        Commands::Admin { command } => match command {
            AdminCommands::List => commands::admin_list(&ctx).await,
            AdminCommands::Discover => commands::admin_discover(&ctx).await,
            AdminCommands::Toggle { id, yes } => commands::admin_toggle(&ctx, id, yes).await,
        },
    }
}
