//! HubShift CLI
//!
//! Runs the server, applies migrations, and explains route guard decisions

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hubshift")]
#[command(about = "HubShift - hospitality shift marketplace backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Apply embedded database migrations
    Migrate(commands::migrate::MigrateArgs),
    /// Show the guard decision for a page path
    Route(commands::route::RouteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Migrate(args) => commands::migrate::execute(args).await,
        Commands::Route(args) => commands::route::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
