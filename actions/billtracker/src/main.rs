use billtracker::prelude::*;
use billtracker::{render, store};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Track policy-relevant legislation across the states and Congress
#[derive(Parser, Debug)]
#[command(name = "billtracker")]
#[command(about = "Fetch legislation from LegiScan and publish it as a static page")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch bills for all jurisdictions and save the dataset
    /// Requires LEGISCAN_API_KEY
    Fetch,

    /// Render the saved dataset into a static HTML page
    Render,
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  fetch    Fetch bills for all jurisdictions and save the dataset");
    println!("  render   Render the saved dataset into a static HTML page");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("billtracker=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_fetch_command(config: &Config) -> anyhow::Result<()> {
    let result = fetch_all(config).await?;

    if result.is_empty() {
        warn!(
            "No bills collected, leaving {} unchanged",
            config.data_path.display()
        );
        return Ok(());
    }

    store::save(&config.data_path, &result)?;

    eprintln!(
        "\n✅ Saved {} bills from {} jurisdictions to {}",
        result.total_bills,
        result.total_states,
        config.data_path.display()
    );
    eprintln!("\nNext steps:");
    eprintln!("  billtracker render    Generate {}", config.html_path.display());

    Ok(())
}

fn run_render_command(config: &Config) -> anyhow::Result<()> {
    let stats = render::publish(&config.data_path, &config.html_path, &config.site)?;

    eprintln!(
        "\n✅ Rendered {} bills ({} active, {} with analysis) to {}",
        stats.total_bills,
        stats.active_bills,
        stats.analyzed_bills,
        config.html_path.display()
    );

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let Some(command) = args.command else {
        print_available_commands();
        return Ok(());
    };

    init_tracing();
    let config = Config::from_env()?;

    match command {
        Command::Fetch => run_fetch_command(&config).await,
        Command::Render => run_render_command(&config),
    }
}
