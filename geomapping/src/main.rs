//! Point d'entrée CLI pour geomapping

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Recouvrements entre deux collections de formes
#[derive(Parser)]
#[command(name = "geomapping")]
#[command(author, version)]
#[command(about = "Identifier les recouvrements entre deux fichiers GeoJSON et calculer leurs aires")]
#[command(long_about = "Reprojette deux collections de polygones vers un CRS commun, répare les géométries invalides et calcule l'aire de chaque intersection.\n\nLe rapport JSON contient les propriétés, les aires et les triplets [i, j, aire].")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Intersect(args) => {
            debug!(
                filename1 = %args.filename1.display(),
                filename2 = %args.filename2.display(),
                crs = %args.crs,
                "Intersect"
            );
            cli::cmd_intersect(&args)?;
        }
        Commands::Crs {
            identifier,
            catalog,
        } => {
            cli::cmd_crs(identifier.as_deref(), catalog.as_deref())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
