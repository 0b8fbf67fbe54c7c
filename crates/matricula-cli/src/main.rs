//! Matricula CLI - enrollment records with CEP validation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use matricula_core::cep::{normalize_cep, CepClient};
use matricula_core::config::Config;
use matricula_core::domain::enrollment::{EnrollmentInput, EnrollmentService};
use matricula_core::infrastructure::enrollment::{
    SqliteAddressRepository, SqliteEnrollmentRepository,
};
use matricula_core::storage::{Database, DatabaseConfig};
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "matricula")]
#[command(author, version, about = "Enrollment records with CEP validation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (defaults to the user config directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the address for a CEP
    Lookup {
        /// Postal code, with or without the hyphen
        cep: String,
    },

    /// Show the enrollment and address owned by a user
    Show {
        /// Owning user id
        #[arg(short, long)]
        user: Uuid,
    },

    /// Create or update an enrollment from a JSON payload
    Save {
        /// Path to the payload file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config file if none exists
    Init,
    /// Show the active configuration
    Show,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("matricula=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    // Lazily open the database only for commands that need it
    let db_override = cli.db.clone();
    let get_db = || async {
        let db_config = match db_override
            .as_ref()
            .or(config.database.path.as_ref())
        {
            Some(path) => DatabaseConfig::with_path(path),
            None => DatabaseConfig::default(),
        };
        Database::new(db_config.max_connections(config.database.max_connections)).await
    };

    match cli.command {
        Commands::Lookup { cep } => cmd_lookup(&config, &cep, cli.quiet).await,

        Commands::Show { user } => {
            let db = get_db().await?;
            cmd_show(&db, &config, user, cli.quiet).await
        }

        Commands::Save { file } => {
            let db = get_db().await?;
            cmd_save(&db, &config, file.as_deref(), cli.quiet).await
        }

        Commands::Config { action } => cmd_config(&config, action),

        Commands::Doctor => {
            let db = get_db().await;
            cmd_doctor(&config, db, cli.quiet).await
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

fn lookup_client(config: &Config) -> anyhow::Result<CepClient> {
    let client = CepClient::builder()
        .base_url(config.lookup.resolved_base_url())
        .timeout_secs(config.lookup.timeout_secs)
        .build()?;
    Ok(client)
}

fn build_service(
    db: &Database,
    config: &Config,
) -> anyhow::Result<EnrollmentService<SqliteEnrollmentRepository, SqliteAddressRepository>> {
    Ok(EnrollmentService::new(
        Arc::new(SqliteEnrollmentRepository::new(db.pool().clone())),
        Arc::new(SqliteAddressRepository::new(db.pool().clone())),
        lookup_client(config)?,
    ))
}

async fn cmd_lookup(config: &Config, cep: &str, quiet: bool) -> anyhow::Result<()> {
    let client = lookup_client(config)?;
    let normalized = normalize_cep(cep);

    let address = client.lookup(&normalized).await?;

    if !quiet {
        println!("CEP {}:", normalized);
    }
    println!("  Street:       {}", address.street);
    println!("  Complement:   {}", address.complement);
    println!("  Neighborhood: {}", address.neighborhood);
    println!("  City:         {}", address.city);
    println!("  State:        {}", address.state);
    Ok(())
}

async fn cmd_show(db: &Database, config: &Config, user: Uuid, quiet: bool) -> anyhow::Result<()> {
    debug!(user_id = %user, "Loading enrollment");

    let service = build_service(db, config)?;
    let info = service.enrollment_by_user(user).await?;

    if !quiet {
        println!("Enrollment for user {}:", user);
    }
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn cmd_save(
    db: &Database,
    config: &Config,
    file: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let payload = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file: {}", path.display()))?,
        None => {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let input: EnrollmentInput =
        serde_json::from_str(&payload).context("Failed to parse enrollment payload")?;
    let user_id = input.user_id;

    let service = build_service(db, config)?;
    service.upsert_enrollment(input).await?;

    if !quiet {
        println!("Enrollment saved for user {}", user_id);
    }
    Ok(())
}

fn cmd_config(config: &Config, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Config::config_path()?;
            if path.exists() {
                println!("Config file already exists: {}", path.display());
            } else {
                config.save()?;
                println!("Wrote default config: {}", path.display());
            }
        }
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(
    config: &Config,
    db: anyhow::Result<Database>,
    quiet: bool,
) -> anyhow::Result<()> {
    if !quiet {
        println!("Matricula Health Check");
        println!("======================");
        println!();
    }

    let mut all_ok = true;

    // Check configuration
    match config.validate() {
        Ok(()) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
                println!("     Lookup service: {}", config.lookup.resolved_base_url());
            }
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
        }
    }

    // Check config file location
    if !quiet {
        match Config::config_path() {
            Ok(path) => {
                if path.exists() {
                    println!("[OK] Config file: {}", path.display());
                } else {
                    println!("[--] Config file: {} (using defaults)", path.display());
                }
            }
            Err(e) => {
                println!("[!!] Config file: Error - {}", e);
            }
        }
    }

    // Check database
    match db {
        Ok(db) => match db.health_check().await {
            Ok(()) => {
                if !quiet {
                    println!("[OK] Database: Connected");
                    println!("     Path: {}", db.path().display());
                }

                match db.migration_status().await {
                    Ok(status) => {
                        if status.needs_migration {
                            all_ok = false;
                            if !quiet {
                                println!(
                                    "[!!] Database: Migrations pending (v{} -> v{})",
                                    status.current_version, status.target_version
                                );
                            }
                        } else if !quiet {
                            println!("[OK] Database: Schema v{}", status.current_version);
                        }
                    }
                    Err(e) => {
                        all_ok = false;
                        if !quiet {
                            println!("[!!] Database: Migration check failed - {}", e);
                        }
                    }
                }
            }
            Err(e) => {
                all_ok = false;
                if !quiet {
                    println!("[!!] Database: Health check failed - {}", e);
                }
            }
        },
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Database: Failed to initialize - {}", e);
            }
        }
    }

    // Summary
    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    Ok(())
}
