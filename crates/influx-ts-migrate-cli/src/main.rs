//! influx-ts-migrate CLI - InfluxDB to TimescaleDB schema migration.

use clap::{Args, Parser, Subcommand};
use influx_ts_migrate::{
    connect_source, Config, ConnectionConfig, DataSetInfo, MigrateError, SchemaStrategy,
    SchemaTransfer, TransferResult,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "influx-ts-migrate")]
#[command(about = "Migrate InfluxDB measurement schemas to TimescaleDB hypertables")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

/// Connection flags for the InfluxDB source.
#[derive(Args)]
struct InputArgs {
    /// InfluxDB server URL [default: http://localhost:8086]
    #[arg(long)]
    input_server: Option<String>,

    /// InfluxDB username
    #[arg(long)]
    input_user: Option<String>,

    /// InfluxDB password
    #[arg(long)]
    input_pass: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the measurements of an InfluxDB database
    Discover {
        /// Source database
        database: String,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the canonical schema of one measurement
    Describe {
        /// Source database
        database: String,

        /// Measurement to describe
        measure: String,

        #[command(flatten)]
        input: InputArgs,
    },

    /// Create TimescaleDB hypertables for InfluxDB measurements
    SchemaTransfer {
        /// Source database
        database: String,

        /// Measurements to transfer (default: all)
        measures: Vec<String>,

        #[command(flatten)]
        input: InputArgs,

        /// Target connection string [default: sslmode=disable]
        #[arg(long)]
        output_conn: Option<String>,

        /// Target schema (default: the connection's default schema)
        #[arg(long)]
        output_schema: Option<String>,

        /// validate-only, create-if-missing, drop-and-create or drop-cascade-and-create
        #[arg(long)]
        schema_strategy: Option<SchemaStrategy>,

        /// Continue with the next measurement when one fails
        #[arg(long)]
        continue_on_error: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::read(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::new(ConnectionConfig::new("")),
    };

    match cli.command {
        Commands::Discover { database, input } => {
            apply_input(&mut config.connection, database, input);
            config.validate()?;

            let measurements = connect_source(&config.connection)?.list_datasets().await?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&measurements)?);
            } else {
                for measurement in &measurements {
                    println!("{}", measurement);
                }
            }
        }

        Commands::Describe {
            database,
            measure,
            input,
        } => {
            apply_input(&mut config.connection, database, input);
            config.validate()?;

            let info = connect_source(&config.connection)?
                .fetch_dataset(&measure)
                .await?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_dataset(&info);
            }
        }

        Commands::SchemaTransfer {
            database,
            measures,
            input,
            output_conn,
            output_schema,
            schema_strategy,
            continue_on_error,
        } => {
            apply_input(&mut config.connection, database, input);
            if !measures.is_empty() {
                config.connection.input_measures = measures;
            }
            if let Some(conn) = output_conn {
                config.connection.output_conn = conn;
            }
            if let Some(schema) = output_schema {
                config.connection.output_schema = schema;
            }
            if let Some(strategy) = schema_strategy {
                config.schema.strategy = strategy;
            }
            if continue_on_error {
                config.schema.continue_on_error = true;
            }

            // Validated before any connection is opened
            let transfer = SchemaTransfer::connect(&config).await?;
            let cancel_token = setup_signal_handler()?;
            let result = transfer.run(&cancel_token).await?;

            if cli.output_json {
                println!("{}", result.to_json()?);
            } else {
                print_result(&result);
            }

            if result.datasets_failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Apply the positional database and the input flags on top of the file values.
fn apply_input(conn: &mut ConnectionConfig, database: String, input: InputArgs) {
    conn.input_db = database;
    if let Some(server) = input.input_server {
        conn.input_host = server;
    }
    if let Some(user) = input.input_user {
        conn.input_user = user;
    }
    if let Some(pass) = input.input_pass {
        conn.input_pass = pass;
    }
}

fn print_dataset(info: &DataSetInfo) {
    println!("Data set: {}", info.qualified_name());
    println!("  Time column: {}", info.time_column());
    println!("  Columns:");
    for column in info.columns() {
        println!("    {:<30} {}", column.name, column.data_type);
    }
}

fn print_result(result: &TransferResult) {
    println!("\nSchema transfer {}!", result.status);
    println!("  Run ID: {}", result.run_id);
    println!("  Duration: {:.2}s", result.duration_seconds);
    println!(
        "  Measurements: {}/{}",
        result.datasets_success, result.datasets_total
    );
    for outcome in &result.outcomes {
        match (&outcome.outcome, &outcome.error) {
            (Some(done), _) => println!("    {}: {:?}", outcome.dataset, done),
            (None, Some(err)) => println!("    {}: FAILED ({})", outcome.dataset, err),
            (None, None) => {}
        }
    }
    if !result.failed_datasets.is_empty() {
        println!("  Failed measurements: {:?}", result.failed_datasets);
    }
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout is reserved for results
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Setup signal handlers for graceful shutdown.
/// Handles both SIGINT (Ctrl-C) and SIGTERM.
/// Returns a CancellationToken that will be cancelled when a signal is received;
/// the measurement in progress still completes.
#[cfg(unix)]
fn setup_signal_handler() -> Result<CancellationToken, MigrateError> {
    let cancel_token = CancellationToken::new();

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let token = cancel_token.clone();
    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigint.recv() => "SIGINT",
            _ = sigterm.recv() => "SIGTERM",
        };
        eprintln!("\nReceived {}. Stopping after the current measurement...", name);
        token.cancel();
    });

    Ok(cancel_token)
}

/// Setup signal handler for Windows (only Ctrl-C)
#[cfg(not(unix))]
fn setup_signal_handler() -> Result<CancellationToken, MigrateError> {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl-C. Stopping after the current measurement...");
            token.cancel();
        }
    });

    Ok(cancel_token)
}
