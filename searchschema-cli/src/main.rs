use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use searchschema::Config;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "searchschema")]
#[command(about = "Compile search schema declarations into collection schemas and documents")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SEARCHSCHEMA_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format: "pretty" or "json"
    #[arg(long)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the collection schema of each declaration
    Compile {
        /// Declaration file or directory (default: configured schemas dir)
        path: Option<PathBuf>,

        /// Only this collection
        #[arg(short = 'n', long)]
        collection: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the default query_by list of each declaration
    QueryBy {
        /// Declaration file or directory (default: configured schemas dir)
        path: Option<PathBuf>,

        /// Only this collection
        #[arg(short = 'n', long)]
        collection: Option<String>,
    },

    /// Convert JSON records into searchable documents
    Document {
        /// Declaration file or directory
        path: PathBuf,

        /// Collection the records belong to
        #[arg(short = 'n', long)]
        collection: Option<String>,

        /// JSON file with one record object or an array of records
        #[arg(short, long)]
        record: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Resolve every declaration and report problems
    Lint {
        /// Declaration file or directory (default: configured schemas dir)
        path: Option<PathBuf>,
    },
}

/// Log destination: the configured file (appended to) or stderr.
fn log_writer(config: &Config) -> Result<BoxMakeWriter> {
    match &config.logging.file {
        Some(log_file) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .with_context(|| format!("Failed to open log file {:?}", log_file))?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        // Output goes to stdout, logs to stderr
        None => Ok(BoxMakeWriter::new(std::io::stderr)),
    }
}

fn init_tracing(config: &Config, format_override: Option<&str>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
    );
    let format = format_override
        .map(str::to_string)
        .unwrap_or_else(|| config.log_format());
    let writer = log_writer(config)?;

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_or_create(path)?,
        None => Config::load()?,
    };
    init_tracing(&config, cli.log_format.as_deref())?;

    match cli.command {
        Commands::Compile {
            path,
            collection,
            pretty,
        } => {
            let output = commands::run_compile(&config, path.as_deref(), collection.as_deref())?;
            commands::print_json(&output, pretty)?;
        }
        Commands::QueryBy { path, collection } => {
            for (name, query_by) in
                commands::run_query_by(&config, path.as_deref(), collection.as_deref())?
            {
                println!("{}\t{}", name, query_by);
            }
        }
        Commands::Document {
            path,
            collection,
            record,
            pretty,
        } => {
            let documents =
                commands::run_document(&config, &path, collection.as_deref(), &record)?;
            commands::print_json(&documents, pretty)?;
        }
        Commands::Lint { path } => {
            let issues = commands::run_lint(&config, path.as_deref())?;
            if issues.is_empty() {
                println!("All declarations are valid");
            } else {
                for (name, problems) in &issues {
                    for problem in problems {
                        println!("{}: {}", name, problem);
                    }
                }
                anyhow::bail!("{} declaration(s) with problems", issues.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_log_file_is_appended() -> Result<()> {
        let temp = TempDir::new()?;
        let log_file = temp.path().join("searchschema.log");
        let mut config = Config::default();
        config.logging.file = Some(log_file.clone());

        log_writer(&config)?.make_writer().write_all(b"first\n")?;
        log_writer(&config)?.make_writer().write_all(b"second\n")?;

        assert_eq!(std::fs::read_to_string(&log_file)?, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn test_unwritable_log_file() {
        let mut config = Config::default();
        config.logging.file = Some(PathBuf::from("/nonexistent/dir/searchschema.log"));
        assert!(log_writer(&config).is_err());
    }
}
