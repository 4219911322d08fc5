//! cliscrape: parse network device CLI output into labeled JSON records.

use clap::{Args, Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "cliscrape")]
#[command(about = "Extract labeled records from CLI output with hierarchical regex trees")]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the configuration tree comes from.
#[derive(Args, Debug, Clone)]
pub struct TreeSource {
    /// JSON file with a configuration tree (array of match/level/submatch nodes)
    #[arg(short = 'c', long = "config", conflicts_with = "schema")]
    pub config: Option<String>,

    /// JSON schema catalogue (defaults to the configured schema file)
    #[arg(short = 's', long = "schema")]
    pub schema: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse text from a file or stdin into records
    #[command(visible_alias = "p")]
    Parse {
        /// File to read (reads stdin if not provided)
        file: Option<String>,

        #[command(flatten)]
        source: TreeSource,

        /// Command that produced the output (selects the schema)
        #[arg(long = "command")]
        command: Option<String>,

        /// Hardware type used for schema selection
        #[arg(long = "hw-type")]
        hw_type: Option<String>,

        /// Software type used for schema selection
        #[arg(long = "sw-type")]
        sw_type: Option<String>,

        /// Software version used for schema selection
        #[arg(long = "sw-version")]
        sw_version: Option<String>,

        /// Maximum pattern level (default from config)
        #[arg(short = 'l', long = "level")]
        level: Option<i64>,

        /// Bucket name assigned to records (default from config)
        #[arg(short = 'b', long = "bucket")]
        bucket: Option<String>,

        /// Label prefix part (repeatable; defaults to the device name)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Tag name whose value is appended to labels (repeatable)
        #[arg(short = 'k', long = "key")]
        keys: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(long = "pretty")]
        pretty: bool,
    },

    /// Compile configuration trees and report problems
    Check {
        #[command(flatten)]
        source: TreeSource,
    },

    /// List schemas in the catalogue
    Schemas {
        /// JSON schema catalogue (defaults to the configured schema file)
        #[arg(short = 's', long = "schema")]
        schema: Option<String>,
    },

    /// Write a default config.toml
    Init {
        /// Overwrite an existing config
        #[arg(long = "force")]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            file,
            source,
            command,
            hw_type,
            sw_type,
            sw_version,
            level,
            bucket,
            labels,
            keys,
            pretty,
        } => {
            let selector = commands::Selector {
                command,
                hw_type,
                sw_type,
                sw_version,
            };
            let opts = commands::ParseOptions {
                level,
                bucket,
                labels,
                keys,
                pretty,
            };
            commands::parse(file.as_deref(), &source, &selector, &opts)
        }
        Commands::Check { source } => commands::check(&source),
        Commands::Schemas { schema } => commands::schemas(schema.as_deref()),
        Commands::Init { force } => commands::init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
