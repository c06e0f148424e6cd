//! `tagcodec` CLI: encode, decode, and round-trip tagged text; build catalog reports.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to tagged text (stdin → stdout)
//! echo '{"name":"Atomic Habits","price_EUR":12.5}' | tagcodec encode
//!
//! # Decode tagged text back to pretty-printed JSON
//! tagcodec decode -i book.tag
//!
//! # Encode, decode again, and report whether the trees match
//! tagcodec roundtrip -i book.json
//!
//! # Render JSON as XML
//! tagcodec xml --root book -i book.json
//!
//! # Filter scraped products by price and emit the report
//! tagcodec catalog -i products.json --min 50 --max 500 --mdl-per-eur 19.5
//! tagcodec catalog -i products.json --config catalog.json --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::io::{self, Read};
use tagcodec_core::{catalog, json, xml, CatalogConfig, Value};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "tagcodec",
    version,
    about = "Type-tagged text codec and catalog report CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON to tagged text
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode tagged text back to JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Encode JSON, decode the result, and check both trees are equal
    Roundtrip {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Render JSON as XML
    Xml {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Name of the root element
        #[arg(long, default_value = "root")]
        root: String,
    },
    /// Build a price report from a JSON array of scraped products
    Catalog {
        /// Input products file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// JSON configuration file (rates and price window)
        #[arg(long)]
        config: Option<String>,
        /// Override the MDL per EUR exchange rate
        #[arg(long)]
        mdl_per_eur: Option<f64>,
        /// Override the lower bound of the MDL price window
        #[arg(long)]
        min: Option<f64>,
        /// Override the upper bound of the MDL price window
        #[arg(long)]
        max: Option<f64>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Tagged)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Tagged,
    Json,
    Xml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Encode { input, output } => {
            let text = read_input(input.as_deref())?;
            let value = json::parse(&text).context("Failed to read JSON input")?;
            write_output(output.as_deref(), &tagcodec_core::encode(&value))?;
        }
        Commands::Decode { input, output } => {
            let text = read_input(input.as_deref())?;
            let value = tagcodec_core::decode(&text).context("Failed to decode tagged text")?;
            let pretty = json::encode(&value).context("Failed to render JSON")?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Roundtrip { input } => {
            let text = read_input(input.as_deref())?;
            let value = json::parse(&text).context("Failed to read JSON input")?;
            print_roundtrip(&value)?;
        }
        Commands::Xml {
            input,
            output,
            root,
        } => {
            let text = read_input(input.as_deref())?;
            let value = json::parse(&text).context("Failed to read JSON input")?;
            write_output(output.as_deref(), &xml::encode(&value, &root))?;
        }
        Commands::Catalog {
            input,
            output,
            config,
            mdl_per_eur,
            min,
            max,
            format,
        } => {
            let config = build_config(config.as_deref(), mdl_per_eur, min, max)?;
            debug!(?config, "catalog configuration");

            let text = read_input(input.as_deref())?;
            let products =
                catalog::read_products(&text).context("Failed to read product records")?;
            let report = catalog::process(&products, &config, chrono::Utc::now())
                .context("Failed to process catalog")?;
            let value = report.to_value();

            match format {
                Format::Tagged => {
                    if output.is_some() {
                        write_output(output.as_deref(), &tagcodec_core::encode(&value))?;
                    } else {
                        print_roundtrip(&value)?;
                    }
                }
                Format::Json => {
                    let pretty = json::encode(&value).context("Failed to render JSON")?;
                    write_output(output.as_deref(), &pretty)?;
                }
                Format::Xml => {
                    write_output(output.as_deref(), &xml::encode(&value, "catalog"))?;
                }
            }
        }
    }

    Ok(())
}

/// Print the encoded text and the equality check, failing if decoding fails
/// or the decoded tree differs.
fn print_roundtrip(value: &Value) -> Result<()> {
    let (text, equal) =
        tagcodec_core::roundtrip(value).context("Failed to decode the encoded text")?;
    info!(bytes = text.len(), equal, "round-trip complete");
    println!("{}", text);
    println!("Round-trip equal: {}", equal);
    if !equal {
        anyhow::bail!("decoded value differs from the original");
    }
    Ok(())
}

/// Load the catalog configuration: defaults, then `--config` file, then flag overrides.
fn build_config(
    path: Option<&str>,
    mdl_per_eur: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<CatalogConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            CatalogConfig::from_json(&raw)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => CatalogConfig::default(),
    };

    if let Some(rate) = mdl_per_eur {
        config.rates.mdl_per_eur = rate;
    }
    if let Some(min) = min {
        config.min_price_mdl = min;
    }
    if let Some(max) = max {
        config.max_price_mdl = max;
    }
    config.validate().context("Invalid catalog configuration")?;
    Ok(config)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
