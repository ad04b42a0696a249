use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use csv_dialect::{Dialect, DetectorConfig, DialectDetector, DialectError, SampleReader};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Detect the dialect of delimited text files
#[derive(Parser)]
#[command(name = "csvsniff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Detector configuration file (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// How a dialect is printed
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human readable summary
    Text,
    /// JSON record
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the full dialect of a sample (delimiter, quote, terminator, quoting style)
    Detect {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also guess whether the first row is a header
        #[arg(long)]
        header: bool,
    },

    /// Guess delimiter and quote with the lighter sniffing heuristics
    Sniff {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Split every line into fields and print each row as a JSON array
    Tokenize {
        /// Input file (use '-' for stdin)
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: String,

        /// Use this delimiter instead of detecting one
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Use this quote character instead of the detected one
        #[arg(long)]
        quote: Option<char>,

        /// Escape character placed before literal quotes
        #[arg(long)]
        escape: Option<char>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DetectorConfig::default(),
    };
    let detector = DialectDetector::with_config(config)
        .map_err(|e| map_dialect_error(e, "Loading configuration"))?;

    match cli.command {
        Commands::Detect {
            input,
            format,
            header,
        } => detect_command(&detector, &input, format, header),
        Commands::Sniff { input, format } => sniff_command(&detector, &input, format),
        Commands::Tokenize {
            input,
            delimiter,
            quote,
            escape,
        } => tokenize_command(&detector, &input, delimiter, quote, escape),
    }
}

/// Set up logging based on verbosity flags; `RUST_LOG` takes precedence
fn setup_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Load a detector configuration from a JSON file
fn load_config(path: &Path) -> Result<DetectorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: DetectorConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    log::debug!("Loaded configuration from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Read input from file or stdin
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}

/// Write output to stdout
fn write_output(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Execute the detect command
fn detect_command(
    detector: &DialectDetector,
    input: &str,
    format: OutputFormat,
    header: bool,
) -> Result<()> {
    let sample = read_input(input)?;
    log::info!("Detecting dialect of {} ({} bytes)", input, sample.len());

    let dialect = detector
        .detect(&sample)
        .map_err(|e| map_dialect_error(e, "Dialect detection"))?;
    let has_header = header.then(|| detector.has_header_with(&sample, &dialect));

    write_output(&render_dialect(&dialect, has_header, format)?)
}

/// Execute the sniff command
fn sniff_command(detector: &DialectDetector, input: &str, format: OutputFormat) -> Result<()> {
    let sample = read_input(input)?;
    log::info!("Sniffing dialect of {} ({} bytes)", input, sample.len());

    let dialect = detector
        .sniff(&sample)
        .map_err(|e| map_dialect_error(e, "Dialect sniffing"))?;

    write_output(&render_dialect(&dialect, None, format)?)
}

/// Execute the tokenize command
fn tokenize_command(
    detector: &DialectDetector,
    input: &str,
    delimiter: Option<char>,
    quote: Option<char>,
    escape: Option<char>,
) -> Result<()> {
    let sample = read_input(input)?;

    let mut dialect = match delimiter {
        Some(delimiter) => Dialect::new(delimiter)
            .with_line_terminator(csv_dialect::detect::detect_line_terminator(&sample)),
        None => detector
            .detect(&sample)
            .map_err(|e| map_dialect_error(e, "Dialect detection"))?,
    };
    if quote.is_some() {
        dialect = dialect.with_quote_char(quote);
    }
    dialect = dialect.with_escape_char(escape);
    dialect
        .validate()
        .map_err(|e| map_dialect_error(e, "Dialect overrides"))?;

    let mut reader = SampleReader::new(&sample, &dialect);
    let mut output = String::new();
    for record in reader.by_ref() {
        output.push_str(&serde_json::to_string(&record.fields)?);
        output.push('\n');
    }
    log::info!(
        "Tokenized {} rows ({} blank lines skipped)",
        reader.position(),
        reader.skipped_lines()
    );

    write_output(&output)
}

/// Render a dialect in the requested format
fn render_dialect(dialect: &Dialect, has_header: Option<bool>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(dialect)?;
            if let (Some(has_header), Some(object)) = (has_header, value.as_object_mut()) {
                object.insert("has_header".to_string(), serde_json::Value::Bool(has_header));
            }
            Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
        }
        OutputFormat::Text => {
            let mut text = String::new();
            text.push_str(&format!("Delimiter: {}\n", printable(Some(dialect.delimiter))));
            text.push_str(&format!("Quote: {}\n", printable(dialect.quote_char)));
            text.push_str(&format!("Escape: {}\n", printable(dialect.escape_char)));
            text.push_str(&format!("Line terminator: {}\n", dialect.line_terminator));
            text.push_str(&format!("Quoting: {}\n", dialect.quoting));
            if let Some(has_header) = has_header {
                text.push_str(&format!("Header: {}\n", if has_header { "yes" } else { "no" }));
            }
            Ok(text)
        }
    }
}

/// Show a dialect character so that tabs and other control characters stay visible
fn printable(c: Option<char>) -> String {
    match c {
        Some(c) => format!("{:?}", c),
        None => "(none)".to_string(),
    }
}

/// Map DialectError to anyhow::Error with context
fn map_dialect_error(error: DialectError, context: &str) -> anyhow::Error {
    match error {
        DialectError::DataSampleTooShort { found, required } => anyhow::anyhow!(
            "{}: sample has {} non-blank lines, at least {} are needed",
            context,
            found,
            required
        ),
        DialectError::CannotDetermineDialect { reason } => {
            anyhow::anyhow!("{}: unable to determine the dialect: {}", context, reason)
        }
        DialectError::InvalidDialect(message) => {
            anyhow::anyhow!("{}: invalid dialect: {}", context, message)
        }
        DialectError::InvalidConfig(message) => {
            anyhow::anyhow!("{}: invalid configuration: {}", context, message)
        }
        DialectError::Pattern(e) => anyhow::anyhow!("{}: pattern error: {}", context, e),
    }
}
