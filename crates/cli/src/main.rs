// shipmatch - match marketplace orders to carrier tracking numbers
// Usage: shipmatch run daily.shipmatch.toml

mod exit_codes;
mod inspect;
mod output;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use shipmatch_recon::OutputFormat;

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "shipmatch")]
#[command(about = "Reconcile marketplace orders against carrier shipping manifests")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation batch from a TOML config file
    #[command(after_help = "\
Examples:
  shipmatch run daily.shipmatch.toml
  shipmatch run daily.shipmatch.toml --json
  shipmatch run daily.shipmatch.toml --format csv --output shipping.csv
  shipmatch run daily.shipmatch.toml --date 2026-10-15 --fail-on-unmatched")]
    Run {
        /// Path to the .shipmatch.toml config file
        config: PathBuf,

        /// Print the batch result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Output file (overrides [output].path)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format (overrides [output].format)
        #[arg(long, short = 'f')]
        format: Option<FormatArg>,

        /// Processing date stamped on every row (default: today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,

        /// Exit with code 6 when any order has no carrier match
        #[arg(long)]
        fail_on_unmatched: bool,
    },

    /// Validate a config and check that its input files are present
    #[command(after_help = "\
Examples:
  shipmatch validate daily.shipmatch.toml")]
    Validate {
        /// Path to the .shipmatch.toml config file
        config: PathBuf,
    },

    /// Score each candidate encoding for a file and report the winner
    #[command(after_help = "\
Examples:
  shipmatch detect inbox/佐川.csv
  shipmatch detect manifest.csv --encoding Shift_JIS --encoding EUC-JP --strict
  shipmatch detect manifest.csv --json")]
    Detect {
        /// File to inspect
        file: PathBuf,

        /// Candidate encoding, repeatable (default: UTF-8, Shift_JIS, EUC-JP, ISO-2022-JP)
        #[arg(long = "encoding", short = 'e', value_name = "LABEL")]
        encodings: Vec<String>,

        /// Treat malformed byte sequences as a decode failure
        #[arg(long)]
        strict: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show normalized keys for two names and whether they match
    #[command(after_help = "\
Examples:
  shipmatch match 'ＡＢＣオンラインストア' 'abc online store'
  shipmatch match '山田(株)東京支店' '山田株式会社東京支店' --config daily.shipmatch.toml")]
    Match {
        name_a: String,
        name_b: String,

        /// Take matching rules from this config instead of the defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
    Log,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Log => OutputFormat::Log,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("SHIPMATCH_COMMIT"), ")",
            "\nengine:  shipmatch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("SHIPMATCH_COMMIT"), ")",
            "\nengine:  shipmatch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
        )
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_filter));
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, format, date, fail_on_unmatched } => run::cmd_run(
            config,
            run::RunOptions {
                json,
                output,
                format: format.map(Into::into),
                date,
                fail_on_unmatched,
            },
        ),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Detect { file, encodings, strict, json } => {
            inspect::cmd_detect(file, encodings, strict, json)
        }
        Commands::Match { name_a, name_b, config, json } => {
            inspect::cmd_match(name_a, name_b, config, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
