// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use textalign::app_config::{self, Config};
use textalign::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean raw documents and write processed chapter files
    Process {
        /// Only process documents with this slug
        #[arg(long)]
        slug: Option<String>,

        /// Also write quality reports (text and JSON) next to the chapters
        #[arg(long)]
        report: bool,
    },

    /// Run the pipeline without writing and print the quality reports
    Check {
        /// Only check documents with this slug
        #[arg(long)]
        slug: Option<String>,
    },

    /// Load processed chapters into the store
    Seed {
        /// Only seed this text
        #[arg(long)]
        slug: Option<String>,
    },

    /// Store translation chapter files for a seeded text
    ImportTranslation {
        /// Text slug
        slug: String,

        /// Directory holding translated chapter-NNN.json files
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Check source/translation alignment and contamination across the store
    Verify,

    /// Replace one translation paragraph, keeping the chapter aligned
    Repair {
        /// Text slug
        slug: String,

        /// Chapter number
        chapter: u32,

        /// Index of the translation paragraph to replace
        index: u32,

        /// Replacement text; blank lines split it into several paragraphs
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the replacement text from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Fetch raw chapters from ctext.org
    Acquire {
        /// First chapter to fetch
        #[arg(long)]
        start: Option<u32>,

        /// Last chapter to fetch
        #[arg(long)]
        end: Option<u32>,

        /// Delay between requests in milliseconds
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Generate shell completions for textalign
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// textalign - text cleaning and paragraph alignment
///
/// Cleans raw digitized texts into paragraph-numbered chapter files, stores
/// them and checks translations against them.
#[derive(Parser, Debug)]
#[command(name = "textalign")]
#[command(version)]
#[command(about = "Text cleaning and paragraph alignment pipeline")]
#[command(long_about = "textalign cleans raw digitized texts into paragraph-numbered chapter files.

EXAMPLES:
    textalign process                           # Process every configured document
    textalign process --slug diarium-urbis-romae --report
    textalign check --slug carmina-graeca       # Print quality reports only
    textalign seed                              # Load processed chapters into the store
    textalign import-translation zhuzi-yulei translations/zhuzi-yulei
    textalign verify                            # Alignment and contamination report
    textalign repair zhuzi-yulei 12 4 --file fix.txt
    textalign acquire --start 41 --end 60       # Fetch ctext.org chapters
    textalign completions bash > textalign.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in textalign.json by default. You can specify a
    different config file with --config-path. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "textalign.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Store file, overriding the configured one
    #[arg(long, global = true, env = "TEXTALIGN_STORE")]
    store: Option<PathBuf>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Load the configuration, creating a default one when the file is missing
fn load_or_create_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(store) = &options.store {
        config.store.path = Some(store.clone());
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "textalign", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_or_create_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match run_command(&controller, cli.command).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

// @returns: Whether the command finished without tallied failures
async fn run_command(controller: &Controller, command: Commands) -> Result<bool> {
    match command {
        Commands::Process { slug, report } => {
            let summary = controller.process(slug.as_deref(), report)?;
            Ok(summary.is_success())
        }
        Commands::Check { slug } => {
            let outcome = controller.check(slug.as_deref())?;
            print!("{}", outcome.report);
            info!(
                "Quality: {} PASS, {} WARN, {} FAIL",
                outcome.quality.passed, outcome.quality.warned, outcome.quality.failed
            );
            Ok(outcome.summary.is_success() && outcome.quality.failed == 0)
        }
        Commands::Seed { slug } => {
            let summary = controller.seed(slug.as_deref())?;
            Ok(summary.rejected == 0 && summary.failed_texts == 0)
        }
        Commands::ImportTranslation { slug, dir } => {
            let summary = controller.import_translation(&slug, &dir)?;
            Ok(summary.rejected == 0)
        }
        Commands::Verify => {
            let outcome = controller.verify()?;
            print!("{}", outcome.report);
            Ok(outcome.issues == 0)
        }
        Commands::Repair {
            slug,
            chapter,
            index,
            text,
            file,
        } => {
            let replacement = match (text, file) {
                (Some(text), _) => text,
                (None, Some(file)) => std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read replacement file: {:?}", file))?,
                (None, None) => return Err(anyhow!("Either --text or --file is required")),
            };
            controller.repair(&slug, chapter, index, &replacement)?;
            Ok(true)
        }
        Commands::Acquire { start, end, delay } => {
            let summary = controller.acquire(start, end, delay).await?;
            Ok(summary.errors == 0 && summary.stopped_at.is_none())
        }
        Commands::Completions { .. } => Ok(true),
    }
}
