use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use easyleaf_log::{catalog, LogParser, ParserConfig};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "easyleaf")]
#[command(about = "EasyLeaf LaTeX log tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract errors from a compiler log and emit JSON
    Parse {
        /// Path to the .log file, or `-` for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Report every error instead of the most actionable one
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        tuning: Tuning,
    },
    /// Extract every error and attach known quick-fix hints
    Explain {
        /// Path to the .log file, or `-` for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        tuning: Tuning,
    },
    /// Print the catalog of known error patterns
    Patterns,
}

#[derive(Args)]
struct Tuning {
    /// JSON file with parser settings
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Characters searched past a `!` line for its `l.<n>` marker
    #[arg(long, value_name = "CHARS")]
    lookahead: Option<usize>,
}

impl Tuning {
    fn build_parser(&self) -> anyhow::Result<LogParser> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                ParserConfig::from_json(&raw)
                    .with_context(|| format!("loading config {}", path.display()))?
            }
            None => ParserConfig::default(),
        };
        if let Some(window) = self.lookahead {
            config.lookahead_window = window;
        }
        log::debug!("parser config: {:?}", config);
        Ok(LogParser::with_config(config)?)
    }
}

fn read_log(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("reading log from stdin")?;
        return Ok(content);
    }
    // Logs are not always valid UTF-8 (TeX echoes raw input bytes).
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Parse { path, all, tuning } => {
            let parser = tuning.build_parser()?;
            let content = read_log(path)?;
            if *all {
                let records = parser.parse_all(&content);
                log::info!("{} error(s) in {}", records.len(), path.display());
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let record = parser.parse(&content);
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        }
        Commands::Explain { path, tuning } => {
            let parser = tuning.build_parser()?;
            let content = read_log(path)?;
            let diagnoses = catalog::diagnose(parser.parse_all(&content));
            println!("{}", serde_json::to_string_pretty(&diagnoses)?);
        }
        Commands::Patterns => {
            println!("{}", serde_json::to_string_pretty(catalog::patterns())?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_lookahead_flag_overrides_default() {
        let cli = Cli::try_parse_from(["easyleaf", "parse", "main.log", "--all", "--lookahead", "900"])
            .unwrap();
        let Commands::Parse { all, tuning, .. } = cli.command else {
            panic!("Expected parse command");
        };
        assert!(all);
        let parser = tuning.build_parser().unwrap();
        assert_eq!(parser.config().lookahead_window, 900);
    }

    #[test]
    fn test_zero_lookahead_rejected() {
        let tuning = Tuning {
            config: None,
            lookahead: Some(0),
        };
        assert!(tuning.build_parser().is_err());
    }
}
