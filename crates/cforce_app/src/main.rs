mod platform;

use std::path::PathBuf;

use anyhow::Context;
use cforce_core::Page;
use cforce_engine::EngineHandle;
use cforce_logging::cforce_info;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use platform::config::{api_key_from_env, AppConfig, CONFIG_FILENAME};

/// Passive security intelligence console backed by a generative model.
#[derive(Debug, Parser)]
#[command(name = "cforce", version, about)]
struct Cli {
    /// Config file (RON); defaults to ./cforce.ron
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model name, overriding the config file
    #[arg(short, long)]
    model: Option<String>,

    /// Directory for exported reports, overriding the config file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Page shown at startup
    #[arg(short, long, value_enum, default_value_t = StartPage::Scanner)]
    page: StartPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StartPage {
    Scanner,
    Osint,
    IpExplorer,
    Assistant,
}

impl From<StartPage> for Page {
    fn from(page: StartPage) -> Self {
        match page {
            StartPage::Scanner => Page::Scanner,
            StartPage::Osint => Page::Osint,
            StartPage::IpExplorer => Page::IpExplorer,
            StartPage::Assistant => Page::Assistant,
        }
    }
}

impl Cli {
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let config = cli.apply(AppConfig::load(&config_path));

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        cforce_logging::parse_level(&config.log_level)
    };
    platform::logging::initialize(config.log_destination, level);
    cforce_info!("cforce starting model={} output_dir={:?}", config.model, config.output_dir);

    let api_key = api_key_from_env()?;
    let engine = EngineHandle::with_gemini(config.engine_config(), config.gateway_settings(api_key))
        .context("starting engine")?;

    platform::app::run_app(engine, cli.page.into()).context("terminal session")?;
    Ok(())
}

#[cfg(test)]
mod cli {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "cforce",
            "--model",
            "gemini-x",
            "--output-dir",
            "out",
            "--page",
            "ip-explorer",
            "-v",
        ])
        .expect("cli should parse");

        assert!(cli.verbose);
        assert_eq!(Page::from(cli.page), Page::IpExplorer);
        let config = cli.apply(AppConfig::default());
        assert_eq!(config.model, "gemini-x");
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn defaults_start_on_scanner() {
        let cli = Cli::try_parse_from(["cforce"]).expect("cli should parse");
        assert_eq!(cli.page, StartPage::Scanner);
        assert_eq!(cli.apply(AppConfig::default()), AppConfig::default());
    }
}
