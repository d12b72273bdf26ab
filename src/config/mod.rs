//! # Command line configuration

use crate::command::Direction;
use crate::convert::Options;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::Deserialize;
use std::path::PathBuf;
use structopt::StructOpt;
use tokio::fs::read_to_string;
use tracing::instrument;

/// The commandline flags
#[derive(Debug, StructOpt)]
#[structopt(about = "Convert between editor documents and portable blocks")]
pub struct Flags {
    /// What to convert the input into (`to-portable`, `from-portable` or `text`)
    pub direction: Direction,
    /// Which config file to use
    #[structopt(long = "cfg", short = "c")]
    pub cfg: Option<PathBuf>,
    /// The file to read (stdin if absent)
    #[structopt(long = "input", short = "i")]
    pub input: Option<PathBuf>,
    /// The file to write (stdout if absent)
    #[structopt(long = "output", short = "o")]
    pub output: Option<PathBuf>,
    /// Generate keys `k0`, `k1`, ... instead of random ones
    #[structopt(long = "sequential-keys")]
    pub sequential_keys: bool,
    /// Pretty-print the JSON output
    #[structopt(long = "pretty")]
    pub pretty: bool,
}

/// How block keys are generated
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStyle {
    Random,
    Sequential,
}

impl Default for KeyStyle {
    fn default() -> Self {
        Self::Random
    }
}

/// A configuration file
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// How block keys are generated
    #[serde(default)]
    pub keys: KeyStyle,
    /// Whether to pretty-print the output
    #[serde(default)]
    pub pretty: bool,
    /// The conversion options
    #[serde(default)]
    pub convert: Options,
}

/// The setup that we are actually using
#[derive(Debug)]
pub struct Setup {
    pub direction: Direction,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub keys: KeyStyle,
    pub pretty: bool,
    pub options: Options,
}

impl Config {
    /// Parse a configuration file
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).wrap_err("Could not parse config file")
    }
}

impl Flags {
    #[instrument]
    /// Load the configuration file, if any, and apply the flags on top
    pub async fn load_cfg(&self) -> Result<Setup> {
        let config = match &self.cfg {
            Some(cfg) => {
                let cfg_string: String = read_to_string(cfg)
                    .await
                    .wrap_err("Could not read config file")?;
                Config::from_toml(&cfg_string)?
            }
            None => Config::default(),
        };
        Ok(self.apply(config))
    }

    fn apply(&self, config: Config) -> Setup {
        Setup {
            direction: self.direction,
            input: self.input.clone(),
            output: self.output.clone(),
            keys: if self.sequential_keys {
                KeyStyle::Sequential
            } else {
                config.keys
            },
            pretty: self.pretty || config.pretty,
            options: config.convert,
        }
    }
}
