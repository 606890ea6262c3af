use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

const USAGE: &str = "usage: jin [--config <path>] [--bots <count>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: PathBuf,
    pub bots: Option<usize>,
}

pub fn args_from_env() -> Result<CliArgs> {
    parse_args(env::args().skip(1))
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut args = args.into_iter();
    let mut config_path = None;
    let mut bots = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--bots" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --bots"))?;
                let count = value
                    .parse::<usize>()
                    .map_err(|_| anyhow!("--bots expects a number, got {value}"))?;
                bots = Some(count);
            }
            other => return Err(anyhow!("unknown argument: {other}. {USAGE}")),
        }
    }

    Ok(CliArgs {
        config_path: config_path.unwrap_or_else(|| PathBuf::from("./jin.jsonc")),
        bots,
    })
}
