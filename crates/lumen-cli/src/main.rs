// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Normalizes and inspects JSON light documents.
// Run with: lumen <command> --help

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lumen_agents::CodecAgent;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lumen", version, about = "Normalize and inspect light documents")]
struct Cli {
    /// Codec configuration file. Defaults to `Lumen.toml` when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fail on unknown discriminants, invalid fields and missing required fields.
    #[arg(long, global = true)]
    strict: bool,

    /// Raise the log level (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Re-encode a lights block canonically: defaults elided, fields in order.
    Normalize {
        /// The `{"lights": [...]}` document to read.
        input: PathBuf,
        /// Write here instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Indent the output.
        #[arg(long)]
        pretty: bool,
    },
    /// List the lights of a lights block.
    Inspect {
        /// The `{"lights": [...]}` document to read.
        input: PathBuf,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut codec = config::load_config(cli.config.as_deref())?;
    if cli.strict {
        config::force_strict(&mut codec);
    }
    let agent = CodecAgent::new(codec);
    log::debug!("Codec configuration: {:?}", agent.config());

    match cli.command {
        Command::Normalize {
            input,
            output,
            pretty,
        } => commands::normalize(&agent, &input, output.as_deref(), pretty),
        Command::Inspect { input } => commands::inspect(&agent, &input),
    }
}
