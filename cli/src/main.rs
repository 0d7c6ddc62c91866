// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use odata_codec_cli::commands::process_command;
use odata_codec_cli::commands::Commands;
use odata_codec_cli::settings::Settings;
use odata_codec_cli::Error;
use std::io::stderr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Converter CLI.
#[derive(Parser, Debug)]
#[command(name = "odata-convert")]
#[command(about = "OData payload converter (Atom / JSON)", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(stderr)
        .init();

    let settings = match &cli.config {
        Some(fname) => Settings::read(fname)?,
        None => Settings::default(),
    };
    for msg in process_command(&cli.command, &settings)? {
        println!("{msg}");
    }
    Ok(())
}
