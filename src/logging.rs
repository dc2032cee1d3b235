// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::Path;

fn builder(default_level: &str) -> Builder {
    Builder::from_env(Env::default().default_filter_or(default_level))
}

/// Log to stderr, for the one-shot subcommands.
pub fn init_stderr(default_level: &str) -> Result<()> {
    builder(default_level)
        .target(Target::Stderr)
        .try_init()
        .context("Failed to initialise logger")
}

/// Log to a file so the terminal UI is not drawn over.
pub fn init_file(path: &Path, default_level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    builder(default_level)
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialise logger")
}
