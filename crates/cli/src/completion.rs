//! Shell completion generation for accelctl

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;

use crate::Cli;

/// Write the completion script for `shell` to stdout
pub fn generate_completion(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "accelctl", &mut io::stdout());
}
