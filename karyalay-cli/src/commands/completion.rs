//! Shell completion scripts for the `karyalay` command.

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{Shell, generate};

/// Writes the completion script for `shell` to `out`.
///
/// The script is registered under the command's display name, `karyalay`,
/// which is the name operators install the binary as.
pub fn write_completion(shell: Shell, out: &mut dyn Write) {
    let mut command = crate::Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, out);
}

/// Prints the completion script for `shell` to stdout.
pub fn generate_completion(shell: Shell) {
    write_completion(shell, &mut io::stdout());
}
