use std::io::Write;

use log::debug;
use shared::error::SharedError;

use crate::Cli;
use crate::commands::{self, Context};
use crate::config::load_device_config;
use crate::storage::FsBackend;

/// Resolve configuration and storage for `cli`, then run its command.
pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<(), SharedError> {
    let config = load_device_config(cli.config.as_deref())?;
    let backend = FsBackend::new(&cli.dir);
    debug!("using device files in {}", cli.dir.display());

    let mut context = Context {
        config,
        backend,
        out,
    };
    commands::run(cli.command, &mut context)
}
