use std::fs;
use std::path::Path;

use clap::Parser;
use shared::error::SharedError;
use tempfile::TempDir;

use crate::Cli;
use crate::application;

pub const GESTURE: &str = "up,down,up,down,up";

pub fn device_dir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

/// Run the binary's argument parser and command against `dir`, capturing stdout.
pub fn run_cli(dir: &Path, args: &[&str]) -> Result<String, SharedError> {
    let dir = dir.to_str().expect("utf-8 temp path");
    let cli = Cli::try_parse_from(["pattern-vault", "--dir", dir].iter().chain(args).copied())
        .expect("valid command line");
    let mut out = Vec::new();
    application::execute(cli, &mut out)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

pub fn add(dir: &Path, site: &str, username: &str, secret: &str) -> String {
    run_cli(
        dir,
        &[
            "add",
            "--gesture",
            GESTURE,
            "--site",
            site,
            "--username",
            username,
            "--secret",
            secret,
        ],
    )
    .expect("add record")
}

pub fn list(dir: &Path, show_secrets: bool) -> Result<String, SharedError> {
    let mut args = vec!["list", "--gesture", GESTURE];
    if show_secrets {
        args.push("--show-secrets");
    }
    run_cli(dir, &args)
}

pub fn vault_text(dir: &Path) -> String {
    fs::read_to_string(dir.join(crate::storage::VAULT_FILE)).expect("read vault")
}

pub fn write_script(dir: &Path, script: &str) -> String {
    let path = dir.join("script.txt");
    fs::write(&path, script).expect("write script");
    path.to_str().expect("utf-8 script path").to_owned()
}
