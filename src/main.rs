use anyhow::{Context, Result};
use apkproxy::core::config::{self, Config, Overrides, Settings};
use apkproxy::core::error::Error;
use apkproxy::core::process::SystemRunner;
use apkproxy::core::{logging, packager};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Rebuild an APK so it trusts user-installed CA certificates, then sign it.
///
/// Tool locations come from APKTOOL_PATH, KEYTOOL_PATH and UBER_SIGN_PATH.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// APK file path
    #[clap(long)]
    apk: PathBuf,
    /// Keystore file path [default: apkproxy.jks]
    #[clap(long)]
    keystore: Option<PathBuf>,
    /// Keystore password [default: apkproxy]
    #[clap(long)]
    storepass: Option<String>,
    /// Keystore key alias [default: apkproxy]
    #[clap(long)]
    keyalias: Option<String>,
    /// Keystore key password [default: apkproxy]
    #[clap(long)]
    keypass: Option<String>,
    /// Settings file with tool locations and keystore defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Directory to create the working and output directories in
    #[clap(long)]
    workdir: Option<PathBuf>,
    /// Log every tool invocation
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let settings = match args.config.as_deref() {
        Some(path) => exit_on_usage(config::load_settings(path), ErrorKind::InvalidValue)
            .with_context(|| format!("Reading settings from `{}`", path.display()))?,
        None => Settings::default(),
    };
    let overrides = Overrides {
        apk: Some(args.apk),
        keystore: args.keystore,
        store_password: args.storepass,
        alias: args.keyalias,
        key_password: args.keypass,
        work_dir: args.workdir,
    };

    let config = exit_on_usage(
        Config::resolve(settings, overrides, |var| std::env::var(var).ok()),
        ErrorKind::MissingRequiredArgument,
    )?;

    let report = packager::run(&config, &SystemRunner)?;

    println!("Decompiled tree: {}", report.tree_dir.display());
    println!("Rebuilt APK: {}", report.rebuilt_apk.display());
    println!("Signed APK in: {}", report.signed_dir.display());
    println!("Done!");
    Ok(())
}

fn usage_error(kind: ErrorKind, msg: impl std::fmt::Display) -> clap::Error {
    Args::command().error(kind, msg)
}

/// Usage errors leave through clap, with its usage text and exit status 2.
fn exit_on_usage<T>(result: std::result::Result<T, Error>, kind: ErrorKind) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(Error::Usage(msg)) => usage_error(kind, msg).exit(),
        Err(e) => Err(e.into()),
    }
}
