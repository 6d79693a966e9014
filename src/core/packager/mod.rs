//! # Packager
//!
//! Turns a source APK into a signed, traffic-inspectable rebuild. `run` is
//! the one entry point: it prepares the run's directories and drives the
//! stages through [`build::build`].

pub mod build;
pub mod env;
pub mod stages;

use crate::core::config::Config;
use crate::core::process::CommandRunner;
use build::{BuildReport, Failure, State};
use env::BuildEnv;
use stages::ApkStages;

pub fn run(config: &Config, runner: &impl CommandRunner) -> Result<BuildReport, Failure> {
    let env = BuildEnv::prepare(&config.apk, &config.work_dir).map_err(|error| Failure {
        reached: State::Init,
        error,
    })?;
    let stages = ApkStages::new(runner, &config.tools);
    build::build(&env, &config.keystore, &stages)
}
