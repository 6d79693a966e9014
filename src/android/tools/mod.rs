//! # External Tool Adapter
//!
//! The decompiler, keystore generator and signer are separate programs. Each
//! operation here is one invocation of one of them, run to completion with
//! its output forwarded to the console. There are no retries; a failing tool
//! fails the run.

pub mod apktool;
pub mod keytool;
pub mod signer;

use super::layout::DecompiledTree;
use crate::core::config::{KeystoreConfig, ToolPaths};
use crate::core::error::Result;
use crate::core::process::CommandRunner;
use std::path::Path;

pub struct Toolchain<'a, R: CommandRunner> {
    runner: &'a R,
    tools: &'a ToolPaths,
}

impl<'a, R: CommandRunner> Toolchain<'a, R> {
    pub fn new(runner: &'a R, tools: &'a ToolPaths) -> Self {
        Self { runner, tools }
    }

    pub fn decompile(&self, apk_file: &Path, out_dir: &Path) -> Result<DecompiledTree> {
        let query = apktool::DecodeQuery {
            apktool: &self.tools.apktool,
            apk_file,
            out_dir,
        };
        self.runner.run(&query.invocation())?;
        Ok(DecompiledTree::new(out_dir))
    }

    pub fn rebuild(&self, tree: &DecompiledTree, out_file: &Path) -> Result<()> {
        let query = apktool::BuildQuery {
            apktool: &self.tools.apktool,
            tree_dir: tree.root(),
            out_file,
        };
        self.runner.run(&query.invocation())
    }

    pub fn generate_keystore(&self, keystore: &KeystoreConfig) -> Result<()> {
        self.runner
            .run(&keytool::genkey(&self.tools.keytool, keystore))
    }

    pub fn sign(&self, apk_file: &Path, keystore: &KeystoreConfig, out_dir: &Path) -> Result<()> {
        let query = signer::SignQuery {
            java: &self.tools.java,
            signer_jar: &self.tools.uber_sign,
            apk_file,
            keystore,
            out_dir,
        };
        self.runner.run(&query.invocation())
    }
}
