use crate::android::layout::DecompiledTree;
use crate::android::tools::Toolchain;
use crate::android::{manifest, network_config};
use crate::core::config::{KeystoreConfig, ToolPaths};
use crate::core::error::{Error, Result};
use crate::core::process::CommandRunner;
use std::fs;
use std::path::Path;

/// The steps the orchestrator sequences. Each one either finishes or fails
/// the run; none of them is retried.
#[cfg_attr(test, mockall::automock)]
pub trait Stages {
    fn decompile(&self, apk: &Path, tree: &DecompiledTree) -> Result<()>;
    fn patch_network_config(&self, path: &Path) -> Result<()>;
    fn patch_manifest(&self, path: &Path) -> Result<()>;
    fn rebuild(&self, tree: &DecompiledTree, out_file: &Path) -> Result<()>;
    fn keystore_exists(&self, keystore: &KeystoreConfig) -> bool;
    fn generate_keystore(&self, keystore: &KeystoreConfig) -> Result<()>;
    fn sign(&self, apk: &Path, keystore: &KeystoreConfig, out_dir: &Path) -> Result<()>;
}

/// The real stages: external tools through a runner, patchers on disk.
pub struct ApkStages<'a, R: CommandRunner> {
    toolchain: Toolchain<'a, R>,
}

impl<'a, R: CommandRunner> ApkStages<'a, R> {
    pub fn new(runner: &'a R, tools: &'a ToolPaths) -> Self {
        Self {
            toolchain: Toolchain::new(runner, tools),
        }
    }
}

impl<R: CommandRunner> Stages for ApkStages<'_, R> {
    fn decompile(&self, apk: &Path, tree: &DecompiledTree) -> Result<()> {
        self.toolchain.decompile(apk, tree.root()).map(|_| ())
    }

    fn patch_network_config(&self, path: &Path) -> Result<()> {
        network_config::patch(path)
    }

    fn patch_manifest(&self, path: &Path) -> Result<()> {
        manifest::patch(path).map(|_| ())
    }

    fn rebuild(&self, tree: &DecompiledTree, out_file: &Path) -> Result<()> {
        self.toolchain.rebuild(tree, out_file)
    }

    fn keystore_exists(&self, keystore: &KeystoreConfig) -> bool {
        keystore.path.exists()
    }

    fn generate_keystore(&self, keystore: &KeystoreConfig) -> Result<()> {
        self.toolchain.generate_keystore(keystore)
    }

    fn sign(&self, apk: &Path, keystore: &KeystoreConfig, out_dir: &Path) -> Result<()> {
        // Not `create_dir_all`: a leftover `signed/` must not be reused.
        fs::create_dir(out_dir).map_err(|e| Error::io(out_dir, e))?;
        self.toolchain.sign(apk, keystore, out_dir)
    }
}
