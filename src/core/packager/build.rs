use super::env::BuildEnv;
use super::stages::Stages;
use crate::core::config::KeystoreConfig;
use crate::core::error::Error;
use std::path::PathBuf;

/// Progress of a run. Strictly linear: a state is never entered twice and
/// the first failure ends the run where it stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    Init,
    Decompiled,
    ConfigPatched,
    ManifestPatched,
    Rebuilt,
    KeystoreReady,
    Signed,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeystoreOrigin {
    Generated,
    Reused,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    pub tree_dir: PathBuf,
    pub rebuilt_apk: PathBuf,
    pub signed_dir: PathBuf,
    pub keystore: KeystoreOrigin,
}

/// A failed run: the error, and the last state that was fully reached.
/// Whatever that state left on disk is still there.
#[derive(Debug, thiserror::Error)]
#[error("{error} (stopped after {reached:?})")]
pub struct Failure {
    pub reached: State,
    #[source]
    pub error: Error,
}

struct Progress {
    reached: State,
}

impl Progress {
    fn advance(
        &mut self,
        next: State,
        stage: impl FnOnce() -> Result<(), Error>,
    ) -> Result<(), Failure> {
        if let Err(error) = stage() {
            log::error!("❌ {error}");
            return Err(Failure {
                reached: self.reached,
                error,
            });
        }
        log::debug!("{:?} -> {:?}", self.reached, next);
        self.reached = next;
        Ok(())
    }
}

/// Decompile, patch, rebuild, make sure there is a keystore, sign.
pub fn build(
    env: &BuildEnv,
    keystore: &KeystoreConfig,
    stages: &impl Stages,
) -> Result<BuildReport, Failure> {
    let mut progress = Progress {
        reached: State::Init,
    };
    let tree = env.tree();

    progress.advance(State::Decompiled, || {
        log::info!("Decompiling APK...");
        stages.decompile(env.apk(), tree)
    })?;

    progress.advance(State::ConfigPatched, || {
        stages.patch_network_config(&tree.network_security_config())
    })?;

    progress.advance(State::ManifestPatched, || {
        stages.patch_manifest(&tree.manifest())
    })?;

    let rebuilt_apk = env.rebuilt_apk();
    progress.advance(State::Rebuilt, || {
        log::info!("Rebuilding APK...");
        log::info!("OutputDir: {}", rebuilt_apk.display());
        stages.rebuild(tree, &rebuilt_apk)
    })?;

    let mut origin = KeystoreOrigin::Reused;
    progress.advance(State::KeystoreReady, || {
        if stages.keystore_exists(keystore) {
            log::warn!(
                "Reusing existing keystore {}; delete it to get a fresh signing identity",
                keystore.path.display()
            );
            return Ok(());
        }
        log::info!("Generating keystore...");
        stages.generate_keystore(keystore)?;
        if keystore.key_password != keystore.store_password {
            log::warn!(
                "New keystore was generated with the store password as key password; \
                 signing with a different key password will fail"
            );
        }
        origin = KeystoreOrigin::Generated;
        Ok(())
    })?;

    let signed_dir = env.signed_dir();
    progress.advance(State::Signed, || {
        log::info!("Signing APK...");
        log::info!("Signed Path: {}", signed_dir.display());
        stages.sign(&rebuilt_apk, keystore, &signed_dir)
    })?;

    progress.advance(State::Done, || Ok(()))?;

    Ok(BuildReport {
        tree_dir: tree.root().to_path_buf(),
        rebuilt_apk,
        signed_dir,
        keystore: origin,
    })
}
