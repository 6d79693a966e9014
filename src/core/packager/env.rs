use crate::android::layout::DecompiledTree;
use crate::core::error::{Error, Result};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Paths of one run. Every directory in here is fresh for the run and is
/// left in place afterwards so a failed run can be inspected.
#[derive(Clone, Debug)]
pub struct BuildEnv {
    apk: PathBuf,
    apk_name: OsString,
    tree: DecompiledTree,
    output_dir: PathBuf,
}

impl BuildEnv {
    pub fn new(apk: PathBuf, tree_dir: PathBuf, output_dir: PathBuf) -> Result<Self> {
        let apk_name = apk
            .file_name()
            .ok_or_else(|| Error::Usage(format!("`{}` is not an APK file path", apk.display())))?
            .to_os_string();
        Ok(Self {
            apk,
            apk_name,
            tree: DecompiledTree::new(tree_dir),
            output_dir,
        })
    }

    /// Check the source APK is readable, then create the working tree
    /// directory (`apktool-XXXXXX`) and the output directory
    /// (`apkproxy-<name>-XXXXXX`) inside `work_dir`.
    pub fn prepare(apk: &Path, work_dir: &Path) -> Result<Self> {
        File::open(apk).map_err(|e| Error::io(apk, e))?;

        let stem = apk
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tree_dir = fresh_dir(work_dir, "apktool-")?;
        let output_dir = fresh_dir(work_dir, &format!("apkproxy-{stem}-"))?;

        Self::new(apk.to_path_buf(), tree_dir, output_dir)
    }

    pub fn apk(&self) -> &Path {
        &self.apk
    }

    pub fn tree(&self) -> &DecompiledTree {
        &self.tree
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn rebuilt_apk(&self) -> PathBuf {
        let mut name = OsString::from("modded-");
        name.push(&self.apk_name);
        self.output_dir.join(name)
    }

    pub fn signed_dir(&self) -> PathBuf {
        self.output_dir.join("signed")
    }
}

fn fresh_dir(parent: &Path, prefix: &str) -> Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(parent)
        .map_err(|e| Error::io(parent, e))?
        .keep();
    let dir = dunce::canonicalize(&dir).map_err(|e| Error::io(&dir, e))?;
    log::debug!("Created {}", dir.display());
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn output_paths_follow_apk_name() {
        let env = BuildEnv::new("in/app.apk".into(), "w/apktool-1".into(), "w/out".into()).unwrap();
        assert_eq!(env.rebuilt_apk(), Path::new("w/out/modded-app.apk"));
        assert_eq!(env.signed_dir(), Path::new("w/out/signed"));
        assert_eq!(env.tree().manifest(), Path::new("w/apktool-1/AndroidManifest.xml"));
    }

    #[test]
    fn prepare_creates_fresh_persistent_dirs() {
        let work = tempdir().unwrap();
        let apk = work.path().join("demo.apk");
        fs::write(&apk, b"PK").unwrap();

        let first = BuildEnv::prepare(&apk, work.path()).unwrap();
        let second = BuildEnv::prepare(&apk, work.path()).unwrap();

        assert!(first.tree().root().is_dir());
        assert!(first.output_dir().is_dir());
        assert_ne!(first.tree().root(), second.tree().root());
        assert_ne!(first.output_dir(), second.output_dir());

        let out_name = first.output_dir().file_name().unwrap().to_string_lossy();
        assert!(out_name.starts_with("apkproxy-demo-"), "{out_name}");
        let tree_name = first.tree().root().file_name().unwrap().to_string_lossy();
        assert!(tree_name.starts_with("apktool-"), "{tree_name}");
    }

    #[test]
    fn unreadable_apk_fails_before_creating_anything() {
        let work = tempdir().unwrap();
        let err = BuildEnv::prepare(&work.path().join("missing.apk"), work.path()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }
}
