//! Where apktool puts the two files this tool edits.

use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "AndroidManifest.xml";
pub const NETWORK_SECURITY_CONFIG_FILE: &str = "network_security_config.xml";

/// Resource reference the manifest uses to point at the config document.
pub const NETWORK_SECURITY_CONFIG_RES: &str = "@xml/network_security_config";

/// A directory produced by `apktool d`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompiledTree {
    root: PathBuf,
}

impl DecompiledTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn xml_res_dir(&self) -> PathBuf {
        self.root.join("res").join("xml")
    }

    pub fn network_security_config(&self) -> PathBuf {
        self.xml_res_dir().join(NETWORK_SECURITY_CONFIG_FILE)
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_relative_to_the_tree() {
        let tree = DecompiledTree::new("/work/apktool-abc");
        assert_eq!(
            tree.network_security_config(),
            Path::new("/work/apktool-abc/res/xml/network_security_config.xml")
        );
        assert_eq!(
            tree.manifest(),
            Path::new("/work/apktool-abc/AndroidManifest.xml")
        );
        assert_eq!(tree.root(), Path::new("/work/apktool-abc"));
    }

    #[test]
    fn resource_reference_matches_file_name() {
        let stem = NETWORK_SECURITY_CONFIG_FILE.trim_end_matches(".xml");
        assert_eq!(NETWORK_SECURITY_CONFIG_RES, format!("@xml/{stem}"));
    }
}
