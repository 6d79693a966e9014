//! # Apktool
//!
//! Decoding and rebuilding of APKs through the `apktool` executable. Both
//! directions are a single invocation with a fixed argument template.

use crate::core::process::Invocation;
use std::path::Path;

pub const TOOL: &str = "apktool";

/// ## Decode Query
///
/// Parameters of an `apktool d` run. `-f` makes apktool overwrite a stale
/// `out_dir` instead of refusing to run.
pub struct DecodeQuery<'a> {
    /// The `apktool` executable.
    pub apktool: &'a Path,
    /// Source APK. It is only read.
    pub apk_file: &'a Path,
    /// Directory to decode into.
    pub out_dir: &'a Path,
}

/// ## Build Query
///
/// Parameters of an `apktool b` run. Resources are compiled with `aapt2`.
pub struct BuildQuery<'a> {
    /// The `apktool` executable.
    pub apktool: &'a Path,
    /// Decoded tree to rebuild from.
    pub tree_dir: &'a Path,
    /// Output path of the unsigned APK.
    pub out_file: &'a Path,
}

impl DecodeQuery<'_> {
    pub fn invocation(&self) -> Invocation {
        Invocation::new(TOOL, self.apktool)
            .arg("d")
            .arg("-f")
            .arg("-o")
            .arg(self.out_dir)
            .arg(self.apk_file)
    }
}

impl BuildQuery<'_> {
    pub fn invocation(&self) -> Invocation {
        Invocation::new(TOOL, self.apktool)
            .arg("b")
            .arg(self.tree_dir)
            .arg("-o")
            .arg(self.out_file)
            .arg("--use-aapt2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_template() {
        let inv = DecodeQuery {
            apktool: Path::new("/opt/apktool"),
            apk_file: Path::new("my app.apk"),
            out_dir: Path::new("./apktool-1"),
        }
        .invocation();
        assert_eq!(inv.program, Path::new("/opt/apktool"));
        assert_eq!(inv.args_lossy(), ["d", "-f", "-o", "./apktool-1", "my app.apk"]);
    }

    #[test]
    fn build_template() {
        let inv = BuildQuery {
            apktool: Path::new("/opt/apktool"),
            tree_dir: Path::new("./apktool-1"),
            out_file: Path::new("./out/modded-app.apk"),
        }
        .invocation();
        assert_eq!(
            inv.args_lossy(),
            ["b", "./apktool-1", "-o", "./out/modded-app.apk", "--use-aapt2"]
        );
    }
}
