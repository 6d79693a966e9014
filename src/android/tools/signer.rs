//! uber-apk-signer, launched as `java -jar`.

use crate::core::config::KeystoreConfig;
use crate::core::process::Invocation;
use std::path::Path;

pub const TOOL: &str = "uber-apk-signer";

pub struct SignQuery<'a> {
    pub java: &'a Path,
    pub signer_jar: &'a Path,
    pub apk_file: &'a Path,
    pub keystore: &'a KeystoreConfig,
    pub out_dir: &'a Path,
}

impl SignQuery<'_> {
    pub fn invocation(&self) -> Invocation {
        Invocation::new(TOOL, self.java)
            .arg("-jar")
            .arg(self.signer_jar)
            .arg("-a")
            .arg(self.apk_file)
            .arg("--ks")
            .arg(&self.keystore.path)
            .arg("--ksAlias")
            .arg(&self.keystore.alias)
            .arg("--ksPass")
            .secret(&self.keystore.store_password)
            .arg("--ksKeyPass")
            .secret(&self.keystore.key_password)
            .arg("-out")
            .arg(self.out_dir)
    }
}
