use crate::core::config::KeystoreConfig;
use crate::core::process::Invocation;
use std::path::Path;

pub const TOOL: &str = "keytool";

/// `keytool -genkey` for a fresh keystore holding one RSA key.
///
/// The store password doubles as the key password, so a freshly generated
/// keystore opens with a single secret.
pub fn genkey(keytool: &Path, keystore: &KeystoreConfig) -> Invocation {
    Invocation::new(TOOL, keytool)
        .arg("-genkey")
        .arg("-v")
        .arg("-dname")
        .arg(&keystore.dname)
        .arg("-validity")
        .arg(keystore.validity_days.to_string())
        .arg("-keyalg")
        .arg(&keystore.key_algorithm)
        .arg("-keystore")
        .arg(&keystore.path)
        .arg("-alias")
        .arg(&keystore.alias)
        .arg("-storepass")
        .secret(&keystore.store_password)
        .arg("-keypass")
        .secret(&keystore.store_password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::KeystoreSettings;

    #[test]
    fn genkey_template() {
        let keystore = KeystoreConfig {
            store_password: "s3cret; rm -rf /".into(),
            key_password: "other".into(),
            ..KeystoreSettings::default().into()
        };
        let inv = genkey(Path::new("/jdk/bin/keytool"), &keystore);
        assert_eq!(
            inv.args_lossy(),
            [
                "-genkey",
                "-v",
                "-dname",
                "cn=apkproxy, ou=apkproxy, o=apkproxy, c=IN",
                "-validity",
                "20000",
                "-keyalg",
                "RSA",
                "-keystore",
                "apkproxy.jks",
                "-alias",
                "apkproxy",
                "-storepass",
                "s3cret; rm -rf /",
                "-keypass",
                "s3cret; rm -rf /",
            ]
        );
        assert!(!inv.display().contains("s3cret"));
    }
}
