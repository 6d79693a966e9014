//! # Network Security Config
//!
//! Android only honours user-installed CAs if the app opts in through
//! `res/xml/network_security_config.xml`. Whatever the app shipped there is
//! thrown away and replaced by a document trusting both the system store and
//! the user store at the `base-config` level.

use crate::core::error::{Error, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

pub const TRUST_USER_CAS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<network-security-config>
    <base-config>
        <trust-anchors>
            <!-- Trust preinstalled CAs -->
            <certificates src="system" />
            <!-- Additionally trust user added CAs -->
            <certificates src="user" />
        </trust-anchors>
    </base-config>
</network-security-config>
"#;

/// Replace the document at `path` with [`TRUST_USER_CAS`].
///
/// The parent directory must already exist; apktool creates `res/xml` for
/// most packages, and this does not create it on its own.
pub fn patch(path: &Path) -> Result<()> {
    log::info!("Adding user CA trust to {}...", path.display());

    match fs::remove_file(path) {
        Ok(()) => log::debug!("Discarded existing {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(path, e)),
    }

    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;
    file.write_all(TRUST_USER_CAS.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| Error::io(path, e))?;

    log::info!("✅ File created: {}", path.display());
    Ok(())
}
