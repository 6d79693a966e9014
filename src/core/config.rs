use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APKTOOL_ENV: &str = "APKTOOL_PATH";
pub const KEYTOOL_ENV: &str = "KEYTOOL_PATH";
pub const UBER_SIGN_ENV: &str = "UBER_SIGN_PATH";

pub const DEFAULT_KEYSTORE: &str = "apkproxy.jks";
pub const DEFAULT_CREDENTIAL: &str = "apkproxy";

/// Optional settings file, e.g. `apkproxy.toml`:
///
/// ```toml
/// [tools]
/// apktool = "/opt/apktool/apktool"
///
/// [keystore]
/// path = "research.jks"
/// alias = "research"
/// ```
///
/// Every group carries `#[serde(default)]`, so leaving one out does not
/// invalidate the groups that are present.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Settings {
    #[serde(default)]
    pub tools: ToolSettings,
    #[serde(default)]
    pub keystore: KeystoreSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolSettings {
    pub apktool: Option<PathBuf>,
    pub keytool: Option<PathBuf>,
    pub uber_sign: Option<PathBuf>,
    /// The signer ships as a jar, this is the JVM that launches it.
    #[serde(default = "default_java")]
    pub java: PathBuf,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            apktool: None,
            keytool: None,
            uber_sign: None,
            java: default_java(),
        }
    }
}

fn default_java() -> PathBuf {
    PathBuf::from("java")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KeystoreSettings {
    #[serde(default = "default_keystore_path")]
    pub path: PathBuf,
    #[serde(default = "default_credential")]
    pub alias: String,
    #[serde(default = "default_credential")]
    pub store_password: String,
    #[serde(default = "default_credential")]
    pub key_password: String,
    #[serde(default = "default_dname")]
    pub dname: String,
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    #[serde(default = "default_key_algorithm")]
    pub key_algorithm: String,
}

fn default_keystore_path() -> PathBuf {
    PathBuf::from(DEFAULT_KEYSTORE)
}

fn default_credential() -> String {
    DEFAULT_CREDENTIAL.to_string()
}

fn default_dname() -> String {
    "cn=apkproxy, ou=apkproxy, o=apkproxy, c=IN".to_string()
}

fn default_validity_days() -> u32 {
    20000
}

fn default_key_algorithm() -> String {
    "RSA".to_string()
}

impl Default for KeystoreSettings {
    fn default() -> Self {
        Self {
            path: default_keystore_path(),
            alias: default_credential(),
            store_password: default_credential(),
            key_password: default_credential(),
            dname: default_dname(),
            validity_days: default_validity_days(),
            key_algorithm: default_key_algorithm(),
        }
    }
}

/// A settings file that does not parse is an error. There is no fallback to
/// the defaults.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    toml::from_str::<Settings>(&content)
        .map_err(|e| Error::Usage(format!("invalid settings file `{}`: {e}", path.display())))
}

/// Values given on the command line. They win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub apk: Option<PathBuf>,
    pub keystore: Option<PathBuf>,
    pub store_password: Option<String>,
    pub alias: Option<String>,
    pub key_password: Option<String>,
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub apktool: PathBuf,
    pub keytool: PathBuf,
    pub uber_sign: PathBuf,
    pub java: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreConfig {
    pub path: PathBuf,
    pub alias: String,
    pub store_password: String,
    pub key_password: String,
    pub dname: String,
    pub validity_days: u32,
    pub key_algorithm: String,
}

impl From<KeystoreSettings> for KeystoreConfig {
    fn from(s: KeystoreSettings) -> Self {
        Self {
            path: s.path,
            alias: s.alias,
            store_password: s.store_password,
            key_password: s.key_password,
            dname: s.dname,
            validity_days: s.validity_days,
            key_algorithm: s.key_algorithm,
        }
    }
}

/// Everything one run needs, resolved once at startup and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub apk: PathBuf,
    /// Where the per-run working and output directories are created.
    pub work_dir: PathBuf,
    pub tools: ToolPaths,
    pub keystore: KeystoreConfig,
}

impl Config {
    /// Merge defaults, settings file, environment and command line.
    ///
    /// `env` is the environment lookup; `main` passes `std::env::var`, tests
    /// pass a closure over a fixed table.
    pub fn resolve(
        settings: Settings,
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let Settings { tools, keystore } = settings;

        let apk = overrides
            .apk
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::Usage("missing APK file path".to_string()))?;

        let mut keystore = KeystoreConfig::from(keystore);
        if let Some(path) = overrides.keystore {
            keystore.path = path;
        }
        if let Some(alias) = overrides.alias {
            keystore.alias = alias;
        }
        if let Some(password) = overrides.store_password {
            keystore.store_password = password;
        }
        if let Some(password) = overrides.key_password {
            keystore.key_password = password;
        }
        for (value, name) in [
            (keystore.path.to_string_lossy().as_ref(), "keystore path"),
            (keystore.store_password.as_str(), "keystore password"),
            (keystore.alias.as_str(), "key alias"),
            (keystore.key_password.as_str(), "key password"),
        ] {
            if value.is_empty() {
                return Err(Error::Usage(format!("missing {name}")));
            }
        }

        let lookup = |var: &'static str, fallback: Option<PathBuf>| {
            env(var)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .or(fallback)
                .ok_or(Error::Environment(var))
        };
        let tools = ToolPaths {
            apktool: lookup(APKTOOL_ENV, tools.apktool)?,
            keytool: lookup(KEYTOOL_ENV, tools.keytool)?,
            uber_sign: lookup(UBER_SIGN_ENV, tools.uber_sign)?,
            java: tools.java,
        };

        Ok(Self {
            apk,
            work_dir: overrides.work_dir.unwrap_or_else(|| PathBuf::from(".")),
            tools,
            keystore,
        })
    }
}
