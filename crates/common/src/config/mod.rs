use std::{env, fs, path::PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

mod tools;

pub use tools::{ToolCommand, ToolsConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("tool command must name a program")]
    EmptyToolCommand,
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("{path}: {source}")]
    File {
        path: Utf8PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

/// How the signing utility is asked to report its signature.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerOutput {
    /// Request `--json` output and fall back to scanning text when it does not parse.
    #[default]
    Json,
    /// Scan the human-readable output for the `Signature:` line.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeystoreConfig {
    pub keyfile: Utf8PathBuf,
    pub passwordfile: Utf8PathBuf,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            keyfile: Utf8PathBuf::from("example/testdata/testkey.json"),
            passwordfile: Utf8PathBuf::from("example/testdata/password.txt"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfig {
    pub output: SignerOutput,
}

/// Everything the harness needs to locate its collaborators and fixtures.
///
/// Relative paths inside the config are resolved against `root`, which is the
/// working directory every external tool is started in. When the config is
/// loaded from a file, a relative `root` is itself anchored at the directory
/// containing that file and then made absolute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub root: Utf8PathBuf,
    pub contract: Utf8PathBuf,
    pub tools: ToolsConfig,
    pub keystore: KeystoreConfig,
    pub signer: SignerConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            contract: Utf8PathBuf::from("example/verifysig.eas"),
            tools: ToolsConfig::default(),
            keystore: KeystoreConfig::default(),
            signer: SignerConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let wrap = |source: ConfigError| ConfigError::File {
            path: path.to_owned(),
            source: Box::new(source),
        };

        let content = fs::read_to_string(path).map_err(|err| wrap(err.into()))?;
        let mut config = Self::parse(&content).map_err(wrap)?;
        if config.root.is_relative() {
            let base = path.parent().unwrap_or(Utf8Path::new(""));
            config.root = base.join(&config.root);
        }
        config.absolutize_root().map_err(wrap)?;
        tracing::debug!(target: "config", "Loaded {path} (root: {})", config.root);
        Ok(config)
    }

    /// Anchors a relative `root` at the current directory.
    pub fn absolutize_root(&mut self) -> Result<(), ConfigError> {
        if self.root.is_relative() {
            let cwd = Utf8PathBuf::from_path_buf(env::current_dir()?)
                .map_err(ConfigError::NonUtf8Path)?;
            self.root = cwd.join(&self.root);
        }
        Ok(())
    }

    /// Resolves `path` against the configured root unless it is already absolute.
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_owned()
        } else {
            self.root.join(path)
        }
    }

    pub fn keyfile(&self) -> Utf8PathBuf {
        self.resolve(&self.keystore.keyfile)
    }

    pub fn passwordfile(&self) -> Utf8PathBuf {
        self.resolve(&self.keystore.passwordfile)
    }
}
