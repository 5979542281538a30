//! Message signing through an `ethkey`-compatible utility.

use std::{ffi::OsStr, io::Write};

use camino::Utf8PathBuf;
use common::{HarnessConfig, SignerOutput, ToolCommand};
use serde::Deserialize;

use crate::{HarnessError, process::run_tool, signature::Signature};

pub trait MessageSigner {
    /// Signs `message` (which may be empty) with the provisioned key.
    fn sign(&self, message: &[u8]) -> Result<Signature, HarnessError>;
}

/// Signs with `<command> signmessage [--json] --msgfile <tmp> --passwordfile <pass> <keyfile>`.
///
/// The message is handed over through a temporary file that is removed as soon
/// as the utility exits, whether or not signing succeeded.
#[derive(Debug, Clone)]
pub struct EthkeySigner {
    command: ToolCommand,
    keyfile: Utf8PathBuf,
    passwordfile: Utf8PathBuf,
    root: Utf8PathBuf,
    output: SignerOutput,
}

impl EthkeySigner {
    pub fn new(
        command: ToolCommand,
        keyfile: impl Into<Utf8PathBuf>,
        passwordfile: impl Into<Utf8PathBuf>,
        root: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            command,
            keyfile: keyfile.into(),
            passwordfile: passwordfile.into(),
            root: root.into(),
            output: SignerOutput::default(),
        }
    }

    pub fn with_output(mut self, output: SignerOutput) -> Self {
        self.output = output;
        self
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            config.tools.signer.clone(),
            config.keyfile(),
            config.passwordfile(),
            config.root.clone(),
        )
        .with_output(config.signer.output)
    }
}

impl MessageSigner for EthkeySigner {
    fn sign(&self, message: &[u8]) -> Result<Signature, HarnessError> {
        let output = {
            let mut msgfile = tempfile::Builder::new()
                .prefix("sigcheck-msg-")
                .tempfile()?;
            msgfile.write_all(message)?;
            msgfile.flush()?;

            let mut args: Vec<&OsStr> = vec![OsStr::new("signmessage")];
            if self.output == SignerOutput::Json {
                args.push(OsStr::new("--json"));
            }
            args.extend([
                OsStr::new("--msgfile"),
                msgfile.path().as_os_str(),
                OsStr::new("--passwordfile"),
                self.passwordfile.as_os_str(),
                self.keyfile.as_os_str(),
            ]);
            tracing::debug!(
                target: "signer",
                "Signing {} byte message via {}",
                message.len(),
                msgfile.path().display()
            );
            run_tool(&self.command, args, &self.root, None)?
        };

        extract_signature(&output, self.output)
    }
}

#[derive(Deserialize)]
struct SignedMessage {
    signature: String,
}

/// Pulls the signature out of the signing utility's output.
///
/// With [`SignerOutput::Json`] the output is first read as `{"signature": "<hex>"}`;
/// anything else falls through to the first line starting with `Signature:`.
pub fn extract_signature(output: &str, mode: SignerOutput) -> Result<Signature, HarnessError> {
    if mode == SignerOutput::Json {
        match serde_json::from_str::<SignedMessage>(output.trim()) {
            Ok(signed) => return signed.signature.parse(),
            Err(err) => {
                tracing::warn!(
                    target: "signer",
                    "Signer output is not the expected JSON ({err}), scanning text instead"
                );
            }
        }
    }

    let value = output
        .lines()
        .find_map(|line| line.strip_prefix("Signature:"))
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(|| HarnessError::MissingSignature(output.to_string()))?;
    value.parse()
}
