use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use common::{HarnessConfig, ToolCommand};

use crate::{HarnessError, process::run_tool};

/// Hex bytecode exactly as the assembler printed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractBytecode(String);

impl ContractBytecode {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContractBytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Assembler {
    /// Assembles the contract at `source` into bytecode.
    fn assemble(&self, source: &Utf8Path) -> Result<ContractBytecode, HarnessError>;
}

/// Invokes a geas-compatible assembler as `<command> -a <source>`.
#[derive(Debug, Clone)]
pub struct GeasAssembler {
    command: ToolCommand,
    root: Utf8PathBuf,
}

impl GeasAssembler {
    pub fn new(command: ToolCommand, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            command,
            root: root.into(),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.tools.assembler.clone(), config.root.clone())
    }
}

impl Assembler for GeasAssembler {
    fn assemble(&self, source: &Utf8Path) -> Result<ContractBytecode, HarnessError> {
        tracing::debug!(target: "assembler", "Assembling {source}");
        run_tool(&self.command, ["-a", source.as_str()], &self.root, None).map(ContractBytecode)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn passes_source_and_keeps_output_verbatim() {
        let command = ToolCommand::new("sh").with_args(["-c", "echo \"$1:$2\"", "geas"]);
        let assembler = GeasAssembler::new(command, "/tmp");
        let bytecode = assembler
            .assemble(Utf8Path::new("example/verifysig.eas"))
            .expect("assembles");
        assert_eq!(bytecode.as_str(), "-a:example/verifysig.eas\n");
        assert_eq!(bytecode.len(), 25);
    }

    #[test]
    fn assembler_failure_is_infrastructure_error() {
        let command =
            ToolCommand::new("sh").with_args(["-c", "echo 'unknown opcode' >&2; exit 1", "geas"]);
        let assembler = GeasAssembler::new(command, "/tmp");
        let err = assembler
            .assemble(Utf8Path::new("broken.eas"))
            .expect_err("assembly fails");
        assert!(err.to_string().contains("unknown opcode"), "{err}");
    }
}
