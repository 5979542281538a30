use std::fmt;

use camino::Utf8PathBuf;
use common::{HarnessConfig, ToolCommand};

use crate::{HarnessError, assembler::ContractBytecode, calldata::CallData, process::run_tool};

/// The engine's answer, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult(String);

impl ExecutionResult {
    pub fn from_output(output: &str) -> Self {
        Self(output.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the engine printed nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("<no output>")
        } else {
            f.write_str(&self.0)
        }
    }
}

pub trait Engine {
    /// Runs `bytecode` with `calldata` as its input and returns the single value it prints.
    fn execute(
        &self,
        bytecode: &ContractBytecode,
        calldata: &CallData,
    ) -> Result<ExecutionResult, HarnessError>;
}

/// Runs go-ethereum's `evm run`, feeding the code on stdin.
#[derive(Debug, Clone)]
pub struct EvmEngine {
    command: ToolCommand,
    root: Utf8PathBuf,
}

impl EvmEngine {
    pub fn new(command: ToolCommand, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            command,
            root: root.into(),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.tools.engine.clone(), config.root.clone())
    }
}

impl Engine for EvmEngine {
    fn execute(
        &self,
        bytecode: &ContractBytecode,
        calldata: &CallData,
    ) -> Result<ExecutionResult, HarnessError> {
        let output = run_tool(
            &self.command,
            ["run", "--codefile", "/dev/stdin", "--input", calldata.as_str()],
            &self.root,
            Some(bytecode.as_str().as_bytes()),
        )?;
        let result = ExecutionResult::from_output(&output);
        tracing::debug!(target: "engine", "Engine returned {result}");
        Ok(result)
    }
}
