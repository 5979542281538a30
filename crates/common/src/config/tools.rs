use std::fmt::Display;

use serde::Deserialize;

use super::ConfigError;

/// An external program plus the fixed arguments that precede every invocation.
///
/// In TOML a command is written as an array, e.g. `["go", "run", "./cmd/geas"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl TryFrom<Vec<String>> for ToolCommand {
    type Error = ConfigError;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();
        match parts.next() {
            Some(program) if !program.trim().is_empty() => Ok(Self {
                program,
                args: parts.collect(),
            }),
            _ => Err(ConfigError::EmptyToolCommand),
        }
    }
}

impl Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub assembler: ToolCommand,
    pub signer: ToolCommand,
    pub engine: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            assembler: ToolCommand::new("go").with_args(["run", "./cmd/geas"]),
            signer: ToolCommand::new("go")
                .with_args(["run", "github.com/ethereum/go-ethereum/cmd/ethkey@latest"]),
            engine: ToolCommand::new("go")
                .with_args(["run", "github.com/ethereum/go-ethereum/cmd/evm@latest"]),
        }
    }
}
