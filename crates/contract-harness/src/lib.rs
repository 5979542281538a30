//! Harness for checking a signature-verifying contract against external tools.
//!
//! The contract is assembled once, then each [`Scenario`] signs a message with
//! the keystore's key, lays out `signature || message` as call-data, runs it
//! through the execution engine and compares the engine's answer with the
//! expected boolean encoding.
use std::{fmt, process::ExitStatus};

use thiserror::Error;

pub mod assembler;
pub mod calldata;
pub mod engine;
pub mod oracle;
pub mod process;
pub mod signature;
pub mod signer;
pub mod suite;

pub use assembler::{Assembler, ContractBytecode, GeasAssembler};
pub use calldata::CallData;
pub use engine::{Engine, EvmEngine, ExecutionResult};
pub use oracle::{CaseResult, Expectation, Probe, Scenario, default_scenarios};
pub use signature::Signature;
pub use signer::{EthkeySigner, MessageSigner};
pub use suite::{Suite, SuiteProgress, SuiteReport, ToolSet};

/// Infrastructure failures. These abort the whole run; a contract returning the
/// wrong answer is never reported through this type.
#[derive(Error)]
pub enum HarnessError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command failed ({status}): {command}\nstderr: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("could not find signature in output: {0}")]
    MissingSignature(String),
    #[error("invalid signature `{value}`: {reason}")]
    InvalidSignature { value: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl fmt::Debug for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
