//! Scenarios and the comparison of the engine's answer against what each expects.

use std::fmt;

use crate::{
    HarnessError, assembler::ContractBytecode, calldata::CallData, engine::Engine,
    engine::ExecutionResult, signature::Signature, signer::MessageSigner,
};

pub const HELLO_MESSAGE: &[u8] = b"Hello, World!";
pub const WRONG_MESSAGE: &[u8] = b"Wrong message!";
pub const LONG_MESSAGE: &[u8] = b"This is a longer test message to verify that the decimal length encoding works correctly for multi-digit lengths!";

/// What the verifier is expected to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Accept,
    Reject,
}

impl Expectation {
    /// The exact text the engine prints for this outcome.
    pub fn encoding(self) -> &'static str {
        match self {
            Self::Accept => "0x01",
            Self::Reject => "0x00",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoding())
    }
}

/// The signature and message bytes a scenario places in call-data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub signature: Signature,
    pub message: Vec<u8>,
}

impl Probe {
    pub fn calldata(&self) -> CallData {
        CallData::new(&self.signature, &self.message)
    }
}

/// A named check: how to build its probe and what the contract must answer.
#[derive(Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub expected: Expectation,
    prepare: fn(&dyn MessageSigner) -> Result<Probe, HarnessError>,
}

impl Scenario {
    pub fn new(
        name: &'static str,
        description: &'static str,
        expected: Expectation,
        prepare: fn(&dyn MessageSigner) -> Result<Probe, HarnessError>,
    ) -> Self {
        Self {
            name,
            description,
            expected,
            prepare,
        }
    }

    pub fn prepare(&self, signer: &dyn MessageSigner) -> Result<Probe, HarnessError> {
        (self.prepare)(signer)
    }

    /// Signs, executes and compares. Only infrastructure failures are errors; a
    /// wrong answer comes back as a failed [`CaseResult`].
    pub fn check(
        &self,
        bytecode: &ContractBytecode,
        signer: &dyn MessageSigner,
        engine: &dyn Engine,
    ) -> Result<CaseResult, HarnessError> {
        let probe = self.prepare(signer)?;
        let calldata = probe.calldata();
        tracing::debug!(
            target: "oracle",
            "{}: executing with {} bytes of call-data ({} byte message)",
            self.name,
            calldata.byte_len(),
            calldata.message_len()
        );
        let actual = engine.execute(bytecode, &calldata)?;
        Ok(CaseResult {
            name: self.name,
            expected: self.expected,
            actual,
        })
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: &'static str,
    pub expected: Expectation,
    pub actual: ExecutionResult,
}

impl CaseResult {
    /// Exact string comparison against the expected encoding.
    pub fn passed(&self) -> bool {
        self.actual.as_str() == self.expected.encoding()
    }
}

/// The fixed scenario list, in run order.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "valid_signature",
            "signature over the message it is checked against is accepted",
            Expectation::Accept,
            valid_signature,
        ),
        Scenario::new(
            "wrong_message",
            "signature checked against a different message is rejected",
            Expectation::Reject,
            wrong_message,
        ),
        Scenario::new(
            "corrupted_signature",
            "signature with its leading byte forced to 0xff is rejected",
            Expectation::Reject,
            corrupted_signature,
        ),
        Scenario::new(
            "empty_message",
            "signature over the empty message with no message bytes is rejected",
            Expectation::Reject,
            empty_message,
        ),
        Scenario::new(
            "long_message",
            "signature over a message with a multi-digit length is accepted",
            Expectation::Accept,
            long_message,
        ),
    ]
}

fn valid_signature(signer: &dyn MessageSigner) -> Result<Probe, HarnessError> {
    Ok(Probe {
        signature: signer.sign(HELLO_MESSAGE)?,
        message: HELLO_MESSAGE.to_vec(),
    })
}

fn wrong_message(signer: &dyn MessageSigner) -> Result<Probe, HarnessError> {
    Ok(Probe {
        signature: signer.sign(HELLO_MESSAGE)?,
        message: WRONG_MESSAGE.to_vec(),
    })
}

fn corrupted_signature(signer: &dyn MessageSigner) -> Result<Probe, HarnessError> {
    Ok(Probe {
        signature: signer.sign(HELLO_MESSAGE)?.with_leading_byte(0xff),
        message: HELLO_MESSAGE.to_vec(),
    })
}

fn empty_message(signer: &dyn MessageSigner) -> Result<Probe, HarnessError> {
    Ok(Probe {
        signature: signer.sign(b"")?,
        message: Vec::new(),
    })
}

fn long_message(signer: &dyn MessageSigner) -> Result<Probe, HarnessError> {
    Ok(Probe {
        signature: signer.sign(LONG_MESSAGE)?,
        message: LONG_MESSAGE.to_vec(),
    })
}
