//! The suite driver: assemble once, run every selected scenario, aggregate.

use camino::Utf8Path;
use common::HarnessConfig;

use crate::{
    HarnessError,
    assembler::{Assembler, ContractBytecode, GeasAssembler},
    engine::{Engine, EvmEngine},
    oracle::{CaseResult, Scenario, default_scenarios},
    signer::{EthkeySigner, MessageSigner},
};

/// Receives progress while a suite runs.
pub trait SuiteProgress {
    fn compiling(&mut self, _source: &Utf8Path) {}
    fn compiled(&mut self, _bytecode: &ContractBytecode) {}
    fn case_finished(&mut self, _result: &CaseResult) {}
}

/// Progress sink that discards everything.
impl SuiteProgress for () {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub bytecode_len: usize,
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// `0` when nothing failed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed() == 0 { 0 } else { 1 }
    }
}

pub struct Suite<'a> {
    assembler: &'a dyn Assembler,
    signer: &'a dyn MessageSigner,
    engine: &'a dyn Engine,
    scenarios: Vec<Scenario>,
}

impl<'a> Suite<'a> {
    pub fn new(
        assembler: &'a dyn Assembler,
        signer: &'a dyn MessageSigner,
        engine: &'a dyn Engine,
    ) -> Self {
        Self {
            assembler,
            signer,
            engine,
            scenarios: default_scenarios(),
        }
    }

    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Keeps only scenarios whose name contains `pattern`.
    pub fn filtered(mut self, pattern: Option<&str>) -> Self {
        if let Some(pattern) = pattern {
            self.scenarios.retain(|scenario| scenario.name.contains(pattern));
        }
        self
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Assembles `source` once and checks every scenario against that bytecode.
    ///
    /// The first infrastructure error stops the run and is returned; scenarios
    /// that merely get the wrong answer are recorded and the run continues.
    pub fn run(
        &self,
        source: &Utf8Path,
        progress: &mut dyn SuiteProgress,
    ) -> Result<SuiteReport, HarnessError> {
        progress.compiling(source);
        let bytecode = self.assembler.assemble(source)?;
        progress.compiled(&bytecode);

        let mut results = Vec::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            let result = scenario.check(&bytecode, self.signer, self.engine)?;
            if !result.passed() {
                tracing::debug!(
                    target: "suite",
                    "{} failed: expected {}, got {}",
                    result.name,
                    result.expected,
                    result.actual
                );
            }
            progress.case_finished(&result);
            results.push(result);
        }

        Ok(SuiteReport {
            bytecode_len: bytecode.len(),
            results,
        })
    }
}

/// The subprocess-backed collaborators described by a [`HarnessConfig`].
#[derive(Debug, Clone)]
pub struct ToolSet {
    pub assembler: GeasAssembler,
    pub signer: EthkeySigner,
    pub engine: EvmEngine,
}

impl ToolSet {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            assembler: GeasAssembler::from_config(config),
            signer: EthkeySigner::from_config(config),
            engine: EvmEngine::from_config(config),
        }
    }

    pub fn suite(&self) -> Suite<'_> {
        Suite::new(&self.assembler, &self.signer, &self.engine)
    }
}
