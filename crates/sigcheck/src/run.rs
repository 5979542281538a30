//! Console front end for the suite driver.

use camino::Utf8Path;
use colored::Colorize;
use common::HarnessConfig;
use contract_harness::{
    CaseResult, ContractBytecode, SuiteProgress, SuiteReport, ToolSet, default_scenarios,
};

struct ConsoleProgress;

impl SuiteProgress for ConsoleProgress {
    fn compiling(&mut self, source: &Utf8Path) {
        println!("Compiling contract {source}...");
    }

    fn compiled(&mut self, bytecode: &ContractBytecode) {
        println!("Bytecode length: {}", bytecode.len());
        println!();
    }

    fn case_finished(&mut self, result: &CaseResult) {
        if result.passed() {
            println!("{}: {}", "PASS".green(), result.name);
        } else {
            println!(
                "{}: {} - expected {}, got {}",
                "FAIL".red(),
                result.name,
                result.expected,
                result.actual
            );
        }
    }
}

/// Runs the selected scenarios with the tools described by `config`.
///
/// Returns the process exit code: `0` when every scenario passed, `1` when one
/// failed or a tool could not be run.
pub fn run_suite(config: &HarnessConfig, filter: Option<&str>) -> i32 {
    let tools = ToolSet::from_config(config);
    let suite = tools.suite().filtered(filter);
    if suite.scenarios().is_empty() {
        eprintln!("No scenarios match the filter");
        return 0;
    }

    match suite.run(&config.contract, &mut ConsoleProgress) {
        Ok(report) => {
            print_summary(&report);
            report.exit_code()
        }
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}

fn print_summary(report: &SuiteReport) {
    println!();
    if report.failed() == 0 {
        println!(
            "test result: {}. {} passed; {} failed",
            "ok".green(),
            report.passed(),
            report.failed()
        );
    } else {
        println!(
            "test result: {}. {} passed; {} failed",
            "FAILED".red(),
            report.passed(),
            report.failed()
        );

        println!();
        println!("failures:");
        for result in report.failures() {
            println!("    {}", result.name);
        }
    }
}

pub fn list_scenarios() {
    for scenario in default_scenarios() {
        println!(
            "{:<20} expects {}  {}",
            scenario.name, scenario.expected, scenario.description
        );
    }
}
