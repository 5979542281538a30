#![cfg(unix)]

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use common::{HarnessConfig, SignerOutput, ToolCommand};
use sigcheck_contract_harness::{
    CallData, ContractBytecode, Engine, EvmEngine, HarnessError, MessageSigner, ToolSet,
};
use tempfile::TempDir;

fn tools_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tools")
}

fn fake_tool(script: &str, leading: &[&str]) -> ToolCommand {
    ToolCommand::new("sh")
        .with_args([tools_dir().join(script).to_string()])
        .with_args(leading.iter().copied())
}

struct Fixture {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Fixture {
    fn new(contract: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        write_file(&root.join("example/verifysig.eas"), contract);
        write_file(&root.join("example/testdata/testkey.json"), "{}\n");
        write_file(&root.join("example/testdata/password.txt"), "foobar\n");
        Self { _dir: dir, root }
    }

    fn config(&self, signer: &[&str], engine: &[&str]) -> HarnessConfig {
        let mut config = HarnessConfig {
            root: self.root.clone(),
            ..HarnessConfig::default()
        };
        config.tools.assembler = fake_tool("fake-geas.sh", &[]);
        config.tools.signer = fake_tool("fake-ethkey.sh", signer);
        config.tools.engine = fake_tool("fake-evm.sh", engine);
        config
    }

    fn log(&self) -> Utf8PathBuf {
        self.root.join("signer.log")
    }

    fn logged_message_files(&self) -> Vec<Utf8PathBuf> {
        fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(Utf8PathBuf::from)
            .collect()
    }
}

fn write_file(path: &Utf8Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn run_suite(config: &HarnessConfig) -> Result<sigcheck_contract_harness::SuiteReport, HarnessError> {
    ToolSet::from_config(config)
        .suite()
        .run(&config.contract, &mut ())
}

#[test]
fn conforming_tools_pass_every_scenario() {
    let fixture = Fixture::new("verify\n");
    let report = run_suite(&fixture.config(&[], &[])).expect("suite runs");

    assert_eq!(report.bytecode_len, "60016000526001601ff3\n".len());
    let actual: Vec<_> = report.results.iter().map(|r| r.actual.as_str()).collect();
    assert_eq!(actual, ["0x01", "0x00", "0x00", "0x00", "0x01"]);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn text_output_mode_scans_signature_line() {
    let fixture = Fixture::new("verify\n");
    let mut config = fixture.config(&[], &[]);
    config.signer.output = SignerOutput::Text;
    let report = run_suite(&config).expect("suite runs");
    assert_eq!(report.failed(), 0);
}

#[test]
fn json_mode_falls_back_when_signer_prints_text() {
    let fixture = Fixture::new("verify\n");
    let report = run_suite(&fixture.config(&["--mode", "text"], &[])).expect("suite runs");
    assert_eq!(report.failed(), 0);
}

#[test]
fn message_files_are_removed_after_signing() {
    let fixture = Fixture::new("verify\n");
    let log = fixture.log().to_string();
    run_suite(&fixture.config(&["--log", log.as_str()], &[])).expect("suite runs");

    let files = fixture.logged_message_files();
    assert_eq!(files.len(), 5);
    for file in files {
        assert!(!file.exists(), "{file} was left behind");
    }
}

#[test]
fn message_file_is_removed_when_signing_fails() {
    let fixture = Fixture::new("verify\n");
    let log = fixture.log().to_string();
    let config = fixture.config(&["--mode", "fail", "--log", log.as_str()], &[]);
    let signer = ToolSet::from_config(&config).signer;

    let err = signer.sign(b"Hello, World!").expect_err("signing fails");
    match &err {
        HarnessError::CommandFailed { command, stderr, .. } => {
            assert!(command.contains("signmessage --json --msgfile"), "{command}");
            assert!(stderr.contains("could not decrypt key"), "{stderr}");
        }
        other => panic!("unexpected error: {other}"),
    }

    let files = fixture.logged_message_files();
    assert_eq!(files.len(), 1);
    assert!(!files[0].exists(), "{} was left behind", files[0]);
}

#[test]
fn signer_without_signature_line_is_fatal() {
    let fixture = Fixture::new("verify\n");
    let err = run_suite(&fixture.config(&["--mode", "garbage"], &[])).expect_err("fatal");
    match err {
        HarnessError::MissingSignature(output) => assert!(output.starts_with("Address:")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_keystore_is_fatal() {
    let fixture = Fixture::new("verify\n");
    fs::remove_file(fixture.root.join("example/testdata/testkey.json")).unwrap();
    let err = run_suite(&fixture.config(&[], &[])).expect_err("fatal");
    assert!(err.to_string().contains("Failed to read the keyfile"), "{err}");
}

#[test]
fn wrong_answers_are_counted_not_fatal() {
    let fixture = Fixture::new("verify\n");
    let report = run_suite(&fixture.config(&[], &["--mode", "invert"])).expect("suite runs");
    assert_eq!(report.results.len(), 5);
    assert_eq!(report.failed(), 5);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn engine_crash_is_fatal() {
    let fixture = Fixture::new("verify\n");
    let err = run_suite(&fixture.config(&[], &["--mode", "crash"])).expect_err("fatal");
    match err {
        HarnessError::CommandFailed {
            command, stderr, ..
        } => {
            assert!(command.contains("run --codefile /dev/stdin --input"), "{command}");
            assert!(stderr.contains("invalid opcode"), "{stderr}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn silent_engine_fails_every_case() {
    let fixture = Fixture::new("verify\n");
    let report = run_suite(&fixture.config(&[], &["--mode", "silent"])).expect("suite runs");
    assert_eq!(report.failed(), 5);
    assert!(report.results.iter().all(|r| r.actual.is_empty()));
    assert_eq!(report.results[1].actual.to_string(), "<no output>");
}

#[test]
fn assembler_failure_stops_before_signing() {
    let fixture = Fixture::new("#fail\n");
    let log = fixture.log().to_string();
    let err = run_suite(&fixture.config(&["--log", log.as_str()], &[])).expect_err("fatal");
    assert!(err.to_string().contains("unknown opcode"), "{err}");
    assert!(fixture.logged_message_files().is_empty());
}

#[test]
fn engine_is_idempotent_for_identical_input() {
    let fixture = Fixture::new("verify\n");
    let config = fixture.config(&[], &[]);
    let tools = ToolSet::from_config(&config);
    let signature = tools.signer.sign(b"Hello, World!").expect("signs");
    let calldata = CallData::new(&signature, b"Hello, World!");
    let bytecode = ContractBytecode::new("60016000526001601ff3\n");

    let engine = EvmEngine::from_config(&config);
    let first = engine.execute(&bytecode, &calldata).expect("runs");
    let second = engine.execute(&bytecode, &calldata).expect("runs");
    assert_eq!(first, second);
    assert_eq!(first.as_str(), "0x01");
}
