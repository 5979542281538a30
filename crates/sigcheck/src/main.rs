#![allow(clippy::print_stderr, clippy::print_stdout)]
mod run;

use camino::Utf8PathBuf;
use clap::{Args, CommandFactory, Parser, Subcommand};
use common::{ConfigError, HarnessConfig, ToolCommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Options {
    /// Show debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Assemble the verifier contract and check it against every scenario.
    Run {
        #[command(flatten)]
        target: TargetArgs,
        /// Only run scenarios whose name contains this pattern.
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// List the scenarios in the order they run.
    List,
    /// Generate shell completion scripts.
    Completion {
        /// Shell to generate completions for
        #[arg(value_name = "shell")]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Contract source, relative to the root (overrides `contract` in the config).
    pub contract: Option<Utf8PathBuf>,
    /// Harness config file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,
    /// Directory the tools run in and fixture paths resolve against.
    #[arg(long)]
    pub root: Option<Utf8PathBuf>,
    /// Assembler program to use instead of the configured command.
    #[arg(long)]
    pub assembler: Option<String>,
    /// Signing utility to use instead of the configured command.
    #[arg(long)]
    pub signer: Option<String>,
    /// Execution engine to use instead of the configured command.
    #[arg(long)]
    pub engine: Option<String>,
}

impl TargetArgs {
    fn load_config(&self) -> Result<HarnessConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(contract) = &self.contract {
            config.contract = contract.clone();
        }
        if let Some(program) = &self.assembler {
            config.tools.assembler = ToolCommand::new(program);
        }
        if let Some(program) = &self.signer {
            config.tools.signer = ToolCommand::new(program);
        }
        if let Some(program) = &self.engine {
            config.tools.engine = ToolCommand::new(program);
        }
        config.absolutize_root()?;
        tracing::debug!(
            target: "sigcheck",
            "Checking {} in {} (assembler: `{}`, signer: `{}`, engine: `{}`)",
            config.contract,
            config.root,
            config.tools.assembler,
            config.tools.signer,
            config.tools.engine
        );
        Ok(config)
    }
}

fn main() {
    let opts = Options::parse();
    init_tracing(opts.verbose);
    std::process::exit(run(&opts));
}

pub fn run(opts: &Options) -> i32 {
    match &opts.command {
        Command::Run { target, filter } => match target.load_config() {
            Ok(config) => run::run_suite(&config, filter.as_deref()),
            Err(err) => {
                eprintln!("Error: {err}");
                1
            }
        },
        Command::List => {
            run::list_scenarios();
            0
        }
        Command::Completion { shell } => {
            clap_complete::generate(
                *shell,
                &mut Options::command(),
                "sigcheck",
                &mut std::io::stdout(),
            );
            0
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
