//! Blocking invocation of external tools.

use std::{
    ffi::{OsStr, OsString},
    io::{self, Write},
    process::{Command, Stdio},
    thread,
};

use camino::Utf8Path;
use common::ToolCommand;

use crate::HarnessError;

/// Runs `command` followed by `args` in `cwd` and waits for it to exit.
///
/// `stdin`, when given, is written to the child's standard input and the pipe is
/// closed afterwards; otherwise the child reads from `/dev/null`.
///
/// Returns the captured standard output verbatim. A non-zero exit status is a
/// [`HarnessError::CommandFailed`] carrying the rendered command line and the
/// child's standard error.
pub fn run_tool<I, S>(
    command: &ToolCommand,
    args: I,
    cwd: &Utf8Path,
    stdin: Option<&[u8]>,
) -> Result<String, HarnessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_owned())
        .collect();
    let rendered = render_command(command, &args);
    tracing::debug!(target: "process", "Running `{rendered}` in {cwd}");

    let mut child = Command::new(command.program())
        .args(command.args())
        .args(&args)
        .current_dir(cwd)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| HarnessError::Spawn {
            command: rendered.clone(),
            source,
        })?;

    // Stdin is written from its own thread while the output pipes drain.
    let output = thread::scope(|scope| {
        let writer = match (stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => Some(scope.spawn(move || {
                match pipe.write_all(input) {
                    // The child may exit without draining its input; its status and
                    // stderr are more useful than the broken pipe.
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                }
            })),
            _ => None,
        };

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(written) => written?,
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok::<_, io::Error>(output)
    })?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    tracing::trace!(target: "process", "stdout: {stdout}");
    tracing::trace!(target: "process", "stderr: {stderr}");

    if !output.status.success() {
        return Err(HarnessError::CommandFailed {
            command: rendered,
            status: output.status,
            stderr,
        });
    }

    Ok(stdout)
}

fn render_command(command: &ToolCommand, args: &[OsString]) -> String {
    let mut rendered = command.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
