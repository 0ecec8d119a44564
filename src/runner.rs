use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use log::{debug, trace};

/// The one command the binary runs. Keep it a literal: caller input must
/// never end up inside a shell string.
pub const TSC_TRACE_RESOLUTION: &str = "tsc --traceResolution";

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory the child runs in; inherits ours when `None`.
    pub working_directory: Option<PathBuf>,
}

impl RunOptions {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        RunOptions {
            working_directory: Some(dir.into()),
        }
    }
}

/// A finished shell command and everything it wrote.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: String,
    pub working_directory: Option<PathBuf>,
    /// `None` when the child was killed by a signal.
    pub exit_code: Option<i32>,
    /// Raw stdout and stderr bytes, interleaved as the child wrote them.
    pub output: Vec<u8>,
}

impl Invocation {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Write the captured output to `out` if the command failed; a
    /// successful run writes nothing.
    ///
    /// # Errors
    /// Returns an error if writing to `out` fails.
    pub fn report<W: Write>(&self, mut out: W) -> io::Result<()> {
        if self.succeeded() {
            return Ok(());
        }
        out.write_all(&self.output)?;
        if !self.output.ends_with(b"\n") {
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

struct DirDisplay<'a>(Option<&'a Path>);

impl fmt::Display for DirDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dir) => write!(f, "{}", dir.display()),
            None => f.write_str("the current directory"),
        }
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(command);
    cmd
}

/// Run `command` through the host shell and wait for it, capturing stdout and
/// stderr through a single pipe.
///
/// # Errors
/// Returns an error if the shell cannot be spawned (including a missing or
/// unusable working directory) or the output pipe fails.
pub fn capture(command: &str, opts: &RunOptions) -> Result<Invocation> {
    let dir = opts.working_directory.as_deref();
    debug!("running `{command}` in {}", DirDisplay(dir));

    let (mut reader, writer) = io::pipe().context("create output pipe")?;
    // `cmd` holds write ends of the pipe; it must be dropped before reading
    // or the read below never sees EOF.
    let mut child = {
        let mut cmd = shell_command(command);
        cmd.stdin(Stdio::null())
            .stdout(writer.try_clone().context("clone output pipe")?)
            .stderr(writer);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd.spawn()
            .with_context(|| format!("spawn `{command}` in {}", DirDisplay(dir)))?
    };

    let mut buf = Vec::new();
    let read = reader.read_to_end(&mut buf);
    let status = child
        .wait()
        .with_context(|| format!("wait for `{command}`"))?;
    read.with_context(|| format!("read output of `{command}`"))?;
    trace!("`{command}` wrote {} bytes, {status}", buf.len());

    Ok(Invocation {
        command: command.to_string(),
        working_directory: opts.working_directory.clone(),
        exit_code: status.code(),
        output: buf,
    })
}

/// Run `command` and dump its output to stdout if it exits non-zero.
///
/// # Errors
/// Returns an error if the command cannot be started or stdout is closed.
pub fn run_command(command: &str, opts: &RunOptions) -> Result<Invocation> {
    let invocation = capture(command, opts)?;
    invocation
        .report(io::stdout().lock())
        .context("write command output")?;
    Ok(invocation)
}
