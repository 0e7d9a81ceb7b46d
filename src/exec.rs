//! Subprocess capture.
//!
//! Every external action the harness performs (clean, build, subject runs,
//! sub-suite spawns) goes through [`capture`]. Stdout and stderr are drained
//! on dedicated reader threads so a full pipe buffer can never deadlock the
//! child, and the child is always reaped before the captured text is used.
//! Execution is strictly sequential: one child at a time, waited to
//! completion.

use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// A full command invocation: program, argv tail, optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Human-readable debugging output, not a round-trippable shell snippet.
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') || arg.contains('\t') {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Limits applied to a single capture.
#[derive(Debug, Clone)]
pub struct CaptureLimits {
    /// Kill the child if it has not exited after this duration.
    pub timeout: Option<Duration>,
    /// Maximum bytes captured per stream; the rest is discarded.
    pub max_bytes: usize,
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            timeout: None,
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl CaptureLimits {
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Captured streams of a finished child.
#[derive(Debug, Clone)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    /// The child was killed because it exceeded the configured timeout.
    pub timed_out: bool,
    /// At least one stream had more bytes than were captured.
    pub truncated: bool,
}

impl Captured {
    /// Stdout followed by stderr, the order the golden records use.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

/// Run a command to completion, capturing at most `limits.max_bytes` bytes of
/// stdout and stderr each.
///
/// Always returns the process `ExitStatus`; when the timeout is reached the
/// child is killed and `timed_out` is set instead of erroring.
pub fn capture(spec: &CommandSpec, limits: &CaptureLimits) -> io::Result<Captured> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }

    let mut child = cmd.spawn()?;

    let Some(stdout) = child.stdout.take() else {
        return Err(io::Error::other("child stdout was not captured"));
    };
    let Some(stderr) = child.stderr.take() else {
        return Err(io::Error::other("child stderr was not captured"));
    };

    let max_bytes = limits.max_bytes;
    let stdout_handle = thread::spawn(move || read_capped(stdout, max_bytes));
    let stderr_handle = thread::spawn(move || read_capped(stderr, max_bytes));

    let mut timed_out = false;
    let status = match limits.timeout {
        None => child.wait()?,
        Some(timeout) => {
            let start = Instant::now();
            let poll = Duration::from_millis(50);
            loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if start.elapsed() >= timeout {
                    timed_out = true;
                    // The kill can race with a normal exit; wait() settles it.
                    let _ = child.kill();
                    break child.wait()?;
                }
                thread::sleep(poll.min(timeout.saturating_sub(start.elapsed())));
            }
        }
    };

    let (stdout_bytes, stdout_truncated) = join_reader(stdout_handle, "stdout")??;
    let (stderr_bytes, stderr_truncated) = join_reader(stderr_handle, "stderr")??;

    Ok(Captured {
        status,
        stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
        stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
        timed_out,
        truncated: stdout_truncated || stderr_truncated,
    })
}

fn join_reader(
    handle: thread::JoinHandle<io::Result<(Vec<u8>, bool)>>,
    stream: &'static str,
) -> io::Result<io::Result<(Vec<u8>, bool)>> {
    handle
        .join()
        .map_err(|_| io::Error::other(format!("{stream} reader thread panicked")))
}

fn read_capped(mut reader: impl Read, max_bytes: usize) -> io::Result<(Vec<u8>, bool)> {
    let mut out = Vec::new();
    let mut truncated = false;
    let mut buf = [0u8; 8 * 1024];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        if out.len() < max_bytes {
            let remaining = max_bytes - out.len();
            let to_store = remaining.min(n);
            out.extend_from_slice(&buf[..to_store]);
            if to_store < n {
                truncated = true;
            }
        } else {
            truncated = true;
        }
    }

    Ok((out, truncated))
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn combined_is_stdout_then_stderr() {
        let captured = capture(
            &sh("echo err >&2; echo out"),
            &CaptureLimits::default(),
        )
        .unwrap();
        assert_eq!(captured.combined(), "out\nerr\n");
        assert!(captured.status.success());
        assert!(!captured.timed_out);
    }

    #[test]
    fn capture_respects_byte_cap() {
        let limits = CaptureLimits {
            max_bytes: 8,
            ..CaptureLimits::default()
        };
        let captured = capture(&sh("printf 'aaaaaaaaaaaaaaaa'"), &limits).unwrap();
        assert_eq!(captured.stdout.len(), 8);
        assert!(captured.truncated);
    }

    #[test]
    fn timeout_kills_the_child() {
        let limits = CaptureLimits::with_timeout(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let captured = capture(&sh("exec sleep 10"), &limits).unwrap();
        assert!(captured.timed_out);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn nonexistent_program_is_a_spawn_error() {
        let spec = CommandSpec::new("/definitely/not/a/program", vec![]);
        assert!(capture(&spec, &CaptureLimits::default()).is_err());
    }
}
