//! External-process analyzer backend.
//!
//! The source is written to the child's stdin; stdout followed by stderr is
//! the native output. A non-zero exit code is normal for checkers that found
//! problems and is not treated as a failure.

use super::domain::{RuleBackend, RuleOutcome};
use super::general::ReportBackend;
use super::CancelToken;
use crate::error::BackendError;
use std::io::{ErrorKind, Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run the program on `source` and return its combined output.
    pub fn run(&self, source: &str, cancel: &CancelToken) -> Result<String, BackendError> {
        tracing::debug!(program = %self.program, args = ?self.args, "spawning analyzer");
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so cancellation also reaches processes a
        // wrapper shell forks.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);
        let mut child = command
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take();
        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        let (status, out, err) = thread::scope(|s| {
            let writer = s.spawn(move || match stdin.as_mut() {
                Some(pipe) => match pipe.write_all(source.as_bytes()) {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                    _ => Ok(()),
                },
                None => Ok(()),
            });
            let out = s.spawn(move || drain(stdout.as_mut()));
            let err = s.spawn(move || drain(stderr.as_mut()));
            let status = self.wait(&mut child, cancel);
            let written = join_pipe(writer);
            let out = join_pipe(out);
            let err = join_pipe(err);
            (status, written.and(out), err)
        });

        let status = status?;
        let io_err = |source| BackendError::Io {
            program: self.program.clone(),
            source,
        };
        let mut bytes = out.map_err(io_err)?;
        bytes.extend(err.map_err(io_err)?);

        if status.code().is_none() {
            return Err(BackendError::Terminated {
                program: self.program.clone(),
            });
        }
        String::from_utf8(bytes).map_err(|_| BackendError::Encoding {
            program: self.program.clone(),
        })
    }

    fn wait(
        &self,
        child: &mut Child,
        cancel: &CancelToken,
    ) -> Result<std::process::ExitStatus, BackendError> {
        let io_err = |source| BackendError::Io {
            program: self.program.clone(),
            source,
        };
        loop {
            if let Some(status) = child.try_wait().map_err(io_err)? {
                return Ok(status);
            }
            if cancel.is_cancelled() {
                tracing::debug!(program = %self.program, "killing cancelled analyzer");
                kill_group(child);
                child.wait().map_err(io_err)?;
                return Err(BackendError::Cancelled);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Kill the child and everything in its process group.
#[cfg(unix)]
fn kill_group(child: &mut Child) {
    // The child is its group leader and has not been reaped, so its pid is
    // still the group id. Failure means the group already exited.
    let pgid = child.id() as libc::pid_t;
    // SAFETY: killpg only sends a signal; no memory is touched.
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) {
    // The child may have exited between the poll and the kill.
    let _ = child.kill();
}

fn join_pipe<T>(handle: thread::ScopedJoinHandle<'_, std::io::Result<T>>) -> std::io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("pipe thread panicked")))
}

fn drain<R: Read>(pipe: Option<&mut R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(p) = pipe {
        p.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

impl ReportBackend for CommandBackend {
    fn check(&self, source: &str, cancel: &CancelToken) -> Result<String, BackendError> {
        self.run(source, cancel)
    }
}

impl RuleBackend for CommandBackend {
    fn check(&self, source: &str, cancel: &CancelToken) -> Result<RuleOutcome, BackendError> {
        let text = self.run(source, cancel)?;
        Ok(RuleOutcome::Violations(
            text.lines().map(str::to_string).collect(),
        ))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::analyzer::{Analyzer, DomainAdapter, GeneralAdapter, STDIN_REPORT_NAME};
    use std::time::Instant;

    fn sh(script: &str) -> CommandBackend {
        CommandBackend::new("sh", ["-c", script])
    }

    #[test]
    fn test_run_collects_stdout_then_stderr() {
        let out = sh("cat; echo err 1>&2")
            .run("hello\n", &CancelToken::new())
            .unwrap();
        assert_eq!(out, "hello\nerr\n");
    }

    #[test]
    fn test_nonzero_exit_is_not_a_failure() {
        let backend = sh("cat >/dev/null; echo '<stdin>:2:5: undefined name x'; exit 1");
        let found = GeneralAdapter::new(backend)
            .with_report_name(STDIN_REPORT_NAME)
            .analyze("a\nb\n")
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "undefined name x");
    }

    #[test]
    fn test_rule_backend_splits_lines() {
        let backend = sh("cat >/dev/null; printf 'Line 1: S1- bad\\nLine 3: S2- worse\\n'");
        let found = DomainAdapter::new(backend).analyze("x").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].position.map(|p| p.line), Some(3));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = CommandBackend::new("definitely-not-a-real-analyzer", Vec::<String>::new())
            .run("x", &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, BackendError::Spawn { .. }));
    }

    #[test]
    fn test_program_ignoring_stdin_does_not_fail() {
        let big = "x = 1\n".repeat(100_000);
        let out = sh("echo done").run(&big, &CancelToken::new()).unwrap();
        assert_eq!(out, "done\n");
    }

    #[test]
    fn test_cancel_kills_child() {
        let token = CancelToken::new();
        let trigger = token.clone();
        let started = Instant::now();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            trigger.cancel();
        });
        let err = sh("exec sleep 5").run("x", &token).unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, BackendError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_cancel_reaches_wrapper_shell_children() {
        let token = CancelToken::new();
        let trigger = token.clone();
        let started = Instant::now();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            trigger.cancel();
        });
        // No exec: sh forks sleep, which inherits the output pipes.
        let err = sh("sleep 3; echo hi").run("x", &token).unwrap_err();
        handle.join().unwrap();
        assert!(matches!(err, BackendError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
