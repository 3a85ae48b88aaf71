use crate::core::types::UNKNOWN_VERSION;
use crate::core::version::{VERSION_NOT_FOUND, extract_version};
use crate::error::{MeowError, Result};
use crate::packages::traits::ExecStatus;
use crate::ui;
use crate::utils::platform;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Lines of stderr kept for the failure diagnostic.
const DIAGNOSTIC_TAIL: usize = 20;

/// Run a read-only query with a timeout, output captured.
pub fn run_query(program: &str, args: &[String], timeout: Duration) -> Result<Output> {
    let mut cmd = platform::build_program_command(program, args, false)?;
    run_command_with_timeout(&mut cmd, timeout)
}

/// Execute a command with timeout (non-interactive)
pub fn run_command_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output> {
    let cmd_debug = format!("{:?}", cmd);
    ui::verbose(&format!("Running {}", cmd_debug));

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| MeowError::SystemCommandFailed {
        command: cmd_debug.clone(),
        reason: e.to_string(),
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| MeowError::SystemCommandFailed {
            command: cmd_debug.clone(),
            reason: "Failed to capture stdout".to_string(),
        })?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| MeowError::SystemCommandFailed {
            command: cmd_debug.clone(),
            reason: "Failed to capture stderr".to_string(),
        })?;

    let stdout_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = BufReader::new(stdout).read_to_end(&mut buf);
        buf
    });
    let stderr_thread = thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = BufReader::new(stderr).read_to_end(&mut buf);
        buf
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_thread.join();
                    let _ = stderr_thread.join();
                    return Err(MeowError::SystemCommandFailed {
                        command: cmd_debug,
                        reason: format!("Command timed out after {} seconds", timeout.as_secs()),
                    });
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return Err(MeowError::SystemCommandFailed {
                    command: cmd_debug,
                    reason: e.to_string(),
                });
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Run a mutating command attached to the terminal, without timeout.
///
/// stdin/stdout are inherited so the tool can prompt. stderr is echoed live
/// and its tail kept for the diagnostic.
pub fn run_mutating(
    program: &str,
    args: &[String],
    elevated: bool,
    cwd: Option<&Path>,
) -> Result<ExecStatus> {
    let display = platform::display_command(program, args, elevated);
    ui::verbose(&format!("Running {}", display));

    let mut cmd = platform::build_program_command(program, args, elevated)?;
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| MeowError::SystemCommandFailed {
        command: display.clone(),
        reason: e.to_string(),
    })?;

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| MeowError::SystemCommandFailed {
            command: display.clone(),
            reason: "Failed to capture stderr".to_string(),
        })?;

    let tee = thread::spawn(move || {
        let mut tail: Vec<String> = Vec::new();
        let mut sink = std::io::stderr();
        for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
            let _ = writeln!(sink, "{}", line);
            tail.push(line);
            if tail.len() > DIAGNOSTIC_TAIL {
                tail.remove(0);
            }
        }
        tail
    });

    let status = child.wait().map_err(|e| MeowError::SystemCommandFailed {
        command: display.clone(),
        reason: e.to_string(),
    })?;
    let tail = tee.join().unwrap_or_default();

    if status.success() {
        return Ok(ExecStatus::ok());
    }

    Ok(ExecStatus::failed(exit_diagnostic(
        &display,
        status.code(),
        &tail.join("\n"),
    )))
}

/// `<command>: exit status N` plus whatever the tool wrote to stderr.
pub fn exit_diagnostic(command: &str, code: Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    };

    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("{}: {}", command, status)
    } else {
        format!("{}: {}\n{}", command, status, stderr)
    }
}

/// Installed version from a `-Qi` / `info` query.
///
/// A failed query, a nonzero exit or output without a `Version` line all
/// yield [`UNKNOWN_VERSION`].
pub fn version_from_query(result: Result<Output>) -> String {
    let Ok(output) = result else {
        return UNKNOWN_VERSION.to_string();
    };
    if !output.status.success() {
        return UNKNOWN_VERSION.to_string();
    }

    let version = extract_version(&String::from_utf8_lossy(&output.stdout));
    if version == VERSION_NOT_FOUND {
        UNKNOWN_VERSION.to_string()
    } else {
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_includes_status_and_stderr() {
        assert_eq!(
            exit_diagnostic("sudo pacman -S nope", Some(1), "error: target not found: nope\n"),
            "sudo pacman -S nope: exit status 1\nerror: target not found: nope"
        );
        assert_eq!(exit_diagnostic("git pull", None, "  "), "git pull: terminated by signal");
    }

    #[cfg(unix)]
    #[test]
    fn query_captures_output() {
        let output = run_query("echo", &["Version : 1.0".to_string()], Duration::from_secs(5))
            .expect("echo runs");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Version : 1.0");
    }

    #[cfg(unix)]
    #[test]
    fn query_times_out() {
        let err = run_query("sleep", &["5".to_string()], Duration::from_millis(200))
            .expect_err("should time out");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn missing_program_is_a_command_failure() {
        let err = run_query("meow-definitely-not-installed", &[], Duration::from_secs(1))
            .expect_err("missing binary");
        assert!(matches!(err, MeowError::SystemCommandFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn mutating_failure_reports_exit_code_and_stderr() {
        let args = vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()];
        let status = run_mutating("sh", &args, false, None).expect("spawned");
        assert!(!status.success);
        assert!(status.diagnostic.contains("exit status 3"));
        assert!(status.diagnostic.ends_with("boom"));
    }

    #[cfg(unix)]
    #[test]
    fn version_comes_from_successful_query() {
        let args = vec!["-c".to_string(), "printf 'Name : bat\\nVersion : 0.24.0-2\\n'".to_string()];
        let result = run_query("sh", &args, Duration::from_secs(5));
        assert_eq!(version_from_query(result), "0.24.0-2");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_version_is_unknown() {
        let failed = run_query("false", &["-Qi".to_string()], Duration::from_secs(5));
        assert_eq!(version_from_query(failed), UNKNOWN_VERSION);

        let blank = run_query("true", &[], Duration::from_secs(5));
        assert_eq!(version_from_query(blank), UNKNOWN_VERSION);

        let no_version = run_query("echo", &["Name : bat".to_string()], Duration::from_secs(5));
        assert_eq!(version_from_query(no_version), UNKNOWN_VERSION);

        let missing = run_query("meow-definitely-not-installed", &[], Duration::from_secs(1));
        assert_eq!(version_from_query(missing), UNKNOWN_VERSION);
    }
}
