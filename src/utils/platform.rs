use crate::error::Result;
#[cfg(not(unix))]
use crate::error::MeowError;
use std::process::Command;

/// Build a direct program invocation in a platform-aware way.
///
/// - Unix: `program args...` or `sudo program args...`
/// - Elsewhere elevated execution is rejected.
pub fn build_program_command(program: &str, args: &[String], elevated: bool) -> Result<Command> {
    #[cfg(unix)]
    {
        let cmd = if elevated {
            let mut c = Command::new("sudo");
            c.arg(program);
            c.args(args);
            c
        } else {
            let mut c = Command::new(program);
            c.args(args);
            c
        };

        Ok(cmd)
    }

    #[cfg(not(unix))]
    {
        if elevated {
            return Err(MeowError::Other(
                "Elevated execution is only supported on Unix".to_string(),
            ));
        }

        let mut cmd = Command::new(program);
        cmd.args(args);
        Ok(cmd)
    }
}

/// Render a command line for display and logging.
pub fn display_command(program: &str, args: &[String], elevated: bool) -> String {
    let mut parts = Vec::with_capacity(args.len() + 2);
    if elevated {
        parts.push("sudo".to_string());
    }
    parts.push(program.to_string());
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

pub fn program_available(program: &str) -> bool {
    which::which(program).is_ok()
}
