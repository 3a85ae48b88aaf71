//! `meow fetch`: a short system summary.

use crate::error::Result;
use crate::ui as output;
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub os: String,
    pub hostname: String,
    pub kernel: Option<String>,
    pub arch: String,
    pub distro: Option<String>,
}

pub fn collect() -> SystemInfo {
    SystemInfo {
        os: std::env::consts::OS.to_string(),
        hostname: hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string()),
        kernel: fs::read_to_string("/proc/sys/kernel/osrelease")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        arch: std::env::consts::ARCH.to_string(),
        distro: fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| parse_os_release(&content)),
    }
}

/// `PRETTY_NAME` from os-release, falling back to `NAME`.
pub fn parse_os_release(content: &str) -> Option<String> {
    let value_of = |key: &str| {
        content.lines().find_map(|line| {
            line.trim()
                .strip_prefix(key)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|v| v.trim().trim_matches('"').trim_matches('\'').to_string())
                .filter(|v| !v.is_empty())
        })
    };

    value_of("PRETTY_NAME").or_else(|| value_of("NAME"))
}

pub fn run() -> Result<()> {
    let info = collect();

    output::header("System");
    output::keyval("OS", &info.os);
    if let Some(distro) = &info.distro {
        output::keyval("Distro", distro);
    }
    output::keyval("Host", &info.hostname);
    if let Some(kernel) = &info.kernel {
        output::keyval("Kernel", kernel);
    }
    output::keyval("Arch", &info.arch);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_name_is_preferred_and_unquoted() {
        let content = "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\n";
        assert_eq!(parse_os_release(content).as_deref(), Some("Arch Linux"));
    }

    #[test]
    fn falls_back_to_name() {
        assert_eq!(parse_os_release("NAME=Void\nID=void\n").as_deref(), Some("Void"));
        assert_eq!(parse_os_release("ID=x\n"), None);
    }

    #[test]
    fn similar_keys_do_not_match() {
        assert_eq!(parse_os_release("PRETTY_NAME_EXTRA=no\n"), None);
    }

    #[test]
    fn collect_fills_basic_fields() {
        let info = collect();
        assert!(!info.os.is_empty());
        assert!(!info.arch.is_empty());
        assert!(!info.hostname.is_empty());
    }
}
