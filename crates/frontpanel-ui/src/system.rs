//! External commands: the firmware version banner and power actions.
//!
//! All process spawning goes through [`CommandRunner`] so the screens can be
//! exercised without rebooting the machine running the tests.

use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{PanelError, Result};

pub const UNKNOWN_VERSION: &str = "unknown version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
}

pub trait CommandRunner: Send {
    /// Run `argv` to completion. Element 0 is the program.
    fn run(&mut self, argv: &[String]) -> Result<CommandOutput>;
}

pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, argv: &[String]) -> Result<CommandOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| PanelError::Command {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })?;
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| PanelError::Command {
                program: program.clone(),
                source,
            })?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Reboot,
    Shutdown,
}

impl PowerAction {
    pub fn prompt(self) -> &'static str {
        match self {
            PowerAction::Reboot => " System will reboot. Confirm? ",
            PowerAction::Shutdown => " System will shut down. Confirm? ",
        }
    }

    pub fn status(self) -> &'static str {
        match self {
            PowerAction::Reboot => " REBOOTING ",
            PowerAction::Shutdown => " SHUTTING DOWN ",
        }
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^Version:[ \t]*(.*?)[ \t\r]*$").expect("version pattern is valid")
    })
}

/// Pull the value of the first `Version:` line out of the version command's output.
pub fn parse_version(output: &str) -> Option<String> {
    version_pattern()
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|v| !v.is_empty())
}

/// Version for the menu banner. Never fails; problems are logged and replaced
/// by [`UNKNOWN_VERSION`].
pub fn query_version(runner: &mut dyn CommandRunner, argv: &[String]) -> String {
    match runner.run(argv) {
        Ok(out) => parse_version(&out.stdout).unwrap_or_else(|| {
            tracing::warn!("No Version: line in output of {:?}", argv);
            UNKNOWN_VERSION.to_string()
        }),
        Err(err) => {
            tracing::warn!("Version query failed: {err}");
            UNKNOWN_VERSION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<CommandOutput>);

    impl CommandRunner for Canned {
        fn run(&mut self, _argv: &[String]) -> Result<CommandOutput> {
            match &self.0 {
                Ok(out) => Ok(out.clone()),
                Err(_) => Err(PanelError::Command {
                    program: "vyatta-show-version".into(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }
    }

    const SHOW_VERSION: &str = "Version:      VyOS 1.1.8\n\
                                Description:  VyOS 1.1.8 (helium)\n\
                                Copyright:    2017 VyOS maintainers and contributors\n";

    #[test]
    fn parses_version_line() {
        assert_eq!(parse_version(SHOW_VERSION).as_deref(), Some("VyOS 1.1.8"));
    }

    #[test]
    fn version_line_need_not_be_first() {
        let out = "Built by: autobuild\nVersion: 1.2.0-rc1\r\n";
        assert_eq!(parse_version(out).as_deref(), Some("1.2.0-rc1"));
    }

    #[test]
    fn missing_or_empty_version_is_none() {
        assert_eq!(parse_version("Description: nothing here\n"), None);
        assert_eq!(parse_version("Version:   \n"), None);
    }

    #[test]
    fn query_degrades_to_placeholder() {
        let argv = vec!["/opt/vyatta/bin/vyatta-show-version".to_string()];

        let mut ok = Canned(Ok(CommandOutput {
            success: true,
            stdout: SHOW_VERSION.to_string(),
        }));
        assert_eq!(query_version(&mut ok, &argv), "VyOS 1.1.8");

        let mut garbage = Canned(Ok(CommandOutput {
            success: true,
            stdout: "segfault".to_string(),
        }));
        assert_eq!(query_version(&mut garbage, &argv), UNKNOWN_VERSION);

        let mut missing = Canned(Err(PanelError::Cancelled));
        assert_eq!(query_version(&mut missing, &argv), UNKNOWN_VERSION);
    }

    #[test]
    fn system_runner_captures_stdout() {
        let out = SystemRunner
            .run(&["echo".to_string(), "Version: 9".to_string()])
            .unwrap();
        assert!(out.success);
        assert_eq!(parse_version(&out.stdout).as_deref(), Some("9"));
    }

    #[test]
    fn system_runner_reports_missing_program() {
        let err = SystemRunner
            .run(&["/nonexistent/frontpanel-test".to_string()])
            .unwrap_err();
        assert!(matches!(err, PanelError::Command { .. }));
        assert!(SystemRunner.run(&[]).is_err());
    }
}
