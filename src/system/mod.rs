use crate::error::Result;
use serde::Serialize;
use std::io;
use std::path::Path;
use std::process::Command;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Environment for helpers whose output is parsed by keyword.
pub const C_LOCALE: &[(&str, &str)] = &[("LC_ALL", "C")];

/// Runs external programs to completion.
pub trait CommandRunner {
    fn run_with_env(
        &self,
        program: &Path,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> io::Result<CommandOutput>;

    fn run(&self, program: &Path, args: &[&str]) -> io::Result<CommandOutput> {
        self.run_with_env(program, args, &[])
    }
}

/// Spawns real processes with captured stdout and stderr.
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run_with_env(
        &self,
        program: &Path,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> io::Result<CommandOutput> {
        log::debug!("running {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .output()?;
        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        log::debug!("{} exited with {:?}", program.display(), result.code);
        Ok(result)
    }
}

/// Read-only view of a package known to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub upgradable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_version: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>, upgradable: bool) -> Self {
        Self {
            name: name.into(),
            upgradable,
            installed_version: None,
            candidate_version: None,
        }
    }
}

pub trait PackageIndex {
    /// Every package the index knows about, upgradable or not.
    fn packages(&self) -> Result<Vec<Package>>;

    /// Re-download the package lists. Never invoked while building a snapshot.
    fn refresh(&self) -> Result<()>;
}
