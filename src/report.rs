use crate::error::Result;
use crate::status::UpdateStatus;
use crate::system::Package;
use serde::Serialize;
use std::fmt;

/// Output format for a collected snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    OneLine,
    Csv,
    Detail,
    Json,
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// JSON view of a snapshot.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    captured_at: String,
    kernel_upgradable: bool,
    running_kernel_matches_installed: bool,
    needs_restart: bool,
    pending_update_count: &'a str,
    pending_security_update_count: &'a str,
    pending_updates: &'a [Package],
}

impl UpdateStatus {
    pub fn render(&self, rendering: Rendering) -> Result<String> {
        match rendering {
            Rendering::OneLine => Ok(self.oneline()),
            Rendering::Csv => Ok(self.csv()),
            Rendering::Detail => Ok(self.to_string()),
            Rendering::Json => self.to_json(),
        }
    }

    /// Tab-delimited single line, suitable for motd.
    pub fn oneline(&self) -> String {
        format!(
            "Kernel upgradable: {}\tUpgradable packages: {}\tRunning kernel matches installed: {}\tRestart required: {}",
            yes_no(self.kernel_upgradable()),
            self.pending_update_count(),
            yes_no(self.running_kernel_matches_installed()),
            yes_no(self.needs_restart()),
        )
    }

    /// `kernel_upgradable,pending_count,running_matches_installed,restart_required`
    pub fn csv(&self) -> String {
        [
            yes_no(self.kernel_upgradable()),
            self.pending_update_count(),
            yes_no(self.running_kernel_matches_installed()),
            yes_no(self.needs_restart()),
        ]
        .join(",")
    }

    pub fn to_json(&self) -> Result<String> {
        let report = StatusReport {
            captured_at: self.captured_at().to_string(),
            kernel_upgradable: self.kernel_upgradable(),
            running_kernel_matches_installed: self.running_kernel_matches_installed(),
            needs_restart: self.needs_restart(),
            pending_update_count: self.pending_update_count(),
            pending_security_update_count: self.pending_security_update_count(),
            pending_updates: self.pending_updates(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

/// Multi-line report: the package list followed by every status field.
impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Upgradable packages ({})", self.pending_updates().len())?;
        for package in self.pending_updates() {
            writeln!(f, "{}", package.name)?;
        }
        writeln!(f)?;
        writeln!(f, "Kernel upgradable: {}", yes_no(self.kernel_upgradable()))?;
        writeln!(f, "Pending updates: {}", self.pending_update_count())?;
        writeln!(
            f,
            "Security updates: {}",
            self.pending_security_update_count()
        )?;
        writeln!(
            f,
            "Running kernel matches installed: {}",
            yes_no(self.running_kernel_matches_installed())
        )?;
        write!(f, "Restart required: {}", yes_no(self.needs_restart()))
    }
}
