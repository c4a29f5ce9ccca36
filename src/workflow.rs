use crate::agents::AptIndexAgent;
use crate::config::Config;
use crate::error::Result;
use crate::report::Rendering;
use crate::status::collect_system_status;
use crate::system::{PackageIndex, SystemCommandRunner};
use colored::Colorize;

/// Collect a snapshot of the host and print it in the requested rendering.
pub fn execute_report(config: &Config, rendering: Rendering) -> Result<()> {
    let runner = SystemCommandRunner;
    let status = collect_system_status(&runner, config)?;

    println!("{}", status.render(rendering)?);
    Ok(())
}

/// Re-download the package lists.
pub fn execute_refresh(config: &Config) -> Result<()> {
    let runner = SystemCommandRunner;
    let index = AptIndexAgent::new(&runner, &config.apt, &config.apt_get);

    println!("{}", "Refreshing package index...".cyan().bold());
    index.refresh()?;
    println!("{}", "✓ Package index refreshed".green());

    Ok(())
}
