use crate::error::{Result, UpdateStatusError};
use crate::system::{C_LOCALE, CommandOutput, CommandRunner, Package, PackageIndex};
use std::path::{Path, PathBuf};

/// AptIndexAgent reads the package index through `apt list`.
pub struct AptIndexAgent<'a> {
    runner: &'a dyn CommandRunner,
    apt_path: PathBuf,
    apt_get_path: PathBuf,
}

impl<'a> AptIndexAgent<'a> {
    pub fn new<P: AsRef<Path>>(runner: &'a dyn CommandRunner, apt_path: P, apt_get_path: P) -> Self {
        Self {
            runner,
            apt_path: apt_path.as_ref().to_path_buf(),
            apt_get_path: apt_get_path.as_ref().to_path_buf(),
        }
    }

    fn run_checked(&self, program: &Path, args: &[&str]) -> Result<CommandOutput> {
        let command = format!("{} {}", program.display(), args.join(" "));
        // apt translates the bracketed package state
        let output = self.runner.run_with_env(program, args, C_LOCALE).map_err(|e| {
            UpdateStatusError::IndexUnavailable(format!("Failed to execute '{command}': {e}"))
        })?;

        if !output.success() {
            return Err(UpdateStatusError::IndexUnavailable(format!(
                "'{}' failed with exit code {}: {}",
                command,
                output.code.unwrap_or(-1),
                output.stderr.trim()
            )));
        }

        Ok(output)
    }
}

impl PackageIndex for AptIndexAgent<'_> {
    fn packages(&self) -> Result<Vec<Package>> {
        let output = self.run_checked(&self.apt_path, &["list", "--installed"])?;
        let packages = parse_apt_list(&output.stdout);
        log::debug!("package index lists {} packages", packages.len());
        Ok(packages)
    }

    fn refresh(&self) -> Result<()> {
        self.run_checked(&self.apt_get_path, &["update"])?;
        Ok(())
    }
}

/// Parse `apt list` output.
///
/// Entries look like `name/suite[,suite] version arch [state]`, where the
/// bracketed state carries `upgradable to: <candidate>` or
/// `upgradable from: <installed>` for packages with a newer candidate.
/// Header and warning lines are skipped.
pub fn parse_apt_list(output: &str) -> Vec<Package> {
    output.lines().filter_map(parse_apt_list_line).collect()
}

fn parse_apt_list_line(line: &str) -> Option<Package> {
    let line = line.trim();
    let (name, rest) = line.split_once('/')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }

    let mut fields = rest.split_whitespace();
    let _suites = fields.next()?;
    let version = fields.next()?.to_string();

    let state = match (line.find('['), line.rfind(']')) {
        (Some(start), Some(end)) if start < end => &line[start + 1..end],
        _ => "",
    };

    let mut package = Package::new(name, false);
    let mut installed = false;

    for flag in state.split(',').map(str::trim) {
        if let Some(candidate) = flag.strip_prefix("upgradable to:") {
            package.upgradable = true;
            installed = true;
            package.candidate_version = Some(candidate.trim().to_string());
        } else if let Some(current) = flag.strip_prefix("upgradable from:") {
            package.upgradable = true;
            package.installed_version = Some(current.trim().to_string());
            package.candidate_version = Some(version.clone());
        } else if flag.starts_with("installed") {
            installed = true;
        }
    }

    if installed && package.installed_version.is_none() {
        package.installed_version = Some(version);
    }

    Some(package)
}
