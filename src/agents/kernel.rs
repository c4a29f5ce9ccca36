use crate::error::{Result, UpdateStatusError};
use crate::system::{C_LOCALE, CommandRunner, Package};
use regex::Regex;
use std::path::{Path, PathBuf};

const KERNEL_PACKAGE_PATTERN: &str = r"^linux-image-.*$";

/// Exit status the version helper uses when nothing is pending.
const NOTHING_PENDING_EXIT_CODE: i32 = 2;

/// Recognises kernel image packages by name.
pub struct KernelPackageMatcher {
    regex: Regex,
}

impl KernelPackageMatcher {
    pub fn new() -> Result<Self> {
        let regex = Regex::new(KERNEL_PACKAGE_PATTERN)?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Whether any of the given packages is a kernel image package.
    pub fn any_match<'p>(&self, packages: impl IntoIterator<Item = &'p Package>) -> bool {
        packages.into_iter().any(|p| self.is_match(&p.name))
    }
}

/// The running kernel release as reported by `uname -r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningKernel {
    pub version: String,
    pub build: String,
    pub flavor: String,
}

impl RunningKernel {
    /// Split `<version>-<build>-<flavor>`. Dashes past the second stay in the flavor.
    pub fn parse(release: &str) -> Result<Self> {
        let release = release.trim();
        let mut parts = release.splitn(3, '-');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(version), Some(build), Some(flavor))
                if !version.is_empty() && !build.is_empty() && !flavor.is_empty() =>
            {
                Ok(Self {
                    version: version.to_string(),
                    build: build.to_string(),
                    flavor: flavor.to_string(),
                })
            }
            _ => Err(UpdateStatusError::UnameFormatUnexpected(format!(
                "expected <version>-<build>-<flavor>, got '{release}'"
            ))),
        }
    }

    /// Name of the meta package that tracks this kernel flavor.
    pub fn package_name(&self) -> String {
        format!("linux-image-{}", self.flavor)
    }

    /// `<version>.<build>`, the form the kernel meta package version starts with.
    pub fn comparison_string(&self) -> String {
        format!("{}.{}", self.version, self.build)
    }
}

/// Installed version as reported by the version helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstalledKernel {
    /// The helper signalled that nothing is pending for the package.
    NothingPending,
    Version(String),
}

impl InstalledKernel {
    /// Loose containment check: only detects a difference, never which side is newer.
    pub fn matches(&self, running: &RunningKernel) -> bool {
        match self {
            InstalledKernel::NothingPending => true,
            InstalledKernel::Version(installed) => installed.contains(&running.comparison_string()),
        }
    }
}

/// Extract the installed version token from `apt-show-versions -p` output.
///
/// Accepts `<pkg> upgradeable from <old> to <new>` and `<pkg> uptodate <version>`.
pub fn parse_installed_version(output: &str) -> Result<String> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    let fields: Vec<&str> = line.split_whitespace().collect();

    let token = match fields.get(1).copied() {
        Some("upgradeable") if fields.get(2) == Some(&"from") => fields.get(3),
        Some("uptodate") => fields.get(2),
        _ => None,
    };

    token.map(|t| t.to_string()).ok_or_else(|| {
        UpdateStatusError::HelperOutputMalformed(format!(
            "unrecognised version helper output: '{line}'"
        ))
    })
}

/// KernelAgent compares the running kernel against the installed kernel package.
pub struct KernelAgent<'a> {
    runner: &'a dyn CommandRunner,
    uname_path: PathBuf,
    version_helper_path: PathBuf,
}

impl<'a> KernelAgent<'a> {
    pub fn new<P: AsRef<Path>>(
        runner: &'a dyn CommandRunner,
        uname_path: P,
        version_helper_path: P,
    ) -> Self {
        Self {
            runner,
            uname_path: uname_path.as_ref().to_path_buf(),
            version_helper_path: version_helper_path.as_ref().to_path_buf(),
        }
    }

    pub fn running_kernel(&self) -> Result<RunningKernel> {
        let output = self
            .runner
            .run(&self.uname_path, &["-r"])
            .map_err(|e| UpdateStatusError::HelperUnavailable(format!("uname -r: {e}")))?;

        if !output.success() {
            return Err(UpdateStatusError::HelperUnavailable(format!(
                "uname -r failed with exit code {}",
                output.code.unwrap_or(-1)
            )));
        }

        RunningKernel::parse(&output.stdout)
    }

    pub fn installed_kernel(&self, package: &str) -> Result<InstalledKernel> {
        let helper = self.version_helper_path.display().to_string();
        let output = self
            .runner
            .run_with_env(&self.version_helper_path, &["-p", package], C_LOCALE)
            .map_err(|e| {
                UpdateStatusError::HelperUnavailable(format!("{helper} -p {package}: {e}"))
            })?;

        match output.code {
            Some(NOTHING_PENDING_EXIT_CODE) => {
                log::debug!("{helper} reports nothing pending for {package}");
                Ok(InstalledKernel::NothingPending)
            }
            Some(0) => parse_installed_version(&output.stdout).map(InstalledKernel::Version),
            code => Err(UpdateStatusError::HelperUnavailable(format!(
                "{helper} -p {package} failed with exit code {}: {}",
                code.unwrap_or(-1),
                output.stderr.trim()
            ))),
        }
    }

    /// Whether the running kernel is the one the installed meta package points at.
    pub fn running_matches_installed(&self) -> Result<bool> {
        let running = self.running_kernel()?;
        let installed = self.installed_kernel(&running.package_name())?;
        let matches = installed.matches(&running);

        log::debug!(
            "running kernel {} vs installed {:?}: match={}",
            running.comparison_string(),
            installed,
            matches
        );

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::FakeRunner;

    #[test]
    fn kernel_pattern_is_anchored_at_start() {
        let matcher = KernelPackageMatcher::new().unwrap();
        assert!(matcher.is_match("linux-image-generic"));
        assert!(matcher.is_match("linux-image-5.15.0-92-generic"));
        assert!(!matcher.is_match("linux-images-foo"));
        assert!(!matcher.is_match("my-linux-image-x"));
        assert!(!matcher.is_match("Linux-image-generic"));
    }

    #[test]
    fn any_match_needs_one_kernel_package() {
        let matcher = KernelPackageMatcher::new().unwrap();
        let none = vec![Package::new("bash", true), Package::new("linux-headers-generic", true)];
        assert!(!matcher.any_match(&none));

        let one = vec![Package::new("bash", true), Package::new("linux-image-generic", true)];
        assert!(matcher.any_match(&one));
    }

    #[test]
    fn parses_running_kernel_release() {
        let running = RunningKernel::parse("3.2.0-63-generic\n").unwrap();
        assert_eq!(running.flavor, "generic");
        assert_eq!(running.package_name(), "linux-image-generic");
        assert_eq!(running.comparison_string(), "3.2.0.63");
    }

    #[test]
    fn extra_dashes_stay_in_flavor() {
        let running = RunningKernel::parse("5.10.0-28-cloud-amd64").unwrap();
        assert_eq!(running.build, "28");
        assert_eq!(running.package_name(), "linux-image-cloud-amd64");
    }

    #[test]
    fn short_release_is_rejected() {
        for release in ["6.6.7", "6.6.7-arch1", "6.6.7--", ""] {
            let err = RunningKernel::parse(release).unwrap_err();
            assert!(matches!(err, UpdateStatusError::UnameFormatUnexpected(_)));
        }
    }

    #[test]
    fn upgradeable_output_uses_old_version() {
        let token = parse_installed_version(
            "linux-image-generic/precise upgradeable from 3.2.0.63.75 to 3.2.0.64.76\n",
        )
        .unwrap();
        assert_eq!(token, "3.2.0.63.75");

        let running = RunningKernel::parse("3.2.0-63-generic").unwrap();
        assert!(InstalledKernel::Version(token).matches(&running));
    }

    #[test]
    fn uptodate_output_uses_only_version() {
        let token =
            parse_installed_version("linux-image-generic/precise uptodate 3.2.0.64.76\n").unwrap();
        assert_eq!(token, "3.2.0.64.76");

        let running = RunningKernel::parse("3.2.0-65-generic").unwrap();
        assert!(!InstalledKernel::Version(token).matches(&running));
    }

    #[test]
    fn unknown_helper_output_is_malformed() {
        for output in ["", "linux-image-generic not installed", "linux-image-generic upgradeable"] {
            let err = parse_installed_version(output).unwrap_err();
            assert!(matches!(err, UpdateStatusError::HelperOutputMalformed(_)));
        }
    }

    #[test]
    fn exit_code_two_short_circuits_to_match() {
        let runner = FakeRunner::new()
            .with("uname -r", 0, "5.15.0-91-generic\n", "")
            .with("apt-show-versions -p linux-image-generic", 2, "garbage", "");
        let agent = KernelAgent::new(&runner, "uname", "apt-show-versions");
        assert!(agent.running_matches_installed().unwrap());
    }

    #[test]
    fn detects_pending_reboot_into_new_kernel() {
        let runner = FakeRunner::new()
            .with("uname -r", 0, "5.15.0-91-generic\n", "")
            .with(
                "apt-show-versions -p linux-image-generic",
                0,
                "linux-image-generic:amd64/jammy-updates uptodate 5.15.0.92.89\n",
                "",
            );
        let agent = KernelAgent::new(&runner, "uname", "apt-show-versions");
        assert!(!agent.running_matches_installed().unwrap());
    }

    #[test]
    fn missing_version_helper_is_unavailable() {
        let runner = FakeRunner::new().with("uname -r", 0, "5.15.0-91-generic\n", "");
        let agent = KernelAgent::new(&runner, "uname", "apt-show-versions");
        let err = agent.running_matches_installed().unwrap_err();
        assert!(matches!(err, UpdateStatusError::HelperUnavailable(_)));
    }

    #[test]
    fn version_helper_runs_in_c_locale() {
        let runner = FakeRunner::new()
            .with("uname -r", 0, "5.15.0-91-generic\n", "")
            .with("apt-show-versions -p linux-image-generic", 2, "", "");
        let agent = KernelAgent::new(&runner, "uname", "apt-show-versions");
        agent.running_matches_installed().unwrap();

        let env = runner
            .env_for("apt-show-versions -p linux-image-generic")
            .unwrap();
        assert_eq!(env, vec![("LC_ALL".to_string(), "C".to_string())]);
    }

    #[test]
    fn invalid_pattern_maps_to_regex_error() {
        let err: UpdateStatusError = Regex::new("linux-image-(").unwrap_err().into();
        assert!(matches!(err, UpdateStatusError::Regex(_)));
    }

    #[test]
    fn unexpected_helper_exit_is_unavailable() {
        let runner = FakeRunner::new()
            .with("uname -r", 0, "5.15.0-91-generic\n", "")
            .with("apt-show-versions -p linux-image-generic", 1, "", "boom");
        let agent = KernelAgent::new(&runner, "uname", "apt-show-versions");
        let err = agent.running_matches_installed().unwrap_err();
        assert!(matches!(err, UpdateStatusError::HelperUnavailable(_)));
    }
}
