use crate::agents::{
    AptCheckAgent, AptIndexAgent, KernelAgent, KernelPackageMatcher, PendingCounts,
    RebootMarkerAgent,
};
use crate::config::Config;
use crate::error::Result;
use crate::system::{CommandRunner, Package, PackageIndex};
use jiff::Timestamp;

/// Point-in-time snapshot of the host's update status.
///
/// Built once and never refreshed; collect a new snapshot to observe new state.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatus {
    pending_updates: Vec<Package>,
    kernel_upgradable: bool,
    running_kernel_matches_installed: bool,
    pending_update_count: String,
    pending_security_update_count: String,
    needs_restart: bool,
    captured_at: Timestamp,
}

impl UpdateStatus {
    /// Assemble a snapshot from collaborator results. Non-upgradable packages are dropped.
    pub fn from_parts(
        packages: Vec<Package>,
        matcher: &KernelPackageMatcher,
        running_kernel_matches_installed: bool,
        counts: PendingCounts,
        needs_restart: bool,
        captured_at: Timestamp,
    ) -> Self {
        let pending_updates: Vec<Package> =
            packages.into_iter().filter(|p| p.upgradable).collect();
        let kernel_upgradable = matcher.any_match(&pending_updates);

        Self {
            pending_updates,
            kernel_upgradable,
            running_kernel_matches_installed,
            pending_update_count: counts.total,
            pending_security_update_count: counts.security,
            needs_restart,
            captured_at,
        }
    }

    pub fn pending_updates(&self) -> &[Package] {
        &self.pending_updates
    }

    pub fn kernel_upgradable(&self) -> bool {
        self.kernel_upgradable
    }

    pub fn running_kernel_matches_installed(&self) -> bool {
        self.running_kernel_matches_installed
    }

    pub fn pending_update_count(&self) -> &str {
        &self.pending_update_count
    }

    pub fn pending_security_update_count(&self) -> &str {
        &self.pending_security_update_count
    }

    pub fn needs_restart(&self) -> bool {
        self.needs_restart
    }

    pub fn captured_at(&self) -> Timestamp {
        self.captured_at
    }
}

/// StatusCollector queries every collaborator in order and builds the snapshot.
pub struct StatusCollector<'a> {
    index: &'a dyn PackageIndex,
    kernel: KernelAgent<'a>,
    apt_check: AptCheckAgent<'a>,
    reboot: RebootMarkerAgent,
}

impl<'a> StatusCollector<'a> {
    pub fn new(
        index: &'a dyn PackageIndex,
        kernel: KernelAgent<'a>,
        apt_check: AptCheckAgent<'a>,
        reboot: RebootMarkerAgent,
    ) -> Self {
        Self {
            index,
            kernel,
            apt_check,
            reboot,
        }
    }

    /// Wire the agents to the programs and paths named in `config`.
    pub fn from_config(
        runner: &'a dyn CommandRunner,
        index: &'a dyn PackageIndex,
        config: &Config,
    ) -> Self {
        Self::new(
            index,
            KernelAgent::new(runner, &config.uname, &config.version_helper),
            AptCheckAgent::new(runner, &config.apt_check),
            RebootMarkerAgent::new(&config.reboot_marker),
        )
    }

    pub fn collect(&self) -> Result<UpdateStatus> {
        let matcher = KernelPackageMatcher::new()?;
        let packages = self.index.packages()?;
        let running_matches = self.kernel.running_matches_installed()?;
        let counts = self.apt_check.pending_counts()?;
        let needs_restart = self.reboot.restart_required();

        let status = UpdateStatus::from_parts(
            packages,
            &matcher,
            running_matches,
            counts,
            needs_restart,
            Timestamp::now(),
        );

        log::info!(
            "{} upgradable packages, kernel upgradable: {}, restart required: {}",
            status.pending_updates().len(),
            status.kernel_upgradable(),
            status.needs_restart()
        );

        Ok(status)
    }
}

/// Build a snapshot of the live system using `apt` for the package index.
pub fn collect_system_status(runner: &dyn CommandRunner, config: &Config) -> Result<UpdateStatus> {
    let index = AptIndexAgent::new(runner, &config.apt, &config.apt_get);
    StatusCollector::from_config(runner, &index, config).collect()
}
