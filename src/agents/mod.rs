pub mod apt_check;
pub mod kernel;
pub mod package_index;
pub mod reboot;

pub use apt_check::{AptCheckAgent, PendingCounts};
pub use kernel::{KernelAgent, KernelPackageMatcher};
pub use package_index::AptIndexAgent;
pub use reboot::RebootMarkerAgent;
