use std::path::{Path, PathBuf};

/// RebootMarkerAgent checks for the reboot-required marker file.
pub struct RebootMarkerAgent {
    marker_path: PathBuf,
}

impl RebootMarkerAgent {
    pub fn new<P: AsRef<Path>>(marker_path: P) -> Self {
        Self {
            marker_path: marker_path.as_ref().to_path_buf(),
        }
    }

    /// Existence only; the marker's content is never read.
    pub fn restart_required(&self) -> bool {
        let exists = self.marker_path.exists();
        log::debug!(
            "reboot marker {} present: {}",
            self.marker_path.display(),
            exists
        );
        exists
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn marker_presence_toggles_restart() {
        let dir = tempdir().unwrap();
        let marker = dir.path().join("reboot-required");
        let agent = RebootMarkerAgent::new(&marker);

        assert!(!agent.restart_required());
        fs::write(&marker, "").unwrap();
        assert!(agent.restart_required());
    }
}
