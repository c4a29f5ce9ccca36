use crate::error::{Result, UpdateStatusError};
use crate::system::CommandRunner;
use std::path::{Path, PathBuf};

/// Update counts as reported by `apt-check`. Both values are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCounts {
    pub total: String,
    pub security: String,
}

impl PendingCounts {
    /// Parse `<total>;<security>`. Anything after the second field's first token is ignored.
    pub fn parse(output: &str) -> Result<Self> {
        let mut fields = output.trim().split(';');

        let total = fields.next().map(str::trim).unwrap_or_default();
        let security = fields
            .next()
            .and_then(|field| field.split_whitespace().next())
            .unwrap_or_default();

        if total.is_empty() || security.is_empty() {
            return Err(UpdateStatusError::HelperOutputMalformed(format!(
                "expected '<total>;<security>', got '{}'",
                output.trim()
            )));
        }

        Ok(Self {
            total: total.to_string(),
            security: security.to_string(),
        })
    }
}

/// AptCheckAgent queries the pending update summary helper.
pub struct AptCheckAgent<'a> {
    runner: &'a dyn CommandRunner,
    helper_path: PathBuf,
}

impl<'a> AptCheckAgent<'a> {
    pub fn new<P: AsRef<Path>>(runner: &'a dyn CommandRunner, helper_path: P) -> Self {
        Self {
            runner,
            helper_path: helper_path.as_ref().to_path_buf(),
        }
    }

    pub fn pending_counts(&self) -> Result<PendingCounts> {
        let helper = self.helper_path.display().to_string();
        let output = self
            .runner
            .run(&self.helper_path, &[])
            .map_err(|e| UpdateStatusError::HelperUnavailable(format!("{helper}: {e}")))?;

        if !output.success() {
            return Err(UpdateStatusError::HelperUnavailable(format!(
                "{helper} failed with exit code {}",
                output.code.unwrap_or(-1)
            )));
        }

        // apt-check writes its summary to stderr
        PendingCounts::parse(&output.combined_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::FakeRunner;

    const APT_CHECK: &str = "/usr/lib/update-notifier/apt-check";

    #[test]
    fn parses_total_and_security() {
        let counts = PendingCounts::parse("5;2\n").unwrap();
        assert_eq!(counts.total, "5");
        assert_eq!(counts.security, "2");
    }

    #[test]
    fn ignores_trailing_data() {
        let counts = PendingCounts::parse("12;0\nsomething else").unwrap();
        assert_eq!(counts.total, "12");
        assert_eq!(counts.security, "0");

        let counts = PendingCounts::parse("3;1;7").unwrap();
        assert_eq!(counts.security, "1");
    }

    #[test]
    fn single_field_is_malformed() {
        for output in ["5", "", ";", "5;"] {
            let err = PendingCounts::parse(output).unwrap_err();
            assert!(matches!(err, UpdateStatusError::HelperOutputMalformed(_)));
        }
    }

    #[test]
    fn reads_summary_from_stderr() {
        let runner = FakeRunner::new().with(APT_CHECK, 0, "", "7;3");
        let agent = AptCheckAgent::new(&runner, APT_CHECK);
        let counts = agent.pending_counts().unwrap();
        assert_eq!(counts.total, "7");
        assert_eq!(counts.security, "3");
    }

    #[test]
    fn missing_helper_is_unavailable() {
        let runner = FakeRunner::new();
        let agent = AptCheckAgent::new(&runner, APT_CHECK);
        let err = agent.pending_counts().unwrap_err();
        assert!(matches!(err, UpdateStatusError::HelperUnavailable(_)));
    }
}
