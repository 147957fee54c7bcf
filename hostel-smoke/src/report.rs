use serde::Serialize;

use crate::error::SmokeError;

/// The checks a smoke run is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Authenticate,
    FetchComplaints,
    RejectAnonymous,
    RejectBadPassword,
    Consistency,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Authenticate => "authenticate",
            Step::FetchComplaints => "fetch complaints",
            Step::RejectAnonymous => "reject anonymous fetch",
            Step::RejectBadPassword => "reject bad password",
            Step::Consistency => "consistency",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    AssertionFailed { message: String },
    PreconditionFailed { message: String },
    /// The request never produced a response
    Errored { message: String },
}

impl Outcome {
    pub fn from_error(err: &SmokeError) -> Self {
        let message = err.to_string();
        match err {
            SmokeError::Precondition { .. } => Outcome::PreconditionFailed { message },
            SmokeError::Assertion { .. } => Outcome::AssertionFailed { message },
            _ => Outcome::Errored { message },
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASS",
            Outcome::AssertionFailed { .. } => "FAIL",
            Outcome::PreconditionFailed { .. } => "SKIP",
            Outcome::Errored { .. } => "ERROR",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Passed => None,
            Outcome::AssertionFailed { message }
            | Outcome::PreconditionFailed { message }
            | Outcome::Errored { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub iteration: u32,
    pub step: Step,
    /// HTTP status observed, if a response arrived
    pub status: Option<u16>,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_url: String,
    pub profile: String,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn new(base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            profile: profile.into(),
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    pub fn total(&self) -> usize {
        self.steps.len()
    }

    pub fn failed(&self) -> usize {
        self.steps.iter().filter(|s| !s.outcome.is_passed()).count()
    }

    pub fn passed(&self) -> bool {
        self.failed() == 0
    }

    /// Observed status codes of one iteration, in step order
    pub fn statuses(&self, iteration: u32) -> Vec<(Step, Option<u16>)> {
        self.steps
            .iter()
            .filter(|s| s.iteration == iteration && s.step != Step::Consistency)
            .map(|s| (s.step, s.status))
            .collect()
    }

    pub fn find(&self, iteration: u32, step: Step) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| s.iteration == iteration && s.step == step)
    }

    /// Ok when every step passed
    pub fn into_result(self) -> Result<(), SmokeError> {
        if self.passed() {
            Ok(())
        } else {
            Err(SmokeError::ChecksFailed {
                failed: self.failed(),
                total: self.total(),
            })
        }
    }

    pub fn to_json(&self) -> Result<String, SmokeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "hostel-smoke against {} as {}\n",
            self.base_url, self.profile
        );
        for step in &self.steps {
            let status = step
                .status
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            out.push_str(&format!(
                "  [{}] {:<24} {:<5} (status {}, {} ms)\n",
                step.iteration,
                step.step.as_str(),
                step.outcome.label(),
                status,
                step.elapsed_ms
            ));
            if let Some(message) = step.outcome.message() {
                out.push_str(&format!("        {}\n", message));
            }
        }
        let failed = self.failed();
        out.push_str(&format!(
            "{} checks, {} passed, {} failed\n",
            self.total(),
            self.total() - failed,
            failed
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Expectation;

    fn step(iteration: u32, step: Step, status: Option<u16>, outcome: Outcome) -> StepReport {
        StepReport {
            iteration,
            step,
            status,
            outcome,
            elapsed_ms: 1,
        }
    }

    #[test]
    fn test_outcome_from_error() {
        let precondition = SmokeError::precondition(Step::FetchComplaints, "no session token");
        assert_eq!(
            Outcome::from_error(&precondition).label(),
            "SKIP"
        );
        let assertion =
            SmokeError::assertion(Step::Authenticate, Expectation::Status(200), "status 400");
        assert_eq!(Outcome::from_error(&assertion).label(), "FAIL");
        assert_eq!(
            Outcome::from_error(&SmokeError::config("bad")).label(),
            "ERROR"
        );
    }

    #[test]
    fn test_counts_and_result() {
        let mut report = RunReport::new("http://localhost:3000", "warden");
        report.record(step(1, Step::Authenticate, Some(200), Outcome::Passed));
        assert!(report.passed());
        report.record(step(
            1,
            Step::FetchComplaints,
            Some(500),
            Outcome::AssertionFailed {
                message: "fetch complaints: expected status 200, got status 500".into(),
            },
        ));
        assert_eq!(report.total(), 2);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.into_result(),
            Err(SmokeError::ChecksFailed {
                failed: 1,
                total: 2
            })
        ));
    }

    #[test]
    fn test_statuses_skip_consistency() {
        let mut report = RunReport::new("http://x", "warden");
        report.record(step(1, Step::Authenticate, Some(200), Outcome::Passed));
        report.record(step(1, Step::FetchComplaints, Some(200), Outcome::Passed));
        report.record(step(2, Step::Authenticate, Some(200), Outcome::Passed));
        report.record(step(2, Step::Consistency, None, Outcome::Passed));
        assert_eq!(
            report.statuses(1),
            vec![
                (Step::Authenticate, Some(200)),
                (Step::FetchComplaints, Some(200))
            ]
        );
        assert_eq!(report.statuses(2), vec![(Step::Authenticate, Some(200))]);
    }

    #[test]
    fn test_render_text() {
        let mut report = RunReport::new("http://localhost:3000", "warden");
        report.record(step(1, Step::Authenticate, Some(400), Outcome::AssertionFailed {
            message: "authenticate: expected status 200, got status 400".into(),
        }));
        report.record(step(1, Step::FetchComplaints, None, Outcome::PreconditionFailed {
            message: "fetch complaints: precondition not met: no session token".into(),
        }));
        let text = report.render_text();
        assert!(text.starts_with("hostel-smoke against http://localhost:3000 as warden"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("SKIP"));
        assert!(text.contains("precondition not met"));
        assert!(text.ends_with("2 checks, 0 passed, 2 failed\n"));
    }

    #[test]
    fn test_json_shape() {
        let mut report = RunReport::new("http://localhost:3000", "warden");
        report.record(step(1, Step::Authenticate, Some(200), Outcome::Passed));
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["steps"][0]["step"], "authenticate");
        assert_eq!(value["steps"][0]["outcome"], "passed");
        assert_eq!(value["steps"][0]["status"], 200);
    }
}
