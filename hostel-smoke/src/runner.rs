//! The smoke sequence: log in, then list complaints with the returned token.
//!
//! The token is an explicit value flowing from [`SmokeRunner::authenticate`]
//! into [`SmokeRunner::fetch_complaints`]. When login produced no token the
//! fetch fails its precondition without touching the network.

use std::time::{Duration, Instant};

use hostel_api_types::{ComplaintListResponse, LoginRequest, Role};
use tracing::{debug, info, warn};

use crate::checks::{
    expect_absent, expect_array, expect_non_empty_string, expect_non_negative_integer,
    expect_not_status, expect_status, kind_of, Expectation,
};
use crate::client::{ApiClient, ApiResponse};
use crate::config::SmokeConfig;
use crate::error::SmokeError;
use crate::report::{Outcome, RunReport, Step, StepReport};
use crate::session::SessionToken;

/// Which checks a run performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Require `data.len() == count` and object records
    pub strict: bool,
    /// Also verify anonymous and bad-password requests are rejected
    pub negative: bool,
    pub iterations: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            strict: false,
            negative: false,
            iterations: 1,
        }
    }
}

/// Result of one step plus the status code it saw, if any
struct Observed<T> {
    status: Option<u16>,
    result: Result<T, SmokeError>,
}

impl<T> Observed<T> {
    fn checked(response: &ApiResponse, result: Result<T, SmokeError>) -> Self {
        Self {
            status: Some(response.status),
            result,
        }
    }

    fn failed(err: SmokeError) -> Self {
        Self {
            status: None,
            result: Err(err),
        }
    }
}

pub struct SmokeRunner {
    client: ApiClient,
    profile: String,
    role: Option<Role>,
    credentials: LoginRequest,
    options: RunOptions,
}

impl SmokeRunner {
    pub fn new(
        client: ApiClient,
        profile: impl Into<String>,
        credentials: LoginRequest,
        options: RunOptions,
    ) -> Self {
        Self {
            client,
            profile: profile.into(),
            role: None,
            credentials,
            options,
        }
    }

    /// Build a runner for one profile of a loaded configuration
    pub fn from_config(config: &SmokeConfig, profile: &str) -> Result<Self, SmokeError> {
        let profile_config = config.profile(profile)?;
        let timeout = config.target.timeout_secs.map(Duration::from_secs);
        let client = ApiClient::new(config.target.base_url.clone(), timeout)?;
        let options = RunOptions {
            strict: config.checks.strict,
            negative: config.checks.negative,
            iterations: config.checks.iterations.max(1),
        };

        let mut runner = Self::new(client, profile, profile_config.credentials(), options);
        runner.role = profile_config.role;
        Ok(runner)
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Operation 1: `POST /api/login`, returning the session token
    pub async fn authenticate(&self) -> Result<SessionToken, SmokeError> {
        self.authenticate_step().await.result
    }

    /// Operation 2: `GET /api/complaints` with the token from [`Self::authenticate`]
    pub async fn fetch_complaints(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<ComplaintListResponse, SmokeError> {
        self.fetch_complaints_step(token).await.result
    }

    /// Anonymous `GET /api/complaints` must be refused with 401
    pub async fn reject_anonymous(&self) -> Result<(), SmokeError> {
        self.reject_anonymous_step().await.result
    }

    /// Login with a wrong password must not succeed or hand out a token
    pub async fn reject_bad_password(&self) -> Result<(), SmokeError> {
        self.reject_bad_password_step().await.result
    }

    async fn authenticate_step(&self) -> Observed<SessionToken> {
        match self.client.login(&self.credentials).await {
            Ok(response) => Observed::checked(&response, check_login(&response)),
            Err(err) => Observed::failed(err),
        }
    }

    async fn fetch_complaints_step(
        &self,
        token: Option<&SessionToken>,
    ) -> Observed<ComplaintListResponse> {
        let Some(token) = token else {
            return Observed::failed(SmokeError::precondition(
                Step::FetchComplaints,
                "authenticate did not produce a session token, request not sent",
            ));
        };

        match self.client.list_complaints(token).await {
            Ok(response) => Observed::checked(
                &response,
                check_complaints(&response, self.options.strict),
            ),
            Err(err) => Observed::failed(err),
        }
    }

    async fn reject_anonymous_step(&self) -> Observed<()> {
        match self.client.list_complaints_anonymous().await {
            Ok(response) => Observed::checked(&response, check_anonymous_rejected(&response)),
            Err(err) => Observed::failed(err),
        }
    }

    async fn reject_bad_password_step(&self) -> Observed<()> {
        let credentials = LoginRequest::new(
            self.credentials.email.clone(),
            format!("{}-not-the-password", self.credentials.password),
        );
        match self.client.login(&credentials).await {
            Ok(response) => Observed::checked(&response, check_bad_password_rejected(&response)),
            Err(err) => Observed::failed(err),
        }
    }

    /// Run every configured iteration and collect the outcomes.
    ///
    /// A failing step never aborts the run; later steps report their own
    /// outcome (a fetch after a failed login reports a precondition failure).
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::new(self.client.base_url(), &self.profile);
        info!(
            "Running smoke checks against {} as '{}' ({} iteration(s))",
            self.client.base_url(),
            self.profile,
            self.options.iterations
        );
        if let Some(role) = self.role.filter(|role| !role.is_admin()) {
            warn!(
                "Profile '{}' has role '{}', complaint listing may be restricted",
                self.profile, role
            );
        }

        for iteration in 1..=self.options.iterations {
            debug!("Starting iteration {}", iteration);

            let started = Instant::now();
            let login = self.authenticate_step().await;
            let token = record(&mut report, iteration, Step::Authenticate, started, login);

            let started = Instant::now();
            let fetch = self.fetch_complaints_step(token.as_ref()).await;
            if let Some(listing) = record(
                &mut report,
                iteration,
                Step::FetchComplaints,
                started,
                fetch,
            ) {
                info!(
                    "Iteration {}: {} complaint(s) listed",
                    iteration, listing.count
                );
            }

            if self.options.negative {
                let started = Instant::now();
                let anonymous = self.reject_anonymous_step().await;
                record(&mut report, iteration, Step::RejectAnonymous, started, anonymous);

                let started = Instant::now();
                let bad_password = self.reject_bad_password_step().await;
                record(
                    &mut report,
                    iteration,
                    Step::RejectBadPassword,
                    started,
                    bad_password,
                );
            }
        }

        if self.options.iterations > 1 {
            let consistency = check_consistency(&report, self.options.iterations);
            record(
                &mut report,
                self.options.iterations,
                Step::Consistency,
                Instant::now(),
                Observed {
                    status: None,
                    result: consistency,
                },
            );
        }

        info!(
            "Smoke run finished: {} checks, {} failed",
            report.total(),
            report.failed()
        );
        report
    }
}

/// Append a step to the report and hand back its value when it passed
fn record<T>(
    report: &mut RunReport,
    iteration: u32,
    step: Step,
    started: Instant,
    observed: Observed<T>,
) -> Option<T> {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let (outcome, value) = match observed.result {
        Ok(value) => {
            info!("[{}] {}: passed", iteration, step);
            (Outcome::Passed, Some(value))
        }
        Err(err) => {
            warn!("[{}] {}", iteration, err);
            (Outcome::from_error(&err), None)
        }
    };
    report.record(StepReport {
        iteration,
        step,
        status: observed.status,
        outcome,
        elapsed_ms,
    });
    value
}

pub fn check_login(response: &ApiResponse) -> Result<SessionToken, SmokeError> {
    let step = Step::Authenticate;
    expect_status(step, response, 200)?;
    let token = expect_non_empty_string(step, response, "token")?;
    SessionToken::new(token).ok_or_else(|| {
        SmokeError::assertion(step, Expectation::NonEmptyString("token"), "a blank string")
    })
}

pub fn check_complaints(
    response: &ApiResponse,
    strict: bool,
) -> Result<ComplaintListResponse, SmokeError> {
    let step = Step::FetchComplaints;
    expect_status(step, response, 200)?;
    let count = expect_non_negative_integer(step, response, "count")?;
    let data = expect_array(step, response, "data")?;

    let listing = ComplaintListResponse {
        count,
        data: data.clone(),
        message: response
            .body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(|message| message.as_str())
            .map(str::to_string),
    };

    if strict {
        if !listing.count_matches_data() {
            return Err(SmokeError::assertion(
                step,
                Expectation::CountMatchesData,
                format!("count {} with {} records", listing.count, listing.data.len()),
            ));
        }
        if let Some(index) = listing.first_non_object() {
            return Err(SmokeError::assertion(
                step,
                Expectation::ObjectRecords,
                format!("record {} is {}", index, kind_of(&listing.data[index])),
            ));
        }
    }

    Ok(listing)
}

pub fn check_anonymous_rejected(response: &ApiResponse) -> Result<(), SmokeError> {
    expect_status(Step::RejectAnonymous, response, 401)
}

pub fn check_bad_password_rejected(response: &ApiResponse) -> Result<(), SmokeError> {
    let step = Step::RejectBadPassword;
    expect_not_status(step, response, 200)?;
    expect_absent(step, response, "token")
}

/// Every iteration must observe the status codes of the first one
fn check_consistency(report: &RunReport, iterations: u32) -> Result<(), SmokeError> {
    let baseline = report.statuses(1);
    for iteration in 2..=iterations {
        let observed = report.statuses(iteration);
        if observed != baseline {
            return Err(SmokeError::assertion(
                Step::Consistency,
                Expectation::ConsistentStatuses,
                format!(
                    "iteration {} saw {} (first saw {})",
                    iteration,
                    describe_statuses(&observed),
                    describe_statuses(&baseline)
                ),
            ));
        }
    }
    Ok(())
}

fn describe_statuses(statuses: &[(Step, Option<u16>)]) -> String {
    let parts: Vec<String> = statuses
        .iter()
        .map(|(step, status)| match status {
            Some(status) => format!("{step} {status}"),
            None => format!("{step} -"),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}
