//! # hostel-smoke
//!
//! Role-based smoke tests for the hostel complaint-management API: log in as
//! a configured profile (the Block A warden by default), then check that an
//! authenticated `GET /api/complaints` answers with a well-formed listing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hostel_smoke::{ApiClient, LoginRequest, RunOptions, SmokeRunner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:3000", None)?;
//!     let runner = SmokeRunner::new(
//!         client,
//!         "warden",
//!         LoginRequest::new("admin1@uni.com", "admin1"),
//!         RunOptions::default(),
//!     );
//!
//!     let token = runner.authenticate().await?;
//!     let listing = runner.fetch_complaints(Some(&token)).await?;
//!     println!("{} complaints", listing.count);
//!     Ok(())
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod runner;
pub mod session;

pub use client::{ApiClient, ApiResponse};
pub use config::SmokeConfig;
pub use error::SmokeError;
pub use hostel_api_types::{ComplaintListResponse, LoginRequest};
pub use report::{Outcome, RunReport, Step};
pub use runner::{RunOptions, SmokeRunner};
pub use session::SessionToken;
