//! Submission of shipments to the tracking API.
//!
//! The conversion never submits on its own: [`submit_all`] is a separate
//! step that takes any [`ShipmentSubmitter`], so the transformation can run
//! and be tested without network access.
//!
//! ```rust,ignore
//! use shipload::{convert, submit_all, ConvertOptions, HttpSubmitter};
//!
//! let outcome = convert(&ConvertOptions::default())?;
//! let submitter = HttpSubmitter::from_env()?;
//! let report = submit_all(&outcome.batch.shipments, &submitter).await;
//! ```

use serde::Serialize;
use std::env;
use uuid::Uuid;

use crate::error::{SubmitError, SubmitResult};
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::Shipment;

/// Environment variable holding the API base URL
pub const API_URL_VAR: &str = "SHIPMENT_API_URL";

/// Environment variable holding the account UUID
pub const API_ACCOUNT_VAR: &str = "SHIPMENT_API_ACCOUNT";

/// Status returned by the API for one shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub shipment_id: String,
    pub status: u16,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that accepts one shipment payload and reports a status.
///
/// Implementations must not retry; a failed call is reported to the caller.
#[allow(async_fn_in_trait)]
pub trait ShipmentSubmitter {
    async fn submit(&self, shipment: &Shipment) -> SubmitResult<SubmissionOutcome>;
}

/// Posts shipments as JSON over HTTPS
#[derive(Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    base_url: String,
    account: Uuid,
}

impl HttpSubmitter {
    pub fn new(base_url: impl Into<String>, account: Uuid) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            account,
        }
    }

    /// Create a submitter from `SHIPMENT_API_URL` and `SHIPMENT_API_ACCOUNT`
    pub fn from_env() -> SubmitResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        let base_url = env::var(API_URL_VAR)
            .map_err(|_| SubmitError::MissingConfig(format!("{} not set", API_URL_VAR)))?;
        let account = env::var(API_ACCOUNT_VAR)
            .map_err(|_| SubmitError::MissingConfig(format!("{} not set", API_ACCOUNT_VAR)))?;

        Ok(Self::new(base_url, parse_account(&account)?))
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/shipment/v2/account/{}/shipment",
            self.base_url.trim_end_matches('/'),
            self.account
        )
    }
}

impl ShipmentSubmitter for HttpSubmitter {
    async fn submit(&self, shipment: &Shipment) -> SubmitResult<SubmissionOutcome> {
        let response = self
            .client
            .post(self.endpoint())
            .json(shipment)
            .send()
            .await
            .map_err(|e| SubmitError::RequestFailed(e.to_string()))?;

        Ok(SubmissionOutcome {
            shipment_id: shipment.shipment_id.clone(),
            status: response.status().as_u16(),
        })
    }
}

pub fn parse_account(raw: &str) -> SubmitResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| SubmitError::InvalidAccount(raw.to_string()))
}

/// Outcomes of a submission run
#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub outcomes: Vec<SubmissionOutcome>,
    /// Shipments whose request could not be completed
    pub failures: Vec<(String, SubmitError)>,
}

impl SubmissionReport {
    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }
}

/// Submit shipments one at a time. A failure is logged and the loop goes on.
pub async fn submit_all<S: ShipmentSubmitter>(
    shipments: &[Shipment],
    submitter: &S,
) -> SubmissionReport {
    let mut report = SubmissionReport::default();
    log_info(format!("📡 Submitting {} shipments...", shipments.len()));

    for shipment in shipments {
        match submitter.submit(shipment).await {
            Ok(outcome) => {
                if outcome.is_success() {
                    log_success(format!(
                        "Shipment {} uploaded. Status: {}",
                        outcome.shipment_id, outcome.status
                    ));
                } else {
                    log_warning(format!(
                        "Shipment {} rejected. Status: {}",
                        outcome.shipment_id, outcome.status
                    ));
                }
                report.outcomes.push(outcome);
            }
            Err(e) => {
                log_error(format!("Shipment {} not submitted: {}", shipment.shipment_id, e));
                report.failures.push((shipment.shipment_id.clone(), e));
            }
        }
    }

    log_info(format!(
        "{} accepted, {} rejected, {} failed",
        report.accepted(),
        report.outcomes.len() - report.accepted(),
        report.failures.len()
    ));
    report
}
