//! Application execution logic.
//!
//! Builds the payload once and delivers it to every configured target.

use thiserror::Error;

use ci_webhook::config::Configuration;
use ci_webhook::context::BuildContext;
use ci_webhook::payload::{Payload, PayloadBuilder, PayloadError};
use ci_webhook::webhook::{
    DeliveryError, DeliveryOutcome, Dispatcher, HttpClient, HttpError, Reporter, ReqwestClient,
    WriterReporter,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for fatal run failures.
///
/// Each message begins with the stage that failed.
#[derive(Debug, Error)]
pub enum RunError {
    /// The payload could not be built.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// A target could not be delivered to.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The HTTP client could not be initialized.
    #[error("creating http client: {0}")]
    Client(#[source] HttpError),

    /// Some targets failed while continuing past errors.
    #[error("delivering webhooks: {failed} of {total} failed")]
    Incomplete {
        /// Number of failed targets
        failed: usize,
        /// Number of configured targets
        total: usize,
    },
}

/// Executes a single notification run.
///
/// # Errors
///
/// Returns the first fatal error: payload encoding or rendering, client
/// setup, or a delivery failure under the abort policy. Under the continue
/// policy, returns [`RunError::Incomplete`] if any target failed.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: &Configuration, context: &BuildContext) -> Result<(), RunError> {
    let payload = PayloadBuilder::from_template(config.template.as_deref()).build(context)?;
    tracing::debug!(
        "Payload built ({} bytes), delivering to {} target(s)",
        payload.len(),
        config.targets.len()
    );

    let client = ReqwestClient::with_timeout(config.timeout).map_err(RunError::Client)?;
    let mut reporter = WriterReporter::stdout();

    deliver(client, config, &payload, &mut reporter).await
}

/// Dispatches the payload and turns the outcomes into a run result.
async fn deliver<H: HttpClient, R: Reporter>(
    client: H,
    config: &Configuration,
    payload: &Payload,
    reporter: &mut R,
) -> Result<(), RunError> {
    let outcomes = Dispatcher::new(client, config)
        .dispatch(&config.targets, payload, reporter)
        .await?;

    check_outcomes(&outcomes)
}

fn check_outcomes(outcomes: &[DeliveryOutcome]) -> Result<(), RunError> {
    let failed = outcomes.iter().filter(|o| o.is_failure()).count();

    if failed == 0 {
        tracing::debug!("Delivered to {} target(s)", outcomes.len());
        Ok(())
    } else {
        Err(RunError::Incomplete {
            failed,
            total: outcomes.len(),
        })
    }
}
