//! Application state.

use std::time::Duration;

use ferrypay_client::{ClientError, ClientOptions, MpayClient};
use ferrypay_core::{Signer, Verifier};

use crate::board::StatusBoard;
use crate::config::ServiceConfig;

/// Application state shared across handlers.
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Signing client for the payment processor.
    pub mpay: MpayClient,

    /// Webhook verifier holding the same merchant secret.
    pub verifier: Verifier,

    /// Latest webhook-delivered status per order.
    pub payments: StatusBoard,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The merchant secret is loaded once here and shared by the signer and
    /// the verifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, ClientError> {
        let signer = Signer::new(config.mpay_secret_key.clone());
        let verifier = Verifier::from(signer.clone());

        let mpay = MpayClient::with_options(
            config.mpay_base_url.clone(),
            signer,
            ClientOptions::with_timeout(config.upstream_timeout_seconds),
        )?;

        let retention =
            Duration::from_secs(config.status_retention_hours.saturating_mul(60 * 60));

        tracing::info!(mpay_url = %mpay.base_url(), "mPAY ONE integration enabled");

        Ok(Self {
            config,
            mpay,
            verifier,
            payments: StatusBoard::with_retention(retention),
        })
    }
}
