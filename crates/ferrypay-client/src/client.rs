//! mPAY ONE HTTP client implementation.

use std::time::Duration;

use ferrypay_core::{Operation, Payload, PaymentRequest, Signer};
use reqwest::Client;
use uuid::Uuid;

use crate::error::ClientError;
use crate::types::{UpstreamErrorResponse, UpstreamResponse};

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// mPAY ONE API client.
///
/// Every outbound body is signed with the merchant secret before it is sent.
#[derive(Debug, Clone)]
pub struct MpayClient {
    client: Client,
    base_url: String,
    signer: Signer,
}

impl MpayClient {
    /// Create a new client.
    ///
    /// * `base_url` - processor API root (e.g. `"https://sandbox.mpay.one/api/v1"`)
    /// * `signer` - signer holding the merchant secret
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, signer: Signer) -> Result<Self, ClientError> {
        Self::with_options(base_url, signer, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        signer: Signer,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration(
                "processor base URL must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .user_agent(options.user_agent)
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            signer,
        })
    }

    /// Processor API root, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate `payload` for `operation`, then sign and submit it.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the request fails or the
    /// processor returns an error.
    pub async fn execute(
        &self,
        operation: Operation,
        payload: Payload,
    ) -> Result<UpstreamResponse, ClientError> {
        let request = PaymentRequest::new(operation, payload)?;
        self.submit(request).await
    }

    /// Query the status of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the processor returns an error.
    pub async fn inquire_payment(
        &self,
        merchant_id: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Result<UpstreamResponse, ClientError> {
        let payload = Payload::new()
            .with("merchant_id", merchant_id.into())
            .with("order_id", order_id.into());

        self.execute(Operation::PaymentInquiry, payload).await
    }

    /// Sign and submit an already validated request.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails, the request fails or the processor
    /// returns an error.
    pub async fn submit(&self, request: PaymentRequest) -> Result<UpstreamResponse, ClientError> {
        let request_id = Uuid::new_v4();
        let operation = request.operation();
        let order_id = request.order_id().map(str::to_owned);

        let signed = request.sign(&self.signer)?;
        let url = format!("{}{}", self.base_url, signed.endpoint());

        tracing::info!(
            %request_id,
            %operation,
            order_id = order_id.as_deref().unwrap_or("-"),
            fields = signed.payload().len(),
            "Submitting request to payment processor"
        );

        let response = self
            .client
            .post(&url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(signed.payload())
            .send()
            .await?;

        self.handle_response(operation, request_id, response).await
    }

    /// Handle processor response and convert errors.
    async fn handle_response(
        &self,
        operation: Operation,
        request_id: Uuid,
        response: reqwest::Response,
    ) -> Result<UpstreamResponse, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            let parsed: UpstreamResponse = serde_json::from_slice(&body)?;
            tracing::debug!(
                %request_id,
                %operation,
                upstream_status = %parsed.status,
                "Payment processor accepted request"
            );
            return Ok(parsed);
        }

        let error = match serde_json::from_slice::<UpstreamErrorResponse>(&body) {
            Ok(api_error) => ClientError::Api {
                code: api_error.error,
                message: api_error.message,
                status: status.as_u16(),
            },
            Err(_) => ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            },
        };

        tracing::warn!(
            %request_id,
            %operation,
            status = status.as_u16(),
            error = %error,
            "Payment processor rejected request"
        );

        Err(error)
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!("ferrypay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Create options with a request timeout.
    #[must_use]
    pub fn with_timeout(timeout_seconds: u64) -> Self {
        Self {
            timeout_seconds,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrypay_core::SharedSecret;

    fn signer() -> Signer {
        Signer::new(SharedSecret::new("test_secret_key"))
    }

    #[test]
    fn client_creation() {
        let client = MpayClient::new("https://sandbox.mpay.one/api/v1", signer()).unwrap();
        assert_eq!(client.base_url(), "https://sandbox.mpay.one/api/v1");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = MpayClient::new("https://sandbox.mpay.one/api/v1/", signer()).unwrap();
        assert_eq!(client.base_url(), "https://sandbox.mpay.one/api/v1");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = MpayClient::new("/", signer()).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::with_timeout(5);
        assert_eq!(options.timeout_seconds, 5);
        assert!(options.user_agent.starts_with("ferrypay/"));
        assert!(MpayClient::with_options("http://localhost:5001", signer(), options).is_ok());
    }
}
