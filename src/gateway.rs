//! The gateway facade: one method per Payflow verb.

use base64::{Engine, prelude::BASE64_STANDARD};
use bon::Builder;
use http::{
    HeaderMap, HeaderName, HeaderValue,
    header::{CONTENT_TYPE, HOST},
};

use crate::{
    codec::encode,
    config::GatewayConfig,
    errors::GatewayError,
    fields::FieldSet,
    mock::mock_response,
    request::{self, TransactionOptions},
    response::Response,
    transport::{Transport, TransportRequest},
    types::{CardInput, Environment, Money, Subject, TransactionKind},
};

pub const CONTENT_TYPE_NVP: &str = "text/name value";

pub static X_VPS_CLIENT_TIMEOUT: HeaderName = HeaderName::from_static("x-vps-client-timeout");
pub static X_VPS_REQUEST_ID: HeaderName = HeaderName::from_static("x-vps-request-id");
pub static X_VPS_INTEGRATION_PRODUCT: HeaderName =
    HeaderName::from_static("x-vps-vit-integration-product");
pub static X_VPS_INTEGRATION_VERSION: HeaderName =
    HeaderName::from_static("x-vps-vit-integration-version");
pub static X_VPS_RUNTIME_VERSION: HeaderName =
    HeaderName::from_static("x-vps-vit-runtime-version");

/// Amount authorized, then voided, to check a card in [`Gateway::store_card`].
pub const VERIFY_AMOUNT: u32 = 1;

type GatewayResult<T, Tr> = Result<T, GatewayError<<Tr as Transport>::Error>>;

/// A Payflow gateway client.
///
/// Each verb builds one request, commits it through the transport and parses
/// the answer. Nothing is kept between calls.
#[derive(Builder, Debug, Clone)]
pub struct Gateway<T: Transport> {
    pub config: GatewayConfig,
    pub transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(config: GatewayConfig, transport: T) -> Self {
        Gateway { config, transport }
    }

    pub async fn authorize(
        &self,
        money: Money,
        subject: impl Into<Subject>,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = subject.into();
        self.request(TransactionKind::Authorization, Some(money), Some(&subject), &options)
            .await
    }

    pub async fn sale(
        &self,
        money: Money,
        subject: impl Into<Subject>,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = subject.into();
        self.request(TransactionKind::Sale, Some(money), Some(&subject), &options)
            .await
    }

    /// Refund a prior transaction.
    pub async fn refund(
        &self,
        money: Money,
        reference: impl Into<String>,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = Subject::Reference(reference.into());
        self.request(TransactionKind::Credit, Some(money), Some(&subject), &options)
            .await
    }

    /// Credit a card that has no prior transaction with the merchant.
    pub async fn credit(
        &self,
        money: Money,
        card: CardInput,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = Subject::Card(card);
        self.request(TransactionKind::Credit, Some(money), Some(&subject), &options)
            .await
    }

    pub async fn capture(
        &self,
        money: Money,
        authorization: impl Into<String>,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = Subject::Reference(authorization.into());
        self.request(TransactionKind::Capture, Some(money), Some(&subject), &options)
            .await
    }

    pub async fn void(
        &self,
        authorization: impl Into<String>,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = Subject::Reference(authorization.into());
        self.request(TransactionKind::Void, None, Some(&subject), &options)
            .await
    }

    pub async fn inquire(
        &self,
        authorization: impl Into<String>,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = Subject::Reference(authorization.into());
        self.request(TransactionKind::Inquire, None, Some(&subject), &options)
            .await
    }

    /// Check a card by authorizing [`VERIFY_AMOUNT`] and voiding the
    /// authorization when it succeeds.
    ///
    /// Returns the authorization response. The void's own outcome is not
    /// reported, but a transport failure while voiding is.
    pub async fn store_card(
        &self,
        card: CardInput,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let void_options = TransactionOptions {
            pairs: Vec::new(),
            request_id: None,
            ..options.clone()
        };

        let response = self
            .authorize(
                Money::from(VERIFY_AMOUNT),
                card,
                options.with_pair("comment1", "VERIFY"),
            )
            .await?;

        if response.is_successful() {
            if let Some(token) = response.token() {
                let voided = self.void(token, void_options).await?;

                if !voided.is_successful() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "Card verification void failed: result={:?}, message={:?}",
                        voided.result_code(),
                        voided.message()
                    );
                }
            }
        }

        Ok(response)
    }

    /// Start an express checkout and obtain its token.
    pub async fn generate_token(
        &self,
        money: Money,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        self.request(TransactionKind::GenerateToken, Some(money), None, &options)
            .await
    }

    /// Fetch the buyer details of an express checkout. Needs `order_id`.
    pub async fn checkout_details(
        &self,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        self.request(TransactionKind::CheckoutDetails, None, None, &options)
            .await
    }

    /// Complete an express checkout. Needs `order_id` and `payer_id`.
    pub async fn checkout_payment(
        &self,
        money: Money,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        self.request(TransactionKind::CheckoutPayment, Some(money), None, &options)
            .await
    }

    /// Charge against a PayPal billing agreement or prior PayPal transaction.
    pub async fn paypal_sale(
        &self,
        money: Money,
        origid: impl Into<String>,
        options: TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let subject = Subject::Reference(origid.into());
        self.request(TransactionKind::PaypalSale, Some(money), Some(&subject), &options)
            .await
    }

    /// Build and commit a single transaction.
    pub async fn request(
        &self,
        kind: TransactionKind,
        money: Option<Money>,
        subject: Option<&Subject>,
        options: &TransactionOptions,
    ) -> GatewayResult<Response, T> {
        let environment = options.environment(self.config.environment);
        let fields = request::build(kind, money, subject, options, environment)?;
        self.commit(kind, &fields, options, environment).await
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    async fn commit(
        &self,
        kind: TransactionKind,
        fields: &FieldSet,
        options: &TransactionOptions,
        environment: Environment,
    ) -> GatewayResult<Response, T> {
        let body = encode(fields, &self.config.credentials);
        let request_id = options
            .request_id
            .clone()
            .unwrap_or_else(generate_request_id);

        if options.mock {
            #[cfg(feature = "tracing")]
            tracing::debug!("Mocking {kind} request: request_id='{request_id}'");

            let raw = mock_response(&body, &request_id)?;
            return Ok(Response::parse(&raw));
        }

        let endpoint = self.config.endpoint(environment)?;
        let headers = self.headers(options, environment, &request_id)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Sending {kind} request: request_id='{request_id}', endpoint='{endpoint}'"
        );

        let raw = self
            .transport
            .send(TransportRequest {
                endpoint,
                headers,
                body,
            })
            .await
            .map_err(GatewayError::Transport)?;

        let response = Response::parse(&raw);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Received {kind} response: status={}, result={:?}, message={:?}",
            response.status,
            response.result_code(),
            response.message()
        );

        Ok(response)
    }

    /// Headers sent with every request.
    pub fn headers(
        &self,
        options: &TransactionOptions,
        environment: Environment,
        request_id: &str,
    ) -> Result<HeaderMap, http::header::InvalidHeaderValue> {
        let timeout = options.timeout.unwrap_or(self.config.timeout);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_NVP));
        headers.insert(X_VPS_CLIENT_TIMEOUT.clone(), HeaderValue::from(timeout));
        headers.insert(
            X_VPS_INTEGRATION_PRODUCT.clone(),
            HeaderValue::from_str(&self.config.integration_product)?,
        );
        headers.insert(
            X_VPS_INTEGRATION_VERSION.clone(),
            HeaderValue::from_str(&self.config.integration_version)?,
        );
        if let Some(runtime) = &self.config.runtime_version {
            headers.insert(X_VPS_RUNTIME_VERSION.clone(), HeaderValue::from_str(runtime)?);
        }
        headers.insert(HOST, HeaderValue::from_static(environment.host()));
        headers.insert(X_VPS_REQUEST_ID.clone(), HeaderValue::from_str(request_id)?);

        Ok(headers)
    }
}

/// A fresh request id: 20 random bytes, base64 encoded.
pub fn generate_request_id() -> String {
    BASE64_STANDARD.encode(rand::random::<[u8; 20]>())
}
