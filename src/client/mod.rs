//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::domain::{
    BalanceResponse, CheckStatus, CheckStatusResponse, ErrorCode, Login, MessageText, Password,
    RawPhoneNumber, SendSms, SendSmsResponse, SenderName, SmsId, StateCode, TableName,
    ValidationError,
};
use crate::gateway::{BoxFuture, GatewayConfig, SmsGateway};
use crate::reconcile::{self, ReconcileError, ReconcileReport};
use crate::store::MessageStore;

const DEFAULT_ENDPOINT: &str = "https://letsads.com/api";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const XML_CONTENT_TYPE: &str = "text/xml";

/// Key stored with every message sent through LetsAds.
pub const PROCESSING_KEY: &str = "letsads";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_xml<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_xml<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, XML_CONTENT_TYPE)
                .header(ACCEPT, XML_CONTENT_TYPE)
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Login/password pair sent in the `<auth>` block of every request.
pub struct Credentials {
    login: Login,
    password: Password,
}

impl Credentials {
    /// Validate that both parts are non-empty.
    pub fn new(
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            login: Login::new(login)?,
            password: Password::new(password)?,
        })
    }

    pub fn login(&self) -> &Login {
        &self.login
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`LetsAdsClient`].
///
/// This error preserves:
/// - transport-class failures (connection, non-2xx status, unparseable body),
/// - provider rejections (`name == Error` responses) with their mapped description,
/// - configuration and validation failures.
pub enum LetsAdsError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body is not XML or does not match the expected schema.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// LetsAds answered with an `Error` response. Displays as the description of `code`.
    #[error("{text}")]
    Api { code: ErrorCode, text: String },

    /// The client could not be set up from the given settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl LetsAdsError {
    /// `true` for failures below the API contract: connection, HTTP status, or body decoding.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Parse(_)
        )
    }

    /// The provider error code, for [`LetsAdsError::Api`].
    pub fn error_code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`LetsAdsClient`].
///
/// Defaults: the public LetsAds endpoint, the `Test` sender name, no message table,
/// a 10 second connect timeout and a 15 second total timeout.
pub struct LetsAdsClientBuilder {
    config: GatewayConfig,
    endpoint: String,
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
}

impl LetsAdsClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            config: GatewayConfig::new(credentials),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Override the LetsAds API URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sender name used for outgoing messages.
    pub fn sender(mut self, sender: SenderName) -> Self {
        self.config.sender = sender;
        self
    }

    /// Message table polled by [`LetsAdsClient::check_status_by_cron`].
    pub fn table(mut self, table: TableName) -> Self {
        self.config.table = Some(table);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`LetsAdsClient`].
    pub fn build(self) -> Result<LetsAdsClient, LetsAdsError> {
        let endpoint = url::Url::parse(&self.endpoint).map_err(|err| {
            LetsAdsError::Configuration(format!("invalid endpoint {:?}: {err}", self.endpoint))
        })?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| LetsAdsError::Configuration(err.to_string()))?;

        Ok(LetsAdsClient {
            config: self.config,
            endpoint: endpoint.into(),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level LetsAds client.
///
/// Every operation is one XML POST to the API endpoint. Responses named `Error` are turned
/// into [`LetsAdsError::Api`] before any operation-specific decoding.
pub struct LetsAdsClient {
    config: GatewayConfig,
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for LetsAdsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LetsAdsClient")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl LetsAdsClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`LetsAdsClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, LetsAdsError> {
        LetsAdsClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> LetsAdsClientBuilder {
        LetsAdsClientBuilder::new(credentials)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Key identifying messages sent through this gateway in a shared message table.
    pub fn processing_key(&self) -> &'static str {
        PROCESSING_KEY
    }

    /// Current account balance.
    pub async fn balance(&self) -> Result<BalanceResponse, LetsAdsError> {
        let body = self
            .post("balance", &crate::transport::encode_balance_body())
            .await?;
        crate::transport::decode_balance_xml_response(&body).map_err(parse_error)
    }

    /// Send one message.
    ///
    /// The recipient goes out without its leading `+` and the text is XML-escaped. The
    /// returned status is always the queued state; poll [`LetsAdsClient::check_status`]
    /// for delivery.
    pub async fn send_sms(&self, request: SendSms) -> Result<SendSmsResponse, LetsAdsError> {
        let payload = crate::transport::encode_send_sms_body(&self.config.sender, &request);
        let body = self.post("send_sms", &payload).await?;
        let response =
            crate::transport::decode_send_sms_xml_response(&body).map_err(parse_error)?;

        tracing::debug!(
            recipient = request.to().normalized(),
            sms_id = response.campaign_id.as_str(),
            "message queued"
        );
        Ok(response)
    }

    /// Query the delivery state of a sent message.
    pub async fn check_status(
        &self,
        request: CheckStatus,
    ) -> Result<CheckStatusResponse, LetsAdsError> {
        let payload = crate::transport::encode_check_status_body(&request);
        let body = self.post("check_status", &payload).await?;
        crate::transport::decode_check_status_xml_response(&body).map_err(parse_error)
    }

    /// Run the reconciliation sweep over the configured message table.
    ///
    /// Fails with [`ReconcileError::MissingTable`] when no table was configured.
    pub async fn check_status_by_cron<S>(
        &self,
        store: &S,
    ) -> Result<ReconcileReport, ReconcileError>
    where
        S: MessageStore + ?Sized,
    {
        reconcile::run(self, store, self.config.table.as_ref()).await
    }

    async fn post(&self, operation: &'static str, payload: &str) -> Result<String, LetsAdsError> {
        let credentials = &self.config.credentials;
        let request =
            crate::transport::encode_request(credentials.login(), credentials.password(), payload);

        tracing::debug!(operation, endpoint = %self.endpoint, "sending LetsAds request");

        let response = self
            .http
            .post_xml(&self.endpoint, request)
            .await
            .map_err(LetsAdsError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(LetsAdsError::HttpStatus {
                status: response.status,
                body,
            });
        }

        let envelope =
            crate::transport::decode_envelope(&response.body).map_err(parse_error)?;
        if let Some(code) = envelope.error_code() {
            let code = ErrorCode::new(code);
            let text = code.description().into_owned();
            tracing::warn!(operation, code = code.as_str(), "LetsAds rejected request");
            return Err(LetsAdsError::Api { code, text });
        }

        Ok(response.body)
    }
}

fn parse_error(err: crate::transport::TransportError) -> LetsAdsError {
    LetsAdsError::Parse(Box::new(err))
}

impl SmsGateway for LetsAdsClient {
    type Error = LetsAdsError;

    fn processing_key(&self) -> &'static str {
        PROCESSING_KEY
    }

    fn send_sms<'a>(
        &'a self,
        to: &'a RawPhoneNumber,
        text: &'a MessageText,
    ) -> BoxFuture<'a, Result<SendSmsResponse, Self::Error>> {
        Box::pin(LetsAdsClient::send_sms(
            self,
            SendSms::new(to.clone(), text.clone()),
        ))
    }

    fn check_status<'a>(
        &'a self,
        campaign_id: &'a SmsId,
        recipient: Option<&'a RawPhoneNumber>,
    ) -> BoxFuture<'a, Result<StateCode, Self::Error>> {
        Box::pin(async move {
            let request = match recipient {
                Some(recipient) => {
                    CheckStatus::with_recipient(campaign_id.clone(), recipient.clone())
                }
                None => CheckStatus::new(campaign_id.clone()),
            };
            let response = LetsAdsClient::check_status(self, request).await?;
            Ok(response.state)
        })
    }

    fn balance(&self) -> BoxFuture<'_, Result<f64, Self::Error>> {
        Box::pin(async move { Ok(LetsAdsClient::balance(self).await?.balance) })
    }
}
