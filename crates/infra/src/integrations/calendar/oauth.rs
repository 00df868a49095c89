//! OAuth token lifecycle for calendar integrations
//!
//! Decides when a stored credential is stale (expiry within the refresh
//! buffer) and performs the provider-specific refresh-grant call. Client
//! credentials come from the explicit configuration struct, never from
//! ambient process state. Refresh returns a new immutable credential value;
//! callers use the returned value for the remainder of the operation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use studyflow_core::IntegrationRepository;
use studyflow_domain::constants::TOKEN_REFRESH_BUFFER_SECONDS;
use studyflow_domain::{
    CalendarIntegration, CalendarProvider, OAuthClientConfig, Result, StudyflowError,
};
use tracing::{info, instrument};

use crate::errors::InfraError;

const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const MICROSOFT_TOKEN_ENDPOINT: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/token";
const MICROSOFT_REFRESH_SCOPE: &str = "Calendars.ReadWrite offline_access";

/// Refreshes stale integration credentials and persists the result
pub struct TokenLifecycleManager {
    http: Client,
    credentials: OAuthClientConfig,
    integrations: Arc<dyn IntegrationRepository>,
    google_token_endpoint: String,
    microsoft_token_endpoint: String,
    refresh_buffer_seconds: i64,
}

impl TokenLifecycleManager {
    pub fn new(
        http: Client,
        credentials: OAuthClientConfig,
        integrations: Arc<dyn IntegrationRepository>,
    ) -> Self {
        Self {
            http,
            credentials,
            integrations,
            google_token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            microsoft_token_endpoint: MICROSOFT_TOKEN_ENDPOINT.to_string(),
            refresh_buffer_seconds: TOKEN_REFRESH_BUFFER_SECONDS,
        }
    }

    #[must_use]
    pub fn with_refresh_buffer(mut self, seconds: i64) -> Self {
        self.refresh_buffer_seconds = seconds;
        self
    }

    /// Override the token endpoints, used by tests.
    #[must_use]
    pub fn with_token_endpoints(
        mut self,
        google: impl Into<String>,
        microsoft: impl Into<String>,
    ) -> Self {
        self.google_token_endpoint = google.into();
        self.microsoft_token_endpoint = microsoft.into();
        self
    }

    /// Return a credential guaranteed fresh for the buffer window.
    ///
    /// Fresh credentials are returned unchanged. Stale ones are refreshed
    /// with a single attempt, persisted, and returned as a new value.
    ///
    /// # Errors
    /// - `MissingRefreshToken` when stale with no refresh token stored
    /// - `TokenRefreshFailed` on a non-success token endpoint response
    #[instrument(skip(self, integration), fields(provider = %integration.provider, user_id = %integration.user_id))]
    pub async fn ensure_valid(
        &self,
        integration: &CalendarIntegration,
    ) -> Result<CalendarIntegration> {
        let now = Utc::now();
        if !integration.is_stale(self.refresh_buffer_seconds, now) {
            return Ok(integration.clone());
        }

        let refresh_token = integration
            .refresh_token
            .as_deref()
            .ok_or(StudyflowError::MissingRefreshToken)?;

        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let endpoint = match integration.provider {
            CalendarProvider::Google => {
                form.push(("client_id", &self.credentials.google_client_id));
                form.push(("client_secret", &self.credentials.google_client_secret));
                &self.google_token_endpoint
            }
            CalendarProvider::Microsoft => {
                form.push(("client_id", &self.credentials.microsoft_client_id));
                form.push(("client_secret", &self.credentials.microsoft_client_secret));
                form.push(("scope", MICROSOFT_REFRESH_SCOPE));
                &self.microsoft_token_endpoint
            }
        };

        let response =
            self.http.post(endpoint).form(&form).send().await.map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(StudyflowError::TokenRefreshFailed {
                provider: integration.provider,
                response_body: format!("({status}) {body}"),
            });
        }

        let refreshed: TokenRefreshResponse =
            response.json().await.map_err(InfraError::from)?;
        let expires_at = Utc::now() + Duration::seconds(refreshed.expires_in);

        self.integrations
            .update_tokens(
                integration.id,
                &refreshed.access_token,
                refreshed.refresh_token.as_deref(),
                expires_at,
            )
            .await?;

        info!(provider = %integration.provider, "refreshed calendar access token");

        Ok(CalendarIntegration {
            access_token: refreshed.access_token,
            refresh_token: refreshed
                .refresh_token
                .or_else(|| integration.refresh_token.clone()),
            expires_at,
            ..integration.clone()
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}
