//! Reqwest-backed identity provider adapter.
//!
//! Accounts live under `{base}/accounts/{uid}`; password checks go to
//! `{base}/accounts:verifyPassword`. Every request carries the admin API token
//! as a bearer credential.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{
    CreateAccountDto, ProviderErrorDto, UpdateAccountDto, VerifiedAccountDto, VerifyPasswordDto,
};
use crate::domain::ports::{IdentityPatch, IdentityProvider, IdentityProviderError, NewIdentity};
use crate::domain::{EmailAddress, UserId};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpIdentityProvider`].
pub struct IdentityProviderConfig {
    /// Root of the provider admin API, e.g. `https://idp.internal/v1`.
    pub base_url: Url,
    /// Admin API token sent as a bearer credential.
    pub api_token: Zeroizing<String>,
    pub timeout: Duration,
}

impl IdentityProviderConfig {
    pub fn new(base_url: Url, api_token: impl Into<String>) -> Self {
        Self {
            base_url,
            api_token: Zeroizing::new(api_token.into()),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Identity provider adapter speaking JSON over HTTP.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: Url,
    api_token: Zeroizing<String>,
}

impl HttpIdentityProvider {
    /// Build the adapter with a client bound to the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: IdentityProviderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            api_token: config.api_token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, IdentityProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                IdentityProviderError::unavailable("identity provider base URL cannot hold a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(self.api_token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), IdentityProviderError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }

    async fn account_call(
        &self,
        method: Method,
        uid: UserId,
        body: Option<&UpdateAccountDto<'_>>,
    ) -> Result<(), IdentityProviderError> {
        let uid_segment = uid.to_string();
        let url = self.endpoint(&["accounts", uid_segment.as_str()])?;
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let (status, body) = self.send(request).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(IdentityProviderError::not_found(uid_segment));
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn create(&self, identity: &NewIdentity) -> Result<(), IdentityProviderError> {
        let url = self.endpoint(&["accounts"])?;
        let request = self
            .request(Method::POST, url)
            .json(&CreateAccountDto::from(identity));
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(())
    }

    async fn update(
        &self,
        uid: UserId,
        patch: &IdentityPatch,
    ) -> Result<(), IdentityProviderError> {
        let body = UpdateAccountDto::from(patch);
        self.account_call(Method::PATCH, uid, Some(&body)).await
    }

    async fn delete(&self, uid: UserId) -> Result<(), IdentityProviderError> {
        self.account_call(Method::DELETE, uid, None).await
    }

    async fn verify_password(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<UserId, IdentityProviderError> {
        let url = self.endpoint(&["accounts:verifyPassword"])?;
        let request = self.request(Method::POST, url).json(&VerifyPasswordDto {
            email: email.as_ref(),
            password,
        });
        let (status, body) = self.send(request).await?;
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                return Err(IdentityProviderError::InvalidCredentials);
            }
            _ if !status.is_success() => return Err(map_status_error(status, &body)),
            _ => {}
        }
        parse_verified_uid(&body)
    }
}

fn parse_verified_uid(body: &[u8]) -> Result<UserId, IdentityProviderError> {
    let decoded: VerifiedAccountDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::unavailable(format!("invalid verifyPassword payload: {error}"))
    })?;
    UserId::new(&decoded.uid).map_err(|error| {
        IdentityProviderError::unavailable(format!("provider returned malformed uid: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::unavailable(format!("request timed out: {error}"))
    } else {
        IdentityProviderError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let detail = serde_json::from_slice::<ProviderErrorDto>(body)
        .ok()
        .map(|dto| dto.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };

    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        IdentityProviderError::rejected(message)
    } else {
        IdentityProviderError::unavailable(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
#[path = "http_provider_tests.rs"]
mod tests;
