//! HTTP client for a running vacation server.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::api::vacation::ErrorBody;
use crate::config::ClientConfig;
use crate::model::vacation::Vacation;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// Server answered with a non-success status; `message` is its `error` field.
    #[error("{message} ({status})")]
    Rejected { status: StatusCode, message: String },
}

#[derive(Clone)]
pub struct VacationClient {
    http: reqwest::Client,
    base_url: String,
}

impl VacationClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(ClientError::Rejected {
            status,
            message: ErrorBody::new(message).error,
        })
    }

    pub async fn request_vacation(&self, vacation: &Vacation) -> Result<Vacation, ClientError> {
        debug!(username = %vacation.username, "request-vacation");
        let response = self
            .http
            .post(self.url("/vacations"))
            .json(vacation)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Searches by username fragments; no fragments lists everything.
    pub async fn search_vacations(&self, usernames: &[&str]) -> Result<Vec<Vacation>, ClientError> {
        debug!(?usernames, "search-vacations");
        let query: Vec<(&str, &str)> = usernames.iter().map(|u| ("username", *u)).collect();
        let response = self
            .http
            .get(self.url("/vacations"))
            .query(&query)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// `None` when the server has no such vacation.
    pub async fn get_vacation(&self, id: u64) -> Result<Option<Vacation>, ClientError> {
        debug!(id, "get-vacation");
        let response = self
            .http
            .get(self.url(&format!("/vacations/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }

    pub async fn approve_vacation(&self, id: u64) -> Result<Vacation, ClientError> {
        debug!(id, "approve-vacation");
        let response = self
            .http
            .put(self.url(&format!("/vacations/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn decline_vacation(&self, id: u64) -> Result<Vacation, ClientError> {
        debug!(id, "decline-vacation");
        let response = self
            .http
            .delete(self.url(&format!("/vacations/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }
}
