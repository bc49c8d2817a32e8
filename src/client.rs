//! Typed client for the warehouse backend REST API.
//!
//! Every request carries the session's `Authorization` header when a
//! session is present. List helpers in [`Snapshot`] degrade to empty
//! collections on failure instead of propagating errors.

use crate::models::{
    Article, Client, CreatedExits, Credentials, Entry, Exit, NewEntry, NewExits, Registration,
    TokenResponse,
};
use crate::session::Session;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("not authenticated")]
    Unauthenticated,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Option<Session>,
    ) -> Self {
        let base_url = format!("{}/", base_url.into().trim_end_matches('/'));
        Self {
            http,
            base_url,
            session,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn list_entries(&self) -> Result<Vec<Entry>, ApiError> {
        self.get("entries/").await
    }

    pub async fn create_entry(&self, entry: &NewEntry) -> Result<Entry, ApiError> {
        self.post("entries/", entry).await
    }

    pub async fn list_exits(&self) -> Result<Vec<Exit>, ApiError> {
        self.get("exits/").await
    }

    pub async fn create_multiple_exits(&self, exits: &NewExits) -> Result<CreatedExits, ApiError> {
        self.post("exits/create_multiple/", exits).await
    }

    pub async fn list_articles(&self) -> Result<Vec<Article>, ApiError> {
        self.get("articles/").await
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.get("clients/").await
    }

    /// Registers a new user and returns the session token.
    pub async fn register(&self, registration: &Registration) -> Result<String, ApiError> {
        let resp: TokenResponse = self.post("auth/registration/", registration).await?;
        Ok(resp.key)
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let resp: TokenResponse = self.post("auth/login/", credentials).await?;
        Ok(resp.key)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match &self.session {
            Some(session) => {
                builder.header(reqwest::header::AUTHORIZATION, session.authorization())
            }
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path).send().await?;
        decode(resp).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthenticated);
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

/// The four collections the views work from, fetched together.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub entries: Vec<Entry>,
    pub exits: Vec<Exit>,
    /// Sorted by name.
    pub articles: Vec<Article>,
    pub clients: Vec<Client>,
}

impl Snapshot {
    pub async fn load(client: &ApiClient) -> Self {
        let (entries, exits, articles, clients) = tokio::join!(
            or_empty("entries", client.list_entries()),
            or_empty("exits", client.list_exits()),
            or_empty("articles", client.list_articles()),
            or_empty("clients", client.list_clients()),
        );

        Self {
            entries,
            exits,
            articles: sorted_by_name(articles),
            clients,
        }
    }
}

pub async fn load_articles(client: &ApiClient) -> Vec<Article> {
    sorted_by_name(or_empty("articles", client.list_articles()).await)
}

pub async fn load_clients(client: &ApiClient) -> Vec<Client> {
    or_empty("clients", client.list_clients()).await
}

pub async fn or_empty<T>(
    what: &str,
    fut: impl Future<Output = Result<Vec<T>, ApiError>>,
) -> Vec<T> {
    match fut.await {
        Ok(items) => items,
        Err(err) => {
            error!("failed to fetch {what}: {err}");
            Vec::new()
        }
    }
}

fn sorted_by_name(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(|a, b| a.name.cmp(&b.name));
    articles
}
