use crate::client::ApiClient;
use crate::config::Config;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub session: Arc<Mutex<Option<Session>>>,
}

impl AppState {
    pub fn new(config: Config, session: Option<Session>) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.lock().await.clone()
    }

    /// Client bound to the current session, or `None` when logged out.
    pub async fn api(&self) -> Option<ApiClient> {
        let session = self.current_session().await?;
        Some(self.client_with(Some(session)))
    }

    pub fn anonymous(&self) -> ApiClient {
        self.client_with(None)
    }

    fn client_with(&self, session: Option<Session>) -> ApiClient {
        ApiClient::new(self.http.clone(), self.config.api_url.clone(), session)
    }
}
