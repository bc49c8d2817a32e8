use serde::{Deserialize, Serialize};

pub type ArticleId = u64;
pub type ClientId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: ArticleId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
}

/// Stock received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: u64,
    pub article: ArticleId,
    pub quantity: u64,
    pub date: String,
}

/// Stock shipped. Only authorized exits are listed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exit {
    pub id: u64,
    pub article: ArticleId,
    pub client: ClientId,
    pub quantity: u64,
    pub date: String,
    #[serde(default)]
    pub is_authorized: bool,
}

/// Common view over entries and exits used by filtering and grouping.
pub trait Movement {
    fn article(&self) -> ArticleId;
    /// Entries carry no client, so this is `None` for them.
    fn client(&self) -> Option<ClientId>;
    fn quantity(&self) -> u64;
    fn date(&self) -> &str;
}

impl Movement for Entry {
    fn article(&self) -> ArticleId {
        self.article
    }

    fn client(&self) -> Option<ClientId> {
        None
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn date(&self) -> &str {
        &self.date
    }
}

impl Movement for Exit {
    fn article(&self) -> ArticleId {
        self.article
    }

    fn client(&self) -> Option<ClientId> {
        Some(self.client)
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    pub article: ArticleId,
    pub quantity: u64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExitLine {
    pub article: ArticleId,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewExits {
    pub client: ClientId,
    pub date: String,
    pub articles: Vec<ExitLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreatedExitLine {
    pub article: String,
    pub quantity: u64,
}

/// Backend acknowledgement for `create_multiple`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreatedExits {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub exits: Vec<CreatedExitLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub key: String,
}

/// One editable line of a multi-line form. Empty fields come from
/// unselected inputs and are rejected during validation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FormLine {
    #[serde(default)]
    pub article: Option<ArticleId>,
    #[serde(default)]
    pub quantity: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EntryForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub lines: Vec<FormLine>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExitForm {
    #[serde(default)]
    pub client: Option<ClientId>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub lines: Vec<FormLine>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EntryRow {
    pub id: u64,
    pub article: String,
    pub quantity: u64,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ExitRow {
    pub id: u64,
    pub article: String,
    pub client: String,
    pub quantity: u64,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResponse<T> {
    pub message: String,
    pub rows: Vec<T>,
}
