use crate::chart::DateRange;
use crate::models::{
    Article, ArticleId, Client, ClientId, Entry, EntryForm, EntryRow, Exit, ExitForm, ExitLine,
    ExitRow, FormLine, NewEntry, NewExits,
};
use serde::Deserialize;

pub const UNKNOWN: &str = "unknown";

/// Query-string filter of the entry and exit lists. Empty strings come from
/// unselected form inputs and count as unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("date is required")]
    MissingDate,

    #[error("client is required")]
    MissingClient,

    #[error("at least one line is required")]
    NoLines,

    #[error("line {} needs an article and a positive quantity", .0 + 1)]
    IncompleteLine(usize),

    #[error("invalid id: {0}")]
    InvalidId(String),
}

impl ListFilter {
    pub fn article_id(&self) -> Result<Option<ArticleId>, FormError> {
        parse_id(self.article.as_deref())
    }

    pub fn client_id(&self) -> Result<Option<ClientId>, FormError> {
        parse_id(self.client.as_deref())
    }

    /// Only a range with both ends set filters anything.
    pub fn date_range(&self) -> Option<DateRange> {
        match (non_empty(self.start.as_deref()), non_empty(self.end.as_deref())) {
            (Some(start), Some(end)) => Some(DateRange {
                start: start.to_string(),
                end: end.to_string(),
            }),
            _ => None,
        }
    }
}

pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn parse_id(value: Option<&str>) -> Result<Option<u64>, FormError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| FormError::InvalidId(raw.to_string())),
    }
}

pub fn article_name(articles: &[Article], id: ArticleId) -> &str {
    articles
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.name.as_str())
        .unwrap_or(UNKNOWN)
}

pub fn client_name(clients: &[Client], id: ClientId) -> &str {
    clients
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
        .unwrap_or(UNKNOWN)
}

pub fn entry_rows(
    entries: &[Entry],
    articles: &[Article],
    filter: &ListFilter,
) -> Result<Vec<EntryRow>, FormError> {
    let article = filter.article_id()?;
    let range = filter.date_range();

    Ok(entries
        .iter()
        .filter(|e| article.is_none_or(|id| e.article == id))
        .filter(|e| range.as_ref().is_none_or(|r| r.contains(&e.date)))
        .map(|e| EntryRow {
            id: e.id,
            article: article_name(articles, e.article).to_string(),
            quantity: e.quantity,
            date: e.date.clone(),
        })
        .collect())
}

/// Exits pending authorization are never listed.
pub fn exit_rows(
    exits: &[Exit],
    articles: &[Article],
    clients: &[Client],
    filter: &ListFilter,
) -> Result<Vec<ExitRow>, FormError> {
    let client = filter.client_id()?;
    let range = filter.date_range();

    Ok(exits
        .iter()
        .filter(|e| e.is_authorized)
        .filter(|e| client.is_none_or(|id| e.client == id))
        .filter(|e| range.as_ref().is_none_or(|r| r.contains(&e.date)))
        .map(|e| ExitRow {
            id: e.id,
            article: article_name(articles, e.article).to_string(),
            client: client_name(clients, e.client).to_string(),
            quantity: e.quantity,
            date: e.date.clone(),
        })
        .collect())
}

fn complete_lines(lines: &[FormLine]) -> Result<Vec<ExitLine>, FormError> {
    if lines.is_empty() {
        return Err(FormError::NoLines);
    }
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| match (line.article, line.quantity) {
            (Some(article), Some(quantity)) if quantity > 0 => Ok(ExitLine { article, quantity }),
            _ => Err(FormError::IncompleteLine(index)),
        })
        .collect()
}

/// One entry per form line, all sharing the form date.
pub fn entries_from_form(form: &EntryForm) -> Result<Vec<NewEntry>, FormError> {
    let date = non_empty(Some(&form.date)).ok_or(FormError::MissingDate)?;
    Ok(complete_lines(&form.lines)?
        .into_iter()
        .map(|line| NewEntry {
            article: line.article,
            quantity: line.quantity,
            date: date.to_string(),
        })
        .collect())
}

pub fn exits_from_form(form: &ExitForm) -> Result<NewExits, FormError> {
    let client = form.client.ok_or(FormError::MissingClient)?;
    let date = non_empty(Some(&form.date)).ok_or(FormError::MissingDate)?;
    Ok(NewExits {
        client,
        date: date.to_string(),
        articles: complete_lines(&form.lines)?,
    })
}
