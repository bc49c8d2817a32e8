//! Stock chart aggregation.
//!
//! Turns the raw entry and exit collections into a label axis plus one or
//! two quantity series. The engine is pure: it performs no I/O and the same
//! inputs always produce the same output, so callers simply rerun it
//! whenever a filter, grouping or collection changes.

use crate::listing::{FormError, ListFilter};
use crate::models::{Article, ArticleId, Client, ClientId, Entry, Exit, Movement};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeriesSelector {
    #[default]
    Entries,
    Exits,
    Both,
}

impl SeriesSelector {
    fn kinds(self) -> &'static [SeriesKind] {
        match self {
            Self::Entries => &[SeriesKind::Entries],
            Self::Exits => &[SeriesKind::Exits],
            Self::Both => &[SeriesKind::Entries, SeriesKind::Exits],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    #[default]
    Daily,
    Biweekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    #[default]
    Articles,
    Clients,
    Dates(DateBucket),
}

/// Inclusive range of ISO dates, compared as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn contains(&self, date: &str) -> bool {
        date >= self.start.as_str() && date <= self.end.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartFilters {
    pub article: Option<ArticleId>,
    pub client: Option<ClientId>,
    pub date_range: Option<DateRange>,
}

impl ChartFilters {
    pub fn keeps(&self, record: &impl Movement) -> bool {
        if let Some(article) = self.article {
            if record.article() != article {
                return false;
            }
        }
        // Entries have no client, so a client filter drops all of them.
        if let Some(client) = self.client {
            if record.client() != Some(client) {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(record.date()) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartQuery {
    pub filters: ChartFilters,
    pub series: SeriesSelector,
    pub group_by: GroupBy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupAxis {
    #[default]
    Articles,
    Clients,
    Dates,
}

/// Chart selections as they arrive in a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartParams {
    #[serde(default)]
    pub series: SeriesSelector,
    #[serde(default)]
    pub group_by: GroupAxis,
    #[serde(default)]
    pub bucket: DateBucket,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl ChartParams {
    pub fn into_query(self) -> Result<ChartQuery, FormError> {
        let filter = ListFilter {
            article: self.article,
            client: self.client,
            start: self.start,
            end: self.end,
        };
        let group_by = match self.group_by {
            GroupAxis::Articles => GroupBy::Articles,
            GroupAxis::Clients => GroupBy::Clients,
            GroupAxis::Dates => GroupBy::Dates(self.bucket),
        };

        Ok(ChartQuery {
            filters: ChartFilters {
                article: filter.article_id()?,
                client: filter.client_id()?,
                date_range: filter.date_range(),
            },
            series: self.series,
            group_by,
        })
    }
}

pub struct ChartInput<'a> {
    pub entries: &'a [Entry],
    pub exits: &'a [Exit],
    /// Label universe for article grouping, emitted in the given order.
    pub articles: &'a [Article],
    /// Label universe for client grouping, emitted in the given order.
    pub clients: &'a [Client],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Entries,
    Exits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: SeriesKind,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Default)]
struct Bucket {
    label: String,
    entries: u64,
    exits: u64,
}

pub fn build_chart(input: &ChartInput<'_>, query: &ChartQuery) -> ChartData {
    let entries: Vec<&Entry> = input.entries.iter().filter(|e| query.filters.keeps(*e)).collect();
    let exits: Vec<&Exit> = input.exits.iter().filter(|e| query.filters.keeps(*e)).collect();

    let buckets = match query.group_by {
        GroupBy::Articles => seeded_buckets(
            input.articles.iter().map(|a| (a.id, a.name.as_str())),
            entries.iter().map(|e| (Some(e.article()), e.quantity())),
            exits.iter().map(|e| (Some(e.article()), e.quantity())),
        ),
        GroupBy::Clients => seeded_buckets(
            input.clients.iter().map(|c| (c.id, c.name.as_str())),
            entries.iter().map(|e| (e.client(), e.quantity())),
            exits.iter().map(|e| (e.client(), e.quantity())),
        ),
        GroupBy::Dates(bucket) => date_buckets(bucket, &entries, &exits),
    };

    into_chart(buckets, query.series)
}

/// One bucket per reference entity, in reference order, zero-filled.
/// Records pointing at unknown ids have no bucket and are dropped.
fn seeded_buckets<'a>(
    seeds: impl Iterator<Item = (u64, &'a str)>,
    entries: impl Iterator<Item = (Option<u64>, u64)>,
    exits: impl Iterator<Item = (Option<u64>, u64)>,
) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut index: BTreeMap<u64, usize> = BTreeMap::new();
    for (id, name) in seeds {
        // A repeated id keeps its first slot, as a map keyed by id would.
        if index.contains_key(&id) {
            continue;
        }
        index.insert(id, buckets.len());
        buckets.push(Bucket {
            label: name.to_string(),
            ..Bucket::default()
        });
    }

    for (key, quantity) in entries {
        if let Some(slot) = key.and_then(|k| index.get(&k)) {
            let bucket = &mut buckets[*slot];
            bucket.entries = bucket.entries.saturating_add(quantity);
        }
    }
    for (key, quantity) in exits {
        if let Some(slot) = key.and_then(|k| index.get(&k)) {
            let bucket = &mut buckets[*slot];
            bucket.exits = bucket.exits.saturating_add(quantity);
        }
    }

    buckets
}

/// Buckets only for periods that occur in the data, sorted by key.
fn date_buckets(bucket: DateBucket, entries: &[&Entry], exits: &[&Exit]) -> Vec<Bucket> {
    let mut map: BTreeMap<String, Bucket> = BTreeMap::new();

    for entry in entries {
        let key = bucket_key(entry.date(), bucket);
        let slot = map.entry(key.clone()).or_insert_with(|| Bucket {
            label: key,
            ..Bucket::default()
        });
        slot.entries = slot.entries.saturating_add(entry.quantity());
    }
    for exit in exits {
        let key = bucket_key(exit.date(), bucket);
        let slot = map.entry(key.clone()).or_insert_with(|| Bucket {
            label: key,
            ..Bucket::default()
        });
        slot.exits = slot.exits.saturating_add(exit.quantity());
    }

    map.into_values().collect()
}

/// Period key for a record date. Dates that cannot be parsed become their
/// own bucket keyed by the raw string.
///
/// Biweekly keys pair ISO weeks (1-2, 3-4, ...) within the ISO week-year, so
/// their string order is only roughly chronological across years.
pub fn bucket_key(raw: &str, bucket: DateBucket) -> String {
    let Some(date) = parse_date(raw) else {
        return raw.to_string();
    };

    match bucket {
        DateBucket::Daily => date.format("%Y-%m-%d").to_string(),
        DateBucket::Monthly => date.format("%Y-%m").to_string(),
        DateBucket::Yearly => date.format("%Y").to_string(),
        DateBucket::Biweekly => {
            let iso = date.iso_week();
            format!("{}-W{}", iso.year(), iso.week().div_ceil(2))
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    // Offset timestamps keep the calendar day of their own offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

fn into_chart(buckets: Vec<Bucket>, series: SeriesSelector) -> ChartData {
    let datasets = series
        .kinds()
        .iter()
        .map(|kind| Dataset {
            name: *kind,
            values: buckets
                .iter()
                .map(|b| match kind {
                    SeriesKind::Entries => b.entries,
                    SeriesKind::Exits => b.exits,
                })
                .collect(),
        })
        .collect();

    ChartData {
        labels: buckets.into_iter().map(|b| b.label).collect(),
        datasets,
    }
}
