// src/ingest/providers/rss.rs
//! Shared RSS 2.0 / RSS 1.0 (RDF) parsing for the feed-backed providers.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{
    format_description::well_known::{Rfc2822, Rfc3339},
    OffsetDateTime,
};

#[derive(Debug, Deserialize)]
struct Feed {
    // RSS 2.0 nests items in <channel>; RDF puts them at the root.
    channel: Option<Channel>,
    #[serde(rename = "item", default)]
    item: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "creator", alias = "dc:creator")]
    creator: Option<String>,
    #[serde(rename = "date", alias = "dc:date")]
    dc_date: Option<String>,
}

/// A feed entry after text normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: Option<String>,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

/// Parse the first `limit` usable entries. Entries whose title normalizes to empty are skipped.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<FeedEntry>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let feed: Feed = from_str(&xml_clean).context("parsing rss xml")?;

    let raw = match feed.channel {
        Some(ch) if !ch.item.is_empty() => ch.item,
        _ => feed.item,
    };

    let mut out = Vec::with_capacity(raw.len().min(limit));
    for it in raw {
        if out.len() >= limit {
            break;
        }
        let title = crate::ingest::normalize_text(it.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            continue;
        }
        out.push(FeedEntry {
            title,
            link: it.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
            description: crate::ingest::normalize_text(
                it.description.as_deref().unwrap_or_default(),
            ),
            published: it
                .pub_date
                .as_deref()
                .or(it.dc_date.as_deref())
                .and_then(parse_feed_date),
            author: it
                .creator
                .map(|a| crate::ingest::normalize_text(&a))
                .filter(|a| !a.is_empty()),
        });
    }
    Ok(out)
}

/// RFC 2822 (RSS) first, then RFC 3339 (RDF/Atom style).
pub fn parse_feed_date(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    OffsetDateTime::parse(ts, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
        .ok()
        .and_then(|dt| DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond()))
}

// Entities valid in HTML but undeclared in XML trip the parser.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
