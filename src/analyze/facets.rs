// src/analyze/facets.rs
//! The eight analysis facets and their typed results.
//!
//! Seven facets ask the LLM and decode a structured reply; `Importance` is
//! computed locally. A failed facet never produces a partial value: the caller
//! substitutes [`FacetResult::neutral`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::analyze::ai_adapter::AiClient;
use crate::analyze::error::FacetError;
use crate::analyze::extract::{parse_structured, Shape};
use crate::analyze::importance::{self, ImportanceBuckets};
use crate::analyze::prompts;
use crate::ingest::types::Bundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    ExecutiveSummary,
    KeyDevelopments,
    TrendsAndPatterns,
    Breakthroughs,
    IndustryImpact,
    ActionableInsights,
    FuturePredictions,
    Importance,
}

impl FacetKind {
    pub const ALL: [FacetKind; 8] = [
        FacetKind::ExecutiveSummary,
        FacetKind::KeyDevelopments,
        FacetKind::TrendsAndPatterns,
        FacetKind::Breakthroughs,
        FacetKind::IndustryImpact,
        FacetKind::ActionableInsights,
        FacetKind::FuturePredictions,
        FacetKind::Importance,
    ];

    /// Field of `CompositeAnalysis` this facet fills.
    pub fn slot(self) -> &'static str {
        match self {
            FacetKind::ExecutiveSummary => "executive_summary",
            FacetKind::KeyDevelopments => "key_developments",
            FacetKind::TrendsAndPatterns => "trends_and_patterns",
            FacetKind::Breakthroughs => "breakthrough_technologies",
            FacetKind::IndustryImpact => "industry_impact",
            FacetKind::ActionableInsights => "actionable_insights",
            FacetKind::FuturePredictions => "future_predictions",
            FacetKind::Importance => "prioritization",
        }
    }

    pub fn uses_llm(self) -> bool {
        !matches!(self, FacetKind::Importance)
    }
}

// ---------- typed facet payloads ----------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyDevelopment {
    #[serde(deserialize_with = "de_rank")]
    pub rank: u32,
    #[serde(deserialize_with = "de_text")]
    pub title: String,
    #[serde(deserialize_with = "de_text")]
    pub category: String,
    #[serde(deserialize_with = "de_text")]
    pub importance: String,
    #[serde(deserialize_with = "de_text")]
    pub importance_reason: String,
    #[serde(deserialize_with = "de_text")]
    pub impact: String,
    #[serde(deserialize_with = "de_text")]
    pub timeframe: String,
    #[serde(deserialize_with = "de_text")]
    pub key_takeaway: String,
    #[serde(deserialize_with = "de_text")]
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trend {
    #[serde(deserialize_with = "de_text")]
    pub trend: String,
    #[serde(deserialize_with = "de_text")]
    pub description: String,
    #[serde(deserialize_with = "de_text")]
    pub strength: String,
    #[serde(deserialize_with = "de_list")]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "de_text")]
    pub theme: String,
    #[serde(deserialize_with = "de_text")]
    pub prevalence: String,
    #[serde(deserialize_with = "de_text")]
    pub significance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnologicalShift {
    #[serde(deserialize_with = "de_text")]
    pub description: String,
    #[serde(deserialize_with = "de_text")]
    pub old_approach: String,
    #[serde(deserialize_with = "de_text")]
    pub new_approach: String,
    #[serde(deserialize_with = "de_text")]
    pub implications: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketMovements {
    #[serde(deserialize_with = "de_list")]
    pub active_companies: Vec<String>,
    #[serde(deserialize_with = "de_list")]
    pub hot_sectors: Vec<String>,
    #[serde(deserialize_with = "de_list")]
    pub investment_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendAnalysis {
    pub emerging_trends: Vec<Trend>,
    pub dominant_themes: Vec<Theme>,
    pub technological_shifts: TechnologicalShift,
    pub market_movements: MarketMovements,
}

impl TrendAnalysis {
    pub fn is_empty(&self) -> bool {
        self == &TrendAnalysis::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakthrough {
    #[serde(deserialize_with = "de_text")]
    pub technology: String,
    #[serde(deserialize_with = "de_text")]
    pub innovation: String,
    #[serde(deserialize_with = "de_text")]
    pub capability: String,
    #[serde(deserialize_with = "de_text")]
    pub technical_advancement: String,
    #[serde(deserialize_with = "de_list")]
    pub potential_applications: Vec<String>,
    #[serde(deserialize_with = "de_text")]
    pub adoption_timeline: String,
    #[serde(deserialize_with = "de_text")]
    pub limitations: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorImpact {
    #[serde(deserialize_with = "de_text")]
    pub direct_impact: String,
    #[serde(deserialize_with = "de_text")]
    pub opportunities: String,
    #[serde(deserialize_with = "de_text")]
    pub challenges: String,
    #[serde(deserialize_with = "de_text")]
    pub timeline: String,
}

/// One facet's successful output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "facet", content = "value", rename_all = "snake_case")]
pub enum FacetResult {
    ExecutiveSummary(String),
    KeyDevelopments(Vec<KeyDevelopment>),
    TrendsAndPatterns(TrendAnalysis),
    Breakthroughs(Vec<Breakthrough>),
    IndustryImpact(BTreeMap<String, SectorImpact>),
    ActionableInsights(BTreeMap<String, Vec<String>>),
    FuturePredictions(BTreeMap<String, Vec<String>>),
    Importance(ImportanceBuckets),
}

impl FacetResult {
    /// Value a facet contributes when it fails.
    pub fn neutral(kind: FacetKind) -> Self {
        match kind {
            FacetKind::ExecutiveSummary => FacetResult::ExecutiveSummary(String::new()),
            FacetKind::KeyDevelopments => FacetResult::KeyDevelopments(Vec::new()),
            FacetKind::TrendsAndPatterns => FacetResult::TrendsAndPatterns(TrendAnalysis::default()),
            FacetKind::Breakthroughs => FacetResult::Breakthroughs(Vec::new()),
            FacetKind::IndustryImpact => FacetResult::IndustryImpact(BTreeMap::new()),
            FacetKind::ActionableInsights => FacetResult::ActionableInsights(BTreeMap::new()),
            FacetKind::FuturePredictions => FacetResult::FuturePredictions(BTreeMap::new()),
            FacetKind::Importance => FacetResult::Importance(ImportanceBuckets::default()),
        }
    }

    pub fn kind(&self) -> FacetKind {
        match self {
            FacetResult::ExecutiveSummary(_) => FacetKind::ExecutiveSummary,
            FacetResult::KeyDevelopments(_) => FacetKind::KeyDevelopments,
            FacetResult::TrendsAndPatterns(_) => FacetKind::TrendsAndPatterns,
            FacetResult::Breakthroughs(_) => FacetKind::Breakthroughs,
            FacetResult::IndustryImpact(_) => FacetKind::IndustryImpact,
            FacetResult::ActionableInsights(_) => FacetKind::ActionableInsights,
            FacetResult::FuturePredictions(_) => FacetKind::FuturePredictions,
            FacetResult::Importance(_) => FacetKind::Importance,
        }
    }
}

/// Run one facet to completion. Timeouts and panics are handled by the caller.
pub async fn run_facet(
    kind: FacetKind,
    client: &dyn AiClient,
    digest: &str,
    bundle: &Bundle,
) -> Result<FacetResult, FacetError> {
    let result = match kind {
        FacetKind::Importance => FacetResult::Importance(importance::categorize(bundle)),
        FacetKind::ExecutiveSummary => {
            let reply = client.submit(&prompts::executive_summary(digest)).await?;
            let text = reply.trim();
            if text.is_empty() {
                return Err(FacetError::EmptyReply);
            }
            FacetResult::ExecutiveSummary(text.to_string())
        }
        FacetKind::KeyDevelopments => {
            let reply = client.submit(&prompts::key_developments(digest)).await?;
            FacetResult::KeyDevelopments(parse_structured(&reply, Shape::Array)?)
        }
        FacetKind::TrendsAndPatterns => {
            let reply = client.submit(&prompts::trends_and_patterns(digest)).await?;
            FacetResult::TrendsAndPatterns(parse_structured(&reply, Shape::Object)?)
        }
        FacetKind::Breakthroughs => {
            let reply = client.submit(&prompts::breakthroughs(digest)).await?;
            FacetResult::Breakthroughs(parse_structured(&reply, Shape::Array)?)
        }
        FacetKind::IndustryImpact => {
            let reply = client.submit(&prompts::industry_impact(digest)).await?;
            FacetResult::IndustryImpact(parse_structured(&reply, Shape::Object)?)
        }
        FacetKind::ActionableInsights => {
            let reply = client.submit(&prompts::actionable_insights(digest)).await?;
            let raw: BTreeMap<String, Value> = parse_structured(&reply, Shape::Object)?;
            FacetResult::ActionableInsights(lines_by_key(raw))
        }
        FacetKind::FuturePredictions => {
            let reply = client.submit(&prompts::future_predictions(digest)).await?;
            let raw: BTreeMap<String, Value> = parse_structured(&reply, Shape::Object)?;
            FacetResult::FuturePredictions(lines_by_key(raw))
        }
    };
    Ok(result)
}

// ---------- lenient decoding helpers ----------

/// Flatten a JSON value into display lines: strings as-is, arrays element-wise,
/// objects as `key: value`.
fn value_lines(v: Value, out: &mut Vec<String>) {
    match v {
        Value::Null => {}
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() {
                out.push(s.to_string());
            }
        }
        Value::Array(items) => items.into_iter().for_each(|i| value_lines(i, out)),
        Value::Object(map) => {
            for (k, v) in map {
                let mut inner = Vec::new();
                value_lines(v, &mut inner);
                if !inner.is_empty() {
                    out.push(format!("{k}: {}", inner.join("; ")));
                }
            }
        }
        other => out.push(other.to_string()),
    }
}

fn lines_by_key(raw: BTreeMap<String, Value>) -> BTreeMap<String, Vec<String>> {
    raw.into_iter()
        .map(|(k, v)| {
            let mut lines = Vec::new();
            value_lines(v, &mut lines);
            (k, lines)
        })
        .collect()
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let mut lines = Vec::new();
    value_lines(Value::deserialize(d)?, &mut lines);
    Ok(lines.join("; "))
}

fn de_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let mut lines = Vec::new();
    value_lines(Value::deserialize(d)?, &mut lines);
    Ok(lines)
}

fn de_rank<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Value::String(s) => s.trim().trim_start_matches('#').parse().unwrap_or(0),
        _ => 0,
    })
}
