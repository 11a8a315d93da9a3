// src/notify/render.rs
//! Subject, HTML and plain-text bodies for the daily report.
//!
//! Every piece of collected or LLM-produced text goes through `html_escape`
//! before it reaches the HTML body.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use crate::analyze::CompositeAnalysis;
use crate::ingest::stats::Stats;
use crate::ingest::truncate_summary;
use crate::ingest::types::{Bundle, Category, Item, URL_PLACEHOLDER};

const MAX_DEVELOPMENTS: usize = 10;
const MAX_TRENDS: usize = 5;
const MAX_THEMES: usize = 3;
const MAX_BREAKTHROUGHS: usize = 5;
const MAX_SECTORS: usize = 5;
const MAX_LINES: usize = 5;
const MAX_ITEMS_PER_SOURCE: usize = 10;
const CARD_SUMMARY_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn render(analysis: &CompositeAnalysis, bundle: &Bundle, stats: &Stats) -> RenderedReport {
    RenderedReport {
        subject: subject_line(analysis),
        html: html_body(analysis, bundle, stats),
        text: text_body(analysis, stats),
    }
}

pub fn subject_line(analysis: &CompositeAnalysis) -> String {
    format!(
        "Daily AI Update - {} | Latest Breakthroughs & Trends",
        analysis.timestamp.format("%B %d, %Y")
    )
}

fn esc(s: &str) -> String {
    encode_text(s).into_owned()
}

/// Only http(s) links are emitted; anything else becomes the placeholder.
fn safe_href(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        encode_double_quoted_attribute(url).into_owned()
    } else {
        URL_PLACEHOLDER.to_string()
    }
}

fn title_case_key(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

fn badge_class(importance: &str) -> &'static str {
    match importance.trim().to_lowercase().as_str() {
        "critical" => "badge-critical",
        "high" => "badge-high",
        _ => "badge-medium",
    }
}

fn list_items(lines: &[String]) -> String {
    lines
        .iter()
        .take(MAX_LINES)
        .map(|l| format!("<li>{}</li>", esc(l)))
        .collect()
}

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f7fafc; color: #2d3748; margin: 0; padding: 20px; }
.container { max-width: 800px; margin: 0 auto; background: #fff; border-radius: 12px; overflow: hidden; }
.header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: #fff; padding: 30px; text-align: center; }
.subtitle { opacity: 0.9; }
.stats-bar { display: flex; justify-content: space-around; margin-top: 20px; }
.stat-number { display: block; font-size: 24px; font-weight: 700; }
.stat-label { font-size: 12px; text-transform: uppercase; }
.content { padding: 30px; }
.section { margin-bottom: 35px; }
.section-title { border-bottom: 2px solid #e2e8f0; padding-bottom: 8px; }
.card { background: #f7fafc; border-left: 4px solid #667eea; border-radius: 6px; padding: 15px; margin-bottom: 12px; }
.card-title { font-weight: 600; margin-bottom: 6px; }
.badge { display: inline-block; padding: 2px 8px; border-radius: 10px; font-size: 11px; font-weight: 600; margin-right: 4px; }
.badge-critical { background: #fed7d7; color: #c53030; }
.badge-high { background: #feebc8; color: #c05621; }
.badge-medium { background: #e2e8f0; color: #4a5568; }
.source-card { border: 1px solid #e2e8f0; border-radius: 6px; padding: 12px; margin-bottom: 10px; }
.source-meta { color: #718096; font-size: 13px; }
.footer { background: #2d3748; color: #e2e8f0; text-align: center; padding: 20px; font-size: 13px; }
"#;

fn html_body(analysis: &CompositeAnalysis, bundle: &Bundle, stats: &Stats) -> String {
    let mut body = String::new();
    body.push_str(&header_section(analysis, stats));
    body.push_str("<div class=\"content\">");
    body.push_str(&executive_summary_section(analysis));
    body.push_str(&key_developments_section(analysis));
    body.push_str(&trends_section(analysis));
    body.push_str(&breakthroughs_section(analysis));
    body.push_str(&industry_impact_section(analysis));
    body.push_str(&insights_section(analysis));
    body.push_str(&predictions_section(analysis));
    body.push_str(&sources_section(bundle));
    body.push_str("</div>");
    body.push_str(&footer_section(analysis));

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"container\">\n{body}\n</div>\n</body>\n</html>\n",
        esc(&subject_line(analysis))
    )
}

fn header_section(analysis: &CompositeAnalysis, stats: &Stats) -> String {
    let research = stats.count_of(&[Category::ResearchPaper, Category::ResearchWithCode]);
    let models = stats.count_of(&[Category::ModelRelease]);
    let tools = stats.count_of(&[Category::OpenSourceTool, Category::ToolUpdate]);
    let stat = |n: usize, label: &str| {
        format!(
            "<div class=\"stat-item\"><span class=\"stat-number\">{n}</span><span class=\"stat-label\">{label}</span></div>"
        )
    };
    format!(
        "<div class=\"header\"><h1>Daily AI Update</h1><p class=\"subtitle\">{} &bull; {} UTC</p><div class=\"stats-bar\">{}{}{}{}{}</div></div>",
        analysis.timestamp.format("%B %d, %Y"),
        analysis.timestamp.format("%I:%M %p"),
        stat(stats.total_items, "Total Updates"),
        stat(stats.sources_count, "Sources"),
        stat(research, "Papers"),
        stat(models, "Models"),
        stat(tools, "Tools"),
    )
}

fn section(title: &str, inner: &str) -> String {
    format!("<div class=\"section\"><h2 class=\"section-title\">{title}</h2>{inner}</div>")
}

fn executive_summary_section(analysis: &CompositeAnalysis) -> String {
    let summary = analysis.executive_summary.trim();
    let inner = if summary.is_empty() {
        "<div class=\"card\"><div class=\"card-content\">No summary available today.</div></div>"
            .to_string()
    } else {
        format!(
            "<div class=\"card\"><div class=\"card-content\" style=\"white-space: pre-wrap;\">{}</div></div>",
            esc(summary)
        )
    };
    section("Executive Summary", &inner)
}

fn key_developments_section(analysis: &CompositeAnalysis) -> String {
    if analysis.key_developments.is_empty() {
        return String::new();
    }
    let mut items = String::new();
    for dev in analysis.key_developments.iter().take(MAX_DEVELOPMENTS) {
        let importance = if dev.importance.trim().is_empty() {
            "Medium"
        } else {
            dev.importance.as_str()
        };
        let _ = write!(
            items,
            "<li><div><span class=\"badge {}\">{}</span><span class=\"badge badge-medium\">{}</span></div>\
<div class=\"card-title\">{}</div><div class=\"card-content\">\
<strong>Impact:</strong> {}<br><strong>Timeframe:</strong> {}<br><strong>Key Takeaway:</strong> {}</div></li>",
            badge_class(importance),
            esc(importance),
            esc(or_na(&dev.category)),
            esc(or_na(&dev.title)),
            esc(or_na(&dev.impact)),
            esc(or_na(&dev.timeframe)),
            esc(or_na(&dev.key_takeaway)),
        );
    }
    section(
        "Top 10 Key Developments",
        &format!("<ol class=\"numbered-list\">{items}</ol>"),
    )
}

fn trends_section(analysis: &CompositeAnalysis) -> String {
    let t = &analysis.trends_and_patterns;
    if t.is_empty() {
        return String::new();
    }
    let mut inner = String::new();
    if !t.emerging_trends.is_empty() {
        inner.push_str("<h3>Emerging Trends</h3>");
        for trend in t.emerging_trends.iter().take(MAX_TRENDS) {
            let _ = write!(
                inner,
                "<div class=\"card\"><div class=\"card-title\">{}</div><span class=\"badge badge-high\">{} Strength</span><div class=\"card-content\">{}</div></div>",
                esc(or_na(&trend.trend)),
                esc(if trend.strength.is_empty() { "Medium" } else { trend.strength.as_str() }),
                esc(&trend.description),
            );
        }
    }
    if !t.dominant_themes.is_empty() {
        inner.push_str("<h3>Dominant Themes</h3>");
        for theme in t.dominant_themes.iter().take(MAX_THEMES) {
            let _ = write!(
                inner,
                "<div class=\"card\"><div class=\"card-title\">{}</div><div class=\"card-content\">{}</div></div>",
                esc(or_na(&theme.theme)),
                esc(&theme.significance),
            );
        }
    }
    let shift = &t.technological_shifts;
    if !shift.description.is_empty() {
        let _ = write!(
            inner,
            "<h3>Technological Shift</h3><div class=\"card\"><div class=\"card-content\">{}<br><strong>From:</strong> {}<br><strong>To:</strong> {}</div></div>",
            esc(&shift.description),
            esc(or_na(&shift.old_approach)),
            esc(or_na(&shift.new_approach)),
        );
    }
    section("Trends &amp; Patterns", &inner)
}

fn breakthroughs_section(analysis: &CompositeAnalysis) -> String {
    if analysis.breakthrough_technologies.is_empty() {
        return String::new();
    }
    let mut inner = String::new();
    for bt in analysis.breakthrough_technologies.iter().take(MAX_BREAKTHROUGHS) {
        let _ = write!(
            inner,
            "<div class=\"card\"><div class=\"card-title\">{}</div><div class=\"card-content\">\
<strong>Innovation:</strong> {}<br><strong>Capability:</strong> {}<br><strong>Adoption Timeline:</strong> {}</div></div>",
            esc(or_na(&bt.technology)),
            esc(or_na(&bt.innovation)),
            esc(or_na(&bt.capability)),
            esc(or_na(&bt.adoption_timeline)),
        );
    }
    section("Breakthrough Technologies", &inner)
}

fn industry_impact_section(analysis: &CompositeAnalysis) -> String {
    if analysis.industry_impact.is_empty() {
        return String::new();
    }
    let mut inner = String::new();
    for (sector, impact) in analysis.industry_impact.iter().take(MAX_SECTORS) {
        let detail = if impact.direct_impact.trim().is_empty() {
            "No impact details available"
        } else {
            impact.direct_impact.as_str()
        };
        let _ = write!(
            inner,
            "<div class=\"card\"><div class=\"card-title\">{}</div><div class=\"card-content\">{}</div></div>",
            esc(sector),
            esc(detail),
        );
    }
    section("Industry Impact", &inner)
}

fn insights_section(analysis: &CompositeAnalysis) -> String {
    let mut inner = String::new();
    for (stakeholder, lines) in &analysis.actionable_insights {
        if lines.is_empty() {
            continue;
        }
        let _ = write!(
            inner,
            "<div class=\"card\"><div class=\"card-title\">{}</div><ul class=\"insight-list\">{}</ul></div>",
            esc(&title_case_key(stakeholder)),
            list_items(lines),
        );
    }
    if inner.is_empty() {
        return String::new();
    }
    section("Actionable Insights", &inner)
}

fn predictions_section(analysis: &CompositeAnalysis) -> String {
    let mut inner = String::new();
    for (horizon, lines) in &analysis.future_predictions {
        if lines.is_empty() {
            continue;
        }
        let _ = write!(
            inner,
            "<div class=\"card\"><div class=\"card-title\">{}</div><ul class=\"insight-list\">{}</ul></div>",
            esc(&title_case_key(horizon)),
            list_items(lines),
        );
    }
    if inner.is_empty() {
        return String::new();
    }
    section("Future Outlook", &inner)
}

fn source_card(item: &Item) -> String {
    let summary = if item.summary.trim().is_empty() {
        "No summary available".to_string()
    } else {
        truncate_summary(item.summary.trim(), CARD_SUMMARY_CHARS)
    };
    format!(
        "<div class=\"source-card\"><div class=\"card-title\">{}</div>\
<div class=\"source-meta\"><span class=\"badge badge-medium\">{}</span> {}</div>\
<p>{}</p><a href=\"{}\" target=\"_blank\">Read full article</a></div>",
        esc(&item.title),
        esc(item.category.as_str()),
        esc(&item.source),
        esc(&summary),
        safe_href(&item.url),
    )
}

fn sources_section(bundle: &Bundle) -> String {
    let mut inner = String::new();
    for (key, items) in bundle.iter() {
        if items.is_empty() {
            continue;
        }
        let _ = write!(inner, "<h3>{} ({})</h3>", esc(&title_case_key(key)), items.len());
        for item in items.iter().take(MAX_ITEMS_PER_SOURCE) {
            inner.push_str(&source_card(item));
        }
    }
    if inner.is_empty() {
        return String::new();
    }
    section(
        &format!("Source Articles ({} items)", bundle.total_items()),
        &inner,
    )
}

fn footer_section(analysis: &CompositeAnalysis) -> String {
    format!(
        "<div class=\"footer\"><p><strong>Daily AI Updates</strong></p><p>Analysis model: {}</p><p>Generated: {}</p></div>",
        esc(&analysis.metadata.analysis_model),
        analysis.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

fn text_body(analysis: &CompositeAnalysis, stats: &Stats) -> String {
    let rule = "=".repeat(70);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "DAILY AI UPDATE - {}", analysis.timestamp.format("%B %d, %Y"));
    let _ = writeln!(out, "{rule}\n");
    let _ = writeln!(out, "STATISTICS\n----------");
    let _ = writeln!(out, "Total Updates: {}", stats.total_items);
    let _ = writeln!(out, "Sources: {}\n", stats.sources_count);

    let _ = writeln!(out, "EXECUTIVE SUMMARY\n-----------------");
    let summary = analysis.executive_summary.trim();
    let _ = writeln!(
        out,
        "{}\n",
        if summary.is_empty() {
            "No summary available"
        } else {
            summary
        }
    );

    if !analysis.key_developments.is_empty() {
        let _ = writeln!(out, "KEY DEVELOPMENTS\n----------------");
        for (i, dev) in analysis
            .key_developments
            .iter()
            .take(MAX_DEVELOPMENTS)
            .enumerate()
        {
            let _ = writeln!(out, "{}. {} ({})", i + 1, dev.title, or_na(&dev.importance));
            if !dev.key_takeaway.is_empty() {
                let _ = writeln!(out, "   {}", dev.key_takeaway);
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{rule}\n");
    let _ = writeln!(out, "[View the full report in the HTML version]\n");
    let _ = writeln!(out, "Generated by Daily AI Updates");
    let _ = writeln!(out, "{}", analysis.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case() {
        assert_eq!(title_case_key("ai_practitioners"), "Ai Practitioners");
        assert_eq!(title_case_key("next_week"), "Next Week");
    }

    #[test]
    fn href_rejects_non_http() {
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href("https://a.b/?x=\"y\""), "https://a.b/?x=&quot;y&quot;");
    }
}
