// src/analyze/prompts.rs
//! Prompt builders, one per LLM facet. Each embeds the shared digest and
//! states the exact JSON layout the facet decoder expects.

pub fn executive_summary(digest: &str) -> String {
    format!(
        "You are an AI industry analyst. Analyze today's AI developments and write a \
compelling executive summary.

DATA COLLECTED TODAY:
{digest}

Write three paragraphs:
1. OVERVIEW: what is happening in AI today, the big picture.
2. SIGNIFICANCE: why these developments matter and what changed.
3. OUTLOOK: what this means for the near future.

Use a professional, engaging tone. Be specific with numbers and names when available.
Return plain prose, no JSON and no markdown headings."
    )
}

pub fn key_developments(digest: &str) -> String {
    format!(
        r#"Analyze these AI developments and identify the TOP 10 MOST IMPORTANT items.

DATA:
{digest}

For each item give a clear title, a category (Model Release / Research / Tool / News / Policy),
an importance level (Critical / High / Medium) with the reason, who or what is affected,
when the impact will be felt (Immediate / Short-term / Long-term) and a one-sentence takeaway.

Return ONLY a JSON array in exactly this layout:
[
  {{
    "rank": 1,
    "title": "...",
    "category": "...",
    "importance": "...",
    "importance_reason": "...",
    "impact": "...",
    "timeframe": "...",
    "key_takeaway": "...",
    "source": "..."
  }}
]"#
    )
}

pub fn trends_and_patterns(digest: &str) -> String {
    format!(
        r#"Analyze these AI developments for TRENDS and PATTERNS.

DATA:
{digest}

Identify 3-5 emerging trends, the top 3 dominant themes, the main technological shift
(old approach vs new approach) and the market movements (companies, sectors, investment).

Return ONLY a JSON object in exactly this layout:
{{
  "emerging_trends": [
    {{"trend": "...", "description": "...", "strength": "...", "examples": ["..."]}}
  ],
  "dominant_themes": [
    {{"theme": "...", "prevalence": "...", "significance": "..."}}
  ],
  "technological_shifts": {{
    "description": "...",
    "old_approach": "...",
    "new_approach": "...",
    "implications": "..."
  }},
  "market_movements": {{
    "active_companies": ["..."],
    "hot_sectors": ["..."],
    "investment_areas": ["..."]
  }}
}}"#
    )
}

pub fn breakthroughs(digest: &str) -> String {
    format!(
        r#"Identify BREAKTHROUGH TECHNOLOGIES from today's AI developments.

DATA:
{digest}

Find the top 5 most significant technical breakthroughs or innovations, ranked by significance.

Return ONLY a JSON array in exactly this layout:
[
  {{
    "technology": "...",
    "innovation": "what is new or improved",
    "capability": "what it can do now that was not possible before",
    "technical_advancement": "specific metrics or improvements",
    "potential_applications": ["..."],
    "adoption_timeline": "...",
    "limitations": "..."
  }}
]"#
    )
}

pub fn industry_impact(digest: &str) -> String {
    format!(
        r#"Assess how today's AI developments impact different industries.

DATA:
{digest}

Consider these sectors: Healthcare & Biotech, Finance & Banking, Technology & Software,
Manufacturing & Robotics, Education & Research, Creative Industries, Legal & Compliance,
Retail & E-commerce. Include only the sectors that are actually affected.

Return ONLY a JSON object keyed by sector name in exactly this layout:
{{
  "Technology & Software": {{
    "direct_impact": "...",
    "opportunities": "...",
    "challenges": "...",
    "timeline": "..."
  }}
}}"#
    )
}

pub fn actionable_insights(digest: &str) -> String {
    format!(
        r#"Based on today's AI developments, provide ACTIONABLE INSIGHTS for different stakeholders.

DATA:
{digest}

Stakeholders: AI practitioners & developers, business leaders & executives,
researchers & academics, investors, general public.

Return ONLY a JSON object mapping each stakeholder to a list of specific action items:
{{
  "ai_practitioners": ["..."],
  "business_leaders": ["..."],
  "researchers": ["..."],
  "investors": ["..."],
  "general_public": ["..."]
}}"#
    )
}

pub fn future_predictions(digest: &str) -> String {
    format!(
        r#"Based on today's developments, predict FUTURE DIRECTIONS for AI.

DATA:
{digest}

Be specific with companies, technologies and timelines when possible.

Return ONLY a JSON object mapping each horizon to a list of predictions:
{{
  "next_week": ["..."],
  "next_month": ["..."],
  "next_quarter": ["..."],
  "wild_cards": ["..."]
}}"#
    )
}
