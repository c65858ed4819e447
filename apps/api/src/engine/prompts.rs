// LLM prompt constants for the AI-augmented recommendation path.

/// System prompt — enforces JSON-array-only output.
pub const RECOMMEND_SYSTEM: &str = "You are a pragmatic job-search coach. \
    Given a scored record and its factor breakdown, write short, specific, \
    actionable advice. \
    You MUST respond with a valid JSON array of strings and nothing else. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies. \
    Each string must be one sentence of advice grounded in the factor \
    evidence provided.";

/// Recommendation prompt template. Replace `{rubric}`, `{record_id}`,
/// `{attributes}`, `{composite}`, `{tier}`, `{factor_evidence}`,
/// `{max_items}`, and `{fallback}` before sending.
pub const RECOMMEND_PROMPT_TEMPLATE: &str = r#"Scoring context: {rubric}

Record: {record_id}
Attributes:
{attributes}

Composite score: {composite}/100 (tier: {tier})

Factor evidence (name | raw value | normalized 0-100 | weight):
{factor_evidence}

Baseline rule-based advice, for reference:
{fallback}

Write at most {max_items} pieces of advice as a JSON array of strings.
Every piece of advice must cite concrete evidence from the factors above
(e.g. name the factor and its value). Do not invent numbers that are not
in the evidence."#;
