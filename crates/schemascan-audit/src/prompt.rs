//! Prompt construction for the analysis backend.

use serde_json::Value;

/// Fixed system instruction framing the model as a structured-data
/// compliance evaluator.
pub const SYSTEM_PROMPT: &str = "\
You are a Google Search Quality Evaluator. Your job is to detect \"Spammy Structured Data\": \
schema markup that technically validates but misrepresents the page to manipulate search \
ranking or appearance. You always return a single valid JSON object and nothing else.";

/// Summary used for the deterministic no-schema short circuit.
pub const NO_SCHEMA_SUMMARY: &str = "No schema markup found on this page.";

/// Build the user message embedding the extracted content and the policy
/// checks to apply.
///
/// `truncated` marks whether the visible text was cut to the configured
/// cap, so the model knows the sample is partial.
#[must_use]
pub fn build_user_prompt(json_ld: &[Value], visible_text: &str, truncated: bool) -> String {
    let schema = serde_json::to_string_pretty(json_ld)
        .unwrap_or_else(|_| format!("{json_ld:?}"));
    let truncation_note = if truncated { " ... (truncated)" } else { "" };

    format!(
        "Analyze the following page for spammy structured data violations.\n\
         \n\
         VISIBLE TEXT ON PAGE:\n\
         {visible_text}{truncation_note}\n\
         \n\
         SCHEMA FOUND (JSON-LD):\n\
         {schema}\n\
         \n\
         CHECKS TO APPLY:\n\
         1. HIDDEN CONTENT (High severity): values present in the schema but absent from the \
         visible text, such as rating counts, FAQ answers, or marketing copy.\n\
         2. IRRELEVANT TYPE (Medium severity): an entity type like 'Organization', \
         'LocalBusiness', or 'Product' applied to content that reads as an informational or \
         editorial page.\n\
         3. SELF-SERVING RATING (High severity): 'AggregateRating' or 'Review' attached to the \
         site's own 'Organization' or 'LocalBusiness' entity rather than a third-party subject.\n\
         4. MISMATCHED OFFER (High severity): a numeric price in the schema inconsistent with a \
         price mentioned in the visible text.\n\
         \n\
         Return a single JSON object with exactly this structure:\n\
         {{\n\
           \"status\": \"Pass\" or \"Fail\",\n\
           \"summary\": \"short summary of findings\",\n\
           \"violations\": [\n\
             {{ \"severity\": \"High\"|\"Medium\"|\"Low\", \"issue\": \"short title\", \
         \"description\": \"explanation\" }}\n\
           ]\n\
         }}"
    )
}
