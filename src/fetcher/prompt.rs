use serde_json::{json, Value};

use crate::models::{EVENING_PRAYER_CLOSING, MORNING_PRAYER_CLOSING};

const REQUIRED_FIELDS: [&str; 9] = [
    "passageReference",
    "scriptureText",
    "reflection",
    "morningPrayer",
    "eveningPrayer",
    "quote",
    "quoteAuthor",
    "relatedVerseReference",
    "relatedVerseText",
];

/// Prompt asking for one day's devotional.
pub fn build_prompt(descriptor: &str) -> String {
    format!(
        "Create a Christian daily devotional for {descriptor}.\n\
         Choose a Bible passage suited to the day and provide:\n\
         - passageReference: the passage reference (e.g. \"Psalm 23:1-6\")\n\
         - scriptureText: the passage text\n\
         - reflection: a warm reflection of three to four paragraphs applying the passage\n\
         - morningPrayer: a morning prayer that ends with exactly: \"{MORNING_PRAYER_CLOSING}\"\n\
         - eveningPrayer: an evening prayer that ends with exactly: \"{EVENING_PRAYER_CLOSING}\"\n\
         - quote and quoteAuthor: an encouraging quote from a Christian author\n\
         - relatedVerseReference and relatedVerseText: one related verse from elsewhere in Scripture\n\
         Respond with JSON only."
    )
}

/// Structured-output schema: an object with nine required strings.
pub fn response_schema() -> Value {
    let properties: serde_json::Map<String, Value> = REQUIRED_FIELDS
        .iter()
        .map(|name| (name.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": REQUIRED_FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_date_and_closings() {
        let prompt = build_prompt("Thursday, January 1, 2026");
        assert!(prompt.contains("Thursday, January 1, 2026"));
        assert!(prompt.contains(MORNING_PRAYER_CLOSING));
        assert!(prompt.contains(EVENING_PRAYER_CLOSING));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required.len(), 9);
        for field in REQUIRED_FIELDS {
            assert!(required.contains(&field));
            assert_eq!(schema["properties"][field]["type"], "STRING");
        }
    }
}
