use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::date_key::DateKey;

/// Closing sentence every morning prayer ends with.
pub const MORNING_PRAYER_CLOSING: &str = "Not my will, but Yours be done in my life and in the lives of every member of my family. In Jesus' name, Amen.";

/// Closing sentence every evening prayer ends with.
pub const EVENING_PRAYER_CLOSING: &str =
    "Let Your perfect will be done in my life and in my family. In Jesus' name, Amen.";

/// Devotional record as returned by the content generator.
///
/// Field names match the JSON schema handed to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDevotional {
    pub passage_reference: String,
    pub scripture_text: String,
    pub reflection: String,
    pub morning_prayer: String,
    pub evening_prayer: String,
    pub quote: String,
    pub quote_author: String,
    pub related_verse_reference: String,
    pub related_verse_text: String,
}

impl GeneratedDevotional {
    /// Names of required fields that are blank.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("passageReference", &self.passage_reference),
            ("scriptureText", &self.scripture_text),
            ("reflection", &self.reflection),
            ("morningPrayer", &self.morning_prayer),
            ("eveningPrayer", &self.evening_prayer),
            ("quote", &self.quote),
            ("quoteAuthor", &self.quote_author),
            ("relatedVerseReference", &self.related_verse_reference),
            ("relatedVerseText", &self.related_verse_text),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Appends the fixed closing sentences to prayers that lack them.
    pub fn with_prayer_closings(mut self) -> Self {
        self.morning_prayer = ensure_closing(&self.morning_prayer, MORNING_PRAYER_CLOSING);
        self.evening_prayer = ensure_closing(&self.evening_prayer, EVENING_PRAYER_CLOSING);
        self
    }

    pub fn into_content(self, date: DateKey) -> DevotionalContent {
        DevotionalContent {
            date,
            passage_reference: self.passage_reference,
            scripture_text: self.scripture_text,
            reflection: self.reflection,
            morning_prayer: self.morning_prayer,
            evening_prayer: self.evening_prayer,
            quote: self.quote,
            quote_author: self.quote_author,
            related_verse_reference: self.related_verse_reference,
            related_verse_text: self.related_verse_text,
            passage_text_override: None,
            related_verse_text_override: None,
        }
    }
}

fn ensure_closing(prayer: &str, closing: &str) -> String {
    let trimmed = prayer.trim_end();
    if trimmed.ends_with(closing) {
        trimmed.to_string()
    } else {
        format!("{} {}", trimmed, closing)
    }
}

/// One day's reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevotionalContent {
    pub date: DateKey,
    pub passage_reference: String,
    pub scripture_text: String,
    pub reflection: String,
    pub morning_prayer: String,
    pub evening_prayer: String,
    pub quote: String,
    pub quote_author: String,
    pub related_verse_reference: String,
    pub related_verse_text: String,
    /// User-edited passage text, shown instead of `scripture_text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage_text_override: Option<String>,
    /// User-edited related verse, shown instead of `related_verse_text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_verse_text_override: Option<String>,
}

impl DevotionalContent {
    pub fn effective_passage_text(&self) -> &str {
        self.passage_text_override
            .as_deref()
            .unwrap_or(&self.scripture_text)
    }

    pub fn effective_related_verse_text(&self) -> &str {
        self.related_verse_text_override
            .as_deref()
            .unwrap_or(&self.related_verse_text)
    }
}

impl fmt::Display for DevotionalContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.date.descriptor())?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "{}", self.passage_reference)?;
        writeln!(f, "{}", self.effective_passage_text())?;
        writeln!(f, "\nReflection:\n{}", self.reflection)?;
        writeln!(f, "\nMorning prayer:\n{}", self.morning_prayer)?;
        writeln!(f, "\nEvening prayer:\n{}", self.evening_prayer)?;
        writeln!(f, "\n\"{}\" - {}", self.quote, self.quote_author)?;
        writeln!(
            f,
            "\n{}: {}",
            self.related_verse_reference,
            self.effective_related_verse_text()
        )?;
        Ok(())
    }
}

/// Fields a user may edit on a cached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevotionalField {
    PassageText,
    RelatedVerseText,
    Reflection,
    MorningPrayer,
    EveningPrayer,
    Quote,
}

impl fmt::Display for DevotionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevotionalField::PassageText => write!(f, "passage"),
            DevotionalField::RelatedVerseText => write!(f, "verse"),
            DevotionalField::Reflection => write!(f, "reflection"),
            DevotionalField::MorningPrayer => write!(f, "morning"),
            DevotionalField::EveningPrayer => write!(f, "evening"),
            DevotionalField::Quote => write!(f, "quote"),
        }
    }
}

impl FromStr for DevotionalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passage" => Ok(DevotionalField::PassageText),
            "verse" => Ok(DevotionalField::RelatedVerseText),
            "reflection" => Ok(DevotionalField::Reflection),
            "morning" => Ok(DevotionalField::MorningPrayer),
            "evening" => Ok(DevotionalField::EveningPrayer),
            "quote" => Ok(DevotionalField::Quote),
            _ => Err(format!(
                "Invalid field '{}'. Valid options: passage, verse, reflection, morning, evening, quote",
                s
            )),
        }
    }
}

/// A set of whole-field replacements for a cached record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevotionalPatch {
    pub passage_text: Option<String>,
    pub related_verse_text: Option<String>,
    pub reflection: Option<String>,
    pub morning_prayer: Option<String>,
    pub evening_prayer: Option<String>,
    pub quote: Option<String>,
}

impl DevotionalPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch replacing exactly one field.
    pub fn field(field: DevotionalField, value: impl Into<String>) -> Self {
        Self::new().with(field, value)
    }

    pub fn with(mut self, field: DevotionalField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            DevotionalField::PassageText => self.passage_text = value,
            DevotionalField::RelatedVerseText => self.related_verse_text = value,
            DevotionalField::Reflection => self.reflection = value,
            DevotionalField::MorningPrayer => self.morning_prayer = value,
            DevotionalField::EveningPrayer => self.evening_prayer = value,
            DevotionalField::Quote => self.quote = value,
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replaces each present field; absent fields are left untouched.
    pub fn apply(&self, content: &mut DevotionalContent) {
        if let Some(text) = &self.passage_text {
            content.passage_text_override = Some(text.clone());
        }
        if let Some(text) = &self.related_verse_text {
            content.related_verse_text_override = Some(text.clone());
        }
        if let Some(text) = &self.reflection {
            content.reflection = text.clone();
        }
        if let Some(text) = &self.morning_prayer {
            content.morning_prayer = text.clone();
        }
        if let Some(text) = &self.evening_prayer {
            content.evening_prayer = text.clone();
        }
        if let Some(text) = &self.quote {
            content.quote = text.clone();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_json_uses_camel_case() {
        let json = serde_json::to_value(fixtures::generated("a")).unwrap();
        assert!(json.get("passageReference").is_some());
        assert!(json.get("quoteAuthor").is_some());
        assert!(json.get("relatedVerseText").is_some());
    }

    #[test]
    fn test_generated_missing_field_fails_to_parse() {
        let json = r#"{"passageReference": "Psalm 1", "reflection": "x"}"#;
        assert!(serde_json::from_str::<GeneratedDevotional>(json).is_err());
    }

    #[test]
    fn test_blank_fields() {
        let mut generated = fixtures::generated("a");
        assert!(generated.blank_fields().is_empty());

        generated.quote = "   ".to_string();
        generated.reflection = String::new();
        assert_eq!(generated.blank_fields(), vec!["reflection", "quote"]);
    }

    #[test]
    fn test_prayer_closings_appended_when_missing() {
        let mut generated = fixtures::generated("a");
        generated.morning_prayer = "Lord, be near.".to_string();
        generated.evening_prayer = "Keep us tonight.  ".to_string();

        let fixed = generated.with_prayer_closings();
        assert_eq!(
            fixed.morning_prayer,
            format!("Lord, be near. {}", MORNING_PRAYER_CLOSING)
        );
        assert!(fixed.evening_prayer.ends_with(EVENING_PRAYER_CLOSING));
        assert!(fixed.evening_prayer.starts_with("Keep us tonight. "));
    }

    #[test]
    fn test_prayer_closings_not_duplicated() {
        let generated = fixtures::generated("a");
        let fixed = generated.clone().with_prayer_closings();
        assert_eq!(fixed.morning_prayer, generated.morning_prayer);
        assert_eq!(fixed.evening_prayer, generated.evening_prayer);
    }

    #[test]
    fn test_effective_text_prefers_override() {
        let mut content = fixtures::content("2026-01-01", "a");
        assert_eq!(content.effective_passage_text(), content.scripture_text);

        content.passage_text_override = Some("edited".to_string());
        assert_eq!(content.effective_passage_text(), "edited");
        assert_eq!(
            content.effective_related_verse_text(),
            "I am the good shepherd."
        );
    }

    #[test]
    fn test_patch_changes_only_named_field() {
        let original = fixtures::content("2026-01-01", "a");
        let mut content = original.clone();

        DevotionalPatch::field(DevotionalField::Reflection, "New reflection").apply(&mut content);

        assert_eq!(content.reflection, "New reflection");
        let mut expected = original;
        expected.reflection = "New reflection".to_string();
        assert_eq!(content, expected);
    }

    #[test]
    fn test_patch_passage_sets_override_only() {
        let mut content = fixtures::content("2026-01-01", "a");
        DevotionalPatch::field(DevotionalField::PassageText, "My own words").apply(&mut content);

        assert_eq!(content.passage_text_override.as_deref(), Some("My own words"));
        assert_eq!(content.scripture_text, "The Lord is my shepherd; I shall not want.");
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let original = fixtures::content("2026-01-01", "a");
        let mut content = original.clone();
        let patch = DevotionalPatch::new();

        assert!(patch.is_empty());
        patch.apply(&mut content);
        assert_eq!(content, original);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!(
            DevotionalField::from_str("Passage").unwrap(),
            DevotionalField::PassageText
        );
        assert_eq!(
            DevotionalField::from_str("verse").unwrap(),
            DevotionalField::RelatedVerseText
        );
        assert!(DevotionalField::from_str("title").is_err());
    }

    #[test]
    fn test_content_display() {
        let content = fixtures::content("2026-01-01", "a");
        let output = format!("{}", content);
        assert!(output.contains("Thursday, January 1, 2026"));
        assert!(output.contains("Psalm 23 (a)"));
        assert!(output.contains("Martin Luther King Jr."));
    }
}
