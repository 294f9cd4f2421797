//! Instant Suggestions
//!
//! Pure, network-free completions computed on every keystroke from a medical
//! vocabulary, fixed completion templates and recent search history.

use std::collections::HashSet;

use serde::Serialize;

/// Upper bound on the number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 8;

const MAX_TERM_MATCHES: usize = 3;
const MAX_COMPLETIONS: usize = 2;
const COMPLETION_TEMPLATES: [&str; 4] = ["treatment", "symptoms", "diagnosis", "medication"];

/// Default vocabulary matched against the query.
pub const MEDICAL_TERMS: &[&str] = &[
    "hypertension",
    "hyperlipidemia",
    "hyperthyroidism",
    "hypothyroidism",
    "hypoglycemia",
    "diabetes mellitus",
    "diabetic neuropathy",
    "diabetic retinopathy",
    "myocardial infarction",
    "atrial fibrillation",
    "heart failure",
    "coronary artery disease",
    "asthma",
    "chronic obstructive pulmonary disease",
    "pneumonia",
    "tuberculosis",
    "influenza",
    "sepsis",
    "stroke",
    "epilepsy",
    "migraine",
    "multiple sclerosis",
    "parkinson's disease",
    "alzheimer's disease",
    "depression",
    "anxiety disorder",
    "schizophrenia",
    "rheumatoid arthritis",
    "osteoarthritis",
    "osteoporosis",
    "chronic kidney disease",
    "hepatitis",
    "cirrhosis",
    "anemia",
    "leukemia",
    "lymphoma",
    "breast cancer",
    "lung cancer",
    "prostate cancer",
    "colorectal cancer",
];

// == Suggestion Kind ==
/// Where a suggestion came from. Each kind carries a fixed confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    MedicalTerm,
    Completion,
    History,
}

impl SuggestionKind {
    pub fn confidence(self) -> f64 {
        match self {
            SuggestionKind::MedicalTerm => 0.9,
            SuggestionKind::History => 0.8,
            SuggestionKind::Completion => 0.7,
        }
    }
}

// == Suggestion ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub confidence: f64,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, kind: SuggestionKind) -> Self {
        Self {
            text: text.into(),
            kind,
            confidence: kind.confidence(),
        }
    }
}

/// Returns the default vocabulary as owned strings.
pub fn default_vocabulary() -> Vec<String> {
    MEDICAL_TERMS.iter().map(|t| t.to_string()).collect()
}

// == Suggest ==
/// Builds ranked suggestions for `query`.
///
/// Groups are emitted in order: vocabulary matches, completion templates,
/// then history matches (`recent_queries` is expected newest first). Entries
/// are deduplicated by case-insensitive text and the list is capped at
/// [`MAX_SUGGESTIONS`].
pub fn suggest<'a, S, I>(query: &str, vocabulary: &[S], recent_queries: I) -> Vec<Suggestion>
where
    S: AsRef<str>,
    I: IntoIterator<Item = &'a str>,
{
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let needle = trimmed.to_lowercase();

    let terms = vocabulary
        .iter()
        .map(|term| term.as_ref())
        .filter(|term| term.to_lowercase().contains(&needle))
        .take(MAX_TERM_MATCHES)
        .map(|term| Suggestion::new(term, SuggestionKind::MedicalTerm));

    let completions = COMPLETION_TEMPLATES
        .iter()
        .filter(|_| trimmed.chars().count() > 2)
        .take(MAX_COMPLETIONS)
        .map(|suffix| Suggestion::new(format!("{} {}", trimmed, suffix), SuggestionKind::Completion));

    let history = recent_queries
        .into_iter()
        .filter(|past| past.to_lowercase().contains(&needle))
        .map(|past| Suggestion::new(past, SuggestionKind::History));

    let mut seen = HashSet::new();
    terms
        .chain(completions)
        .chain(history)
        .filter(|s| seen.insert(s.text.to_lowercase()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_history() -> Vec<&'static str> {
        Vec::new()
    }

    #[test]
    fn test_blank_query_yields_nothing() {
        assert!(suggest("", MEDICAL_TERMS, no_history()).is_empty());
        assert!(suggest("   ", MEDICAL_TERMS, vec!["asthma"]).is_empty());
    }

    #[test]
    fn test_medical_term_match() {
        let suggestions = suggest("hyper", &["hypertension", "asthma"], no_history());

        let term = suggestions
            .iter()
            .find(|s| s.text.contains("hypertension"))
            .unwrap();
        assert_eq!(term.kind, SuggestionKind::MedicalTerm);
        assert_eq!(term.confidence, 0.9);
    }

    #[test]
    fn test_term_matches_capped_and_ordered() {
        let suggestions = suggest("HYPER", MEDICAL_TERMS, no_history());
        let terms: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::MedicalTerm)
            .map(|s| s.text.as_str())
            .collect();

        assert_eq!(terms, vec!["hypertension", "hyperlipidemia", "hyperthyroidism"]);
    }

    #[test]
    fn test_completions_need_more_than_two_chars() {
        let short = suggest("ab", MEDICAL_TERMS, no_history());
        assert!(short.iter().all(|s| s.kind != SuggestionKind::Completion));

        let long = suggest("fever", MEDICAL_TERMS, no_history());
        let completions: Vec<&str> = long
            .iter()
            .filter(|s| s.kind == SuggestionKind::Completion)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(completions, vec!["fever treatment", "fever symptoms"]);
        assert!(long
            .iter()
            .filter(|s| s.kind == SuggestionKind::Completion)
            .all(|s| s.confidence == 0.7));
    }

    #[test]
    fn test_history_matches_most_recent_first() {
        let history = vec!["Asthma in children", "copd", "asthma triggers"];
        let suggestions = suggest("asthma", &[] as &[&str], history);

        let past: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::History)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(past, vec!["Asthma in children", "asthma triggers"]);
        assert!(suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::History)
            .all(|s| s.confidence == 0.8));
    }

    #[test]
    fn test_group_order() {
        let suggestions = suggest("asthma", MEDICAL_TERMS, vec!["asthma inhaler"]);
        let kinds: Vec<SuggestionKind> = suggestions.iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                SuggestionKind::MedicalTerm,
                SuggestionKind::Completion,
                SuggestionKind::Completion,
                SuggestionKind::History,
            ]
        );
    }

    #[test]
    fn test_capped_regardless_of_history_size() {
        let history: Vec<String> = (0..100).map(|i| format!("diabetes study {}", i)).collect();
        let suggestions = suggest("diabetes", MEDICAL_TERMS, history.iter().map(String::as_str));

        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_deduplicates_by_text() {
        let suggestions = suggest("asthma", MEDICAL_TERMS, vec!["Asthma", "asthma", "asthma treatment"]);
        let mut texts: Vec<String> = suggestions.iter().map(|s| s.text.to_lowercase()).collect();
        let before = texts.len();
        texts.sort();
        texts.dedup();

        assert_eq!(texts.len(), before);
        assert_eq!(suggestions[0].kind, SuggestionKind::MedicalTerm);
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_string(&Suggestion::new("asthma", SuggestionKind::MedicalTerm)).unwrap();
        assert!(json.contains("\"type\":\"medical_term\""));
    }
}
