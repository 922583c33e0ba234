use std::fmt;
use std::time::Duration;

use crate::apis::{RawAnalysis, RawPaper, RawWordCount, RawYear};

pub const UNTITLED_PAPER: &str = "Untitled Research Paper";
pub const DEFAULT_DATABASES: [&str; 3] = ["Crossref", "PubMed", "ArXiv"];
pub const ABSTRACT_PREVIEW_CHARS: usize = 200;

/// Display-ready outcome of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub similar_papers: Vec<PaperMatch>,
    pub words_processed: WordsProcessed,
    pub databases_checked: Vec<String>,
    pub analysis_time_secs: f64,
}

impl AnalysisResult {
    pub fn analysis_time_label(&self) -> String {
        format!("{:.2} seconds", self.analysis_time_secs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaperMatch {
    pub title: String,
    pub score: f64,
    pub authors: Option<Vec<String>>,
    pub journal: Option<String>,
    pub year: Option<String>,
    pub abstract_text: Option<String>,
    pub link: Option<String>,
    pub doi: Option<String>,
}

impl PaperMatch {
    /// First 200 characters of the abstract, always followed by `...`.
    pub fn abstract_preview(&self) -> Option<String> {
        self.abstract_text.as_ref().map(|text| {
            let head: String = text.chars().take(ABSTRACT_PREVIEW_CHARS).collect();
            format!("{}...", head)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WordsProcessed {
    Reported(String),
    NotAvailable,
}

impl fmt::Display for WordsProcessed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordsProcessed::Reported(words) => f.write_str(words),
            WordsProcessed::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl From<Option<RawWordCount>> for WordsProcessed {
    fn from(raw: Option<RawWordCount>) -> Self {
        match raw {
            Some(RawWordCount::Count(n)) if n.as_f64() != Some(0.0) => {
                WordsProcessed::Reported(n.to_string())
            }
            Some(RawWordCount::Text(text)) if !text.is_empty() => WordsProcessed::Reported(text),
            _ => WordsProcessed::NotAvailable,
        }
    }
}

fn display_year(raw: RawYear) -> Option<String> {
    match raw {
        RawYear::Number(n) => match n.as_i64() {
            Some(year) => Some(year.to_string()),
            None => n.as_f64().map(|year| year.to_string()),
        },
        RawYear::Text(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        RawYear::Other(_) => None,
    }
}

/// Turn the service response into the report the page shows.
///
/// Scores are passed through untouched, including values outside 0..=100.
pub fn map_response(raw: RawAnalysis, elapsed: Duration) -> AnalysisResult {
    AnalysisResult {
        overall_score: raw.overall_score,
        similar_papers: raw
            .similar_papers
            .unwrap_or_default()
            .into_iter()
            .map(map_paper)
            .collect(),
        words_processed: raw.words_processed.into(),
        databases_checked: raw
            .databases_checked
            .unwrap_or_else(|| DEFAULT_DATABASES.iter().map(|s| s.to_string()).collect()),
        analysis_time_secs: elapsed.as_secs_f64(),
    }
}

fn map_paper(raw: RawPaper) -> PaperMatch {
    PaperMatch {
        title: raw
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED_PAPER.to_string()),
        score: raw.score,
        authors: raw.authors,
        journal: raw.journal.filter(|j| !j.is_empty()),
        year: raw.year.and_then(display_year),
        abstract_text: raw.abstract_text.filter(|a| !a.is_empty()),
        link: raw.link.filter(|l| !l.is_empty()),
        doi: raw.doi.filter(|d| !d.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawAnalysis {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_response_gets_defaults() {
        let result = map_response(raw(json!({ "overall_score": 12.5 })), Duration::from_millis(1500));
        assert_eq!(result.overall_score, 12.5);
        assert!(result.similar_papers.is_empty());
        assert_eq!(result.words_processed, WordsProcessed::NotAvailable);
        assert_eq!(result.words_processed.to_string(), "N/A");
        assert_eq!(result.databases_checked, vec!["Crossref", "PubMed", "ArXiv"]);
        assert_eq!(result.analysis_time_label(), "1.50 seconds");
    }

    #[test]
    fn test_null_fields_get_defaults() {
        let result = map_response(
            raw(json!({
                "overall_score": 40,
                "similar_papers": null,
                "words_processed": null,
                "databases_checked": null
            })),
            Duration::ZERO,
        );
        assert!(result.similar_papers.is_empty());
        assert_eq!(result.words_processed, WordsProcessed::NotAvailable);
        assert_eq!(result.databases_checked.len(), 3);
        assert_eq!(result.analysis_time_label(), "0.00 seconds");
    }

    #[test]
    fn test_reported_metadata_is_kept() {
        let result = map_response(
            raw(json!({
                "overall_score": 71,
                "words_processed": 8421,
                "databases_checked": ["ArXiv", "CORE", "PMC"]
            })),
            Duration::from_millis(2346),
        );
        assert_eq!(result.words_processed.to_string(), "8421");
        assert_eq!(result.databases_checked, vec!["ArXiv", "CORE", "PMC"]);
        assert_eq!(result.analysis_time_label(), "2.35 seconds");

        let text = map_response(raw(json!({ "overall_score": 1, "words_processed": "about 9k" })), Duration::ZERO);
        assert_eq!(text.words_processed.to_string(), "about 9k");
    }

    #[test]
    fn test_empty_word_counts_are_not_available() {
        for words in [json!(0), json!(""), json!(0.0)] {
            let result = map_response(raw(json!({ "overall_score": 1, "words_processed": words })), Duration::ZERO);
            assert_eq!(result.words_processed, WordsProcessed::NotAvailable);
        }
    }

    #[test]
    fn test_empty_database_list_is_kept() {
        let result = map_response(raw(json!({ "overall_score": 1, "databases_checked": [] })), Duration::ZERO);
        assert!(result.databases_checked.is_empty());
    }

    #[test]
    fn test_out_of_range_score_is_trusted() {
        let result = map_response(
            raw(json!({ "overall_score": 137.2, "similar_papers": [{ "score": -4 }] })),
            Duration::ZERO,
        );
        assert_eq!(result.overall_score, 137.2);
        assert_eq!(result.similar_papers[0].score, -4.0);
    }

    #[test]
    fn test_paper_fields() {
        let result = map_response(
            raw(json!({
                "overall_score": 33,
                "similar_papers": [
                    {
                        "title": "Attention Is All You Need",
                        "score": 33,
                        "authors": ["Ashish Vaswani", "Noam Shazeer"],
                        "journal": "NeurIPS",
                        "year": 2017,
                        "abstract": "The dominant sequence transduction models are based on recurrent networks.",
                        "link": "http://arxiv.org/abs/1706.03762v7",
                        "doi": "10.48550/arXiv.1706.03762"
                    },
                    { "score": 12 },
                    { "title": "", "score": 3 }
                ]
            })),
            Duration::ZERO,
        );
        let papers = &result.similar_papers;
        assert_eq!(papers.len(), 3);
        assert_eq!(papers[0].title, "Attention Is All You Need");
        assert_eq!(papers[0].authors.as_ref().unwrap().len(), 2);
        assert_eq!(papers[0].year.as_deref(), Some("2017"));
        assert_eq!(papers[0].doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(papers[1].title, UNTITLED_PAPER);
        assert!(papers[1].authors.is_none());
        assert!(papers[1].abstract_preview().is_none());
        assert_eq!(papers[2].title, UNTITLED_PAPER);
    }

    #[test]
    fn test_year_forms_do_not_reject_the_report() {
        let result = map_response(
            raw(json!({
                "overall_score": 40,
                "similar_papers": [
                    { "title": "T", "score": 40, "year": 2017.0 },
                    { "score": 12, "year": "2019" },
                    { "score": 9, "year": 1998 },
                    { "score": 3, "year": { "published": 2001 } },
                    { "score": 2, "year": "" }
                ]
            })),
            Duration::ZERO,
        );
        let years: Vec<_> = result.similar_papers.iter().map(|p| p.year.as_deref()).collect();
        assert_eq!(years, vec![Some("2017"), Some("2019"), Some("1998"), None, None]);
        assert_eq!(result.similar_papers[0].title, "T");
    }

    #[test]
    fn test_short_abstract_still_gets_ellipsis() {
        let paper = map_paper(serde_json::from_value(json!({ "score": 1, "abstract": "Short." })).unwrap());
        assert_eq!(paper.abstract_preview().unwrap(), "Short....");
    }

    #[test]
    fn test_long_abstract_is_cut_at_200_chars() {
        let text = "é".repeat(250);
        let paper = map_paper(serde_json::from_value(json!({ "score": 1, "abstract": text })).unwrap());
        let preview = paper.abstract_preview().unwrap();
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.starts_with(&"é".repeat(200)));
        assert!(preview.ends_with("é..."));
    }

    #[test]
    fn test_missing_score_is_rejected() {
        assert!(serde_json::from_value::<RawAnalysis>(json!({ "similar_papers": [] })).is_err());
        assert!(serde_json::from_value::<RawAnalysis>(json!({ "overall_score": null })).is_err());
        assert!(serde_json::from_value::<RawAnalysis>(json!({
            "overall_score": 10,
            "similar_papers": [{ "title": "No score" }]
        }))
        .is_err());
    }
}
