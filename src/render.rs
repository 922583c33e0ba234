use chrono::NaiveDate;

use crate::document::SelectedFile;
use crate::report::{AnalysisResult, PaperMatch};
use crate::session::{Session, ViewState};
use crate::severity::classify;

const DISCLAIMER: &str = "This analysis is intended as a guide for academic writing improvement. \
Similarity scores should be interpreted in context, and proper citation practices must always be \
followed. Consult your institution's academic integrity policy for guidance.";

/// Render the page for the current session as markdown.
pub fn render(session: &Session, today: NaiveDate) -> String {
    let mut out = String::new();
    let state = session.state();

    out.push_str("# Academic Integrity Analyzer\n");
    out.push_str("Research Document Similarity Assessment\n\n");
    upload_panel(&mut out, session);

    match state {
        ViewState::Idle | ViewState::FileSelected { .. } => {}
        ViewState::Loading { .. } => {
            out.push_str("\n## Academic Analysis in Progress\n");
            out.push_str("Comparing against 85M+ research papers and academic databases...\n");
        }
        ViewState::Error { message, .. } => {
            out.push_str("\n## Analysis Error\n");
            out.push_str(&format!("{}\n", message));
        }
        ViewState::Results { file, result } => report(&mut out, file, result, today),
    }
    out
}

fn upload_panel(out: &mut String, session: &Session) {
    let state = session.state();
    let loading = session.is_loading();

    out.push_str("## Select Research Document\n");
    out.push_str("Supports PDF, DOC, DOCX (Max 20MB)\n");
    if let Some(name) = &session.picker().value {
        out.push_str(&format!("\n**Selected:** {}\n", name));
    }

    let mut actions = Vec::new();
    if loading {
        actions.push("Analyzing Document...");
    } else {
        actions.push("`select_document`: Browse Files");
        if state.file().is_some() {
            actions.push("`analyze_document`: Begin Analysis");
            actions.push("`reset_analysis`: New Analysis");
        }
    }
    out.push('\n');
    for action in actions {
        out.push_str(&format!("- {}\n", action));
    }
}

fn report(out: &mut String, file: &SelectedFile, result: &AnalysisResult, today: NaiveDate) {
    let overall = classify(result.overall_score);

    out.push_str("\n## Similarity Analysis Report\n");
    out.push_str(&format!("Generated: {} | Document: {}\n\n", today.format("%Y-%m-%d"), file.name));
    out.push_str(&format!("### Overall Similarity Score: {}%\n", result.overall_score));
    out.push_str(&format!("**{} - {}**\n\n", overall.level.as_str(), overall.description));
    out.push_str(
        "This score represents the percentage of text with similarities to existing academic works.\n\n",
    );

    out.push_str("| Words Processed | Databases Checked | Analysis Time |\n");
    out.push_str("|---|---|---|\n");
    out.push_str(&format!(
        "| {} | {} | {} |\n",
        result.words_processed,
        result.databases_checked.join(", "),
        result.analysis_time_label()
    ));

    if result.similar_papers.is_empty() {
        out.push_str("\n### No Significant Similarities Found\n");
        out.push_str("Your document shows minimal similarity to existing academic works.\n");
    } else {
        out.push_str("\n### Similar Academic Works\n");
        out.push_str("Top matching research papers and publications\n");
        for (index, paper) in result.similar_papers.iter().enumerate() {
            paper_card(out, index + 1, paper);
        }
    }

    out.push_str("\n### Academic Integrity Notice\n");
    out.push_str(DISCLAIMER);
    out.push('\n');
}

fn paper_card(out: &mut String, rank: usize, paper: &PaperMatch) {
    let severity = classify(paper.score);
    out.push_str(&format!("\n#### #{} {}\n", rank, paper.title));
    out.push_str(&format!("{}% Similar ({})\n", paper.score, severity.level.as_str()));

    if let Some(authors) = &paper.authors {
        out.push_str(&format!("Authors: {}\n", authors.join(", ")));
    }
    if let Some(journal) = &paper.journal {
        match &paper.year {
            Some(year) => out.push_str(&format!("*{}* ({})\n", journal, year)),
            None => out.push_str(&format!("*{}*\n", journal)),
        }
    }
    if let Some(preview) = paper.abstract_preview() {
        out.push_str(&format!("> {}\n", preview));
    }
    if let Some(link) = &paper.link {
        out.push_str(&format!("[View Source]({})\n", link));
    }
    if let Some(doi) = &paper.doi {
        out.push_str(&format!("DOI: {}\n", doi));
    }
}
