use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    Low,
    Moderate,
    High,
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Moderate => "Moderate",
            Level::High => "High",
            Level::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Severity {
    pub level: Level,
    pub color: &'static str,
    pub description: &'static str,
}

/// Map a similarity percentage onto its severity band.
///
/// Scores are not validated: negative values land in `Low`, anything above
/// 100 in `Critical`.
pub fn classify(score: f64) -> Severity {
    if score <= 15.0 {
        Severity { level: Level::Low, color: "#10b981", description: "Original work" }
    } else if score <= 30.0 {
        Severity { level: Level::Moderate, color: "#f59e0b", description: "Minor similarities detected" }
    } else if score <= 50.0 {
        Severity { level: Level::High, color: "#ef4444", description: "Significant similarities" }
    } else {
        Severity {
            level: Level::Critical,
            color: "#dc2626",
            description: "Potential academic integrity issue",
        }
    }
}
