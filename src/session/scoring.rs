//! Score normalization and admission tiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper end of the normalized scale
pub const SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionTier {
    Vellore,
    Chennai,
    Amravati,
    NotAdmitted,
}

impl AdmissionTier {
    /// Strictly-greater thresholds, highest first
    const THRESHOLDS: [(f64, AdmissionTier); 3] = [
        (9.5, AdmissionTier::Vellore),
        (7.5, AdmissionTier::Chennai),
        (6.5, AdmissionTier::Amravati),
    ];

    pub fn for_score(normalized: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| normalized > *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(AdmissionTier::NotAdmitted)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdmissionTier::Vellore => "Vellore Campus",
            AdmissionTier::Chennai => "Chennai Campus",
            AdmissionTier::Amravati => "Amravati Campus",
            AdmissionTier::NotAdmitted => "Not admitted",
        }
    }
}

impl fmt::Display for AdmissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scale `score` out of `total` to 0..=10, rounded to two decimals.
///
/// A quiz worth nothing normalizes to 0.
pub fn normalize(score: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let scaled = score / total * SCALE;
    (scaled * 100.0).round() / 100.0
}

/// Final result of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub accumulated_score: f64,
    pub total_possible_marks: f64,
    pub normalized_score: f64,
    pub tier: AdmissionTier,
}

impl QuizOutcome {
    pub fn from_scores(accumulated_score: f64, total_possible_marks: f64) -> Self {
        let normalized_score = normalize(accumulated_score, total_possible_marks);
        Self {
            accumulated_score,
            total_possible_marks,
            normalized_score,
            tier: AdmissionTier::for_score(normalized_score),
        }
    }

    pub fn score_line(&self) -> String {
        format!("Your Score: {:.2} out of 10", self.normalized_score)
    }

    pub fn admission_line(&self) -> String {
        format!("Admission Status: {}", self.tier)
    }
}
