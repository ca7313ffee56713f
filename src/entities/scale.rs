//! Score ranges and the human-readable bands derived from them.

use serde::Serialize;
use utoipa::ToSchema;

use super::WarningKind;

pub const RELIABILITY_MIN: f64 = 0.0;
pub const RELIABILITY_MAX: f64 = 100.0;
pub const BIAS_MIN: f64 = -5.0;
pub const BIAS_MAX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityBand {
    VeryReliable,
    Reliable,
    ModeratelyReliable,
    LowReliability,
    Unreliable,
}

impl ReliabilityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::VeryReliable
        } else if score >= 60.0 {
            Self::Reliable
        } else if score >= 40.0 {
            Self::ModeratelyReliable
        } else if score >= 20.0 {
            Self::LowReliability
        } else {
            Self::Unreliable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryReliable => "Very reliable",
            Self::Reliable => "Reliable",
            Self::ModeratelyReliable => "Moderately reliable",
            Self::LowReliability => "Low reliability",
            Self::Unreliable => "Unreliable",
        }
    }
}

/// Bands are symmetric around zero so a small positive score is never
/// reported as critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BiasBand {
    StronglyProEstablishment,
    ProEstablishment,
    Neutral,
    Critical,
    StronglyCritical,
}

impl BiasBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 3.0 {
            Self::StronglyProEstablishment
        } else if score >= 1.0 {
            Self::ProEstablishment
        } else if score > -1.0 {
            Self::Neutral
        } else if score > -3.0 {
            Self::Critical
        } else {
            Self::StronglyCritical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StronglyProEstablishment => "Strongly pro-establishment",
            Self::ProEstablishment => "Pro-establishment",
            Self::Neutral => "Neutral",
            Self::Critical => "Critical",
            Self::StronglyCritical => "Strongly critical",
        }
    }
}

pub fn clamp_reliability(score: f64) -> f64 {
    clamp_finite(score, RELIABILITY_MIN, RELIABILITY_MAX)
}

pub fn clamp_bias(score: f64) -> f64 {
    clamp_finite(score, BIAS_MIN, BIAS_MAX)
}

fn clamp_finite(score: f64, min: f64, max: f64) -> f64 {
    if score.is_nan() {
        return 0.0_f64.clamp(min, max);
    }
    score.clamp(min, max)
}

/// `+1.5`, `-2.0`, `0.0`
pub fn format_bias(score: f64) -> String {
    if score > 0.0 {
        format!("+{:.1}", score)
    } else if score < 0.0 {
        format!("{:.1}", score)
    } else {
        "0.0".to_string()
    }
}

pub fn warning_title(kind: &WarningKind) -> &'static str {
    match kind {
        WarningKind::ContentBlocked => "Source blocked",
        WarningKind::ArchivedContent => "Archived content",
        WarningKind::LimitedContent => "Limited content",
        WarningKind::Other(_) => "Warning",
    }
}
