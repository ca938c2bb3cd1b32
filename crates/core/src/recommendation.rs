//! Keyword-based care recommendations.
//!
//! Clinical notes are lowercased and scanned for the keywords in [`RECOMMENDATION_TABLE`]. The
//! first keyword (in table order) that appears anywhere in the notes wins, so notes mentioning
//! both "fever" and "infection" get the fever advice. Matching is plain substring containment:
//! "scold" matches "cold".
//!
//! Recommendations are derived at display time and never stored.

use crate::constants::{NO_MATCH_RECOMMENDATION, NO_NOTES_RECOMMENDATION};
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered `(keyword, advice)` pairs. Order decides which advice wins when several keywords match.
pub const RECOMMENDATION_TABLE: &[(&str, &str)] = &[
    ("cold", "Prescribe antihistamines and rest."),
    ("fever", "Give paracetamol and monitor temperature."),
    ("fracture", "Immobilize limb and send for X-ray."),
    ("bleeding", "Apply pressure dressing and evaluate for transfusion."),
    ("infection", "Start IV antibiotics immediately."),
    ("asthma", "Use nebulizer bronchodilator and monitor breathing."),
    ("heart attack", "Administer aspirin and prepare ECG & oxygen."),
    ("burn", "Cool area with saline and apply sterile burn dressing."),
    ("stroke", "Immediate CT scan and stroke protocol activation."),
    ("covid", "Isolate patient, oxygen support, antiviral therapy."),
];

/// Outcome of looking up advice for a set of notes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recommendation {
    /// A keyword matched.
    Advice {
        keyword: &'static str,
        advice: &'static str,
    },
    /// Notes were absent or empty.
    NoNotes,
    /// Notes were present but contained no known keyword.
    NoMatch,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Advice { advice, .. } => *advice,
            Recommendation::NoNotes => NO_NOTES_RECOMMENDATION,
            Recommendation::NoMatch => NO_MATCH_RECOMMENDATION,
        }
    }

    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Recommendation::Advice { keyword, .. } => Some(*keyword),
            _ => None,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Recommendation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Looks up care advice for free-text clinical notes.
pub fn recommend(notes: Option<&str>) -> Recommendation {
    let notes = match notes {
        Some(n) if !n.is_empty() => n.to_lowercase(),
        _ => return Recommendation::NoNotes,
    };

    RECOMMENDATION_TABLE
        .iter()
        .find(|(keyword, _)| notes.contains(keyword))
        .map(|&(keyword, advice)| Recommendation::Advice { keyword, advice })
        .unwrap_or(Recommendation::NoMatch)
}
