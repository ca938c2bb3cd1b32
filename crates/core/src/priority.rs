//! Triage priority classification.
//!
//! Maps four vital-sign readings onto a [`PriorityTier`]. The mapping is a fixed, deterministic
//! rule set:
//!
//! 1. A reading of zero heart rate, zero blood pressure and zero oxygen saturation is
//!    [`PriorityTier::Deceased`], whatever the temperature.
//! 2. Otherwise each vital sign contributes a sub-score and the total is bucketed:
//!
//! | Total   | Tier       |
//! |---------|------------|
//! | >= 9    | Critical   |
//! | 6 ..= 8 | High       |
//! | 4 ..= 5 | Medium     |
//! | 3       | Low        |
//!
//! Inputs are not range-checked. Zero, negative and implausibly large readings are scored like
//! any other value, so [`classify`] is total over its argument types.

use crate::{PatientError, PatientResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity tier assigned to a patient.
///
/// Variants are declared in worklist order, so the derived `Ord` sorts `Deceased` first and
/// `Low` last. The serialised and displayed forms are the exact variant names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    Deceased,
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// All tiers in worklist order.
    pub const ALL: [PriorityTier; 5] = [
        PriorityTier::Deceased,
        PriorityTier::Critical,
        PriorityTier::High,
        PriorityTier::Medium,
        PriorityTier::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityTier::Deceased => "Deceased",
            PriorityTier::Critical => "Critical",
            PriorityTier::High => "High",
            PriorityTier::Medium => "Medium",
            PriorityTier::Low => "Low",
        }
    }

    /// Maps a non-deceased severity score onto a tier.
    pub fn from_score(score: u8) -> Self {
        match score {
            9.. => PriorityTier::Critical,
            6..=8 => PriorityTier::High,
            4..=5 => PriorityTier::Medium,
            _ => PriorityTier::Low,
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityTier {
    type Err = PatientError;

    fn from_str(s: &str) -> PatientResult<Self> {
        PriorityTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| PatientError::InvalidInput(format!("unknown priority tier '{s}'")))
    }
}

/// One set of vital-sign readings.
///
/// Blood pressure is the systolic value in mmHg, oxygen saturation a percentage and temperature
/// in degrees Celsius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub heart_rate: i32,
    pub blood_pressure: i32,
    pub oxygen_saturation: i32,
    pub temperature: f64,
}

impl VitalSigns {
    pub fn new(
        heart_rate: i32,
        blood_pressure: i32,
        oxygen_saturation: i32,
        temperature: f64,
    ) -> Self {
        Self {
            heart_rate,
            blood_pressure,
            oxygen_saturation,
            temperature,
        }
    }

    /// True when heart rate, blood pressure and oxygen saturation are all exactly zero.
    pub fn is_deceased(&self) -> bool {
        self.heart_rate == 0 && self.blood_pressure == 0 && self.oxygen_saturation == 0
    }

    /// Summed sub-scores, or `None` when the readings match the deceased pattern.
    pub fn severity_score(&self) -> Option<u8> {
        if self.is_deceased() {
            return None;
        }

        Some(
            heart_rate_score(self.heart_rate)
                + blood_pressure_score(self.blood_pressure)
                + oxygen_saturation_score(self.oxygen_saturation)
                + temperature_score(self.temperature),
        )
    }

    pub fn priority(&self) -> PriorityTier {
        match self.severity_score() {
            None => PriorityTier::Deceased,
            Some(score) => PriorityTier::from_score(score),
        }
    }
}

/// Classifies a set of readings into a priority tier.
pub fn classify(
    heart_rate: i32,
    blood_pressure: i32,
    oxygen_saturation: i32,
    temperature: f64,
) -> PriorityTier {
    let vitals = VitalSigns::new(heart_rate, blood_pressure, oxygen_saturation, temperature);
    let tier = vitals.priority();
    tracing::debug!(
        heart_rate,
        blood_pressure,
        oxygen_saturation,
        temperature,
        score = ?vitals.severity_score(),
        %tier,
        "classified vital signs"
    );
    tier
}

/// Heart rate: outside 40..=130 scores 3, the 40..=60 and 110..=130 bands score 2,
/// 61..=109 scores 1.
pub fn heart_rate_score(heart_rate: i32) -> u8 {
    if !(40..=130).contains(&heart_rate) {
        3
    } else if (40..=60).contains(&heart_rate) || (110..=130).contains(&heart_rate) {
        2
    } else {
        1
    }
}

/// Blood pressure: below 90 or above 180 scores 3, anything else 1.
pub fn blood_pressure_score(blood_pressure: i32) -> u8 {
    if !(90..=180).contains(&blood_pressure) {
        3
    } else {
        1
    }
}

/// Oxygen saturation: below 90 scores 3, 90..=95 scores 2, above 95 scores 1.
pub fn oxygen_saturation_score(oxygen_saturation: i32) -> u8 {
    match oxygen_saturation {
        i32::MIN..=89 => 3,
        90..=95 => 2,
        _ => 1,
    }
}

/// Temperature: above 39 or below 35 scores 2, anything else (including NaN) 0.
pub fn temperature_score(temperature: f64) -> u8 {
    if temperature > 39.0 || temperature < 35.0 {
        2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_readings_are_deceased_for_any_temperature() {
        for temperature in [-10.0, 0.0, 36.6, 42.0, f64::NAN, f64::INFINITY] {
            assert_eq!(classify(0, 0, 0, temperature), PriorityTier::Deceased);
        }
    }

    #[test]
    fn single_nonzero_reading_is_never_deceased() {
        assert_ne!(classify(1, 0, 0, 37.0), PriorityTier::Deceased);
        assert_ne!(classify(0, 1, 0, 37.0), PriorityTier::Deceased);
        assert_ne!(classify(0, 0, 1, 37.0), PriorityTier::Deceased);
        assert_ne!(classify(-1, 0, 0, 37.0), PriorityTier::Deceased);
    }

    #[test]
    fn zero_heart_rate_with_pressure_falls_through_to_scoring() {
        // hr 0 -> 3, bp 120 -> 1, oxygen 98 -> 1, temp 37 -> 0
        let vitals = VitalSigns::new(0, 120, 98, 37.0);
        assert_eq!(vitals.severity_score(), Some(5));
        assert_eq!(vitals.priority(), PriorityTier::Medium);
    }

    #[test]
    fn heart_rate_band_boundaries() {
        assert_eq!(heart_rate_score(39), 3);
        assert_eq!(heart_rate_score(40), 2);
        assert_eq!(heart_rate_score(60), 2);
        assert_eq!(heart_rate_score(61), 1);
        assert_eq!(heart_rate_score(109), 1);
        assert_eq!(heart_rate_score(110), 2);
        assert_eq!(heart_rate_score(130), 2);
        assert_eq!(heart_rate_score(131), 3);
        assert_eq!(heart_rate_score(i32::MIN), 3);
        assert_eq!(heart_rate_score(i32::MAX), 3);
    }

    #[test]
    fn blood_pressure_has_no_middle_band() {
        assert_eq!(blood_pressure_score(89), 3);
        assert_eq!(blood_pressure_score(90), 1);
        assert_eq!(blood_pressure_score(180), 1);
        assert_eq!(blood_pressure_score(181), 3);
        assert_eq!(blood_pressure_score(-5), 3);
    }

    #[test]
    fn oxygen_saturation_band_boundaries() {
        assert_eq!(oxygen_saturation_score(89), 3);
        assert_eq!(oxygen_saturation_score(90), 2);
        assert_eq!(oxygen_saturation_score(95), 2);
        assert_eq!(oxygen_saturation_score(96), 1);
        assert_eq!(oxygen_saturation_score(250), 1);
    }

    #[test]
    fn temperature_bounds_are_exclusive() {
        assert_eq!(temperature_score(35.0), 0);
        assert_eq!(temperature_score(39.0), 0);
        assert_eq!(temperature_score(34.9), 2);
        assert_eq!(temperature_score(39.1), 2);
        assert_eq!(temperature_score(f64::NAN), 0);
    }

    #[test]
    fn score_thresholds() {
        assert_eq!(PriorityTier::from_score(3), PriorityTier::Low);
        assert_eq!(PriorityTier::from_score(4), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_score(5), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_score(6), PriorityTier::High);
        assert_eq!(PriorityTier::from_score(8), PriorityTier::High);
        assert_eq!(PriorityTier::from_score(9), PriorityTier::Critical);
        assert_eq!(PriorityTier::from_score(11), PriorityTier::Critical);
    }

    #[test]
    fn documented_examples() {
        assert_eq!(classify(130, 120, 96, 38.0), PriorityTier::Medium);
        assert_eq!(classify(131, 120, 96, 38.0), PriorityTier::Medium);
        assert_eq!(classify(150, 200, 85, 40.0), PriorityTier::Critical);
        assert_eq!(VitalSigns::new(150, 200, 85, 40.0).severity_score(), Some(11));
    }

    #[test]
    fn normal_readings_are_low() {
        let vitals = VitalSigns::new(80, 120, 98, 36.8);
        assert_eq!(vitals.severity_score(), Some(3));
        assert_eq!(vitals.priority(), PriorityTier::Low);
    }

    #[test]
    fn high_tier_example() {
        // hr 50 -> 2, bp 85 -> 3, oxygen 97 -> 1, temp 37 -> 0
        assert_eq!(classify(50, 85, 97, 37.0), PriorityTier::High);
    }

    #[test]
    fn classification_is_repeatable() {
        let first = classify(112, 175, 93, 39.5);
        let second = classify(112, 175, 93, 39.5);
        assert_eq!(first, second);
    }

    #[test]
    fn score_stays_within_three_and_eleven() {
        for hr in [-1, 0, 39, 40, 60, 61, 109, 110, 130, 131] {
            for bp in [0, 89, 90, 180, 181] {
                for ox in [0, 89, 90, 95, 96] {
                    for temp in [30.0, 35.0, 39.0, 40.0] {
                        let vitals = VitalSigns::new(hr, bp, ox, temp);
                        if let Some(score) = vitals.severity_score() {
                            assert!((3..=11).contains(&score), "score {score} out of range");
                        } else {
                            assert!(vitals.is_deceased());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn tiers_sort_in_worklist_order() {
        let mut tiers = vec![
            PriorityTier::Low,
            PriorityTier::Critical,
            PriorityTier::Medium,
            PriorityTier::Deceased,
            PriorityTier::High,
        ];
        tiers.sort();
        assert_eq!(tiers, PriorityTier::ALL.to_vec());
    }

    #[test]
    fn tiers_serialize_as_exact_literals() {
        for tier in PriorityTier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier));
            assert_eq!(tier.as_str().parse::<PriorityTier>().unwrap(), tier);
        }
        assert!("critical".parse::<PriorityTier>().is_err());
    }
}
