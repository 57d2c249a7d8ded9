//! Pseudo-random diagnostic verdicts drawn from static fault tables.

use std::fmt;

use rand::Rng;
use serde::Serialize;

/// Severity bucket shown on the verdict card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No action needed.
    Normal,
    /// Watch at next inspection.
    Advisory,
    /// Schedule maintenance.
    Warning,
    /// Take out of service.
    Critical,
}

impl Severity {
    /// Bucket for a 0–100 health score.
    pub fn from_health(health: u8) -> Self {
        match health {
            0..50 => Self::Critical,
            50..65 => Self::Warning,
            65..80 => Self::Advisory,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Advisory => "advisory",
            Self::Warning => "warning",
            Self::Critical => "critical",
        })
    }
}

struct FaultProfile {
    name: &'static str,
    gas: &'static str,
    actions: &'static [&'static str],
}

const FAULTS: &[FaultProfile] = &[
    FaultProfile {
        name: "Thermal hotspot in LV winding",
        gas: "ethylene",
        actions: &[
            "Reduce loading to 80% of nameplate",
            "Schedule infrared thermography",
            "Check cooling fans and radiator valves",
        ],
    },
    FaultProfile {
        name: "Partial discharge in bushing",
        gas: "hydrogen",
        actions: &[
            "Run UHF partial-discharge survey",
            "Measure bushing capacitance and tan delta",
        ],
    },
    FaultProfile {
        name: "Low-energy arcing on tap changer",
        gas: "acetylene",
        actions: &[
            "Inspect on-load tap changer contacts",
            "Resample oil within 7 days",
            "Lock tap position pending inspection",
        ],
    },
    FaultProfile {
        name: "Cellulose insulation ageing",
        gas: "carbon monoxide",
        actions: &[
            "Test furan content of oil",
            "Plan mid-life refurbishment",
        ],
    },
    FaultProfile {
        name: "Moisture ingress in oil",
        gas: "hydrogen",
        actions: &[
            "Replace breather silica gel",
            "Run online oil dry-out",
            "Check gasket seals",
        ],
    },
];

const FACTORS: &[&str] = &[
    "Load vs top-oil temperature",
    "Dissolved gas vs load cycling",
    "Winding temperature vs ambient",
    "Moisture vs seasonal humidity",
];

/// What the user asked to diagnose.
///
/// Only used for labels; never affects the generated numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRequest {
    /// Asset id, e.g. a grid node id.
    pub asset_id: String,
    /// Name of the uploaded sensor log.
    pub file_name: String,
}

/// One correlation row on the verdict card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    /// Factor pair.
    pub factor: String,
    /// Correlation strength in percent.
    pub percent: u8,
}

/// Final output of a diagnostics run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Asset label copied from the request.
    pub asset_id: String,
    /// Severity bucket.
    pub severity: Severity,
    /// Health score, 0–100.
    pub health_score: u8,
    /// Classified fault.
    pub fault: String,
    /// Model confidence in percent.
    pub confidence_pct: f32,
    /// Estimated remaining life (years).
    pub remaining_life_years: f32,
    /// Correlations, strongest first.
    pub correlations: Vec<Correlation>,
    /// Narrative paragraph.
    pub narrative: String,
    /// Recommended actions.
    pub actions: Vec<String>,
}

impl Verdict {
    /// Draws a verdict from `rng`, labeling it with `request`.
    pub fn generate(request: &DiagnosticRequest, rng: &mut impl Rng) -> Self {
        let health_score: u8 = rng.random_range(35..=92);
        let severity = Severity::from_health(health_score);
        let fault = &FAULTS[rng.random_range(0..FAULTS.len())];
        let confidence_pct = (rng.random_range(82.0f32..97.0) * 10.0).round() / 10.0;
        let life_factor: f32 = rng.random_range(0.8..1.1);
        let remaining_life_years =
            (f32::from(health_score) / 100.0 * 25.0 * life_factor * 10.0).round() / 10.0;

        let mut correlations: Vec<Correlation> = FACTORS
            .iter()
            .map(|f| Correlation {
                factor: (*f).to_string(),
                percent: rng.random_range(55..=98),
            })
            .collect();
        correlations.sort_by(|a, b| b.percent.cmp(&a.percent));

        let top = &correlations[0];
        let narrative = format!(
            "Analysis of {file} for asset {asset} indicates {fault} ({severity}), \
             with elevated {gas} and {conf:.1}% model confidence. Strongest signal: \
             {factor} at {pct}%. Estimated remaining life is {life:.1} years.",
            file = request.file_name,
            asset = request.asset_id,
            fault = fault.name.to_lowercase(),
            gas = fault.gas,
            conf = confidence_pct,
            factor = top.factor.to_lowercase(),
            pct = top.percent,
            life = remaining_life_years,
        );

        Self {
            asset_id: request.asset_id.clone(),
            severity,
            health_score,
            fault: fault.name.to_string(),
            confidence_pct,
            remaining_life_years,
            correlations,
            narrative,
            actions: fault.actions.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn request(asset: &str, file: &str) -> DiagnosticRequest {
        DiagnosticRequest {
            asset_id: asset.into(),
            file_name: file.into(),
        }
    }

    #[test]
    fn severity_buckets() {
        assert_eq!(Severity::from_health(10), Severity::Critical);
        assert_eq!(Severity::from_health(50), Severity::Warning);
        assert_eq!(Severity::from_health(70), Severity::Advisory);
        assert_eq!(Severity::from_health(80), Severity::Normal);
    }

    #[test]
    fn same_seed_same_verdict() {
        let a = Verdict::generate(&request("KHD-T-002", "dga.csv"), &mut StdRng::seed_from_u64(7));
        let b = Verdict::generate(&request("KHD-T-002", "dga.csv"), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn inputs_only_change_labels() {
        let a = Verdict::generate(&request("KHD-T-002", "a.csv"), &mut StdRng::seed_from_u64(3));
        let b = Verdict::generate(&request("KHD-T-005", "b.csv"), &mut StdRng::seed_from_u64(3));
        assert_eq!(a.health_score, b.health_score);
        assert_eq!(a.fault, b.fault);
        assert_eq!(a.correlations, b.correlations);
        assert_eq!(a.confidence_pct, b.confidence_pct);
        assert_ne!(a.narrative, b.narrative);
        assert!(b.narrative.contains("KHD-T-005"));
        assert!(b.narrative.contains("b.csv"));
    }

    #[test]
    fn values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let v = Verdict::generate(&request("X", "y"), &mut rng);
            assert!((35..=92).contains(&v.health_score));
            assert_eq!(v.severity, Severity::from_health(v.health_score));
            assert!((82.0..=97.0).contains(&v.confidence_pct));
            assert!(!v.actions.is_empty());
            assert!(v.correlations.windows(2).all(|w| w[0].percent >= w[1].percent));
        }
    }
}
