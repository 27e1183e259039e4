use serde::Serialize;

use crate::classify::interventions;
use crate::corridor::Corridor;

pub const HEAT_THRESHOLD: f64 = 0.45;
pub const POLLUTION_THRESHOLD: f64 = 0.40;
pub const GREEN_THRESHOLD: f64 = 0.35;

/// Green deficit assumed when no NDVI is available.
const DEFAULT_GREEN_DEFICIT: f64 = 0.5;

/// Dominant exposure of a corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorridorType {
    HeatDominated,
    PollutionDominated,
    GreenDeficit,
    MixedExposure,
}

impl CorridorType {
    pub const ALL: [CorridorType; 4] = [
        CorridorType::HeatDominated,
        CorridorType::PollutionDominated,
        CorridorType::GreenDeficit,
        CorridorType::MixedExposure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CorridorType::HeatDominated => "heat_dominated",
            CorridorType::PollutionDominated => "pollution_dominated",
            CorridorType::GreenDeficit => "green_deficit",
            CorridorType::MixedExposure => "mixed_exposure",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CorridorType::HeatDominated => "🌡️",
            CorridorType::PollutionDominated => "💨",
            CorridorType::GreenDeficit => "🌿",
            CorridorType::MixedExposure => "🌳",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CorridorType::HeatDominated => "#d73027",
            CorridorType::PollutionDominated => "#7b3294",
            CorridorType::GreenDeficit => "#1a9850",
            CorridorType::MixedExposure => "#fc8d59",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CorridorType::HeatDominated => "extreme surface heat",
            CorridorType::PollutionDominated => "high air pollution",
            CorridorType::GreenDeficit => "severe vegetation deficit",
            CorridorType::MixedExposure => "multiple environmental stressors",
        }
    }
}

/// Severity tier derived from mean priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity { Critical, High, Moderate }

impl Severity {
    pub fn from_priority(priority: f64) -> Self {
        if priority >= 0.70 { Severity::Critical }
        else if priority >= 0.50 { Severity::High }
        else { Severity::Moderate }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Moderate => "moderate",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Moderate => "Moderate",
        }
    }
}

/// Normalized exposure shares; they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExposureShares {
    pub heat: f64,
    pub pollution: f64,
    pub green: f64,
}

impl ExposureShares {
    /// Compute shares from aggregated means. Absent heat or AQI count as 0,
    /// absent NDVI as a green deficit of 0.5. None when the total is ~0.
    pub fn from_means(mean_heat: Option<f64>, mean_aqi: Option<f64>, mean_ndvi: Option<f64>) -> Option<Self> {
        let heat = mean_heat.unwrap_or(0.0);
        let aqi = mean_aqi.unwrap_or(0.0);
        let green_deficit = mean_ndvi.map(|ndvi| 1.0 - ndvi).unwrap_or(DEFAULT_GREEN_DEFICIT);

        let total = heat + aqi + green_deficit;
        if total < 0.001 { return None }

        Some(Self { heat: heat / total, pollution: aqi / total, green: green_deficit / total })
    }

    /// Exposure types ranked by share, descending. Ties keep heat, pollution,
    /// green order.
    fn ranked(&self) -> [(CorridorType, f64); 3] {
        let mut ranked = [
            (CorridorType::HeatDominated, self.heat),
            (CorridorType::PollutionDominated, self.pollution),
            (CorridorType::GreenDeficit, self.green),
        ];
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Rule-based classification of one corridor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub corridor_type: CorridorType,
    pub secondary_type: CorridorType,
    pub severity: Severity,
    pub shares: ExposureShares,
    pub interventions: Vec<&'static str>,
    pub rationale: String,
}

/// Classify from aggregated means. Thresholds are checked in fixed order and
/// the first match wins.
pub fn classify(
    mean_heat: Option<f64>,
    mean_aqi: Option<f64>,
    mean_ndvi: Option<f64>,
    mean_priority: f64,
) -> Classification {
    let severity = Severity::from_priority(mean_priority);

    let (corridor_type, secondary_type, shares) = match ExposureShares::from_means(mean_heat, mean_aqi, mean_ndvi) {
        None => {
            let third = 1.0 / 3.0;
            (CorridorType::MixedExposure, CorridorType::GreenDeficit,
                ExposureShares { heat: third, pollution: third, green: third })
        }
        Some(shares) => {
            let corridor_type = if shares.heat >= HEAT_THRESHOLD {
                CorridorType::HeatDominated
            } else if shares.pollution >= POLLUTION_THRESHOLD {
                CorridorType::PollutionDominated
            } else if shares.green >= GREEN_THRESHOLD {
                CorridorType::GreenDeficit
            } else {
                CorridorType::MixedExposure
            };
            (corridor_type, shares.ranked()[1].0, shares)
        }
    };

    let rationale = format!(
        "{}-severity corridor primarily affected by {}, with secondary {}. \
         Interventions target the dominant exposure while addressing co-benefits.",
        severity.title(), corridor_type.label(), secondary_type.label(),
    );

    Classification {
        corridor_type,
        secondary_type,
        severity,
        shares,
        interventions: interventions(corridor_type, severity).to_vec(),
        rationale,
    }
}

impl Corridor {
    /// Classify this corridor from its aggregated means.
    pub fn classify(&self) -> Classification {
        classify(self.mean_heat, self.mean_aqi, self.mean_ndvi, self.mean_priority)
    }
}
