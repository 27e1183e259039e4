use crate::classify::{CorridorType, Severity};

/// Static intervention labels per corridor type and severity tier.
pub fn interventions(corridor_type: CorridorType, severity: Severity) -> &'static [&'static str] {
    use CorridorType::*;
    use Severity::*;

    match (corridor_type, severity) {
        (HeatDominated, Critical) => &[
            "Dense shade tree canopy (Neem / Peepal / Banyan)",
            "Cool pavement coating with high solar reflectance",
            "Mist-cooling stations at pedestrian nodes",
        ],
        (HeatDominated, High) => &[
            "Linear street tree planting (min 8 m canopy spread)",
            "Pergola-covered walkways with climbing vines",
            "Roadside bioswales with evaporative cooling effect",
        ],
        (HeatDominated, Moderate) => &[
            "Median strip tree planting",
            "Light-colored permeable paving",
        ],
        (PollutionDominated, Critical) => &[
            "Multi-row dense vegetation buffer (3-5 m depth)",
            "Vertical green walls on boundary walls",
            "PM-trapping hedge rows (Thevetia / Ficus)",
        ],
        (PollutionDominated, High) => &[
            "Roadside dense shrub planting for particulate capture",
            "Staggered tree and shrub layering for filtration",
            "Dust-suppressing ground-cover planting on verges",
        ],
        (PollutionDominated, Moderate) => &[
            "Single-row pollution-tolerant tree planting",
            "Creeper-covered chain-link fencing",
        ],
        (GreenDeficit, Critical) => &[
            "Pocket park network along the corridor",
            "Continuous green cycle lane with native planting",
            "Micro-forests on reclaimed road margins",
        ],
        (GreenDeficit, High) => &[
            "Median green strip with flowering native species",
            "Tree-lined footpath connecting existing parks",
            "Rain garden chain along roadside drains",
        ],
        (GreenDeficit, Moderate) => &[
            "Community-adopted verge planting program",
            "Climbing-plant trellises on dividers and walls",
        ],
        (MixedExposure, Critical) => &[
            "Multi-functional green corridor: shade, filtration and habitat",
            "Integrated stormwater bio-retention with canopy trees",
            "Complete street redesign with green median and buffers",
        ],
        (MixedExposure, High) => &[
            "Combined tree and shrub planting for cooling and dust capture",
            "Swale-and-shade parkway along arterial service road",
        ],
        (MixedExposure, Moderate) => &[
            "Layered planting: ground cover, shrub and small tree",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_has_one_to_three_labels() {
        for corridor_type in CorridorType::ALL {
            for severity in [Severity::Critical, Severity::High, Severity::Moderate] {
                let labels = interventions(corridor_type, severity);
                assert!((1..=3).contains(&labels.len()), "{corridor_type:?}/{severity:?}");
            }
        }
    }
}
