//! Canonical selectable keyword lists. Consumers populate their selection
//! widgets from these display names and pass the picks through the
//! normalizer before querying.

use std::collections::BTreeSet;

use crate::normalize::normalize_terms;

const TECHNOLOGIES: &[&str] = &[
    "Internet of Things",
    "Machine Learning",
    "Deep Learning",
    "Geoprocessing",
    "Remote Sensing",
    "Technological Innovation",
    "Digital Technologies",
    "Artificial Intelligence",
    "Data Science",
    "Digital Transformation",
    "Reinforcement Learning",
    "Data Visualization",
    "Natural Language Processing",
    "Prediction Analytics",
    "Digital Twins",
    "Augmented Reality",
];

const ENVIRONMENT_TERMS: &[&str] = &[
    "Impact Assessment",
    "Environmental Impact Assessment",
    "Environmental Licensing",
    "Environmental Monitoring",
    "Environmental Big Data",
    "Environmental Modeling",
    "Environmental Internet of Things",
    "Digital Environmental Governance",
    "Digital EIA",
    "Strategic Environmental Assessment",
    "Social Impact Assessment",
    "ESG Risk Management",
];

// Alternate spellings seen in the literature, accepted on input.
const TECHNOLOGY_VARIATIONS: &[&str] = &[
    "Digital Twin",
    "Digital Technology",
    "Internet of Thing",
];

const ENVIRONMENT_VARIATIONS: &[&str] = &[
    "Environment IoT",
    "Environments IoT",
    "Impacts Assessment",
    "Environmental Modelling",
];

pub fn technologies() -> &'static [&'static str] {
    TECHNOLOGIES
}

pub fn environment_terms() -> &'static [&'static str] {
    ENVIRONMENT_TERMS
}

pub fn technology_variations() -> &'static [&'static str] {
    TECHNOLOGY_VARIATIONS
}

pub fn environment_variations() -> &'static [&'static str] {
    ENVIRONMENT_VARIATIONS
}

/// Display names mapped through the normalizer into a selection-ready set.
pub fn normalized(names: &[&str]) -> BTreeSet<String> {
    normalize_terms(names.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_normalizes_cleanly() {
        let tec = normalized(technologies());
        assert_eq!(tec.len(), technologies().len());
        assert!(tec.contains("internet_of_things"));
        assert!(tec.contains("natural_language_processing"));
    }

    #[test]
    fn categories_do_not_overlap() {
        let tec = normalized(technologies());
        let env = normalized(environment_terms());
        assert!(tec.is_disjoint(&env));
    }
}
