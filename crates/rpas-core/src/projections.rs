//! Projection options offered on the survey forms.

use serde::Serialize;

use crate::config::LoaderConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionOption {
    pub label: String,
    pub value: String,
}

impl ProjectionOption {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Fallback list used when no projections were selected in the settings.
pub const DEFAULT_PROJECTIONS: [(&str, &str); 13] = [
    (r"GDA 94 Latitude| \Longitude (GDA94 Lat Long)", "GDA94 Lat Long"),
    ("GDA 94 MGA Zone 50 (MGA50)", "MGA50"),
    ("GDA 94 MGA Zone 50 (MGA51)", "MGA51"),
    ("Central Project Grid (CPG94)", "CPG94"),
    ("Eastern Project Grid (EPG94)", "EPG94"),
    ("Eastern Ridge Project Grid (ER94)", "ER94"),
    ("HBI Project Grid (HBI94)", "HBI94"),
    ("Jimblebar Project Grid (JIM94)", "JIM94"),
    ("Port Hedland (PHG94)", "PHG94"),
    ("Whaleback Project Grid (WB94)", "WB94"),
    ("Yand1 Project Grid (YAN94)", "YAN94"),
    ("Yarrie Project Grid (YAR94)", "YAR94"),
    ("Geocentric Datum Of Australia (GDA2020)", "GDA2020"),
];

/// Admin-selected projections when any are configured, otherwise the
/// default list. A selected projection with an empty value uses its label.
pub fn projection_options(config: &LoaderConfig) -> Vec<ProjectionOption> {
    if config.selected_projections.is_empty() {
        return DEFAULT_PROJECTIONS
            .iter()
            .map(|(label, value)| ProjectionOption::new(*label, *value))
            .collect();
    }

    config
        .selected_projections
        .iter()
        .map(|(label, value)| {
            let value = if value.is_empty() { label } else { value };
            ProjectionOption::new(label.as_str(), value.as_str())
        })
        .collect()
}

pub fn is_known_projection(config: &LoaderConfig, value: &str) -> bool {
    projection_options(config)
        .iter()
        .any(|option| option.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = projection_options(&LoaderConfig::default());
        assert_eq!(options.len(), 13);
        assert_eq!(options[0].value, "GDA94 Lat Long");
        assert_eq!(options[0].label, r"GDA 94 Latitude| \Longitude (GDA94 Lat Long)");
        assert_eq!(options[12].value, "GDA2020");
    }

    #[test]
    fn selected_projections_replace_defaults() {
        let mut config = LoaderConfig::default();
        config
            .selected_projections
            .insert("MGA Zone 50".to_string(), "MGA50".to_string());
        config
            .selected_projections
            .insert("GDA2020".to_string(), String::new());

        let options = projection_options(&config);
        assert_eq!(
            options,
            vec![
                ProjectionOption::new("GDA2020", "GDA2020"),
                ProjectionOption::new("MGA Zone 50", "MGA50"),
            ]
        );
        assert!(is_known_projection(&config, "MGA50"));
        assert!(!is_known_projection(&config, "CPG94"));
    }

    #[test]
    fn is_known_projection_defaults() {
        let config = LoaderConfig::default();
        assert!(is_known_projection(&config, "WB94"));
        assert!(!is_known_projection(&config, "wb94"));
        assert!(!is_known_projection(&config, ""));
    }
}
