//! Planner configuration from TOML (`[planner]` section)
//!
//! ```toml
//! [planner]
//! locales = ["en"]
//! ```

use crate::config::issue::ConfigIssue;
use serde::{Deserialize, Serialize};
use toolweave_domain::{DecompositionPolicy, Locale};

const VALID_LOCALES: &[&str] = &["en", "ja"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    /// Keyword tables consulted during decomposition
    pub locales: Vec<String>,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        Self {
            locales: VALID_LOCALES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl FilePlannerConfig {
    /// Parse locale names, skipping unknown ones.
    ///
    /// An empty result falls back to every supported locale.
    pub fn parse_locales(&self) -> (Vec<Locale>, Vec<ConfigIssue>) {
        let mut locales = Vec::new();
        let mut issues = Vec::new();

        for name in &self.locales {
            match name.parse::<Locale>() {
                Ok(locale) => {
                    if !locales.contains(&locale) {
                        locales.push(locale);
                    }
                }
                Err(_) => issues.push(ConfigIssue::invalid_enum(
                    "planner.locales",
                    name,
                    VALID_LOCALES,
                )),
            }
        }

        if locales.is_empty() {
            if issues.is_empty() {
                issues.push(ConfigIssue::invalid_value(
                    "planner.locales",
                    "no locales configured, using all",
                ));
            }
            locales = vec![Locale::En, Locale::Ja];
        }

        (locales, issues)
    }

    pub fn to_policy(&self) -> (DecompositionPolicy, Vec<ConfigIssue>) {
        let (locales, issues) = self.parse_locales();
        (DecompositionPolicy::for_locales(&locales), issues)
    }
}
