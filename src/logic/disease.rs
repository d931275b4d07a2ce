//! Disease Registry - the five outbreak indicators the models were trained on
//!
//! Every classifier artifact, lag-column group and UI selector entry is keyed
//! by one of these five labels. Dispatch is an exhaustive match over the enum
//! so adding a sixth disease is a compile-time event, not a runtime surprise.

use serde::{Deserialize, Serialize};

/// Number of registered diseases (= number of classifier artifacts).
pub const DISEASE_COUNT: usize = 5;

/// A disease with a trained outbreak classifier.
///
/// Variant order is fixed: it defines the order of the lag-column triplets in
/// the feature layout and the index into the classifier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disease {
    Meningitis,
    Measles,
    Dengue,
    Cholera,
    Covid19,
}

impl Disease {
    /// All diseases, in layout order.
    pub const ALL: [Disease; DISEASE_COUNT] = [
        Disease::Meningitis,
        Disease::Measles,
        Disease::Dengue,
        Disease::Cholera,
        Disease::Covid19,
    ];

    /// The wire key: the exact target-column label the classifier was
    /// trained against. Used for manifest lookup and UI round-trips.
    pub fn key(self) -> &'static str {
        match self {
            Disease::Meningitis => "Meningite_Outbreak",
            Disease::Measles => "Rougeole_Outbreak",
            Disease::Dengue => "Dengue_Cas_confirme_(hebdomadaire)_Outbreak",
            Disease::Cholera => "Cholera_Outbreak",
            Disease::Covid19 => "Covid19_Outbreak",
        }
    }

    /// Prefix of this disease's lag columns in the feature layout
    /// (`<prefix>_lag1` .. `<prefix>_lag3`).
    pub fn lag_prefix(self) -> &'static str {
        match self {
            Disease::Meningitis => "Meningite",
            Disease::Measles => "Rougeole",
            Disease::Dengue => "Dengue_Cas_confirme_(hebdomadaire)",
            Disease::Cholera => "Cholera",
            Disease::Covid19 => "Covid19",
        }
    }

    /// Resolve a wire key back to a disease. `None` for anything outside the
    /// five registered labels.
    pub fn from_key(key: &str) -> Option<Disease> {
        Disease::ALL.into_iter().find(|d| d.key() == key)
    }

    /// Position in [`Disease::ALL`]; indexes the classifier table and the
    /// lag-column triplets.
    pub fn index(self) -> usize {
        match self {
            Disease::Meningitis => 0,
            Disease::Measles => 1,
            Disease::Dengue => 2,
            Disease::Cholera => 3,
            Disease::Covid19 => 4,
        }
    }

    /// Human-readable name for the result panel: wire key without the
    /// `_Outbreak` suffix, underscores as spaces.
    pub fn display_name(self) -> String {
        self.key()
            .trim_end_matches("_Outbreak")
            .replace('_', " ")
    }

    /// File name of this disease's classifier artifact. Convention: the
    /// lowercased wire key embedded in the file name.
    pub fn artifact_file_name(self) -> String {
        format!("random_forest_model_{}.onnx", self.key().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_every_variant_once() {
        assert_eq!(Disease::ALL.len(), DISEASE_COUNT);
        for (i, disease) in Disease::ALL.into_iter().enumerate() {
            assert_eq!(disease.index(), i);
        }
    }

    #[test]
    fn test_from_key_round_trip() {
        for disease in Disease::ALL {
            assert_eq!(Disease::from_key(disease.key()), Some(disease));
        }
    }

    #[test]
    fn test_from_key_rejects_unknown() {
        assert_eq!(Disease::from_key(""), None);
        assert_eq!(Disease::from_key("Ebola_Outbreak"), None);
        assert_eq!(Disease::from_key("meningite_outbreak"), None);
    }

    #[test]
    fn test_display_name_strips_suffix_and_underscores() {
        assert_eq!(Disease::Meningitis.display_name(), "Meningite");
        assert_eq!(
            Disease::Dengue.display_name(),
            "Dengue Cas confirme (hebdomadaire)"
        );
        assert_eq!(Disease::Covid19.display_name(), "Covid19");
    }

    #[test]
    fn test_artifact_file_name_is_lowercased_key() {
        assert_eq!(
            Disease::Cholera.artifact_file_name(),
            "random_forest_model_cholera_outbreak.onnx"
        );
        assert_eq!(
            Disease::Dengue.artifact_file_name(),
            "random_forest_model_dengue_cas_confirme_(hebdomadaire)_outbreak.onnx"
        );
    }
}
