use cavern_classifier::gaussian_nb::{ClassParameters, GnbModel, LabeledSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GnbModelFile {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub accepted: ClassParameters,
    pub rejected: ClassParameters,
    pub training_samples: Vec<LabeledSample>,
    pub validation_samples: Vec<LabeledSample>,
}

impl GnbModelFile {
    pub(crate) fn from_model(name: impl Into<String>, model: &GnbModel, trained_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            trained_at,
            accepted: *model.accepted(),
            rejected: *model.rejected(),
            training_samples: model.training_samples().to_vec(),
            validation_samples: model.validation_samples().to_vec(),
        }
    }

    pub(crate) fn to_model(&self) -> GnbModel {
        GnbModel::from_parts(
            self.accepted,
            self.rejected,
            self.training_samples.clone(),
            self.validation_samples.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn test_model_survives_json() {
        let model = GnbModel::train(&[0.9, 0.8, 0.95], &[0.1, 0.3]);
        let trained_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let file = GnbModelFile::from_model("gnb", &model, trained_at);

        let json = serde_json::to_string(&file).unwrap();
        let back: GnbModelFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "gnb");
        assert_eq!(back.trained_at, trained_at);
        let restored = back.to_model();
        assert_eq!(restored.training_samples().len(), 5);
        assert!((restored.accepted().mean - model.accepted().mean).abs() < 1e-12);
        assert!((restored.rejected().variance - model.rejected().variance).abs() < 1e-12);
        assert!(restored.classify_feature(0.85).label.is_accepted());
    }
}
