use serde::de::value::StrDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::PipelineError;

use super::Photo;

pub const PROJECT_TYPES: &[&str] = &[
    "Kitchen Remodel",
    "Bathroom Upgrade",
    "Fence Installation",
    "Deck Construction",
    "Home Improvement",
    "Basement Finishing",
    "Roof Replacement",
    "Flooring",
    "Painting",
    "Other",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Timeline {
    #[serde(rename = "asap")]
    Asap,
    #[serde(rename = "1-2weeks")]
    OneToTwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "2-3months")]
    TwoToThreeMonths,
    #[serde(rename = "flexible")]
    Flexible,
}

impl Timeline {
    pub fn label(&self) -> &'static str {
        match self {
            Timeline::Asap => "ASAP",
            Timeline::OneToTwoWeeks => "1-2 weeks",
            Timeline::OneMonth => "1 month",
            Timeline::TwoToThreeMonths => "2-3 months",
            Timeline::Flexible => "Flexible",
        }
    }
}

/// Project details collected by the estimate form.
///
/// Missing text fields deserialize as empty so `validate` can name them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIntake {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub square_footage: Option<f64>,
    #[serde(default, deserialize_with = "blank_timeline")]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl ProjectIntake {
    pub fn validate(&self) -> Result<(), PipelineError> {
        require_text("clientName", &self.client_name)?;
        validate_project_type(&self.project_type)?;
        require_text("description", &self.description)?;

        if let Some(sqft) = self.square_footage {
            if !sqft.is_finite() || sqft <= 0.0 {
                return Err(PipelineError::validation(
                    "squareFootage",
                    format!("must be a positive number, got {sqft}"),
                ));
            }
        }

        for (i, photo) in self.photos.iter().enumerate() {
            validate_photo("photos", photo).map_err(|e| match e {
                PipelineError::Validation { field, message } => {
                    PipelineError::validation(field, format!("photo {}: {message}", i + 1))
                }
                other => other,
            })?;
        }

        Ok(())
    }
}

/// The form's unselected option arrives as `""`.
fn blank_timeline<'de, D>(deserializer: D) -> Result<Option<Timeline>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => {
            let value: StrDeserializer<'_, D::Error> = value.trim().into_deserializer();
            Timeline::deserialize(value).map(Some)
        }
        _ => Ok(None),
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), PipelineError> {
    if value.trim().is_empty() {
        return Err(PipelineError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Project types must come from the catalog; matching ignores case and
/// surrounding whitespace.
pub fn validate_project_type(value: &str) -> Result<(), PipelineError> {
    require_text("projectType", value)?;
    let wanted = value.trim();
    if !PROJECT_TYPES.iter().any(|t| t.eq_ignore_ascii_case(wanted)) {
        return Err(PipelineError::validation(
            "projectType",
            format!("unknown project type '{wanted}'"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_photo(field: &'static str, photo: &Photo) -> Result<(), PipelineError> {
    if !photo.is_image() {
        return Err(PipelineError::validation(
            field,
            format!("unsupported content type '{}'", photo.content_type),
        ));
    }
    if photo.data.is_empty() {
        return Err(PipelineError::validation(field, "image data is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake() -> ProjectIntake {
        ProjectIntake {
            client_name: "Maria Keller".to_string(),
            project_type: "Kitchen Remodel".to_string(),
            description: "Replace cabinets and countertops".to_string(),
            square_footage: Some(180.0),
            timeline: Some(Timeline::OneMonth),
            photos: vec![],
        }
    }

    fn field_of(err: PipelineError) -> &'static str {
        match err {
            PipelineError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_intake() {
        assert!(intake().validate().is_ok());
    }

    #[test]
    fn test_blank_client_name() {
        let mut i = intake();
        i.client_name = "   ".to_string();
        assert_eq!(field_of(i.validate().unwrap_err()), "clientName");
    }

    #[test]
    fn test_blank_description() {
        let mut i = intake();
        i.description = String::new();
        assert_eq!(field_of(i.validate().unwrap_err()), "description");
    }

    #[test]
    fn test_project_type_outside_catalog() {
        let mut i = intake();
        i.project_type = "Spaceship Hangar".to_string();
        assert_eq!(field_of(i.validate().unwrap_err()), "projectType");

        i.project_type = " kitchen remodel ".to_string();
        assert!(i.validate().is_ok());
    }

    #[test]
    fn test_square_footage_must_be_positive_and_finite() {
        for bad in [0.0, -12.0, f64::NAN, f64::INFINITY] {
            let mut i = intake();
            i.square_footage = Some(bad);
            assert_eq!(field_of(i.validate().unwrap_err()), "squareFootage");
        }
    }

    #[test]
    fn test_photo_checks() {
        let mut i = intake();
        i.photos = vec![Photo::jpeg(vec![0xff, 0xd8]), Photo::new("text/plain", vec![1])];
        let err = i.validate().unwrap_err();
        assert!(err.to_string().contains("photo 2"));

        i.photos = vec![Photo::jpeg(vec![])];
        assert_eq!(field_of(i.validate().unwrap_err()), "photos");
    }

    #[test]
    fn test_deserialize_form_payload() {
        let json = r#"{
            "clientName": "Tom",
            "projectType": "Flooring",
            "description": "Oak floors in the living room",
            "timeline": "2-3months"
        }"#;
        let i: ProjectIntake = serde_json::from_str(json).unwrap();
        assert_eq!(i.timeline, Some(Timeline::TwoToThreeMonths));
        assert!(i.square_footage.is_none());
        assert!(i.photos.is_empty());
    }

    #[test]
    fn test_blank_timeline_means_unset() {
        let json = r#"{"clientName": "Tom", "projectType": "Flooring", "description": "x", "timeline": ""}"#;
        let i: ProjectIntake = serde_json::from_str(json).unwrap();
        assert!(i.timeline.is_none());

        let json = r#"{"clientName": "Tom", "projectType": "Flooring", "description": "x", "timeline": "someday"}"#;
        assert!(serde_json::from_str::<ProjectIntake>(json).is_err());
    }

    #[test]
    fn test_missing_text_field_reaches_validation() {
        let i: ProjectIntake =
            serde_json::from_str(r#"{"projectType": "Flooring", "description": "x"}"#).unwrap();
        assert_eq!(field_of(i.validate().unwrap_err()), "clientName");
    }
}
