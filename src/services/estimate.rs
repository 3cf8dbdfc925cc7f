use uuid::Uuid;

use crate::errors::PipelineError;
use crate::models::{EstimateResult, ProjectIntake};
use crate::services::pipeline::EstimatePipeline;

const ESTIMATE_PROMPT: &str = r#"You are a senior contractor cost estimator with more than twenty years of experience in residential construction and remodeling.

Estimate the cost of the project below. Use realistic current market prices in euros and account for regional price variation.

Project information:
"#;

const ESTIMATE_SCHEMA: &str = r#"Respond with a single JSON object in exactly this format:
{
  "totalEstimate": {
    "min": <number>,
    "max": <number>,
    "average": <number>,
    "currency": "EUR"
  },
  "breakdown": {
    "materials": {
      "cost": <number>,
      "items": [
        {"item": "...", "quantity": "...", "unitCost": <number>, "total": <number>}
      ]
    },
    "labor": {
      "cost": <number>,
      "hours": <number>,
      "hourlyRate": <number>
    },
    "permits": <number>,
    "contingency": <number>,
    "overhead": <number>
  },
  "timeline": {
    "estimatedDays": <number>,
    "phases": [
      {"phase": "...", "duration": "..."}
    ]
  },
  "risks": [
    {"risk": "...", "mitigation": "...", "impact": "low|medium|high"}
  ],
  "recommendations": ["..."],
  "notes": "Additional information or considerations"
}

Use 0 for a cost line that does not apply. Be thorough and specific."#;

pub fn render_estimate_prompt(intake: &ProjectIntake) -> String {
    let square_footage = intake
        .square_footage
        .map(|sqft| format!("{sqft} sq ft"))
        .unwrap_or_else(|| "Not specified".to_string());
    let timeline = intake.timeline.map(|t| t.label()).unwrap_or("Flexible");
    let photos = match intake.photos.len() {
        0 => "None provided".to_string(),
        1 => "1 attached (included with this request)".to_string(),
        n => format!("{n} attached (the first is included with this request)"),
    };

    format!(
        "{ESTIMATE_PROMPT}- Client: {}\n- Project Type: {}\n- Description: {}\n- Square Footage: {square_footage}\n- Preferred Timeline: {timeline}\n- Photos: {photos}\n\n{ESTIMATE_SCHEMA}\n",
        intake.client_name.trim(),
        intake.project_type.trim(),
        intake.description.trim(),
    )
}

impl EstimatePipeline {
    /// Produces a cost estimate for one intake. Makes exactly one provider
    /// call, or none when the intake is invalid.
    #[tracing::instrument(
        name = "request_estimate",
        skip_all,
        fields(
            request_id = %Uuid::new_v4(),
            provider = self.provider_name(),
            project_type = %intake.project_type,
            photos = intake.photos.len()
        )
    )]
    pub async fn request_estimate(
        &self,
        intake: &ProjectIntake,
    ) -> Result<EstimateResult, PipelineError> {
        if let Err(e) = intake.validate() {
            tracing::info!(error = %e, "rejected estimate intake");
            return Err(e);
        }

        let prompt = render_estimate_prompt(intake);
        let reply = self.call(&prompt, intake.photos.first()).await?;
        let estimate: EstimateResult = self.parse(&reply)?;

        tracing::info!(
            min = estimate.total_estimate.min,
            max = estimate.total_estimate.max,
            average = estimate.total_estimate.average,
            has_breakdown = estimate.breakdown.is_some(),
            "estimate generated"
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Photo, Timeline};

    fn intake() -> ProjectIntake {
        ProjectIntake {
            client_name: "  Maria Keller ".to_string(),
            project_type: "Bathroom Upgrade".to_string(),
            description: "Walk-in shower, new vanity, heated floor".to_string(),
            square_footage: Some(85.5),
            timeline: Some(Timeline::OneToTwoWeeks),
            photos: vec![],
        }
    }

    #[test]
    fn test_prompt_embeds_every_field() {
        let prompt = render_estimate_prompt(&intake());
        assert!(prompt.contains("- Client: Maria Keller\n"));
        assert!(prompt.contains("- Project Type: Bathroom Upgrade"));
        assert!(prompt.contains("Walk-in shower, new vanity, heated floor"));
        assert!(prompt.contains("- Square Footage: 85.5 sq ft"));
        assert!(prompt.contains("- Preferred Timeline: 1-2 weeks"));
        assert!(prompt.contains("- Photos: None provided"));
        assert!(prompt.contains("\"totalEstimate\""));
        assert!(prompt.contains("\"currency\": \"EUR\""));
    }

    #[test]
    fn test_prompt_placeholders_for_missing_fields() {
        let mut i = intake();
        i.square_footage = None;
        i.timeline = None;
        i.photos = vec![Photo::jpeg(vec![1]), Photo::jpeg(vec![2])];
        let prompt = render_estimate_prompt(&i);
        assert!(prompt.contains("- Square Footage: Not specified\n"));
        assert!(prompt.contains("- Preferred Timeline: Flexible\n"));
        assert!(prompt.contains("- Photos: 2 attached"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(render_estimate_prompt(&intake()), render_estimate_prompt(&intake()));
    }
}
