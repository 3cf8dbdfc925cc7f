use uuid::Uuid;

use crate::errors::PipelineError;
use crate::models::intake::require_text;
use crate::models::MaterialRecommendations;
use crate::services::pipeline::EstimatePipeline;

const MATERIALS_PROMPT: &str = r#"You are a construction materials specialist. Recommend the best materials for a project of the type given below.

Respond with a single JSON object in exactly this format:
{
  "recommended": [
    {
      "category": "...",
      "material": "...",
      "brand": "...",
      "priceRange": "...",
      "pros": ["..."],
      "cons": ["..."]
    }
  ],
  "budgetOptions": [ ...same shape as "recommended"... ],
  "premiumOptions": [ ...same shape as "recommended"... ]
}

Quote price ranges in euros."#;

pub fn render_materials_prompt(project_type: &str) -> String {
    format!("{MATERIALS_PROMPT}\n\nProject type: {}\n", project_type.trim())
}

impl EstimatePipeline {
    /// Material suggestions for a project type. Any non-empty type is
    /// accepted, not only catalog entries.
    #[tracing::instrument(
        name = "recommend_materials",
        skip_all,
        fields(
            request_id = %Uuid::new_v4(),
            provider = self.provider_name(),
            project_type = %project_type.trim()
        )
    )]
    pub async fn recommend_materials(
        &self,
        project_type: &str,
    ) -> Result<MaterialRecommendations, PipelineError> {
        if let Err(e) = require_text("projectType", project_type) {
            tracing::info!(error = %e, "rejected material recommendation request");
            return Err(e);
        }

        let prompt = render_materials_prompt(project_type);
        let reply = self.call(&prompt, None).await?;
        let recommendations: MaterialRecommendations = self.parse(&reply)?;

        if recommendations.is_empty() {
            tracing::warn!("provider returned no material options");
        } else {
            tracing::info!(
                recommended = recommendations.recommended.len(),
                budget = recommendations.budget_options.len(),
                premium = recommendations.premium_options.len(),
                "material recommendations generated"
            );
        }
        Ok(recommendations)
    }
}
