use uuid::Uuid;

use crate::errors::PipelineError;
use crate::models::intake::validate_photo;
use crate::models::{ImageAnalysis, Photo};
use crate::services::pipeline::EstimatePipeline;

const ANALYSIS_PROMPT: &str = r#"You are inspecting a photo of a construction or renovation project. Describe what you see and assess the work.

Respond with a single JSON object in exactly this format:
{
  "description": "What is visible in the image",
  "projectPhase": "...",
  "qualityAssessment": "...",
  "concerns": ["..."],
  "recommendations": ["..."],
  "estimatedProgress": <percentage from 0 to 100>
}"#;

pub fn render_analysis_prompt(context: &str) -> String {
    let context = match context.trim() {
        "" => "No additional context provided",
        c => c,
    };
    format!("{ANALYSIS_PROMPT}\n\nContext: {context}\n")
}

impl EstimatePipeline {
    /// Progress and quality assessment of a single site photo.
    #[tracing::instrument(
        name = "analyze_image",
        skip_all,
        fields(
            request_id = %Uuid::new_v4(),
            provider = self.provider_name(),
            content_type = %image.content_type,
            bytes = image.data.len()
        )
    )]
    pub async fn analyze_image(
        &self,
        image: &Photo,
        context: &str,
    ) -> Result<ImageAnalysis, PipelineError> {
        if let Err(e) = validate_photo("image", image) {
            tracing::info!(error = %e, "rejected image analysis request");
            return Err(e);
        }

        let prompt = render_analysis_prompt(context);
        let reply = self.call(&prompt, Some(image)).await?;
        let analysis: ImageAnalysis = self.parse(&reply)?;

        tracing::info!(
            phase = %analysis.project_phase,
            progress = analysis.estimated_progress,
            concerns = analysis.concerns.len(),
            "image analysis generated"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_context() {
        assert!(render_analysis_prompt("Second floor framing, week 3")
            .ends_with("Context: Second floor framing, week 3\n"));
        assert!(render_analysis_prompt("   ").ends_with("Context: No additional context provided\n"));
    }
}
