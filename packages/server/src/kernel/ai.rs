// AI implementation using the OpenAI-compatible client
//
// This is the infrastructure implementation of BaseAI.
// Prompts and output parsing live in the feedback domain.

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{truncate_to_char_boundary, ChatRequest, OpenAIClient};

use super::BaseAI;

#[async_trait]
impl BaseAI for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<String> {
        let model = request.model.clone();
        let prompt_preview = request
            .last_user_content()
            .map(|p| truncate_to_char_boundary(p, 200).to_string())
            .unwrap_or_default();

        tracing::info!(model = %model, "Calling chat completion API");

        let response = self
            .chat_completion(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %model,
                    prompt_preview = %prompt_preview,
                    "Chat completion call failed"
                );
                e
            })
            .context("Failed to call chat completion API")?;

        tracing::info!(
            response_length = response.content.len(),
            model = %model,
            "Chat completion response received"
        );

        Ok(response.content)
    }
}
