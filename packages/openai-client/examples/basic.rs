//! Basic chat completion against an OpenAI-compatible host

use openai_client::{ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment; point at Groq when LLM_BASE_URL is set
    let mut client = OpenAIClient::from_env()?;
    if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
        client = client.with_base_url(base_url);
    }

    let response = client
        .chat_completion(
            ChatRequest::new("llama3-8b-8192")
                .message(Message::system(
                    "You are a sentiment analysis assistant. Respond with only one word: Positive, Negative, or Neutral.",
                ))
                .message(Message::user(
                    "Analyze the sentiment of this feedback: \"Love the new dark mode!\"",
                ))
                .temperature(0.3)
                .max_tokens(10),
        )
        .await?;

    println!("Sentiment: {}", response.content.trim());
    if let Some(usage) = response.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
