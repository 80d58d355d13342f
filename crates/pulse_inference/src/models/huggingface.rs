use std::fmt;

use async_trait::async_trait;
use pulse_core::{Error, Result, Summarizer, SummaryTier};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
/// Extreme summarization, used for the headline-style tier.
pub const SHORT_MODEL: &str = "facebook/bart-large-xsum";
pub const DETAILED_MODEL: &str = "facebook/bart-large-cnn";

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
    options: RequestOptions,
}

#[derive(Serialize)]
struct SummarizationParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Summarizer backed by the Hugging Face Inference API.
pub struct HuggingFaceModel {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl HuggingFaceModel {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model_for(tier: SummaryTier) -> &'static str {
        match tier {
            SummaryTier::Short => SHORT_MODEL,
            SummaryTier::Medium | SummaryTier::Full => DETAILED_MODEL,
        }
    }

    fn endpoint(&self, tier: SummaryTier) -> String {
        format!("{}/{}", self.base_url, Self::model_for(tier))
    }
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl Summarizer for HuggingFaceModel {
    fn name(&self) -> &str {
        "HuggingFace"
    }

    async fn summarize(&self, text: &str, tier: SummaryTier) -> Result<String> {
        let (min_length, max_length) = tier.length_bounds();
        let request = SummarizationRequest {
            inputs: text,
            parameters: SummarizationParameters {
                min_length,
                max_length,
                do_sample: false,
            },
            options: RequestOptions { wait_for_model: true },
        };

        let mut builder = self.client.post(self.endpoint(tier)).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "{} returned {}: {}",
                Self::model_for(tier),
                status,
                body
            )));
        }

        let outputs = response.json::<Vec<SummaryOutput>>().await?;
        let summary = outputs
            .into_iter()
            .next()
            .map(|o| o.summary_text.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::Inference(format!("{} returned no summary", Self::model_for(tier)))
            })?;

        debug!(tier = %tier, chars = pulse_core::char_len(&summary), "Summary generated");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_model_per_tier() {
        assert_eq!(HuggingFaceModel::model_for(SummaryTier::Short), SHORT_MODEL);
        assert_eq!(HuggingFaceModel::model_for(SummaryTier::Medium), DETAILED_MODEL);
        assert_eq!(HuggingFaceModel::model_for(SummaryTier::Full), DETAILED_MODEL);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(HuggingFaceModel::new(None, Some("not a url".to_string())).is_err());
    }

    #[tokio::test]
    async fn test_sends_tier_bounds() {
        let router = Router::new().route(
            "/facebook/bart-large-cnn",
            post(|Json(body): Json<Value>| async move {
                let params = &body["parameters"];
                Json(json!([{
                    "summary_text": format!(
                        "{}-{} sample={}",
                        params["min_length"], params["max_length"], params["do_sample"]
                    )
                }]))
            }),
        );
        let base = serve(router).await;
        let model = HuggingFaceModel::new(Some("token".to_string()), Some(base)).unwrap();

        let summary = model.summarize("text", SummaryTier::Full).await.unwrap();
        assert_eq!(summary, "150-300 sample=false");
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let router = Router::new().route(
            "/facebook/bart-large-xsum",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "loading"}))) }),
        );
        let base = serve(router).await;
        let model = HuggingFaceModel::new(None, Some(base)).unwrap();

        let err = model.summarize("text", SummaryTier::Short).await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_empty_output_is_an_error() {
        let router = Router::new().route(
            "/facebook/bart-large-cnn",
            post(|| async { Json(json!([])) }),
        );
        let base = serve(router).await;
        let model = HuggingFaceModel::new(None, Some(base)).unwrap();
        assert!(model.summarize("text", SummaryTier::Medium).await.is_err());
    }

    #[tokio::test]
    async fn test_multibyte_summary_is_trimmed_not_split() {
        let router = Router::new().route(
            "/facebook/bart-large-xsum",
            post(|| async {
                Json(json!([{"summary_text": "  Zürich café räumt Preis ab ☕  "}]))
            }),
        );
        let base = serve(router).await;
        let model = HuggingFaceModel::new(None, Some(base)).unwrap();

        let summary = model.summarize("text", SummaryTier::Short).await.unwrap();
        assert_eq!(summary, "Zürich café räumt Preis ab ☕");
        assert_eq!(pulse_core::char_len(&summary), 28);
        assert!(summary.len() > 28);
    }
}
