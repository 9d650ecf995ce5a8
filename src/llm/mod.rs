//! 语言模型客户端
//!
//! 定义模型调用接口与 Gemini REST 客户端。API Key 缺失时返回降级实现，
//! 进程仍可启动，每次调用以模型错误形式进入编排器的降级路径。

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::config::ModelConfig;
use crate::error::{AppError, Result};

/// 固定采样参数（不对用户开放配置）
#[derive(Debug, Clone, Copy)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

/// 语言模型调用接口
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 生成回复
    ///
    /// `model` 为调用方选定的模型标识；失败以 `AppError::Model` 返回，
    /// 由编排器转换为降级消息，绝不向 HTTP 调用方传播。
    async fn generate(
        &self,
        model: &str,
        system_instruction: &str,
        user_turn: &str,
    ) -> Result<String>;
}

/// Gemini generateContent 客户端
pub struct GeminiModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    sampling: SamplingConfig,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiModel {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            sampling: SamplingConfig::default(),
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(
        &self,
        model: &str,
        system_instruction: &str,
        user_turn: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "system_instruction": {
                    "parts": [{ "text": system_instruction }]
                },
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": user_turn }]
                }],
                "generationConfig": {
                    "temperature": self.sampling.temperature,
                    "topP": self.sampling.top_p,
                    "topK": self.sampling.top_k,
                    "maxOutputTokens": self.sampling.max_output_tokens
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Model(format!(
                "Model request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response.json().await?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Model(
                "Model returned an empty response".to_string(),
            ));
        }

        Ok(text)
    }
}

/// API Key 未配置时的降级实现
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    async fn generate(
        &self,
        _model: &str,
        _system_instruction: &str,
        _user_turn: &str,
    ) -> Result<String> {
        Err(AppError::Model(
            "Language model API key is not configured".to_string(),
        ))
    }
}

/// 根据配置创建语言模型客户端
///
/// API Key 缺失不是启动错误：返回 DisabledModel，由每个轮次降级处理。
pub fn create_language_model(config: &ModelConfig) -> Result<Box<dyn LanguageModel>> {
    match &config.api_key {
        Some(api_key) if !api_key.is_empty() => {
            let model = GeminiModel::new(&config.base_url, api_key, config.request_timeout)?;
            Ok(Box::new(model))
        }
        _ => {
            tracing::warn!("Model API key not configured, chat turns will return degraded replies");
            Ok(Box::new(DisabledModel))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_parses_candidate_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash-lite:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "It is sunny today." }],
                        "role": "model"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let model = GeminiModel::new(&server.uri(), "test-key", 5).unwrap();
        let reply = model
            .generate("gemini-2.0-flash-lite", "You are helpful.", "Weather?")
            .await
            .unwrap();

        assert_eq!(reply, "It is sunny today.");
    }

    #[tokio::test]
    async fn test_generate_non_success_status_is_model_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let model = GeminiModel::new(&server.uri(), "test-key", 5).unwrap();
        let err = model
            .generate("gemini-2.0-flash-lite", "sys", "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Model(_)));
    }

    #[tokio::test]
    async fn test_generate_empty_candidates_is_model_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let model = GeminiModel::new(&server.uri(), "test-key", 5).unwrap();
        let err = model
            .generate("gemini-2.0-flash-lite", "sys", "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Model(_)));
    }

    #[tokio::test]
    async fn test_disabled_model_always_errors() {
        let model = DisabledModel;
        let err = model.generate("any", "sys", "hi").await.unwrap_err();
        assert!(matches!(err, AppError::Model(_)));
    }

    #[test]
    fn test_factory_without_api_key_returns_disabled() {
        let config = ModelConfig {
            api_key: None,
            ..ModelConfig::default()
        };
        // 构造成功即可：缺失的 Key 不会让启动失败
        assert!(create_language_model(&config).is_ok());
    }
}
