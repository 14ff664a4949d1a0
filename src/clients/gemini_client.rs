/// Gemini API 客户端
///
/// 封装 generateContent 原生接口的调用逻辑，
/// 支持 responseSchema 约束的结构化 JSON 输出
use crate::config::Config;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("构建 HTTP 客户端失败")?;

        Ok(Self {
            http,
            base_url: config.gemini_api_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model_name: config.gemini_model_name.clone(),
        })
    }

    /// 是否配置了 API 密钥
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// 调用 generateContent 生成结构化 JSON
    ///
    /// # 参数
    /// - `prompt`: 用户提示词
    /// - `response_schema`: 期望的输出 JSON Schema
    ///
    /// # 返回
    /// 返回模型输出的 JSON 文本（未解析）
    pub async fn generate_json(&self, prompt: &str, response_schema: Value) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model_name
        );

        let payload = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema
            }
        });

        debug!("调用 Gemini API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Gemini API 请求失败")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Gemini API 响应不是合法 JSON")?;

        if !status.is_success() {
            anyhow::bail!("Gemini API 返回错误状态 {}: {}", status, body);
        }

        debug!("Gemini API 调用成功");

        let text = Self::extract_text(&body)
            .ok_or_else(|| anyhow::anyhow!("Gemini 返回内容为空"))?;

        Ok(text.trim().to_string())
    }

    /// 提取首个候选回答的全部文本片段
    fn extract_text(body: &Value) -> Option<String> {
        let parts = body
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .as_array()?;

        let mut text = String::new();
        for part in parts {
            if let Some(fragment) = part.get("text").and_then(|v| v.as_str()) {
                text.push_str(fragment);
            }
        }

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
