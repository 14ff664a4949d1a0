/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 出题后端（gemini 或 openai）
    pub generator_backend: GeneratorBackend,
    /// 每局题目数量
    pub questions_per_session: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- Gemini 原生接口配置 ---
    pub gemini_api_key: String,
    pub gemini_api_base_url: String,
    pub gemini_model_name: String,
    // --- OpenAI 兼容接口配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

/// 出题后端种类
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorBackend {
    /// Gemini generateContent 原生接口（支持 responseSchema）
    Gemini,
    /// 兼容 OpenAI API 的服务（如 Azure, Doubao 等）
    OpenAiCompat,
}

impl GeneratorBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(GeneratorBackend::Gemini),
            "openai" | "openai_compat" => Some(GeneratorBackend::OpenAiCompat),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator_backend: GeneratorBackend::Gemini,
            questions_per_session: 5,
            request_timeout_secs: 30,
            verbose_logging: false,
            gemini_api_key: String::new(),
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model_name: "gemini-2.5-flash".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            generator_backend: std::env::var("GENERATOR_BACKEND").ok().and_then(|v| GeneratorBackend::parse(&v)).unwrap_or(default.generator_backend),
            questions_per_session: std::env::var("QUESTIONS_PER_SESSION").ok().and_then(|v| v.parse().ok()).unwrap_or(default.questions_per_session),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            gemini_api_key: std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("API_KEY")).unwrap_or(default.gemini_api_key),
            gemini_api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(default.gemini_api_base_url),
            gemini_model_name: std::env::var("GEMINI_MODEL_NAME").unwrap_or(default.gemini_model_name),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parse_accepts_known_names() {
        assert_eq!(GeneratorBackend::parse("gemini"), Some(GeneratorBackend::Gemini));
        assert_eq!(GeneratorBackend::parse("OpenAI"), Some(GeneratorBackend::OpenAiCompat));
        assert_eq!(GeneratorBackend::parse("browser"), None);
    }
}
