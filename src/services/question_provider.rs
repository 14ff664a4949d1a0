//! 出题服务 - 业务能力层
//!
//! 只负责"按主题和难度生成一批合规题目"这一项能力：
//! - 构建 prompt 并调用出题后端（Gemini 原生或 OpenAI 兼容接口）
//! - 解析并逐条校验返回的 JSON 题目
//! - 任何失败（网络、密钥缺失、解析、校验全灭）都不向调用方抛错，
//!   而是降级为固定的兜底题目
//!
//! 不出现会话状态，不关心游戏流程顺序。

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::clients::{GeminiClient, OpenAiCompatClient};
use crate::config::{Config, GeneratorBackend};
use crate::logger::truncate_text;
use crate::models::{Difficulty, Question, Topic};

/// 出题结果
///
/// 区分"正常生成"与"降级兜底"，两种情况下题目都保证合规可玩。
#[derive(Debug, Clone)]
pub enum ProviderOutcome {
    /// 后端正常生成的题目
    Generated(Vec<Question>),
    /// 后端不可用时的兜底题目
    Fallback(Vec<Question>),
}

impl ProviderOutcome {
    /// 题目列表
    pub fn questions(&self) -> &[Question] {
        match self {
            ProviderOutcome::Generated(questions) | ProviderOutcome::Fallback(questions) => {
                questions
            }
        }
    }

    /// 是否为兜底结果
    pub fn is_fallback(&self) -> bool {
        matches!(self, ProviderOutcome::Fallback(_))
    }

    /// 拆解为 (题目列表, 是否兜底)
    pub fn into_parts(self) -> (Vec<Question>, bool) {
        match self {
            ProviderOutcome::Generated(questions) => (questions, false),
            ProviderOutcome::Fallback(questions) => (questions, true),
        }
    }
}

/// 题目来源抽象
///
/// 会话控制器只依赖这一能力，测试可注入脚本化实现。
pub trait QuestionSource {
    /// 获取一批题目，永不失败
    fn fetch(
        &self,
        topic: Topic,
        difficulty: Difficulty,
        count: usize,
    ) -> impl std::future::Future<Output = ProviderOutcome> + Send;
}

/// 出题后端
enum Backend {
    Gemini(GeminiClient),
    OpenAiCompat(OpenAiCompatClient),
}

/// 出题服务
pub struct QuestionProvider {
    backend: Backend,
}

impl QuestionProvider {
    /// 按配置创建出题服务
    pub fn new(config: &Config) -> Result<Self> {
        let backend = match config.generator_backend {
            GeneratorBackend::Gemini => Backend::Gemini(GeminiClient::new(config)?),
            GeneratorBackend::OpenAiCompat => {
                Backend::OpenAiCompat(OpenAiCompatClient::new(config))
            }
        };
        Ok(Self { backend })
    }

    /// 单次生成尝试（失败直接上抛，由 fetch 统一兜底）
    async fn generate(
        &self,
        topic: Topic,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>> {
        let prompt = build_prompt(topic, difficulty, count);

        let raw = match &self.backend {
            Backend::Gemini(client) => {
                if !client.has_credentials() {
                    anyhow::bail!("未配置 Gemini API 密钥");
                }
                client.generate_json(&prompt, question_schema()).await?
            }
            Backend::OpenAiCompat(client) => {
                if !client.has_credentials() {
                    anyhow::bail!("未配置 LLM API 密钥");
                }
                let user_message = format!("{}\n{}", prompt, JSON_OUTPUT_RULES);
                client
                    .send_to_llm(&user_message, Some(SYSTEM_MESSAGE))
                    .await?
            }
        };

        debug!("后端原始输出: {}", truncate_text(&raw, 200));

        let parsed = parse_questions(&raw)?;
        let valid = validate_batch(parsed, count);

        if valid.is_empty() {
            anyhow::bail!("所有返回的题目都未通过校验");
        }

        Ok(valid)
    }
}

impl QuestionSource for QuestionProvider {
    /// 获取一批题目
    ///
    /// 约定：本函数永不失败。一次后端调用失败即降级为兜底题目，
    /// 不做重试——游戏的可玩性不依赖第三方可用性。
    async fn fetch(&self, topic: Topic, difficulty: Difficulty, count: usize) -> ProviderOutcome {
        info!("🧮 正在生成题目: 主题「{}」难度「{}」共 {} 道", topic, difficulty, count);

        match self.generate(topic, difficulty, count).await {
            Ok(questions) => {
                info!("✓ 成功生成 {} 道题目", questions.len());
                ProviderOutcome::Generated(questions)
            }
            Err(e) => {
                warn!("⚠️ 出题失败，使用兜底题目: {:#}", e);
                ProviderOutcome::Fallback(vec![fallback_question()])
            }
        }
    }
}

/// OpenAI 兼容路径的系统消息（Gemini 路径用 responseSchema 约束，无需此消息）
const SYSTEM_MESSAGE: &str = "You are a fun and energetic elementary school math teacher \
designed to create engaging content for children aged 6-11. \
You always answer with machine-readable JSON and nothing else.";

/// OpenAI 兼容路径追加的输出格式要求
const JSON_OUTPUT_RULES: &str = r#"Return ONLY a JSON array (no markdown, no commentary).
Each element must be an object with fields:
  "id": string, "text": string, "options": array of exactly 4 strings,
  "correctAnswer": string (must equal one of the options),
  "explanation": string, "funFact": string (optional)."#;

/// 构建出题 prompt
///
/// 面向 6-11 岁儿童，输出必须为越南语。
fn build_prompt(topic: Topic, difficulty: Difficulty, count: usize) -> String {
    format!(
        r#"You are a fun and energetic elementary school math teacher designed to create engaging content for children aged 6-11.

IMPORTANT: ALL OUTPUT MUST BE IN VIETNAMESE (Tiếng Việt).

Create {count} multiple-choice math questions about "{topic}" at a "{difficulty}" level.

Guidelines:
- {easy}
- {medium}
- {hard}
- Make the "text" of the question fun. Use names of animals, fruits, or space themes if possible.
- Provide an "explanation" that is encouraging and educational.
- Provide a "funFact" related to numbers or the topic.
- Ensure "options" has exactly 4 choices.
- Ensure "correctAnswer" matches exactly one of the options."#,
        count = count,
        topic = topic.name(),
        difficulty = difficulty.name(),
        easy = Difficulty::Easy.guideline(),
        medium = Difficulty::Medium.guideline(),
        hard = Difficulty::Hard.guideline(),
    )
}

/// 题目数组的 responseSchema（Gemini 原生接口用）
fn question_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "text": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                },
                "correctAnswer": { "type": "STRING" },
                "explanation": { "type": "STRING" },
                "funFact": { "type": "STRING" }
            },
            "required": ["id", "text", "options", "correctAnswer", "explanation"]
        }
    })
}

/// 解析后端返回的题目 JSON
///
/// 模型偶尔会把 JSON 包在 markdown 代码块里，先剥掉再解析。
fn parse_questions(raw: &str) -> Result<Vec<Question>> {
    let re = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```")?;
    let cleaned = match re.captures(raw) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(raw),
        None => raw,
    };

    let questions: Vec<Question> =
        serde_json::from_str(cleaned.trim()).context("解析题目 JSON 失败")?;

    if questions.is_empty() {
        anyhow::bail!("后端返回了空的题目列表");
    }

    Ok(questions)
}

/// 逐条校验题目，丢弃不合规或 ID 重复的记录，并截断到目标数量
fn validate_batch(questions: Vec<Question>, count: usize) -> Vec<Question> {
    let mut seen_ids: Vec<String> = Vec::new();
    let mut valid = Vec::new();

    for question in questions {
        if let Err(flaw) = question.validate() {
            warn!("⚠️ 丢弃不合规题目 {}: {}", question, flaw);
            continue;
        }
        if seen_ids.contains(&question.id) {
            warn!("⚠️ 丢弃 ID 重复的题目: {}", question.id);
            continue;
        }
        seen_ids.push(question.id.clone());
        valid.push(question);

        if valid.len() == count {
            break;
        }
    }

    valid
}

/// 兜底题目
///
/// 后端不可用时保证游戏仍有一道合规题目可玩。
pub fn fallback_question() -> Question {
    Question {
        id: "fallback-1".to_string(),
        text: "Rất tiếc! Tín hiệu vũ trụ bị nhiễu. 2 + 2 bằng mấy?".to_string(),
        options: vec![
            "3".to_string(),
            "4".to_string(),
            "5".to_string(),
            "22".to_string(),
        ],
        correct_answer: "4".to_string(),
        explanation: "2 cộng 2 luôn luôn bằng 4!".to_string(),
        fun_fact: Some("Các con số là vô tận!".to_string()),
    }
}
