//! # Math Galaxy Quiz
//!
//! 一个面向儿童的数学问答游戏核心（Hành Trình Toán Học - Thám Hiểm Ngân Hà）
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 封装外部出题服务的调用能力
//! - `GeminiClient` - generateContent 原生接口（responseSchema 结构化输出）
//! - `OpenAiCompatClient` - 兼容 OpenAI API 的聊天接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心游戏流程
//! - `QuestionProvider` - 出题能力：prompt 构建 → 调用 → 校验 → 兜底
//!   （永不失败，后端不可用时降级为固定兜底题目）
//!
//! ### ③ 会话层（Session）
//! - `session/state` - 纯状态机：得分/连对/生命/进度与终局判定
//! - `session/controller` - 指令编排：start / submit / advance / snapshot，
//!   取题竞争按"后到者胜"解决
//!
//! ### ④ 渲染层（App，外部协作者）
//! - `app.rs` - 极简终端渲染器，只消费快照、转发玩家意图

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod session;

// 重新导出常用类型
pub use config::{Config, GeneratorBackend};
pub use error::{GameError, GameResult};
pub use models::{Difficulty, Question, Topic};
pub use services::{ProviderOutcome, QuestionProvider, QuestionSource};
pub use session::{AnswerFeedback, GameOutcome, Phase, SessionController, SessionSnapshot};
