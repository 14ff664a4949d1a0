//! 会话控制器 - 编排层
//!
//! 独占持有 `GameSession`，把渲染层的意图翻译为状态迁移：
//! - `start_session` 是唯一的异步操作（等待出题服务往返）
//! - 取题期间再次 `start_session` 采用"后到者胜"策略，
//!   过期的取题结果通过会话代数比对直接丢弃
//! - 其余指令同步执行，锁只在临界区内短暂持有，从不跨 await

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::error::GameResult;
use crate::models::{Difficulty, Topic};
use crate::services::QuestionSource;
use crate::session::state::{AnswerFeedback, GameSession, SessionSnapshot};

/// 会话控制器
pub struct SessionController<S: QuestionSource> {
    source: S,
    state: Mutex<GameSession>,
    /// 会话代数，每次 start_session 递增；用于识别过期的取题结果
    generation: AtomicU64,
}

impl<S: QuestionSource> SessionController<S> {
    /// 创建控制器（会话处于 Idle）
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(GameSession::new()),
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameSession> {
        // 锁中毒只可能来自持锁代码 panic，状态本身仍然一致
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 开始新会话
    ///
    /// 任何阶段都可调用，上一局（含取题中的）被整体替换。
    /// 等待出题服务期间不持有状态锁；结果到达时若本次会话
    /// 已被更新的调用取代，则丢弃结果并返回当前快照。
    pub async fn start_session(
        &self,
        topic: Topic,
        difficulty: Difficulty,
        count: usize,
    ) -> SessionSnapshot {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.lock();
            state.begin_loading(topic, difficulty);
        }

        info!(
            "📦 会话 #{} 开始取题: 主题「{}」难度「{}」",
            generation, topic, difficulty
        );

        let outcome = self.source.fetch(topic, difficulty, count).await;

        let mut state = self.lock();

        if self.generation.load(Ordering::SeqCst) != generation {
            // 过期结果，按约定静默丢弃
            debug!("会话 #{} 已被取代，忽略其取题结果", generation);
            return state.snapshot();
        }

        let (questions, used_fallback) = outcome.into_parts();
        info!(
            "🎮 会话 #{} 进入作答阶段: {} 道题{}",
            generation,
            questions.len(),
            if used_fallback { "（兜底）" } else { "" }
        );
        state.install_questions(questions, used_fallback);

        state.snapshot()
    }

    /// 提交作答
    ///
    /// 仅在作答阶段有效；反馈展示期间重复提交是幂等空操作。
    pub fn submit_answer(&self, choice: &str) -> GameResult<AnswerFeedback> {
        self.lock().submit(choice)
    }

    /// 结算当前作答并推进到下一题（或终局）
    pub fn advance(&self) -> GameResult<SessionSnapshot> {
        let mut state = self.lock();
        state.advance()?;
        Ok(state.snapshot())
    }

    /// 获取只读快照
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }
}
