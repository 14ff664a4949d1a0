//! 会话状态机 - 纯状态层
//!
//! 持有一局游戏的全部可变状态（得分、连对、生命、进度），
//! 不做任何 IO，不关心题目从哪里来。
//!
//! 作答分两步提交：
//! 1. `submit` 记录选择并判定对错，供渲染层展示反馈，不改动计分
//! 2. `advance` 结算得分/连对/生命，推进题目游标，并基于结算后的
//!    状态原子地判定终局（而不是结算前的旧值）

use serde::Serialize;

use crate::error::{GameError, GameResult};
use crate::models::{Difficulty, Question, Topic};

/// 每局初始生命数
pub const STARTING_LIVES: u32 = 3;
/// 答对一题的基础得分
pub const BASE_POINTS: u32 = 100;
/// 连对的每级加分
pub const STREAK_BONUS: u32 = 10;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// 未开始
    Idle,
    /// 正在向出题服务取题
    Loading,
    /// 作答中
    Playing,
    /// 已结束
    Finished,
}

/// 终局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOutcome {
    /// 通关（仍有生命且得分为正）
    Cleared,
    /// 失败
    OutOfLives,
}

/// 单题作答反馈
///
/// 渲染层据此展示对错、正确答案和讲解，此时计分尚未发生。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerFeedback {
    /// 是否答对
    pub is_correct: bool,
    /// 正确答案
    pub correct_answer: String,
    /// 答案讲解
    pub explanation: String,
    /// 趣味小知识（可选）
    pub fun_fact: Option<String>,
}

/// 待结算的作答记录
#[derive(Debug, Clone)]
struct PendingAnswer {
    feedback: AnswerFeedback,
}

/// 一局游戏的状态记录
#[derive(Debug)]
pub struct GameSession {
    phase: Phase,
    score: u32,
    streak: u32,
    lives: u32,
    questions: Vec<Question>,
    current_index: usize,
    topic: Option<Topic>,
    difficulty: Option<Difficulty>,
    pending: Option<PendingAnswer>,
    used_fallback: bool,
}

impl GameSession {
    /// 创建空会话（Idle）
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            score: 0,
            streak: 0,
            lives: STARTING_LIVES,
            questions: Vec::new(),
            current_index: 0,
            topic: None,
            difficulty: None,
            pending: None,
            used_fallback: false,
        }
    }

    /// 当前阶段
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 进入取题阶段
    ///
    /// 完全丢弃上一局的状态，不保留任何部分结果。
    pub fn begin_loading(&mut self, topic: Topic, difficulty: Difficulty) {
        *self = Self::new();
        self.phase = Phase::Loading;
        self.topic = Some(topic);
        self.difficulty = Some(difficulty);
    }

    /// 装入题目并进入作答阶段
    pub fn install_questions(&mut self, questions: Vec<Question>, used_fallback: bool) {
        self.questions = questions;
        self.used_fallback = used_fallback;
        self.score = 0;
        self.streak = 0;
        self.lives = STARTING_LIVES;
        self.current_index = 0;
        self.pending = None;
        self.phase = Phase::Playing;
    }

    /// 当前题目
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// 记录作答
    ///
    /// 只判定对错并记录选择，计分在 `advance` 时才发生。
    /// 已有待结算作答时重复调用是幂等空操作，原样返回已记录的反馈，
    /// 防止渲染层在反馈展示期间重复提交。
    pub fn submit(&mut self, choice: &str) -> GameResult<AnswerFeedback> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidTransition {
                command: "submit_answer",
                phase: self.phase,
            });
        }

        if let Some(pending) = &self.pending {
            return Ok(pending.feedback.clone());
        }

        // Playing 阶段游标必定落在有效题目上
        let question = self.questions.get(self.current_index).ok_or(
            GameError::InvalidTransition {
                command: "submit_answer",
                phase: self.phase,
            },
        )?;

        let feedback = AnswerFeedback {
            is_correct: choice == question.correct_answer,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
            fun_fact: question.fun_fact.clone(),
        };

        self.pending = Some(PendingAnswer {
            feedback: feedback.clone(),
        });

        Ok(feedback)
    }

    /// 结算当前作答并推进
    ///
    /// 终局条件基于结算后的状态判定：生命归零或题目耗尽。
    pub fn advance(&mut self) -> GameResult<Phase> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidTransition {
                command: "advance",
                phase: self.phase,
            });
        }

        let pending = self.pending.take().ok_or(GameError::NoPendingAnswer)?;

        if pending.feedback.is_correct {
            // 连对加成按本次结算前的连对数计
            self.score += BASE_POINTS + STREAK_BONUS * self.streak;
            self.streak += 1;
        } else {
            self.streak = 0;
            self.lives = self.lives.saturating_sub(1);
        }

        self.current_index += 1;

        if self.lives == 0 || self.current_index == self.questions.len() {
            self.phase = Phase::Finished;
        }

        Ok(self.phase)
    }

    /// 终局结果（仅 Finished 阶段返回）
    ///
    /// 沿用原版的胜利判定：仍有生命且得分为正才算通关。
    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.phase != Phase::Finished {
            return None;
        }
        if self.lives > 0 && self.score > 0 {
            Some(GameOutcome::Cleared)
        } else {
            Some(GameOutcome::OutOfLives)
        }
    }

    /// 生成只读快照
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            score: self.score,
            streak: self.streak,
            lives: self.lives,
            current_index: self.current_index,
            total_questions: self.questions.len(),
            questions: self.questions.clone(),
            topic: self.topic,
            difficulty: self.difficulty,
            pending_feedback: self.pending.as_ref().map(|p| p.feedback.clone()),
            outcome: self.outcome(),
            used_fallback: self.used_fallback,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// 会话只读快照
///
/// 渲染层唯一的观察窗口，不含任何内部可变引用。
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub score: u32,
    pub streak: u32,
    pub lives: u32,
    pub current_index: usize,
    pub total_questions: usize,
    pub questions: Vec<Question>,
    pub topic: Option<Topic>,
    pub difficulty: Option<Difficulty>,
    pub pending_feedback: Option<AnswerFeedback>,
    pub outcome: Option<GameOutcome>,
    pub used_fallback: bool,
}

impl SessionSnapshot {
    /// 当前题目
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }
}
