//! 游戏核心错误类型
//!
//! 提供方（Provider）内部的失败不在此处建模：按约定它们永远不会
//! 越过提供方边界，而是被转换为兜底题目。这里只保留会话状态机
//! 暴露给渲染层的错误。

use crate::session::Phase;

/// 游戏核心错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// 指令在当前阶段不可用（说明渲染层或测试的调用顺序有误）
    #[error("指令 {command} 在 {phase:?} 阶段不可用")]
    InvalidTransition {
        /// 被拒绝的指令名
        command: &'static str,
        /// 调用时所处的阶段
        phase: Phase,
    },
    /// advance 被调用时当前题目尚未作答
    #[error("当前题目尚未作答，无法结算")]
    NoPendingAnswer,
}

/// 游戏核心结果类型
pub type GameResult<T> = std::result::Result<T, GameError>;
