//! 题目数据结构
//!
//! 与出题服务约定的 JSON 结构一致（字段名为 camelCase）。
//! 题目一经创建即不可变，会话层只读。

use serde::{Deserialize, Serialize};

/// 每道题的固定选项数量
pub const OPTION_COUNT: usize = 4;

/// 单选题
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// 题目唯一标识
    pub id: String,
    /// 题干文本
    pub text: String,
    /// 选项列表（恰好 4 个，互不相同）
    pub options: Vec<String>,
    /// 正确答案（必须与某个选项完全一致）
    pub correct_answer: String,
    /// 答案讲解
    pub explanation: String,
    /// 趣味小知识（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
}

impl Question {
    /// 校验题目是否符合约定结构
    ///
    /// # 返回
    /// 结构完整时返回 `Ok(())`，否则返回第一个发现的缺陷
    pub fn validate(&self) -> Result<(), QuestionFlaw> {
        if self.id.trim().is_empty() {
            return Err(QuestionFlaw::EmptyId);
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionFlaw::WrongOptionCount(self.options.len()));
        }
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].contains(option) {
                return Err(QuestionFlaw::DuplicateOption(option.clone()));
            }
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(QuestionFlaw::AnswerNotInOptions(self.correct_answer.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断题干内容以便显示（最多80个字符）
        let preview = if self.text.chars().count() > 80 {
            self.text.chars().take(80).collect::<String>() + "..."
        } else {
            self.text.clone()
        };
        write!(f, "[{}] {}", self.id, preview)
    }
}

/// 题目校验失败的原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionFlaw {
    /// 题目 ID 为空
    #[error("题目 ID 为空")]
    EmptyId,
    /// 选项数量不是 4
    #[error("选项数量为 {0}，应为 4")]
    WrongOptionCount(usize),
    /// 选项存在重复
    #[error("选项重复: {0}")]
    DuplicateOption(String),
    /// 正确答案不在选项中
    #[error("正确答案 \"{0}\" 不在选项列表中")]
    AnswerNotInOptions(String),
}
