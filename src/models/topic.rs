//! 题目分类与难度枚举
//!
//! 所有面向玩家的名称均为越南语（游戏目标语言），
//! 同时也是发给出题服务的内容参数。

use serde::{Deserialize, Serialize};

/// 题目主题枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// 加法
    Addition,
    /// 减法
    Subtraction,
    /// 乘法
    Multiplication,
    /// 除法
    Division,
    /// 应用题
    WordProblems,
}

impl Topic {
    /// 全部主题（用于菜单展示，顺序固定）
    pub const ALL: [Topic; 5] = [
        Topic::Addition,
        Topic::Subtraction,
        Topic::Multiplication,
        Topic::Division,
        Topic::WordProblems,
    ];

    /// 获取越南语名称（同时作为 prompt 中的主题参数）
    pub fn name(self) -> &'static str {
        match self {
            Topic::Addition => "Phép cộng",
            Topic::Subtraction => "Phép trừ",
            Topic::Multiplication => "Phép nhân",
            Topic::Division => "Phép chia",
            Topic::WordProblems => "Toán đố",
        }
    }

    /// 从菜单序号解析主题（从1开始）
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(Topic::Addition),
            2 => Some(Topic::Subtraction),
            3 => Some(Topic::Multiplication),
            4 => Some(Topic::Division),
            5 => Some(Topic::WordProblems),
            _ => None,
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 难度枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单
    Easy,
    /// 中等
    Medium,
    /// 困难
    Hard,
}

impl Difficulty {
    /// 全部难度（用于菜单展示）
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// 获取越南语名称（同时作为 prompt 中的难度参数）
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Dễ",
            Difficulty::Medium => "Trung bình",
            Difficulty::Hard => "Khó",
        }
    }

    /// 该难度在 prompt 中的出题要求说明
    pub fn guideline(self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "EASY (Dễ): Single digit numbers, visual counting logic, very simple language."
            }
            Difficulty::Medium => {
                "MEDIUM (Trung bình): Double digit numbers, simple remainders, standard equations."
            }
            Difficulty::Hard => {
                "HARD (Khó): Triple digits, multi-step logic, or slightly complex word problems suitable for 5th graders."
            }
        }
    }

    /// 从菜单序号解析难度（从1开始）
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_index_roundtrip() {
        for (i, topic) in Topic::ALL.iter().enumerate() {
            assert_eq!(Topic::from_index(i + 1), Some(*topic));
        }
        assert_eq!(Topic::from_index(0), None);
        assert_eq!(Topic::from_index(6), None);
    }

    #[test]
    fn difficulty_names_are_vietnamese() {
        assert_eq!(Difficulty::Easy.name(), "Dễ");
        assert_eq!(Difficulty::Medium.name(), "Trung bình");
        assert_eq!(Difficulty::Hard.name(), "Khó");
    }
}
