//! 终端渲染层
//!
//! 游戏核心的外部协作者：只读取快照、打印画面、把玩家输入
//! 翻译为控制器指令。所有面向玩家的文案为越南语。

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::Config;
use crate::models::{Difficulty, Topic};
use crate::services::QuestionProvider;
use crate::session::{GameOutcome, Phase, SessionController};

/// 应用主结构
pub struct App {
    config: Config,
    controller: SessionController<QuestionProvider>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let provider = QuestionProvider::new(&config)?;
        Ok(Self {
            controller: SessionController::new(provider),
            config,
        })
    }

    /// 运行应用主循环
    pub async fn run(&self) -> Result<()> {
        print_welcome();
        if !prompt_enter_or_quit()? {
            return Ok(());
        }

        loop {
            let Some((topic, difficulty)) = prompt_topic_and_difficulty()? else {
                break;
            };

            println!("\n🧙 Đang hỏi Phù thủy Toán học...\n");
            self.controller
                .start_session(topic, difficulty, self.config.questions_per_session)
                .await;

            self.play_current_session()?;

            if !prompt_play_again()? {
                break;
            }
        }

        println!("Hẹn gặp lại nhé! 👋");
        Ok(())
    }

    /// 单局作答循环：出题 → 提交 → 反馈 → 推进
    fn play_current_session(&self) -> Result<()> {
        loop {
            let snapshot = self.controller.snapshot();
            if snapshot.phase != Phase::Playing {
                break;
            }
            let Some(question) = snapshot.current_question() else {
                break;
            };

            println!("{}", "─".repeat(50));
            println!(
                "⭐ {}  ❤️ {}  |  Câu {} / {}",
                snapshot.score,
                snapshot.lives,
                snapshot.current_index + 1,
                snapshot.total_questions
            );
            println!("\n{}\n", question.text);
            for (i, option) in question.options.iter().enumerate() {
                println!("  {}. {}", i + 1, option);
            }

            let choice = prompt_option_choice(&question.options)?;
            let feedback = match self.controller.submit_answer(&choice) {
                Ok(feedback) => feedback,
                Err(e) => {
                    // 渲染层与状态机脱节属于程序缺陷，记录后终止本局
                    warn!("状态机拒绝了提交: {}", e);
                    break;
                }
            };

            if feedback.is_correct {
                println!("\n✅ Tuyệt vời!");
            } else {
                println!("\n❌ Chưa chính xác! Đáp án đúng: {}", feedback.correct_answer);
            }
            println!("{}", feedback.explanation);
            if feedback.is_correct {
                if let Some(fun_fact) = &feedback.fun_fact {
                    println!("💡 Sự thật thú vị: {}", fun_fact);
                }
            }

            prompt_continue()?;
            self.controller.advance().context("推进会话失败")?;
        }

        self.print_game_over();
        Ok(())
    }

    /// 结算画面
    fn print_game_over(&self) {
        let snapshot = self.controller.snapshot();
        println!("\n{}", "=".repeat(50));
        match snapshot.outcome {
            Some(GameOutcome::Cleared) => {
                println!("🏆 Nhiệm Vụ Hoàn Thành!");
                println!("Bạn là siêu sao toán học!");
            }
            _ => {
                println!("🔄 Thử lại nào!");
                println!("Hãy tiếp tục luyện tập nhé, bạn sẽ làm được!");
            }
        }
        println!("Tổng Điểm: {}", snapshot.score);
        println!("Chuỗi Thắng: {} 🔥", snapshot.streak);
        println!("{}", "=".repeat(50));
    }
}

fn print_welcome() {
    println!("{}", "=".repeat(50));
    println!("🚀 Hành Trình Toán Học");
    println!("   Thám Hiểm Ngân Hà");
    println!("{}", "=".repeat(50));
}

fn read_line() -> Result<String> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("读取输入失败")?;
    Ok(line.trim().to_string())
}

/// 欢迎画面：回车开始，q 退出
fn prompt_enter_or_quit() -> Result<bool> {
    println!("Bắt đầu ngay! (Enter để chơi, q để thoát)");
    Ok(!read_line()?.eq_ignore_ascii_case("q"))
}

/// 主题与难度选择；返回 None 表示玩家退出
fn prompt_topic_and_difficulty() -> Result<Option<(Topic, Difficulty)>> {
    println!("\n🧠 Chọn Chủ Đề:");
    for (i, topic) in Topic::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, topic);
    }
    let topic = loop {
        let line = read_line()?;
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<usize>().ok().and_then(Topic::from_index) {
            Some(topic) => break topic,
            None => println!("Chọn từ 1 đến {} nhé!", Topic::ALL.len()),
        }
    };

    println!("\n✨ Chọn Độ Khó:");
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, difficulty);
    }
    let difficulty = loop {
        let line = read_line()?;
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match line.parse::<usize>().ok().and_then(Difficulty::from_index) {
            Some(difficulty) => break difficulty,
            None => println!("Chọn từ 1 đến {} nhé!", Difficulty::ALL.len()),
        }
    };

    Ok(Some((topic, difficulty)))
}

/// 选项选择（序号），返回对应的选项文本
fn prompt_option_choice(options: &[String]) -> Result<String> {
    loop {
        let line = read_line()?;
        if let Some(option) = line
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| options.get(i))
        {
            return Ok(option.clone());
        }
        println!("Chọn từ 1 đến {} nhé!", options.len());
    }
}

fn prompt_continue() -> Result<()> {
    println!("\n(Enter để tiếp tục)");
    read_line()?;
    Ok(())
}

fn prompt_play_again() -> Result<bool> {
    println!("\nChơi Lại? (Enter để chơi tiếp, q để thoát)");
    Ok(!read_line()?.eq_ignore_ascii_case("q"))
}
