//! 会话控制器集成测试
//!
//! 通过脚本化的题目来源驱动控制器，不依赖任何网络。

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use math_galaxy_quiz::error::GameError;
use math_galaxy_quiz::models::{Difficulty, Question, Topic};
use math_galaxy_quiz::services::{ProviderOutcome, QuestionSource};
use math_galaxy_quiz::session::{GameOutcome, Phase, SessionController, STARTING_LIVES};

fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Câu hỏi {}", id),
        options: vec![
            "đúng".to_string(),
            "sai 1".to_string(),
            "sai 2".to_string(),
            "sai 3".to_string(),
        ],
        correct_answer: "đúng".to_string(),
        explanation: "Giải thích".to_string(),
        fun_fact: Some("Các con số là vô tận!".to_string()),
    }
}

fn deck(prefix: &str, count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| question(&format!("{}-{}", prefix, i)))
        .collect()
}

/// 固定题目来源，可设置模拟网络延迟
struct FixedSource {
    questions: Vec<Question>,
    delay: Duration,
}

impl FixedSource {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            delay: Duration::ZERO,
        }
    }
}

impl QuestionSource for FixedSource {
    async fn fetch(
        &self,
        _topic: Topic,
        _difficulty: Difficulty,
        _count: usize,
    ) -> ProviderOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        ProviderOutcome::Generated(self.questions.clone())
    }
}

/// 脚本化来源：每次取题按脚本顺序弹出 (延迟, 题目) 一条
struct ScriptedSource {
    script: Mutex<VecDeque<(Duration, Vec<Question>)>>,
}

impl ScriptedSource {
    fn new(script: Vec<(Duration, Vec<Question>)>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

impl QuestionSource for ScriptedSource {
    async fn fetch(
        &self,
        _topic: Topic,
        _difficulty: Difficulty,
        _count: usize,
    ) -> ProviderOutcome {
        let (delay, questions) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("脚本条目已用尽");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        ProviderOutcome::Generated(questions)
    }
}

async fn start_playing(
    controller: &SessionController<FixedSource>,
    count: usize,
) {
    let snapshot = controller
        .start_session(Topic::Addition, Difficulty::Easy, count)
        .await;
    assert_eq!(snapshot.phase, Phase::Playing);
}

#[tokio::test]
async fn two_correct_answers_score_210() {
    let controller = SessionController::new(FixedSource::new(deck("q", 2)));
    start_playing(&controller, 2).await;

    for _ in 0..2 {
        let feedback = controller.submit_answer("đúng").unwrap();
        assert!(feedback.is_correct);
        controller.advance().unwrap();
    }

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, Phase::Finished);
    assert_eq!(snapshot.score, 210);
    assert_eq!(snapshot.streak, 2);
    assert_eq!(snapshot.lives, STARTING_LIVES);
    assert_eq!(snapshot.outcome, Some(GameOutcome::Cleared));
}

#[tokio::test]
async fn three_misses_end_the_session_out_of_lives() {
    let controller = SessionController::new(FixedSource::new(deck("q", 5)));
    start_playing(&controller, 5).await;

    for i in 0..3 {
        let feedback = controller.submit_answer("sai 1").unwrap();
        assert!(!feedback.is_correct);
        let snapshot = controller.advance().unwrap();
        if i < 2 {
            assert_eq!(snapshot.phase, Phase::Playing);
        } else {
            // 终局只在第 3 次 advance 时发生
            assert_eq!(snapshot.phase, Phase::Finished);
        }
    }

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.lives, 0);
    assert_eq!(snapshot.streak, 0);
    assert_eq!(snapshot.outcome, Some(GameOutcome::OutOfLives));
}

#[tokio::test]
async fn double_submit_leaves_state_unchanged() {
    let controller = SessionController::new(FixedSource::new(deck("q", 3)));
    start_playing(&controller, 3).await;

    let first = controller.submit_answer("đúng").unwrap();
    let before = controller.snapshot();
    let second = controller.submit_answer("sai 1").unwrap();
    let after = controller.snapshot();

    assert_eq!(first, second);
    assert_eq!(before.score, after.score);
    assert_eq!(before.streak, after.streak);
    assert_eq!(before.lives, after.lives);
    assert_eq!(before.current_index, after.current_index);

    // 结算只发生一次，且按第一次提交的结果计
    let snapshot = controller.advance().unwrap();
    assert_eq!(snapshot.score, 100);
    assert_eq!(snapshot.lives, STARTING_LIVES);
}

#[tokio::test]
async fn commands_before_start_are_rejected() {
    let controller = SessionController::new(FixedSource::new(deck("q", 1)));

    assert_eq!(
        controller.submit_answer("4"),
        Err(GameError::InvalidTransition {
            command: "submit_answer",
            phase: Phase::Idle,
        })
    );
    assert!(matches!(
        controller.advance(),
        Err(GameError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn answers_are_rejected_while_loading() {
    let mut source = FixedSource::new(deck("q", 2));
    source.delay = Duration::from_millis(80);
    let controller = SessionController::new(source);

    let (start_snapshot, _) = tokio::join!(
        controller.start_session(Topic::Subtraction, Difficulty::Medium, 2),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert_eq!(
                controller.submit_answer("đúng"),
                Err(GameError::InvalidTransition {
                    command: "submit_answer",
                    phase: Phase::Loading,
                })
            );
        }
    );

    assert_eq!(start_snapshot.phase, Phase::Playing);
}

#[tokio::test]
async fn newer_start_supersedes_inflight_load() {
    let controller = SessionController::new(ScriptedSource::new(vec![
        (Duration::from_millis(120), deck("slow", 3)),
        (Duration::from_millis(10), deck("fast", 3)),
    ]));

    let (_, second_snapshot) = tokio::join!(
        controller.start_session(Topic::Addition, Difficulty::Easy, 3),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller
                .start_session(Topic::Multiplication, Difficulty::Hard, 3)
                .await
        }
    );

    assert_eq!(second_snapshot.phase, Phase::Playing);

    // 只有后一局的题目被装入；先到的慢结果已被丢弃
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.topic, Some(Topic::Multiplication));
    assert!(snapshot.questions.iter().all(|q| q.id.starts_with("fast-")));
}

#[tokio::test]
async fn restart_after_finish_discards_previous_session() {
    let controller = SessionController::new(FixedSource::new(deck("q", 1)));
    start_playing(&controller, 1).await;

    controller.submit_answer("đúng").unwrap();
    let finished = controller.advance().unwrap();
    assert_eq!(finished.phase, Phase::Finished);
    assert_eq!(finished.score, 100);

    let snapshot = controller
        .start_session(Topic::WordProblems, Difficulty::Hard, 1)
        .await;
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.streak, 0);
    assert_eq!(snapshot.lives, STARTING_LIVES);
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.topic, Some(Topic::WordProblems));
}

#[tokio::test]
async fn snapshot_exposes_pending_feedback_during_display() {
    let controller = SessionController::new(FixedSource::new(deck("q", 2)));
    start_playing(&controller, 2).await;

    assert!(controller.snapshot().pending_feedback.is_none());
    controller.submit_answer("sai 2").unwrap();

    let snapshot = controller.snapshot();
    let pending = snapshot.pending_feedback.expect("应有待结算反馈");
    assert!(!pending.is_correct);
    assert_eq!(pending.correct_answer, "đúng");

    controller.advance().unwrap();
    assert!(controller.snapshot().pending_feedback.is_none());
}
