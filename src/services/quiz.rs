use rand::Rng;
use serde::Serialize;

use crate::db::operations::quiz::{self, CorrectAnswerEntry, QuizQuestion};
use crate::db::Database;

#[derive(Debug)]
pub enum AnswerOutcome {
    Graded {
        /// Correctness of the recorded attempt. A repeat submission reports
        /// the stored first attempt, not the new answer.
        correct: bool,
        correct_answer: String,
        already_completed: bool,
    },
    QuestionNotFound,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStatistics {
    pub total_questions: i64,
    pub completed: i64,
    pub correct: i64,
    pub accuracy_rate: f64,
}

/// Uniform random pick among questions the user has not completed yet.
pub async fn random_question(
    db: &Database,
    user_id: &str,
) -> Result<Option<QuizQuestion>, sqlx::Error> {
    let candidates = quiz::list_unanswered_for_user(db, user_id).await?;
    if candidates.is_empty() {
        return Ok(None);
    }
    let index = rand::rng().random_range(0..candidates.len());
    Ok(Some(candidates[index].clone()))
}

/// Grades a submission and records completion exactly once per
/// (user, question). Answers are trimmed and compared case-sensitively.
pub async fn submit_answer(
    db: &Database,
    user_id: &str,
    question_id: &str,
    answer: &str,
) -> Result<AnswerOutcome, sqlx::Error> {
    let Some(question) = quiz::get_question_by_id(db, question_id).await? else {
        return Ok(AnswerOutcome::QuestionNotFound);
    };

    let correct = answer.trim() == question.correct_answer;

    if let Some(prior) = quiz::get_completed(db, user_id, question_id).await? {
        return Ok(AnswerOutcome::Graded {
            correct: prior.was_correct,
            correct_answer: question.correct_answer,
            already_completed: true,
        });
    }

    match quiz::insert_completed(db, user_id, question_id, correct).await {
        Ok(_) => Ok(AnswerOutcome::Graded {
            correct,
            correct_answer: question.correct_answer,
            already_completed: false,
        }),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            // Concurrent submission won; report the row that got recorded.
            let prior = quiz::get_completed(db, user_id, question_id).await?;
            Ok(AnswerOutcome::Graded {
                correct: prior.map(|p| p.was_correct).unwrap_or(correct),
                correct_answer: question.correct_answer,
                already_completed: true,
            })
        }
        Err(err) => Err(err),
    }
}

pub async fn statistics(db: &Database, user_id: &str) -> Result<QuizStatistics, sqlx::Error> {
    let total_questions = quiz::count_questions(db).await?;
    let completed = quiz::count_completed_for_user(db, user_id).await?;
    let correct = quiz::count_correct_for_user(db, user_id).await?;

    Ok(QuizStatistics {
        total_questions,
        completed,
        correct,
        accuracy_rate: accuracy_rate(correct, completed),
    })
}

pub async fn correct_answers(
    db: &Database,
    user_id: &str,
    page: i64,
    page_size: i64,
) -> Result<(Vec<CorrectAnswerEntry>, i64), sqlx::Error> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, 100);
    let offset = (page - 1) * page_size;

    let items = quiz::list_correct_for_user_paginated(db, user_id, page_size, offset).await?;
    let total = quiz::count_correct_for_user(db, user_id).await?;
    Ok((items, total))
}

/// correct / completed as a percentage, rounded to 2 decimals; 0.0 when
/// nothing is completed.
pub fn accuracy_rate(correct: i64, completed: i64) -> f64 {
    if completed <= 0 {
        return 0.0;
    }
    let rate = correct as f64 / completed as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::operations::user;
    use proptest::prelude::*;

    async fn test_db() -> Database {
        Database::connect("sqlite::memory:").await.expect("connect")
    }

    async fn seed_question(db: &Database, word: &str, answer: &str) -> QuizQuestion {
        quiz::insert_question(db, word, answer, ["wrong1", "wrong2", "wrong3"])
            .await
            .unwrap()
    }

    #[test]
    fn accuracy_rate_edge_cases() {
        assert_eq!(accuracy_rate(0, 0), 0.0);
        assert_eq!(accuracy_rate(3, 0), 0.0);
        assert_eq!(accuracy_rate(2, 3), 66.67);
        assert_eq!(accuracy_rate(1, 3), 33.33);
        assert_eq!(accuracy_rate(3, 3), 100.0);
    }

    proptest! {
        #[test]
        fn accuracy_rate_stays_in_percentage_range(correct in 0i64..1000, extra in 0i64..1000) {
            let completed = correct + extra;
            let rate = accuracy_rate(correct, completed);
            prop_assert!((0.0..=100.0).contains(&rate));
            if completed > 0 {
                let raw = correct as f64 / completed as f64 * 100.0;
                prop_assert!((rate - raw).abs() <= 0.005);
            }
        }
    }

    #[tokio::test]
    async fn first_submission_wins_and_only_one_row_exists() {
        let db = test_db().await;
        let u = user::create_user(&db, "quizzer", "x").await.unwrap();
        let q = seed_question(&db, "cat", "a small domesticated feline").await;

        let first = submit_answer(&db, &u.id, &q.id, "wrong1").await.unwrap();
        let AnswerOutcome::Graded { correct, already_completed, .. } = first else {
            panic!("expected graded outcome");
        };
        assert!(!correct);
        assert!(!already_completed);

        // The repeat carries the right answer, but the first attempt is what
        // gets reported.
        let second = submit_answer(&db, &u.id, &q.id, "a small domesticated feline")
            .await
            .unwrap();
        let AnswerOutcome::Graded { correct, already_completed, correct_answer } = second else {
            panic!("expected graded outcome");
        };
        assert!(!correct);
        assert!(already_completed);
        assert_eq!(correct_answer, "a small domesticated feline");

        // Stored outcome still reflects the first attempt.
        let recorded = quiz::get_completed(&db, &u.id, &q.id).await.unwrap().unwrap();
        assert!(!recorded.was_correct);
        assert_eq!(quiz::count_completed_for_user(&db, &u.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let db = test_db().await;
        let u = user::create_user(&db, "ghost", "x").await.unwrap();
        let outcome = submit_answer(&db, &u.id, "missing-id", "whatever").await.unwrap();
        assert!(matches!(outcome, AnswerOutcome::QuestionNotFound));
    }

    #[tokio::test]
    async fn answers_are_trimmed_before_comparison() {
        let db = test_db().await;
        let u = user::create_user(&db, "trimmer", "x").await.unwrap();
        let q = seed_question(&db, "dog", "a loyal companion").await;

        let outcome = submit_answer(&db, &u.id, &q.id, "  a loyal companion  ")
            .await
            .unwrap();
        let AnswerOutcome::Graded { correct, .. } = outcome else {
            panic!("expected graded outcome");
        };
        assert!(correct);
    }

    #[tokio::test]
    async fn selection_skips_completed_until_exhaustion() {
        let db = test_db().await;
        let u = user::create_user(&db, "runner", "x").await.unwrap();
        for i in 0..4 {
            seed_question(&db, &format!("w{i}"), &format!("a{i}")).await;
        }

        let mut answered = std::collections::HashSet::new();
        while let Some(q) = random_question(&db, &u.id).await.unwrap() {
            assert!(answered.insert(q.id.clone()), "question {} served twice", q.id);
            submit_answer(&db, &u.id, &q.id, &q.correct_answer).await.unwrap();
        }
        assert_eq!(answered.len(), 4);
        assert!(random_question(&db, &u.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn statistics_aggregate_first_attempts_only() {
        let db = test_db().await;
        let u = user::create_user(&db, "counter", "x").await.unwrap();
        let q1 = seed_question(&db, "w1", "a1").await;
        let q2 = seed_question(&db, "w2", "a2").await;
        let q3 = seed_question(&db, "w3", "a3").await;

        submit_answer(&db, &u.id, &q1.id, "a1").await.unwrap();
        submit_answer(&db, &u.id, &q2.id, "a2").await.unwrap();
        submit_answer(&db, &u.id, &q3.id, "nope").await.unwrap();
        // Late correction must not move the numbers.
        submit_answer(&db, &u.id, &q3.id, "a3").await.unwrap();

        let stats = statistics(&db, &u.id).await.unwrap();
        assert_eq!(stats.total_questions, 3);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.correct, 2);
        assert_eq!(stats.accuracy_rate, 66.67);

        let (correct_list, total) = correct_answers(&db, &u.id, 1, 20).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(correct_list.len(), 2);
    }

    #[tokio::test]
    async fn statistics_for_fresh_user_are_zero() {
        let db = test_db().await;
        let u = user::create_user(&db, "newbie", "x").await.unwrap();
        let stats = statistics(&db, &u.id).await.unwrap();
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.accuracy_rate, 0.0);
    }
}
