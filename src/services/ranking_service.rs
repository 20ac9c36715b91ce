//! Leaderboard assembly.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    dao::models::{GameResultEntity, StudentEntity},
    dto::ranking::RankingRow,
    error::ServiceError,
    game::SharedState,
};

/// Build the leaderboard, optionally restricted to one grade level.
pub async fn rankings(
    state: &SharedState,
    grade: Option<u8>,
) -> Result<Vec<RankingRow>, ServiceError> {
    let store = state.require_result_store().await?;
    let results = store.list_results().await?;
    let students = store.list_students().await?;

    Ok(build_rankings(results, &students, grade))
}

/// Join results with their students, filter by grade, and sort by score
/// descending then time ascending.
fn build_rankings(
    results: Vec<GameResultEntity>,
    students: &[StudentEntity],
    grade: Option<u8>,
) -> Vec<RankingRow> {
    let by_id: HashMap<Uuid, &StudentEntity> = students.iter().map(|s| (s.id, s)).collect();

    let mut rows: Vec<RankingRow> = results
        .into_iter()
        .filter_map(|result| {
            let student = by_id.get(&result.student_id)?;
            if grade.is_some_and(|wanted| student.grade != wanted) {
                return None;
            }
            Some(RankingRow {
                student_id: student.id,
                student_name: student.name.clone(),
                grade: student.grade,
                score: result.score,
                time: result.total_time_seconds,
                difficulty: result.difficulty,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.score.cmp(&a.score).then(a.time.cmp(&b.time)));
    rows
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use crate::game::problems::Difficulty;

    use super::*;

    fn student(name: &str, grade: u8) -> StudentEntity {
        StudentEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            grade,
            created_at: SystemTime::now(),
        }
    }

    fn result(student_id: Uuid, score: u32, time: u64) -> GameResultEntity {
        GameResultEntity {
            id: Uuid::new_v4(),
            student_id,
            difficulty: Difficulty::Easy,
            correct_answers: 10,
            total_time_seconds: time,
            score,
            created_at: SystemTime::now(),
        }
    }

    #[test]
    fn sorts_by_score_descending_then_time_ascending() {
        let ana = student("Ana", 6);
        let bruno = student("Bruno", 7);
        let carla = student("Carla", 6);

        let results = vec![
            result(ana.id, 1_000, 90),
            result(bruno.id, 1_080, 40),
            result(carla.id, 1_000, 30),
        ];
        let students = vec![ana.clone(), bruno.clone(), carla.clone()];

        let rows = build_rankings(results, &students, None);
        let names: Vec<&str> = rows.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, ["Bruno", "Carla", "Ana"]);
    }

    #[test]
    fn grade_filter_keeps_matching_students_only() {
        let ana = student("Ana", 6);
        let bruno = student("Bruno", 7);

        let results = vec![result(ana.id, 500, 10), result(bruno.id, 900, 10)];
        let students = vec![ana.clone(), bruno.clone()];

        let rows = build_rankings(results, &students, Some(6));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_name, "Ana");
        assert_eq!(rows[0].grade, 6);
    }

    #[test]
    fn results_without_a_known_student_are_dropped() {
        let ana = student("Ana", 6);
        let results = vec![result(ana.id, 500, 10), result(Uuid::new_v4(), 900, 10)];
        let students = vec![ana];

        let rows = build_rankings(results, &students, None);
        assert_eq!(rows.len(), 1);
    }
}
