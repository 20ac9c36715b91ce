//! Per-session matching engine: board state, connections, completion.

use std::sync::Arc;
use std::time::{Instant, SystemTime};

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::GameResultEntity;
use crate::game::feedback::FeedbackNotifier;
use crate::game::problems::{self, Difficulty, GeneratorError, Problem};
use crate::game::scoring;
use crate::game::state_machine::{SessionEvent, SessionPhase, SessionStateMachine};

/// One recorded match attempt between a problem and an answer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Problem the attempt was made against.
    pub problem_id: Uuid,
    /// Answer token the student picked from the pool.
    pub answer_token: String,
    /// Whether the token matched the problem's answer.
    pub is_correct: bool,
}

/// Result derived exactly once when a session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Identifier of the result record.
    pub id: Uuid,
    /// Student who played the session.
    pub student_id: Uuid,
    /// Tier the session ran at.
    pub difficulty: Difficulty,
    /// Number of correct connections.
    pub correct_answers: u32,
    /// Wall-clock duration of the session in whole seconds.
    pub total_time_seconds: u64,
    /// Final score per the scoring formula.
    pub score: u32,
    /// Completion timestamp.
    pub created_at: SystemTime,
}

impl From<GameResult> for GameResultEntity {
    fn from(result: GameResult) -> Self {
        Self {
            id: result.id,
            student_id: result.student_id,
            difficulty: result.difficulty,
            correct_answers: result.correct_answers,
            total_time_seconds: result.total_time_seconds,
            score: result.score,
            created_at: result.created_at,
        }
    }
}

/// Outcome of an answer selection.
#[derive(Debug)]
pub enum MatchOutcome {
    /// Nothing was recorded: no problem was selected, or the session is
    /// already completed.
    Ignored,
    /// A connection was recorded.
    Recorded {
        /// Whether the match was correct.
        is_correct: bool,
        /// Present when this connection resolved the final problem.
        completion: Option<GameResult>,
    },
}

/// Error returned when a selection references a foreign problem id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("problem `{0}` does not belong to this session")]
pub struct UnknownProblem(pub Uuid);

/// Aggregated state for one in-progress or completed matching session.
pub struct MatchSession {
    id: Uuid,
    student_id: Uuid,
    difficulty: Difficulty,
    problems: IndexMap<Uuid, Problem>,
    answer_pool: Vec<String>,
    selected_problem: Option<Uuid>,
    connections: Vec<Connection>,
    started_at: Instant,
    created_at: SystemTime,
    elapsed_seconds: u64,
    score: u32,
    machine: SessionStateMachine,
    notifier: Arc<dyn FeedbackNotifier>,
}

impl MatchSession {
    /// Generate the board and start the session.
    ///
    /// The id is supplied by the caller so collaborators bound to the session
    /// (feedback, clock) can be wired up before the board exists. The answer
    /// pool is a fresh random permutation of the rendered problem answers, so
    /// its multiset always mirrors the problem set.
    pub fn start<R: Rng + ?Sized>(
        rng: &mut R,
        id: Uuid,
        student_id: Uuid,
        difficulty: Difficulty,
        problem_count: usize,
        notifier: Arc<dyn FeedbackNotifier>,
    ) -> Result<Self, GeneratorError> {
        let generated = problems::generate_problems(rng, difficulty, problem_count)?;

        let mut answer_pool: Vec<String> = generated.iter().map(Problem::answer_token).collect();
        answer_pool.shuffle(rng);

        let mut machine = SessionStateMachine::new();
        machine
            .apply(SessionEvent::BoardReady)
            .expect("fresh session machine accepts the board");

        Ok(Self {
            id,
            student_id,
            difficulty,
            problems: generated.into_iter().map(|p| (p.id, p)).collect(),
            answer_pool,
            selected_problem: None,
            connections: Vec::new(),
            started_at: Instant::now(),
            created_at: SystemTime::now(),
            elapsed_seconds: 0,
            score: 0,
            machine,
            notifier,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Student the session belongs to.
    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    /// Tier the session runs at.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Problems in generation order.
    pub fn problems(&self) -> impl Iterator<Item = &Problem> {
        self.problems.values()
    }

    /// Shuffled answer tokens.
    pub fn answer_pool(&self) -> &[String] {
        &self.answer_pool
    }

    /// Currently highlighted problem, if any.
    pub fn selected_problem(&self) -> Option<Uuid> {
        self.selected_problem
    }

    /// Recorded connections in attempt order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Seconds displayed by the session clock.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Final score; zero until the session completes.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Whether the session has reached its terminal phase.
    pub fn is_completed(&self) -> bool {
        self.machine.phase() == SessionPhase::Completed
    }

    /// Whether the problem already has a connection and is locked.
    pub fn is_locked(&self, problem_id: Uuid) -> bool {
        self.connections.iter().any(|c| c.problem_id == problem_id)
    }

    /// Number of correct connections so far.
    pub fn correct_count(&self) -> u32 {
        self.connections.iter().filter(|c| c.is_correct).count() as u32
    }

    /// Refresh the displayed elapsed time from the monotonic start instant.
    /// Frozen once the session completes.
    pub fn refresh_elapsed(&mut self) -> u64 {
        if !self.is_completed() {
            self.elapsed_seconds = self.started_at.elapsed().as_secs();
        }
        self.elapsed_seconds
    }

    /// Toggle the problem selection.
    ///
    /// Selecting a locked problem (one with a connection) or acting on a
    /// completed session is a no-op. Returns the selection after the call.
    pub fn select_problem(&mut self, problem_id: Uuid) -> Result<Option<Uuid>, UnknownProblem> {
        if !self.problems.contains_key(&problem_id) {
            return Err(UnknownProblem(problem_id));
        }

        if self.is_completed() || self.is_locked(problem_id) {
            return Ok(self.selected_problem);
        }

        self.selected_problem = if self.selected_problem == Some(problem_id) {
            None
        } else {
            Some(problem_id)
        };

        Ok(self.selected_problem)
    }

    /// Match an answer token against the selected problem.
    ///
    /// Without a selection this is a no-op. Otherwise a connection is
    /// recorded, the feedback capability is notified, the selection is
    /// cleared, and completion is checked.
    pub fn select_answer(&mut self, token: &str) -> MatchOutcome {
        if self.is_completed() {
            return MatchOutcome::Ignored;
        }

        let Some(problem_id) = self.selected_problem.take() else {
            return MatchOutcome::Ignored;
        };

        let Some(problem) = self.problems.get(&problem_id) else {
            return MatchOutcome::Ignored;
        };

        let is_correct = problem.answer_token() == token;
        self.connections.push(Connection {
            problem_id,
            answer_token: token.to_string(),
            is_correct,
        });

        if is_correct {
            self.notifier.notify_correct();
        } else {
            self.notifier.notify_incorrect();
        }

        MatchOutcome::Recorded {
            is_correct,
            completion: self.check_completion(),
        }
    }

    /// Complete the session once every problem carries a connection.
    ///
    /// The state machine rejects a second resolution, so the score is
    /// computed and the result built exactly once.
    fn check_completion(&mut self) -> Option<GameResult> {
        if self.connections.len() != self.problems.len() {
            return None;
        }

        self.machine.apply(SessionEvent::AllProblemsResolved).ok()?;

        let total_time_seconds = self.started_at.elapsed().as_secs();
        self.elapsed_seconds = total_time_seconds;

        let correct_answers = self.correct_count();
        self.score = scoring::score(self.difficulty, correct_answers, total_time_seconds);

        Some(GameResult {
            id: Uuid::new_v4(),
            student_id: self.student_id,
            difficulty: self.difficulty,
            correct_answers,
            total_time_seconds,
            score: self.score,
            created_at: SystemTime::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[derive(Default)]
    struct RecordingFeedback {
        correct: AtomicUsize,
        incorrect: AtomicUsize,
    }

    impl FeedbackNotifier for RecordingFeedback {
        fn notify_correct(&self) {
            self.correct.fetch_add(1, Ordering::SeqCst);
        }

        fn notify_incorrect(&self) {
            self.incorrect.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn session_with_feedback(count: usize) -> (MatchSession, Arc<RecordingFeedback>) {
        let feedback = Arc::new(RecordingFeedback::default());
        let mut rng = StdRng::seed_from_u64(42);
        let session = MatchSession::start(
            &mut rng,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Difficulty::Easy,
            count,
            feedback.clone(),
        )
        .unwrap();
        (session, feedback)
    }

    fn board(session: &MatchSession) -> Vec<(Uuid, String)> {
        session
            .problems()
            .map(|p| (p.id, p.answer_token()))
            .collect()
    }

    #[test]
    fn answer_pool_is_a_permutation_of_problem_answers() {
        let (session, _) = session_with_feedback(10);

        let mut pool = session.answer_pool().to_vec();
        let mut answers: Vec<String> = session.problems().map(Problem::answer_token).collect();
        pool.sort();
        answers.sort();

        assert_eq!(pool.len(), 10);
        assert_eq!(pool, answers);
    }

    #[test]
    fn problem_selection_toggles() {
        let (mut session, _) = session_with_feedback(3);
        let ids: Vec<Uuid> = session.problems().map(|p| p.id).collect();

        assert_eq!(session.select_problem(ids[0]).unwrap(), Some(ids[0]));
        assert_eq!(session.select_problem(ids[0]).unwrap(), None);
        assert_eq!(session.select_problem(ids[0]).unwrap(), Some(ids[0]));
        assert_eq!(session.select_problem(ids[1]).unwrap(), Some(ids[1]));
    }

    #[test]
    fn selecting_a_foreign_problem_is_an_error() {
        let (mut session, _) = session_with_feedback(3);
        let stranger = Uuid::new_v4();
        assert_eq!(
            session.select_problem(stranger),
            Err(UnknownProblem(stranger))
        );
    }

    #[test]
    fn answer_without_selection_records_nothing() {
        let (mut session, feedback) = session_with_feedback(3);
        assert!(matches!(session.select_answer("7"), MatchOutcome::Ignored));
        assert!(session.connections().is_empty());
        assert_eq!(feedback.correct.load(Ordering::SeqCst), 0);
        assert_eq!(feedback.incorrect.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn first_connection_locks_the_problem() {
        let (mut session, _) = session_with_feedback(3);
        let ids: Vec<Uuid> = session.problems().map(|p| p.id).collect();

        session.select_problem(ids[0]).unwrap();
        // A wrong token still counts as the single allowed attempt.
        let outcome = session.select_answer("not-a-number");
        assert!(matches!(
            outcome,
            MatchOutcome::Recorded {
                is_correct: false,
                completion: None,
            }
        ));
        assert_eq!(session.selected_problem(), None);
        assert_eq!(session.connections().len(), 1);

        // Locked: re-selecting is a no-op and can never yield a second attempt.
        assert_eq!(session.select_problem(ids[0]).unwrap(), None);
        assert!(matches!(session.select_answer("1"), MatchOutcome::Ignored));
        assert_eq!(session.connections().len(), 1);
    }

    #[test]
    fn connections_always_reference_session_problems() {
        let (mut session, _) = session_with_feedback(5);
        for (id, token) in board(&session) {
            session.select_problem(id).unwrap();
            session.select_answer(&token);
        }
        for connection in session.connections() {
            assert!(session.problems().any(|p| p.id == connection.problem_id));
        }
    }

    #[test]
    fn completion_fires_when_every_problem_has_a_connection() {
        let (mut session, feedback) = session_with_feedback(4);
        let pairs = board(&session);

        let mut result = None;
        for (id, token) in &pairs {
            session.select_problem(*id).unwrap();
            match session.select_answer(token) {
                MatchOutcome::Recorded { completion, .. } => {
                    if let Some(r) = completion {
                        result = Some(r);
                    }
                }
                MatchOutcome::Ignored => panic!("attempt was ignored"),
            }
        }

        let result = result.expect("final connection completes the session");
        assert!(session.is_completed());
        assert_eq!(result.correct_answers, 4);
        assert_eq!(result.student_id, session.student_id());
        assert_eq!(
            result.score,
            scoring::score(Difficulty::Easy, 4, result.total_time_seconds)
        );
        assert_eq!(session.score(), result.score);
        assert_eq!(feedback.correct.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn mixed_connections_count_only_correct_answers() {
        let (mut session, feedback) = session_with_feedback(4);
        let pairs = board(&session);

        // First problem gets a wrong token, the rest are answered correctly.
        session.select_problem(pairs[0].0).unwrap();
        session.select_answer("wrong");
        let mut result = None;
        for (id, token) in &pairs[1..] {
            session.select_problem(*id).unwrap();
            if let MatchOutcome::Recorded { completion, .. } = session.select_answer(token) {
                result = completion.or(result);
            }
        }

        let result = result.expect("session completes with mixed connections");
        assert_eq!(result.correct_answers, 3);
        assert_eq!(feedback.incorrect.load(Ordering::SeqCst), 1);
        assert_eq!(
            result.score,
            scoring::score(Difficulty::Easy, 3, result.total_time_seconds)
        );
    }

    #[test]
    fn completion_is_idempotent() {
        let (mut session, _) = session_with_feedback(3);
        let pairs = board(&session);

        for (id, token) in &pairs {
            session.select_problem(*id).unwrap();
            session.select_answer(token);
        }
        assert!(session.is_completed());
        let frozen_score = session.score();
        let frozen_connections = session.connections().len();

        // Further events must neither record nor rescore.
        for (id, token) in &pairs {
            assert_eq!(session.select_problem(*id).unwrap(), None);
            assert!(matches!(session.select_answer(token), MatchOutcome::Ignored));
        }
        assert_eq!(session.score(), frozen_score);
        assert_eq!(session.connections().len(), frozen_connections);
    }

    #[test]
    fn elapsed_freezes_after_completion() {
        use crate::game::feedback::SilentFeedback;

        let mut rng = StdRng::seed_from_u64(11);
        let mut session = MatchSession::start(
            &mut rng,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Difficulty::Hard,
            2,
            Arc::new(SilentFeedback),
        )
        .unwrap();

        for (id, token) in board(&session) {
            session.select_problem(id).unwrap();
            session.select_answer(&token);
        }
        let frozen = session.elapsed_seconds();
        assert_eq!(session.refresh_elapsed(), frozen);
    }
}
