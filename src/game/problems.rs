//! Arithmetic problem generation per difficulty tier.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Difficulty tier controlling operand ranges and operator weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Small operands, mostly addition and subtraction.
    Easy,
    /// Mid-size operands, balanced operator mix.
    Medium,
    /// Large operands, multiplication and division favored.
    Hard,
}

/// Arithmetic operator of a generated problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Operator {
    /// Addition.
    #[serde(rename = "+")]
    Add,
    /// Subtraction (non-negative result by construction).
    #[serde(rename = "-")]
    Sub,
    /// Multiplication.
    #[serde(rename = "*")]
    Mul,
    /// Division (exact integer quotient by construction).
    #[serde(rename = "/")]
    Div,
}

impl Operator {
    /// Symbol used when rendering the problem text.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "×",
            Operator::Div => "÷",
        }
    }
}

/// A single generated arithmetic problem. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Unique identifier within the session.
    pub id: Uuid,
    /// Rendered statement shown to the student, e.g. `"3 × 4 = ?"`.
    pub text: String,
    /// Exact integer result.
    pub answer: i64,
    /// Operator the problem was built from.
    pub operator: Operator,
}

impl Problem {
    /// Rendered answer token matched against the answer pool.
    pub fn answer_token(&self) -> String {
        self.answer.to_string()
    }
}

/// Failures raised while building a problem set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// A session needs at least one problem.
    #[error("cannot generate an empty problem set")]
    EmptyCount,
    /// The draw loop hit its attempt budget before collecting enough distinct
    /// problems. The operand space for the tier is smaller than requested.
    #[error(
        "exhausted {attempts} draws before collecting {requested} distinct {difficulty:?} problems"
    )]
    ProblemSpaceExhausted {
        /// Tier the generation ran for.
        difficulty: Difficulty,
        /// Number of distinct problems requested.
        requested: usize,
        /// Draws performed before giving up.
        attempts: usize,
    },
}

/// Draws allowed per requested problem before the generator fails fast.
const ATTEMPTS_PER_PROBLEM: usize = 64;

/// Fixed walk order for the weighted operator draw.
const DRAW_ORDER: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

/// Relative operator weights in [`DRAW_ORDER`] order for a tier.
fn operator_weights(difficulty: Difficulty) -> [u32; 4] {
    match difficulty {
        Difficulty::Easy => [40, 40, 15, 5],
        Difficulty::Medium => [30, 30, 25, 15],
        Difficulty::Hard => [20, 20, 30, 30],
    }
}

/// Weighted random operator draw: sample uniformly in `[0, total)` and walk
/// the cumulative weights in fixed order.
fn pick_operator<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> Operator {
    let weights = operator_weights(difficulty);
    let total: u32 = weights.iter().sum();
    let sample = rng.random_range(0.0..f64::from(total));

    let mut cumulative = 0.0;
    for (operator, weight) in DRAW_ORDER.into_iter().zip(weights) {
        cumulative += f64::from(weight);
        if sample < cumulative {
            return operator;
        }
    }

    // Floating-point edge where the sample lands on the total.
    Operator::Add
}

/// Draw operands for the tier and operator. Subtraction orders its operands
/// so the result is non-negative; division builds the dividend as an exact
/// multiple of the divisor.
fn draw_operands<R: Rng + ?Sized>(
    rng: &mut R,
    difficulty: Difficulty,
    operator: Operator,
) -> (i64, i64) {
    match operator {
        Operator::Add => match difficulty {
            Difficulty::Easy => (rng.random_range(1..=10), rng.random_range(1..=10)),
            Difficulty::Medium => (rng.random_range(5..=25), rng.random_range(5..=25)),
            Difficulty::Hard => (rng.random_range(10..=50), rng.random_range(10..=50)),
        },
        Operator::Sub => {
            let (subtrahend, minuend_max) = match difficulty {
                Difficulty::Easy => (rng.random_range(1..=10), 15),
                Difficulty::Medium => (rng.random_range(5..=20), 35),
                Difficulty::Hard => (rng.random_range(10..=30), 70),
            };
            (rng.random_range(subtrahend..=minuend_max), subtrahend)
        }
        Operator::Mul => match difficulty {
            Difficulty::Easy => (rng.random_range(1..=5), rng.random_range(1..=5)),
            Difficulty::Medium => (rng.random_range(2..=10), rng.random_range(2..=10)),
            Difficulty::Hard => (rng.random_range(5..=12), rng.random_range(5..=12)),
        },
        Operator::Div => {
            let (divisor, quotient) = match difficulty {
                Difficulty::Easy => (rng.random_range(1..=5), rng.random_range(1..=5)),
                Difficulty::Medium => (rng.random_range(2..=10), rng.random_range(1..=8)),
                Difficulty::Hard => (rng.random_range(2..=12), rng.random_range(1..=10)),
            };
            (divisor * quotient, divisor)
        }
    }
}

fn apply_operator(operator: Operator, lhs: i64, rhs: i64) -> i64 {
    match operator {
        Operator::Add => lhs + rhs,
        Operator::Sub => lhs - rhs,
        Operator::Mul => lhs * rhs,
        Operator::Div => lhs / rhs,
    }
}

fn render_text(operator: Operator, lhs: i64, rhs: i64) -> String {
    format!("{} {} {} = ?", lhs, operator.symbol(), rhs)
}

/// Generate exactly `count` problems with pairwise-distinct
/// `(text, answer)` signatures for the tier.
///
/// Pure with respect to the supplied random source; seed the `Rng` to make
/// the output reproducible. The draw loop is capped so a request larger than
/// the tier's operand space fails fast instead of spinning.
pub fn generate_problems<R: Rng + ?Sized>(
    rng: &mut R,
    difficulty: Difficulty,
    count: usize,
) -> Result<Vec<Problem>, GeneratorError> {
    if count == 0 {
        return Err(GeneratorError::EmptyCount);
    }

    let budget = count.saturating_mul(ATTEMPTS_PER_PROBLEM);
    let mut problems = Vec::with_capacity(count);
    let mut seen = HashSet::new();

    for _attempt in 0..budget {
        let operator = pick_operator(rng, difficulty);
        let (lhs, rhs) = draw_operands(rng, difficulty, operator);
        let answer = apply_operator(operator, lhs, rhs);
        let text = render_text(operator, lhs, rhs);

        if seen.insert((text.clone(), answer)) {
            problems.push(Problem {
                id: Uuid::new_v4(),
                text,
                answer,
                operator,
            });
            if problems.len() == count {
                return Ok(problems);
            }
        }
    }

    Err(GeneratorError::ProblemSpaceExhausted {
        difficulty,
        requested: count,
        attempts: budget,
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const TIERS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Recover the operands from the rendered text to cross-check the answer.
    fn parse_operands(problem: &Problem) -> (i64, i64) {
        let mut parts = problem.text.split_whitespace();
        let lhs = parts.next().unwrap().parse().unwrap();
        let symbol = parts.next().unwrap();
        let rhs = parts.next().unwrap().parse().unwrap();
        assert_eq!(symbol, problem.operator.symbol());
        (lhs, rhs)
    }

    #[test]
    fn generates_requested_count_with_distinct_signatures() {
        for difficulty in TIERS {
            let problems = generate_problems(&mut rng(7), difficulty, 10).unwrap();
            assert_eq!(problems.len(), 10);

            let signatures: HashSet<_> = problems
                .iter()
                .map(|p| (p.text.clone(), p.answer))
                .collect();
            assert_eq!(signatures.len(), 10, "duplicate signature in {difficulty:?}");
        }
    }

    #[test]
    fn arithmetic_identities_hold_per_operator() {
        for difficulty in TIERS {
            for seed in 0..20 {
                for problem in generate_problems(&mut rng(seed), difficulty, 10).unwrap() {
                    let (lhs, rhs) = parse_operands(&problem);
                    match problem.operator {
                        Operator::Add => assert_eq!(problem.answer, lhs + rhs),
                        Operator::Sub => {
                            assert_eq!(problem.answer, lhs - rhs);
                            assert!(problem.answer >= 0, "negative subtraction result");
                        }
                        Operator::Mul => assert_eq!(problem.answer, lhs * rhs),
                        Operator::Div => {
                            assert_eq!(lhs % rhs, 0, "inexact division {lhs} / {rhs}");
                            assert_eq!(problem.answer, lhs / rhs);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn operands_stay_within_tier_bounds() {
        for seed in 0..20 {
            for problem in generate_problems(&mut rng(seed), Difficulty::Easy, 10).unwrap() {
                let (lhs, rhs) = parse_operands(&problem);
                match problem.operator {
                    Operator::Add => {
                        assert!((1..=10).contains(&lhs) && (1..=10).contains(&rhs));
                    }
                    Operator::Sub => {
                        assert!((1..=10).contains(&rhs));
                        assert!(lhs >= rhs && lhs <= 15);
                    }
                    Operator::Mul => {
                        assert!((1..=5).contains(&lhs) && (1..=5).contains(&rhs));
                    }
                    Operator::Div => {
                        assert!((1..=5).contains(&rhs));
                        assert!((1..=5).contains(&(lhs / rhs)));
                    }
                }
            }
        }
    }

    #[test]
    fn weighted_draw_only_returns_known_operators() {
        let mut source = rng(99);
        for _ in 0..1_000 {
            let operator = pick_operator(&mut source, Difficulty::Hard);
            assert!(DRAW_ORDER.contains(&operator));
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = generate_problems(&mut rng(1), Difficulty::Easy, 0).unwrap_err();
        assert_eq!(err, GeneratorError::EmptyCount);
    }

    #[test]
    fn oversized_request_fails_fast_instead_of_hanging() {
        // The easy tier cannot yield tens of thousands of distinct problems.
        let err = generate_problems(&mut rng(3), Difficulty::Easy, 50_000).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::ProblemSpaceExhausted {
                difficulty: Difficulty::Easy,
                requested: 50_000,
                ..
            }
        ));
    }
}
