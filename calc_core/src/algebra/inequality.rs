//! # Inequality Solver
//!
//! Solves linear, quadratic and absolute-value inequalities in one variable
//! and reports the solution set as intervals.
//!
//! ## Rules
//!
//! - Linear `ax + b ⋚ c`: dividing by a negative `a` flips the comparison
//! - Quadratic `ax² + bx + c ⋚ 0`: a negative `a` is normalized away (flipping
//!   the comparison), then the roots split the line into regions selected by
//!   the comparison
//! - Absolute value `|ax + b| ⋚ c`: `<` becomes one bounded interval, `>` two
//!   unbounded ones; a negative `c` is all-or-nothing
//!
//! ## Example
//!
//! ```rust
//! use calc_core::algebra::inequality::{solve, Comparison, InequalityInput};
//!
//! // -2x + 4 > 0  =>  x < 2
//! let input = InequalityInput::Linear { a: -2.0, b: 4.0, c: 0.0, comparison: Comparison::Greater };
//! let result = solve(&input).unwrap();
//! assert_eq!(result.inequality_notation, "x < 2");
//! ```

use serde::{Deserialize, Serialize};

use super::interval::{Bound, Interval, Solution};
use super::quadratic::{discriminant, solve_quadratic, QuadraticRoots};
use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

impl Comparison {
    /// Direction after multiplying both sides by a negative number
    pub fn flipped(&self) -> Self {
        match self {
            Comparison::Less => Comparison::Greater,
            Comparison::LessOrEqual => Comparison::GreaterOrEqual,
            Comparison::Greater => Comparison::Less,
            Comparison::GreaterOrEqual => Comparison::LessOrEqual,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::LessOrEqual => "≤",
            Comparison::Greater => ">",
            Comparison::GreaterOrEqual => "≥",
        }
    }

    pub fn is_inclusive(&self) -> bool {
        matches!(self, Comparison::LessOrEqual | Comparison::GreaterOrEqual)
    }

    pub fn is_less(&self) -> bool {
        matches!(self, Comparison::Less | Comparison::LessOrEqual)
    }

    /// Evaluate `lhs ⋚ rhs`
    pub fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Less => lhs < rhs,
            Comparison::LessOrEqual => lhs <= rhs,
            Comparison::Greater => lhs > rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
        }
    }
}

/// An inequality in `x`.
///
/// ## JSON Example
///
/// ```json
/// { "kind": "absolute_value", "a": 2, "b": -1, "c": 5, "comparison": "<=" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InequalityInput {
    /// ax + b ⋚ c
    Linear { a: f64, b: f64, c: f64, comparison: Comparison },
    /// ax² + bx + c ⋚ 0
    Quadratic { a: f64, b: f64, c: f64, comparison: Comparison },
    /// |ax + b| ⋚ c
    AbsoluteValue { a: f64, b: f64, c: f64, comparison: Comparison },
}

impl InequalityInput {
    fn coefficients(&self) -> (f64, f64, f64, Comparison) {
        match *self {
            InequalityInput::Linear { a, b, c, comparison }
            | InequalityInput::Quadratic { a, b, c, comparison }
            | InequalityInput::AbsoluteValue { a, b, c, comparison } => (a, b, c, comparison),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        let (a, b, c, _) = self.coefficients();
        let mut v = Validator::new();
        v.finite("a", a);
        v.finite("b", b);
        v.finite("c", c);
        v.finish()
    }

    /// The inequality as written, e.g. `|2x + -1| ≤ 5`
    pub fn display(&self) -> String {
        let (a, b, c, cmp) = self.coefficients();
        match self {
            InequalityInput::Linear { .. } => {
                format!("{}x + {} {} {}", fmt_num(a), fmt_num(b), cmp.symbol(), fmt_num(c))
            }
            InequalityInput::Quadratic { .. } => {
                format!("{}x² + {}x + {} {} 0", fmt_num(a), fmt_num(b), fmt_num(c), cmp.symbol())
            }
            InequalityInput::AbsoluteValue { .. } => {
                format!("|{}x + {}| {} {}", fmt_num(a), fmt_num(b), cmp.symbol(), fmt_num(c))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InequalityResult {
    pub solution: Solution,
    pub interval_notation: String,
    pub inequality_notation: String,
    /// Boundary points, ascending
    pub critical_points: Vec<f64>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Solve an inequality.
pub fn solve(input: &InequalityInput) -> CalcResult<InequalityResult> {
    input.validate()?;

    let mut d;
    let (solution, mut critical_points) = match *input {
        InequalityInput::Linear { a, b, c, comparison } => {
            d = Derivation::new(Formula::LinearInequality);
            d.step(input.display());
            solve_linear(a, b, c, comparison, &mut d)
        }
        InequalityInput::Quadratic { a, b, c, comparison } => {
            d = Derivation::new(Formula::QuadraticFormula);
            d.step(input.display());
            solve_quadratic_inequality(a, b, c, comparison, &mut d)
        }
        InequalityInput::AbsoluteValue { a, b, c, comparison } => {
            d = Derivation::new(Formula::AbsoluteValueInequality);
            d.step(input.display());
            solve_absolute(a, b, c, comparison, &mut d)
        }
    };
    critical_points.sort_by(f64::total_cmp);
    critical_points.dedup();

    let interval_notation = solution.notation();
    let inequality_notation = solution.inequality();
    d.step(format!("Solution: {}  {}", inequality_notation, interval_notation));

    let (formula, steps) = d.into_parts();
    Ok(InequalityResult {
        solution,
        interval_notation,
        inequality_notation,
        critical_points,
        formula,
        steps,
    })
}

fn ray(cmp: Comparison, x: f64) -> Solution {
    let bound = Bound { value: x, inclusive: cmp.is_inclusive() };
    if cmp.is_less() {
        Solution::Interval(Interval::below(bound))
    } else {
        Solution::Interval(Interval::above(bound))
    }
}

fn constant(holds: bool) -> Solution {
    if holds {
        Solution::AllReals
    } else {
        Solution::NoSolution
    }
}

/// ax + b ⋚ c
pub fn solve_linear(a: f64, b: f64, c: f64, cmp: Comparison, d: &mut Derivation) -> (Solution, Vec<f64>) {
    if a == 0.0 {
        let holds = cmp.holds(b, c);
        d.step(format!(
            "a = 0: {} {} {} is {}",
            fmt_num(b),
            cmp.symbol(),
            fmt_num(c),
            if holds { "always true" } else { "never true" }
        ));
        return (constant(holds), Vec::new());
    }

    let rhs = c - b;
    d.step(format!("{}x {} {}", fmt_num(a), cmp.symbol(), fmt_num(rhs)));
    let x = rhs / a;
    let cmp = if a < 0.0 {
        let flipped = cmp.flipped();
        d.step(format!(
            "Divide by {} (negative): {} becomes {}",
            fmt_num(a),
            cmp.symbol(),
            flipped.symbol()
        ));
        flipped
    } else {
        cmp
    };
    d.step(format!("x {} {}", cmp.symbol(), fmt_num(x)));
    (ray(cmp, x), vec![x])
}

/// ax² + bx + c ⋚ 0
fn solve_quadratic_inequality(a: f64, b: f64, c: f64, cmp: Comparison, d: &mut Derivation) -> (Solution, Vec<f64>) {
    if a == 0.0 {
        d.step("a = 0: the inequality is linear");
        d.apply(Formula::LinearInequality);
        return solve_linear(b, c, 0.0, cmp, d);
    }

    // make the parabola open upward
    let (a, b, c, cmp) = if a < 0.0 {
        let flipped = cmp.flipped();
        d.step(format!(
            "Multiply by −1: {}x² + {}x + {} {} 0",
            fmt_num(-a),
            fmt_num(-b),
            fmt_num(-c),
            flipped.symbol()
        ));
        (-a, -b, -c, flipped)
    } else {
        (a, b, c, cmp)
    };

    d.step(format!("D = {}", fmt_num(discriminant(a, b, c))));
    match solve_quadratic(a, b, c) {
        QuadraticRoots::Complex { .. } => {
            let positive = !cmp.is_less();
            d.step("D < 0: the parabola never crosses zero and stays positive");
            (constant(positive), Vec::new())
        }
        QuadraticRoots::Repeated { x } => {
            d.step(format!("D = 0: touches zero only at x = {}", fmt_num(x)));
            let solution = match cmp {
                Comparison::Less => Solution::NoSolution,
                Comparison::LessOrEqual => Solution::Interval(Interval::point(x)),
                Comparison::Greater => Solution::all_except(x),
                Comparison::GreaterOrEqual => Solution::AllReals,
            };
            (solution, vec![x])
        }
        QuadraticRoots::TwoReal { x1, x2 } => {
            d.step(format!("Roots x = {} and x = {}", fmt_num(x1), fmt_num(x2)));
            let solution = if cmp.is_less() {
                d.step("Negative between the roots");
                Solution::inside(x1, x2, cmp.is_inclusive())
            } else {
                d.step("Positive outside the roots");
                Solution::outside(x1, x2, cmp.is_inclusive())
            };
            (solution, vec![x1, x2])
        }
    }
}

/// |ax + b| ⋚ c
pub fn solve_absolute(a: f64, b: f64, c: f64, cmp: Comparison, d: &mut Derivation) -> (Solution, Vec<f64>) {
    if a == 0.0 {
        let holds = cmp.holds(b.abs(), c);
        d.step(format!("a = 0: |{}| {} {} is constant", fmt_num(b), cmp.symbol(), fmt_num(c)));
        return (constant(holds), Vec::new());
    }

    if c < 0.0 {
        d.step(format!("|u| ≥ 0 > {}", fmt_num(c)));
        return (constant(!cmp.is_less()), Vec::new());
    }

    let left = (-c - b) / a;
    let right = (c - b) / a;

    if c == 0.0 {
        let x = -b / a;
        d.step(format!("c = 0: |u| = 0 only at x = {}", fmt_num(x)));
        let solution = match cmp {
            Comparison::Less => Solution::NoSolution,
            Comparison::LessOrEqual => Solution::Interval(Interval::point(x)),
            Comparison::Greater => Solution::all_except(x),
            Comparison::GreaterOrEqual => Solution::AllReals,
        };
        return (solution, vec![x]);
    }

    let solution = if cmp.is_less() {
        d.step(format!(
            "{} {} {}x + {} {} {}",
            fmt_num(-c),
            cmp.symbol(),
            fmt_num(a),
            fmt_num(b),
            cmp.symbol(),
            fmt_num(c)
        ));
        Solution::inside(left, right, cmp.is_inclusive())
    } else {
        d.step(format!(
            "{}x + {} {} {} or {}x + {} {} {}",
            fmt_num(a),
            fmt_num(b),
            cmp.flipped().symbol(),
            fmt_num(-c),
            fmt_num(a),
            fmt_num(b),
            cmp.symbol(),
            fmt_num(c)
        ));
        Solution::outside(left, right, cmp.is_inclusive())
    };
    if a < 0.0 {
        d.step(format!("Divide by {} (negative): the bounds swap", fmt_num(a)));
    }
    (solution, vec![left, right])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(a: f64, b: f64, c: f64, comparison: Comparison) -> InequalityResult {
        solve(&InequalityInput::Linear { a, b, c, comparison }).unwrap()
    }

    fn quadratic(a: f64, b: f64, c: f64, comparison: Comparison) -> InequalityResult {
        solve(&InequalityInput::Quadratic { a, b, c, comparison }).unwrap()
    }

    fn absolute(a: f64, b: f64, c: f64, comparison: Comparison) -> InequalityResult {
        solve(&InequalityInput::AbsoluteValue { a, b, c, comparison }).unwrap()
    }

    #[test]
    fn test_negative_coefficient_flips() {
        let r = linear(-2.0, 4.0, 0.0, Comparison::Greater);
        assert_eq!(r.solution, Solution::Interval(Interval::below(Bound::open(2.0))));
        assert_eq!(r.inequality_notation, "x < 2");
        assert!(r.steps.iter().any(|s| s.contains("negative")));
    }

    #[test]
    fn test_positive_coefficient_keeps_direction() {
        let r = linear(3.0, -1.0, 8.0, Comparison::LessOrEqual);
        assert_eq!(r.solution, Solution::Interval(Interval::below(Bound::closed(3.0))));
        assert_eq!(r.critical_points, vec![3.0]);
    }

    #[test]
    fn test_linear_constant() {
        assert_eq!(linear(0.0, 1.0, 2.0, Comparison::Less).solution, Solution::AllReals);
        assert_eq!(linear(0.0, 3.0, 2.0, Comparison::Less).solution, Solution::NoSolution);
    }

    #[test]
    fn test_quadratic_negative_discriminant() {
        // x² + 1 > 0
        assert_eq!(quadratic(1.0, 0.0, 1.0, Comparison::Greater).solution, Solution::AllReals);
        assert_eq!(quadratic(1.0, 0.0, 1.0, Comparison::Less).solution, Solution::NoSolution);
        // -x² - 1 > 0
        assert_eq!(quadratic(-1.0, 0.0, -1.0, Comparison::Greater).solution, Solution::NoSolution);
    }

    #[test]
    fn test_quadratic_two_roots() {
        // x² - 2x - 3 = (x + 1)(x - 3)
        let outside = quadratic(1.0, -2.0, -3.0, Comparison::Greater);
        assert_eq!(outside.interval_notation, "(-∞, -1) ∪ (3, ∞)");
        assert_eq!(outside.critical_points, vec![-1.0, 3.0]);
        let inside = quadratic(1.0, -2.0, -3.0, Comparison::LessOrEqual);
        assert_eq!(inside.interval_notation, "[-1, 3]");
        // -(x² - 2x - 3) ≥ 0 is the same set
        let flipped = quadratic(-1.0, 2.0, 3.0, Comparison::GreaterOrEqual);
        assert_eq!(flipped.solution, inside.solution);
    }

    #[test]
    fn test_quadratic_repeated_root() {
        // (x - 1)²
        assert_eq!(quadratic(1.0, -2.0, 1.0, Comparison::Less).solution, Solution::NoSolution);
        assert_eq!(quadratic(1.0, -2.0, 1.0, Comparison::LessOrEqual).inequality_notation, "x = 1");
        assert_eq!(quadratic(1.0, -2.0, 1.0, Comparison::Greater).inequality_notation, "x ≠ 1");
        assert_eq!(quadratic(1.0, -2.0, 1.0, Comparison::GreaterOrEqual).solution, Solution::AllReals);
    }

    #[test]
    fn test_quadratic_degrades_to_linear() {
        let r = quadratic(0.0, 2.0, -4.0, Comparison::Greater);
        assert_eq!(r.inequality_notation, "x > 2");
    }

    #[test]
    fn test_absolute_negative_c() {
        assert_eq!(absolute(1.0, 0.0, -1.0, Comparison::Less).solution, Solution::NoSolution);
        assert_eq!(absolute(1.0, 0.0, -1.0, Comparison::LessOrEqual).solution, Solution::NoSolution);
        assert_eq!(absolute(1.0, 0.0, -1.0, Comparison::Greater).solution, Solution::AllReals);
        assert_eq!(absolute(1.0, 0.0, -1.0, Comparison::GreaterOrEqual).solution, Solution::AllReals);
    }

    #[test]
    fn test_absolute_bounded_and_union() {
        // |2x - 1| < 5  =>  -2 < x < 3
        let inside = absolute(2.0, -1.0, 5.0, Comparison::Less);
        assert_eq!(inside.inequality_notation, "-2 < x < 3");
        // |2x - 1| ≥ 5  =>  x ≤ -2 or x ≥ 3
        let outside = absolute(2.0, -1.0, 5.0, Comparison::GreaterOrEqual);
        assert_eq!(outside.interval_notation, "(-∞, -2] ∪ [3, ∞)");
    }

    #[test]
    fn test_absolute_negative_a_orders_intervals() {
        // |-x + 1| > 2  =>  x < -1 or x > 3
        let r = absolute(-1.0, 1.0, 2.0, Comparison::Greater);
        assert_eq!(r.interval_notation, "(-∞, -1) ∪ (3, ∞)");
        assert_eq!(r.critical_points, vec![-1.0, 3.0]);
    }

    #[test]
    fn test_absolute_zero_c() {
        assert_eq!(absolute(1.0, -2.0, 0.0, Comparison::LessOrEqual).inequality_notation, "x = 2");
        assert_eq!(absolute(1.0, -2.0, 0.0, Comparison::Greater).inequality_notation, "x ≠ 2");
    }

    #[test]
    fn test_solutions_satisfy_inequality() {
        let r = quadratic(2.0, -3.0, -5.0, Comparison::Less);
        for i in -40..=40 {
            let x = i as f64 / 10.0;
            let lhs = 2.0 * x * x - 3.0 * x - 5.0;
            assert_eq!(r.solution.contains(x), lhs < 0.0, "x = {}", x);
        }
    }

    #[test]
    fn test_comparison_serde() {
        let input: InequalityInput =
            serde_json::from_str(r#"{ "kind": "linear", "a": 1, "b": 0, "c": 2, "comparison": ">=" }"#).unwrap();
        assert_eq!(
            input,
            InequalityInput::Linear { a: 1.0, b: 0.0, c: 2.0, comparison: Comparison::GreaterOrEqual }
        );
    }
}
