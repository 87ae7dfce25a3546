//! Solution sets on the real line.

use serde::{Deserialize, Serialize};

use crate::formulas::fmt_num;

/// Finite end of an interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub fn open(value: f64) -> Self {
        Self { value, inclusive: false }
    }

    pub fn closed(value: f64) -> Self {
        Self { value, inclusive: true }
    }
}

/// Connected subset of ℝ; `None` marks an infinite end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Interval {
    /// (-∞, upper)
    pub fn below(upper: Bound) -> Self {
        Self { lower: None, upper: Some(upper) }
    }

    /// (lower, ∞)
    pub fn above(lower: Bound) -> Self {
        Self { lower: Some(lower), upper: None }
    }

    pub fn between(lower: Bound, upper: Bound) -> Self {
        Self { lower: Some(lower), upper: Some(upper) }
    }

    /// [x, x]
    pub fn point(x: f64) -> Self {
        Self::between(Bound::closed(x), Bound::closed(x))
    }

    pub fn contains(&self, x: f64) -> bool {
        let above_lower = self
            .lower
            .map_or(true, |b| if b.inclusive { x >= b.value } else { x > b.value });
        let below_upper = self
            .upper
            .map_or(true, |b| if b.inclusive { x <= b.value } else { x < b.value });
        above_lower && below_upper
    }

    /// Interval notation, e.g. `(-∞, 2]`
    pub fn notation(&self) -> String {
        let left = match self.lower {
            None => "(-∞".to_string(),
            Some(b) => format!("{}{}", if b.inclusive { '[' } else { '(' }, fmt_num(b.value)),
        };
        let right = match self.upper {
            None => "∞)".to_string(),
            Some(b) => format!("{}{}", fmt_num(b.value), if b.inclusive { ']' } else { ')' }),
        };
        format!("{}, {}", left, right)
    }

    /// Inequality notation in `x`, e.g. `-1 < x ≤ 3`
    pub fn inequality(&self) -> String {
        let lower_op = |b: Bound| if b.inclusive { "≤" } else { "<" };
        match (self.lower, self.upper) {
            (None, None) => "x ∈ ℝ".to_string(),
            (None, Some(u)) => format!("x {} {}", lower_op(u), fmt_num(u.value)),
            (Some(l), None) => format!("x {} {}", if l.inclusive { "≥" } else { ">" }, fmt_num(l.value)),
            (Some(l), Some(u)) if l.value == u.value => format!("x = {}", fmt_num(l.value)),
            (Some(l), Some(u)) => format!(
                "{} {} x {} {}",
                fmt_num(l.value),
                lower_op(l),
                lower_op(u),
                fmt_num(u.value)
            ),
        }
    }
}

/// Solution set of an inequality.
///
/// `TwoIntervals` is always ordered: the first interval lies entirely left of
/// the second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "intervals", rename_all = "snake_case")]
pub enum Solution {
    Interval(Interval),
    TwoIntervals(Interval, Interval),
    AllReals,
    NoSolution,
}

impl Solution {
    /// Everything except `x`
    pub fn all_except(x: f64) -> Self {
        Solution::TwoIntervals(Interval::below(Bound::open(x)), Interval::above(Bound::open(x)))
    }

    /// (-∞, left) ∪ (right, ∞) with the given closedness
    pub fn outside(left: f64, right: f64, inclusive: bool) -> Self {
        let (left, right) = if left <= right { (left, right) } else { (right, left) };
        let make = if inclusive { Bound::closed } else { Bound::open };
        Solution::TwoIntervals(Interval::below(make(left)), Interval::above(make(right)))
    }

    /// (left, right) with the given closedness
    pub fn inside(left: f64, right: f64, inclusive: bool) -> Self {
        let (left, right) = if left <= right { (left, right) } else { (right, left) };
        let make = if inclusive { Bound::closed } else { Bound::open };
        Solution::Interval(Interval::between(make(left), make(right)))
    }

    pub fn contains(&self, x: f64) -> bool {
        match self {
            Solution::Interval(i) => i.contains(x),
            Solution::TwoIntervals(a, b) => a.contains(x) || b.contains(x),
            Solution::AllReals => true,
            Solution::NoSolution => false,
        }
    }

    pub fn notation(&self) -> String {
        match self {
            Solution::Interval(i) => i.notation(),
            Solution::TwoIntervals(a, b) => format!("{} ∪ {}", a.notation(), b.notation()),
            Solution::AllReals => "(-∞, ∞)".to_string(),
            Solution::NoSolution => "∅".to_string(),
        }
    }

    pub fn inequality(&self) -> String {
        match self {
            Solution::Interval(i) => i.inequality(),
            Solution::TwoIntervals(a, b) => match (a.upper, b.lower) {
                (Some(u), Some(l)) if u.value == l.value && !u.inclusive && !l.inclusive => {
                    format!("x ≠ {}", fmt_num(u.value))
                }
                _ => format!("{} or {}", a.inequality(), b.inequality()),
            },
            Solution::AllReals => "all real numbers".to_string(),
            Solution::NoSolution => "no solution".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation() {
        assert_eq!(Interval::below(Bound::open(2.0)).notation(), "(-∞, 2)");
        assert_eq!(Interval::between(Bound::open(-1.0), Bound::closed(3.5)).notation(), "(-1, 3.5]");
        assert_eq!(Solution::outside(3.0, -1.0, false).notation(), "(-∞, -1) ∪ (3, ∞)");
        assert_eq!(Solution::NoSolution.notation(), "∅");
    }

    #[test]
    fn test_inequality_text() {
        assert_eq!(Interval::below(Bound::open(2.0)).inequality(), "x < 2");
        assert_eq!(Interval::above(Bound::closed(0.5)).inequality(), "x ≥ 0.5");
        assert_eq!(Interval::point(4.0).inequality(), "x = 4");
        assert_eq!(Solution::all_except(1.0).inequality(), "x ≠ 1");
        assert_eq!(Solution::inside(-2.0, 2.0, true).inequality(), "-2 ≤ x ≤ 2");
    }

    #[test]
    fn test_contains() {
        let s = Solution::outside(-1.0, 3.0, true);
        assert!(s.contains(-1.0) && s.contains(3.0) && s.contains(10.0));
        assert!(!s.contains(0.0));
        assert!(!Solution::all_except(1.0).contains(1.0));
        assert!(Interval::point(4.0).contains(4.0));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Solution::AllReals).unwrap();
        assert_eq!(json["kind"], "all_reals");
        let json = serde_json::to_value(Solution::inside(0.0, 1.0, false)).unwrap();
        assert_eq!(json["kind"], "interval");
        assert_eq!(json["intervals"]["upper"]["value"], 1.0);
    }
}
