//! Formulas turning an attached child attribute into a bonus on its parent.
//!
//! A formula must be a pure function of the two node views it receives;
//! recomputation order over a template's formula entries is only
//! deterministic under that assumption.

use core::fmt;

use crate::graph::NodeView;

/// Computes the modifier contribution of `child` to `owner`.
///
/// `owner` is observed mid-recompute: its modifier reads as zero and its
/// final value is the previous one.
pub trait AttributeFormula: fmt::Debug + Send + Sync {
    fn compute_bonus(&self, owner: NodeView<'_>, child: NodeView<'_>) -> i32;
}

/// Which value of the child a [`LinearFormula`] reads.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FormulaSource {
    Base,
    Modifier,
    #[default]
    Final,
}

/// Data-driven formula: `source × numerator / denominator + offset`.
///
/// Integer arithmetic only; division truncates toward zero. A zero
/// denominator contributes nothing.
///
/// # Example
/// ```
/// # use attribute_core::template::{FormulaSource, LinearFormula};
/// // Every point of Vitality grants 5 Health.
/// let per_vitality = LinearFormula::scale(FormulaSource::Final, 5);
/// assert_eq!(per_vitality.evaluate(10), 50);
///
/// let half = LinearFormula::new(FormulaSource::Final, 1, 2, 3);
/// assert_eq!(half.evaluate(7), 6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinearFormula {
    pub source: FormulaSource,
    pub numerator: i32,
    pub denominator: i32,
    pub offset: i32,
}

impl LinearFormula {
    pub const fn new(source: FormulaSource, numerator: i32, denominator: i32, offset: i32) -> Self {
        Self {
            source,
            numerator,
            denominator,
            offset,
        }
    }

    /// `source × factor`.
    pub const fn scale(source: FormulaSource, factor: i32) -> Self {
        Self::new(source, factor, 1, 0)
    }

    /// Applies the formula to a raw input value.
    pub fn evaluate(&self, input: i32) -> i32 {
        if self.denominator == 0 {
            return 0;
        }
        let scaled = i64::from(input) * i64::from(self.numerator) / i64::from(self.denominator)
            + i64::from(self.offset);
        scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl Default for LinearFormula {
    fn default() -> Self {
        Self::scale(FormulaSource::Final, 1)
    }
}

impl AttributeFormula for LinearFormula {
    fn compute_bonus(&self, _owner: NodeView<'_>, child: NodeView<'_>) -> i32 {
        let input = match self.source {
            FormulaSource::Base => child.base_value(),
            FormulaSource::Modifier => child.modifier(),
            FormulaSource::Final => child.final_value(),
        };
        self.evaluate(input)
    }
}

/// Adapter for formulas written as closures.
pub struct FnFormula<F> {
    label: &'static str,
    func: F,
}

impl<F> FnFormula<F> {
    pub fn new(label: &'static str, func: F) -> Self
    where
        F: Fn(NodeView<'_>, NodeView<'_>) -> i32 + Send + Sync,
    {
        Self { label, func }
    }
}

impl<F> fmt::Debug for FnFormula<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormula").field("label", &self.label).finish()
    }
}

impl<F> AttributeFormula for FnFormula<F>
where
    F: Fn(NodeView<'_>, NodeView<'_>) -> i32 + Send + Sync,
{
    fn compute_bonus(&self, owner: NodeView<'_>, child: NodeView<'_>) -> i32 {
        (self.func)(owner, child)
    }
}
