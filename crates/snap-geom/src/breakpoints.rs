//! Axis-tagged snap targets.
//!
//! A [`Breakpoint`] is a percentage on the horizontal (`x`) or vertical (`y`)
//! axis. Identity is `(axis, value)`: the optional source label is carried
//! along but never compared. [`Breakpoints`] is an ordered set that drops NaN
//! and out-of-range values on construction.
//!
//! Breakpoints encode as strings of the form `x(50)` or `y(33.3)`.

use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{
    error::{Error, Result},
    proportion::Proportion,
};

/// Snapping axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal axis: left and right edges.
    X,
    /// Vertical axis: top and bottom edges.
    Y,
}

impl Axis {
    /// Encoded tag for this axis.
    pub fn tag(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single snap target.
#[derive(Clone, Debug)]
pub struct Breakpoint {
    /// Axis the value applies to.
    pub axis: Axis,
    /// Position on the axis.
    pub value: Proportion,
    /// Where the breakpoint came from (for diagnostics only).
    pub source: Option<String>,
}

impl Breakpoint {
    /// Breakpoint on `axis` at `value`.
    pub fn new(axis: Axis, value: Proportion) -> Self {
        Self {
            axis,
            value,
            source: None,
        }
    }

    /// Horizontal breakpoint at `percentage`.
    pub fn x(percentage: f64) -> Self {
        Self::new(Axis::X, Proportion::percentual(percentage))
    }

    /// Vertical breakpoint at `percentage`.
    pub fn y(percentage: f64) -> Self {
        Self::new(Axis::Y, Proportion::percentual(percentage))
    }

    /// Attach a source label.
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }

    fn key(&self) -> (Axis, OrderedFloat<f64>) {
        (self.axis, OrderedFloat(self.value.percentage()))
    }

    fn is_valid(&self) -> bool {
        !self.value.is_nan() && self.value.is_in_range()
    }
}

impl PartialEq for Breakpoint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Breakpoint {}

impl Hash for Breakpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Breakpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Breakpoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.axis, self.value.percentage())
    }
}

impl FromStr for Breakpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (tag, rest) = s
            .split_once('(')
            .ok_or_else(|| Error::corrupted(format!("breakpoint `{s}`: missing `(`")))?;
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| Error::corrupted(format!("breakpoint `{s}`: missing `)`")))?;
        let axis = match tag.trim() {
            "x" => Axis::X,
            "y" => Axis::Y,
            other => {
                return Err(Error::corrupted(format!(
                    "breakpoint `{s}`: unknown axis `{other}`"
                )));
            }
        };
        let value: f64 = inner.trim().parse().map_err(|_| {
            Error::corrupted(format!("breakpoint `{s}`: `{inner}` is not a decimal"))
        })?;
        Ok(Self::new(axis, Proportion::percentual(value)))
    }
}

impl Serialize for Breakpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Breakpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Ordered, deduplicated set of breakpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct Breakpoints {
    values: BTreeSet<Breakpoint>,
}

impl Breakpoints {
    /// Build a set, dropping NaN and out-of-range values.
    pub fn new<I: IntoIterator<Item = Breakpoint>>(values: I) -> Self {
        Self {
            values: values.into_iter().filter(Breakpoint::is_valid).collect(),
        }
    }

    /// Build a set from raw percentages on one axis.
    pub fn from_percentages<I: IntoIterator<Item = f64>>(axis: Axis, values: I) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|v| Breakpoint::new(axis, Proportion::percentual(v))),
        )
    }

    /// Evenly spaced grid lines `0, 100/n, ..., 100` on both axes.
    pub fn grid(columns: u32, rows: u32) -> Self {
        let lines = |n: u32, axis: Axis| {
            let n = n.max(1);
            (0..=n).map(move |i| {
                let pct = 100.0 * f64::from(i) / f64::from(n);
                Breakpoint::new(axis, Proportion::percentual(pct))
            })
        };
        Self::new(lines(columns, Axis::X).chain(lines(rows, Axis::Y)))
    }

    /// Union with already-tagged values.
    pub fn merge<I: IntoIterator<Item = Breakpoint>>(&self, other: I) -> Self {
        Self::new(self.values.iter().cloned().chain(other))
    }

    /// Union with raw percentages tagged to `axis`.
    pub fn merge_percentages<I: IntoIterator<Item = f64>>(&self, axis: Axis, values: I) -> Self {
        self.merge(
            values
                .into_iter()
                .map(|v| Breakpoint::new(axis, Proportion::percentual(v))),
        )
    }

    /// Only the breakpoints on `axis`.
    pub fn on(&self, axis: Axis) -> Self {
        Self {
            values: self.values.iter().filter(|b| b.axis == axis).cloned().collect(),
        }
    }

    /// Coalesce values closer than `tolerance` percentage points.
    ///
    /// Each axis is scanned in descending order; a value within `tolerance`
    /// of the last kept value is dropped, so the higher value of a colliding
    /// pair survives.
    pub fn with_tolerance(&self, tolerance: f64) -> Self {
        let mut kept: BTreeSet<Breakpoint> = BTreeSet::new();
        for axis in [Axis::X, Axis::Y] {
            let mut last: Option<f64> = None;
            for b in self.values.iter().rev().filter(|b| b.axis == axis) {
                let v = b.value.percentage();
                if let Some(prev) = last
                    && (prev - v).abs() <= tolerance
                {
                    continue;
                }
                last = Some(v);
                kept.insert(b.clone());
            }
        }
        Self { values: kept }
    }

    /// Iterate in ascending `(axis, value)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.values.iter()
    }

    /// Percentages on `axis`, ascending.
    pub fn percentages(&self, axis: Axis) -> Vec<f64> {
        self.values
            .iter()
            .filter(|b| b.axis == axis)
            .map(|b| b.value.percentage())
            .collect()
    }

    /// Number of breakpoints on both axes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no breakpoints.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if any breakpoint lies on `axis`.
    pub fn has_axis(&self, axis: Axis) -> bool {
        self.values.iter().any(|b| b.axis == axis)
    }
}

impl From<Vec<Breakpoint>> for Breakpoints {
    fn from(v: Vec<Breakpoint>) -> Self {
        Self::new(v)
    }
}

impl From<Breakpoints> for Vec<Breakpoint> {
    fn from(b: Breakpoints) -> Self {
        b.values.into_iter().collect()
    }
}

impl FromIterator<Breakpoint> for Breakpoints {
    fn from_iter<I: IntoIterator<Item = Breakpoint>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Breakpoints {
    type Item = &'a Breakpoint;
    type IntoIter = std::collections::btree_set::Iter<'a, Breakpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn axis_is_part_of_identity() {
        assert_ne!(Breakpoint::x(50.0), Breakpoint::y(50.0));
        assert_eq!(
            Breakpoint::x(50.0).with_source("window 7"),
            Breakpoint::new(Axis::X, Proportion::fractional(0.5))
        );
        let set = Breakpoints::new([Breakpoint::x(50.0), Breakpoint::y(50.0), Breakpoint::x(50.0)]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn construction_filters_nan_and_out_of_range() {
        let set = Breakpoints::from_percentages(Axis::X, [f64::NAN, -1.0, 0.0, 100.0, 100.5]);
        assert_eq!(set.percentages(Axis::X), vec![0.0, 100.0]);
    }

    #[test]
    fn merge_and_on() {
        let base = Breakpoints::from_percentages(Axis::X, [0.0, 50.0]);
        let merged = base
            .merge_percentages(Axis::Y, [25.0])
            .merge([Breakpoint::x(50.0), Breakpoint::x(75.0)]);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.on(Axis::X).percentages(Axis::X), vec![0.0, 50.0, 75.0]);
        assert!(merged.on(Axis::X).percentages(Axis::Y).is_empty());
        assert_eq!(merged.on(Axis::Y).len(), 1);
    }

    #[test]
    fn tolerance_keeps_higher_of_colliding_pair() {
        let set = Breakpoints::from_percentages(Axis::X, [10.0, 10.5, 11.2, 50.0])
            .merge_percentages(Axis::Y, [10.0, 10.5]);
        let coalesced = set.with_tolerance(1.0);
        // 11.2 kept, 10.5 dropped (within 1.0 of 11.2), 10.0 kept (1.2 from 11.2)
        assert_eq!(coalesced.percentages(Axis::X), vec![10.0, 11.2, 50.0]);
        assert_eq!(coalesced.percentages(Axis::Y), vec![10.5]);
    }

    #[test]
    fn string_encoding() {
        assert_eq!(Breakpoint::x(50.0).to_string(), "x(50)");
        assert_eq!(Breakpoint::y(33.25).to_string(), "y(33.25)");
        let b: Breakpoint = "y(12.5)".parse().unwrap();
        assert_eq!(b, Breakpoint::y(12.5));
        let set = Breakpoints::new([Breakpoint::y(10.0), Breakpoint::x(20.0)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["x(20)","y(10)"]"#);
    }

    #[test]
    fn unknown_axis_is_data_corruption() {
        let err = "z(10)".parse::<Breakpoint>().unwrap_err();
        assert!(matches!(
            err,
            Error::DataCorrupted { ref description } if description.contains("unknown axis `z`")
        ));
        assert!(matches!("x10".parse::<Breakpoint>(), Err(Error::DataCorrupted { .. })));
        assert!(matches!("x(10".parse::<Breakpoint>(), Err(Error::DataCorrupted { .. })));
        assert!(matches!("x(ten)".parse::<Breakpoint>(), Err(Error::DataCorrupted { .. })));
        assert!(serde_json::from_str::<Breakpoint>(r#""z(10)""#).is_err());
    }

    #[test]
    fn grid_lines() {
        let g = Breakpoints::grid(4, 2);
        assert_eq!(g.percentages(Axis::X), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(g.percentages(Axis::Y), vec![0.0, 50.0, 100.0]);
    }

    proptest! {
        #[test]
        fn encoded_values_round_trip(x in 0.0f64..=100.0, is_x in any::<bool>()) {
            let b = if is_x { Breakpoint::x(x) } else { Breakpoint::y(x) };
            let back: Breakpoint = b.to_string().parse().unwrap();
            prop_assert_eq!(back, b);
        }

        #[test]
        fn tolerance_separates_values(
            xs in proptest::collection::vec(0.0f64..=100.0, 0..40),
            ys in proptest::collection::vec(0.0f64..=100.0, 0..40),
            tolerance in 0.0f64..20.0,
        ) {
            let set = Breakpoints::from_percentages(Axis::X, xs).merge_percentages(Axis::Y, ys);
            let coalesced = set.with_tolerance(tolerance);
            for axis in [Axis::X, Axis::Y] {
                let v = coalesced.percentages(axis);
                for pair in v.windows(2) {
                    prop_assert!((pair[1] - pair[0]).abs() > tolerance);
                }
            }
        }
    }
}
