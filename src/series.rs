//! Canonical series representation and input normalization.

use crate::models::{PlotData, XValue};

/// Name given to the series built from a flat sequence.
pub const DEFAULT_SERIES_NAME: &str = "Series 1";

/// One plotted trace: parallel x/y columns in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub x: Vec<XValue>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    /// Series with positional x-coordinates `0..values.len()`.
    pub fn positional(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            x: (0..values.len()).map(XValue::from).collect(),
            y: values,
        }
    }

    /// Insert a point. An existing x keeps its position and gets the new value.
    pub fn insert(&mut self, x: XValue, y: f64) {
        match self.x.iter().position(|k| *k == x) {
            Some(i) => self.y[i] = y,
            None => {
                self.x.push(x);
                self.y.push(y);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// `(x, y)` pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (&XValue, f64)> + '_ {
        self.x.iter().zip(self.y.iter().copied())
    }
}

/// Ordered mapping from series name to series. Never sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSet {
    series: Vec<Series>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series. A series with the same name is replaced in place.
    pub fn insert(&mut self, series: Series) {
        match self.series.iter_mut().find(|s| s.name == series.name) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Series> {
        self.series.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<'a> IntoIterator for &'a SeriesSet {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

impl FromIterator<Series> for SeriesSet {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        let mut set = SeriesSet::new();
        for s in iter {
            set.insert(s);
        }
        set
    }
}

/// Convert caller data into the canonical series set.
///
/// - `Flat` becomes a single series named [`DEFAULT_SERIES_NAME`].
/// - `Named` entries get positional x-coordinates.
/// - `Sparse` keys are kept exactly as given.
pub fn normalize(data: PlotData) -> SeriesSet {
    match data {
        PlotData::Flat(values) => {
            std::iter::once(Series::positional(DEFAULT_SERIES_NAME, values)).collect()
        }
        PlotData::Named(entries) => entries
            .into_iter()
            .map(|(name, values)| Series::positional(name, values))
            .collect(),
        PlotData::Sparse(entries) => entries
            .into_iter()
            .map(|(name, points)| {
                let mut s = Series::new(name);
                for (x, y) in points {
                    s.insert(x, y);
                }
                s
            })
            .collect(),
    }
}
