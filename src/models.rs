use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Window used by the smoothing filters when none (or an unusable one) is given.
pub const DEFAULT_WINDOW: usize = 3;

/// Output file format.
///
/// Unknown format strings deserialize to `Png`, the default terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Pdf,
    Svg,
    #[default]
    #[serde(other)]
    Png,
}

impl Format {
    /// Infer the format from a file extension (`.pdf`, `.svg`, anything else is png).
    pub fn from_path(path: &std::path::Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("pdf") => Format::Pdf,
            Some("svg") => Format::Svg,
            _ => Format::Png,
        }
    }
}

/// An x-coordinate: either a number or a string written to gnuplot verbatim.
///
/// String keys are never coerced, so `"01"` stays `"01"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Number(n) => write!(f, "{}", n),
            XValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<usize> for XValue {
    fn from(i: usize) -> Self {
        XValue::Number(i as f64)
    }
}

impl From<f64> for XValue {
    fn from(n: f64) -> Self {
        XValue::Number(n)
    }
}

impl From<i64> for XValue {
    fn from(n: i64) -> Self {
        XValue::Number(n as f64)
    }
}

impl From<&str> for XValue {
    fn from(s: &str) -> Self {
        XValue::Text(s.to_string())
    }
}

impl From<String> for XValue {
    fn from(s: String) -> Self {
        XValue::Text(s)
    }
}

/// Timestamps become Unix epoch seconds, the input format used by the time axis.
impl From<DateTime<Utc>> for XValue {
    fn from(t: DateTime<Utc>) -> Self {
        XValue::Number(t.timestamp() as f64)
    }
}

/// Caller-supplied series data.
///
/// JSON input maps onto the variants as follows:
/// - `[3, 1, 2]` → `Flat`
/// - `{"a": [1, 2], "b": [3]}` → `Named`
/// - `{"a": {"1500000000": 5}}` → `Sparse` (also used when an object mixes
///   arrays and objects; array entries then get positional keys)
#[derive(Debug, Clone, PartialEq)]
pub enum PlotData {
    /// One unnamed series; plotted as `"Series 1"` with positional x.
    Flat(Vec<f64>),
    /// Named series with positional x, in the order given.
    Named(Vec<(String, Vec<f64>)>),
    /// Named series with explicit x-coordinates, in the order given.
    Sparse(Vec<(String, Vec<(XValue, f64)>)>),
}

impl From<Vec<f64>> for PlotData {
    fn from(v: Vec<f64>) -> Self {
        PlotData::Flat(v)
    }
}

/// A `null` sample is a gap: kept as NaN so it is plotted as undefined and
/// skipped by the smoothing window.
fn sample(v: Option<f64>) -> f64 {
    v.unwrap_or(f64::NAN)
}

/// Values of one entry in a JSON series object.
enum SeriesValues {
    Dense(Vec<f64>),
    Keyed(Vec<(XValue, f64)>),
}

impl<'de> Deserialize<'de> for SeriesValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{MapAccess, SeqAccess, Visitor};
        struct ValuesVisitor;

        impl<'de> Visitor<'de> for ValuesVisitor {
            type Value = SeriesValues;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an array of numbers or an object mapping x to numbers")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(v) = seq.next_element::<Option<f64>>()? {
                    out.push(sample(v));
                }
                Ok(SeriesValues::Dense(out))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, Option<f64>>()? {
                    out.push((XValue::Text(k), sample(v)));
                }
                Ok(SeriesValues::Keyed(out))
            }
        }

        deserializer.deserialize_any(ValuesVisitor)
    }
}

impl<'de> Deserialize<'de> for PlotData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{MapAccess, SeqAccess, Visitor};
        struct DataVisitor;

        impl<'de> Visitor<'de> for DataVisitor {
            type Value = PlotData;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an array of numbers or an object of named series")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(v) = seq.next_element::<Option<f64>>()? {
                    out.push(sample(v));
                }
                Ok(PlotData::Flat(out))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, SeriesValues)> = Vec::new();
                while let Some((name, values)) = map.next_entry::<String, SeriesValues>()? {
                    entries.push((name, values));
                }

                let all_dense = entries
                    .iter()
                    .all(|(_, v)| matches!(v, SeriesValues::Dense(_)));
                if all_dense {
                    let named = entries
                        .into_iter()
                        .filter_map(|(name, v)| match v {
                            SeriesValues::Dense(ys) => Some((name, ys)),
                            SeriesValues::Keyed(_) => None,
                        })
                        .collect();
                    return Ok(PlotData::Named(named));
                }

                let sparse = entries
                    .into_iter()
                    .map(|(name, v)| match v {
                        SeriesValues::Dense(ys) => (
                            name,
                            ys.into_iter()
                                .enumerate()
                                .map(|(i, y)| (XValue::from(i), y))
                                .collect(),
                        ),
                        SeriesValues::Keyed(points) => (name, points),
                    })
                    .collect();
                Ok(PlotData::Sparse(sparse))
            }
        }

        deserializer.deserialize_any(DataVisitor)
    }
}

/// Inclusive axis range; bounds are written quoted, exactly as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: XValue,
    pub max: XValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Rotation of the x tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XRotate {
    pub value: f64,
    #[serde(default)]
    pub x_offset: f64,
    #[serde(default)]
    pub y_offset: f64,
}

/// Time mode for the x axis. Input is always Unix epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeAxis {
    /// Hours and minutes (`%H:%M`).
    Default,
    /// `"days"`, `"hours"` or a raw gnuplot time format string.
    Format(String),
}

/// Everything needed for one plot invocation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRequest {
    pub data: Option<PlotData>,
    pub filename: Option<PathBuf>,
    #[serde(default)]
    pub format: Format,
    /// gnuplot style (`lines`, `linespoints`, `points`, ...). Defaults to `lines`.
    pub style: Option<String>,
    #[serde(default, rename = "moving_avg", deserialize_with = "de_window")]
    pub moving_avg: Option<usize>,
    #[serde(default, rename = "moving_max", deserialize_with = "de_window")]
    pub moving_max: Option<usize>,
    pub title: Option<String>,
    pub title_size: Option<f64>,
    pub font: Option<String>,
    pub font_size: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub locale: Option<String>,
    pub x_range: Option<AxisRange>,
    pub y_range: Option<AxisRange>,
    pub margin: Option<Margin>,
    #[serde(default, deserialize_with = "de_time_axis")]
    pub time: Option<TimeAxis>,
    #[serde(default)]
    pub logscale: bool,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub decimalsign: Option<String>,
    pub x_rotate: Option<XRotate>,
    pub y_format: Option<String>,
    #[serde(default)]
    pub nokey: bool,
    #[serde(default)]
    pub hide_series_title: bool,
}

impl PlotRequest {
    /// A request with the two required fields set and everything else defaulted.
    pub fn new(data: impl Into<PlotData>, filename: impl Into<PathBuf>) -> Self {
        Self {
            data: Some(data.into()),
            filename: Some(filename.into()),
            ..Default::default()
        }
    }
}

/// Serde helper for smoothing windows.
///
/// Positive integers are taken as-is, `0`/`false`/`null`/`""` mean "not requested",
/// any other value (`true`, non-numeric strings, negative numbers) requests the
/// filter with [`DEFAULT_WINDOW`].
fn de_window<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct WindowVisitor;

    impl<'de> Visitor<'de> for WindowVisitor {
        type Value = Option<usize>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a window size, a boolean or null")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((v > 0).then_some(v as usize))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            match v {
                0 => Ok(None),
                v if v < 0 => Ok(Some(DEFAULT_WINDOW)),
                v => Ok(Some(v as usize)),
            }
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v == 0.0 {
                Ok(None)
            } else if v >= 1.0 && v.is_finite() {
                Ok(Some(v.floor() as usize))
            } else {
                Ok(Some(DEFAULT_WINDOW))
            }
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.then_some(DEFAULT_WINDOW))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((!s.is_empty()).then_some(DEFAULT_WINDOW))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(WindowVisitor)
}

/// Serde helper for `time`: `true` → default format, a string → that format,
/// `false`/`null`/`""` → no time axis.
fn de_time_axis<'de, D>(deserializer: D) -> Result<Option<TimeAxis>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct TimeVisitor;

    impl<'de> Visitor<'de> for TimeVisitor {
        type Value = Option<TimeAxis>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a boolean or a time format string")
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.then_some(TimeAxis::Default))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((!s.is_empty()).then(|| TimeAxis::Format(s.to_string())))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((v != 0).then_some(TimeAxis::Default))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((v != 0).then_some(TimeAxis::Default))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TimeVisitor)
}
