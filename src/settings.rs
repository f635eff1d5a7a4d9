//! Resolution of a [`PlotRequest`] into fully populated render settings.
//!
//! Every default lives here, so the script builder never has to guess.

use crate::models::{AxisRange, Format, Margin, PlotRequest, TimeAxis, XRotate};

pub const DEFAULT_STYLE: &str = "lines";
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 640;
pub const DEFAULT_FONT: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f64 = 13.0;
pub const DEFAULT_PDF_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_TITLE_FONT: &str = "Helvetica";
pub const DEFAULT_TITLE_SIZE: f64 = 13.0;

/// Output driver configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminal {
    Png {
        width: u32,
        height: u32,
        font: String,
        font_size: f64,
    },
    /// Postscript, converted to pdf by `ps2pdf`.
    Pdf { font: String, font_size: f64 },
    Svg {
        width: u32,
        height: u32,
        font: String,
        font_size: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub font: String,
    pub size: f64,
}

/// Immutable, fully defaulted settings for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub format: Format,
    pub terminal: Terminal,
    pub style: String,
    pub locale: Option<String>,
    pub x_range: Option<AxisRange>,
    pub y_range: Option<AxisRange>,
    pub margin: Option<Margin>,
    pub time: Option<TimeAxis>,
    pub title: Option<Title>,
    pub logscale: bool,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub decimalsign: Option<String>,
    pub x_rotate: Option<XRotate>,
    pub y_format: Option<String>,
    pub nokey: bool,
    pub hide_series_title: bool,
    pub moving_avg: Option<usize>,
    pub moving_max: Option<usize>,
}

/// Empty strings count as "not set".
fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|s| !s.is_empty()).map(str::to_string)
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|v| *v > 0.0)
}

impl Settings {
    pub fn resolve(req: &PlotRequest) -> Self {
        let font = non_empty(req.font.as_deref());
        let width = req.width.filter(|w| *w > 0).unwrap_or(DEFAULT_WIDTH);
        let height = req.height.filter(|h| *h > 0).unwrap_or(DEFAULT_HEIGHT);

        let terminal = match req.format {
            Format::Png => Terminal::Png {
                width,
                height,
                font: font.clone().unwrap_or_else(|| DEFAULT_FONT.into()),
                font_size: positive(req.font_size).unwrap_or(DEFAULT_FONT_SIZE),
            },
            Format::Pdf => Terminal::Pdf {
                font: font.clone().unwrap_or_else(|| DEFAULT_FONT.into()),
                font_size: positive(req.font_size).unwrap_or(DEFAULT_PDF_FONT_SIZE),
            },
            Format::Svg => Terminal::Svg {
                width,
                height,
                font: font.clone().unwrap_or_else(|| DEFAULT_FONT.into()),
                font_size: positive(req.font_size).unwrap_or(DEFAULT_FONT_SIZE),
            },
        };

        let title = non_empty(req.title.as_deref()).map(|text| Title {
            text,
            font: font.clone().unwrap_or_else(|| DEFAULT_TITLE_FONT.into()),
            size: positive(req.title_size).unwrap_or(DEFAULT_TITLE_SIZE),
        });

        Self {
            format: req.format,
            terminal,
            style: non_empty(req.style.as_deref()).unwrap_or_else(|| DEFAULT_STYLE.into()),
            locale: non_empty(req.locale.as_deref()),
            x_range: req.x_range.clone(),
            y_range: req.y_range.clone(),
            margin: req.margin,
            time: req
                .time
                .clone()
                .filter(|t| !matches!(t, TimeAxis::Format(f) if f.is_empty())),
            title,
            logscale: req.logscale,
            xlabel: non_empty(req.xlabel.as_deref()),
            ylabel: non_empty(req.ylabel.as_deref()),
            decimalsign: non_empty(req.decimalsign.as_deref()),
            x_rotate: req.x_rotate,
            y_format: non_empty(req.y_format.as_deref()),
            nokey: req.nokey,
            hide_series_title: req.hide_series_title,
            moving_avg: req.moving_avg.filter(|n| *n > 0),
            moving_max: req.moving_max.filter(|n| *n > 0),
        }
    }
}
