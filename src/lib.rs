//! gnuplotter
//!
//! A small Rust library for rendering numeric series to image files with
//! [gnuplot](http://www.gnuplot.info). Pairs with the `gnuplotter` CLI.
//!
//! ### Features
//! - Plot a flat sequence, several named sequences, or sparse x→y maps (e.g. timestamps)
//! - PNG, SVG and PDF output (PDF via `ps2pdf`)
//! - Titles, labels, ranges, margins, time axes, log scale, locale options
//! - Trailing moving-average smoothing
//! - Blocking, callback and (with the `async` feature) tokio entry points
//!
//! ### Example
//! ```no_run
//! use gnuplotter::{PlotData, PlotRequest};
//!
//! let mut req = PlotRequest::new(
//!     PlotData::Named(vec![
//!         ("cpu".into(), vec![3.0, 1.0, 2.0, 3.0, 4.0]),
//!         ("mem".into(), vec![1.0, 1.5, 1.2, 1.1, 1.9]),
//!     ]),
//!     "load.png",
//! );
//! req.title = Some("Load".into());
//! req.moving_avg = Some(3);
//! gnuplotter::plot(req)?;
//! # Ok::<(), gnuplotter::PlotError>(())
//! ```

pub mod command;
pub mod error;
pub mod models;
pub mod plot;
pub mod runner;
pub mod script;
pub mod series;
pub mod settings;
pub mod smoothing;

pub use error::PlotError;
pub use models::{AxisRange, Format, Margin, PlotData, PlotRequest, TimeAxis, XRotate, XValue};
pub use plot::{plot, plot_with, plot_with_runner, render_script, spawn_plot};
#[cfg(feature = "async")]
pub use plot::plot_async;
pub use runner::{GnuplotRunner, OutputTarget, ProcessOutput, ScriptRunner};
pub use series::{Series, SeriesSet};
