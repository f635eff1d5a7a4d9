//! Public entry points: validate a request, build the script, run gnuplot.

use crate::command::build_script;
use crate::error::PlotError;
use crate::models::PlotRequest;
use crate::runner::{GnuplotRunner, OutputTarget, ProcessOutput, ScriptRunner, prepare_output};
use crate::series::normalize;
use crate::settings::Settings;
use crate::smoothing::{apply_moving_filter, moving_average, moving_maximum};
use log::{debug, info};
use std::thread::{self, JoinHandle};

/// A validated request turned into a script and a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPlot {
    pub target: OutputTarget,
    pub script: String,
}

/// Check the required fields. Runs before anything else touches the request.
pub fn validate(request: &PlotRequest) -> Result<(), PlotError> {
    let has_file = request
        .filename
        .as_ref()
        .is_some_and(|p| !p.as_os_str().is_empty());
    if request.data.is_none() || !has_file {
        return Err(PlotError::invalid_input(
            "the request must have 'data' and 'filename' set",
        ));
    }
    Ok(())
}

/// Normalize, smooth and translate a request into a complete gnuplot script.
pub fn prepare(mut request: PlotRequest) -> Result<PreparedPlot, PlotError> {
    validate(&request)?;
    let settings = Settings::resolve(&request);
    let (Some(data), Some(path)) = (request.data.take(), request.filename.take()) else {
        return Err(PlotError::invalid_input(
            "the request must have 'data' and 'filename' set",
        ));
    };

    let mut set = normalize(data);
    if let Some(n) = settings.moving_avg {
        apply_moving_filter(&mut set, moving_average, n);
    }
    if let Some(n) = settings.moving_max {
        apply_moving_filter(&mut set, moving_maximum, n);
    }

    let script = build_script(&settings, &set);
    debug!(
        "generated {} bytes of gnuplot script for {} series",
        script.len(),
        set.len()
    );

    Ok(PreparedPlot {
        target: OutputTarget {
            path,
            format: settings.format,
        },
        script,
    })
}

/// The full script for `request`, without running anything.
pub fn render_script(request: PlotRequest) -> Result<String, PlotError> {
    prepare(request).map(|p| p.script)
}

/// Render with the given runner and return what the processes printed.
pub fn run_plot<R>(request: PlotRequest, runner: &R) -> Result<ProcessOutput, PlotError>
where
    R: ScriptRunner + ?Sized,
{
    validate(&request)?;
    if let Some(path) = request.filename.as_deref() {
        prepare_output(path);
    }
    let prepared = prepare(request)?;
    let output = runner.run(&prepared.target, &prepared.script)?;
    info!("wrote {}", prepared.target.path.display());
    Ok(output)
}

/// Render with a custom runner. Resolves to `true` on success.
pub fn plot_with_runner<R>(request: PlotRequest, runner: &R) -> Result<bool, PlotError>
where
    R: ScriptRunner + ?Sized,
{
    run_plot(request, runner).map(|_| true)
}

/// Render `request` with the system `gnuplot`. Resolves to `true` on success.
///
/// ```no_run
/// use gnuplotter::{plot, PlotRequest};
///
/// let ok = plot(PlotRequest::new(vec![3.0, 1.0, 2.0, 3.0, 4.0], "out.png"))?;
/// assert!(ok);
/// # Ok::<(), gnuplotter::PlotError>(())
/// ```
pub fn plot(request: PlotRequest) -> Result<bool, PlotError> {
    plot_with_runner(request, &GnuplotRunner::default())
}

/// Callback form: `finish(error, stdout, stderr)` is called exactly once from a
/// background thread when the render completes.
///
/// Validation errors are returned immediately and `finish` is never called.
pub fn spawn_plot<R, F>(
    request: PlotRequest,
    runner: R,
    finish: F,
) -> Result<JoinHandle<()>, PlotError>
where
    R: ScriptRunner + Send + 'static,
    F: FnOnce(Option<PlotError>, String, String) + Send + 'static,
{
    validate(&request)?;
    Ok(thread::spawn(move || match run_plot(request, &runner) {
        Ok(out) => finish(None, out.stdout, out.stderr),
        Err(e) => {
            let (stdout, stderr) = match &e {
                PlotError::ExternalProcess { stdout, stderr, .. } => {
                    (stdout.clone(), stderr.clone())
                }
                _ => (String::new(), String::new()),
            };
            finish(Some(e), stdout, stderr)
        }
    }))
}

/// [`spawn_plot`] with the system `gnuplot`.
pub fn plot_with<F>(request: PlotRequest, finish: F) -> Result<JoinHandle<()>, PlotError>
where
    F: FnOnce(Option<PlotError>, String, String) + Send + 'static,
{
    spawn_plot(request, GnuplotRunner::default(), finish)
}

/// Async form of [`plot`] on the tokio runtime.
#[cfg(feature = "async")]
pub async fn plot_async(request: PlotRequest) -> Result<bool, PlotError> {
    plot_async_with_runner(request, &GnuplotRunner::default()).await
}

#[cfg(feature = "async")]
pub async fn plot_async_with_runner(
    request: PlotRequest,
    runner: &GnuplotRunner,
) -> Result<bool, PlotError> {
    validate(&request)?;
    if let Some(path) = request.filename.as_deref() {
        prepare_output(path);
    }
    let prepared = prepare(request)?;
    runner.run_async(&prepared.target, &prepared.script).await?;
    info!("wrote {}", prepared.target.path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlotData;

    #[test]
    fn validation_rejects_missing_fields() {
        let no_data = PlotRequest {
            filename: Some("out.png".into()),
            ..Default::default()
        };
        assert!(validate(&no_data).unwrap_err().is_invalid_input());

        let no_file = PlotRequest {
            data: Some(PlotData::Flat(vec![1.0])),
            ..Default::default()
        };
        assert!(validate(&no_file).unwrap_err().is_invalid_input());

        let empty_file = PlotRequest {
            data: Some(PlotData::Flat(vec![1.0])),
            filename: Some("".into()),
            ..Default::default()
        };
        assert!(validate(&empty_file).is_err());
    }

    #[test]
    fn smoothing_runs_before_emission() {
        let mut req = PlotRequest::new(vec![3.0, 1.0, 2.0, 3.0, 4.0], "out.png");
        req.moving_avg = Some(3);
        let script = render_script(req).unwrap();
        let data: Vec<&str> = script
            .lines()
            .skip_while(|l| !l.starts_with("plot"))
            .skip(1)
            .collect();
        assert_eq!(data, vec!["0 3", "1 2", "2 2", "3 2", "4 3", "e"]);
    }
}
