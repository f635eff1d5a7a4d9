//! The `plot` command, inline data blocks, and full script assembly.

use crate::script::{setup_directives, single_quoted};
use crate::series::SeriesSet;
use crate::settings::Settings;

/// Marker that ends one inline data block.
pub const END_OF_DATA: &str = "e";

/// `plot '-' using 1:2 with <style> title '<name>', ...`
///
/// One entry per series in set order. With `hide_series_title` every entry
/// gets `notitle`. An empty set yields a bare `plot`, which gnuplot rejects.
pub fn plot_directive(set: &SeriesSet, style: &str, hide_series_title: bool) -> String {
    let entries: Vec<String> = set
        .iter()
        .map(|s| {
            let title = if hide_series_title {
                "notitle".to_string()
            } else {
                format!("title {}", single_quoted(&s.name))
            };
            format!("'-' using 1:2 with {} {}", style, title)
        })
        .collect();

    if entries.is_empty() {
        "plot".to_string()
    } else {
        format!("plot {}", entries.join(", "))
    }
}

/// `"<x> <y>"` lines for every series, each block closed by [`END_OF_DATA`].
pub fn data_blocks(set: &SeriesSet) -> Vec<String> {
    let mut out = Vec::new();
    for series in set {
        out.extend(series.points().map(|(x, y)| format!("{} {}", x, y)));
        out.push(END_OF_DATA.to_string());
    }
    out
}

/// Every line of the script: setup, `plot`, then the data blocks.
pub fn directive_stream(settings: &Settings, set: &SeriesSet) -> Vec<String> {
    let mut lines = setup_directives(settings);
    lines.push(plot_directive(
        set,
        &settings.style,
        settings.hide_series_title,
    ));
    lines.extend(data_blocks(set));
    lines
}

/// The script as sent to gnuplot's stdin, one newline-terminated line per directive.
pub fn build_script(settings: &Settings, set: &SeriesSet) -> String {
    let mut script = String::new();
    for line in directive_stream(settings, set) {
        script.push_str(&line);
        script.push('\n');
    }
    script
}
