//! Setup directives for gnuplot, built from resolved [`Settings`].

use crate::models::{AxisRange, TimeAxis};
use crate::settings::{Settings, Terminal};

/// Quote for a gnuplot double-quoted string.
///
/// Embedded `"` are escaped; other backslash sequences are kept so `\n`
/// still breaks lines in titles and labels. Raw line breaks become `\n`.
/// An odd run of backslashes in front of a `"` or at the end is padded to an
/// even one, so it can never swallow a quote.
pub fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut backslashes = 0usize;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                backslashes += 1;
                out.push(c);
                continue;
            }
            '"' => {
                if backslashes % 2 == 1 {
                    out.push('\\');
                }
                out.push_str("\\\"");
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
        backslashes = 0;
    }
    if backslashes % 2 == 1 {
        out.push('\\');
    }
    out.push('"');
    out
}

/// Quote for a gnuplot single-quoted string (`'` is doubled, no escapes).
pub fn single_quoted(s: &str) -> String {
    let escaped = s.replace(['\r', '\n'], " ").replace('\'', "''");
    format!("'{}'", escaped)
}

/// Translate the `time` option into a gnuplot display format.
pub fn time_format(time: &TimeAxis) -> &str {
    match time {
        TimeAxis::Default => "%H:%M",
        TimeAxis::Format(f) => match f.as_str() {
            "days" | "Days" => "%d/%m",
            "hours" | "Hours" => "%H:%M",
            raw => raw,
        },
    }
}

fn terminal_directive(terminal: &Terminal) -> String {
    match terminal {
        Terminal::Png {
            width,
            height,
            font,
            font_size,
        } => format!(
            "set term png size {},{} font {}",
            width,
            height,
            double_quoted(&format!("{}, {}", font, font_size))
        ),
        Terminal::Pdf { font, font_size } => format!(
            "set term postscript landscape enhanced color dashed font {}",
            double_quoted(&format!("{},{}", font, font_size))
        ),
        Terminal::Svg {
            width,
            height,
            font,
            font_size,
        } => format!(
            "set term svg size {},{} font {}",
            width,
            height,
            double_quoted(&format!("{},{}", font, font_size))
        ),
    }
}

fn range_directive(axis: &str, range: &AxisRange) -> String {
    format!(
        "set {}range [{}:{}]",
        axis,
        single_quoted(&range.min.to_string()),
        single_quoted(&range.max.to_string())
    )
}

/// Every directive that precedes the `plot` command, in fixed order:
/// terminal, locale, x/y range, margins, time axis, title, log scale,
/// axis labels, decimal sign, x tick rotation, y format, legend.
pub fn setup_directives(settings: &Settings) -> Vec<String> {
    let mut out = vec![terminal_directive(&settings.terminal)];

    if let Some(locale) = &settings.locale {
        out.push(format!("set locale {}", single_quoted(locale)));
    }

    if let Some(r) = &settings.x_range {
        out.push(range_directive("x", r));
    }
    if let Some(r) = &settings.y_range {
        out.push(range_directive("y", r));
    }

    if let Some(m) = &settings.margin {
        out.push(format!("set lmargin {}", m.left));
        out.push(format!("set rmargin {}", m.right));
        out.push(format!("set tmargin {}", m.top));
        out.push(format!("set bmargin {}", m.bottom));
    }

    // The four time directives go together or not at all.
    if let Some(time) = &settings.time {
        out.push("set xdata time".to_string());
        out.push("set timefmt \"%s\"".to_string());
        out.push(format!("set format x {}", double_quoted(time_format(time))));
        out.push("set xlabel \"\"".to_string());
    }

    if let Some(title) = &settings.title {
        out.push(format!(
            "set title {} font {}",
            double_quoted(&title.text),
            double_quoted(&format!("{}, {}", title.font, title.size))
        ));
    }

    if settings.logscale {
        out.push("set logscale y".to_string());
    }

    if let Some(x) = &settings.xlabel {
        out.push(format!("set xlabel {}", double_quoted(x)));
    }
    if let Some(y) = &settings.ylabel {
        out.push(format!("set ylabel {}", double_quoted(y)));
    }

    if let Some(d) = &settings.decimalsign {
        out.push(format!("set decimalsign {}", single_quoted(d)));
    }

    if let Some(r) = &settings.x_rotate {
        out.push(format!(
            "set xtics rotate by {} offset {},{}",
            r.value, r.x_offset, r.y_offset
        ));
    }

    if let Some(f) = &settings.y_format {
        out.push(format!("set format y {}", single_quoted(f)));
    }

    if settings.nokey {
        out.push("set nokey".to_string());
    }

    out
}
