use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gnuplotter::{Format, GnuplotRunner, PlotData, PlotRequest, TimeAxis, XValue};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "gnuplotter",
    version,
    about = "Render numeric series to PNG, SVG or PDF with gnuplot"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot series to a file (or print the gnuplot script with --dump).
    Plot(PlotArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Png,
    Pdf,
    Svg,
}

impl From<OutFormat> for Format {
    fn from(f: OutFormat) -> Self {
        match f {
            OutFormat::Png => Format::Png,
            OutFormat::Pdf => Format::Pdf,
            OutFormat::Svg => Format::Svg,
        }
    }
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Output file. If omitted, taken from the request file.
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Values of a single series separated by comma or semicolon (e.g., 3,1,2,3,4)
    #[arg(short, long, conflicts_with = "csv")]
    data: Option<String>,
    /// CSV file with a header row of series names and one row per sample.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Use the first CSV column as x-coordinates instead of the row number.
    #[arg(long, default_value_t = false, requires = "csv")]
    x_column: bool,
    /// JSON request file; command-line flags override its fields.
    #[arg(long)]
    request: Option<PathBuf>,
    /// Output format. If omitted, inferred from the request or the --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// gnuplot style (lines, linespoints, points, ...).
    #[arg(long)]
    style: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    xlabel: Option<String>,
    #[arg(long)]
    ylabel: Option<String>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Moving-average window.
    #[arg(long)]
    moving_avg: Option<usize>,
    /// Moving-maximum window (computes the trailing mean, like --moving-avg).
    #[arg(long)]
    moving_max: Option<usize>,
    /// Treat x as Unix seconds; value is "hours", "days" or a gnuplot time format.
    #[arg(long)]
    time: Option<String>,
    #[arg(long, default_value_t = false)]
    logscale: bool,
    /// Hide the legend.
    #[arg(long, default_value_t = false)]
    nokey: bool,
    #[arg(long, default_value_t = false)]
    hide_series_title: bool,
    /// gnuplot executable.
    #[arg(long, default_value = "gnuplot")]
    gnuplot: String,
    /// ps2pdf executable (pdf output only).
    #[arg(long, default_value = "ps2pdf")]
    ps2pdf: String,
    /// Print the generated script to stdout instead of running gnuplot.
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn parse_list(s: &str) -> Result<Vec<f64>> {
    s.split([',', ';'])
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<f64>()
                .with_context(|| format!("invalid number in --data: {x:?}"))
        })
        .collect()
}

/// Read series from CSV: header = series names, one row per sample, empty cells skipped.
fn read_csv(path: &Path, x_column: bool) -> Result<PlotData> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open CSV file: {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let skip = usize::from(x_column);
    let mut series: Vec<(String, Vec<(XValue, f64)>)> = headers
        .iter()
        .skip(skip)
        .map(|h| (h.to_string(), Vec::new()))
        .collect();

    for (row_num, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {}", row_num + 1))?;
        let x = if x_column {
            XValue::from(record.get(0).unwrap_or_default().trim())
        } else {
            XValue::from(row_num)
        };
        for (i, cell) in record.iter().skip(skip).enumerate() {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let y = cell.parse::<f64>().with_context(|| {
                format!("invalid number {cell:?} in CSV row {}", row_num + 1)
            })?;
            if let Some((_, points)) = series.get_mut(i) {
                points.push((x.clone(), y));
            }
        }
    }
    Ok(PlotData::Sparse(series))
}

fn load_request(path: &Path) -> Result<PlotRequest> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read request file: {}", path.display()))?;
    serde_json::from_str(&txt)
        .with_context(|| format!("failed to parse request file: {}", path.display()))
}

fn build_request(args: &PlotArgs) -> Result<PlotRequest> {
    let mut req = match &args.request {
        Some(path) => load_request(path)?,
        None => PlotRequest::default(),
    };

    if let Some(d) = &args.data {
        req.data = Some(PlotData::Flat(parse_list(d)?));
    }
    if let Some(path) = &args.csv {
        req.data = Some(read_csv(path, args.x_column)?);
    }
    if let Some(out) = &args.out {
        req.filename = Some(out.clone());
        if args.format.is_none() && args.request.is_none() {
            req.format = Format::from_path(out);
        }
    }
    if let Some(f) = args.format {
        req.format = f.into();
    }
    if args.style.is_some() {
        req.style = args.style.clone();
    }
    if args.title.is_some() {
        req.title = args.title.clone();
    }
    if args.xlabel.is_some() {
        req.xlabel = args.xlabel.clone();
    }
    if args.ylabel.is_some() {
        req.ylabel = args.ylabel.clone();
    }
    if args.width.is_some() {
        req.width = args.width;
    }
    if args.height.is_some() {
        req.height = args.height;
    }
    if args.moving_avg.is_some() {
        req.moving_avg = args.moving_avg;
    }
    if args.moving_max.is_some() {
        req.moving_max = args.moving_max;
    }
    if let Some(t) = &args.time {
        req.time = Some(TimeAxis::Format(t.clone()));
    }
    req.logscale |= args.logscale;
    req.nokey |= args.nokey;
    req.hide_series_title |= args.hide_series_title;
    Ok(req)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plot(args) => cmd_plot(args),
    }
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    let req = build_request(&args)?;

    if args.dump {
        print!("{}", gnuplotter::render_script(req)?);
        return Ok(());
    }

    let out = req.filename.clone();
    let runner = GnuplotRunner {
        gnuplot: args.gnuplot.clone(),
        ps2pdf: args.ps2pdf.clone(),
        ..Default::default()
    };
    gnuplotter::plot_with_runner(req, &runner).context("plot failed")?;
    if let Some(path) = out {
        eprintln!("Wrote plot to {}", path.display());
    }
    Ok(())
}
