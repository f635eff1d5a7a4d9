use gnuplotter::models::{AxisRange, Format, Margin, PlotRequest, TimeAxis, XRotate, XValue};
use gnuplotter::script::setup_directives;
use gnuplotter::settings::Settings;

fn directives(req: &PlotRequest) -> Vec<String> {
    setup_directives(&Settings::resolve(req))
}

fn full_request() -> PlotRequest {
    PlotRequest {
        locale: Some("de_DE.UTF-8".into()),
        x_range: Some(AxisRange {
            min: XValue::from(0usize),
            max: XValue::from(10usize),
        }),
        y_range: Some(AxisRange {
            min: XValue::from(-1.5),
            max: XValue::from("5"),
        }),
        margin: Some(Margin {
            left: 10.0,
            right: 5.0,
            top: 3.0,
            bottom: 4.0,
        }),
        time: Some(TimeAxis::Format("days".into())),
        title: Some("T".into()),
        logscale: true,
        xlabel: Some("time".into()),
        ylabel: Some("value".into()),
        decimalsign: Some(",".into()),
        x_rotate: Some(XRotate {
            value: 45.0,
            x_offset: -2.0,
            y_offset: -1.0,
        }),
        y_format: Some("%.1f".into()),
        nokey: true,
        ..Default::default()
    }
}

#[test]
fn title_only_request() {
    let req = PlotRequest {
        title: Some("T".into()),
        ..Default::default()
    };
    let d = directives(&req);
    assert_eq!(
        d,
        vec![
            r#"set term png size 800,640 font "Arial, 13""#.to_string(),
            r#"set title "T" font "Helvetica, 13""#.to_string(),
        ]
    );
    assert_eq!(d.iter().filter(|l| l.starts_with("set title")).count(), 1);
    for prefix in ["set xrange", "set yrange", "set lmargin", "set xdata", "set xlabel", "set ylabel"] {
        assert!(!d.iter().any(|l| l.starts_with(prefix)), "unexpected {prefix}");
    }
}

#[test]
fn every_option_in_fixed_order() {
    let d = directives(&full_request());
    let expected = vec![
        r#"set term png size 800,640 font "Arial, 13""#,
        "set locale 'de_DE.UTF-8'",
        "set xrange ['0':'10']",
        "set yrange ['-1.5':'5']",
        "set lmargin 10",
        "set rmargin 5",
        "set tmargin 3",
        "set bmargin 4",
        "set xdata time",
        r#"set timefmt "%s""#,
        r#"set format x "%d/%m""#,
        r#"set xlabel """#,
        r#"set title "T" font "Helvetica, 13""#,
        "set logscale y",
        r#"set xlabel "time""#,
        r#"set ylabel "value""#,
        "set decimalsign ','",
        "set xtics rotate by 45 offset -2,-1",
        "set format y '%.1f'",
        "set nokey",
    ];
    assert_eq!(d, expected);
}

#[test]
fn order_does_not_depend_on_json_key_order() {
    let a: PlotRequest = serde_json::from_str(
        r#"{"nokey": true, "title": "T", "xlabel": "x", "locale": "C", "yRange": {"min": 0, "max": 1}}"#,
    )
    .unwrap();
    let b: PlotRequest = serde_json::from_str(
        r#"{"yRange": {"min": 0, "max": 1}, "locale": "C", "xlabel": "x", "title": "T", "nokey": true}"#,
    )
    .unwrap();
    assert_eq!(directives(&a), directives(&b));
    let d = directives(&a);
    let pos = |p: &str| d.iter().position(|l| l.starts_with(p)).unwrap();
    assert!(pos("set locale") < pos("set yrange"));
    assert!(pos("set yrange") < pos("set title"));
    assert!(pos("set title") < pos("set xlabel"));
    assert!(pos("set xlabel") < pos("set nokey"));
}

#[test]
fn time_group_is_atomic_and_defaults_to_hours() {
    let req = PlotRequest {
        time: Some(TimeAxis::Default),
        ..Default::default()
    };
    let d = directives(&req);
    assert_eq!(
        &d[1..],
        &[
            "set xdata time".to_string(),
            r#"set timefmt "%s""#.to_string(),
            r#"set format x "%H:%M""#.to_string(),
            r#"set xlabel """#.to_string(),
        ]
    );
}

#[test]
fn terminal_per_format() {
    let pdf = PlotRequest {
        format: Format::Pdf,
        ..Default::default()
    };
    assert_eq!(
        directives(&pdf)[0],
        r#"set term postscript landscape enhanced color dashed font "Arial,14""#
    );

    let svg = PlotRequest {
        format: Format::Svg,
        width: Some(1000),
        height: Some(600),
        font_size: Some(11.0),
        ..Default::default()
    };
    assert_eq!(directives(&svg)[0], r#"set term svg size 1000,600 font "Arial,11""#);

    let png = PlotRequest {
        width: Some(320),
        height: Some(200),
        font: Some("DejaVu Sans".into()),
        ..Default::default()
    };
    assert_eq!(
        directives(&png)[0],
        r#"set term png size 320,200 font "DejaVu Sans, 13""#
    );
}

#[test]
fn quotes_in_labels_are_escaped() {
    let req = PlotRequest {
        title: Some(r#"Example 'Title', "quoted" \n two lines"#.into()),
        ..Default::default()
    };
    let d = directives(&req);
    assert_eq!(
        d[1],
        r#"set title "Example 'Title', \"quoted\" \n two lines" font "Helvetica, 13""#
    );
}

#[test]
fn trailing_backslash_cannot_swallow_the_closing_quote() {
    let req = PlotRequest {
        title: Some(r"C:\".into()),
        ..Default::default()
    };
    assert_eq!(
        directives(&req)[1],
        r#"set title "C:\\" font "Helvetica, 13""#
    );
}

#[test]
fn empty_time_format_leaves_x_axis_alone() {
    let req = PlotRequest {
        time: Some(TimeAxis::Format(String::new())),
        ..Default::default()
    };
    let d = directives(&req);
    assert_eq!(d.len(), 1, "{d:?}");
    assert!(d.iter().all(|l| !l.contains("xdata")));
}
