use gnuplotter::models::{PlotData, XValue};
use gnuplotter::series::{DEFAULT_SERIES_NAME, normalize};

#[test]
fn flat_sequence_becomes_series_1() {
    let set = normalize(PlotData::Flat(vec![3.0, 1.0, 2.0, 3.0, 4.0]));
    assert_eq!(set.len(), 1);
    let s = set.get(DEFAULT_SERIES_NAME).expect("Series 1 present");
    assert_eq!(s.name, "Series 1");
    let xs: Vec<XValue> = (0..5usize).map(XValue::from).collect();
    assert_eq!(s.x, xs);
    assert_eq!(s.y, vec![3.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn named_series_keep_insertion_order() {
    // Deliberately not alphabetical
    let set = normalize(PlotData::Named(vec![
        ("zeta".into(), vec![1.0, 2.0]),
        ("alpha".into(), vec![5.0]),
        ("mid".into(), vec![]),
    ]));
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    let zeta = set.get("zeta").unwrap();
    assert_eq!(zeta.x, vec![XValue::Number(0.0), XValue::Number(1.0)]);
    assert_eq!(zeta.y, vec![1.0, 2.0]);
    assert!(set.get("mid").unwrap().is_empty());
}

#[test]
fn sparse_keys_are_preserved_verbatim() {
    let set = normalize(PlotData::Sparse(vec![(
        "line".into(),
        vec![
            (XValue::from("5"), 6.0),
            (XValue::from("1"), 5.0),
            (XValue::from("007"), 1.0),
        ],
    )]));
    let line = set.get("line").unwrap();
    let xs: Vec<String> = line.x.iter().map(|x| x.to_string()).collect();
    // Not sorted, not coerced
    assert_eq!(xs, vec!["5", "1", "007"]);
    assert_eq!(line.y, vec![6.0, 5.0, 1.0]);
}
