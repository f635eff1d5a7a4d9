use gnuplotter::models::PlotData;
use gnuplotter::series::normalize;
use gnuplotter::smoothing::{apply_moving_filter, moving_average, moving_maximum};

fn approx(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
}

#[test]
fn moving_average_window_three() {
    let mut v = vec![3.0, 1.0, 2.0, 3.0, 4.0];
    moving_average(&mut v, 3);
    assert_eq!(v, vec![3.0, 2.0, 2.0, 2.0, 3.0]);
}

#[test]
fn moving_average_matches_trailing_mean_definition() {
    let input = vec![1.0, 7.0, -2.0, 4.5, 10.0, 0.25, 3.0];
    for n in 1..=8 {
        let mut got = input.clone();
        moving_average(&mut got, n);
        let expected: Vec<f64> = (0..input.len())
            .map(|i| {
                let start = (i + 1).saturating_sub(n);
                let w = &input[start..=i];
                w.iter().sum::<f64>() / w.len() as f64
            })
            .collect();
        assert!(approx(&got, &expected), "window {n}: {got:?} vs {expected:?}");
    }
}

#[test]
fn window_of_one_is_identity() {
    let mut v = vec![9.0, -1.0, 4.0];
    moving_average(&mut v, 1);
    assert_eq!(v, vec![9.0, -1.0, 4.0]);
}

#[test]
fn moving_maximum_reproduces_the_mean() {
    let input = vec![5.0, 1.0, 8.0, 2.0, 2.0, 9.0];
    for n in 1..=4 {
        let mut avg = input.clone();
        let mut max = input.clone();
        moving_average(&mut avg, n);
        moving_maximum(&mut max, n);
        assert_eq!(avg, max, "window {n}");
    }
}

#[test]
fn filters_apply_to_every_series_independently() {
    let mut set = normalize(PlotData::Named(vec![
        ("a".into(), vec![3.0, 1.0, 2.0, 3.0, 4.0]),
        ("b".into(), vec![10.0, 20.0]),
    ]));
    apply_moving_filter(&mut set, moving_average, 3);
    assert_eq!(set.get("a").unwrap().y, vec![3.0, 2.0, 2.0, 2.0, 3.0]);
    assert_eq!(set.get("b").unwrap().y, vec![10.0, 15.0]);
}

#[test]
fn maximum_runs_on_averaged_values() {
    let mut set = normalize(PlotData::Flat(vec![3.0, 1.0, 2.0, 3.0, 4.0]));
    apply_moving_filter(&mut set, moving_average, 3);
    apply_moving_filter(&mut set, moving_maximum, 2);
    // [3,2,2,2,3] -> window 2 -> [3, 2.5, 2, 2, 2.5]
    assert_eq!(set.get("Series 1").unwrap().y, vec![3.0, 2.5, 2.0, 2.0, 2.5]);
}
