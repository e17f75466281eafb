use celpaint::dab::{DabEngine, DabParams};
use celpaint::interpolator::StrokeInterpolator;
use egui::pos2;

fn params(base_width: f32, pressure: Option<f32>) -> DabParams {
    DabParams {
        base_width,
        feather: 0.0,
        spacing_ratio: 0.5,
        pressure,
        build_up: false,
    }
}

#[test]
fn split_segments_place_the_same_dabs_as_one() {
    // Width 16 with ratio 0.5 gives spacing 8.
    let p = params(16.0, None);

    let mut split = DabEngine::new();
    let mut dabs = split.dab_segment(pos2(0.0, 0.0), pos2(7.0, 0.0), &p);
    dabs.extend(split.dab_segment(pos2(7.0, 0.0), pos2(20.0, 0.0), &p));

    let mut whole = DabEngine::new();
    let expected = whole.dab_segment(pos2(0.0, 0.0), pos2(20.0, 0.0), &p);

    assert_eq!(dabs.len(), expected.len());
    assert_eq!(dabs.len(), 2);
    for (a, b) in dabs.iter().zip(expected.iter()) {
        assert!((a.position.x - b.position.x).abs() < 1e-4);
        assert!((a.position.y - b.position.y).abs() < 1e-4);
    }
    assert!((split.leftover() - whole.leftover()).abs() < 1e-4);
}

#[test]
fn pressure_blends_width_between_half_and_full() {
    let full = params(16.0, Some(1.0));
    let none = params(16.0, Some(0.0));
    let mut engine = DabEngine::new();

    let dab = engine.single_dab(pos2(0.0, 0.0), &full);
    assert_eq!(dab.width, 16.0);
    let dab = engine.single_dab(pos2(0.0, 0.0), &none);
    assert_eq!(dab.width, 8.0);
}

#[test]
fn zero_length_segment_produces_nothing_and_keeps_leftover() {
    let p = params(16.0, None);
    let mut engine = DabEngine::new();
    engine.dab_segment(pos2(0.0, 0.0), pos2(7.0, 0.0), &p);
    let leftover = engine.leftover();

    let dabs = engine.dab_segment(pos2(7.0, 0.0), pos2(7.0, 0.0), &p);
    assert!(dabs.is_empty());
    assert_eq!(engine.leftover(), leftover);
}

#[test]
fn stabilizer_level_zero_is_identity() {
    let mut interpolator = StrokeInterpolator::new(0);
    for x in 0..10 {
        let point = interpolator.smooth(pos2(x as f32, x as f32 * 2.0), 1.0);
        assert_eq!(point.position, pos2(x as f32, x as f32 * 2.0));
    }
}

#[test]
fn stabilizer_lag_grows_with_level() {
    let mut lags = Vec::new();
    for level in [0u32, 2, 4, 8] {
        let mut interpolator = StrokeInterpolator::new(level);
        let mut last = pos2(0.0, 0.0);
        for x in 0..=20 {
            last = interpolator.smooth(pos2(x as f32, 0.0), 1.0).position;
        }
        lags.push(20.0 - last.x);
    }
    for pair in lags.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}
