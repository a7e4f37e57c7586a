use super::*;

fn pacing() -> PacingConfig {
    PacingConfig::default()
}

#[test]
fn five_slides_over_205_seconds() {
    let a = allocate(5, Some(205.0), &pacing()).unwrap();
    assert_eq!(a.durations, vec![10.0, 60.0, 60.0, 60.0, 15.0]);
    assert!(a.warnings.is_empty());
}

#[test]
fn zero_slides_is_invalid_input() {
    let err = allocate(0, Some(100.0), &pacing()).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}

#[test]
fn sum_and_pins_hold_for_non_negative_residuals() {
    let p = pacing();
    for n in 2..40usize {
        for total in [25.0, 26.5, 60.0, 181.25, 205.0, 600.0, 3599.9] {
            let a = allocate(n, Some(total), &p).unwrap();
            assert_eq!(a.durations.len(), n);
            assert_eq!(a.durations[0], p.opening_secs);
            assert_eq!(*a.durations.last().unwrap(), p.closing_secs);
            let residual = total - p.opening_secs - p.closing_secs;
            if n > 2 && residual > 0.0 {
                assert!((a.total_secs() - total).abs() < 1e-9, "n={n} total={total}");
                assert!(a.warnings.is_empty());
            }
        }
    }
}

#[test]
fn negative_residual_clamps_to_floor_and_warns() {
    let p = pacing();
    for (n, total) in [(3, 5.0), (10, 20.0), (50, 30.0), (4, 25.0)] {
        let a = allocate(n, Some(total), &p).unwrap();
        assert_eq!(a.durations.len(), n);
        for d in &a.durations {
            assert!(*d >= p.min_slide_secs, "n={n} total={total} d={d}");
            assert!(*d > 0.0);
        }
        assert!(matches!(
            a.warnings.as_slice(),
            [QualityWarning::DurationClamped { floor_secs, .. }] if *floor_secs == p.min_slide_secs
        ));
    }
}

#[test]
fn small_positive_share_is_kept_below_floor() {
    let a = allocate(10, Some(29.0), &pacing()).unwrap();
    let mut expected = vec![10.0];
    expected.extend(std::iter::repeat_n(0.5, 8));
    expected.push(15.0);
    assert_eq!(a.durations, expected);
    assert!((a.total_secs() - 29.0).abs() < 1e-9);
    assert!(a.warnings.is_empty());
}

#[test]
fn zero_residual_clamps_to_floor() {
    let a = allocate(4, Some(25.0), &pacing()).unwrap();
    assert_eq!(a.durations, vec![10.0, 1.0, 1.0, 15.0]);
    assert_eq!(a.warnings.len(), 1);
}

#[test]
fn floor_is_configurable() {
    let p = PacingConfig {
        min_slide_secs: 2.5,
        ..PacingConfig::default()
    };
    let a = allocate(6, Some(20.0), &p).unwrap();
    assert_eq!(a.durations, vec![10.0, 2.5, 2.5, 2.5, 2.5, 15.0]);
    // A positive share ignores the floor.
    let b = allocate(6, Some(26.0), &p).unwrap();
    assert_eq!(b.durations, vec![10.0, 0.25, 0.25, 0.25, 0.25, 15.0]);
}

#[test]
fn single_slide_gets_opening_allowance() {
    let a = allocate(1, Some(400.0), &pacing()).unwrap();
    assert_eq!(a.durations, vec![10.0]);
}

#[test]
fn two_slides_have_no_middle() {
    let a = allocate(2, Some(400.0), &pacing()).unwrap();
    assert_eq!(a.durations, vec![10.0, 15.0]);
    assert!(a.warnings.is_empty());
}

#[test]
fn missing_or_zero_audio_uses_default_total() {
    let p = pacing();
    let none = allocate(4, None, &p).unwrap();
    let zero = allocate(4, Some(0.0), &p).unwrap();
    assert_eq!(none.durations, vec![10.0, 77.5, 77.5, 15.0]);
    assert_eq!(none, zero);
    assert_eq!(none.budget_secs, 180.0);
}

#[test]
fn alternate_pacing_scheme_is_injected() {
    let p = PacingConfig {
        opening_secs: 3.0,
        closing_secs: 5.0,
        default_total_secs: 20.0,
        min_slide_secs: 0.5,
    };
    let a = allocate(6, None, &p).unwrap();
    assert_eq!(a.durations, vec![3.0, 3.0, 3.0, 3.0, 3.0, 5.0]);
}

#[test]
fn negative_or_nan_audio_is_invalid_input() {
    assert!(allocate(3, Some(-1.0), &pacing()).is_err());
    assert!(allocate(3, Some(f64::NAN), &pacing()).is_err());
}
