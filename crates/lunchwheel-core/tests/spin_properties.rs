use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lunchwheel_core::catalog::Catalog;
use lunchwheel_core::resolver::{resolve_segment, SpinResolver, FULL_TURN};
use lunchwheel_core::session::{Screen, Session};
use lunchwheel_core::wheel::{SpinRequest, WheelState};

#[test]
fn test_resolved_index_always_in_range() {
    let mut rng = StdRng::seed_from_u64(2024);
    for n in 1..=24 {
        for _ in 0..500 {
            let r: f64 = rng.gen_range(-1e6..1e6);
            let index = resolve_segment(r, n).unwrap();
            assert!(index < n, "n={n} r={r} index={index}");
        }
    }
}

#[test]
fn test_resolution_is_periodic() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in 1..=16 {
        for _ in 0..200 {
            // Integer-valued rotations keep r + 360 exact.
            let r = f64::from(rng.gen_range(-100_000i32..100_000));
            assert_eq!(
                resolve_segment(r, n).unwrap(),
                resolve_segment(r + FULL_TURN, n).unwrap(),
                "n={n} r={r}"
            );
        }
    }
}

#[test]
fn test_every_boundary_belongs_to_next_segment() {
    // For each segment k, pick the rotation that puts the pointer exactly on
    // the start of k: adjusted = k * w  =>  rotation = 90 - k * w.
    for n in [2usize, 3, 4, 5, 6, 8, 9, 10, 12] {
        let width = FULL_TURN / n as f64;
        for k in 0..n {
            let rotation = 90.0 - k as f64 * width;
            assert_eq!(resolve_segment(rotation, n).unwrap(), k, "n={n} k={k}");
        }
    }
}

#[test]
fn test_plan_spin_strictly_forward() {
    let resolver = SpinResolver::default();
    let mut rng = StdRng::seed_from_u64(5);
    for start in [0.0, 359.9, 7200.0, 123_456.7] {
        for _ in 0..50 {
            assert!(resolver.plan_spin(start, &mut rng) > start);
        }
    }
}

#[test]
fn test_spin_results_cover_every_segment() {
    let resolver = SpinResolver::default();
    let mut rng = StdRng::seed_from_u64(31337);
    let n = 6;
    let mut hits = vec![0usize; n];
    let mut rotation = 0.0;
    for _ in 0..6000 {
        rotation = resolver.plan_spin(rotation, &mut rng);
        hits[resolve_segment(rotation, n).unwrap()] += 1;
    }
    for (i, count) in hits.iter().enumerate() {
        // Expected 1000 each; a fair wheel stays well inside this band.
        assert!((800..1200).contains(count), "segment {i} hit {count} times");
    }
}

#[test]
fn test_quick_stop_emits_single_result() {
    let resolver = SpinResolver::default();
    let mut rng = StdRng::seed_from_u64(8);
    let options = Catalog::builtin().options()[..4].to_vec();
    let mut wheel = WheelState::new(options).unwrap();

    wheel.request_spin(&resolver, &mut rng).unwrap();
    wheel.advance(Duration::from_millis(1500)).unwrap();
    let mid = wheel.display_rotation();

    let SpinRequest::Retargeted { target } = wheel.request_spin(&resolver, &mut rng).unwrap()
    else {
        panic!("expected a retarget");
    };
    assert!(target > mid);
    assert_eq!(wheel.segment_count(), 4);

    let mut emitted = Vec::new();
    let mut last = mid;
    for _ in 0..500 {
        if let Some(outcome) = wheel.advance(Duration::from_millis(10)).unwrap() {
            emitted.push(outcome);
        }
        assert!(wheel.display_rotation() >= last);
        last = wheel.display_rotation();
    }
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].index, resolve_segment(target, 4).unwrap());
}

#[test]
fn test_session_preselect_and_spin() {
    let mut rng = StdRng::seed_from_u64(64);
    let mut session = Session::new(Catalog::builtin(), SpinResolver::default());
    let unknown = session.select_labels(&["pizza", "sushi", "tacos"]).unwrap();
    assert!(unknown.is_empty());
    session.confirm_selection().unwrap();
    session.request_spin(&mut rng).unwrap();

    let mut outcome = None;
    while outcome.is_none() {
        outcome = session.advance(Duration::from_millis(33)).unwrap();
    }
    let outcome = outcome.unwrap();
    match session.screen() {
        Screen::Result { outcome: shown, wheel } => {
            assert_eq!(shown, &outcome);
            assert!(["Pizza", "Sushi", "Tacos"].contains(&shown.option.label.as_str()));
            assert_eq!(wheel.options()[shown.index], shown.option);
        }
        other => panic!("expected result screen, got {}", other.name()),
    }
}
