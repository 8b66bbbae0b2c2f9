//! Spin planning and pointer resolution.
//!
//! Angles are in degrees, counter-clockwise from 3 o'clock. Segment `i` of `n`
//! is drawn over `[i * w + rotation, (i + 1) * w + rotation)` with `w = 360 / n`,
//! and the pointer sits fixed at 12 o'clock (90°). Resolving the winner inverts
//! that drawing transform.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::animation::Easing;
use crate::error::CoreError;

pub const FULL_TURN: f64 = 360.0;

/// Angular position of the pointer relative to the drawing's zero angle.
pub const POINTER_OFFSET_DEGREES: f64 = 90.0;

/// Tunables for planning spins and animating them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSettings {
    /// Full turns every spin is guaranteed to complete.
    pub min_full_turns: u32,
    /// Width of the uniform range the extra rotation is drawn from.
    pub extra_range_degrees: f64,
    pub duration: Duration,
    pub easing: Easing,
    /// Whether a spin request while spinning retargets to a nearer stop.
    pub quick_stop: bool,
    /// Minimum forward travel after a quick stop.
    pub quick_stop_min_degrees: f64,
    pub quick_stop_duration: Duration,
    pub quick_stop_easing: Easing,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            min_full_turns: 10,
            extra_range_degrees: 3600.0,
            duration: Duration::from_millis(4000),
            easing: Easing::FastOutSlowIn,
            quick_stop: true,
            quick_stop_min_degrees: 90.0,
            quick_stop_duration: Duration::from_millis(1200),
            quick_stop_easing: Easing::LinearOutSlowIn,
        }
    }
}

impl SpinSettings {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min_full_turns == 0 {
            return Err(CoreError::InvalidSettings(
                "min_full_turns must be at least 1".to_string(),
            ));
        }
        if !self.extra_range_degrees.is_finite() || self.extra_range_degrees < FULL_TURN {
            return Err(CoreError::InvalidSettings(format!(
                "extra_range_degrees must span at least one turn, got {}",
                self.extra_range_degrees
            )));
        }
        if !self.quick_stop_min_degrees.is_finite() || self.quick_stop_min_degrees <= 0.0 {
            return Err(CoreError::InvalidSettings(format!(
                "quick_stop_min_degrees must be positive, got {}",
                self.quick_stop_min_degrees
            )));
        }
        if self.duration.is_zero() || self.quick_stop_duration.is_zero() {
            return Err(CoreError::InvalidSettings(
                "spin durations must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Plans target rotations and maps final rotations back to segments.
#[derive(Debug, Clone)]
pub struct SpinResolver {
    settings: SpinSettings,
}

impl SpinResolver {
    pub fn new(settings: SpinSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    /// Target for a fresh spin: at least `min_full_turns` turns plus a uniform
    /// extra amount. Always strictly ahead of `current_rotation`.
    pub fn plan_spin<R: Rng + ?Sized>(&self, current_rotation: f64, rng: &mut R) -> f64 {
        let base = f64::from(self.settings.min_full_turns) * FULL_TURN;
        let extra = rng.gen_range(0.0..self.settings.extra_range_degrees);
        let target = current_rotation + base + extra;
        debug!(
            "plan_spin: current={:.2} target={:.2} (extra={:.2})",
            current_rotation, target, extra
        );
        target
    }

    /// Nearer target used when a spin is cut short mid-flight. Never passes
    /// `pending_target`; `None` when the wheel is already within
    /// `quick_stop_min_degrees` of it.
    pub fn plan_quick_stop<R: Rng + ?Sized>(
        &self,
        current_rotation: f64,
        pending_target: f64,
        rng: &mut R,
    ) -> Option<f64> {
        let min_travel = self.settings.quick_stop_min_degrees;
        if pending_target - current_rotation <= min_travel {
            debug!(
                "plan_quick_stop: current={:.2} already within {:.1} of {:.2}",
                current_rotation, min_travel, pending_target
            );
            return None;
        }
        let extra = min_travel + rng.gen_range(0.0..FULL_TURN);
        let target = (current_rotation + extra).min(pending_target);
        debug!(
            "plan_quick_stop: current={:.2} target={:.2} (pending {:.2})",
            current_rotation, target, pending_target
        );
        Some(target)
    }
}

impl Default for SpinResolver {
    fn default() -> Self {
        Self {
            settings: SpinSettings::default(),
        }
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Index of the segment under the pointer after the wheel settles at
/// `final_rotation`. Exact boundary stops belong to the segment starting there.
pub fn resolve_segment(final_rotation: f64, segment_count: usize) -> Result<usize, CoreError> {
    if segment_count == 0 {
        return Err(CoreError::InvalidSegmentCount);
    }
    if !final_rotation.is_finite() {
        return Err(CoreError::NonFiniteRotation);
    }
    let normalized = normalize_degrees(final_rotation);
    let adjusted = normalize_degrees(FULL_TURN - normalized + POINTER_OFFSET_DEGREES);
    let n = segment_count as f64;
    let index = (adjusted * n / FULL_TURN).floor() as usize;
    Ok(index % segment_count)
}

/// Segment whose drawn span covers `angle` on a wheel turned by `rotation`.
/// `segment_at_angle(POINTER_OFFSET_DEGREES, n, r)` is the pointer winner.
pub fn segment_at_angle(angle: f64, segment_count: usize, rotation: f64) -> usize {
    if segment_count == 0 {
        return 0;
    }
    let offset = normalize_degrees(angle - rotation);
    let index = (offset * segment_count as f64 / FULL_TURN).floor() as usize;
    index % segment_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_four_segments_at_zero() {
        assert_eq!(resolve_segment(0.0, 4).unwrap(), 1);
    }

    #[test]
    fn test_eight_segments_past_two_turns() {
        assert_eq!(resolve_segment(730.0, 8).unwrap(), 1);
    }

    #[test]
    fn test_zero_segments_rejected() {
        assert_eq!(
            resolve_segment(12.0, 0).unwrap_err(),
            CoreError::InvalidSegmentCount
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            resolve_segment(f64::NAN, 3).unwrap_err(),
            CoreError::NonFiniteRotation
        );
        assert_eq!(
            resolve_segment(f64::INFINITY, 3).unwrap_err(),
            CoreError::NonFiniteRotation
        );
    }

    #[test]
    fn test_single_segment_always_wins() {
        for r in [0.0, 45.5, 359.999, 1e6, -720.0] {
            assert_eq!(resolve_segment(r, 1).unwrap(), 0);
        }
    }

    #[test]
    fn test_boundary_belongs_to_starting_segment() {
        // N = 10, w = 36. rotation 18 gives adjusted = 72, the start of segment 2.
        assert_eq!(resolve_segment(18.0, 10).unwrap(), 2);
        // Just before the boundary is still segment 1.
        assert_eq!(resolve_segment(18.5, 10).unwrap(), 1);
        // N = 4: rotation 90 gives adjusted = 0, the start of segment 0.
        assert_eq!(resolve_segment(90.0, 4).unwrap(), 0);
    }

    #[test]
    fn test_negative_rotation_wraps() {
        assert_eq!(
            resolve_segment(-10.0, 8).unwrap(),
            resolve_segment(350.0, 8).unwrap()
        );
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        let tiny = normalize_degrees(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_plan_spin_moves_forward_by_at_least_min_turns() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(7);
        let min = f64::from(resolver.settings().min_full_turns) * FULL_TURN;
        let max = min + resolver.settings().extra_range_degrees;
        let mut current = 123.0;
        for _ in 0..200 {
            let target = resolver.plan_spin(current, &mut rng);
            assert!(target - current >= min);
            assert!(target - current < max);
            current = target;
        }
    }

    #[test]
    fn test_plan_quick_stop_is_short_and_forward() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let target = resolver.plan_quick_stop(1000.0, 5000.0, &mut rng).unwrap();
            assert!(target >= 1090.0);
            assert!(target < 1450.0);
        }
    }

    #[test]
    fn test_plan_quick_stop_never_passes_pending_target() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            let target = resolver.plan_quick_stop(1000.0, 1200.0, &mut rng).unwrap();
            assert!(target > 1000.0);
            assert!(target <= 1200.0);
        }
        // Closer than the minimum travel: nothing nearer to offer
        assert_eq!(resolver.plan_quick_stop(1000.0, 1090.0, &mut rng), None);
        assert_eq!(resolver.plan_quick_stop(1000.0, 1000.0, &mut rng), None);
    }

    #[test]
    fn test_segment_at_angle_agrees_with_pointer() {
        for n in [2usize, 5, 9] {
            let width = FULL_TURN / n as f64;
            for k in 0..n {
                for turns in [0.0, 3.0, -2.0] {
                    let rotation =
                        POINTER_OFFSET_DEGREES - (k as f64 + 0.5) * width + turns * FULL_TURN;
                    assert_eq!(resolve_segment(rotation, n).unwrap(), k);
                    assert_eq!(segment_at_angle(POINTER_OFFSET_DEGREES, n, rotation), k);
                }
            }
        }
        assert_eq!(segment_at_angle(10.0, 0, 0.0), 0);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = SpinSettings::default();
        assert!(settings.validate().is_ok());

        settings.min_full_turns = 0;
        assert!(matches!(
            SpinResolver::new(settings.clone()),
            Err(CoreError::InvalidSettings(_))
        ));

        settings.min_full_turns = 3;
        settings.extra_range_degrees = 180.0;
        assert!(settings.validate().is_err());

        settings.extra_range_degrees = 720.0;
        settings.quick_stop_min_degrees = 0.0;
        assert!(settings.validate().is_err());

        settings.quick_stop_min_degrees = 45.0;
        settings.duration = Duration::ZERO;
        assert!(settings.validate().is_err());
    }
}
