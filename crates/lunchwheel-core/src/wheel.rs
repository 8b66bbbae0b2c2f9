use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::animation::Tween;
use crate::error::CoreError;
use crate::food::FoodOption;
use crate::resolver::{self, SpinResolver, FULL_TURN};
use crate::selection::MIN_OPTIONS;

/// What a spin request did to the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinRequest {
    /// Idle wheel started spinning toward `target`.
    Started { target: f64 },
    /// In-flight spin was cut short and now stops at `target`.
    Retargeted { target: f64 },
    /// The spin was already cut short once, or is too close to its stop;
    /// nothing changed.
    Ignored,
}

/// The single result emitted when a spin settles.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub index: usize,
    pub option: FoodOption,
    pub final_rotation: f64,
    pub quick_stopped: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveSpin {
    tween: Tween,
    quick_stopped: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum SpinPhase {
    Idle,
    Spinning(ActiveSpin),
}

/// A wheel of confirmed options and its rotation.
///
/// `cumulative_rotation` only grows; it is updated to the spin target when the
/// animation settles, never wrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelState {
    options: Vec<FoodOption>,
    cumulative_rotation: f64,
    phase: SpinPhase,
}

impl WheelState {
    pub fn new(options: Vec<FoodOption>) -> Result<Self, CoreError> {
        if options.len() < MIN_OPTIONS {
            return Err(CoreError::NotEnoughOptions {
                found: options.len(),
                required: MIN_OPTIONS,
            });
        }
        Ok(Self {
            options,
            cumulative_rotation: 0.0,
            phase: SpinPhase::Idle,
        })
    }

    pub fn options(&self) -> &[FoodOption] {
        &self.options
    }

    pub fn segment_count(&self) -> usize {
        self.options.len()
    }

    pub fn segment_angle(&self) -> f64 {
        FULL_TURN / self.options.len() as f64
    }

    /// Rotation at the end of the last settled spin.
    pub fn cumulative_rotation(&self) -> f64 {
        self.cumulative_rotation
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning(_))
    }

    /// The angle to draw right now: the tween value mid-spin, else the resting angle.
    pub fn display_rotation(&self) -> f64 {
        match &self.phase {
            SpinPhase::Idle => self.cumulative_rotation,
            SpinPhase::Spinning(spin) => spin.tween.value(),
        }
    }

    /// Where the current spin will stop, if one is running.
    pub fn pending_target(&self) -> Option<f64> {
        match &self.phase {
            SpinPhase::Idle => None,
            SpinPhase::Spinning(spin) => Some(spin.tween.target()),
        }
    }

    /// Option currently under the pointer.
    pub fn option_under_pointer(&self) -> Option<&FoodOption> {
        let index = resolver::resolve_segment(self.display_rotation(), self.options.len()).ok()?;
        self.options.get(index)
    }

    /// Start a spin, or quick-stop the one in flight.
    pub fn request_spin<R: Rng + ?Sized>(
        &mut self,
        resolver: &SpinResolver,
        rng: &mut R,
    ) -> Result<SpinRequest, CoreError> {
        let settings = resolver.settings();
        if let SpinPhase::Spinning(spin) = &mut self.phase {
            if !settings.quick_stop {
                return Err(CoreError::SpinInProgress);
            }
            if spin.quick_stopped {
                debug!("request_spin: quick stop already applied, ignoring");
                return Ok(SpinRequest::Ignored);
            }
            let current = spin.tween.value();
            let Some(target) = resolver.plan_quick_stop(current, spin.tween.target(), rng) else {
                debug!("request_spin: too close to the stop for a quick stop, ignoring");
                return Ok(SpinRequest::Ignored);
            };
            let duration = settings.quick_stop_duration.min(spin.tween.remaining());
            spin.tween.retarget(target, duration, settings.quick_stop_easing);
            spin.quick_stopped = true;
            info!("Quick stop: {:.1}° -> {:.1}°", current, target);
            return Ok(SpinRequest::Retargeted { target });
        }

        let target = resolver.plan_spin(self.cumulative_rotation, rng);
        info!(
            "Spin started: {} options, {:.1}° -> {:.1}°",
            self.options.len(),
            self.cumulative_rotation,
            target
        );
        self.phase = SpinPhase::Spinning(ActiveSpin {
            tween: Tween::new(
                self.cumulative_rotation,
                target,
                settings.duration,
                settings.easing,
            ),
            quick_stopped: false,
        });
        Ok(SpinRequest::Started { target })
    }

    /// Advance the animation clock. Returns the outcome exactly once, on the
    /// call where the spin settles.
    pub fn advance(&mut self, dt: Duration) -> Result<Option<SpinOutcome>, CoreError> {
        let SpinPhase::Spinning(spin) = &mut self.phase else {
            return Ok(None);
        };
        spin.tween.advance(dt);
        if !spin.tween.is_settled() {
            return Ok(None);
        }

        let final_rotation = spin.tween.target();
        let quick_stopped = spin.quick_stopped;
        self.cumulative_rotation = final_rotation;
        self.phase = SpinPhase::Idle;

        let index = resolver::resolve_segment(final_rotation, self.options.len())?;
        let option = self.options[index].clone();
        info!(
            "Spin settled at {:.1}° on segment {} ({})",
            final_rotation, index, option.label
        );
        Ok(Some(SpinOutcome {
            index,
            option,
            final_rotation,
            quick_stopped,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::resolver::SpinSettings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wheel(n: usize) -> WheelState {
        let options = Catalog::builtin().options()[..n].to_vec();
        WheelState::new(options).unwrap()
    }

    fn run_to_settle(wheel: &mut WheelState) -> Vec<SpinOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..1000 {
            if let Some(outcome) = wheel.advance(Duration::from_millis(16)).unwrap() {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    #[test]
    fn test_rejects_single_option() {
        let options = Catalog::builtin().options()[..1].to_vec();
        assert!(matches!(
            WheelState::new(options),
            Err(CoreError::NotEnoughOptions { found: 1, .. })
        ));
    }

    #[test]
    fn test_spin_settles_once_on_resolved_segment() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut w = wheel(6);

        let req = w.request_spin(&resolver, &mut rng).unwrap();
        let SpinRequest::Started { target } = req else {
            panic!("expected Started, got {req:?}");
        };
        assert!(w.is_spinning());

        let outcomes = run_to_settle(&mut w);
        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[0];
        assert_eq!(outcome.final_rotation, target);
        assert_eq!(outcome.index, resolver::resolve_segment(target, 6).unwrap());
        assert_eq!(outcome.option, w.options()[outcome.index]);
        assert!(!outcome.quick_stopped);
        assert!(!w.is_spinning());
        assert_eq!(w.cumulative_rotation(), target);
    }

    #[test]
    fn test_display_rotation_never_goes_backward() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut w = wheel(4);
        w.request_spin(&resolver, &mut rng).unwrap();
        let mut last = w.display_rotation();
        while w.is_spinning() {
            w.advance(Duration::from_millis(40)).unwrap();
            let now = w.display_rotation();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_quick_stop_retargets_without_early_result() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut w = wheel(5);
        w.request_spin(&resolver, &mut rng).unwrap();
        assert!(w.advance(Duration::from_millis(500)).unwrap().is_none());

        let before = w.display_rotation();
        let req = w.request_spin(&resolver, &mut rng).unwrap();
        let SpinRequest::Retargeted { target } = req else {
            panic!("expected Retargeted, got {req:?}");
        };
        assert!(target > before);
        assert!(w.is_spinning());
        assert_eq!(w.segment_count(), 5);

        // A third press during the same spin does nothing
        assert_eq!(
            w.request_spin(&resolver, &mut rng).unwrap(),
            SpinRequest::Ignored
        );
        assert_eq!(w.pending_target(), Some(target));

        let outcomes = run_to_settle(&mut w);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].final_rotation, target);
        assert!(outcomes[0].quick_stopped);
        assert_eq!(
            outcomes[0].index,
            resolver::resolve_segment(target, 5).unwrap()
        );
    }

    #[test]
    fn test_late_quick_stop_never_extends_the_spin() {
        let resolver = SpinResolver::default();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut w = wheel(4);
            let SpinRequest::Started { target: original } =
                w.request_spin(&resolver, &mut rng).unwrap()
            else {
                panic!("expected Started");
            };
            w.advance(Duration::from_millis(3000)).unwrap();
            let current = w.display_rotation();

            match w.request_spin(&resolver, &mut rng).unwrap() {
                SpinRequest::Retargeted { target } => {
                    assert!(target <= original, "seed {seed}: {target} > {original}");
                    assert!(target > current);
                    // Settles no later than the original 4000 ms would have
                    assert!(w.advance(Duration::from_millis(1000)).unwrap().is_some());
                }
                SpinRequest::Ignored => {
                    assert!(original - current <= resolver.settings().quick_stop_min_degrees);
                    assert_eq!(w.pending_target(), Some(original));
                }
                other => panic!("seed {seed}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_quick_stop_ignored_right_before_settling() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(17);
        let mut w = wheel(4);
        w.request_spin(&resolver, &mut rng).unwrap();
        let original = w.pending_target();
        w.advance(Duration::from_millis(3990)).unwrap();

        assert_eq!(
            w.request_spin(&resolver, &mut rng).unwrap(),
            SpinRequest::Ignored
        );
        assert_eq!(w.pending_target(), original);
        let outcomes = run_to_settle(&mut w);
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].quick_stopped);
    }

    #[test]
    fn test_spin_in_progress_without_quick_stop() {
        let resolver = SpinResolver::new(SpinSettings {
            quick_stop: false,
            ..SpinSettings::default()
        })
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut w = wheel(3);
        w.request_spin(&resolver, &mut rng).unwrap();
        let target = w.pending_target();
        assert_eq!(
            w.request_spin(&resolver, &mut rng).unwrap_err(),
            CoreError::SpinInProgress
        );
        assert_eq!(w.pending_target(), target);
    }

    #[test]
    fn test_consecutive_spins_accumulate() {
        let resolver = SpinResolver::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut w = wheel(8);
        let mut last = w.cumulative_rotation();
        for _ in 0..3 {
            w.request_spin(&resolver, &mut rng).unwrap();
            assert_eq!(run_to_settle(&mut w).len(), 1);
            assert!(w.cumulative_rotation() > last);
            last = w.cumulative_rotation();
        }
    }

    #[test]
    fn test_advance_while_idle_is_noop() {
        let mut w = wheel(2);
        assert!(w.advance(Duration::from_secs(1)).unwrap().is_none());
        assert_eq!(w.display_rotation(), 0.0);
        // Rotation 0 lands on segment 1 of a two-segment wheel
        assert_eq!(w.option_under_pointer(), Some(&w.options()[1]));
    }
}
