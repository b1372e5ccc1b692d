//! Animated scene units.
//!
//! Each effect assembles its own [`Scene`] once and then only rewrites
//! transforms and material fields as a function of the unit's time. The
//! [`Unit`] wrapper owns the camera, renderer and clock and runs frames.

use std::f64::consts::TAU;

use rand::Rng;

use crate::camera::PerspectiveCamera;
use crate::clock::{TimeAccumulator, FRAME_STEP};
use crate::frame::Renderer;
use crate::scene::Scene;
use crate::viewport::{self, Viewport};

pub mod analytics;
pub mod droid;
pub mod flagship;
pub mod hologram;
pub mod starfield;

pub use analytics::Analytics;
pub use droid::Droid;
pub use flagship::Flagship;
pub use hologram::Hologram;
pub use starfield::Starfield;

pub trait Effect {
    fn scene(&self) -> &Scene;

    /// Initial camera placement, applied once when mounted.
    fn place_camera(&self, camera: &mut PerspectiveCamera);

    /// Writes every animated property for `time`.
    ///
    /// Implementations must depend only on `time` and constants fixed at
    /// assembly, so equal times always produce equal scenes.
    fn animate(&mut self, time: f64, camera: &mut PerspectiveCamera);
}

/// One mounted effect: scene, camera, renderer and time accumulator.
pub struct Unit<E, R> {
    effect: E,
    renderer: R,
    camera: PerspectiveCamera,
    clock: TimeAccumulator,
    stopped: bool,
}

impl<E: Effect, R: Renderer> Unit<E, R> {
    /// Binds `effect` to `renderer`, sized to `viewport`.
    pub fn mount(effect: E, mut renderer: R, viewport: Viewport) -> Self {
        let mut camera = PerspectiveCamera::standard(viewport.aspect());
        effect.place_camera(&mut camera);
        renderer.set_size(viewport.width, viewport.height);
        Self {
            effect,
            renderer,
            camera,
            clock: TimeAccumulator::default(),
            stopped: false,
        }
    }

    /// Runs one tick: advance time, animate, render once.
    /// Returns whether the caller should schedule another frame.
    pub fn frame(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        let time = self.clock.tick();
        self.effect.animate(time, &mut self.camera);
        self.renderer.render(self.effect.scene(), &self.camera);
        true
    }

    pub fn resize(&mut self, viewport: Viewport) {
        viewport::adapt(&mut self.camera, &mut self.renderer, viewport);
    }

    /// Stops future frames. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn clock(&self) -> &TimeAccumulator {
        &self.clock
    }
}

/// Angle reached after `time` when turning `per_frame` radians each frame,
/// wrapped into `0..TAU` before narrowing so long uptimes keep full precision.
pub(crate) fn spin(time: f64, per_frame: f32) -> f32 {
    (per_frame as f64 * time / FRAME_STEP).rem_euclid(TAU) as f32
}

/// `count` points, each axis uniform in `-half[i]..half[i]`.
pub(crate) fn scatter<G: Rng>(rng: &mut G, count: usize, half: [f32; 3]) -> Vec<[f32; 3]> {
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-half[0]..half[0]),
                rng.gen_range(-half[1]..half[1]),
                rng.gen_range(-half[2]..half[2]),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Theme;
    use crate::frame::HeadlessRenderer;
    use rand::{rngs::SmallRng, SeedableRng};

    fn unit() -> Unit<Hologram, HeadlessRenderer> {
        let effect = Hologram::assemble(Theme::Light).unwrap();
        Unit::mount(effect, HeadlessRenderer::default(), Viewport::new(800, 600))
    }

    #[test]
    fn frame_updates_then_renders_once() {
        let mut u = unit();
        assert!(u.frame());
        assert!(u.frame());
        assert_eq!(u.renderer().frames_rendered(), 2);
        assert_eq!(u.clock().ticks(), 2);
    }

    #[test]
    fn stop_is_idempotent_and_final() {
        let mut u = unit();
        u.frame();
        u.stop();
        u.stop();
        assert!(!u.frame());
        assert!(u.is_stopped());
        assert_eq!(u.renderer().frames_rendered(), 1);
        assert_eq!(u.clock().ticks(), 1);
    }

    #[test]
    fn spin_matches_per_frame_increments() {
        let mut clock = TimeAccumulator::default();
        let mut summed = 0.0f32;
        for _ in 0..500 {
            clock.tick();
            summed += 0.005;
        }
        assert!((spin(clock.time(), 0.005) - summed).abs() < 1e-3);
    }

    #[test]
    fn spin_stays_smooth_after_long_uptime() {
        // About a day of frames.
        let t = 5_000_000.0 * FRAME_STEP;
        let a = spin(t, 0.005);
        let b = spin(t + FRAME_STEP, 0.005);
        assert!((0.0..TAU as f32).contains(&a));
        let step = (b - a).rem_euclid(TAU as f32);
        assert!((step - 0.005).abs() < 1e-5, "step {step}");
    }

    #[test]
    fn scatter_respects_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let pts = scatter(&mut rng, 300, [4.0, 3.0, 4.0]);
        assert_eq!(pts.len(), 300);
        assert!(pts.iter().all(|p| p[0].abs() <= 4.0 && p[1].abs() <= 3.0 && p[2].abs() <= 4.0));
    }
}
