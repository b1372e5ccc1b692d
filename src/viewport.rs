use crate::camera::PerspectiveCamera;
use crate::frame::Renderer;

/// Pixel size of a drawing surface, always measured fresh from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width / height`; zero height yields a non finite ratio, which is passed through.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Re-fits camera projection and renderer output to `viewport`.
///
/// Only the camera's aspect/projection and the renderer size are touched, so
/// repeated calls with the same viewport leave everything unchanged.
pub fn adapt<R: Renderer + ?Sized>(camera: &mut PerspectiveCamera, renderer: &mut R, viewport: Viewport) {
    camera.aspect = viewport.aspect();
    camera.update_projection();
    renderer.set_size(viewport.width, viewport.height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::HeadlessRenderer;

    #[test]
    fn adapt_is_idempotent() {
        let mut cam = PerspectiveCamera::standard(1.0);
        let mut r = HeadlessRenderer::new(1, 1);
        let vp = Viewport::new(400, 300);
        adapt(&mut cam, &mut r, vp);
        let (aspect, proj, size) = (cam.aspect, cam.projection(), r.size());
        for _ in 0..5 {
            adapt(&mut cam, &mut r, vp);
        }
        assert_eq!(cam.aspect, aspect);
        assert_eq!(cam.projection(), proj);
        assert_eq!(r.size(), size);
        assert_eq!(size, (400, 300));
    }
}
