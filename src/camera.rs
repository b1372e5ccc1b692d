use glam::{Mat4, Vec3};

pub const DEFAULT_FOV_DEG: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Perspective camera looking at `target`.
///
/// The projection is cached; call [`update_projection`](Self::update_projection)
/// after changing `fov`, `aspect`, `near` or `far`.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov_deg,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        cam.update_projection();
        cam
    }

    /// 75° camera with the site's near/far planes.
    pub fn standard(aspect: f32) -> Self {
        Self::new(DEFAULT_FOV_DEG, aspect, DEFAULT_NEAR, DEFAULT_FAR)
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn look_at(&mut self, x: f32, y: f32, z: f32) {
        self.target = Vec3::new(x, y, z);
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}
