use glam::{Mat4, Vec2, Vec3};

/// Vertical field of view used by every rig, in radians.
pub const DEFAULT_FOV: f32 = 0.8;

/// The camera a scene is dressed with.
///
/// Menus use a fixed [`CameraRig::Free`] camera; gameplay orbits its target
/// with [`CameraRig::ArcRotate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraRig {
    /// Camera at a fixed position looking at a target.
    Free { position: Vec3, target: Vec3 },
    /// Camera on a sphere around `target`.
    ///
    /// `alpha` is the longitudinal angle, `beta` the latitudinal one, both
    /// in radians.
    ArcRotate {
        alpha: f32,
        beta: f32,
        radius: f32,
        target: Vec3,
    },
}

impl Default for CameraRig {
    fn default() -> Self {
        CameraRig::Free {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
        }
    }
}

impl CameraRig {
    /// Free camera at the origin; the neutral camera of menu scenes.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Orbit camera looking at the origin from straight ahead.
    pub fn orbit(radius: f32) -> Self {
        CameraRig::ArcRotate {
            alpha: std::f32::consts::FRAC_PI_2,
            beta: std::f32::consts::FRAC_PI_2,
            radius,
            target: Vec3::ZERO,
        }
    }

    /// World-space position of the eye.
    pub fn eye(&self) -> Vec3 {
        match *self {
            CameraRig::Free { position, .. } => position,
            CameraRig::ArcRotate {
                alpha,
                beta,
                radius,
                target,
            } => {
                target
                    + Vec3::new(
                        radius * alpha.cos() * beta.sin(),
                        radius * beta.cos(),
                        radius * alpha.sin() * beta.sin(),
                    )
            }
        }
    }

    pub fn target(&self) -> Vec3 {
        match *self {
            CameraRig::Free { target, .. } | CameraRig::ArcRotate { target, .. } => target,
        }
    }

    /// Unit view direction. Falls back to -Z when eye and target coincide.
    pub fn forward(&self) -> Vec3 {
        (self.target() - self.eye())
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let eye = self.eye();
        let view = Mat4::look_to_rh(eye, self.forward(), Vec3::Y);
        let projection = Mat4::perspective_rh(DEFAULT_FOV, aspect.max(1e-3), 0.1, 1000.0);
        projection * view
    }

    /// Project a world-space point into pixel coordinates (origin top-left).
    ///
    /// Returns `None` for points behind the camera.
    pub fn project(&self, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        if (point - self.eye()).dot(self.forward()) <= 0.0 {
            return None;
        }
        let ndc = self
            .view_projection(viewport.x / viewport.y)
            .project_point3(point);
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * viewport.x,
            (0.5 - ndc.y * 0.5) * viewport.y,
        ))
    }

    /// On-screen radius in pixels of a sphere at `center`.
    pub fn apparent_radius(&self, center: Vec3, radius: f32, viewport: Vec2) -> Option<f32> {
        let distance = (center - self.eye()).dot(self.forward());
        if distance <= radius {
            return None;
        }
        let half_fov = (DEFAULT_FOV * 0.5).tan();
        Some(radius / distance / half_fov * viewport.y * 0.5)
    }
}
