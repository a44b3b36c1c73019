// panorama.rs — 产品变体与球面参数

use crate::mesh::Seam;
use crate::texture::Fidelity;

/// 全景球半径（世界单位），也是 look-at 目标点的距离
pub const SPHERE_RADIUS: f32 = 500.0;

/// 初始视角 (度)
pub const DEFAULT_FOV: f32 = 75.0;

/// Two successive revisions of the viewer. Each one fixes the controller,
/// the sphere resolution and the texture fidelity together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// Drag-to-orbit with damping, distance zoom.
    Orbit,
    /// Manual spherical look-around, field-of-view zoom.
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSpec {
    pub radius: f32,
    pub width_segments: usize,
    pub height_segments: usize,
    pub seam: Seam,
    pub fidelity: Fidelity,
}

impl Variant {
    pub fn surface(self) -> SurfaceSpec {
        match self {
            Variant::Orbit => SurfaceSpec {
                radius: SPHERE_RADIUS,
                width_segments: 60,
                height_segments: 40,
                seam: Seam::Mirror,
                fidelity: Fidelity::Standard,
            },
            Variant::Drag => SurfaceSpec {
                radius: SPHERE_RADIUS,
                width_segments: 120,
                height_segments: 60,
                seam: Seam::Mirror,
                fidelity: Fidelity::Maximum,
            },
        }
    }
}
