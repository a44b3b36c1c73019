// camera.rs — 相机交互控制
//
// 两种互斥的控制模型，由产品变体选择：
// - OrbitControls: 拖拽绕中心旋转 + 阻尼，滚轮改变距离
// - DragLook:      手动球坐标，滚轮改变 FOV
// 两者都在每帧 tick() 中重新计算相机，而不只是在输入事件里。

use crate::panorama::{Variant, DEFAULT_FOV, SPHERE_RADIUS};
use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_4, PI, TAU};

// 每拖动 1 像素旋转的角度
pub const DRAG_SENSITIVITY: f32 = 0.1;
pub const MIN_LATITUDE: f32 = -85.0;
pub const MAX_LATITUDE: f32 = 85.0;

pub const FOV_WHEEL_SENSITIVITY: f32 = 0.05;
pub const MIN_FOV: f32 = 10.0;
pub const MAX_FOV: f32 = 75.0;

pub const DAMPING_FACTOR: f32 = 0.05;
pub const ROTATE_SPEED: f32 = -0.5;
pub const ZOOM_SPEED: f32 = 0.8;
pub const MIN_DISTANCE: f32 = 1.0;
pub const MAX_DISTANCE: f32 = 400.0;
pub const MIN_POLAR: f32 = FRAC_PI_4;
pub const MAX_POLAR: f32 = 3.0 * FRAC_PI_4;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;
const POLAR_EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_deg: f32,
}

impl CameraPose {
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        let proj = Mat4::perspective_rh(self.fov_deg.to_radians(), aspect, Z_NEAR, Z_FAR);
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        proj * view
    }
}

// (经度, 纬度)，单位：度
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub lon: f32,
    pub lat: f32,
}

impl Orientation {
    pub fn new(lon: f32, lat: f32) -> Self {
        Self {
            lon,
            lat: lat.clamp(MIN_LATITUDE, MAX_LATITUDE),
        }
    }

    pub fn look_target(&self, radius: f32) -> Vec3 {
        let phi = (90.0 - self.lat).to_radians();
        let theta = self.lon.to_radians();
        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        )
    }
}

// 按下时记录；拖动中的朝向只取决于它和当前指针位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start: Orientation,
    pub start_x: f32,
    pub start_y: f32,
}

impl DragSession {
    pub fn orientation_at(&self, x: f32, y: f32) -> Orientation {
        Orientation::new(
            (self.start_x - x) * DRAG_SENSITIVITY + self.start.lon,
            (y - self.start_y) * DRAG_SENSITIVITY + self.start.lat,
        )
    }
}

pub fn zoom_fov(fov: f32, delta_y: f32) -> f32 {
    (fov + delta_y * FOV_WHEEL_SENSITIVITY).clamp(MIN_FOV, MAX_FOV)
}

#[derive(Debug, Clone)]
pub struct DragLook {
    pub orientation: Orientation,
    pub fov: f32,
    pub radius: f32,
    session: Option<DragSession>,
}

impl Default for DragLook {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            fov: DEFAULT_FOV,
            radius: SPHERE_RADIUS,
            session: None,
        }
    }
}

impl DragLook {
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session = Some(DragSession {
            start: self.orientation,
            start_x: x,
            start_y: y,
        });
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some(session) = &self.session {
            self.orientation = session.orientation_at(x, y);
        }
    }

    pub fn pointer_up(&mut self) {
        self.session = None;
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.fov = zoom_fov(self.fov, delta_y);
    }

    pub fn tick(&mut self) -> CameraPose {
        CameraPose {
            eye: Vec3::ZERO,
            target: self.orientation.look_target(self.radius),
            fov_deg: self.fov,
        }
    }
}

// 球坐标 (radius, phi 极角, theta 方位角)，theta=0 指向 +Z
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

// 带阻尼的环绕相机，不支持平移
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub eye: Vec3,
    pub fov: f32,
    pub viewport_height: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    last_pointer: Option<(f32, f32)>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            eye: Vec3::new(0.0, 0.0, 0.1),
            fov: DEFAULT_FOV,
            viewport_height: 720.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            last_pointer: None,
        }
    }
}

impl OrbitControls {
    pub fn is_dragging(&self) -> bool {
        self.last_pointer.is_some()
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        if height > 0.0 {
            self.viewport_height = height;
        }
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).length()
    }

    // 从 +Y 量起
    pub fn polar_angle(&self) -> f32 {
        Spherical::from_offset(self.eye - self.target).phi
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.last_pointer = Some((x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some((lx, ly)) = self.last_pointer else {
            return;
        };
        let h = self.viewport_height.max(1.0);
        self.delta_theta -= TAU * (x - lx) / h * ROTATE_SPEED;
        self.delta_phi -= TAU * (y - ly) / h * ROTATE_SPEED;
        self.last_pointer = Some((x, y));
    }

    pub fn pointer_up(&mut self) {
        self.last_pointer = None;
    }

    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let step = 0.95f32.powf(ZOOM_SPEED * (delta_y * 0.01).abs());
        if delta_y < 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    pub fn tick(&mut self) -> CameraPose {
        let mut s = Spherical::from_offset(self.eye - self.target);

        s.theta += self.delta_theta * DAMPING_FACTOR;
        s.phi += self.delta_phi * DAMPING_FACTOR;
        s.phi = s.phi.clamp(MIN_POLAR, MAX_POLAR).clamp(POLAR_EPS, PI - POLAR_EPS);
        s.radius = (s.radius * self.scale).clamp(MIN_DISTANCE, MAX_DISTANCE);

        self.eye = self.target + s.to_offset();

        self.delta_theta *= 1.0 - DAMPING_FACTOR;
        self.delta_phi *= 1.0 - DAMPING_FACTOR;
        self.scale = 1.0;

        CameraPose {
            eye: self.eye,
            target: self.target,
            fov_deg: self.fov,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CameraRig {
    Orbit(OrbitControls),
    Drag(DragLook),
}

impl CameraRig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Orbit => CameraRig::Orbit(OrbitControls::default()),
            Variant::Drag => CameraRig::Drag(DragLook::default()),
        }
    }

    pub fn set_viewport(&mut self, _width: f32, height: f32) {
        if let CameraRig::Orbit(c) = self {
            c.set_viewport_height(height);
        }
    }

    pub fn is_dragging(&self) -> bool {
        match self {
            CameraRig::Orbit(c) => c.is_dragging(),
            CameraRig::Drag(c) => c.is_dragging(),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        match self {
            CameraRig::Orbit(c) => c.pointer_down(x, y),
            CameraRig::Drag(c) => c.pointer_down(x, y),
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        match self {
            CameraRig::Orbit(c) => c.pointer_move(x, y),
            CameraRig::Drag(c) => c.pointer_move(x, y),
        }
    }

    pub fn pointer_up(&mut self) {
        match self {
            CameraRig::Orbit(c) => c.pointer_up(),
            CameraRig::Drag(c) => c.pointer_up(),
        }
    }

    /// `delta_y` follows the DOM convention: positive zooms out.
    pub fn wheel(&mut self, delta_y: f32) {
        match self {
            CameraRig::Orbit(c) => c.wheel(delta_y),
            CameraRig::Drag(c) => c.wheel(delta_y),
        }
    }

    pub fn tick(&mut self) -> CameraPose {
        match self {
            CameraRig::Orbit(c) => c.tick(),
            CameraRig::Drag(c) => c.tick(),
        }
    }
}
