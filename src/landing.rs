// landing.rs — 欢迎页状态机
//
// NotVisible → Visible (挂载 100ms 后) → Exiting (点击) → Done (1500ms 后)
// 单向、一次性；重复点击不会重置退出计时。

use crate::camera::{CameraPose, Orientation};
use crate::panorama::{DEFAULT_FOV, SPHERE_RADIUS};
use glam::Vec3;
use std::time::{Duration, Instant};

pub const MOUNT_DELAY: Duration = Duration::from_millis(100);
pub const EXIT_DURATION: Duration = Duration::from_millis(1500);
pub const FADE_DURATION: Duration = Duration::from_millis(1000);
pub const HINT_DELAY: Duration = Duration::from_millis(1000);
pub const NOTE_DELAY: Duration = Duration::from_millis(1500);

pub const CONTENT_TRAVEL: f32 = 32.0;

// 背景全景缓慢漂移速度（度/秒）
pub const BACKDROP_DRIFT_DEG_PER_SEC: f32 = 1.5;
pub const PARALLAX_DEGREES: f32 = 2.0;
pub const BACKDROP_ZOOM: f32 = 1.1;

// 视差缓动时间常数，约 300ms 收敛
const PARALLAX_TAU: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingPhase {
    NotVisible,
    Visible,
    Exiting,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingEvent {
    Finished,
}

#[derive(Debug, Clone)]
pub struct LandingScreen {
    mounted_at: Instant,
    visible_at: Option<Instant>,
    exit_at: Option<Instant>,
    done: bool,
    pointer: (f32, f32),
    parallax: (f32, f32),
    last_tick: Instant,
}

fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

fn progress(now: Instant, start: Instant, duration: Duration) -> f32 {
    let elapsed = now.saturating_duration_since(start).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

impl LandingScreen {
    pub fn new(now: Instant) -> Self {
        Self {
            mounted_at: now,
            visible_at: None,
            exit_at: None,
            done: false,
            pointer: (0.0, 0.0),
            parallax: (0.0, 0.0),
            last_tick: now,
        }
    }

    pub fn phase(&self) -> LandingPhase {
        if self.done {
            LandingPhase::Done
        } else if self.exit_at.is_some() {
            LandingPhase::Exiting
        } else if self.visible_at.is_some() {
            LandingPhase::Visible
        } else {
            LandingPhase::NotVisible
        }
    }

    // 只有第一次点击生效，退出截止时间不会被推迟
    pub fn enter(&mut self, now: Instant) {
        if self.exit_at.is_none() && !self.done {
            log::debug!("landing exit started");
            self.exit_at = Some(now);
        }
    }

    pub fn exit_deadline(&self) -> Option<Instant> {
        self.exit_at.map(|t| t + EXIT_DURATION)
    }

    // Finished 只发出一次：截止时间之后的第一次 tick
    pub fn tick(&mut self, now: Instant) -> Option<LandingEvent> {
        let dt = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        let alpha = 1.0 - (-dt / PARALLAX_TAU).exp();
        self.parallax.0 += (self.pointer.0 - self.parallax.0) * alpha;
        self.parallax.1 += (self.pointer.1 - self.parallax.1) * alpha;

        if self.visible_at.is_none() && now >= self.mounted_at + MOUNT_DELAY {
            self.visible_at = Some(self.mounted_at + MOUNT_DELAY);
        }

        match self.exit_deadline() {
            Some(deadline) if !self.done && now >= deadline => {
                self.done = true;
                Some(LandingEvent::Finished)
            }
            _ => None,
        }
    }

    pub fn set_pointer(&mut self, nx: f32, ny: f32) {
        self.pointer = (nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0));
    }

    pub fn parallax(&self) -> (f32, f32) {
        self.parallax
    }

    fn fade_in(&self, now: Instant, delay: Duration) -> f32 {
        match self.visible_at {
            Some(v) => ease_out(progress(now, v + delay, FADE_DURATION)),
            None => 0.0,
        }
    }

    // 欢迎页背景：缓慢漂移 + 视差 + 轻微放大
    pub fn backdrop_pose(&self, now: Instant) -> CameraPose {
        let elapsed = now.saturating_duration_since(self.mounted_at).as_secs_f32();
        let (px, py) = self.parallax;
        let orientation = Orientation::new(
            elapsed * BACKDROP_DRIFT_DEG_PER_SEC - px * PARALLAX_DEGREES,
            py * PARALLAX_DEGREES,
        );
        CameraPose {
            eye: Vec3::ZERO,
            target: orientation.look_target(SPHERE_RADIUS),
            fov_deg: DEFAULT_FOV / BACKDROP_ZOOM,
        }
    }

    /// Opacity of a delayed element (hint, note). The delay applies to both
    /// the fade in and the fade out.
    pub fn element_opacity(&self, now: Instant, delay: Duration) -> f32 {
        match self.exit_at {
            Some(exit) => {
                let from = self.fade_in(exit + delay, delay);
                from * (1.0 - ease_out(progress(now, exit + delay, FADE_DURATION)))
            }
            None => self.fade_in(now, delay),
        }
    }

    pub fn content_opacity(&self, now: Instant) -> f32 {
        self.element_opacity(now, Duration::ZERO)
    }

    pub fn content_offset(&self, now: Instant) -> f32 {
        let entry = CONTENT_TRAVEL * (1.0 - self.fade_in(now, Duration::ZERO));
        match self.exit_at {
            Some(exit) => {
                let from = CONTENT_TRAVEL * (1.0 - self.fade_in(exit, Duration::ZERO));
                let t = ease_out(progress(now, exit, FADE_DURATION));
                from + (-CONTENT_TRAVEL - from) * t
            }
            None => entry,
        }
    }
}
