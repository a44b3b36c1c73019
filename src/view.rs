// view.rs — 视图状态（欢迎页 / 全景）的唯一持有者

use crate::landing::{LandingEvent, LandingScreen};
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum ViewState {
    Landing(LandingScreen),
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EnteredViewer,
}

#[derive(Debug, Clone)]
pub struct ViewFlow {
    state: ViewState,
}

impl ViewFlow {
    pub fn new(now: Instant, show_landing: bool) -> Self {
        let state = if show_landing {
            ViewState::Landing(LandingScreen::new(now))
        } else {
            ViewState::Viewer
        };
        Self { state }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn landing(&self) -> Option<&LandingScreen> {
        match &self.state {
            ViewState::Landing(l) => Some(l),
            ViewState::Viewer => None,
        }
    }

    pub fn landing_mut(&mut self) -> Option<&mut LandingScreen> {
        match &mut self.state {
            ViewState::Landing(l) => Some(l),
            ViewState::Viewer => None,
        }
    }

    pub fn is_viewer(&self) -> bool {
        matches!(self.state, ViewState::Viewer)
    }

    // 查看器中无效
    pub fn enter(&mut self, now: Instant) {
        if let Some(landing) = self.landing_mut() {
            landing.enter(now);
        }
    }

    pub fn tick(&mut self, now: Instant) -> Option<Transition> {
        let event = match &mut self.state {
            ViewState::Landing(landing) => landing.tick(now),
            ViewState::Viewer => None,
        };
        if let Some(LandingEvent::Finished) = event {
            log::info!("entering panorama viewer");
            self.state = ViewState::Viewer;
            return Some(Transition::EnteredViewer);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn skipping_landing_starts_in_viewer() {
        let mut flow = ViewFlow::new(Instant::now(), false);
        assert!(flow.is_viewer());
        assert_eq!(flow.tick(Instant::now()), None);
    }

    #[test]
    fn enter_is_ignored_in_viewer() {
        let t0 = Instant::now();
        let mut flow = ViewFlow::new(t0, false);
        flow.enter(t0);
        assert_eq!(flow.tick(t0 + Duration::from_secs(5)), None);
    }
}
