//! Auto-hiding navigation bar.
//!
//! The bar slides in when the pointer enters a strip at the top of the
//! canvas and slides out a fixed delay after the pointer leaves it. Timers
//! belong to the host: the machine asks for one with `ArmTimer`, and the
//! host reports expiry with `HideTimerFired(token)`. A token that was
//! cancelled or superseded is ignored when it fires.
//!
//! | State  | Event                    | Next   | Effects              |
//! |--------|--------------------------|--------|----------------------|
//! | Hidden | pointer in hot zone      | Shown  | Animate(show)        |
//! | Shown  | pointer out, no timer    | Shown  | ArmTimer             |
//! | Shown  | pointer in, timer armed  | Shown  | CancelTimer          |
//! | Shown  | HideTimerFired(current)  | Hidden | Animate(hide)        |

use nn_core::NavbarConfig;
use smallvec::{SmallVec, smallvec};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarState {
    Hidden,
    Shown,
}

/// Identifies one armed hide timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavbarEvent {
    /// Pointer moved; `y` in screen pixels from the canvas top.
    PointerMoved { y: f64 },
    PointerLeft,
    HideTimerFired(TimerToken),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavbarEffect {
    Animate(NavbarAnimation),
    ArmTimer { token: TimerToken, delay: Duration },
    CancelTimer(TimerToken),
}

pub type NavbarEffects = SmallVec<[NavbarEffect; 2]>;

// ─── Animation ───────────────────────────────────────────────────────────

/// A vertical slide of the bar. Offsets are the bar's top edge in pixels:
/// `0` fully shown, `-bar_height` fully hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavbarAnimation {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl NavbarAnimation {
    /// Offset after `elapsed`, eased in-out quadratically.
    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        self.from + (self.to - self.from) * ease_in_out_quad(t)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ─── State machine ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Navbar {
    config: NavbarConfig,
    state: NavbarState,
    armed: Option<TimerToken>,
    next_token: u64,
}

impl Navbar {
    pub fn new(config: NavbarConfig) -> Self {
        Self {
            config,
            state: NavbarState::Hidden,
            armed: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> NavbarState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        self.state == NavbarState::Shown
    }

    /// The currently armed hide timer, if any.
    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.armed
    }

    /// Resting offset for the current state.
    pub fn offset(&self) -> f64 {
        match self.state {
            NavbarState::Shown => 0.0,
            NavbarState::Hidden => self.hidden_offset(),
        }
    }

    pub fn handle(&mut self, event: NavbarEvent) -> NavbarEffects {
        match event {
            NavbarEvent::PointerMoved { y } if self.is_hot(y) => self.pointer_in(),
            NavbarEvent::PointerMoved { .. } | NavbarEvent::PointerLeft => self.pointer_out(),
            NavbarEvent::HideTimerFired(token) => self.timer_fired(token),
        }
    }

    fn is_hot(&self, y: f64) -> bool {
        let zone = match self.state {
            NavbarState::Hidden => self.config.hot_zone,
            NavbarState::Shown => self.config.hot_zone.max(self.config.bar_height),
        };
        y < f64::from(zone)
    }

    fn pointer_in(&mut self) -> NavbarEffects {
        match self.state {
            NavbarState::Hidden => {
                log::debug!("navbar: Hidden -> Shown");
                self.state = NavbarState::Shown;
                smallvec![NavbarEffect::Animate(self.slide(self.hidden_offset(), 0.0))]
            }
            NavbarState::Shown => match self.armed.take() {
                Some(token) => {
                    log::debug!("navbar: hide timer {token:?} cancelled");
                    smallvec![NavbarEffect::CancelTimer(token)]
                }
                None => NavbarEffects::new(),
            },
        }
    }

    fn pointer_out(&mut self) -> NavbarEffects {
        if self.state == NavbarState::Hidden || self.armed.is_some() {
            return NavbarEffects::new();
        }
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.armed = Some(token);
        log::debug!("navbar: hide timer {token:?} armed");
        smallvec![NavbarEffect::ArmTimer {
            token,
            delay: Duration::from_millis(self.config.hide_delay_ms),
        }]
    }

    fn timer_fired(&mut self, token: TimerToken) -> NavbarEffects {
        if self.armed != Some(token) {
            log::trace!("navbar: ignoring stale timer {token:?}");
            return NavbarEffects::new();
        }
        self.armed = None;
        self.state = NavbarState::Hidden;
        log::debug!("navbar: Shown -> Hidden");
        smallvec![NavbarEffect::Animate(self.slide(0.0, self.hidden_offset()))]
    }

    fn hidden_offset(&self) -> f64 {
        -f64::from(self.config.bar_height)
    }

    fn slide(&self, from: f64, to: f64) -> NavbarAnimation {
        NavbarAnimation {
            from,
            to,
            duration: Duration::from_millis(self.config.animation_ms),
        }
    }
}
