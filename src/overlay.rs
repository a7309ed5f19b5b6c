//! Hover-info overlays and their fade lifecycle.
//!
//! Per key the lifecycle is `Absent -> FadingIn -> Visible -> FadingOut ->
//! Absent`. The controller only tracks *existence*: [`HoverOverlayController::hide`]
//! drops the key from the live map immediately, while the overlay itself keeps
//! animating in a retiring pool until its fade-out completes and it announces
//! completion through its `finished` signal.
//!
//! Invariants:
//! - at most one live overlay per key;
//! - `hide` on an absent key changes nothing;
//! - a second `show` for a live key keeps the first overlay and its anchor.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::rc::Rc;
use std::time::Duration;

use crate::geometry::Point;
use crate::signal::Signal;

pub const DEFAULT_FADE_IN: Duration = Duration::from_millis(200);
pub const DEFAULT_FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    FadingIn,
    Visible,
    FadingOut,
    /// Fade-out completed; the overlay is ready to be dropped.
    Finished,
}

/// Opacity ramp for one overlay.
#[derive(Debug, Clone, Copy)]
pub struct FadeAnimation {
    phase: FadePhase,
    opacity: f64,
    fade_in: Duration,
    fade_out: Duration,
}

impl FadeAnimation {
    pub fn new(fade_in: Duration, fade_out: Duration) -> Self {
        Self {
            phase: FadePhase::FadingIn,
            opacity: 0.0,
            fade_in,
            fade_out,
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    /// Current opacity in `[0.0, 1.0]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn start_fade_in(&mut self) {
        self.phase = FadePhase::FadingIn;
        self.opacity = 0.0;
    }

    /// Begin fading out from whatever opacity was reached.
    pub fn start_fade_out(&mut self) {
        if matches!(self.phase, FadePhase::FadingOut | FadePhase::Finished) {
            return;
        }
        self.phase = FadePhase::FadingOut;
    }

    /// Advance by `elapsed`. Returns `true` when the fade-out just completed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        match self.phase {
            FadePhase::FadingIn => {
                self.opacity = (self.opacity + step(elapsed, self.fade_in)).min(1.0);
                if self.opacity >= 1.0 {
                    self.phase = FadePhase::Visible;
                }
                false
            }
            FadePhase::FadingOut => {
                self.opacity = (self.opacity - step(elapsed, self.fade_out)).max(0.0);
                if self.opacity <= 0.0 {
                    self.phase = FadePhase::Finished;
                    return true;
                }
                false
            }
            FadePhase::Visible | FadePhase::Finished => false,
        }
    }
}

impl Default for FadeAnimation {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_IN, DEFAULT_FADE_OUT)
    }
}

fn step(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 1.0;
    }
    elapsed.as_secs_f64() / total.as_secs_f64()
}

/// Text shown by a hover overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayContent {
    pub title: String,
    pub lines: Vec<String>,
}

impl OverlayContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

/// A transient informational popup anchored to a screen position.
#[derive(Debug)]
pub struct HoverOverlay {
    anchor: Point,
    content: OverlayContent,
    animation: FadeAnimation,
    finished: Signal<()>,
}

impl HoverOverlay {
    pub fn new(content: OverlayContent, animation: FadeAnimation) -> Self {
        Self {
            anchor: Point::default(),
            content,
            animation,
            finished: Signal::new(),
        }
    }

    pub fn fade_in(&mut self, anchor: Point) {
        self.anchor = anchor;
        self.animation.start_fade_in();
    }

    pub fn fade_out(&mut self) {
        self.animation.start_fade_out();
    }

    pub fn tick(&mut self, elapsed: Duration) {
        if self.animation.tick(elapsed) {
            self.finished.emit(&());
        }
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn content(&self) -> &OverlayContent {
        &self.content
    }

    pub fn phase(&self) -> FadePhase {
        self.animation.phase()
    }

    pub fn opacity(&self) -> f64 {
        self.animation.opacity()
    }

    /// Emitted once the fade-out animation has fully completed.
    pub fn finished(&mut self) -> &mut Signal<()> {
        &mut self.finished
    }
}

/// An overlay fading out after its key was hidden. `done` is set by the
/// overlay's `finished` subscription.
#[derive(Debug)]
struct Retiring<K> {
    key: K,
    overlay: HoverOverlay,
    done: Rc<Cell<bool>>,
}

/// Owns the hover overlays of a panel, keyed by UI item.
#[derive(Debug)]
pub struct HoverOverlayController<K: Ord> {
    live: BTreeMap<K, HoverOverlay>,
    retiring: Vec<Retiring<K>>,
    fade_in: Duration,
    fade_out: Duration,
}

impl<K: Ord + Copy + Debug + 'static> HoverOverlayController<K> {
    pub fn new() -> Self {
        Self::with_durations(DEFAULT_FADE_IN, DEFAULT_FADE_OUT)
    }

    pub fn with_durations(fade_in: Duration, fade_out: Duration) -> Self {
        Self {
            live: BTreeMap::new(),
            retiring: Vec::new(),
            fade_in,
            fade_out,
        }
    }

    /// Start an overlay for `key` at `anchor`.
    ///
    /// Returns `false` and leaves the existing overlay (and its anchor) alone
    /// when `key` is already live.
    pub fn show(&mut self, key: K, anchor: Point, content: OverlayContent) -> bool {
        if self.live.contains_key(&key) {
            tracing::debug!(?key, "hover overlay already live");
            return false;
        }
        let animation = FadeAnimation::new(self.fade_in, self.fade_out);
        let mut overlay = HoverOverlay::new(content, animation);
        overlay.fade_in(anchor);
        tracing::debug!(?key, x = anchor.x, y = anchor.y, "hover overlay fading in");
        self.live.insert(key, overlay);
        true
    }

    /// Stop tracking `key` and let its overlay fade out on its own.
    ///
    /// Returns `false` when `key` has no live overlay.
    pub fn hide(&mut self, key: K) -> bool {
        let Some(mut overlay) = self.live.remove(&key) else {
            return false;
        };
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        overlay.finished().connect_once(move |_| {
            tracing::debug!(?key, "hover overlay faded out");
            flag.set(true);
        });
        overlay.fade_out();
        self.retiring.push(Retiring { key, overlay, done });
        true
    }

    /// Advance every animation and drop overlays that announced the end of
    /// their fade-out.
    pub fn tick(&mut self, elapsed: Duration) {
        for overlay in self.live.values_mut() {
            overlay.tick(elapsed);
        }
        for entry in &mut self.retiring {
            entry.overlay.tick(elapsed);
        }
        self.retiring.retain(|entry| !entry.done.get());
    }

    pub fn is_live(&self, key: &K) -> bool {
        self.live.contains_key(key)
    }

    pub fn live(&self, key: &K) -> Option<&HoverOverlay> {
        self.live.get(key)
    }

    /// Phase of the live overlay for `key`; `None` means absent.
    pub fn phase(&self, key: &K) -> Option<FadePhase> {
        self.live.get(key).map(HoverOverlay::phase)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn fading_out_count(&self) -> usize {
        self.retiring.len()
    }

    pub fn is_animating(&self) -> bool {
        !self.retiring.is_empty()
            || self
                .live
                .values()
                .any(|o| o.phase() == FadePhase::FadingIn)
    }

    /// Every overlay that still has something on screen, live first.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &HoverOverlay)> {
        self.live
            .iter()
            .chain(self.retiring.iter().map(|entry| (&entry.key, &entry.overlay)))
    }

    /// Drop everything immediately, skipping fade-out.
    pub fn clear(&mut self) {
        self.live.clear();
        self.retiring.clear();
    }
}

impl<K: Ord + Copy + Debug + 'static> Default for HoverOverlayController<K> {
    fn default() -> Self {
        Self::new()
    }
}
