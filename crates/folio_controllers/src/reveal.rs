//! Scroll-triggered section reveals
//!
//! A [`RevealController`] watches section containers through a
//! [`ViewportObserver`]. When a container crosses its visibility threshold
//! the controller plays the section's entrance timeline, or, in scrub mode,
//! ties the timeline's progress to how far the container has scrolled in.
//!
//! ```rust
//! use folio_animation::AnimationScheduler;
//! use folio_controllers::{RevealController, RevealOptions, RevealSequence, ScrollViewport};
//! use folio_core::{Rect, Stage};
//!
//! let stage = Stage::new();
//! let section = stage.insert("about", Rect::new(0.0, 1000.0, 1280.0, 600.0));
//! let title = stage.insert_child(section, "title", Rect::new(0.0, 1000.0, 1280.0, 60.0)).unwrap();
//! let scheduler = AnimationScheduler::new(stage.clone());
//!
//! let mut reveals = RevealController::new(scheduler.handle(), stage.clone());
//! reveals.observe(section, RevealOptions::default(), RevealSequence::title(title, None));
//! assert_eq!(stage.props(title).unwrap().opacity, 0.0);
//!
//! let mut viewport = ScrollViewport::new(1280.0, 800.0);
//! viewport.scroll_to(600.0);
//! assert_eq!(reveals.update(&viewport, 0.0), 1);
//! scheduler.advance(2000.0);
//! assert_eq!(stage.props(title).unwrap().opacity, 1.0);
//! ```

use std::rc::Rc;

use folio_animation::{
    AnimatedTimeline, Easing, Position, PropPatch, SchedulerHandle, Stagger, Timeline, Tween,
};
use folio_core::{NodeId, Stage};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use crate::viewport::ViewportObserver;

new_key_type! {
    /// Handle to one observed container
    pub struct RevealSubscription;
}

/// How a triggered reveal drives its timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealMode {
    /// Play the timeline once per trigger
    OneShot,
    /// Follow scroll position between two trigger lines
    ///
    /// `start`/`end` are fractions of the viewport height the container top
    /// must reach for progress 0 and 1. Progress chases the scroll position
    /// with an exponential lag of `smoothing_ms`.
    Scrub {
        start: f32,
        end: f32,
        smoothing_ms: f32,
    },
}

impl RevealMode {
    /// Scrub from "top at viewport bottom" to "top at 60% of the viewport"
    pub fn scrub() -> Self {
        RevealMode::Scrub {
            start: 1.0,
            end: 0.6,
            smoothing_ms: 500.0,
        }
    }
}

/// Trigger configuration for one container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealOptions {
    /// Visible fraction at which the reveal fires
    pub threshold: f32,
    /// Vertical growth of the viewport used for intersection
    pub root_margin: f32,
    /// Fire only on the first crossing
    pub trigger_once: bool,
    pub mode: RevealMode,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: 0.0,
            trigger_once: true,
            mode: RevealMode::OneShot,
        }
    }
}

/// The entrance animation played for a container
#[derive(Clone)]
pub enum RevealSequence {
    /// Title rises into place, subtitle follows overlapping its tail
    TitleSubtitle {
        title: NodeId,
        subtitle: Option<NodeId>,
    },
    /// Children fade up one after another
    Staggered { children: Vec<NodeId>, each_ms: f32 },
    /// Any other timeline
    Custom(Rc<dyn Fn() -> Timeline>),
}

impl RevealSequence {
    pub fn title(title: NodeId, subtitle: Option<NodeId>) -> Self {
        RevealSequence::TitleSubtitle { title, subtitle }
    }

    pub fn staggered(children: Vec<NodeId>, each_ms: f32) -> Self {
        RevealSequence::Staggered { children, each_ms }
    }

    pub fn custom<F>(build: F) -> Self
    where
        F: Fn() -> Timeline + 'static,
    {
        RevealSequence::Custom(Rc::new(build))
    }

    /// Build a fresh timeline for this sequence
    pub fn build(&self) -> Timeline {
        let mut timeline = Timeline::new();
        match self {
            RevealSequence::TitleSubtitle { title, subtitle } => {
                timeline.add(
                    Tween::from_to(
                        *title,
                        PropPatch::new().opacity(0.0).y(40.0).scale(0.95),
                        PropPatch::new().opacity(1.0).y(0.0).scale(1.0),
                        800.0,
                    )
                    .easing(Easing::EaseOutQuart),
                    Position::Sequential,
                );
                if let Some(subtitle) = subtitle {
                    timeline.add(
                        Tween::from_to(
                            *subtitle,
                            PropPatch::new().opacity(0.0).y(30.0),
                            PropPatch::new().opacity(1.0).y(0.0),
                            600.0,
                        )
                        .easing(Easing::EaseOutCubic),
                        Position::Offset(-400.0),
                    );
                }
            }
            RevealSequence::Staggered { children, each_ms } => {
                timeline.stagger(
                    children,
                    Stagger::each(*each_ms),
                    Position::Sequential,
                    |child| {
                        Tween::from_to(
                            child,
                            PropPatch::new().opacity(0.0).y(30.0),
                            PropPatch::new().opacity(1.0).y(0.0),
                            600.0,
                        )
                        .easing(Easing::EaseOutCubic)
                    },
                );
            }
            RevealSequence::Custom(build) => timeline = build(),
        }
        timeline
    }
}

/// Public view of one observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObservationState {
    pub container: NodeId,
    pub has_triggered_once: bool,
    /// Whether the container was visible at or above the threshold on the
    /// last update. A sliver below the threshold reads `false`.
    pub is_intersecting: bool,
}

struct Observation {
    container: NodeId,
    options: RevealOptions,
    sequence: RevealSequence,
    has_triggered_once: bool,
    /// Visible at or above the threshold on the last update
    is_intersecting: bool,
    /// Armed timeline, rendered at its starting state until triggered
    timeline: Option<AnimatedTimeline>,
    /// Smoothed scrub progress
    scrub_progress: f32,
}

/// Plays section entrance animations as containers scroll into view
pub struct RevealController {
    handle: SchedulerHandle,
    stage: Stage,
    observations: SlotMap<RevealSubscription, Observation>,
}

impl RevealController {
    pub fn new(handle: SchedulerHandle, stage: Stage) -> Self {
        Self {
            handle,
            stage,
            observations: SlotMap::with_key(),
        }
    }

    fn arm(&self, sequence: &RevealSequence) -> AnimatedTimeline {
        let timeline = AnimatedTimeline::new(self.handle.clone(), sequence.build());
        timeline.set_progress(0.0);
        timeline
    }

    /// Start watching `container`
    ///
    /// The sequence's starting state is rendered immediately so content stays
    /// hidden until revealed.
    pub fn observe(
        &mut self,
        container: NodeId,
        options: RevealOptions,
        sequence: RevealSequence,
    ) -> RevealSubscription {
        let timeline = self.arm(&sequence);
        self.observations.insert(Observation {
            container,
            options,
            sequence,
            has_triggered_once: false,
            is_intersecting: false,
            timeline: Some(timeline),
            scrub_progress: 0.0,
        })
    }

    /// Stop watching; the armed timeline is unregistered
    pub fn unobserve(&mut self, id: RevealSubscription) -> bool {
        self.observations.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observation(&self, id: RevealSubscription) -> Option<ObservationState> {
        self.observations.get(id).map(|o| ObservationState {
            container: o.container,
            has_triggered_once: o.has_triggered_once,
            is_intersecting: o.is_intersecting,
        })
    }

    /// Smoothed progress of a scrubbed reveal
    pub fn scrub_progress(&self, id: RevealSubscription) -> Option<f32> {
        self.observations.get(id).map(|o| o.scrub_progress)
    }

    /// Check every container against the viewport; `dt_ms` drives scrub
    /// smoothing. Returns how many reveals were triggered.
    pub fn update(&mut self, viewport: &dyn ViewportObserver, dt_ms: f32) -> usize {
        let mut triggered = 0;
        let ids: Vec<RevealSubscription> = self.observations.keys().collect();
        for id in ids {
            let (container, options) = {
                let obs = &self.observations[id];
                (obs.container, obs.options)
            };
            let Some(bounds) = self.stage.bounds(container) else {
                trace!("reveal container {:?} missing, skipped", container);
                continue;
            };
            let hit = viewport.intersection(bounds, options.root_margin);
            let visible = hit.is_intersecting && hit.ratio >= options.threshold;

            match options.mode {
                RevealMode::OneShot => {
                    if self.update_one_shot(id, visible) {
                        triggered += 1;
                    }
                }
                RevealMode::Scrub {
                    start,
                    end,
                    smoothing_ms,
                } => {
                    let h = viewport.height();
                    let span = (start - end) * h;
                    let target = if span.abs() <= f32::EPSILON {
                        if hit.top <= end * h { 1.0 } else { 0.0 }
                    } else {
                        ((start * h - hit.top) / span).clamp(0.0, 1.0)
                    };
                    let obs = &mut self.observations[id];
                    obs.scrub_progress = smooth(obs.scrub_progress, target, dt_ms, smoothing_ms);
                    if obs.scrub_progress > 0.0 && !obs.has_triggered_once {
                        obs.has_triggered_once = true;
                        triggered += 1;
                        debug!(?container, "scrub reveal entered");
                    }
                    obs.is_intersecting = visible;
                    if let Some(timeline) = &obs.timeline {
                        timeline.set_progress(obs.scrub_progress);
                    }
                }
            }
        }
        triggered
    }

    fn update_one_shot(&mut self, id: RevealSubscription, visible: bool) -> bool {
        let (entering, replay) = {
            let obs = &self.observations[id];
            let entering = visible && !obs.is_intersecting;
            let may_fire = !obs.has_triggered_once || !obs.options.trigger_once;
            (entering && may_fire, obs.has_triggered_once)
        };
        self.observations[id].is_intersecting = visible;
        if !entering {
            return false;
        }

        if replay {
            // Dispose the previous run before building a fresh one
            let fresh = {
                let obs = &mut self.observations[id];
                obs.timeline = None;
                obs.sequence.clone()
            };
            let timeline = self.arm(&fresh);
            self.observations[id].timeline = Some(timeline);
        }

        let obs = &mut self.observations[id];
        obs.has_triggered_once = true;
        if let Some(timeline) = &obs.timeline {
            timeline.start();
        }
        debug!(container = ?obs.container, replay, "reveal triggered");
        true
    }
}

/// Exponential approach of `current` toward `target`
fn smooth(current: f32, target: f32, dt_ms: f32, smoothing_ms: f32) -> f32 {
    if smoothing_ms <= 0.0 {
        return target;
    }
    let next = current + (target - current) * (1.0 - (-dt_ms.max(0.0) / smoothing_ms).exp());
    if (target - next).abs() < 1e-3 {
        target
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ScrollViewport;
    use folio_animation::AnimationScheduler;
    use folio_core::Rect;

    struct Fixture {
        stage: Stage,
        scheduler: AnimationScheduler,
        section: NodeId,
        title: NodeId,
        subtitle: NodeId,
        viewport: ScrollViewport,
    }

    fn fixture() -> Fixture {
        let stage = Stage::new();
        let section = stage.insert("section", Rect::new(0.0, 1000.0, 1280.0, 400.0));
        let title = stage
            .insert_child(section, "title", Rect::new(0.0, 1000.0, 1280.0, 60.0))
            .unwrap();
        let subtitle = stage
            .insert_child(section, "subtitle", Rect::new(0.0, 1060.0, 1280.0, 30.0))
            .unwrap();
        let scheduler = AnimationScheduler::new(stage.clone());
        Fixture {
            stage,
            scheduler,
            section,
            title,
            subtitle,
            viewport: ScrollViewport::new(1280.0, 800.0),
        }
    }

    #[test]
    fn test_one_shot_reveal_fires_once() {
        let mut f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        let id = reveals.observe(
            f.section,
            RevealOptions::default(),
            RevealSequence::title(f.title, Some(f.subtitle)),
        );
        assert_eq!(f.stage.props(f.title).unwrap().opacity, 0.0);
        assert_eq!(f.stage.props(f.subtitle).unwrap().y, 30.0);

        assert_eq!(reveals.update(&f.viewport, 16.0), 0);

        f.viewport.scroll_to(600.0);
        assert_eq!(reveals.update(&f.viewport, 16.0), 1);
        f.scheduler.advance(1000.0);
        assert!(f.stage.props(f.title).unwrap().approx_eq(&folio_core::VisualProps::REST, 1e-4));
        assert!(f.stage.props(f.subtitle).unwrap().approx_eq(&folio_core::VisualProps::REST, 1e-4));

        f.viewport.scroll_to(0.0);
        reveals.update(&f.viewport, 16.0);
        f.viewport.scroll_to(600.0);
        assert_eq!(reveals.update(&f.viewport, 16.0), 0);

        let state = reveals.observation(id).unwrap();
        assert!(state.has_triggered_once);
        assert!(state.is_intersecting);
        assert_eq!(f.scheduler.timeline_count(), 1);
    }

    #[test]
    fn test_sliver_below_threshold_is_not_intersecting() {
        let mut f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        let id = reveals.observe(
            f.section,
            RevealOptions::default(),
            RevealSequence::title(f.title, None),
        );

        // 20 of 400 pixels on screen
        f.viewport.scroll_to(220.0);
        assert_eq!(reveals.update(&f.viewport, 16.0), 0);
        let state = reveals.observation(id).unwrap();
        assert!(!state.is_intersecting);
        assert!(!state.has_triggered_once);

        f.viewport.scroll_to(300.0);
        assert_eq!(reveals.update(&f.viewport, 16.0), 1);
        assert!(reveals.observation(id).unwrap().is_intersecting);
    }

    #[test]
    fn test_retrigger_replaces_timeline() {
        let mut f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        reveals.observe(
            f.section,
            RevealOptions {
                trigger_once: false,
                ..RevealOptions::default()
            },
            RevealSequence::title(f.title, None),
        );

        f.viewport.scroll_to(600.0);
        assert_eq!(reveals.update(&f.viewport, 0.0), 1);
        f.scheduler.advance(1000.0);

        f.viewport.scroll_to(0.0);
        assert_eq!(reveals.update(&f.viewport, 0.0), 0);
        f.viewport.scroll_to(600.0);
        assert_eq!(reveals.update(&f.viewport, 0.0), 1);

        // Fresh run starts hidden again
        assert_eq!(f.stage.props(f.title).unwrap().opacity, 0.0);
        assert_eq!(f.scheduler.timeline_count(), 1);
    }

    #[test]
    fn test_below_threshold_does_not_fire() {
        let mut f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        reveals.observe(
            f.section,
            RevealOptions {
                threshold: 0.5,
                ..RevealOptions::default()
            },
            RevealSequence::title(f.title, None),
        );

        // 100 of 400 px visible
        f.viewport.scroll_to(300.0);
        assert_eq!(reveals.update(&f.viewport, 0.0), 0);
        f.viewport.scroll_to(400.0);
        assert_eq!(reveals.update(&f.viewport, 0.0), 1);
    }

    #[test]
    fn test_scrub_follows_scroll() {
        let mut f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        let id = reveals.observe(
            f.section,
            RevealOptions {
                mode: RevealMode::Scrub {
                    start: 1.0,
                    end: 0.6,
                    smoothing_ms: 0.0,
                },
                ..RevealOptions::default()
            },
            RevealSequence::title(f.title, None),
        );

        // Container top at the viewport bottom
        f.viewport.scroll_to(200.0);
        reveals.update(&f.viewport, 16.0);
        assert_eq!(reveals.scrub_progress(id), Some(0.0));

        // Container top at 80% of the viewport
        f.viewport.scroll_to(360.0);
        reveals.update(&f.viewport, 16.0);
        assert!((reveals.scrub_progress(id).unwrap() - 0.5).abs() < 1e-4);

        f.viewport.scroll_to(1000.0);
        reveals.update(&f.viewport, 16.0);
        assert_eq!(reveals.scrub_progress(id), Some(1.0));
        assert_eq!(f.stage.props(f.title).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_scrub_smoothing_lags() {
        let mut f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        let id = reveals.observe(
            f.section,
            RevealOptions {
                mode: RevealMode::scrub(),
                ..RevealOptions::default()
            },
            RevealSequence::title(f.title, None),
        );

        f.viewport.scroll_to(1000.0);
        reveals.update(&f.viewport, 500.0);
        let progress = reveals.scrub_progress(id).unwrap();
        assert!((progress - (1.0 - (-1.0_f32).exp())).abs() < 1e-4);

        for _ in 0..50 {
            reveals.update(&f.viewport, 500.0);
        }
        assert_eq!(reveals.scrub_progress(id), Some(1.0));
    }

    #[test]
    fn test_staggered_children_and_degenerate_groups() {
        let f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());

        let cards: Vec<_> = (0..3)
            .map(|i| {
                f.stage
                    .insert_child(f.section, "card", Rect::new(0.0, 1100.0 + i as f32, 10.0, 10.0))
                    .unwrap()
            })
            .collect();
        reveals.observe(f.section, RevealOptions::default(), RevealSequence::staggered(cards.clone(), 100.0));
        reveals.observe(f.section, RevealOptions::default(), RevealSequence::staggered(Vec::new(), 100.0));

        let mut viewport = f.viewport;
        viewport.scroll_to(600.0);
        assert_eq!(reveals.update(&viewport, 0.0), 2);

        f.scheduler.advance(100.0);
        let first = f.stage.props(cards[0]).unwrap().opacity;
        let last = f.stage.props(cards[2]).unwrap().opacity;
        assert!(first > 0.0);
        assert_eq!(last, 0.0);

        f.scheduler.advance(1000.0);
        for card in cards {
            assert_eq!(f.stage.props(card).unwrap().opacity, 1.0);
        }
    }

    #[test]
    fn test_missing_container_is_skipped() {
        let f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        let gone = f.stage.insert("gone", Rect::ZERO);
        reveals.observe(gone, RevealOptions::default(), RevealSequence::title(f.title, None));
        f.stage.remove(gone);

        assert_eq!(reveals.update(&f.viewport, 0.0), 0);
    }

    #[test]
    fn test_unobserve_and_drop_release_timelines() {
        let f = fixture();
        let mut reveals = RevealController::new(f.scheduler.handle(), f.stage.clone());
        let a = reveals.observe(f.section, RevealOptions::default(), RevealSequence::title(f.title, None));
        reveals.observe(f.section, RevealOptions::default(), RevealSequence::title(f.subtitle, None));
        assert_eq!(f.scheduler.timeline_count(), 2);

        assert!(reveals.unobserve(a));
        assert_eq!(f.scheduler.timeline_count(), 1);

        drop(reveals);
        assert_eq!(f.scheduler.timeline_count(), 0);
    }
}
