//! Animation scheduler
//!
//! The scheduler owns every running tween, timeline and timer and advances
//! them together. Hosts drive it either with [`AnimationScheduler::tick`]
//! (wall-clock delta since the previous frame) or with
//! [`AnimationScheduler::advance`] (explicit delta, for deterministic hosts
//! and tests).
//!
//! Controllers never hold the scheduler itself. They get a weak
//! [`SchedulerHandle`] and wrap what they register in RAII types
//! ([`AnimatedTween`], [`AnimatedTimeline`], [`AnimatedTimer`]) that
//! unregister on drop, so a torn-down controller leaves nothing behind.

use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use folio_core::{NodeId, Stage};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use crate::timeline::Timeline;
use crate::tween::Tween;

new_key_type! {
    /// Handle to a registered tween
    pub struct TweenId;
    /// Handle to a registered timeline
    pub struct TimelineId;
    /// Handle to a registered timer
    pub struct TimerId;
}

struct TweenEntry {
    tween: Tween,
    elapsed_ms: f32,
    playing: bool,
    /// Removed automatically once finished
    detached: bool,
    /// Registration order; later tweens render over earlier ones
    seq: u64,
}

impl TweenEntry {
    fn local_ms(&self) -> f32 {
        self.elapsed_ms - self.tween.delay_ms()
    }

    fn render(&mut self, stage: &Stage) {
        let local = self.local_ms();
        let target = self.tween.target();
        let tween = &mut self.tween;
        if !stage.update_props(target, |props| tween.render(props, local)) {
            trace!("tween target {:?} missing, skipped", target);
        }
    }
}

/// Interval timer measured in scheduler time
#[derive(Clone, Debug)]
struct Timer {
    interval_ms: f32,
    elapsed_ms: f32,
    repeating: bool,
    running: bool,
    /// Expirations not yet taken by the owner
    fired: u32,
}

impl Timer {
    fn tick(&mut self, dt_ms: f32) {
        if !self.running {
            return;
        }
        self.elapsed_ms += dt_ms;
        while self.elapsed_ms >= self.interval_ms {
            self.fired += 1;
            if !self.repeating {
                self.running = false;
                self.elapsed_ms = 0.0;
                break;
            }
            self.elapsed_ms -= self.interval_ms;
        }
    }
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    tweens: SlotMap<TweenId, TweenEntry>,
    timelines: SlotMap<TimelineId, Timeline>,
    timers: SlotMap<TimerId, Timer>,
    stage: Stage,
    next_seq: u64,
    last_frame: Instant,
}

impl SchedulerInner {
    fn advance(&mut self, dt_ms: f32) -> bool {
        let dt_ms = dt_ms.max(0.0);
        let SchedulerInner {
            tweens,
            timelines,
            timers,
            stage,
            ..
        } = self;

        let mut order: Vec<TweenId> = tweens
            .iter()
            .filter(|(_, e)| e.playing)
            .map(|(id, _)| id)
            .collect();
        order.sort_by_key(|id| tweens[*id].seq);
        for id in order {
            let entry = &mut tweens[id];
            entry.elapsed_ms += dt_ms;
            entry.render(stage);
            if entry.local_ms() >= entry.tween.active_duration_ms() {
                entry.playing = false;
            }
        }
        tweens.retain(|_, e| e.playing || !e.detached);

        for (_, timeline) in timelines.iter_mut() {
            if timeline.is_playing() {
                timeline.tick(dt_ms);
                timeline.render(stage);
            }
        }

        for (_, timer) in timers.iter_mut() {
            timer.tick(dt_ms);
        }

        self.is_active()
    }

    fn is_active(&self) -> bool {
        self.tweens.iter().any(|(_, e)| e.playing)
            || self.timelines.iter().any(|(_, t)| t.is_playing())
            || self.timers.iter().any(|(_, t)| t.running)
    }

    fn insert_tween(&mut self, tween: Tween, detached: bool) -> TweenId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let mut entry = TweenEntry {
            tween,
            elapsed_ms: 0.0,
            playing: true,
            detached,
            seq,
        };
        entry.render(&self.stage);
        self.tweens.insert(entry)
    }
}

/// The animation scheduler that advances all active animations
///
/// Held by the page host; controllers get a [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl AnimationScheduler {
    /// Create a scheduler that writes into `stage`
    pub fn new(stage: Stage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                tweens: SlotMap::with_key(),
                timelines: SlotMap::with_key(),
                timers: SlotMap::with_key(),
                stage,
                next_seq: 0,
                last_frame: Instant::now(),
            })),
        }
    }

    /// The stage animations are rendered into
    pub fn stage(&self) -> Stage {
        self.inner.lock().unwrap().stage.clone()
    }

    /// Get a weak handle for registering animations
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Advance by the wall-clock time since the previous frame
    ///
    /// Returns true if anything is still active (needs another frame).
    pub fn tick(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let now = Instant::now();
        let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
        inner.last_frame = now;
        inner.advance(dt_ms)
    }

    /// Advance by an explicit number of milliseconds
    pub fn advance(&self, dt_ms: f32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.last_frame = Instant::now();
        inner.advance(dt_ms)
    }

    /// Check if any tween or timeline is playing or any timer is running
    pub fn has_active_animations(&self) -> bool {
        self.inner.lock().unwrap().is_active()
    }

    /// Number of registered tweens, finished or not
    pub fn tween_count(&self) -> usize {
        self.inner.lock().unwrap().tweens.len()
    }

    pub fn timeline_count(&self) -> usize {
        self.inner.lock().unwrap().timelines.len()
    }

    pub fn timer_count(&self) -> usize {
        self.inner.lock().unwrap().timers.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(Stage::new())
    }
}

/// A weak handle to the animation scheduler
///
/// Every operation is a no-op (returning `None`/`false`) once the scheduler
/// has been dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    // =========================================================================
    // Tween Operations
    // =========================================================================

    /// Play a fire-and-forget tween; it is removed once it finishes
    pub fn play(&self, tween: Tween) -> Option<TweenId> {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().insert_tween(tween, true))
    }

    /// Register and start a tween that stays registered until removed
    pub fn register_tween(&self, tween: Tween) -> Option<TweenId> {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().insert_tween(tween, false))
    }

    /// Check if a tween exists and has not finished
    pub fn is_tween_playing(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().tweens.get(id).map(|e| e.playing))
            .unwrap_or(false)
    }

    /// Freeze a tween where it is
    pub fn stop_tween(&self, id: TweenId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(entry) = inner.lock().unwrap().tweens.get_mut(id) {
                entry.playing = false;
            }
        }
    }

    /// Remove a tween; returns whether it was registered
    pub fn remove_tween(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().tweens.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Remove every tween targeting `node`; returns how many were removed
    pub fn kill_tweens_of(&self, node: NodeId) -> usize {
        let Some(inner) = self.inner.upgrade() else {
            return 0;
        };
        let mut guard = inner.lock().unwrap();
        let before = guard.tweens.len();
        guard.tweens.retain(|_, e| e.tween.target() != node);
        before - guard.tweens.len()
    }

    // =========================================================================
    // Timeline Operations
    // =========================================================================

    /// Register a timeline (not yet playing) and return its ID
    pub fn register_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().timelines.insert(timeline))
    }

    /// Start a timeline from time zero and render its initial state
    pub fn start_timeline(&self, id: TimelineId) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = inner.lock().unwrap();
            let SchedulerInner {
                timelines, stage, ..
            } = &mut *guard;
            if let Some(timeline) = timelines.get_mut(id) {
                timeline.start();
                timeline.render(stage);
            }
        }
    }

    pub fn stop_timeline(&self, id: TimelineId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(timeline) = inner.lock().unwrap().timelines.get_mut(id) {
                timeline.stop();
            }
        }
    }

    /// Seek a timeline to `progress` (0.0 to 1.0) and render that state
    pub fn set_timeline_progress(&self, id: TimelineId, progress: f32) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = inner.lock().unwrap();
            let SchedulerInner {
                timelines, stage, ..
            } = &mut *guard;
            if let Some(timeline) = timelines.get_mut(id) {
                timeline.set_progress(progress);
                timeline.render(stage);
            }
        }
    }

    pub fn timeline_progress(&self, id: TimelineId) -> Option<f32> {
        self.with_timeline(id, |t| t.progress())
    }

    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |t| t.is_playing()).unwrap_or(false)
    }

    pub fn remove_timeline(&self, id: TimelineId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().timelines.remove(id);
        }
    }

    /// Access a registered timeline
    ///
    /// Returns None if the scheduler is dropped or the timeline doesn't exist.
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        self.inner.upgrade().and_then(|inner| {
            inner
                .lock()
                .unwrap()
                .timelines
                .get_mut(id)
                .map(|timeline| f(timeline))
        })
    }

    // =========================================================================
    // Timer Operations
    // =========================================================================

    /// Register a running timer
    pub fn register_timer(&self, interval_ms: f32, repeating: bool) -> Option<TimerId> {
        self.inner.upgrade().map(|inner| {
            let id = inner.lock().unwrap().timers.insert(Timer {
                interval_ms: interval_ms.max(1.0),
                elapsed_ms: 0.0,
                repeating,
                running: true,
                fired: 0,
            });
            debug!(?id, interval_ms, repeating, "timer registered");
            id
        })
    }

    /// Take the number of expirations since the last call
    pub fn take_fired(&self, id: TimerId) -> u32 {
        self.inner
            .upgrade()
            .and_then(|inner| {
                inner
                    .lock()
                    .unwrap()
                    .timers
                    .get_mut(id)
                    .map(|t| std::mem::take(&mut t.fired))
            })
            .unwrap_or(0)
    }

    /// Stop counting; pending expirations are discarded
    pub fn pause_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(timer) = inner.lock().unwrap().timers.get_mut(id) {
                timer.running = false;
                timer.fired = 0;
            }
        }
    }

    /// Start counting a full interval from zero
    pub fn resume_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(timer) = inner.lock().unwrap().timers.get_mut(id) {
                timer.running = true;
                timer.elapsed_ms = 0.0;
            }
        }
    }

    /// Restart the current interval without changing the running state
    pub fn reset_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(timer) = inner.lock().unwrap().timers.get_mut(id) {
                timer.elapsed_ms = 0.0;
            }
        }
    }

    pub fn is_timer_running(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().timers.get(id).map(|t| t.running))
            .unwrap_or(false)
    }

    pub fn remove_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().timers.remove(id);
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

// ============================================================================
// RAII wrappers
// ============================================================================

/// A tween that stays registered for the lifetime of this value
///
/// Unlike [`SchedulerHandle::play`], the tween is kept after it finishes so
/// its state can be queried; dropping the wrapper removes it.
pub struct AnimatedTween {
    handle: SchedulerHandle,
    id: Option<TweenId>,
}

impl AnimatedTween {
    /// Register and start `tween`
    pub fn new(handle: SchedulerHandle, tween: Tween) -> Self {
        let id = handle.register_tween(tween);
        Self { handle, id }
    }

    pub fn id(&self) -> Option<TweenId> {
        self.id
    }

    pub fn is_playing(&self) -> bool {
        self.id.is_some_and(|id| self.handle.is_tween_playing(id))
    }

    pub fn stop(&self) {
        if let Some(id) = self.id {
            self.handle.stop_tween(id);
        }
    }
}

impl Drop for AnimatedTween {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_tween(id);
        }
    }
}

/// A timeline registered for the lifetime of this value
///
/// ```rust
/// use folio_animation::{AnimatedTimeline, AnimationScheduler, Position, PropPatch, Timeline, Tween};
/// use folio_core::{Rect, Stage};
///
/// let stage = Stage::new();
/// let node = stage.insert("title", Rect::ZERO);
/// let scheduler = AnimationScheduler::new(stage.clone());
///
/// let mut timeline = Timeline::new();
/// timeline.add(Tween::to(node, PropPatch::new().y(-10.0), 300.0), Position::Sequential);
///
/// let animated = AnimatedTimeline::new(scheduler.handle(), timeline);
/// animated.start();
/// scheduler.advance(300.0);
/// assert_eq!(stage.props(node).unwrap().y, -10.0);
///
/// drop(animated);
/// assert_eq!(scheduler.timeline_count(), 0);
/// ```
pub struct AnimatedTimeline {
    handle: SchedulerHandle,
    id: Option<TimelineId>,
}

impl AnimatedTimeline {
    /// Register `timeline` without starting it
    pub fn new(handle: SchedulerHandle, timeline: Timeline) -> Self {
        let id = handle.register_timeline(timeline);
        Self { handle, id }
    }

    pub fn id(&self) -> Option<TimelineId> {
        self.id
    }

    /// Start (or restart) from the beginning
    pub fn start(&self) {
        if let Some(id) = self.id {
            self.handle.start_timeline(id);
        }
    }

    pub fn stop(&self) {
        if let Some(id) = self.id {
            self.handle.stop_timeline(id);
        }
    }

    /// Jump to `progress` (0.0 to 1.0) and render it
    pub fn set_progress(&self, progress: f32) {
        if let Some(id) = self.id {
            self.handle.set_timeline_progress(id, progress);
        }
    }

    /// Overall progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.timeline_progress(id))
            .unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.id.is_some_and(|id| self.handle.is_timeline_playing(id))
    }

    pub fn duration_ms(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.with_timeline(id, |t| t.duration_ms()))
            .unwrap_or(0.0)
    }
}

impl Drop for AnimatedTimeline {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_timeline(id);
        }
    }
}

/// A timer registered for the lifetime of this value
pub struct AnimatedTimer {
    handle: SchedulerHandle,
    id: Option<TimerId>,
}

impl AnimatedTimer {
    /// Register a running timer
    pub fn new(handle: SchedulerHandle, interval_ms: f32, repeating: bool) -> Self {
        let id = handle.register_timer(interval_ms, repeating);
        Self { handle, id }
    }

    /// Repeating timer firing every `interval_ms`
    pub fn repeating(handle: SchedulerHandle, interval_ms: f32) -> Self {
        Self::new(handle, interval_ms, true)
    }

    /// Timer firing once after `delay_ms`
    pub fn once(handle: SchedulerHandle, delay_ms: f32) -> Self {
        Self::new(handle, delay_ms, false)
    }

    /// Expirations since the last call
    pub fn take_fired(&self) -> u32 {
        self.id.map(|id| self.handle.take_fired(id)).unwrap_or(0)
    }

    pub fn pause(&self) {
        if let Some(id) = self.id {
            self.handle.pause_timer(id);
        }
    }

    /// Resume with a full interval
    pub fn resume(&self) {
        if let Some(id) = self.id {
            self.handle.resume_timer(id);
        }
    }

    /// Restart the current interval
    pub fn reset(&self) {
        if let Some(id) = self.id {
            self.handle.reset_timer(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.id.is_some_and(|id| self.handle.is_timer_running(id))
    }
}

impl Drop for AnimatedTimer {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_timer(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::timeline::Position;
    use crate::values::PropPatch;
    use folio_core::Rect;

    fn setup() -> (Stage, AnimationScheduler, NodeId) {
        let stage = Stage::new();
        let node = stage.insert("node", Rect::new(0.0, 0.0, 100.0, 100.0));
        let scheduler = AnimationScheduler::new(stage.clone());
        (stage, scheduler, node)
    }

    #[test]
    fn test_scheduler_advance() {
        let (stage, scheduler, node) = setup();
        let handle = scheduler.handle();

        handle.play(Tween::to(node, PropPatch::new().y(-4.0), 200.0).easing(Easing::Linear));
        assert!(scheduler.has_active_animations());

        assert!(scheduler.advance(100.0));
        assert!((stage.props(node).unwrap().y + 2.0).abs() < 1e-4);

        assert!(!scheduler.advance(100.0));
        assert_eq!(stage.props(node).unwrap().y, -4.0);
        // Detached tweens are dropped once finished
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn test_scheduler_tick_uses_wall_clock() {
        let (_stage, scheduler, node) = setup();
        scheduler
            .handle()
            .play(Tween::to(node, PropPatch::new().y(-4.0), 60_000.0));
        assert!(scheduler.tick());
    }

    #[test]
    fn test_later_tween_renders_over_earlier() {
        let (stage, scheduler, node) = setup();
        let handle = scheduler.handle();

        handle.play(Tween::to(node, PropPatch::new().scale(2.0), 100.0));
        handle.play(Tween::to(node, PropPatch::new().scale(0.5), 100.0));
        scheduler.advance(100.0);
        assert_eq!(stage.props(node).unwrap().scale, 0.5);
    }

    #[test]
    fn test_kill_tweens_of() {
        let (stage, scheduler, node) = setup();
        let other = stage.insert("other", Rect::ZERO);
        let handle = scheduler.handle();

        handle.play(Tween::to(node, PropPatch::new().y(-10.0), 400.0));
        handle.play(Tween::to(node, PropPatch::new().scale(1.1), 400.0));
        handle.play(Tween::to(other, PropPatch::new().scale(1.1), 400.0));

        assert_eq!(handle.kill_tweens_of(node), 2);
        assert_eq!(scheduler.tween_count(), 1);
        scheduler.advance(400.0);
        assert_eq!(stage.props(node).unwrap().y, 0.0);
    }

    #[test]
    fn test_timeline_start_renders_from_state() {
        let (stage, scheduler, node) = setup();
        let mut timeline = Timeline::new();
        timeline.add(
            Tween::from_to(
                node,
                PropPatch::new().opacity(0.0).y(40.0),
                PropPatch::new().opacity(1.0).y(0.0),
                800.0,
            ),
            Position::Sequential,
        );

        let animated = AnimatedTimeline::new(scheduler.handle(), timeline);
        assert!(!animated.is_playing());
        animated.start();
        assert_eq!(stage.props(node).unwrap().opacity, 0.0);
        assert_eq!(stage.props(node).unwrap().y, 40.0);

        scheduler.advance(800.0);
        assert!(!animated.is_playing());
        assert_eq!(animated.progress(), 1.0);
        assert!(stage.props(node).unwrap().approx_eq(&folio_core::VisualProps::REST, 1e-5));
    }

    #[test]
    fn test_repeating_timer() {
        let (_stage, scheduler, _node) = setup();
        let timer = AnimatedTimer::repeating(scheduler.handle(), 5000.0);

        scheduler.advance(4999.0);
        assert_eq!(timer.take_fired(), 0);
        scheduler.advance(1.0);
        assert_eq!(timer.take_fired(), 1);
        scheduler.advance(10_000.0);
        assert_eq!(timer.take_fired(), 2);
        assert_eq!(timer.take_fired(), 0);
    }

    #[test]
    fn test_one_shot_timer() {
        let (_stage, scheduler, _node) = setup();
        let timer = AnimatedTimer::once(scheduler.handle(), 100.0);

        scheduler.advance(250.0);
        assert_eq!(timer.take_fired(), 1);
        assert!(!timer.is_running());
        scheduler.advance(250.0);
        assert_eq!(timer.take_fired(), 0);
    }

    #[test]
    fn test_timer_resume_restarts_interval() {
        let (_stage, scheduler, _node) = setup();
        let timer = AnimatedTimer::repeating(scheduler.handle(), 1000.0);

        scheduler.advance(900.0);
        timer.pause();
        scheduler.advance(5000.0);
        assert_eq!(timer.take_fired(), 0);

        timer.resume();
        scheduler.advance(900.0);
        assert_eq!(timer.take_fired(), 0);
        scheduler.advance(100.0);
        assert_eq!(timer.take_fired(), 1);
    }

    #[test]
    fn test_wrappers_unregister_on_drop() {
        let (_stage, scheduler, node) = setup();
        let handle = scheduler.handle();

        let tween = AnimatedTween::new(handle.clone(), Tween::to(node, PropPatch::new().x(5.0), 10.0));
        let timeline = AnimatedTimeline::new(handle.clone(), Timeline::new());
        let timer = AnimatedTimer::repeating(handle, 10.0);
        scheduler.advance(50.0);
        assert_eq!(scheduler.tween_count(), 1);
        assert!(!tween.is_playing());
        assert_eq!(scheduler.timeline_count(), 1);
        assert_eq!(scheduler.timer_count(), 1);

        drop(tween);
        drop(timeline);
        drop(timer);
        assert_eq!(scheduler.tween_count(), 0);
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.timer_count(), 0);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_handle_weak_reference() {
        let (handle, node) = {
            let (_stage, scheduler, node) = setup();
            (scheduler.handle(), node)
        };

        // Scheduler is dropped, handle should not be alive
        assert!(!handle.is_alive());

        // Operations should safely no-op
        assert!(handle.play(Tween::to(node, PropPatch::new(), 10.0)).is_none());
        assert!(handle.register_timer(10.0, true).is_none());
        let timer = AnimatedTimer::repeating(handle, 10.0);
        assert_eq!(timer.take_fired(), 0);
    }
}
