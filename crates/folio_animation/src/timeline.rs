//! Timelines
//!
//! A [`Timeline`] orders tweens in time. Each step is placed with a
//! [`Position`] relative to the end of the step before it, and a step may be
//! a staggered group of tweens over several targets.
//!
//! ```rust
//! use folio_animation::{Easing, Position, PropPatch, Stagger, Timeline, Tween};
//! use folio_core::{Rect, Stage};
//!
//! let stage = Stage::new();
//! let title = stage.insert("title", Rect::ZERO);
//! let subtitle = stage.insert("subtitle", Rect::ZERO);
//!
//! let mut timeline = Timeline::new();
//! timeline.add(
//!     Tween::from_to(title, PropPatch::new().opacity(0.0), PropPatch::new().opacity(1.0), 800.0),
//!     Position::Sequential,
//! );
//! timeline.add(
//!     Tween::from_to(subtitle, PropPatch::new().opacity(0.0), PropPatch::new().opacity(1.0), 600.0)
//!         .easing(Easing::EaseOutCubic),
//!     Position::Offset(-400.0),
//! );
//! assert_eq!(timeline.duration_ms(), 1000.0);
//! # let _ = Stagger::each(100.0);
//! ```

use crate::tween::Tween;
use folio_core::{NodeId, Stage};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Where a step starts relative to the rest of the timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// At the end of the previous step
    Sequential,
    /// Signed offset from the end of the previous step; negative overlaps
    Offset(f32),
    /// Absolute time from the start of the timeline
    At(f32),
    /// Together with the previous step
    WithPrevious,
}

/// Which end of a staggered group starts first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerFrom {
    #[default]
    Start,
    End,
    /// Middle targets first, moving outward
    Center,
    /// Outermost targets first, moving inward
    Edges,
}

/// How stagger offsets are sized
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StaggerTiming {
    /// Fixed delay increment between neighbouring targets
    Each(f32),
    /// Total delay spread across the whole group
    Amount(f32),
}

/// Per-target delay pattern for a group of tweens
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    pub timing: StaggerTiming,
    pub from: StaggerFrom,
}

impl Stagger {
    pub fn each(ms: f32) -> Self {
        Self {
            timing: StaggerTiming::Each(ms),
            from: StaggerFrom::Start,
        }
    }

    pub fn amount(ms: f32) -> Self {
        Self {
            timing: StaggerTiming::Amount(ms),
            from: StaggerFrom::Start,
        }
    }

    pub fn from(mut self, from: StaggerFrom) -> Self {
        self.from = from;
        self
    }

    /// Delay of each of `count` targets, in target order
    pub fn offsets(&self, count: usize) -> Vec<f32> {
        if count == 0 {
            return Vec::new();
        }
        let last = (count - 1) as f32;
        let mid = last / 2.0;
        let distances: Vec<f32> = (0..count)
            .map(|i| {
                let i = i as f32;
                match self.from {
                    StaggerFrom::Start => i,
                    StaggerFrom::End => last - i,
                    StaggerFrom::Center => (i - mid).abs(),
                    StaggerFrom::Edges => mid - (i - mid).abs(),
                }
            })
            .collect();

        // Nearest targets start at zero
        let min = distances.iter().copied().fold(f32::INFINITY, f32::min);
        let span = distances.iter().copied().fold(0.0_f32, f32::max) - min;
        match self.timing {
            StaggerTiming::Each(each) => distances.iter().map(|d| (d - min) * each).collect(),
            StaggerTiming::Amount(amount) => {
                if span <= 0.0 {
                    return vec![0.0; count];
                }
                distances.iter().map(|d| (d - min) / span * amount).collect()
            }
        }
    }
}

struct Step {
    start_ms: f32,
    tweens: Vec<Tween>,
}

impl Step {
    fn end_ms(&self) -> f32 {
        self.tweens
            .iter()
            .map(|t| self.start_ms + t.total_duration_ms())
            .fold(self.start_ms, f32::max)
    }
}

/// An ordered set of tweens played against the stage
#[derive(Default)]
pub struct Timeline {
    steps: Vec<Step>,
    /// End of the most recently added step
    cursor_ms: f32,
    last_start_ms: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    playing: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, position: Position) -> f32 {
        let start = match position {
            Position::Sequential => self.cursor_ms,
            Position::Offset(offset) => self.cursor_ms + offset,
            Position::At(at) => at,
            Position::WithPrevious => self.last_start_ms,
        };
        start.max(0.0)
    }

    fn push(&mut self, start_ms: f32, tweens: Vec<Tween>) {
        let step = Step { start_ms, tweens };
        let end = step.end_ms();
        self.cursor_ms = end;
        self.last_start_ms = start_ms;
        self.duration_ms = self.duration_ms.max(end);
        self.steps.push(step);
    }

    /// Add a single tween
    pub fn add(&mut self, tween: Tween, position: Position) -> &mut Self {
        let start = self.resolve(position);
        self.push(start, vec![tween]);
        self
    }

    /// Add one tween per target, delayed by the stagger pattern
    ///
    /// No targets adds nothing; one target is a single immediate step.
    pub fn stagger<F>(
        &mut self,
        targets: &[NodeId],
        stagger: Stagger,
        position: Position,
        make: F,
    ) -> &mut Self
    where
        F: Fn(NodeId) -> Tween,
    {
        if targets.is_empty() {
            return self;
        }
        let start = self.resolve(position);
        let tweens = targets
            .iter()
            .zip(stagger.offsets(targets.len()))
            .map(|(target, offset)| {
                let tween = make(*target);
                let delay = tween.delay_ms() + offset;
                tween.delay(delay)
            })
            .collect();
        self.push(start, tweens);
        self
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of tweens across every step
    pub fn tween_count(&self) -> usize {
        self.steps.iter().map(|s| s.tweens.len()).sum()
    }

    /// Every node a tween in this timeline writes
    pub fn targets(&self) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        self.steps
            .iter()
            .flat_map(|s| s.tweens.iter().map(Tween::target))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Start (or restart) from time zero
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance time; returns whether the timeline is still playing
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.playing = false;
        }
        self.playing
    }

    /// Jump to a time position without changing play state
    pub fn seek(&mut self, time_ms: f32) {
        self.elapsed_ms = time_ms.clamp(0.0, self.duration_ms);
    }

    /// Overall progress, 0.0 to 1.0
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return if self.elapsed_ms > 0.0 || !self.playing { 1.0 } else { 0.0 };
        }
        self.elapsed_ms / self.duration_ms
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.seek(progress.clamp(0.0, 1.0) * self.duration_ms);
    }

    /// Write the state at the current time into the stage
    ///
    /// Later steps overwrite earlier ones. A step that has not started yet
    /// only renders (its `from` values) when it is the first step touching
    /// its target. Targets no longer on the stage are skipped.
    pub fn render(&mut self, stage: &Stage) {
        let mut order: Vec<usize> = (0..self.steps.len()).collect();
        order.sort_by(|a, b| self.steps[*a].start_ms.total_cmp(&self.steps[*b].start_ms));

        let elapsed = self.elapsed_ms;
        let mut touched = FxHashSet::default();
        for index in order {
            let step = &mut self.steps[index];
            for tween in step.tweens.iter_mut() {
                let target = tween.target();
                let local = elapsed - step.start_ms - tween.delay_ms();
                let first = touched.insert(target);
                if local < 0.0 && !first {
                    continue;
                }
                if !stage.update_props(target, |props| tween.render(props, local)) {
                    trace!("timeline target {:?} missing, skipped", target);
                }
            }
        }
    }
}
