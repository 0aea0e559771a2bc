//! Folio Animation System
//!
//! Tweens, timelines and timers advanced by a single frame scheduler.
//!
//! # Features
//!
//! - **Easing**: the curves used by section reveals and hover effects
//! - **Property Tweens**: animate only the [`VisualProps`](folio_core::VisualProps) fields named in a [`PropPatch`]
//! - **Timelines**: sequential, overlapping and absolutely placed steps
//! - **Staggers**: per-target delays from start, end, center or edges
//! - **Timers**: repeating and one-shot timers in scheduler time
//! - **RAII Registration**: wrappers unregister from the scheduler on drop

pub mod easing;
pub mod scheduler;
pub mod timeline;
pub mod tween;
pub mod values;

pub use easing::Easing;
pub use scheduler::{
    AnimatedTimeline, AnimatedTimer, AnimatedTween, AnimationScheduler, SchedulerHandle,
    TimelineId, TimerId, TweenId,
};
pub use timeline::{Position, Stagger, StaggerFrom, StaggerTiming, Timeline};
pub use tween::Tween;
pub use values::{Interpolate, Prop, PropPatch};
