//! Category filtering
//!
//! [`set_filter`] is the pure view: `All` keeps every item, `Only(k)` keeps
//! items tagged `k`, order preserved. [`FilterController`] holds the active
//! key and announces each change as a [`FilterTransition`], which
//! [`FilterAnimator`] plays on the stage: the old set animates out, and after
//! a short settle the new set animates in.

use std::fmt::Debug;

use folio_animation::{
    AnimatedTimeline, Easing, Position, PropPatch, SchedulerHandle, Stagger, StaggerFrom,
    Timeline, Tween,
};
use folio_core::{NodeId, Store, SubscriptionHandle};
use tracing::debug;

/// Pause between the exit and enter animations of a transition
pub const SETTLE_MS: f32 = 100.0;

/// Items tagged with one or more categories
pub trait Categorized<K> {
    fn categories(&self) -> &[K];
}

/// Active filter key
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter<K> {
    #[default]
    All,
    Only(K),
}

impl<K: PartialEq> CategoryFilter<K> {
    pub fn matches<T: Categorized<K>>(&self, item: &T) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(key) => item.categories().contains(key),
        }
    }
}

/// Items passing `filter`, in source order
pub fn set_filter<'a, T, K>(items: &'a [T], filter: &CategoryFilter<K>) -> Vec<&'a T>
where
    T: Categorized<K>,
    K: PartialEq,
{
    items.iter().filter(|item| filter.matches(*item)).collect()
}

/// Source indices of the items passing `filter`
pub fn visible_indices<T, K>(items: &[T], filter: &CategoryFilter<K>) -> Vec<usize>
where
    T: Categorized<K>,
    K: PartialEq,
{
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| filter.matches(*item))
        .map(|(i, _)| i)
        .collect()
}

/// A change of filter key
#[derive(Clone, Debug, PartialEq)]
pub struct FilterTransition<K> {
    pub from: CategoryFilter<K>,
    pub to: CategoryFilter<K>,
    /// Indices visible before the change; they animate out
    pub exiting: Vec<usize>,
    /// Indices visible after the change; they animate in
    pub entering: Vec<usize>,
    /// Delay between the end of the exit and the start of the enter
    pub settle_ms: f32,
}

#[derive(Clone, Debug)]
struct FilterState<K> {
    active: CategoryFilter<K>,
    visible: Vec<usize>,
    last_transition: Option<FilterTransition<K>>,
}

/// Owns a categorized collection and its active filter
pub struct FilterController<T, K> {
    items: Vec<T>,
    state: Store<FilterState<K>>,
}

impl<T, K> FilterController<T, K>
where
    T: Categorized<K>,
    K: Clone + PartialEq + Debug + 'static,
{
    /// Start with every item visible
    pub fn new(items: Vec<T>) -> Self {
        let visible = (0..items.len()).collect();
        Self {
            items,
            state: Store::new(FilterState {
                active: CategoryFilter::All,
                visible,
                last_transition: None,
            }),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn active(&self) -> CategoryFilter<K> {
        self.state.with(|s| s.active.clone())
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        self.state.with(|s| s.visible.clone())
    }

    pub fn visible_items(&self) -> Vec<&T> {
        self.state
            .read()
            .visible
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    /// Switch the active key
    ///
    /// Returns `None` when `filter` is already active. Otherwise subscribers
    /// receive the transition, which is also returned.
    pub fn on_filter_change(&self, filter: CategoryFilter<K>) -> Option<FilterTransition<K>> {
        let entering = visible_indices(&self.items, &filter);
        let transition = self.state.update_with(move |s| {
            if s.active == filter {
                return (false, None);
            }
            let transition = FilterTransition {
                from: std::mem::replace(&mut s.active, filter),
                to: s.active.clone(),
                exiting: std::mem::replace(&mut s.visible, entering),
                entering: s.visible.clone(),
                settle_ms: SETTLE_MS,
            };
            s.last_transition = Some(transition.clone());
            (true, Some(transition))
        })?;
        debug!(
            from = ?transition.from,
            to = ?transition.to,
            visible = transition.entering.len(),
            "filter changed"
        );
        Some(transition)
    }

    /// Observe filter transitions
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&FilterTransition<K>) + 'static,
    {
        self.state.subscribe(move |state| {
            if let Some(transition) = &state.last_transition {
                callback(transition);
            }
        })
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.state.unsubscribe(handle)
    }
}

/// Plays filter transitions on the stage
///
/// Starting a transition replaces (and cancels) the one in flight.
pub struct FilterAnimator {
    handle: SchedulerHandle,
    current: Option<AnimatedTimeline>,
}

impl FilterAnimator {
    pub fn new(handle: SchedulerHandle) -> Self {
        Self {
            handle,
            current: None,
        }
    }

    /// Build the exit-then-enter timeline; `nodes[i]` presents item `i`
    pub fn timeline<K>(transition: &FilterTransition<K>, nodes: &[NodeId]) -> Timeline {
        let pick = |indices: &[usize]| -> Vec<NodeId> {
            indices.iter().filter_map(|&i| nodes.get(i).copied()).collect()
        };
        let exiting = pick(&transition.exiting);
        let entering = pick(&transition.entering);
        let hidden = PropPatch::new().opacity(0.0).scale(0.8).y(50.0);

        let mut timeline = Timeline::new();
        timeline.stagger(
            &exiting,
            Stagger::amount(200.0).from(StaggerFrom::Edges),
            Position::Sequential,
            |node| Tween::to(node, hidden.rotate_y(90.0), 400.0).easing(Easing::EaseInCubic),
        );
        timeline.stagger(
            &entering,
            Stagger::amount(400.0).from(StaggerFrom::Center),
            Position::Offset(transition.settle_ms),
            |node| {
                Tween::from_to(
                    node,
                    hidden.rotate_y(-90.0),
                    PropPatch::new().opacity(1.0).scale(1.0).y(0.0).rotate_y(0.0),
                    600.0,
                )
                .easing(Easing::BACK_OUT)
            },
        );
        timeline
    }

    /// Play `transition`, cancelling any transition still running
    pub fn play<K>(&mut self, transition: &FilterTransition<K>, nodes: &[NodeId]) {
        self.current = None;
        let animated = AnimatedTimeline::new(self.handle.clone(), Self::timeline(transition, nodes));
        animated.start();
        self.current = Some(animated);
    }

    pub fn is_playing(&self) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_playing())
    }

    /// Cancel the running transition
    pub fn cancel(&mut self) {
        self.current = None;
    }
}
