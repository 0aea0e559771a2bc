//! Hover and press effects
//!
//! [`HoverInteraction::attach`] binds pointer listeners to a set of elements:
//! entering lifts and scales the element, leaving animates it back to the
//! state it had before the pointer entered, and pressing gives a short scale-down pulse.
//! The returned [`HoverDisposer`] owns every listener; disposing it (or
//! dropping it) removes them and cancels every tween on the elements.

use std::cell::RefCell;
use std::rc::Rc;

use folio_animation::{
    AnimationScheduler, Easing, Prop, PropPatch, SchedulerHandle, Tween, TweenId,
};
use folio_core::{EventDispatcher, EventType, ListenerId, NodeId, Stage};
use smallvec::SmallVec;
use tracing::debug;

/// Hover/press effect parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverConfig {
    /// Upward translation on enter, in pixels
    pub lift: f32,
    /// Scale while hovered
    pub scale: f32,
    /// Shadow strength while hovered; 0 leaves the shadow alone
    pub shadow: f32,
    pub duration_ms: f32,
    pub easing: Easing,
    /// Scale at the bottom of the press pulse; `None` disables press
    pub press_scale: Option<f32>,
    pub press_duration_ms: f32,
}

impl HoverConfig {
    /// Call-to-action buttons
    pub fn button() -> Self {
        Self {
            lift: 4.0,
            scale: 1.03,
            shadow: 1.0,
            duration_ms: 200.0,
            easing: Easing::EaseOutCubic,
            press_scale: Some(0.97),
            press_duration_ms: 80.0,
        }
    }

    /// Information cards: a gentle scale, no lift or press
    pub fn card() -> Self {
        Self {
            lift: 0.0,
            scale: 1.02,
            shadow: 0.0,
            duration_ms: 300.0,
            easing: Easing::EaseOutCubic,
            press_scale: None,
            press_duration_ms: 0.0,
        }
    }

    /// Portfolio project cards
    pub fn project_card() -> Self {
        Self {
            lift: 10.0,
            scale: 1.02,
            shadow: 1.0,
            duration_ms: 400.0,
            easing: Easing::EaseOutCubic,
            press_scale: None,
            press_duration_ms: 0.0,
        }
    }

    /// Hovered values, given the element's resting props
    fn enter_patch(&self, rest_y: f32) -> PropPatch {
        let mut patch = PropPatch::new().scale(self.scale);
        if self.lift != 0.0 {
            patch = patch.y(rest_y - self.lift);
        }
        if self.shadow > 0.0 {
            patch = patch.shadow(self.shadow);
        }
        patch
    }
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self::button()
    }
}

#[derive(Default)]
struct ElementState {
    hovered: bool,
    /// Hovered values, derived from `rest`
    target: PropPatch,
    /// Pre-hover values of every property `target` touches
    rest: Option<PropPatch>,
    enter: Option<TweenId>,
    leave: Option<TweenId>,
    press: Option<TweenId>,
}

struct Element {
    node: NodeId,
    stage: Stage,
    state: RefCell<ElementState>,
}

impl Element {
    fn cancel(handle: &SchedulerHandle, slot: &mut Option<TweenId>) {
        if let Some(id) = slot.take() {
            handle.remove_tween(id);
        }
    }

    fn is_running(handle: &SchedulerHandle, slot: Option<TweenId>) -> bool {
        slot.is_some_and(|id| handle.is_tween_playing(id))
    }

    /// Snapshot the resting props unless a hover, leave or press is under way
    ///
    /// Other animations (reveals, filters) may move the element between
    /// hovers, so the snapshot is retaken whenever the element is idle.
    fn snapshot_rest(&self, state: &mut ElementState, handle: &SchedulerHandle, config: &HoverConfig) {
        let idle = !state.hovered
            && !Self::is_running(handle, state.leave)
            && !Self::is_running(handle, state.press);
        if !idle && state.rest.is_some() {
            return;
        }
        let Some(props) = self.stage.props(self.node) else {
            return;
        };
        state.target = config.enter_patch(props.y);
        state.rest = Some(state.target.capture(&props));
    }

    fn on_enter(&self, handle: &SchedulerHandle, config: &HoverConfig) {
        let mut state = self.state.borrow_mut();
        self.snapshot_rest(&mut state, handle, config);
        Self::cancel(handle, &mut state.leave);
        Self::cancel(handle, &mut state.enter);
        state.hovered = true;
        state.enter = handle.play(
            Tween::to(self.node, state.target, config.duration_ms).easing(config.easing),
        );
    }

    fn on_leave(&self, handle: &SchedulerHandle, config: &HoverConfig) {
        let mut state = self.state.borrow_mut();
        let Some(rest) = state.rest else {
            return;
        };
        Self::cancel(handle, &mut state.enter);
        Self::cancel(handle, &mut state.press);
        Self::cancel(handle, &mut state.leave);
        state.hovered = false;
        state.leave = handle.play(Tween::to(self.node, rest, config.duration_ms).easing(config.easing));
    }

    fn on_press(&self, handle: &SchedulerHandle, config: &HoverConfig) {
        let Some(press_scale) = config.press_scale else {
            return;
        };
        let mut state = self.state.borrow_mut();
        self.snapshot_rest(&mut state, handle, config);
        Self::cancel(handle, &mut state.press);
        // The pulse returns to the scale the element is settling toward
        let settle = if state.hovered {
            state.target.get(Prop::Scale)
        } else {
            state.rest.and_then(|rest| rest.get(Prop::Scale))
        }
        .unwrap_or(1.0);
        state.press = handle.play(
            Tween::from_to(
                self.node,
                PropPatch::new().scale(settle),
                PropPatch::new().scale(press_scale),
                config.press_duration_ms,
            )
            .yoyo(1),
        );
    }
}

/// Binds hover effects to elements
pub struct HoverInteraction;

impl HoverInteraction {
    /// Attach `config` to every element in `elements`
    ///
    /// Leaving restores the props an element had when the pointer first
    /// entered it. Elements missing from the stage are skipped.
    pub fn attach(
        elements: &[NodeId],
        config: HoverConfig,
        dispatcher: &EventDispatcher,
        scheduler: &AnimationScheduler,
    ) -> HoverDisposer {
        let stage = scheduler.stage();
        let handle = scheduler.handle();
        let mut listeners = Vec::new();
        let mut attached = SmallVec::new();

        for &node in elements {
            if !stage.contains(node) {
                continue;
            }
            let element = Rc::new(Element {
                node,
                stage: stage.clone(),
                state: RefCell::new(ElementState::default()),
            });

            let bindings: [(EventType, fn(&Element, &SchedulerHandle, &HoverConfig)); 4] = [
                (EventType::PointerEnter, Element::on_enter),
                (EventType::PointerLeave, Element::on_leave),
                (EventType::PointerDown, Element::on_press),
                (EventType::TouchStart, Element::on_press),
            ];
            for (event_type, action) in bindings {
                let element = Rc::clone(&element);
                let handle = handle.clone();
                listeners.push(dispatcher.on(node, event_type, move |_| {
                    action(&element, &handle, &config);
                }));
            }
            attached.push(node);
        }

        debug!(elements = attached.len(), listeners = listeners.len(), "hover attached");
        HoverDisposer {
            dispatcher: dispatcher.clone(),
            handle,
            listeners,
            elements: attached,
            disposed: false,
        }
    }
}

/// Owns the listeners created by [`HoverInteraction::attach`]
pub struct HoverDisposer {
    dispatcher: EventDispatcher,
    handle: SchedulerHandle,
    listeners: Vec<ListenerId>,
    elements: SmallVec<[NodeId; 4]>,
    disposed: bool,
}

impl HoverDisposer {
    /// Remove every listener and cancel in-flight tweens. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for id in self.listeners.drain(..) {
            self.dispatcher.remove(id);
        }
        for node in self.elements.drain(..) {
            self.handle.kill_tweens_of(node);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Elements the effects were attached to
    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }
}

impl Drop for HoverDisposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Rect, Stage, VisualProps};

    fn setup() -> (Stage, AnimationScheduler, EventDispatcher, NodeId) {
        let stage = Stage::new();
        let button = stage.insert("button", Rect::new(0.0, 0.0, 160.0, 48.0));
        let scheduler = AnimationScheduler::new(stage.clone());
        (stage, scheduler, EventDispatcher::new(), button)
    }

    #[test]
    fn test_enter_lifts_and_scales() {
        let (stage, scheduler, dispatcher, button) = setup();
        let _hover = HoverInteraction::attach(&[button], HoverConfig::button(), &dispatcher, &scheduler);

        dispatcher.dispatch(button, EventType::PointerEnter);
        scheduler.advance(200.0);

        let props = stage.props(button).unwrap();
        assert_eq!(props.y, -4.0);
        assert_eq!(props.scale, 1.03);
        assert_eq!(props.shadow, 1.0);
    }

    #[test]
    fn test_leave_restores_exactly() {
        let (stage, scheduler, dispatcher, button) = setup();
        stage.set_props(
            button,
            VisualProps {
                y: 2.0,
                shadow: 0.25,
                ..VisualProps::REST
            },
        );
        let before = stage.props(button).unwrap();
        let _hover = HoverInteraction::attach(&[button], HoverConfig::button(), &dispatcher, &scheduler);

        dispatcher.dispatch(button, EventType::PointerEnter);
        scheduler.advance(120.0);
        dispatcher.dispatch(button, EventType::PointerDown);
        scheduler.advance(30.0);
        dispatcher.dispatch(button, EventType::PointerLeave);
        scheduler.advance(200.0);

        assert_eq!(stage.props(button).unwrap(), before);
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn test_rest_follows_moves_after_attach() {
        let (stage, scheduler, dispatcher, card) = setup();
        stage.set_props(
            card,
            VisualProps {
                opacity: 0.0,
                y: 30.0,
                ..VisualProps::REST
            },
        );
        let _hover = HoverInteraction::attach(&[card], HoverConfig::project_card(), &dispatcher, &scheduler);

        // Revealed by some other animation once attached
        stage.set_props(card, VisualProps::REST);

        dispatcher.dispatch(card, EventType::PointerEnter);
        scheduler.advance(400.0);
        assert_eq!(stage.props(card).unwrap().y, -10.0);

        dispatcher.dispatch(card, EventType::PointerLeave);
        scheduler.advance(400.0);
        assert_eq!(stage.props(card).unwrap(), VisualProps::REST);

        stage.set_props(card, VisualProps { y: 5.0, ..VisualProps::REST });
        dispatcher.dispatch(card, EventType::PointerEnter);
        scheduler.advance(400.0);
        assert_eq!(stage.props(card).unwrap().y, -5.0);
    }

    #[test]
    fn test_enter_cancels_leave() {
        let (stage, scheduler, dispatcher, button) = setup();
        let _hover = HoverInteraction::attach(&[button], HoverConfig::button(), &dispatcher, &scheduler);

        dispatcher.dispatch(button, EventType::PointerEnter);
        scheduler.advance(200.0);
        dispatcher.dispatch(button, EventType::PointerLeave);
        scheduler.advance(50.0);
        dispatcher.dispatch(button, EventType::PointerEnter);
        assert_eq!(scheduler.tween_count(), 1);

        scheduler.advance(200.0);
        assert_eq!(stage.props(button).unwrap().scale, 1.03);
    }

    #[test]
    fn test_press_pulses_and_settles() {
        let (stage, scheduler, dispatcher, button) = setup();
        let _hover = HoverInteraction::attach(&[button], HoverConfig::button(), &dispatcher, &scheduler);

        dispatcher.dispatch(button, EventType::TouchStart);
        scheduler.advance(80.0);
        assert_eq!(stage.props(button).unwrap().scale, 0.97);
        scheduler.advance(80.0);
        assert_eq!(stage.props(button).unwrap().scale, 1.0);

        dispatcher.dispatch(button, EventType::PointerEnter);
        scheduler.advance(50.0);
        dispatcher.dispatch(button, EventType::PointerDown);
        scheduler.advance(500.0);
        assert_eq!(stage.props(button).unwrap().scale, 1.03);
    }

    #[test]
    fn test_card_preset_has_no_press() {
        let (stage, scheduler, dispatcher, card) = setup();
        let _hover = HoverInteraction::attach(&[card], HoverConfig::card(), &dispatcher, &scheduler);

        dispatcher.dispatch(card, EventType::PointerDown);
        assert_eq!(scheduler.tween_count(), 0);

        dispatcher.dispatch(card, EventType::PointerEnter);
        scheduler.advance(300.0);
        let props = stage.props(card).unwrap();
        assert_eq!(props.scale, 1.02);
        assert_eq!(props.y, 0.0);
    }

    #[test]
    fn test_dispose_removes_everything() {
        let (stage, scheduler, dispatcher, button) = setup();
        let other = stage.insert("other", Rect::ZERO);
        let mut hover = HoverInteraction::attach(
            &[button, other],
            HoverConfig::project_card(),
            &dispatcher,
            &scheduler,
        );
        assert_eq!(dispatcher.listener_count(), 8);

        dispatcher.dispatch(button, EventType::PointerEnter);
        dispatcher.dispatch(other, EventType::PointerEnter);
        assert_eq!(scheduler.tween_count(), 2);

        hover.dispose();
        hover.dispose();
        assert!(hover.is_disposed());
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(scheduler.tween_count(), 0);
        assert_eq!(dispatcher.dispatch(button, EventType::PointerEnter), 0);
    }

    #[test]
    fn test_drop_disposes() {
        let (stage, scheduler, dispatcher, button) = setup();
        let gone = stage.insert("gone", Rect::ZERO);
        stage.remove(gone);
        {
            let hover = HoverInteraction::attach(&[button, gone], HoverConfig::button(), &dispatcher, &scheduler);
            assert_eq!(hover.elements(), &[button]);
            assert_eq!(dispatcher.listener_count(), 4);
        }
        assert_eq!(dispatcher.listener_count(), 0);
    }
}
