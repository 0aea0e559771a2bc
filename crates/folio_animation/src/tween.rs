//! Property tweens
//!
//! A [`Tween`] moves the properties named by its `from`/`to` patches on one
//! stage node over a fixed duration. Properties the `from` patch leaves out
//! start at whatever value the node holds when the tween first renders, so
//! `Tween::to` animates from the current state.

use crate::easing::Easing;
use crate::values::PropPatch;
use folio_core::{NodeId, VisualProps};

/// A timed animation of one node's visual properties
#[derive(Clone, Debug)]
pub struct Tween {
    target: NodeId,
    from: PropPatch,
    to: PropPatch,
    duration_ms: f32,
    delay_ms: f32,
    easing: Easing,
    repeat: u32,
    yoyo: bool,
    /// Full start/end props, resolved on first render
    resolved: Option<(VisualProps, VisualProps)>,
}

impl Tween {
    /// Animate from the node's current values to `to`
    pub fn to(target: NodeId, to: PropPatch, duration_ms: f32) -> Self {
        Self {
            target,
            from: PropPatch::new(),
            to,
            duration_ms: duration_ms.max(0.0),
            delay_ms: 0.0,
            easing: Easing::default(),
            repeat: 0,
            yoyo: false,
            resolved: None,
        }
    }

    /// Animate from explicit `from` values to `to`
    pub fn from_to(target: NodeId, from: PropPatch, to: PropPatch, duration_ms: f32) -> Self {
        Self {
            from,
            ..Self::to(target, to, duration_ms)
        }
    }

    /// Set delay before the tween starts
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Play `repeat` extra cycles, alternating direction
    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self.yoyo = true;
        self
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    /// Time spent animating, repeats included, delay excluded
    pub fn active_duration_ms(&self) -> f32 {
        self.duration_ms * (self.repeat + 1) as f32
    }

    /// Delay plus active duration
    pub fn total_duration_ms(&self) -> f32 {
        self.delay_ms + self.active_duration_ms()
    }

    /// Properties this tween writes
    pub fn mask(&self) -> PropPatch {
        self.from.merge(&self.to)
    }

    /// Forget the captured start values so the next render re-reads them
    pub fn invalidate(&mut self) {
        self.resolved = None;
    }

    /// Eased progress at `local_ms` after the delay
    pub fn eased_at(&self, local_ms: f32) -> f32 {
        let cycles = self.repeat + 1;
        if self.duration_ms <= 0.0 || local_ms >= self.active_duration_ms() {
            let ends_reversed = self.yoyo && cycles % 2 == 0;
            return if ends_reversed { 0.0 } else { 1.0 };
        }
        let local_ms = local_ms.max(0.0);
        let cycle = (local_ms / self.duration_ms).floor() as u32;
        let mut t = (local_ms - cycle as f32 * self.duration_ms) / self.duration_ms;
        if self.yoyo && cycle % 2 == 1 {
            t = 1.0 - t;
        }
        self.easing.apply(t)
    }

    /// Write the tween's state at `local_ms` (measured from the end of the
    /// delay) into `props`
    ///
    /// Before the tween starts, only tweens with explicit `from` values
    /// render (their starting state), so hidden-until-revealed targets stay
    /// hidden while they wait for their turn.
    pub fn render(&mut self, props: &mut VisualProps, local_ms: f32) {
        if local_ms < 0.0 && self.from.is_empty() {
            return;
        }
        let (start, end) = self.resolve(props);
        let t = if local_ms < 0.0 {
            0.0
        } else {
            self.eased_at(local_ms)
        };
        self.mask().blend_into(props, &start, &end, t);
    }

    fn resolve(&mut self, current: &VisualProps) -> (VisualProps, VisualProps) {
        if let Some(resolved) = self.resolved {
            return resolved;
        }
        let start = self.from.apply_to(current);
        let end = self.to.apply_to(&start);
        self.resolved = Some((start, end));
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Rect, Stage};

    fn node() -> NodeId {
        Stage::new().insert("n", Rect::ZERO)
    }

    #[test]
    fn test_to_starts_from_current() {
        let mut tween = Tween::to(node(), PropPatch::new().y(-10.0), 400.0).easing(Easing::Linear);
        let mut props = VisualProps {
            y: 10.0,
            ..VisualProps::REST
        };

        tween.render(&mut props, 200.0);
        assert!((props.y - 0.0).abs() < 1e-4);

        tween.render(&mut props, 400.0);
        assert!((props.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_from_to_renders_start_before_delay() {
        let mut tween = Tween::from_to(
            node(),
            PropPatch::new().opacity(0.0),
            PropPatch::new().opacity(1.0),
            300.0,
        );
        let mut props = VisualProps::REST;
        tween.render(&mut props, -50.0);
        assert_eq!(props.opacity, 0.0);
    }

    #[test]
    fn test_plain_to_does_not_render_before_start() {
        let mut tween = Tween::to(node(), PropPatch::new().scale(2.0), 300.0);
        let mut props = VisualProps::REST;
        tween.render(&mut props, -1.0);
        assert_eq!(props, VisualProps::REST);
    }

    #[test]
    fn test_yoyo_returns_to_start() {
        let mut tween = Tween::to(node(), PropPatch::new().scale(0.97), 80.0)
            .easing(Easing::Linear)
            .yoyo(1);
        assert_eq!(tween.total_duration_ms(), 160.0);

        let mut props = VisualProps::REST;
        tween.render(&mut props, 80.0);
        assert!((props.scale - 0.97).abs() < 1e-4);

        tween.render(&mut props, 160.0);
        assert!((props.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let mut tween = Tween::to(node(), PropPatch::new().opacity(0.0), 0.0);
        let mut props = VisualProps::REST;
        tween.render(&mut props, 0.0);
        assert_eq!(props.opacity, 0.0);
    }
}
