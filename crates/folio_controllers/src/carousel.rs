//! Carousel controller
//!
//! Cycles through a fixed, non-empty list with wrap-around in both
//! directions. Autoplay is a repeating scheduler timer: [`Carousel::poll`]
//! turns its expirations into `next()` calls. Hovering a carousel pauses
//! autoplay; resuming starts a full interval again, and so does any index
//! change.

use folio_animation::{AnimatedTimer, AnimationScheduler};
use folio_core::{Store, SubscriptionHandle};
use tracing::debug;

use crate::error::CarouselError;

/// Autoplay parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarouselOptions {
    pub interval_ms: f32,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            interval_ms: 5000.0,
        }
    }
}

/// Which side the incoming slide enters from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    FromRight,
    FromLeft,
}

/// Index change broadcast to subscribers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarouselChange {
    pub from: usize,
    pub to: usize,
    pub direction: SlideDirection,
}

/// Observable carousel state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarouselState {
    pub current_index: usize,
    pub len: usize,
    pub is_auto_advancing: bool,
    /// Index change carried by the latest notification, if any
    pub last_change: Option<CarouselChange>,
}

/// Index cycling over a fixed list of items
pub struct Carousel<T> {
    items: Vec<T>,
    options: CarouselOptions,
    state: Store<CarouselState>,
    timer: Option<AnimatedTimer>,
}

impl<T> Carousel<T> {
    /// Create a carousel showing the first item
    pub fn new(items: Vec<T>, options: CarouselOptions) -> Result<Self, CarouselError> {
        if items.is_empty() {
            return Err(CarouselError::EmptyCollection);
        }
        let len = items.len();
        Ok(Self {
            items,
            options,
            state: Store::new(CarouselState {
                current_index: 0,
                len,
                is_auto_advancing: false,
                last_change: None,
            }),
            timer: None,
        })
    }

    /// Advance automatically every `interval_ms` of scheduler time
    pub fn with_autoplay(mut self, scheduler: &AnimationScheduler) -> Self {
        self.timer = Some(AnimatedTimer::repeating(
            scheduler.handle(),
            self.options.interval_ms,
        ));
        self.state.update(|s| {
            s.is_auto_advancing = true;
            s.last_change = None;
        });
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; carousels hold at least one item
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.state.read().current_index
    }

    pub fn current(&self) -> &T {
        &self.items[self.current_index()]
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.state.read().is_auto_advancing
    }

    pub fn state(&self) -> CarouselState {
        self.state.get()
    }

    pub fn next(&self) {
        let from = self.current_index();
        self.go(from, (from + 1) % self.len(), SlideDirection::FromRight);
    }

    pub fn prev(&self) {
        let from = self.current_index();
        let len = self.len();
        self.go(from, (from + len - 1) % len, SlideDirection::FromLeft);
    }

    /// Show item `index`; the index is unchanged on error
    pub fn jump_to(&self, index: usize) -> Result<(), CarouselError> {
        let len = self.len();
        if index >= len {
            return Err(CarouselError::OutOfRange {
                index: isize::try_from(index).unwrap_or(isize::MAX),
                len,
            });
        }
        let from = self.current_index();
        let direction = if index >= from {
            SlideDirection::FromRight
        } else {
            SlideDirection::FromLeft
        };
        self.go(from, index, direction);
        Ok(())
    }

    /// [`jump_to`](Self::jump_to) for signed callers; negative indices are out of range
    pub fn jump_to_signed(&self, index: isize) -> Result<(), CarouselError> {
        match usize::try_from(index) {
            Ok(index) => self.jump_to(index),
            Err(_) => Err(CarouselError::OutOfRange {
                index,
                len: self.len(),
            }),
        }
    }

    fn go(&self, from: usize, to: usize, direction: SlideDirection) {
        if from == to {
            return;
        }
        let change = CarouselChange {
            from,
            to,
            direction,
        };
        self.state.update(|s| {
            s.current_index = to;
            s.last_change = Some(change);
        });
        if let Some(timer) = &self.timer {
            timer.reset();
        }
        debug!(from, to, ?direction, "carousel index changed");
    }

    /// Suspend autoplay (pointer entered the carousel)
    pub fn pause(&self) {
        if let Some(timer) = &self.timer {
            timer.pause();
            self.state.update(|s| {
                s.is_auto_advancing = false;
                s.last_change = None;
            });
        }
    }

    /// Resume autoplay with a full interval
    pub fn resume(&self) {
        if let Some(timer) = &self.timer {
            timer.resume();
            self.state.update(|s| {
                s.is_auto_advancing = true;
                s.last_change = None;
            });
        }
    }

    /// Apply autoplay ticks fired since the last poll; returns how many
    pub fn poll(&self) -> usize {
        let Some(timer) = &self.timer else {
            return 0;
        };
        let fired = timer.take_fired() as usize;
        if !self.is_auto_advancing() {
            return 0;
        }
        for _ in 0..fired {
            self.next();
        }
        fired
    }

    /// Observe index changes
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&CarouselChange) + 'static,
    {
        self.state.subscribe(move |state| {
            if let Some(change) = &state.last_change {
                callback(change);
            }
        })
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.state.unsubscribe(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Stage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn slides(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("slide {i}")).collect()
    }

    #[test]
    fn test_empty_collection_rejected() {
        let result = Carousel::<String>::new(Vec::new(), CarouselOptions::default());
        assert_eq!(result.err(), Some(CarouselError::EmptyCollection));
    }

    #[test]
    fn test_next_prev_wrap() {
        let carousel = Carousel::new(slides(4), CarouselOptions::default()).unwrap();
        carousel.prev();
        assert_eq!(carousel.current_index(), 3);
        carousel.next();
        assert_eq!(carousel.current_index(), 0);

        for _ in 0..9 {
            carousel.next();
        }
        assert_eq!(carousel.current_index(), 1);
        assert_eq!(carousel.current(), "slide 1");
    }

    #[test]
    fn test_next_then_prev_returns_home() {
        for len in [1, 2, 3, 7] {
            let carousel = Carousel::new(slides(len), CarouselOptions::default()).unwrap();
            for start in 0..len {
                carousel.jump_to(start).unwrap();
                carousel.next();
                carousel.prev();
                assert_eq!(carousel.current_index(), start, "len {len}");
                carousel.prev();
                carousel.next();
                assert_eq!(carousel.current_index(), start, "len {len}");
            }
        }
    }

    #[test]
    fn test_single_item_stays_put() {
        let carousel = Carousel::new(slides(1), CarouselOptions::default()).unwrap();
        carousel.next();
        carousel.prev();
        assert_eq!(carousel.current_index(), 0);
        assert!(carousel.state().last_change.is_none());
    }

    #[test]
    fn test_jump_out_of_range_keeps_index() {
        let carousel = Carousel::new(slides(4), CarouselOptions::default()).unwrap();
        carousel.jump_to(2).unwrap();

        assert_eq!(
            carousel.jump_to(4),
            Err(CarouselError::OutOfRange { index: 4, len: 4 })
        );
        assert_eq!(
            carousel.jump_to_signed(-1),
            Err(CarouselError::OutOfRange { index: -1, len: 4 })
        );
        assert_eq!(carousel.current_index(), 2);

        carousel.jump_to_signed(3).unwrap();
        assert_eq!(carousel.current_index(), 3);
    }

    #[test]
    fn test_change_directions() {
        let carousel = Carousel::new(slides(4), CarouselOptions::default()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handle = carousel.subscribe(move |change| sink.borrow_mut().push(*change));

        carousel.next();
        carousel.prev();
        carousel.jump_to(3).unwrap();
        carousel.jump_to(1).unwrap();
        carousel.jump_to(1).unwrap();

        let directions: Vec<_> = seen.borrow().iter().map(|c| c.direction).collect();
        assert_eq!(
            directions,
            vec![
                SlideDirection::FromRight,
                SlideDirection::FromLeft,
                SlideDirection::FromRight,
                SlideDirection::FromLeft,
            ]
        );
        assert_eq!(seen.borrow()[2], CarouselChange { from: 0, to: 3, direction: SlideDirection::FromRight });

        assert!(carousel.unsubscribe(handle));
        carousel.next();
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn test_autoplay_advances_on_interval() {
        let scheduler = AnimationScheduler::new(Stage::new());
        let carousel = Carousel::new(slides(4), CarouselOptions::default())
            .unwrap()
            .with_autoplay(&scheduler);
        assert!(carousel.is_auto_advancing());

        scheduler.advance(4999.0);
        assert_eq!(carousel.poll(), 0);
        scheduler.advance(1.0);
        assert_eq!(carousel.poll(), 1);
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn test_manual_change_restarts_interval() {
        let scheduler = AnimationScheduler::new(Stage::new());
        let carousel = Carousel::new(slides(4), CarouselOptions::default())
            .unwrap()
            .with_autoplay(&scheduler);

        scheduler.advance(4000.0);
        carousel.next();
        scheduler.advance(4000.0);
        assert_eq!(carousel.poll(), 0);
        scheduler.advance(1000.0);
        assert_eq!(carousel.poll(), 1);
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn test_pause_and_resume_restart() {
        let scheduler = AnimationScheduler::new(Stage::new());
        let carousel = Carousel::new(slides(4), CarouselOptions { interval_ms: 1000.0 })
            .unwrap()
            .with_autoplay(&scheduler);

        scheduler.advance(900.0);
        carousel.pause();
        assert!(!carousel.is_auto_advancing());
        scheduler.advance(10_000.0);
        assert_eq!(carousel.poll(), 0);
        assert_eq!(carousel.current_index(), 0);

        carousel.resume();
        scheduler.advance(900.0);
        assert_eq!(carousel.poll(), 0);
        scheduler.advance(100.0);
        assert_eq!(carousel.poll(), 1);
    }

    #[test]
    fn test_drop_unregisters_timer() {
        let scheduler = AnimationScheduler::new(Stage::new());
        let carousel = Carousel::new(slides(2), CarouselOptions::default())
            .unwrap()
            .with_autoplay(&scheduler);
        assert_eq!(scheduler.timer_count(), 1);
        drop(carousel);
        assert_eq!(scheduler.timer_count(), 0);
    }
}
