//! Folio Interactive Controllers
//!
//! Stateful controllers layered on the animation scheduler:
//!
//! - **Reveals**: scroll-triggered entrance timelines, one-shot or scrubbed
//! - **Hover**: lift/scale/shadow effects with exact restore on leave
//! - **Carousel**: wrap-around index cycling with pausable autoplay
//! - **Filter**: category filtering with staggered exit/enter transitions
//! - **Contact Form**: validation, submission states and the mail relay seam
//!
//! Controllers never tick themselves. The host advances the
//! [`AnimationScheduler`](folio_animation::AnimationScheduler) and then polls
//! the controllers that depend on timers.

pub mod carousel;
pub mod error;
pub mod filter;
pub mod form;
pub mod hover;
pub mod relay;
pub mod reveal;
pub mod viewport;

pub use carousel::{Carousel, CarouselChange, CarouselOptions, CarouselState, SlideDirection};
pub use error::{CarouselError, RelayError, SubmitError, ValidationError};
pub use filter::{
    set_filter, visible_indices, Categorized, CategoryFilter, FilterAnimator, FilterController,
    FilterTransition, SETTLE_MS,
};
pub use form::{
    validate, ContactFields, ContactForm, ContactOptions, Field, FormState, FormStatus,
    Validation, DEFAULT_SUBJECT,
};
pub use hover::{HoverConfig, HoverDisposer, HoverInteraction};
pub use relay::{ContactPayload, DryRunRelay, MailRelay, MissingMailRelay, RelayResponse};
pub use reveal::{
    ObservationState, RevealController, RevealMode, RevealOptions, RevealSequence,
    RevealSubscription,
};
pub use viewport::{Intersection, ScrollViewport, ViewportObserver};
