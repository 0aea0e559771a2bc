//! Folio Core
//!
//! Foundational primitives shared by the folio animation engine and its
//! interactive controllers:
//!
//! - **Geometry**: points, sizes and rects in page coordinates
//! - **Stage**: presentation nodes and their animatable [`VisualProps`]
//! - **Events**: pointer listeners with explicit, removable registrations
//! - **Store**: observable controller state with unsubscribable callbacks
//!
//! # Example
//!
//! ```rust
//! use folio_core::{EventDispatcher, EventType, Rect, Stage};
//!
//! let stage = Stage::new();
//! let button = stage.insert("button", Rect::new(0.0, 0.0, 120.0, 40.0));
//!
//! let dispatcher = EventDispatcher::new();
//! let id = dispatcher.on(button, EventType::PointerEnter, |ctx| {
//!     println!("hovered {:?}", ctx.node);
//! });
//!
//! dispatcher.dispatch(button, EventType::PointerEnter);
//! dispatcher.remove(id);
//! ```

pub mod events;
pub mod geometry;
pub mod stage;
pub mod store;

pub use events::{EventCallback, EventContext, EventDispatcher, EventType, ListenerId};
pub use geometry::{Point, Rect, Size};
pub use stage::{NodeId, Stage, StageNode, VisualProps};
pub use store::{Store, SubscriptionHandle};
