//! Folio Site
//!
//! The page shell: seven stacked sections under a header/footer, each wired
//! to the interactive controllers in `folio_controllers`.
//!
//! # Example
//!
//! ```rust
//! use folio_animation::AnimationScheduler;
//! use folio_controllers::ScrollViewport;
//! use folio_core::{EventDispatcher, Stage};
//! use folio_site::{Page, SiteConfig};
//!
//! let scheduler = AnimationScheduler::new(Stage::new());
//! let dispatcher = EventDispatcher::new();
//! let mut page = Page::mount(SiteConfig::default(), &scheduler, &dispatcher).unwrap();
//!
//! let mut viewport = ScrollViewport::new(1280.0, 800.0);
//! viewport.scroll_to(page.navigate("portfolio").unwrap());
//!
//! scheduler.advance(16.0);
//! let report = page.update(&viewport, 16.0);
//! assert!(report.reveals > 0);
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod page;
pub mod sections;

pub use config::{CarouselConfig, ContactConfig, MailConfig, RevealConfig, SiteConfig};
pub use content::{
    projects, services, technologies, testimonials, Project, ProjectCategory, TechGroup,
    Technology, Testimonial, RESUME_PATH,
};
pub use error::{Result, SiteError};
pub use page::{FrameReport, HeroNodes, Page};
pub use sections::{
    footer_links, header_links, NavLink, Navigation, Section, SectionLayout, ANCHORS,
    HEADER_HEIGHT, PAGE_WIDTH,
};
