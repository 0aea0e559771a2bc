//! Section anchors, layout and navigation

use folio_core::{NodeId, Rect, Stage};
use tracing::debug;

/// Anchors of the seven page sections, top to bottom
pub const ANCHORS: [&str; 7] = [
    "hero",
    "about",
    "technologies",
    "services",
    "portfolio",
    "testimonials",
    "contact",
];

/// Height of the fixed header; scroll targets land below it
pub const HEADER_HEIGHT: f32 = 80.0;

pub const PAGE_WIDTH: f32 = 1280.0;

/// A mounted section and the stage nodes its controllers drive
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub anchor: String,
    pub container: NodeId,
    pub title: Option<NodeId>,
    pub subtitle: Option<NodeId>,
    /// Cards, grid cells or slides, in display order
    pub items: Vec<NodeId>,
}

/// Shape of a titled content section
#[derive(Clone, Copy, Debug)]
pub struct SectionLayout {
    pub anchor: &'static str,
    pub height: f32,
    pub item_label: &'static str,
    pub items: usize,
    pub columns: usize,
    pub item_height: f32,
}

impl SectionLayout {
    /// Mount the container, title, subtitle and item grid at `top`
    pub fn mount(&self, stage: &Stage, top: f32) -> Section {
        let container = stage.insert(self.anchor, Rect::new(0.0, top, PAGE_WIDTH, self.height));
        let title = stage.insert_child(container, "title", Rect::new(0.0, top + 80.0, PAGE_WIDTH, 60.0));
        let subtitle =
            stage.insert_child(container, "subtitle", Rect::new(0.0, top + 150.0, PAGE_WIDTH, 40.0));

        let columns = self.columns.max(1);
        let cell_width = PAGE_WIDTH / columns as f32;
        let items = (0..self.items)
            .filter_map(|i| {
                let row = (i / columns) as f32;
                let col = (i % columns) as f32;
                stage.insert_child(
                    container,
                    self.item_label,
                    Rect::new(
                        col * cell_width,
                        top + 220.0 + row * (self.item_height + 24.0),
                        cell_width - 24.0,
                        self.item_height,
                    ),
                )
            })
            .collect();

        Section {
            anchor: self.anchor.to_string(),
            container,
            title,
            subtitle,
            items,
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// One header or footer link
#[derive(Clone, Debug, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub anchor: String,
    /// Added to the section top when scrolling to it
    pub offset: f32,
}

impl NavLink {
    pub fn new(label: impl Into<String>, anchor: impl Into<String>, offset: f32) -> Self {
        Self {
            label: label.into(),
            anchor: anchor.into(),
            offset,
        }
    }
}

/// Header links: every section, landing below the header except Home
pub fn header_links() -> Vec<NavLink> {
    [
        ("Home", "hero"),
        ("About", "about"),
        ("Skills", "technologies"),
        ("Services", "services"),
        ("Portfolio", "portfolio"),
        ("Testimonials", "testimonials"),
        ("Contact", "contact"),
    ]
    .into_iter()
    .map(|(label, anchor)| {
        let offset = if anchor == "hero" { 0.0 } else { -HEADER_HEIGHT };
        NavLink::new(label, anchor, offset)
    })
    .collect()
}

/// Footer quick links: every section but testimonials
pub fn footer_links() -> Vec<NavLink> {
    [
        ("Home", "hero"),
        ("About", "about"),
        ("Skills", "technologies"),
        ("Services", "services"),
        ("Portfolio", "portfolio"),
        ("Contact", "contact"),
    ]
    .into_iter()
    .map(|(label, anchor)| NavLink::new(label, anchor, -HEADER_HEIGHT))
    .collect()
}

/// Header and footer link sets plus the mobile menu toggle
#[derive(Clone, Debug, PartialEq)]
pub struct Navigation {
    pub header: Vec<NavLink>,
    pub footer: Vec<NavLink>,
    menu_open: bool,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            header: header_links(),
            footer: footer_links(),
            menu_open: false,
        }
    }
}

impl Navigation {
    /// Every link, header first
    pub fn links(&self) -> impl Iterator<Item = &NavLink> {
        self.header.iter().chain(self.footer.iter())
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
        debug!(open = self.menu_open, "menu toggled");
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_covers_every_anchor() {
        let anchors: Vec<_> = header_links().into_iter().map(|l| l.anchor).collect();
        assert_eq!(anchors, ANCHORS);
    }

    #[test]
    fn test_footer_skips_testimonials() {
        let footer = footer_links();
        assert_eq!(footer.len(), 6);
        assert!(footer.iter().all(|l| l.anchor != "testimonials"));
        assert!(footer.iter().all(|l| l.offset == -80.0));
    }

    #[test]
    fn test_header_offsets() {
        let header = header_links();
        assert_eq!(header[0].offset, 0.0);
        assert!(header[1..].iter().all(|l| l.offset == -80.0));
    }

    #[test]
    fn test_menu_toggle() {
        let mut nav = Navigation::default();
        assert!(!nav.is_menu_open());
        nav.toggle_menu();
        assert!(nav.is_menu_open());
        nav.close_menu();
        assert!(!nav.is_menu_open());
        assert_eq!(nav.links().count(), 13);
    }

    #[test]
    fn test_layout_grid() {
        let stage = Stage::new();
        let layout = SectionLayout {
            anchor: "services",
            height: 900.0,
            item_label: "card",
            items: 6,
            columns: 3,
            item_height: 200.0,
        };
        let section = layout.mount(&stage, 1000.0);

        assert_eq!(section.items.len(), 6);
        assert!(section.title.is_some());
        let fourth = stage.bounds(section.items[3]).unwrap();
        assert_eq!(fourth.y(), 1000.0 + 220.0 + 224.0);
        assert_eq!(fourth.x(), 0.0);
        assert_eq!(stage.children(section.container).len(), 8);
    }
}
