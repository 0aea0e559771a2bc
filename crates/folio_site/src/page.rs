//! The portfolio page
//!
//! [`Page::mount`] lays the seven sections out on the stage top to bottom and
//! wires each one to its controllers:
//!
//! | section | controllers |
//! |---|---|
//! | hero | intro timeline, portrait tween, button hover |
//! | about | title scrub, card reveal, card hover |
//! | technologies | title scrub, card reveal, card hover, group filter |
//! | services | title scrub, card reveal, card hover |
//! | portfolio | title scrub, card reveal, project hover, category filter |
//! | testimonials | title scrub, autoplay carousel paused on hover |
//! | contact | title scrub, field reveal, submit hover, contact form |
//!
//! Controllers share nothing but the stage and the scheduler. The host
//! advances the scheduler, then calls [`Page::update`].

use std::rc::Rc;

use folio_animation::{
    AnimatedTimeline, AnimatedTween, AnimationScheduler, Easing, Position, PropPatch,
    SchedulerHandle, Stagger, Timeline, Tween,
};
use folio_controllers::{
    Carousel, CategoryFilter, ContactForm, FilterAnimator, FilterController, FilterTransition,
    HoverConfig, HoverDisposer, HoverInteraction, RevealController, RevealMode, RevealOptions,
    RevealSequence, ViewportObserver,
};
use folio_core::{EventDispatcher, EventType, ListenerId, NodeId, Rect, Stage};
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::content::{
    projects, services, technologies, testimonials, Project, ProjectCategory, TechGroup,
    Technology, Testimonial,
};
use crate::error::{Result, SiteError};
use crate::sections::{NavLink, Navigation, Section, SectionLayout, PAGE_WIDTH};

const HERO_HEIGHT: f32 = 900.0;
const HERO_TECH_ICONS: usize = 6;

/// Nodes animated by the hero intro
#[derive(Clone, Debug, PartialEq)]
pub struct HeroNodes {
    pub container: NodeId,
    pub hello: NodeId,
    pub name: NodeId,
    pub title: NodeId,
    pub description: NodeId,
    pub button_row: NodeId,
    pub buttons: Vec<NodeId>,
    pub tech_stack: NodeId,
    pub tech_icons: Vec<NodeId>,
    pub portrait: NodeId,
}

impl HeroNodes {
    fn mount(stage: &Stage) -> Option<Self> {
        let container = stage.insert("hero", Rect::new(0.0, 0.0, PAGE_WIDTH, HERO_HEIGHT));
        let line = |label: &str, y: f32, h: f32| {
            stage.insert_child(container, label, Rect::new(80.0, y, 560.0, h))
        };

        let hello = line("hello", 160.0, 32.0)?;
        let name = line("name", 200.0, 64.0)?;
        let title = line("title", 272.0, 40.0)?;
        let description = line("description", 320.0, 96.0)?;
        let button_row = line("buttons", 440.0, 48.0)?;
        let buttons = ["download-cv", "contact-me"]
            .iter()
            .enumerate()
            .filter_map(|(i, label)| {
                let x = 80.0 + i as f32 * 200.0;
                stage.insert_child(button_row, *label, Rect::new(x, 440.0, 180.0, 48.0))
            })
            .collect();
        let tech_stack = line("tech-stack", 520.0, 32.0)?;
        let tech_icons = (0..HERO_TECH_ICONS)
            .filter_map(|i| {
                let x = 80.0 + i as f32 * 64.0;
                stage.insert_child(container, "tech-icon", Rect::new(x, 560.0, 48.0, 48.0))
            })
            .collect();
        let portrait =
            stage.insert_child(container, "portrait", Rect::new(760.0, 160.0, 420.0, 420.0))?;

        Some(Self {
            container,
            hello,
            name,
            title,
            description,
            button_row,
            buttons,
            tech_stack,
            tech_icons,
            portrait,
        })
    }

    /// Intro: each line drops in overlapping the previous by 300ms, then
    /// the tech icons follow 100ms apart
    pub fn intro_timeline(&self) -> Timeline {
        let hidden = PropPatch::new().opacity(0.0).y(-50.0);
        let shown = PropPatch::new().opacity(1.0).y(0.0);
        let drop_in = |node: NodeId, duration: f32| {
            Tween::from_to(node, hidden, shown, duration).easing(Easing::EaseOutQuad)
        };

        let mut timeline = Timeline::new();
        timeline.add(drop_in(self.hello, 600.0), Position::Sequential);
        timeline.add(drop_in(self.name, 600.0), Position::Offset(-300.0));
        timeline.add(drop_in(self.title, 600.0), Position::Offset(-300.0));
        timeline.add(drop_in(self.description, 700.0), Position::Offset(-300.0));
        timeline.add(drop_in(self.button_row, 700.0), Position::Offset(-300.0));
        timeline.add(drop_in(self.tech_stack, 700.0), Position::Offset(-300.0));
        timeline.stagger(
            &self.tech_icons,
            Stagger::each(100.0),
            Position::Offset(-300.0),
            |icon| drop_in(icon, 900.0),
        );
        timeline
    }

    /// Portrait grows in from a dot after a short delay
    pub fn portrait_tween(&self) -> Tween {
        Tween::from_to(
            self.portrait,
            PropPatch::new().opacity(0.0).scale(0.01),
            PropPatch::new().opacity(1.0).scale(1.0),
            2500.0,
        )
        .easing(Easing::EaseOutCubic)
        .delay(500.0)
    }
}

/// What one [`Page::update`] did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Reveals that fired this frame
    pub reveals: usize,
    /// Carousel autoplay steps applied
    pub slides: usize,
    /// Contact status banner expired
    pub status_reset: bool,
}

/// The mounted portfolio page
pub struct Page {
    config: SiteConfig,
    stage: Stage,
    handle: SchedulerHandle,
    dispatcher: EventDispatcher,
    sections: Vec<Section>,
    navigation: Navigation,
    hero: HeroNodes,
    hero_intro: AnimatedTimeline,
    portrait_intro: AnimatedTween,
    reveals: RevealController,
    hovers: Vec<HoverDisposer>,
    skills: FilterController<Technology, TechGroup>,
    skills_animator: FilterAnimator,
    portfolio: FilterController<Project, ProjectCategory>,
    portfolio_animator: FilterAnimator,
    testimonials: Rc<Carousel<Testimonial>>,
    carousel_listeners: Vec<ListenerId>,
    contact: ContactForm,
}

impl Page {
    /// Mount every section, start the hero intro and check navigation
    pub fn mount(
        config: SiteConfig,
        scheduler: &AnimationScheduler,
        dispatcher: &EventDispatcher,
    ) -> Result<Self> {
        let stage = scheduler.stage();
        let handle = scheduler.handle();

        let hero = HeroNodes::mount(&stage)
            .ok_or_else(|| SiteError::Mount("hero".to_string()))?;
        let hero_intro = AnimatedTimeline::new(handle.clone(), hero.intro_timeline());
        hero_intro.start();
        let portrait_intro = AnimatedTween::new(handle.clone(), hero.portrait_tween());

        let mut sections = vec![Section {
            anchor: "hero".to_string(),
            container: hero.container,
            title: Some(hero.name),
            subtitle: Some(hero.title),
            items: hero.tech_icons.clone(),
        }];

        let skills = technologies();
        let work = projects();
        let voices = testimonials();
        let layouts = [
            SectionLayout {
                anchor: "about",
                height: 900.0,
                item_label: "card",
                items: 3,
                columns: 3,
                item_height: 320.0,
            },
            SectionLayout {
                anchor: "technologies",
                height: 1100.0,
                item_label: "tech",
                items: skills.len(),
                columns: 5,
                item_height: 160.0,
            },
            SectionLayout {
                anchor: "services",
                height: 900.0,
                item_label: "service",
                items: services().len(),
                columns: 3,
                item_height: 240.0,
            },
            SectionLayout {
                anchor: "portfolio",
                height: 1100.0,
                item_label: "project",
                items: work.len(),
                columns: 3,
                item_height: 360.0,
            },
            SectionLayout {
                anchor: "testimonials",
                height: 700.0,
                item_label: "slide",
                items: voices.len(),
                columns: voices.len(),
                item_height: 300.0,
            },
            SectionLayout {
                anchor: "contact",
                height: 900.0,
                item_label: "field",
                items: 5,
                columns: 1,
                item_height: 60.0,
            },
        ];
        let mut top = HERO_HEIGHT;
        for layout in layouts {
            sections.push(layout.mount(&stage, top));
            top += layout.height;
        }

        let testimonials = Rc::new(
            Carousel::new(voices, config.carousel_options())?.with_autoplay(scheduler),
        );

        let mut page = Self {
            contact: ContactForm::new(handle.clone(), config.contact_options()),
            config,
            stage,
            handle: handle.clone(),
            dispatcher: dispatcher.clone(),
            sections,
            navigation: Navigation::default(),
            hero,
            hero_intro,
            portrait_intro,
            reveals: RevealController::new(handle.clone(), scheduler.stage()),
            hovers: Vec::new(),
            skills: FilterController::new(skills),
            skills_animator: FilterAnimator::new(handle.clone()),
            portfolio: FilterController::new(work),
            portfolio_animator: FilterAnimator::new(handle),
            testimonials,
            carousel_listeners: Vec::new(),
        };
        page.wire_reveals();
        page.wire_hovers(scheduler);
        page.wire_carousel();
        page.validate_navigation()?;

        info!(sections = page.sections.len(), "page mounted");
        Ok(page)
    }

    fn wire_reveals(&mut self) {
        let content = self.config.reveal_options();
        let scrub = RevealOptions {
            mode: RevealMode::scrub(),
            ..content
        };

        for section in self.sections.iter().skip(1) {
            if let Some(title) = section.title {
                self.reveals.observe(
                    section.container,
                    scrub,
                    RevealSequence::title(title, section.subtitle),
                );
            }
            // Slides are driven by the carousel
            if section.anchor != "testimonials" && !section.items.is_empty() {
                self.reveals.observe(
                    section.container,
                    content,
                    RevealSequence::staggered(section.items.clone(), 100.0),
                );
            }
        }
    }

    fn wire_hovers(&mut self, scheduler: &AnimationScheduler) {
        let bind = |elements: &[NodeId], config: HoverConfig| {
            HoverInteraction::attach(elements, config, &self.dispatcher, scheduler)
        };

        let mut hovers = vec![bind(&self.hero.buttons, HoverConfig::button())];
        for section in &self.sections[1..] {
            let config = match section.anchor.as_str() {
                "about" | "technologies" | "services" => HoverConfig::card(),
                "portfolio" => HoverConfig::project_card(),
                "contact" => HoverConfig::button(),
                _ => continue,
            };
            let elements = if section.anchor == "contact" {
                // Only the submit button
                section.items.last().copied().into_iter().collect()
            } else {
                section.items.clone()
            };
            hovers.push(bind(&elements, config));
        }
        self.hovers = hovers;
    }

    fn wire_carousel(&mut self) {
        let Some(container) = self.section("testimonials").map(|s| s.container) else {
            return;
        };
        let paused = Rc::clone(&self.testimonials);
        let resumed = Rc::clone(&self.testimonials);
        self.carousel_listeners = vec![
            self.dispatcher
                .on(container, EventType::PointerEnter, move |_| paused.pause()),
            self.dispatcher
                .on(container, EventType::PointerLeave, move |_| resumed.resume()),
        ];
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section mounted under `anchor`
    pub fn section(&self, anchor: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.anchor == anchor)
    }

    pub fn hero(&self) -> &HeroNodes {
        &self.hero
    }

    pub fn is_intro_playing(&self) -> bool {
        self.hero_intro.is_playing() || self.portrait_intro.is_playing()
    }

    pub fn reveals(&self) -> &RevealController {
        &self.reveals
    }

    pub fn skills(&self) -> &FilterController<Technology, TechGroup> {
        &self.skills
    }

    pub fn portfolio(&self) -> &FilterController<Project, ProjectCategory> {
        &self.portfolio
    }

    pub fn testimonials(&self) -> &Carousel<Testimonial> {
        &self.testimonials
    }

    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut Navigation {
        &mut self.navigation
    }

    /// Bottom edge of the last section
    pub fn height(&self) -> f32 {
        self.sections
            .iter()
            .filter_map(|s| self.stage.bounds(s.container))
            .map(|b| b.bottom())
            .fold(0.0, f32::max)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Append another section below the current last one
    pub fn append_section(&mut self, layout: SectionLayout) -> &Section {
        let top = self.height();
        self.sections.push(layout.mount(&self.stage, top));
        debug!(anchor = layout.anchor, top, "section appended");
        &self.sections[self.sections.len() - 1]
    }

    /// Every header and footer entry must name exactly one mounted section
    pub fn validate_navigation(&self) -> Result<()> {
        for link in self.navigation.links() {
            match self.sections.iter().filter(|s| s.anchor == link.anchor).count() {
                0 => {
                    return Err(SiteError::UnknownAnchor {
                        label: link.label.clone(),
                        anchor: link.anchor.clone(),
                    })
                }
                1 => {}
                _ => return Err(SiteError::DuplicateSection(link.anchor.clone())),
            }
        }
        Ok(())
    }

    /// Scroll position that brings `link`'s section under the header
    pub fn scroll_target(&self, link: &NavLink) -> Result<f32> {
        let bounds = self
            .section(&link.anchor)
            .and_then(|s| self.stage.bounds(s.container))
            .ok_or_else(|| SiteError::UnknownAnchor {
                label: link.label.clone(),
                anchor: link.anchor.clone(),
            })?;
        Ok((bounds.top() + link.offset).max(0.0))
    }

    /// Follow the header link for `anchor` and close the mobile menu
    pub fn navigate(&mut self, anchor: &str) -> Result<f32> {
        let link = self
            .navigation
            .links()
            .find(|l| l.anchor == anchor)
            .cloned()
            .ok_or_else(|| SiteError::UnknownAnchor {
                label: anchor.to_string(),
                anchor: anchor.to_string(),
            })?;
        let target = self.scroll_target(&link)?;
        self.navigation.close_menu();
        debug!(anchor, target, "navigate");
        Ok(target)
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Poll every controller after the scheduler advanced by `dt_ms`
    pub fn update(&mut self, viewport: &dyn ViewportObserver, dt_ms: f32) -> FrameReport {
        FrameReport {
            reveals: self.reveals.update(viewport, dt_ms),
            slides: self.testimonials.poll(),
            status_reset: self.contact.poll(),
        }
    }

    /// Switch the technologies tab
    pub fn filter_skills(
        &mut self,
        filter: CategoryFilter<TechGroup>,
    ) -> Option<FilterTransition<TechGroup>> {
        let transition = self.skills.on_filter_change(filter)?;
        if let Some(section) = self.sections.iter().find(|s| s.anchor == "technologies") {
            self.skills_animator.play(&transition, &section.items);
        }
        Some(transition)
    }

    /// Switch the portfolio category
    pub fn filter_portfolio(
        &mut self,
        filter: CategoryFilter<ProjectCategory>,
    ) -> Option<FilterTransition<ProjectCategory>> {
        let transition = self.portfolio.on_filter_change(filter)?;
        if let Some(section) = self.sections.iter().find(|s| s.anchor == "portfolio") {
            self.portfolio_animator.play(&transition, &section.items);
        }
        Some(transition)
    }

    /// Whether a scheduler is still attached
    pub fn is_live(&self) -> bool {
        self.handle.is_alive()
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        for id in self.carousel_listeners.drain(..) {
            self.dispatcher.remove(id);
        }
    }
}
