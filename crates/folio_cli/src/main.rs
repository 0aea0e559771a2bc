//! Folio CLI
//!
//! Drive the portfolio engine headlessly: validate the page, simulate
//! scrolling frames, and run the contact flow against a dry-run relay.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use folio_animation::AnimationScheduler;
use folio_controllers::{
    CategoryFilter, ContactForm, DryRunRelay, Field, MailRelay, MissingMailRelay, ScrollViewport,
    SubmitError,
};
use folio_core::{EventDispatcher, Stage};
use folio_site::{Page, ProjectCategory, SiteConfig, SiteError, PAGE_WIDTH};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Folio portfolio engine CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Site configuration file
    #[arg(short, long, global = true, default_value = "folio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount the page and validate its navigation
    Check,

    /// Scroll through the page frame by frame
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u32,

        /// Frame duration in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: f32,

        /// Pixels scrolled per frame
        #[arg(long, default_value = "12")]
        scroll: f32,

        /// Portfolio category to select before scrolling (all, full-stack, frontend, backend, AI)
        #[arg(long)]
        filter: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate and submit a contact message
    Contact {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        subject: String,

        #[arg(long, default_value = "")]
        message: String,

        /// Relay used for delivery
        #[arg(long, value_enum, default_value = "dry-run")]
        relay: RelayKind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RelayKind {
    /// Log the payload and report success
    DryRun,
    /// No relay; every submission fails
    #[value(name = "none")]
    Disabled,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Check => cmd_check(config),

        Commands::Simulate {
            frames,
            frame_ms,
            scroll,
            filter,
            json,
        } => cmd_simulate(config, frames, frame_ms, scroll, filter.as_deref(), json),

        Commands::Contact {
            name,
            email,
            subject,
            message,
            relay,
        } => cmd_contact(config, [name, email, subject, message], relay),
    }
}

/// A missing config file falls back to defaults; a broken one is an error
fn load_config(path: &Path) -> Result<SiteConfig> {
    match SiteConfig::load(path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            Ok(config)
        }
        Err(SiteError::ConfigRead { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            warn!("{} not found, using defaults", path.display());
            Ok(SiteConfig::default())
        }
        Err(err) => {
            Err(err).with_context(|| format!("Failed to load config {}", path.display()))
        }
    }
}

fn mount(config: SiteConfig) -> Result<(AnimationScheduler, EventDispatcher, Page)> {
    let scheduler = AnimationScheduler::new(Stage::new());
    let dispatcher = EventDispatcher::new();
    let page = Page::mount(config, &scheduler, &dispatcher).context("Failed to mount page")?;
    Ok((scheduler, dispatcher, page))
}

fn cmd_check(config: SiteConfig) -> Result<()> {
    let (_scheduler, _dispatcher, page) = mount(config)?;
    page.validate_navigation()?;

    println!("Sections:");
    for section in page.sections() {
        let Some(bounds) = page.stage().bounds(section.container) else {
            continue;
        };
        println!(
            "  #{:<14} top {:>6.0}  height {:>5.0}  items {}",
            section.anchor,
            bounds.top(),
            bounds.height(),
            section.items.len()
        );
    }

    let nav = page.navigation();
    for (heading, links) in [("Header", &nav.header), ("Footer", &nav.footer)] {
        println!("{heading}:");
        for link in links {
            let target = page.scroll_target(link)?;
            println!("  {:<14} -> #{:<14} scroll {:>6.0}", link.label, link.anchor, target);
        }
    }

    info!("Navigation OK ({} sections)", page.sections().len());
    Ok(())
}

fn cmd_simulate(
    config: SiteConfig,
    frames: u32,
    frame_ms: f32,
    scroll: f32,
    filter: Option<&str>,
    json: bool,
) -> Result<()> {
    anyhow::ensure!(frame_ms > 0.0, "--frame-ms must be positive");
    let (scheduler, _dispatcher, mut page) = mount(config)?;

    if let Some(filter) = filter {
        let filter = if filter.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            let category: ProjectCategory = filter.parse().map_err(anyhow::Error::msg)?;
            CategoryFilter::Only(category)
        };
        if let Some(transition) = page.filter_portfolio(filter) {
            info!(
                "Portfolio filter {:?} -> {:?}: {} cards out, {} in",
                transition.from,
                transition.to,
                transition.exiting.len(),
                transition.entering.len()
            );
        }
    }

    let mut viewport = ScrollViewport::new(PAGE_WIDTH, 800.0);
    let max_scroll = (page.height() - viewport.height).max(0.0);
    let mut reveals = 0;
    let mut slides = 0;

    for frame in 0..frames {
        scheduler.advance(frame_ms);
        let report = page.update(&viewport, frame_ms);
        if report.reveals > 0 {
            debug!(frame, scroll_y = viewport.scroll_y, reveals = report.reveals, "reveals fired");
        }
        reveals += report.reveals;
        slides += report.slides;
        viewport.scroll_to((viewport.scroll_y + scroll).min(max_scroll));
    }

    let carousel = page.testimonials();
    let elapsed_ms = frames as f32 * frame_ms;
    if json {
        let summary = serde_json::json!({
            "frames": frames,
            "elapsed_ms": elapsed_ms,
            "scroll_y": viewport.scroll_y,
            "reveals": reveals,
            "slides": slides,
            "testimonial": carousel.current().name,
            "portfolio_visible": page.portfolio().visible_indices(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Simulated {frames} frames ({elapsed_ms:.0} ms)");
        println!("  scrolled to  {:.0} / {:.0}", viewport.scroll_y, max_scroll);
        println!("  reveals      {reveals}");
        println!("  slides       {slides}");
        println!(
            "  testimonial  {} ({}/{})",
            carousel.current().name,
            carousel.current_index() + 1,
            carousel.len()
        );
    }
    Ok(())
}

fn cmd_contact(config: SiteConfig, values: [String; 4], relay: RelayKind) -> Result<()> {
    let scheduler = AnimationScheduler::new(Stage::new());
    let form = ContactForm::new(scheduler.handle(), config.contact_options());
    for (field, value) in Field::ALL.into_iter().zip(values) {
        form.edit(field, value);
    }

    let relay: Box<dyn MailRelay> = match relay {
        RelayKind::DryRun => Box::new(DryRunRelay),
        RelayKind::Disabled => Box::new(MissingMailRelay),
    };

    match pollster::block_on(form.submit(relay.as_ref())) {
        Ok(response) => {
            println!("Message sent ({} {})", response.status, response.text);
            Ok(())
        }
        Err(SubmitError::Invalid(validation)) => {
            for (field, error) in &validation.errors {
                eprintln!("  {}: {}", field.as_str(), error);
            }
            anyhow::bail!("Contact form has {} invalid field(s)", validation.errors.len())
        }
        Err(err) => Err(err).context("Failed to send contact message"),
    }
}
