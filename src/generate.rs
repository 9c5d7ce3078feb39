//! HTML page generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and writes the
//! single-page portfolio.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html          # Every section, inline CSS and script
//! └── assets/             # Copied from content/assets/
//! ```
//!
//! ## Reveal Markup
//!
//! Each section root carries its trigger as data attributes:
//!
//! ```html
//! <section id="skills" data-variant="hidden" data-trigger="in-view"
//!          data-threshold="0.2" data-trigger-once="true">
//! ```
//!
//! and every animated child carries class `reveal`, its group name, and its
//! pose and timing from [`REVEAL_TABLE`](crate::reveal::REVEAL_TABLE) as CSS
//! custom properties. `static/site.js` runs one `IntersectionObserver` per
//! in-view section and flips `data-variant`; the stylesheet does the rest.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/site.js`: Visibility detector, nav shell, contact form
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, RelayConfig};
use crate::contact::{Field, SEND_FAILED_MESSAGE};
use crate::reveal::{self, Trigger, Variant};
use crate::scan::Manifest;
use crate::types::{
    About, Contact, ExperienceEntry, NavItem, Profile, Project, SectionId, Skills,
};
use chrono::Datelike;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to walk assets: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a generate run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub page: PathBuf,
    pub sections: Vec<SectionId>,
    /// Asset paths relative to the output directory.
    pub assets: Vec<String>,
    /// Whether the contact form can reach the relay.
    pub relay_ready: bool,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Shows every reveal child when scripting is off.
const NOSCRIPT_CSS: &str = ".reveal { opacity: 1 !important; transform: none !important; } \
.meter-fill { width: var(--level) !important; }";

pub fn generate(
    manifest_path: &Path,
    source_root: &Path,
    output_dir: &Path,
) -> Result<Generated, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;

    let color_css = config::generate_color_css(&manifest.config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    fs::create_dir_all(output_dir)?;

    let assets = copy_assets(&source_root.join("assets"), &output_dir.join("assets"))?;

    let year = chrono::Local::now().year();
    let page = render_page(&manifest, &css, year);
    let page_path = output_dir.join("index.html");
    fs::write(&page_path, page.into_string())?;
    log::debug!("Wrote {}", page_path.display());

    let relay_ready = manifest.config.relay.is_configured();
    if manifest.contact.is_some() && !relay_ready {
        log::warn!("Contact section rendered but [relay] is incomplete; the form will not send");
    }

    Ok(Generated {
        page: page_path,
        sections: manifest.sections(),
        assets,
        relay_ready,
    })
}

/// Copy the content `assets/` tree. Missing source is not an error.
fn copy_assets(src: &Path, dst: &Path) -> Result<Vec<String>, GenerateError> {
    let mut copied = Vec::new();
    if !src.is_dir() {
        return Ok(copied);
    }
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied.push(format!("assets/{}", rel.to_string_lossy().replace('\\', "/")));
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the whole page.
fn render_page(manifest: &Manifest, css: &str, year: i32) -> Markup {
    let site = &manifest.config.site;
    let author = if site.author.is_empty() {
        manifest.profile.name.as_str()
    } else {
        site.author.as_str()
    };

    html! {
        (DOCTYPE)
        html lang=(site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (site.title) }
                style { (PreEscaped(css)) }
                noscript { style { (PreEscaped(NOSCRIPT_CSS)) } }
            }
            body {
                (render_nav(&manifest.navigation, &site.title, &manifest.config.navigation))
                main {
                    (render_home(&manifest.profile))
                    @if let Some(about) = &manifest.about {
                        (render_about(about))
                    }
                    @if let Some(skills) = &manifest.skills {
                        (render_skills(skills))
                    }
                    @if !manifest.projects.is_empty() {
                        (render_projects(&manifest.projects))
                    }
                    @if !manifest.experience.is_empty() {
                        (render_experience(&manifest.experience))
                    }
                    @if let Some(contact) = &manifest.contact {
                        (render_contact(contact, &manifest.config.relay))
                    }
                }
                (render_footer(year, author))
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Fixed navigation bar: logo, desktop links, hamburger, mobile panel.
pub fn render_nav(
    items: &[NavItem],
    title: &str,
    nav: &config::NavigationConfig,
) -> Markup {
    html! {
        nav #site-nav .site-nav
            data-scroll-threshold=(nav.scroll_threshold.to_string())
            data-breakpoint=(nav.mobile_breakpoint)
        {
            a .logo href="#home" { (title) }
            ul .nav-links {
                @for item in items {
                    (render_nav_link(item))
                }
            }
            button .nav-toggle type="button" aria-label="Toggle menu"
                aria-expanded="false" aria-controls="mobile-menu"
            {
                span .hamburger-line {}
                span .hamburger-line {}
                span .hamburger-line {}
            }
            div #mobile-menu .nav-panel {
                ul {
                    @for item in items {
                        (render_nav_link(item))
                    }
                }
            }
        }
    }
}

fn render_nav_link(item: &NavItem) -> Markup {
    let is_current = item.section == SectionId::Home;
    html! {
        li {
            a .nav-link .active[is_current] href=(item.href) data-section=(item.section.id()) {
                (item.label)
            }
        }
    }
}

/// Opening attributes shared by every section root.
fn section_root(section: SectionId, class: &str, content: Markup) -> Markup {
    let settings = reveal::reveal_for(section);
    let (trigger, threshold, once) = match settings.trigger {
        Trigger::Mount => ("mount", None, None),
        Trigger::InView(options) => (
            "in-view",
            Some(options.threshold.to_string()),
            Some(options.trigger_once.to_string()),
        ),
    };
    html! {
        section id=(section.id()) class=(class)
            data-variant=(Variant::Hidden.as_str())
            data-trigger=(trigger)
            data-threshold=[threshold]
            data-trigger-once=[once]
        {
            (content)
        }
    }
}

/// Inline style for the `index`-th child of `group` in `section`.
fn reveal_style(section: SectionId, group: &str, index: usize) -> String {
    reveal::reveal_for(section)
        .group(group)
        .map(|g| g.style(index))
        .unwrap_or_default()
}

fn render_home(profile: &Profile) -> Markup {
    let s = SectionId::Home;
    let content = html! {
        div .hero-content {
            p .reveal .greeting data-group="intro" style=(reveal_style(s, "intro", 0)) {
                (profile.greeting)
            }
            h1 .reveal data-group="intro" style=(reveal_style(s, "intro", 1)) {
                (profile.name)
            }
            p .reveal .role data-group="intro" style=(reveal_style(s, "intro", 2)) {
                (profile.role)
            }
            p .reveal .summary data-group="intro" style=(reveal_style(s, "intro", 3)) {
                (profile.summary)
            }
            div .reveal .cta data-group="intro" style=(reveal_style(s, "intro", 4)) {
                a .btn .btn-primary href="#projects" { (profile.primary_cta) }
                a .btn .btn-secondary href="#contact" { (profile.secondary_cta) }
            }
        }
    };
    section_root(s, "section hero", content)
}

fn render_about(about: &About) -> Markup {
    let s = SectionId::About;
    let parser = Parser::new(&about.body);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);

    let content = html! {
        div .about-grid {
            div .about-story {
                h2 .reveal data-group="story" style=(reveal_style(s, "story", 0)) {
                    "About Me"
                }
                div .reveal .about-body data-group="story" style=(reveal_style(s, "story", 1)) {
                    (PreEscaped(body_html))
                }
                @if !about.highlights.is_empty() {
                    div .reveal .highlights data-group="story" style=(reveal_style(s, "story", 2)) {
                        @for highlight in &about.highlights {
                            div .highlight {
                                span .highlight-value { (highlight.value) }
                                span .highlight-label { (highlight.label) }
                            }
                        }
                    }
                }
            }
            @if let Some(portrait) = &about.portrait {
                div .reveal .about-portrait data-group="portrait" style=(reveal_style(s, "portrait", 0)) {
                    img src=(portrait) alt=(about.portrait_alt.as_deref().unwrap_or("Portrait"));
                }
            }
        }
    };
    section_root(s, "section about", content)
}

fn render_skills(skills: &Skills) -> Markup {
    let s = SectionId::Skills;
    let meter_style = reveal_style(s, "meters", 0);
    let content = html! {
        h2 .reveal data-group="heading" style=(reveal_style(s, "heading", 0)) {
            "Skills & Expertise"
        }
        @if !skills.technical.is_empty() {
            h3 { "Technical Skills" }
            div .skills-grid {
                @for (i, skill) in skills.technical.iter().enumerate() {
                    div .reveal .skill data-group="technical" style=(reveal_style(s, "technical", i)) {
                        div .skill-header {
                            @if let Some(icon) = &skill.icon {
                                span .skill-icon { (icon) }
                            }
                            span .skill-name { (skill.name) }
                            span .skill-level { (skill.level) "%" }
                        }
                        div .meter {
                            div .meter-fill data-group="meters"
                                style={ "--level: " (skill.level) "%; " (meter_style) } {}
                        }
                    }
                }
            }
        }
        @if !skills.soft.is_empty() {
            h3 { "Soft Skills" }
            div .soft-skills {
                @for (i, name) in skills.soft.iter().enumerate() {
                    span .reveal .chip data-group="soft" style=(reveal_style(s, "soft", i)) {
                        (name)
                    }
                }
            }
        }
    };
    section_root(s, "section skills", content)
}

fn render_projects(projects: &[Project]) -> Markup {
    let s = SectionId::Projects;
    let content = html! {
        h2 .reveal data-group="heading" style=(reveal_style(s, "heading", 0)) {
            "Featured Projects"
        }
        div .projects-grid {
            @for (i, project) in projects.iter().enumerate() {
                article .reveal .project-card id={ "project-" (project.id) }
                    data-group="cards" style=(reveal_style(s, "cards", i))
                {
                    @if let Some(icon) = &project.icon {
                        div .project-icon { (icon) }
                    }
                    h3 { (project.title) }
                    p { (project.description) }
                    @if !project.technologies.is_empty() {
                        ul .tech-list {
                            @for tech in &project.technologies {
                                li .chip { (tech) }
                            }
                        }
                    }
                    div .project-links {
                        @if let Some(demo) = &project.demo {
                            a href=(demo) target="_blank" rel="noopener noreferrer" { "Live Demo" }
                        }
                        @if let Some(code) = &project.code {
                            a href=(code) target="_blank" rel="noopener noreferrer" { "Code" }
                        }
                    }
                }
            }
        }
    };
    section_root(s, "section projects", content)
}

fn render_experience(entries: &[ExperienceEntry]) -> Markup {
    let s = SectionId::Experience;
    let content = html! {
        h2 .reveal data-group="heading" style=(reveal_style(s, "heading", 0)) {
            "Experience & Education"
        }
        div .timeline {
            @for (i, entry) in entries.iter().enumerate() {
                div .reveal .timeline-item id={ "experience-" (entry.id) }
                    data-kind=(entry.kind.label().to_lowercase())
                    data-group="timeline" style=(reveal_style(s, "timeline", i))
                {
                    span .timeline-kind { (entry.kind.label()) }
                    h3 { (entry.title) }
                    p .organisation { (entry.organisation) }
                    p .period { (entry.period) }
                    p { (entry.description) }
                    @if !entry.achievements.is_empty() {
                        ul .achievements {
                            @for achievement in &entry.achievements {
                                li { (achievement) }
                            }
                        }
                    }
                }
            }
        }
    };
    section_root(s, "section experience", content)
}

fn render_contact(contact: &Contact, relay: &RelayConfig) -> Markup {
    let s = SectionId::Contact;
    let social_offset = contact.channels.len();
    let content = html! {
        div .reveal data-group="heading" style=(reveal_style(s, "heading", 0)) {
            h2 { "Get In Touch" }
            @if let Some(intro) = &contact.intro {
                p .contact-intro { (intro) }
            }
        }
        div .contact-grid {
            div .contact-info {
                @for (i, channel) in contact.channels.iter().enumerate() {
                    div .reveal .channel data-group="channels" style=(reveal_style(s, "channels", i)) {
                        span .channel-label { (channel.label) }
                        @if let Some(link) = &channel.link {
                            a href=(link) { (channel.value) }
                        } @else {
                            span .channel-value { (channel.value) }
                        }
                    }
                }
                @if !contact.social.is_empty() {
                    div .reveal .social data-group="channels"
                        style=(reveal_style(s, "channels", social_offset))
                    {
                        @for link in &contact.social {
                            a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.label) }
                        }
                    }
                }
                @if let Some(note) = &contact.note {
                    p .reveal .contact-note data-group="note" style=(reveal_style(s, "note", 0)) {
                        (note)
                    }
                }
            }
            div .reveal .contact-form-wrap data-group="form" style=(reveal_style(s, "form", 0)) {
                (render_contact_form(relay))
            }
        }
    };
    section_root(s, "section contact", content)
}

/// The form and its confirmation panel. The access token never leaves the
/// CLI, so only publishable relay settings are written here.
fn render_contact_form(relay: &RelayConfig) -> Markup {
    html! {
        form #contact-form
            data-status="idle"
            data-relay=(if relay.is_configured() { "ready" } else { "disabled" })
            data-endpoint=(relay.endpoint)
            data-service=(relay.service_id)
            data-template=(relay.template_id)
            data-public-key=(relay.public_key)
            data-recipient=(relay.recipient)
            data-timeout-ms=(relay.timeout().as_millis().to_string())
            data-reset-ms=(relay.reset_delay().as_millis().to_string())
            data-error-message=(SEND_FAILED_MESSAGE)
        {
            @for field in Field::ALL {
                div .form-field {
                    label for={ "field-" (field.name()) } { (field.label()) }
                    @match field {
                        Field::Message => {
                            textarea id={ "field-" (field.name()) } name=(field.name()) rows="5" required {}
                        }
                        Field::Email => {
                            input id={ "field-" (field.name()) } name=(field.name()) type="email" required;
                        }
                        _ => {
                            input id={ "field-" (field.name()) } name=(field.name()) type="text" required;
                        }
                    }
                }
            }
            p .form-error role="alert" hidden {}
            button .btn .btn-primary type="submit" { "Send Message" }
        }
        div .form-sent role="status" hidden {
            h3 { "Message Sent!" }
            p { "Thank you for reaching out. I'll get back to you soon." }
        }
    }
}

fn render_footer(year: i32, author: &str) -> Markup {
    html! {
        footer .site-footer {
            p { "© " (year) " " (author) ". All rights reserved." }
            button .back-to-top type="button" aria-label="Back to top" { "↑" }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
