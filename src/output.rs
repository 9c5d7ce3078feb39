//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Output is a content inventory: every entity (section, project, timeline
//! entry) is shown by its positional index and title, with the file it came
//! from as an indented `Source:` line.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Sections
//! 001 Home
//!     Source: profile.toml
//!     Alexa S. Torres, Full Stack Developer
//! 004 Projects (3)
//!     Source: projects.toml
//!     001 E-Commerce Platform
//!         React, Node.js, MongoDB, Stripe
//!
//! Config
//!     config.toml
//!     assets/
//!     Relay: ready
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Home → #home
//! 002 About → #about
//!
//! Assets
//!     assets/portrait.svg
//!
//! Generated index.html with 6 sections, 1 asset
//! ```
//!
//! ## Simulate
//!
//! ```text
//! Viewport 800px, page 7100px, 127 frames
//!      0  home revealed
//!    100  nav scrolled
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure apart from checking which source files exist.

use crate::config::RelayConfig;
use crate::contact::{Completion, FormStatus, SubmitRejected};
use crate::generate::Generated;
use crate::scan::Manifest;
use crate::simulate::{EventKind, Simulation};
use crate::types::SectionId;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional count.
///
/// ```text
/// 004 Projects (3)
/// 001 Home
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({})", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

/// Source files that exist for `section`.
fn section_sources(section: SectionId, source_root: &Path) -> Vec<&'static str> {
    let candidates: &[&'static str] = match section {
        SectionId::Home => &["profile.toml"],
        SectionId::About => &["about.toml", "about.md"],
        SectionId::Skills => &["skills.toml"],
        SectionId::Projects => &["projects.toml"],
        SectionId::Experience => &["experience.toml"],
        SectionId::Contact => &["contact.toml"],
    };
    candidates
        .iter()
        .copied()
        .filter(|f| source_root.join(f).exists())
        .collect()
}

fn relay_status(relay: &RelayConfig) -> String {
    if relay.is_configured() {
        return "ready".to_string();
    }
    let missing: Vec<&str> = [
        ("service_id", &relay.service_id),
        ("template_id", &relay.template_id),
        ("public_key", &relay.public_key),
        ("recipient", &relay.recipient),
    ]
    .into_iter()
    .filter(|(_, v)| v.is_empty())
    .map(|(k, _)| k)
    .collect();
    format!("not configured (missing {})", missing.join(", "))
}

// ============================================================================
// Scan
// ============================================================================

pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];

    for (i, section) in manifest.sections().into_iter().enumerate() {
        let index = i + 1;
        let header = match section {
            SectionId::Projects => entity_header(index, section.label(), Some(manifest.projects.len())),
            SectionId::Experience => {
                entity_header(index, section.label(), Some(manifest.experience.len()))
            }
            _ => entity_header(index, section.label(), None),
        };
        lines.push(header);

        let sources = section_sources(section, source_root);
        if !sources.is_empty() {
            lines.push(format!("{}Source: {}", indent(1), sources.join(", ")));
        }

        match section {
            SectionId::Home => {
                let p = &manifest.profile;
                lines.push(format!("{}{}, {}", indent(1), p.name, p.role));
            }
            SectionId::About => {
                if let Some(about) = &manifest.about {
                    let first = about.body.lines().next().unwrap_or("").trim();
                    if !first.is_empty() {
                        lines.push(format!("{}{}", indent(1), truncate_desc(first, 60)));
                    }
                    if !about.highlights.is_empty() {
                        lines.push(format!(
                            "{}{}",
                            indent(1),
                            plural(about.highlights.len(), "highlight", "highlights")
                        ));
                    }
                }
            }
            SectionId::Skills => {
                if let Some(skills) = &manifest.skills {
                    for (j, skill) in skills.technical.iter().enumerate() {
                        lines.push(format!(
                            "{}{} {} {}%",
                            indent(1),
                            format_index(j + 1),
                            skill.name,
                            skill.level
                        ));
                    }
                    if !skills.soft.is_empty() {
                        lines.push(format!("{}Soft: {}", indent(1), skills.soft.join(", ")));
                    }
                }
            }
            SectionId::Projects => {
                for (j, project) in manifest.projects.iter().enumerate() {
                    lines.push(format!("{}{} {}", indent(1), format_index(j + 1), project.title));
                    if !project.technologies.is_empty() {
                        lines.push(format!("{}{}", indent(2), project.technologies.join(", ")));
                    }
                }
            }
            SectionId::Experience => {
                for (j, entry) in manifest.experience.iter().enumerate() {
                    lines.push(format!("{}{} {}", indent(1), format_index(j + 1), entry.title));
                    lines.push(format!(
                        "{}{}: {}, {}",
                        indent(2),
                        entry.kind.label(),
                        entry.organisation,
                        entry.period
                    ));
                }
            }
            SectionId::Contact => {
                if let Some(contact) = &manifest.contact {
                    lines.push(format!(
                        "{}{}, {}",
                        indent(1),
                        plural(contact.channels.len(), "channel", "channels"),
                        plural(contact.social.len(), "social link", "social links")
                    ));
                }
            }
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join("assets").is_dir() {
        lines.push(format!("{}assets/", indent(1)));
    }
    lines.push(format!(
        "{}Relay: {}",
        indent(1),
        relay_status(&manifest.config.relay)
    ));

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(generated: &Generated) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, section) in generated.sections.iter().enumerate() {
        lines.push(format!(
            "{} {} → #{}",
            format_index(i + 1),
            section.label(),
            section.id()
        ));
    }

    if !generated.assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for asset in &generated.assets {
            lines.push(format!("{}{}", indent(1), asset));
        }
    }

    if generated.sections.contains(&SectionId::Contact) && !generated.relay_ready {
        lines.push(String::new());
        lines.push("Warning: contact form rendered without a configured relay".to_string());
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated index.html with {}, {}",
        plural(generated.sections.len(), "section", "sections"),
        plural(generated.assets.len(), "asset", "assets")
    ));
    lines
}

pub fn print_generate_output(generated: &Generated) {
    for line in format_generate_output(generated) {
        println!("{}", line);
    }
}

// ============================================================================
// Simulate
// ============================================================================

pub fn format_simulation(sim: &Simulation) -> Vec<String> {
    let mut lines = vec![format!(
        "Viewport {}px, page {}px, {}",
        sim.viewport_height,
        sim.page_height,
        plural(sim.frames, "frame", "frames")
    )];
    for event in &sim.events {
        let what = match event.kind {
            EventKind::Revealed(s) => format!("{} revealed", s),
            EventKind::Hidden(s) => format!("{} hidden", s),
            EventKind::NavScrolled(true) => "nav scrolled".to_string(),
            EventKind::NavScrolled(false) => "nav at top".to_string(),
        };
        lines.push(format!("{:>6}  {}", event.offset, what));
    }
    lines.push(String::new());
    lines.push("Final".to_string());
    for (section, variant) in &sim.final_variants {
        lines.push(format!("{}{}: {}", indent(1), section, variant));
    }
    lines
}

pub fn print_simulation(sim: &Simulation) {
    for line in format_simulation(sim) {
        println!("{}", line);
    }
}

// ============================================================================
// Send
// ============================================================================

pub fn format_send_outcome(
    recipient: &str,
    outcome: &Result<Completion, SubmitRejected>,
    status: &FormStatus,
) -> Vec<String> {
    let mut lines = vec!["Contact form".to_string()];
    lines.push(format!("{}To: {}", indent(1), recipient));
    match outcome {
        Err(rejected) => lines.push(format!("{}Rejected: {}", indent(1), rejected)),
        Ok(_) => {
            lines.push(format!("{}Status: {}", indent(1), status.label()));
            if let Some(message) = status.error_message() {
                lines.push(format!("{}{}", indent(2), message));
            }
        }
    }
    lines
}

pub fn print_send_outcome(
    recipient: &str,
    outcome: &Result<Completion, SubmitRejected>,
    status: &FormStatus,
) {
    for line in format_send_outcome(recipient, outcome, status) {
        println!("{}", line);
    }
}
