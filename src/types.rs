//! Shared content types.
//!
//! These are the static content collaborators: records read from the content
//! directory by [`scan`](crate::scan), serialized into the manifest, and
//! rendered by [`generate`](crate::generate). Every list record carries a
//! stable identity key ([`Keyed::key`]) that fixes its rendering order and is
//! checked for uniqueness at scan time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of page sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Home,
    About,
    Skills,
    Projects,
    Experience,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Experience,
        SectionId::Contact,
    ];

    /// DOM id and URL fragment of the section.
    pub fn id(self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::About => "about",
            SectionId::Skills => "skills",
            SectionId::Projects => "projects",
            SectionId::Experience => "experience",
            SectionId::Contact => "contact",
        }
    }

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::About => "About",
            SectionId::Skills => "Skills",
            SectionId::Projects => "Projects",
            SectionId::Experience => "Experience",
            SectionId::Contact => "Contact",
        }
    }

    pub fn from_id(id: &str) -> Option<SectionId> {
        SectionId::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A record with a stable identity key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Navigation link to a section anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub section: SectionId,
    pub label: String,
    pub href: String,
}

impl NavItem {
    pub fn for_section(section: SectionId) -> Self {
        Self {
            section,
            label: section.label().to_string(),
            href: format!("#{}", section.id()),
        }
    }
}

/// Hero banner content (`profile.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Small line above the name, e.g. "Welcome to my portfolio".
    #[serde(default = "default_greeting")]
    pub greeting: String,
    pub name: String,
    /// Role / subtitle line.
    pub role: String,
    pub summary: String,
    #[serde(default = "default_primary_cta")]
    pub primary_cta: String,
    #[serde(default = "default_secondary_cta")]
    pub secondary_cta: String,
}

fn default_greeting() -> String {
    "Welcome to my portfolio".to_string()
}

fn default_primary_cta() -> String {
    "View My Work".to_string()
}

fn default_secondary_cta() -> String {
    "Get In Touch".to_string()
}

/// About section content (`about.toml` + `about.md`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct About {
    /// Portrait image path relative to the site root.
    pub portrait: Option<String>,
    /// Alt text for the portrait.
    pub portrait_alt: Option<String>,
    pub highlights: Vec<Highlight>,
    /// Markdown body. `about.md` replaces any inline value during scan.
    pub body: String,
}

/// A headline figure such as "50+ Projects Completed".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Highlight {
    pub value: String,
    pub label: String,
}

impl Keyed for Highlight {
    fn key(&self) -> &str {
        &self.label
    }
}

/// Skills section content (`skills.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Skills {
    pub technical: Vec<TechnicalSkill>,
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechnicalSkill {
    pub name: String,
    /// Proficiency percentage, 0-100.
    pub level: u8,
    /// Short glyph shown beside the name.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Soft skills are bare labels; the label is the key.
impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

impl Keyed for TechnicalSkill {
    fn key(&self) -> &str {
        &self.name
    }
}

/// A portfolio project card (`projects.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Live demo URL.
    #[serde(default)]
    pub demo: Option<String>,
    /// Source code URL.
    #[serde(default)]
    pub code: Option<String>,
}

impl Keyed for Project {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceKind {
    Work,
    Education,
}

impl ExperienceKind {
    pub fn label(self) -> &'static str {
        match self {
            ExperienceKind::Work => "Work",
            ExperienceKind::Education => "Education",
        }
    }
}

/// A timeline entry (`experience.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperienceEntry {
    pub id: String,
    pub kind: ExperienceKind,
    pub title: String,
    pub organisation: String,
    pub period: String,
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl Keyed for ExperienceEntry {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Contact section content (`contact.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Contact {
    pub intro: Option<String>,
    pub channels: Vec<ContactChannel>,
    pub social: Vec<SocialLink>,
    /// Short note under the social links, e.g. typical response time.
    pub note: Option<String>,
}

/// A direct contact channel card (email, phone, location).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactChannel {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub link: Option<String>,
}

impl Keyed for ContactChannel {
    fn key(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

impl Keyed for SocialLink {
    fn key(&self) -> &str {
        &self.label
    }
}
