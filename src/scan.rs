//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the content directory, validates the
//! records it finds, and produces a [`Manifest`] that the generate stage
//! consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── profile.toml                 # Hero banner (required)
//! ├── about.toml                   # Portrait and highlights (optional)
//! ├── about.md                     # About body, markdown (optional)
//! ├── skills.toml                  # [[technical]] + soft = [...]
//! ├── projects.toml                # [[projects]]
//! ├── experience.toml              # [[entries]]
//! ├── contact.toml                 # intro, [[channels]], [[social]], note
//! └── assets/                      # Copied verbatim into the output
//! ```
//!
//! ## Sections
//!
//! Home is always present. Every other section appears in the manifest (and
//! in navigation) only when its content file exists and is non-empty.
//!
//! ## Validation
//!
//! - `profile.toml` must exist
//! - Identity keys are unique within each list (project ids, skill names, ...)
//! - Skill levels are percentages (0-100)

use crate::config::{self, SiteConfig};
use crate::types::{
    About, Contact, ExperienceEntry, Keyed, NavItem, Profile, Project, SectionId, Skills,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Missing profile.toml in {0}")]
    MissingProfile(PathBuf),
    #[error("Duplicate {list} key: {key}")]
    DuplicateKey { list: &'static str, key: String },
    #[error("Skill {skill} has level {level}, expected 0-100")]
    InvalidLevel { skill: String, level: u8 },
}

/// Manifest output from the scan stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// One link per present section, in page order.
    pub navigation: Vec<NavItem>,
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<About>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Skills>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    pub config: SiteConfig,
}

impl Manifest {
    /// Sections that will be rendered, in page order.
    pub fn sections(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|s| self.has_section(*s))
            .collect()
    }

    pub fn has_section(&self, section: SectionId) -> bool {
        match section {
            SectionId::Home => true,
            SectionId::About => self.about.is_some(),
            SectionId::Skills => self.skills.is_some(),
            SectionId::Projects => !self.projects.is_empty(),
            SectionId::Experience => !self.experience.is_empty(),
            SectionId::Contact => self.contact.is_some(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectsFile {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ExperienceFile {
    #[serde(default)]
    entries: Vec<ExperienceEntry>,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let profile: Profile = read_toml(&root.join("profile.toml"))?
        .ok_or_else(|| ScanError::MissingProfile(root.to_path_buf()))?;

    let about = scan_about(root)?;

    let skills = read_toml::<Skills>(&root.join("skills.toml"))?
        .filter(|s| !s.technical.is_empty() || !s.soft.is_empty());
    if let Some(skills) = &skills {
        ensure_unique("skill", &skills.technical)?;
        ensure_unique("soft skill", &skills.soft)?;
        if let Some(bad) = skills.technical.iter().find(|s| s.level > 100) {
            return Err(ScanError::InvalidLevel {
                skill: bad.name.clone(),
                level: bad.level,
            });
        }
    }

    let projects = read_toml::<ProjectsFile>(&root.join("projects.toml"))?
        .map(|f| f.projects)
        .unwrap_or_default();
    ensure_unique("project", &projects)?;

    let experience = read_toml::<ExperienceFile>(&root.join("experience.toml"))?
        .map(|f| f.entries)
        .unwrap_or_default();
    ensure_unique("experience", &experience)?;

    let contact = read_toml::<Contact>(&root.join("contact.toml"))?;
    if let Some(contact) = &contact {
        ensure_unique("contact channel", &contact.channels)?;
        ensure_unique("social link", &contact.social)?;
    }

    let mut manifest = Manifest {
        navigation: Vec::new(),
        profile,
        about,
        skills,
        projects,
        experience,
        contact,
        config,
    };
    manifest.navigation = manifest
        .sections()
        .into_iter()
        .map(NavItem::for_section)
        .collect();
    Ok(manifest)
}

/// `about.toml` and `about.md` both feed the about section; either one is
/// enough for it to appear. A blank `about.md` counts as absent.
fn scan_about(root: &Path) -> Result<Option<About>, ScanError> {
    let meta = read_toml::<About>(&root.join("about.toml"))?;
    let md_path = root.join("about.md");
    let body = if md_path.exists() {
        Some(fs::read_to_string(&md_path)?.trim().to_string()).filter(|b| !b.is_empty())
    } else {
        None
    };

    let about = match (meta, body) {
        (None, None) => return Ok(None),
        (Some(mut about), Some(body)) => {
            about.body = body;
            about
        }
        (Some(about), None) => about,
        (None, Some(body)) => About {
            body,
            ..About::default()
        },
    };
    ensure_unique("highlight", &about.highlights)?;
    Ok(Some(about))
}

/// Parse a TOML file, or `None` when it does not exist.
fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ScanError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ScanError::Toml {
            path: path.to_path_buf(),
            source,
        })
}

fn ensure_unique<T: Keyed>(list: &'static str, items: &[T]) -> Result<(), ScanError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.key()) {
            return Err(ScanError::DuplicateKey {
                list,
                key: item.key().to_string(),
            });
        }
    }
    Ok(())
}
