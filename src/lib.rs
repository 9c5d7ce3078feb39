//! # Folio
//!
//! A single-page portfolio generator. Content lives in a directory of small
//! TOML and markdown files; the output is one `index.html` whose sections
//! reveal themselves with staged animations as they scroll into view, plus a
//! contact form that relays messages through an email API.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (files → validated records)
//! 2. Generate  manifest  →  dist/            (single HTML page + assets)
//! ```
//!
//! The manifest is human-readable JSON you can inspect between stages.
//!
//! The page's runtime behavior (visibility detection, staged reveal, nav
//! shell, contact form) is modeled in Rust as plain state machines. The
//! generated script mirrors them in the browser; the Rust side drives the
//! `simulate` and `send` commands and the tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads the content directory and produces the manifest |
//! | [`generate`] | Stage 2: renders the page from the manifest using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Content records shared between stages (`Profile`, `Project`, ...) |
//! | [`visibility`] | `InView` detector over an observation engine, plus a geometric engine |
//! | [`reveal`] | Per-section, per-group reveal timing table |
//! | [`nav`] | Navigation shell state: scrolled style, active link, mobile panel |
//! | [`contact`] | Contact form state machine: idle, sending, sent, error |
//! | [`relay`] | Email relay trait and EmailJS REST client |
//! | [`simulate`] | Scroll simulation over the laid-out sections |
//! | [`output`] | CLI output formatting |
//! | [`logger`] | Stderr logger behind the `log` facade |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a build error, template variables are Rust expressions, and all
//! interpolation is auto-escaped.
//!
//! ## Reveal Timing as Data
//!
//! Animation timings live in [`reveal::REVEAL_TABLE`] and are written into
//! the markup as CSS custom properties. The page script only flips
//! `data-variant` on a section root; CSS transitions do the rest, and a
//! `<noscript>` rule shows everything when scripting is off.
//!
//! ## Split-Phase Contact Submit
//!
//! [`contact::ContactForm`] separates `begin_submit` from `finish_submit`, so
//! a host can keep handling edits while a relay call is pending and stale
//! completions are recognized by ticket.

pub mod config;
pub mod contact;
pub mod generate;
pub mod logger;
pub mod nav;
pub mod output;
pub mod relay;
pub mod reveal;
pub mod scan;
pub mod simulate;
pub mod types;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_helpers;
