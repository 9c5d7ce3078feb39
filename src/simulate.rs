//! Scroll simulation.
//!
//! Lays the manifest's sections out top to bottom using the configured
//! height estimates, binds one [`InView`] detector per in-view section to a
//! [`ViewportEngine`], and scrolls the viewport down the page and back up in
//! fixed steps. Every reveal, hide and nav-style change is recorded with the
//! scroll offset at which it happened.
//!
//! ```text
//! offset 0      home revealed (mount)
//! offset 100    nav scrolled
//! offset 300    about revealed
//! ...
//! ```

use crate::config::SimulationConfig;
use crate::nav::NavShell;
use crate::reveal::{self, Variant};
use crate::scan::Manifest;
use crate::types::SectionId;
use crate::visibility::{ElementId, InView, InViewOptions, Span, ViewportEngine};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    Revealed(SectionId),
    Hidden(SectionId),
    /// The nav bar switched style; `true` means scrolled.
    NavScrolled(bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationEvent {
    pub offset: f64,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    pub viewport_height: f64,
    pub page_height: f64,
    pub layout: Vec<(SectionId, Span)>,
    /// Number of scroll positions visited, both directions.
    pub frames: usize,
    pub events: Vec<SimulationEvent>,
    /// Variant of every section once the run ends.
    pub final_variants: Vec<(SectionId, Variant)>,
}

impl Simulation {
    /// Offset at which `section` was first revealed.
    pub fn revealed_at(&self, section: SectionId) -> Option<f64> {
        self.events.iter().find_map(|e| match e.kind {
            EventKind::Revealed(s) if s == section => Some(e.offset),
            _ => None,
        })
    }
}

/// Simulate a round-trip scroll over the page built from `manifest`.
pub fn simulate(manifest: &Manifest, config: &SimulationConfig) -> Simulation {
    let mut nav = NavShell::new(manifest.navigation.clone(), &manifest.config.navigation);
    run(&manifest.sections(), config, &mut nav, |section| {
        reveal::reveal_for(section).in_view_options()
    })
}

struct Tracked {
    section: SectionId,
    detector: InView,
}

fn run(
    sections: &[SectionId],
    config: &SimulationConfig,
    nav: &mut NavShell,
    options_for: impl Fn(SectionId) -> Option<InViewOptions>,
) -> Simulation {
    let mut engine = ViewportEngine::new(config.viewport_height);
    let mut layout = Vec::with_capacity(sections.len());
    let mut top = 0.0;
    for &section in sections {
        let span = Span {
            top,
            height: config.heights.get(section),
        };
        engine.place(ElementId::new(section.id()), span);
        layout.push((section, span));
        top = span.bottom();
    }
    let page_height = top;
    let max_offset = (page_height - config.viewport_height).max(0.0);

    let mut events = Vec::new();
    let mut mounted = Vec::new();
    let mut tracked = Vec::new();
    for &section in sections {
        match options_for(section) {
            None => {
                mounted.push(section);
                events.push(SimulationEvent {
                    offset: 0.0,
                    kind: EventKind::Revealed(section),
                });
            }
            Some(options) => {
                let mut detector = InView::new(options);
                detector.bind(&mut engine, ElementId::new(section.id()));
                tracked.push(Tracked { section, detector });
            }
        }
    }
    dispatch(&mut engine, &mut tracked, 0.0, &mut events);

    let mut offsets = Vec::new();
    let mut offset = 0.0;
    while offset < max_offset {
        offset = (offset + config.step).min(max_offset);
        offsets.push(offset);
    }
    let down = offsets.len();
    for i in (0..down).rev() {
        offsets.push(if i == 0 { 0.0 } else { offsets[i - 1] });
    }

    for &offset in &offsets {
        engine.scroll_to(offset);
        dispatch(&mut engine, &mut tracked, offset, &mut events);
        if nav.on_scroll(offset) {
            log::trace!("nav scrolled={} at {}", nav.is_scrolled(), offset);
            events.push(SimulationEvent {
                offset,
                kind: EventKind::NavScrolled(nav.is_scrolled()),
            });
        }
    }

    let final_variants = sections
        .iter()
        .map(|&section| {
            let variant = if mounted.contains(&section) {
                Variant::Visible
            } else {
                tracked
                    .iter()
                    .find(|t| t.section == section)
                    .map(|t| t.detector.variant())
                    .unwrap_or(Variant::Hidden)
            };
            (section, variant)
        })
        .collect();

    for t in &mut tracked {
        t.detector.unmount(&mut engine);
    }
    debug_assert_eq!(engine.observation_count(), 0);

    Simulation {
        viewport_height: config.viewport_height,
        page_height,
        layout,
        frames: offsets.len() + 1,
        events,
        final_variants,
    }
}

fn dispatch(
    engine: &mut ViewportEngine,
    tracked: &mut [Tracked],
    offset: f64,
    events: &mut Vec<SimulationEvent>,
) {
    for entry in engine.drain() {
        for t in tracked.iter_mut() {
            if t.detector.handle(engine, &entry) {
                let kind = if t.detector.in_view() {
                    EventKind::Revealed(t.section)
                } else {
                    EventKind::Hidden(t.section)
                };
                events.push(SimulationEvent { offset, kind });
            }
        }
    }
}
