//! Viewport visibility detection.
//!
//! [`InView`] turns a stream of intersection entries for one element into a
//! boolean "is this element visible" signal. The host's observation primitive
//! sits behind [`ObservationEngine`]: the generated page uses the browser's
//! `IntersectionObserver` (see `static/site.js`), while [`ViewportEngine`] is a
//! geometric polling engine used by `folio simulate` and the tests.
//!
//! ## Lifecycle
//!
//! ```text
//! new ──bind──▶ observing ──fraction ≥ threshold──▶ in view
//!                  ▲   │                              │
//!                  │   └──────unmount──▶ inert        │ trigger_once: unobserve, latched
//!                  └──────fraction < threshold────────┘ otherwise
//! ```
//!
//! An unbound detector is inert and reports `false`. With `trigger_once`, the
//! first transition to visible is final: the detector drops its observation
//! and no later entry can flip it back.

use crate::reveal::Variant;
use std::collections::BTreeMap;
use std::fmt;

/// Identity of an observable element (the section's DOM id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle for one registered observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationId(u64);

/// One report from the engine: how much of `target` is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub observation: ObservationId,
    pub target: ElementId,
    /// Fraction of the element's box inside the viewport, 0.0-1.0.
    pub fraction: f64,
}

/// The host's observation primitive.
///
/// Engines report an entry right after `observe` and then whenever an
/// observation's fraction crosses its threshold. Entries are delivered to
/// [`InView::handle`] by whoever pumps the engine.
pub trait ObservationEngine {
    fn observe(&mut self, target: &ElementId, threshold: f64) -> ObservationId;
    fn unobserve(&mut self, observation: ObservationId);
}

/// Detector configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InViewOptions {
    /// Latch on the first visible report.
    pub trigger_once: bool,
    /// Fraction of the element that must be visible, 0.0-1.0.
    pub threshold: f64,
}

impl Default for InViewOptions {
    fn default() -> Self {
        Self {
            trigger_once: false,
            threshold: 0.1,
        }
    }
}

/// Visibility detector for a single element.
#[derive(Debug, Default)]
pub struct InView {
    options: InViewOptions,
    target: Option<ElementId>,
    observation: Option<ObservationId>,
    in_view: bool,
    latched: bool,
}

impl InView {
    pub fn new(options: InViewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    /// Animation variant selected by the current signal.
    pub fn variant(&self) -> Variant {
        Variant::from_in_view(self.in_view)
    }

    pub fn options(&self) -> InViewOptions {
        self.options
    }

    pub fn target(&self) -> Option<&ElementId> {
        self.target.as_ref()
    }

    /// Whether an observation is currently registered with the engine.
    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Attach the detector to `target`.
    ///
    /// Rebinding to a different element drops the old observation first.
    /// Binding the element that is already bound is a no-op.
    pub fn bind<E: ObservationEngine + ?Sized>(&mut self, engine: &mut E, target: ElementId) {
        if self.target.as_ref() == Some(&target) {
            return;
        }
        self.release(engine);
        self.target = Some(target);
        self.attach(engine);
    }

    /// Change the configuration, recreating the observation if it changed.
    pub fn set_options<E: ObservationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        options: InViewOptions,
    ) {
        if self.options == options {
            return;
        }
        self.release(engine);
        self.options = options;
        // A latch only holds for as long as the detector is asked to latch.
        if !options.trigger_once {
            self.latched = false;
        }
        self.attach(engine);
    }

    /// Apply one engine report. Returns `true` when `in_view` changed.
    ///
    /// Reports for observations this detector no longer owns are ignored.
    pub fn handle<E: ObservationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        entry: &IntersectionEntry,
    ) -> bool {
        if self.observation != Some(entry.observation) {
            return false;
        }
        let before = self.in_view;
        if entry.fraction >= self.options.threshold {
            self.in_view = true;
            if self.options.trigger_once {
                self.latched = true;
                self.release(engine);
            }
        } else if !self.options.trigger_once {
            self.in_view = false;
        }
        before != self.in_view
    }

    /// Tear down: drop the observation and forget the target.
    pub fn unmount<E: ObservationEngine + ?Sized>(&mut self, engine: &mut E) {
        self.release(engine);
        self.target = None;
    }

    fn attach<E: ObservationEngine + ?Sized>(&mut self, engine: &mut E) {
        if self.latched {
            return;
        }
        if let Some(target) = &self.target {
            self.observation = Some(engine.observe(target, self.options.threshold));
        }
    }

    fn release<E: ObservationEngine + ?Sized>(&mut self, engine: &mut E) {
        if let Some(observation) = self.observation.take() {
            engine.unobserve(observation);
        }
    }
}

// ============================================================================
// Geometric polling engine
// ============================================================================

/// Vertical extent of an element in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug)]
struct Tracked {
    target: ElementId,
    threshold: f64,
    /// Whether the last report was at or above the threshold.
    above: Option<bool>,
}

/// Observation engine that computes intersections from element spans and a
/// scroll offset, the way a polling fallback would.
#[derive(Debug)]
pub struct ViewportEngine {
    viewport_height: f64,
    scroll_offset: f64,
    layout: BTreeMap<ElementId, Span>,
    observations: BTreeMap<ObservationId, Tracked>,
    next_id: u64,
    pending: Vec<IntersectionEntry>,
}

impl ViewportEngine {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            scroll_offset: 0.0,
            layout: BTreeMap::new(),
            observations: BTreeMap::new(),
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Place (or move) an element.
    pub fn place(&mut self, target: ElementId, span: Span) {
        self.layout.insert(target, span);
        self.evaluate();
    }

    /// Remove an element from the layout; its observations report 0.
    pub fn remove(&mut self, target: &ElementId) {
        self.layout.remove(target);
        self.evaluate();
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll_offset = offset.max(0.0);
        self.evaluate();
    }

    pub fn resize(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
        self.evaluate();
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Number of live observations.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    pub fn is_observing(&self, target: &ElementId) -> bool {
        self.observations.values().any(|t| &t.target == target)
    }

    /// Take all reports produced since the last drain.
    pub fn drain(&mut self) -> Vec<IntersectionEntry> {
        std::mem::take(&mut self.pending)
    }

    /// Current visible fraction of `target` (0 when not laid out).
    pub fn fraction(&self, target: &ElementId) -> f64 {
        let Some(span) = self.layout.get(target) else {
            return 0.0;
        };
        if span.height <= 0.0 {
            return 0.0;
        }
        let view_top = self.scroll_offset;
        let view_bottom = self.scroll_offset + self.viewport_height;
        let overlap = span.bottom().min(view_bottom) - span.top.max(view_top);
        (overlap.max(0.0) / span.height).clamp(0.0, 1.0)
    }

    fn evaluate(&mut self) {
        let ids: Vec<ObservationId> = self.observations.keys().copied().collect();
        for id in ids {
            self.report(id, false);
        }
    }

    fn report(&mut self, id: ObservationId, initial: bool) {
        let Some(tracked) = self.observations.get(&id) else {
            return;
        };
        let fraction = self.fraction(&tracked.target);
        let above = fraction >= tracked.threshold;
        if !initial && tracked.above == Some(above) {
            return;
        }
        let target = tracked.target.clone();
        if let Some(tracked) = self.observations.get_mut(&id) {
            tracked.above = Some(above);
        }
        self.pending.push(IntersectionEntry {
            observation: id,
            target,
            fraction,
        });
    }
}

impl ObservationEngine for ViewportEngine {
    fn observe(&mut self, target: &ElementId, threshold: f64) -> ObservationId {
        let id = ObservationId(self.next_id);
        self.next_id += 1;
        self.observations.insert(
            id,
            Tracked {
                target: target.clone(),
                threshold,
                above: None,
            },
        );
        self.report(id, true);
        id
    }

    fn unobserve(&mut self, observation: ObservationId) {
        self.observations.remove(&observation);
        self.pending.retain(|e| e.observation != observation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> ElementId {
        ElementId::new("about")
    }

    /// 1000px tall element starting at 1000, viewport 500px.
    fn engine() -> ViewportEngine {
        let mut engine = ViewportEngine::new(500.0);
        engine.place(
            section(),
            Span {
                top: 1000.0,
                height: 1000.0,
            },
        );
        engine
    }

    fn pump(engine: &mut ViewportEngine, detector: &mut InView) {
        for entry in engine.drain() {
            detector.handle(engine, &entry);
        }
    }

    /// Scroll so that exactly `fraction` of the element is visible from below.
    fn show(engine: &mut ViewportEngine, detector: &mut InView, fraction: f64) {
        // Element top enters at the viewport bottom: offset + 500 = 1000 + f*1000
        engine.scroll_to(500.0 + fraction * 1000.0);
        pump(engine, detector);
    }

    #[test]
    fn unbound_detector_is_inert() {
        let mut engine = engine();
        let mut detector = InView::new(InViewOptions::default());
        engine.scroll_to(1000.0);
        pump(&mut engine, &mut detector);
        assert!(!detector.in_view());
        assert!(!detector.is_observing());
        assert_eq!(engine.observation_count(), 0);
    }

    #[test]
    fn default_options() {
        let options = InViewOptions::default();
        assert!(!options.trigger_once);
        assert_eq!(options.threshold, 0.1);
    }

    #[test]
    fn bind_registers_one_observation() {
        let mut engine = engine();
        let mut detector = InView::new(InViewOptions::default());
        detector.bind(&mut engine, section());
        detector.bind(&mut engine, section());
        assert_eq!(engine.observation_count(), 1);
        // Initial report: element is off screen
        pump(&mut engine, &mut detector);
        assert!(!detector.in_view());
    }

    #[test]
    fn toggles_both_ways_without_trigger_once() {
        for threshold in [0.0, 0.1, 0.2, 0.5, 0.9, 1.0] {
            let mut engine = engine();
            let mut detector = InView::new(InViewOptions {
                trigger_once: false,
                threshold,
            });
            detector.bind(&mut engine, section());
            pump(&mut engine, &mut detector);

            for fraction in [0.0, 0.05, 0.1, 0.2, 0.45, 0.5, 0.75, 1.0, 0.3, 0.0] {
                // The viewport is 500px of a 1000px element: cap at 0.5
                // when scrolling from below, reach 1.0 by shrinking the element.
                let span_height = if fraction > 0.5 { 500.0 * 1.0 / fraction } else { 1000.0 };
                engine.place(
                    section(),
                    Span {
                        top: 1000.0,
                        height: span_height,
                    },
                );
                let offset = if fraction > 0.5 {
                    1000.0 + span_height - 500.0
                } else {
                    500.0 + fraction * 1000.0
                };
                engine.scroll_to(offset);
                pump(&mut engine, &mut detector);
                let actual = engine.fraction(&section());
                assert_eq!(
                    detector.in_view(),
                    actual >= threshold,
                    "threshold {threshold}, fraction {actual}"
                );
            }
        }
    }

    #[test]
    fn trigger_once_latches_and_stops_observing() {
        let mut engine = engine();
        let mut detector = InView::new(InViewOptions {
            trigger_once: true,
            threshold: 0.2,
        });
        detector.bind(&mut engine, section());
        pump(&mut engine, &mut detector);
        assert!(!detector.in_view());

        show(&mut engine, &mut detector, 0.1);
        assert!(!detector.in_view());
        assert!(detector.is_observing());

        show(&mut engine, &mut detector, 0.3);
        assert!(detector.in_view());
        assert!(!detector.is_observing());
        assert_eq!(engine.observation_count(), 0);

        // Scrolling away does not revert
        engine.scroll_to(0.0);
        pump(&mut engine, &mut detector);
        assert!(detector.in_view());
        assert!(engine.drain().is_empty());
    }

    #[test]
    fn latched_detector_ignores_stale_entries() {
        let mut engine = engine();
        let mut detector = InView::new(InViewOptions {
            trigger_once: true,
            threshold: 0.2,
        });
        detector.bind(&mut engine, section());
        let initial = engine.drain();
        let stale = IntersectionEntry {
            fraction: 0.0,
            ..initial[0].clone()
        };
        show(&mut engine, &mut detector, 0.4);
        assert!(detector.in_view());
        assert!(!detector.handle(&mut engine, &stale));
        assert!(detector.in_view());
    }

    #[test]
    fn visible_on_bind_reports_immediately() {
        let mut engine = engine();
        engine.scroll_to(900.0);
        let mut detector = InView::new(InViewOptions::default());
        detector.bind(&mut engine, section());
        pump(&mut engine, &mut detector);
        assert!(detector.in_view());
    }

    #[test]
    fn rebinding_moves_the_observation() {
        let mut engine = engine();
        let other = ElementId::new("skills");
        engine.place(
            other.clone(),
            Span {
                top: 0.0,
                height: 400.0,
            },
        );
        let mut detector = InView::new(InViewOptions::default());
        detector.bind(&mut engine, section());
        detector.bind(&mut engine, other.clone());
        assert_eq!(engine.observation_count(), 1);
        assert!(engine.is_observing(&other));
        assert!(!engine.is_observing(&section()));
        pump(&mut engine, &mut detector);
        assert!(detector.in_view());
    }

    #[test]
    fn changing_threshold_recreates_observation() {
        let mut engine = engine();
        let mut detector = InView::new(InViewOptions {
            trigger_once: false,
            threshold: 0.5,
        });
        detector.bind(&mut engine, section());
        show(&mut engine, &mut detector, 0.3);
        assert!(!detector.in_view());

        detector.set_options(
            &mut engine,
            InViewOptions {
                trigger_once: false,
                threshold: 0.2,
            },
        );
        assert_eq!(engine.observation_count(), 1);
        pump(&mut engine, &mut detector);
        assert!(detector.in_view());
        assert_eq!(detector.options().threshold, 0.2);
    }

    #[test]
    fn entries_from_old_configuration_are_ignored() {
        let mut engine = engine();
        engine.scroll_to(800.0); // 0.3 visible
        let mut detector = InView::new(InViewOptions {
            trigger_once: false,
            threshold: 0.2,
        });
        detector.bind(&mut engine, section());
        let old = engine.drain();
        detector.set_options(
            &mut engine,
            InViewOptions {
                trigger_once: false,
                threshold: 0.5,
            },
        );
        for entry in &old {
            assert!(!detector.handle(&mut engine, entry));
        }
        assert!(!detector.in_view());
    }

    #[test]
    fn unmount_drops_observation_and_ignores_pending() {
        let mut engine = engine();
        let mut detector = InView::new(InViewOptions {
            trigger_once: true,
            threshold: 0.2,
        });
        detector.bind(&mut engine, section());
        engine.scroll_to(900.0);
        let pending = engine.drain();
        detector.unmount(&mut engine);
        assert_eq!(engine.observation_count(), 0);
        assert!(detector.target().is_none());
        for entry in &pending {
            assert!(!detector.handle(&mut engine, entry));
        }
        assert!(!detector.in_view());
    }

    #[test]
    fn variant_follows_signal() {
        let mut engine = engine();
        let mut detector = InView::new(InViewOptions::default());
        assert_eq!(detector.variant(), Variant::Hidden);
        detector.bind(&mut engine, section());
        show(&mut engine, &mut detector, 0.4);
        assert_eq!(detector.variant(), Variant::Visible);
    }

    #[test]
    fn fraction_is_zero_for_unknown_or_flat_elements() {
        let mut engine = engine();
        assert_eq!(engine.fraction(&ElementId::new("missing")), 0.0);
        engine.place(
            ElementId::new("flat"),
            Span {
                top: 0.0,
                height: 0.0,
            },
        );
        assert_eq!(engine.fraction(&ElementId::new("flat")), 0.0);
    }

    #[test]
    fn engine_reports_only_threshold_crossings() {
        let mut engine = engine();
        let id = engine.observe(&section(), 0.2);
        assert_eq!(engine.drain().len(), 1);
        engine.scroll_to(550.0); // 0.05
        engine.scroll_to(600.0); // 0.1
        assert!(engine.drain().is_empty());
        engine.scroll_to(800.0); // 0.3
        let entries = engine.drain();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].observation, id);
        assert!((entries[0].fraction - 0.3).abs() < 1e-9);
    }
}
