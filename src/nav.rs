//! Navigation shell state.
//!
//! Three independent toggles owned by the navigation bar: whether the page is
//! scrolled past the style threshold, which section link is current, and
//! whether the mobile panel is open. The generated page mirrors the same rules
//! in `static/site.js`; [`simulate`](crate::simulate) drives this struct
//! directly.

use crate::config::NavigationConfig;
use crate::types::{NavItem, SectionId};

#[derive(Debug, Clone)]
pub struct NavShell {
    items: Vec<NavItem>,
    active: SectionId,
    menu_open: bool,
    scrolled: bool,
    scroll_threshold: f64,
    mobile_breakpoint: u32,
}

impl NavShell {
    pub fn new(items: Vec<NavItem>, config: &NavigationConfig) -> Self {
        Self {
            items,
            active: SectionId::Home,
            menu_open: false,
            scrolled: false,
            scroll_threshold: config.scroll_threshold,
            mobile_breakpoint: config.mobile_breakpoint,
        }
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    pub fn active(&self) -> SectionId {
        self.active
    }

    pub fn is_active(&self, section: SectionId) -> bool {
        self.active == section
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Record a scroll offset. Returns `true` when the scrolled style flips.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        let scrolled = offset > self.scroll_threshold;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// A link was clicked: mark it current and close the mobile panel.
    ///
    /// Sections without a link are ignored.
    pub fn select(&mut self, section: SectionId) -> bool {
        if !self.items.iter().any(|i| i.section == section) {
            return false;
        }
        self.active = section;
        self.menu_open = false;
        true
    }

    /// Window resized: widening past the breakpoint closes the mobile panel.
    pub fn on_resize(&mut self, width: u32) {
        if width > self.mobile_breakpoint {
            self.menu_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> NavShell {
        let items = SectionId::ALL.into_iter().map(NavItem::for_section).collect();
        NavShell::new(items, &NavigationConfig::default())
    }

    #[test]
    fn starts_at_home_closed_unscrolled() {
        let nav = shell();
        assert_eq!(nav.active(), SectionId::Home);
        assert!(!nav.is_menu_open());
        assert!(!nav.is_scrolled());
        assert_eq!(nav.items().len(), 6);
    }

    #[test]
    fn scroll_threshold_is_exclusive() {
        let mut nav = shell();
        assert!(!nav.on_scroll(50.0));
        assert!(!nav.is_scrolled());
        assert!(nav.on_scroll(51.0));
        assert!(nav.is_scrolled());
        assert!(!nav.on_scroll(400.0));
        assert!(nav.on_scroll(0.0));
        assert!(!nav.is_scrolled());
    }

    #[test]
    fn select_sets_active_and_closes_menu() {
        let mut nav = shell();
        nav.toggle_menu();
        assert!(nav.is_menu_open());
        assert!(nav.select(SectionId::Projects));
        assert!(nav.is_active(SectionId::Projects));
        assert!(!nav.is_menu_open());
    }

    #[test]
    fn select_unknown_section_is_ignored() {
        let items = vec![NavItem::for_section(SectionId::Home)];
        let mut nav = NavShell::new(items, &NavigationConfig::default());
        nav.toggle_menu();
        assert!(!nav.select(SectionId::Skills));
        assert_eq!(nav.active(), SectionId::Home);
        assert!(nav.is_menu_open());
    }

    #[test]
    fn resize_past_breakpoint_closes_menu() {
        let mut nav = shell();
        nav.toggle_menu();
        nav.on_resize(768);
        assert!(nav.is_menu_open());
        nav.on_resize(1024);
        assert!(!nav.is_menu_open());
    }
}
