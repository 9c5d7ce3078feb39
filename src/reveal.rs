//! Staged reveal timing table.
//!
//! Each section animates between two variants, [`Variant::Hidden`] and
//! [`Variant::Visible`], selected by its visibility signal. Inside a section,
//! content groups carry a hidden pose and a transition timing; the children of
//! a group stagger their start by a fixed per-group delay so they enter in
//! sequence.
//!
//! The table is data, not logic: [`REVEAL_TABLE`] is keyed by section and
//! group, and the generator writes it into the markup as CSS custom
//! properties. The page script only flips `data-variant` on the section root.

use crate::types::SectionId;
use crate::visibility::InViewOptions;
use std::fmt;

/// The two animation states of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Hidden,
    Visible,
}

impl Variant {
    pub fn from_in_view(in_view: bool) -> Self {
        if in_view {
            Variant::Visible
        } else {
            Variant::Hidden
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Hidden => "hidden",
            Variant::Visible => "visible",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What starts a section's reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Revealed as soon as the page mounts.
    Mount,
    /// Revealed by a visibility detector with these options.
    InView(InViewOptions),
}

/// Offset, opacity and scale of a hidden element. The visible pose is always
/// the identity (opacity 1, no offset, scale 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Pose {
    pub const FADE: Pose = Pose {
        opacity: 0.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    pub const fn rise(y: f32) -> Pose {
        Pose { y, ..Pose::FADE }
    }

    pub const fn slide(x: f32) -> Pose {
        Pose { x, ..Pose::FADE }
    }

    pub const fn grow(scale: f32) -> Pose {
        Pose {
            scale,
            ..Pose::FADE
        }
    }
}

/// How one content group enters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Move from a hidden pose to the identity pose.
    Pose(Pose),
    /// Grow a bar's width from zero to its own value (skill meters).
    Meter,
}

/// Timing of one content group inside a section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupReveal {
    pub group: &'static str,
    pub motion: Motion,
    /// Seconds each child's transition takes.
    pub duration: f32,
    /// Seconds before the first child starts.
    pub delay: f32,
    /// Seconds between successive children.
    pub stagger: f32,
}

impl GroupReveal {
    /// Start delay of the `index`-th child.
    pub fn child_delay(&self, index: usize) -> f32 {
        self.delay + self.stagger * index as f32
    }

    /// Inline CSS custom properties for the `index`-th child.
    pub fn style(&self, index: usize) -> String {
        let timing = format!(
            "--reveal-delay: {}s; --reveal-duration: {}s;",
            fmt_secs(self.child_delay(index)),
            fmt_secs(self.duration)
        );
        match self.motion {
            Motion::Pose(pose) => format!(
                "{timing} --reveal-opacity: {}; --reveal-x: {}px; --reveal-y: {}px; --reveal-scale: {};",
                pose.opacity, pose.x, pose.y, pose.scale
            ),
            Motion::Meter => timing,
        }
    }
}

/// Trigger and group timings of one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionReveal {
    pub section: SectionId,
    pub trigger: Trigger,
    pub groups: &'static [GroupReveal],
}

impl SectionReveal {
    pub fn group(&self, name: &str) -> Option<&GroupReveal> {
        self.groups.iter().find(|g| g.group == name)
    }

    /// Detector options, or `None` for sections revealed on mount.
    pub fn in_view_options(&self) -> Option<InViewOptions> {
        match self.trigger {
            Trigger::Mount => None,
            Trigger::InView(options) => Some(options),
        }
    }
}

const SECTION_TRIGGER: Trigger = Trigger::InView(InViewOptions {
    trigger_once: true,
    threshold: 0.2,
});

const fn group(
    group: &'static str,
    motion: Motion,
    duration: f32,
    delay: f32,
    stagger: f32,
) -> GroupReveal {
    GroupReveal {
        group,
        motion,
        duration,
        delay,
        stagger,
    }
}

pub static REVEAL_TABLE: [SectionReveal; 6] = [
    SectionReveal {
        section: SectionId::Home,
        trigger: Trigger::Mount,
        groups: &[group("intro", Motion::Pose(Pose::rise(20.0)), 0.8, 0.3, 0.2)],
    },
    SectionReveal {
        section: SectionId::About,
        trigger: SECTION_TRIGGER,
        groups: &[
            group("story", Motion::Pose(Pose::slide(-30.0)), 0.6, 0.0, 0.15),
            group("portrait", Motion::Pose(Pose::slide(30.0)), 0.6, 0.15, 0.0),
        ],
    },
    SectionReveal {
        section: SectionId::Skills,
        trigger: SECTION_TRIGGER,
        groups: &[
            group("heading", Motion::Pose(Pose::rise(20.0)), 0.5, 0.0, 0.0),
            group("technical", Motion::Pose(Pose::rise(20.0)), 0.5, 0.0, 0.1),
            group("meters", Motion::Meter, 1.5, 0.0, 0.0),
            group("soft", Motion::Pose(Pose::grow(0.8)), 0.5, 0.0, 0.1),
        ],
    },
    SectionReveal {
        section: SectionId::Projects,
        trigger: SECTION_TRIGGER,
        groups: &[
            group("heading", Motion::Pose(Pose::rise(-20.0)), 0.6, 0.0, 0.0),
            group("cards", Motion::Pose(Pose::rise(30.0)), 0.6, 0.0, 0.2),
        ],
    },
    SectionReveal {
        section: SectionId::Experience,
        trigger: SECTION_TRIGGER,
        groups: &[
            group("heading", Motion::Pose(Pose::rise(-20.0)), 0.6, 0.0, 0.0),
            group("timeline", Motion::Pose(Pose::slide(-30.0)), 0.6, 0.0, 0.2),
        ],
    },
    SectionReveal {
        section: SectionId::Contact,
        trigger: SECTION_TRIGGER,
        groups: &[
            group("heading", Motion::Pose(Pose::rise(-20.0)), 0.6, 0.0, 0.0),
            group("channels", Motion::Pose(Pose::rise(20.0)), 0.6, 0.0, 0.15),
            group("form", Motion::Pose(Pose::rise(20.0)), 0.6, 0.0, 0.15),
            group("note", Motion::Pose(Pose::FADE), 0.6, 0.5, 0.0),
        ],
    },
];

/// Reveal settings for `section`.
pub fn reveal_for(section: SectionId) -> &'static SectionReveal {
    REVEAL_TABLE
        .iter()
        .find(|r| r.section == section)
        .unwrap_or_else(|| unreachable!("every section has a reveal entry"))
}

/// Seconds with at most two decimals, trailing zeros trimmed.
fn fmt_secs(secs: f32) -> String {
    let s = format!("{:.2}", secs);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_has_exactly_one_entry() {
        for section in SectionId::ALL {
            let count = REVEAL_TABLE.iter().filter(|r| r.section == section).count();
            assert_eq!(count, 1, "{section}");
            assert_eq!(reveal_for(section).section, section);
        }
    }

    #[test]
    fn only_home_reveals_on_mount() {
        assert_eq!(reveal_for(SectionId::Home).trigger, Trigger::Mount);
        assert!(reveal_for(SectionId::Home).in_view_options().is_none());
        for section in &SectionId::ALL[1..] {
            let options = reveal_for(*section).in_view_options().unwrap();
            assert!(options.trigger_once);
            assert_eq!(options.threshold, 0.2);
        }
    }

    #[test]
    fn staggers_stay_within_range() {
        for reveal in &REVEAL_TABLE {
            for g in reveal.groups {
                assert!(g.stagger == 0.0 || (0.1..=0.2).contains(&g.stagger), "{}", g.group);
            }
        }
    }

    #[test]
    fn child_delay_is_linear_in_index() {
        let cards = reveal_for(SectionId::Projects).group("cards").unwrap();
        assert_eq!(cards.child_delay(0), 0.0);
        assert!((cards.child_delay(3) - 0.6).abs() < 1e-6);

        let intro = reveal_for(SectionId::Home).group("intro").unwrap();
        assert!((intro.child_delay(2) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn pose_style_carries_offsets() {
        let story = reveal_for(SectionId::About).group("story").unwrap();
        let style = story.style(2);
        assert!(style.contains("--reveal-delay: 0.3s"));
        assert!(style.contains("--reveal-duration: 0.6s"));
        assert!(style.contains("--reveal-x: -30px"));
        assert!(style.contains("--reveal-y: 0px"));
    }

    #[test]
    fn meter_style_has_timing_only() {
        let meters = reveal_for(SectionId::Skills).group("meters").unwrap();
        let style = meters.style(0);
        assert!(style.contains("--reveal-duration: 1.5s"));
        assert!(!style.contains("--reveal-x"));
    }

    #[test]
    fn fmt_secs_trims() {
        assert_eq!(fmt_secs(0.0), "0");
        assert_eq!(fmt_secs(0.5), "0.5");
        assert_eq!(fmt_secs(1.0), "1");
        assert_eq!(fmt_secs(0.15), "0.15");
    }

    #[test]
    fn variant_from_signal() {
        assert_eq!(Variant::from_in_view(true), Variant::Visible);
        assert_eq!(Variant::from_in_view(false).to_string(), "hidden");
    }
}
