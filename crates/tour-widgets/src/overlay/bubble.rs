#![forbid(unsafe_code)]

//! Bubble content model and markup.
//!
//! The bubble carries a close control, a badge with the 1-based step
//! number, the step text, prev/next arrows, and one dot per step. Every
//! control is tagged with a `data-tour-control` attribute so a backend can
//! find it inside the bubble without global id lookups.

use std::fmt::Write as _;

use tour_core::config::ClassNames;
use tour_core::geometry::Size;
use tour_core::step::{TourStep, TourSteps};
use tour_layout::BubblePlacement;
use v_htmlescape::escape;

use super::backend::NavControl;

/// Attribute naming the control a bubble element triggers.
pub const CONTROL_ATTR: &str = "data-tour-control";

const CLOSE_ICON: &str = "<svg viewBox='0 0 9.1 9.1'><path fill='currentColor' d='M5.9 4.5l2.8-2.8c.4-.4.4-1 0-1.4-.4-.4-1-.4-1.4 0L4.5 3.1 1.7.3C1.3-.1.7-.1.3.3c-.4.4-.4 1 0 1.4l2.8 2.8L.3 7.4c-.4.4-.4 1 0 1.4.2.2.4.3.7.3s.5-.1.7-.3L4.5 6l2.8 2.8c.3.2.5.3.8.3s.5-.1.7-.3c.4-.4.4-1 0-1.4L5.9 4.5z'></path></svg>";
const PREV_ICON: &str = "<svg viewBox='0 0 18.4 14.4'><path d='M1.4 7.2h16M7.6 1L1.4 7.2l6.2 6.2' fill='none' stroke='currentColor' stroke-width='2' stroke-linecap='round' stroke-miterlimit='10'></path></svg>";
const NEXT_ICON: &str = "<svg viewBox='0 0 18.4 14.4'><path d='M17 7.2H1M10.8 1L17 7.2l-6.2 6.2' fill='none' stroke='currentColor' stroke-width='2' stroke-linecap='round' stroke-miterlimit='10'></path></svg>";

/// One position-indicator dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotIndicator {
    pub position: usize,
    pub current: bool,
}

/// What the bubble shows for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleContent {
    /// 1-based step number.
    pub badge: usize,
    /// Step text (unescaped).
    pub text: String,
    /// One dot per step in the session.
    pub dots: Vec<DotIndicator>,
}

impl BubbleContent {
    /// Content for `step` within `steps`.
    pub fn for_step(step: &TourStep, steps: &TourSteps) -> Self {
        let dots = steps
            .iter()
            .map(|s| DotIndicator {
                position: s.position,
                current: s.position == step.position,
            })
            .collect();
        Self {
            badge: step.badge(),
            text: step.content.clone(),
            dots,
        }
    }

    /// Position of the dot marked current.
    pub fn current_dot(&self) -> Option<usize> {
        self.dots.iter().find(|d| d.current).map(|d| d.position)
    }

    /// Every control this bubble exposes, in document order.
    pub fn controls(&self) -> Vec<NavControl> {
        let mut controls = Vec::with_capacity(self.dots.len() + 3);
        controls.push(NavControl::Close);
        controls.push(NavControl::Prev);
        controls.extend(self.dots.iter().map(|d| NavControl::Dot(d.position)));
        controls.push(NavControl::Next);
        controls
    }

    /// Inner HTML of the bubble element. Step text is escaped.
    pub fn to_markup(&self, classes: &ClassNames) -> String {
        let mut out = String::with_capacity(1024 + self.text.len());
        let _ = write!(out, "<span class='badge'>{}</span>", self.badge);
        let _ = write!(
            out,
            "<button class='close-button' {CONTROL_ATTR}='{}'>{CLOSE_ICON}</button>",
            NavControl::Close.attr_value()
        );
        let _ = write!(out, "<div class='tour-content'><p>{}</p>", escape(&self.text));
        out.push_str("<div class='tour-data-row'>");
        let _ = write!(
            out,
            "<div class='left-svg'><button class='svg' data-tour-elem='left-arrow' {CONTROL_ATTR}='{}'>{PREV_ICON}</button></div>",
            NavControl::Prev.attr_value()
        );
        out.push_str("<div class='tour-elements-feedback'>");
        for dot in &self.dots {
            let class = if dot.current {
                format!("{} {}", escape(&classes.dot_current), escape(&classes.dot))
            } else {
                escape(&classes.dot).to_string()
            };
            let _ = write!(
                out,
                "<button data-tour-elem='dot' class='{class}' {CONTROL_ATTR}='{}'></button>",
                NavControl::Dot(dot.position).attr_value()
            );
        }
        out.push_str("</div>");
        let _ = write!(
            out,
            "<div class='right-svg'><button class='svg' data-tour-elem='right-arrow' {CONTROL_ATTR}='{}'>{NEXT_ICON}</button></div>",
            NavControl::Next.attr_value()
        );
        out.push_str("</div></div>");
        out
    }
}

/// A positioned bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub content: BubbleContent,
    pub placement: BubblePlacement,
    pub size: Size,
}
