//! A fixed, single-column layout of the portfolio page in document
//! coordinates. Front ends without a layout engine (the terminal preview,
//! SVG export) use it as their [`GeometryProvider`].

use shipwake_protocol::Rect;

use crate::timeline::{Side, TimelineEntry};
use crate::tracker::GeometryProvider;

pub const NAV_HEIGHT: f64 = 56.0;
const SECTION_HEIGHT: f64 = 480.0;
const SECTION_HEADER: f64 = 96.0;
const SECTION_PADDING: f64 = 48.0;
const CARD_HEIGHT: f64 = 150.0;
const CARD_GAP: f64 = 70.0;
/// Share of the page width taken by one card.
const CARD_WIDTH_RATIO: f64 = 0.36;

/// Navigation anchors, in page order.
pub const NAV_LINKS: [(&str, &str); 7] = [
    ("home", "Home"),
    ("about", "About Me"),
    ("education", "Education"),
    ("skills", "Skills"),
    ("hackathons", "Hackathons & Major Projects"),
    ("other-projects", "Other Projects"),
    ("contact", "Contact"),
];

/// Id of the section that hosts the timeline and anchors the progress.
pub const TIMELINE_SECTION: &str = "hackathons";

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub rect: Rect,
}

#[derive(Debug, Clone)]
pub struct PageLayout {
    width: f64,
    sections: Vec<Section>,
    timeline: usize,
    cards: Vec<Rect>,
    height: f64,
}

impl PageLayout {
    pub fn new(entries: &[TimelineEntry], width: f64) -> Self {
        let width = width.max(1.0);
        let card_w = (width * CARD_WIDTH_RATIO).max(1.0);

        let mut sections = Vec::with_capacity(NAV_LINKS.len());
        let mut cards = Vec::with_capacity(entries.len());
        let mut timeline = 0;
        let mut y = NAV_HEIGHT;

        for (i, &(id, title)) in NAV_LINKS.iter().enumerate() {
            let height = if id == TIMELINE_SECTION {
                timeline = i;
                let cards_top = y + SECTION_HEADER;
                for (n, entry) in entries.iter().enumerate() {
                    let x = match entry.side {
                        Side::Left => SECTION_PADDING,
                        Side::Right => width - SECTION_PADDING - card_w,
                    };
                    let top = cards_top + n as f64 * (CARD_HEIGHT + CARD_GAP);
                    cards.push(Rect::new(x, top, card_w, CARD_HEIGHT));
                }
                let stack = entries.len() as f64 * (CARD_HEIGHT + CARD_GAP);
                (SECTION_HEADER + stack + SECTION_PADDING).max(SECTION_HEIGHT)
            } else {
                SECTION_HEIGHT
            };
            sections.push(Section {
                id,
                title,
                rect: Rect::new(0.0, y, width, height),
            });
            y += height;
        }

        Self {
            width,
            sections,
            timeline,
            cards,
            height: y,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn document_height(&self) -> f64 {
        self.height
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The timeline section, in document coordinates.
    pub fn timeline_rect(&self) -> Rect {
        self.sections[self.timeline].rect
    }

    /// Entry cards in document coordinates.
    pub fn card_rects(&self) -> &[Rect] {
        &self.cards
    }

    /// Scroll offset that brings section `id` just below the nav bar.
    pub fn anchor_offset(&self, id: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| (s.rect.y - NAV_HEIGHT).max(0.0))
    }

    pub fn max_scroll(&self, viewport_height: f64) -> f64 {
        (self.height - viewport_height).max(0.0)
    }

    /// View of the page at a scroll offset (clamped to the document).
    pub fn viewport(&self, scroll_y: f64, viewport_height: f64) -> PageViewport<'_> {
        PageViewport {
            layout: self,
            scroll_y: scroll_y.clamp(0.0, self.max_scroll(viewport_height)),
            viewport_height,
        }
    }
}

/// [`PageLayout`] seen through a viewport scrolled by `scroll_y`.
#[derive(Debug, Clone, Copy)]
pub struct PageViewport<'a> {
    layout: &'a PageLayout,
    scroll_y: f64,
    viewport_height: f64,
}

impl PageViewport<'_> {
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}

impl GeometryProvider for PageViewport<'_> {
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn anchor_rect(&self) -> Option<Rect> {
        Some(self.layout.timeline_rect().translated_y(-self.scroll_y))
    }

    fn container_rect(&self) -> Option<Rect> {
        self.anchor_rect()
    }

    fn entry_rects(&self) -> Vec<Rect> {
        self.layout
            .cards
            .iter()
            .map(|r| r.translated_y(-self.scroll_y))
            .collect()
    }
}
