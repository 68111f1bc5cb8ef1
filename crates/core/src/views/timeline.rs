use shipwake_protocol::{MarkerPosition, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::curve::PathSampler;
use crate::layout::PageLayout;
use crate::timeline::{Side, TimelineEntry};
use crate::tracker::ScrollTracker;

const HEADING_FONT: f64 = 26.0;
const HEADING_Y: f64 = 52.0;
const TITLE_FONT: f64 = 17.0;
const BODY_FONT: f64 = 13.0;
const TAG_FONT: f64 = 11.0;
const TAG_PAD_X: f64 = 7.0;
const TAG_GAP: f64 = 6.0;
/// Rough advance of one tag glyph, used to size chips.
const TAG_CHAR_WIDTH: f64 = TAG_FONT * 0.6;
const CARD_PADDING: f64 = 14.0;
const LINE_HEIGHT: f64 = 22.0;
const PATH_WIDTH: f64 = 3.0;
const CONNECTOR_WIDTH: f64 = 1.5;
pub const SHIP_SIZE: f64 = 28.0;

/// Tracker state needed to draw one frame of the timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoyageFrame<'a> {
    pub sampler: Option<&'a PathSampler>,
    /// Path start, relative to the section's top-left corner.
    pub path_origin: Point,
    pub marker: Option<MarkerPosition>,
    pub active_entry: Option<usize>,
}

impl<'a> VoyageFrame<'a> {
    pub fn from_tracker(tracker: &'a ScrollTracker) -> Self {
        Self {
            sampler: tracker.sampler(),
            path_origin: tracker.path_origin(),
            marker: tracker.last_position(),
            active_entry: tracker.active_entry(),
        }
    }
}

/// Render the timeline section of `layout`: heading, voyage path, one card
/// per entry and the ship.
///
/// Coordinates are relative to the section's top-left corner, which is
/// also the marker's positioning container.
pub fn render_timeline(
    layout: &PageLayout,
    entries: &[TimelineEntry],
    frame: &VoyageFrame<'_>,
) -> Vec<RenderCommand> {
    let section = layout.timeline_rect();
    let cards = layout.card_rects();
    let mut commands = Vec::with_capacity(cards.len() * 8 + 10);

    commands.push(RenderCommand::BeginGroup {
        id: "hackathons".into(),
        label: Some("Hackathons & Major Projects".into()),
    });

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, section.w, section.h),
        color: ThemeToken::Background,
        border_color: None,
        label: None,
        entry_index: None,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(section.w / 2.0, HEADING_Y),
        text: "Hackathons & Major Projects".into(),
        color: ThemeToken::TextPrimary,
        font_size: HEADING_FONT,
        align: TextAlign::Center,
    });

    if let Some(sampler) = frame.sampler {
        commands.push(RenderCommand::PushTransform {
            translate: frame.path_origin,
        });
        commands.push(RenderCommand::DrawPath {
            d: sampler.curve().to_svg_path(),
            polyline: sampler.polyline(),
            color: ThemeToken::PathStroke,
            width: PATH_WIDTH,
            dashed: true,
        });
        commands.push(RenderCommand::PopTransform);
    }

    for (i, (entry, card)) in entries.iter().zip(cards).enumerate() {
        let card = Rect::new(card.x - section.x, card.y - section.y, card.w, card.h);
        render_card(&mut commands, i, entry, card, frame);
    }

    if let Some(marker) = frame.marker {
        commands.push(RenderCommand::DrawShip {
            center: Point::new(marker.left(), marker.top()),
            heading_deg: marker.heading_deg,
            size: SHIP_SIZE,
            color: ThemeToken::Ship,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

fn render_card(
    commands: &mut Vec<RenderCommand>,
    index: usize,
    entry: &TimelineEntry,
    card: Rect,
    frame: &VoyageFrame<'_>,
) {
    let active = frame.active_entry == Some(index);
    commands.push(RenderCommand::BeginGroup {
        id: format!("entry-{index}"),
        label: Some(entry.title.clone()),
    });

    // Connector from the card's inner edge to the path's centre line
    let edge_x = match entry.side {
        Side::Left => card.x + card.w,
        Side::Right => card.x,
    };
    commands.push(RenderCommand::DrawLine {
        from: Point::new(edge_x, card.center_y()),
        to: Point::new(frame.path_origin.x, card.center_y()),
        color: if active {
            ThemeToken::Accent
        } else {
            ThemeToken::CardBorder
        },
        width: CONNECTOR_WIDTH,
    });

    commands.push(RenderCommand::DrawRect {
        rect: card,
        color: ThemeToken::CardBackground,
        border_color: Some(if active {
            ThemeToken::Accent
        } else {
            ThemeToken::CardBorder
        }),
        label: Some(entry.title.clone()),
        entry_index: Some(index),
    });

    let x = card.x + CARD_PADDING;
    let mut y = card.y + CARD_PADDING + TITLE_FONT;
    commands.push(RenderCommand::DrawText {
        position: Point::new(x, y),
        text: entry.title.clone(),
        color: ThemeToken::TextPrimary,
        font_size: TITLE_FONT,
        align: TextAlign::Left,
    });

    y += LINE_HEIGHT;
    let role = match &entry.outcome {
        Some(outcome) => format!("{} · {outcome}", entry.role),
        None => entry.role.clone(),
    };
    commands.push(RenderCommand::DrawText {
        position: Point::new(x, y),
        text: role,
        color: ThemeToken::Accent,
        font_size: BODY_FONT,
        align: TextAlign::Left,
    });

    y += LINE_HEIGHT;
    commands.push(RenderCommand::DrawText {
        position: Point::new(x, y),
        text: entry.description.clone(),
        color: ThemeToken::TextMuted,
        font_size: BODY_FONT,
        align: TextAlign::Left,
    });

    if !entry.tags.is_empty() {
        y += LINE_HEIGHT + 4.0;
        render_tags(commands, &entry.tags, Point::new(x, y), card.x + card.w - CARD_PADDING);
    }

    commands.push(RenderCommand::EndGroup);
}

/// One chip per tag along the baseline at `origin`; tags that would run
/// past `max_x` are dropped.
fn render_tags(commands: &mut Vec<RenderCommand>, tags: &[String], origin: Point, max_x: f64) {
    let mut x = origin.x;
    for tag in tags {
        let w = tag.chars().count() as f64 * TAG_CHAR_WIDTH + 2.0 * TAG_PAD_X;
        if x + w > max_x {
            break;
        }
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, origin.y - TAG_FONT - 4.0, w, TAG_FONT + 8.0),
            color: ThemeToken::TagBackground,
            border_color: None,
            label: None,
            entry_index: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + TAG_PAD_X, origin.y),
            text: tag.clone(),
            color: ThemeToken::TagText,
            font_size: TAG_FONT,
            align: TextAlign::Left,
        });
        x += w + TAG_GAP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WakeConfig;
    use crate::timeline::default_entries;

    fn count<F: Fn(&RenderCommand) -> bool>(cmds: &[RenderCommand], f: F) -> usize {
        cmds.iter().filter(|c| f(c)).count()
    }

    #[test]
    fn unmounted_frame_draws_cards_only() {
        let entries = default_entries();
        let layout = PageLayout::new(&entries, 1200.0);
        let cmds = render_timeline(&layout, &entries, &VoyageFrame::default());
        assert_eq!(
            count(&cmds, |c| matches!(c, RenderCommand::DrawRect { entry_index: Some(_), .. })),
            5
        );
        assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::DrawPath { .. })), 0);
        assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::DrawShip { .. })), 0);
        let begins = count(&cmds, |c| matches!(c, RenderCommand::BeginGroup { .. }));
        let ends = count(&cmds, |c| matches!(c, RenderCommand::EndGroup));
        assert_eq!(begins, ends);
    }

    #[test]
    fn mounted_frame_draws_path_and_ship() {
        let entries = default_entries();
        let layout = PageLayout::new(&entries, 1200.0);
        let mut tracker = ScrollTracker::new(WakeConfig::default());
        let mut marker: Option<MarkerPosition> = None;
        let pos = tracker
            .mount(&layout.viewport(0.0, 800.0), &mut marker)
            .unwrap();

        let cmds = render_timeline(&layout, &entries, &VoyageFrame::from_tracker(&tracker));
        let ship = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawShip { center, .. } => Some(*center),
            _ => None,
        });
        assert_eq!(ship, Some(Point::new(pos.x, pos.y)));
        assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::DrawPath { .. })), 1);

        // first card is highlighted at progress 0
        let active = cmds.iter().any(|c| {
            matches!(
                c,
                RenderCommand::DrawRect {
                    entry_index: Some(0),
                    border_color: Some(ThemeToken::Accent),
                    ..
                }
            )
        });
        assert!(active);
    }

    #[test]
    fn tags_draw_as_chips_inside_their_card() {
        let entries = default_entries();
        let layout = PageLayout::new(&entries, 1200.0);
        let cmds = render_timeline(&layout, &entries, &VoyageFrame::default());
        let chips: Vec<Rect> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    rect,
                    color: ThemeToken::TagBackground,
                    ..
                } => Some(*rect),
                _ => None,
            })
            .collect();
        assert!(!chips.is_empty());

        let first = layout.card_rects()[0];
        let in_first = chips.iter().filter(|r| r.y > first.y && r.bottom() < first.bottom());
        for chip in in_first {
            assert!(chip.x >= first.x && chip.x + chip.w <= first.x + first.w);
        }
    }

    #[test]
    fn tags_past_the_card_edge_are_dropped() {
        let mut cmds = Vec::new();
        let tags = vec!["Rust".to_owned(), "a-very-long-tag-name".to_owned()];
        render_tags(&mut cmds, &tags, Point::new(0.0, 20.0), 60.0);
        assert_eq!(cmds.len(), 2);
        assert!(matches!(
            &cmds[1],
            RenderCommand::DrawText { text, color: ThemeToken::TagText, .. } if text == "Rust"
        ));
    }
}
