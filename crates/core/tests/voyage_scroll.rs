//! Integration test: lay out the portfolio page, scroll it top to bottom
//! and check the ship, the highlighted entry and the exported SVG.

use std::collections::BTreeMap;

use shipwake_core::svg::render_svg;
use shipwake_core::theme::{DARK, LIGHT};
use shipwake_core::views::timeline::{VoyageFrame, render_timeline};
use shipwake_core::{
    GeometryProvider, PageLayout, ScrollTracker, ThemeMode, ThemeSwitcher, ViewportEvent,
    WakeConfig, timeline,
};
use shipwake_protocol::MarkerPosition;

const VIEWPORT_HEIGHT: f64 = 800.0;

#[test]
fn scroll_whole_page_with_fixture_timeline() {
    let entries = timeline::load_entries(include_bytes!("fixtures/timeline.json"))
        .expect("failed to load timeline fixture");
    let config = WakeConfig::from_json(include_bytes!("fixtures/config.json"))
        .expect("failed to load config fixture");
    assert_eq!(entries.len(), 3);

    let layout = PageLayout::new(&entries, 1280.0);
    let mut tracker = ScrollTracker::new(config);
    let mut trail: Vec<MarkerPosition> = Vec::new();

    let mounted = tracker
        .mount(&layout.viewport(0.0, VIEWPORT_HEIGHT), &mut trail)
        .expect("layout has enough entries to mount");
    assert_eq!(mounted.progress, 0.0);
    assert_eq!(mounted.offset_y, Some(-14.0));

    let max = layout.max_scroll(VIEWPORT_HEIGHT);
    let mut scroll = 0.0;
    let mut seen_entries = Vec::new();
    while scroll < max {
        scroll = (scroll + 37.0).min(max);
        let view = layout.viewport(scroll, VIEWPORT_HEIGHT);
        tracker.handle_event(ViewportEvent::Scroll, &view, &mut trail);
        if let Some(active) = tracker.active_entry()
            && seen_entries.last() != Some(&active)
        {
            seen_entries.push(active);
        }
    }

    assert!(trail.windows(2).all(|w| w[1].progress >= w[0].progress));
    assert_eq!(trail.last().map(|m| m.progress), Some(1.0));
    assert_eq!(seen_entries, vec![0, 1, 2]);

    // Ship ends at the last card's centre line.
    let view = layout.viewport(max, VIEWPORT_HEIGHT);
    let last_card = *view.entry_rects().last().unwrap();
    let container = view.container_rect().unwrap();
    let end = trail.last().unwrap();
    assert!((end.y - (last_card.center_y() - container.y)).abs() < 1e-6);
}

#[test]
fn resize_resamples_without_rebuilding() {
    let entries = timeline::default_entries();
    let layout = PageLayout::new(&entries, 1280.0);
    let mut tracker = ScrollTracker::new(WakeConfig::default());
    let mut marker: Option<MarkerPosition> = None;
    let offset = layout.anchor_offset("hackathons").unwrap();

    tracker.mount(&layout.viewport(offset, VIEWPORT_HEIGHT), &mut marker);
    let before = marker.unwrap();
    let length = tracker.sampler().unwrap().path_length();

    // Taller viewport with the anchor at the same spot: the ship is
    // further along.
    tracker.handle_event(
        ViewportEvent::Resize,
        &layout.viewport(offset, 1400.0),
        &mut marker,
    );
    let after = marker.unwrap();
    assert!(after.progress > before.progress);
    assert_eq!(tracker.sampler().unwrap().path_length(), length);
}

#[test]
fn theme_toggle_and_svg_export() {
    let entries = timeline::default_entries();
    let layout = PageLayout::new(&entries, 1280.0);
    let mut tracker = ScrollTracker::new(WakeConfig::default());
    let mut marker: Option<MarkerPosition> = None;
    let offset = layout.anchor_offset("hackathons").unwrap();
    tracker.mount(&layout.viewport(offset + 400.0, VIEWPORT_HEIGHT), &mut marker);

    let mut switcher = ThemeSwitcher::new(BTreeMap::<String, String>::new());
    let light_vars = switcher.sink().clone();
    assert_eq!(switcher.toggle_theme(), ThemeMode::Dark);
    assert_ne!(switcher.sink(), &light_vars);

    let section = layout.timeline_rect();
    let commands = render_timeline(&layout, &entries, &VoyageFrame::from_tracker(&tracker));
    let svg = render_svg(&commands, section.w, section.h, switcher.table());
    assert!(svg.contains(r#"class="ship""#));
    assert!(svg.contains("IEEE Hackathon"));
    assert!(svg.contains(&DARK.color(shipwake_protocol::ThemeToken::Ship).to_hex()));
    assert!(!svg.contains(&LIGHT.color(shipwake_protocol::ThemeToken::Ship).to_hex()));

    switcher.toggle_theme();
    assert_eq!(switcher.into_sink(), light_vars);
}
