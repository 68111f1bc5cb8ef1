use std::collections::BTreeMap;
use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use shipwake_core::layout::{NAV_HEIGHT, NAV_LINKS};
use shipwake_core::theme::ThemeTable;
use shipwake_core::views::timeline::{VoyageFrame, render_timeline};
use shipwake_core::{
    PageLayout, ScrollTracker, ThemeMode, ThemeSwitcher, TimelineEntry, ViewportEvent, WakeConfig,
};
use shipwake_protocol::{MarkerPosition, Point, RenderCommand, TextAlign, ThemeToken};

use crate::PAGE_WIDTH;

/// Document pixels per terminal row.
const PX_PER_ROW: f64 = 16.0;
const SCROLL_STEP: f64 = 3.0 * PX_PER_ROW;

fn to_color(table: &ThemeTable, token: ThemeToken) -> Color {
    let c = table.color(token);
    Color::Rgb(c.r, c.g, c.b)
}

struct Preview<'a> {
    entries: &'a [TimelineEntry],
    layout: PageLayout,
    tracker: ScrollTracker,
    /// CSS variables as a browser would hold them; colors are read from
    /// the switcher's active table.
    theme: ThemeSwitcher<BTreeMap<String, String>>,
    scroll_y: f64,
    viewport_height: f64,
}

impl Preview<'_> {
    fn dispatch(&mut self, event: ViewportEvent) {
        let view = self.layout.viewport(self.scroll_y, self.viewport_height);
        self.scroll_y = view.scroll_y();
        let mut marker: Option<MarkerPosition> = None;
        self.tracker.handle_event(event, &view, &mut marker);
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
        self.dispatch(ViewportEvent::Scroll);
    }

    fn resize(&mut self, body_rows: u16) {
        let height = f64::from(body_rows) * PX_PER_ROW;
        if height != self.viewport_height {
            self.viewport_height = height;
            self.dispatch(ViewportEvent::Resize);
        }
    }

    /// Section the nav bar would highlight.
    fn current_section(&self) -> usize {
        self.layout
            .sections()
            .iter()
            .rposition(|s| s.rect.y <= self.scroll_y + NAV_HEIGHT)
            .unwrap_or(0)
    }
}

pub fn run_preview(entries: &[TimelineEntry], config: WakeConfig, theme: ThemeMode) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut preview = Preview {
        entries,
        layout: PageLayout::new(entries, PAGE_WIDTH),
        tracker: ScrollTracker::new(config),
        theme: ThemeSwitcher::with_mode(BTreeMap::new(), theme),
        scroll_y: 0.0,
        viewport_height: 0.0,
    };
    let size = terminal.size()?;
    preview.viewport_height = f64::from(size.height.saturating_sub(2)) * PX_PER_ROW;
    preview.dispatch(ViewportEvent::Mount);

    let result = event_loop(&mut terminal, &mut preview);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    preview: &mut Preview<'_>,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        preview.resize(size.height.saturating_sub(2));

        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();
            draw_nav(buf, area, preview);
            let body = Rect::new(0, 1, area.width, area.height.saturating_sub(2));
            draw_page(buf, body, preview);
            draw_status(buf, area, preview);
        })?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let page = preview.viewport_height;
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Up | KeyCode::Char('k') => preview.scroll_to(preview.scroll_y - SCROLL_STEP),
                KeyCode::Down | KeyCode::Char('j') => {
                    preview.scroll_to(preview.scroll_y + SCROLL_STEP);
                }
                KeyCode::PageUp => preview.scroll_to(preview.scroll_y - page),
                KeyCode::PageDown | KeyCode::Char(' ') => preview.scroll_to(preview.scroll_y + page),
                KeyCode::Home => preview.scroll_to(0.0),
                KeyCode::End => preview.scroll_to(f64::INFINITY),
                KeyCode::Char('t') => {
                    preview.theme.toggle_theme();
                }
                KeyCode::Char(c @ '1'..='7') => {
                    let index = c as usize - '1' as usize;
                    let id = NAV_LINKS[index].0;
                    if let Some(y) = preview.layout.anchor_offset(id) {
                        preview.scroll_to(y);
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => preview.scroll_to(preview.scroll_y + SCROLL_STEP),
                MouseEventKind::ScrollUp => preview.scroll_to(preview.scroll_y - SCROLL_STEP),
                _ => {}
            },
            _ => {}
        }
    }
    Ok(())
}

fn draw_nav(buf: &mut Buffer, area: Rect, preview: &Preview<'_>) {
    let table = preview.theme.table();
    let bg = to_color(table, ThemeToken::NavBackground);
    let fg = to_color(table, ThemeToken::NavText);
    let accent = to_color(table, ThemeToken::Accent);
    buf.set_style(Rect::new(0, 0, area.width, 1), Style::default().bg(bg).fg(fg));

    let current = preview.current_section();
    let mut x = 1u16;
    for (i, (_, label)) in NAV_LINKS.iter().enumerate() {
        let text = format!("{} {label}", i + 1);
        let style = if i == current {
            Style::default().bg(bg).fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(bg).fg(fg)
        };
        if x >= area.width {
            break;
        }
        let (next_x, _) = buf.set_stringn(x, 0, &text, usize::from(area.width - x), style);
        x = next_x.saturating_add(2);
    }
}

fn draw_status(buf: &mut Buffer, area: Rect, preview: &Preview<'_>) {
    if area.height < 2 {
        return;
    }
    let table = preview.theme.table();
    let y = area.height - 1;
    let style = Style::default()
        .bg(to_color(table, ThemeToken::Surface))
        .fg(to_color(table, ThemeToken::TextMuted));
    buf.set_style(Rect::new(0, y, area.width, 1), style);
    let active = preview
        .tracker
        .active_entry()
        .and_then(|i| preview.entries.get(i))
        .map_or("-", |e| e.title.as_str());
    let status = format!(
        " voyage {:>3.0}% | {active} | {} theme | ↑↓ scroll  1-7 jump  t theme  q quit ",
        preview.tracker.progress() * 100.0,
        preview.theme.mode(),
    );
    buf.set_stringn(0, y, status, usize::from(area.width), style);
}

fn draw_page(buf: &mut Buffer, body: Rect, preview: &Preview<'_>) {
    let table = preview.theme.table();
    buf.set_style(
        body,
        Style::default()
            .bg(to_color(table, ThemeToken::Background))
            .fg(to_color(table, ThemeToken::TextPrimary)),
    );

    let mut painter = CellPainter {
        buf,
        area: body,
        col_per_px: f64::from(body.width) / preview.layout.width(),
        origin: vec![Point::new(0.0, -preview.scroll_y)],
        table,
    };

    let timeline = preview.layout.timeline_rect();
    for section in preview.layout.sections() {
        if section.rect.y == timeline.y {
            continue;
        }
        painter.paint(&RenderCommand::DrawText {
            position: Point::new(section.rect.center_x(), section.rect.y + 48.0),
            text: section.title.to_owned(),
            color: ThemeToken::TextPrimary,
            font_size: 26.0,
            align: TextAlign::Center,
        });
        painter.paint(&RenderCommand::DrawLine {
            from: Point::new(0.0, section.rect.bottom()),
            to: Point::new(section.rect.w, section.rect.bottom()),
            color: ThemeToken::CardBorder,
            width: 1.0,
        });
    }

    let commands = render_timeline(
        &preview.layout,
        preview.entries,
        &VoyageFrame::from_tracker(&preview.tracker),
    );
    painter.push(Point::new(timeline.x, timeline.y));
    for cmd in &commands {
        painter.paint(cmd);
    }
}

/// Paints render commands onto terminal cells. Document pixels map to
/// cells at `col_per_px` horizontally and `PX_PER_ROW` vertically.
struct CellPainter<'b> {
    buf: &'b mut Buffer,
    area: Rect,
    col_per_px: f64,
    /// Translation stack; the sum of all entries is the current origin.
    origin: Vec<Point>,
    table: &'static ThemeTable,
}

impl CellPainter<'_> {
    fn push(&mut self, translate: Point) {
        self.origin.push(translate);
    }

    fn offset(&self) -> Point {
        self.origin
            .iter()
            .fold(Point::ORIGIN, |acc, p| Point::new(acc.x + p.x, acc.y + p.y))
    }

    /// Cell coordinates for a point, or `None` when off screen.
    fn cell(&self, p: Point) -> Option<(u16, u16)> {
        let o = self.offset();
        let col = ((p.x + o.x) * self.col_per_px).floor();
        let row = ((p.y + o.y) / PX_PER_ROW).floor();
        if col < 0.0 || row < 0.0 || col >= f64::from(self.area.width) || row >= f64::from(self.area.height) {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    fn put(&mut self, p: Point, ch: char, fg: Color) {
        if let Some((x, y)) = self.cell(p) {
            self.buf[(x, y)].set_char(ch).set_fg(fg);
        }
    }

    fn stroke(&mut self, from: Point, to: Point, ch: char, fg: Color) {
        let cols = ((to.x - from.x) * self.col_per_px).abs();
        let rows = ((to.y - from.y) / PX_PER_ROW).abs();
        let steps = cols.max(rows).ceil().max(1.0) as usize;
        for i in 0..=steps {
            self.put(from.lerp(to, i as f64 / steps as f64), ch, fg);
        }
    }

    fn paint(&mut self, cmd: &RenderCommand) {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                ..
            } => {
                let o = self.offset();
                let left = (rect.x + o.x) * self.col_per_px;
                let right = (rect.x + rect.w + o.x) * self.col_per_px;
                let top = (rect.y + o.y) / PX_PER_ROW;
                let bottom = (rect.y + rect.h + o.y) / PX_PER_ROW;
                let clip = |v: f64, max: u16| v.clamp(0.0, f64::from(max)) as u16;
                let x0 = clip(left.floor(), self.area.width);
                let x1 = clip(right.ceil(), self.area.width);
                let y0 = clip(top.floor(), self.area.height);
                let y1 = clip(bottom.ceil(), self.area.height);
                let bg = to_color(self.table, *color);
                let edge = border_color.map(|b| to_color(self.table, b));
                for y in y0..y1 {
                    for x in x0..x1 {
                        let cell = &mut self.buf[(self.area.x + x, self.area.y + y)];
                        cell.set_bg(bg);
                        if let Some(fg) = edge {
                            let on_x = x == x0 || x + 1 == x1;
                            let on_y = y == y0 || y + 1 == y1;
                            let ch = match (on_x, on_y) {
                                (true, true) => '+',
                                (false, true) => '─',
                                (true, false) => '│',
                                (false, false) => ' ',
                            };
                            cell.set_char(ch).set_fg(fg);
                        } else {
                            cell.set_char(' ');
                        }
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let width = text.chars().count() as f64 / self.col_per_px;
                let x = match align {
                    TextAlign::Left => position.x,
                    TextAlign::Center => position.x - width / 2.0,
                    TextAlign::Right => position.x - width,
                };
                // Baseline sits at the bottom of the text row.
                let Some((col, row)) = self.cell(Point::new(x, position.y - PX_PER_ROW / 2.0)) else {
                    return;
                };
                let room = usize::from(self.area.x + self.area.width - col);
                let fg = to_color(self.table, *color);
                let cells: Vec<(u16, char)> = text
                    .chars()
                    .take(room)
                    .enumerate()
                    .map(|(i, ch)| (col + i as u16, ch))
                    .collect();
                for (x, ch) in cells {
                    self.buf[(x, row)].set_char(ch).set_fg(fg);
                }
            }
            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                let ch = if (from.y - to.y).abs() < f64::EPSILON { '─' } else { '·' };
                let fg = to_color(self.table, *color);
                self.stroke(*from, *to, ch, fg);
            }
            RenderCommand::DrawPath {
                polyline, color, ..
            } => {
                let fg = to_color(self.table, *color);
                for pair in polyline.windows(2) {
                    self.stroke(pair[0], pair[1], '•', fg);
                }
            }
            RenderCommand::DrawShip {
                center,
                heading_deg,
                color,
                ..
            } => {
                let ch = match *heading_deg {
                    h if h > 30.0 => '◣',
                    h if h < -30.0 => '◢',
                    _ => '▼',
                };
                let fg = to_color(self.table, *color);
                if let Some((x, y)) = self.cell(*center) {
                    self.buf[(x, y)]
                        .set_char(ch)
                        .set_fg(fg)
                        .set_style(Style::default().add_modifier(Modifier::BOLD));
                }
            }
            RenderCommand::PushTransform { translate } => self.push(*translate),
            RenderCommand::PopTransform => {
                self.origin.pop();
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwake_core::theme::LIGHT;

    fn painter(buf: &mut Buffer) -> CellPainter<'_> {
        let area = buf.area;
        CellPainter {
            buf,
            area,
            col_per_px: 0.1,
            origin: vec![Point::ORIGIN],
            table: &LIGHT,
        }
    }

    #[test]
    fn ship_glyph_follows_transform_stack() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 20));
        let mut p = painter(&mut buf);
        p.paint(&RenderCommand::PushTransform {
            translate: Point::new(100.0, 32.0),
        });
        p.paint(&RenderCommand::PopTransform);
        p.paint(&RenderCommand::PushTransform {
            translate: Point::new(100.0, 32.0),
        });
        p.paint(&RenderCommand::DrawShip {
            center: Point::new(0.0, 0.0),
            heading_deg: 0.0,
            size: 28.0,
            color: ThemeToken::Ship,
        });
        assert_eq!(buf[(10, 2)].symbol(), "▼");
    }

    #[test]
    fn path_strokes_have_no_gaps() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 20));
        let mut p = painter(&mut buf);
        p.paint(&RenderCommand::DrawPath {
            d: String::new(),
            polyline: vec![Point::new(50.0, 0.0), Point::new(50.0, 160.0)],
            color: ThemeToken::PathStroke,
            width: 3.0,
            dashed: true,
        });
        for row in 0..10 {
            assert_eq!(buf[(5, row)].symbol(), "•", "row {row}");
        }
    }

    #[test]
    fn offscreen_text_is_skipped() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 4));
        let mut p = painter(&mut buf);
        p.paint(&RenderCommand::DrawText {
            position: Point::new(20.0, -200.0),
            text: "PyExpo".into(),
            color: ThemeToken::TextPrimary,
            font_size: 14.0,
            align: TextAlign::Left,
        });
        assert!((0..10).all(|x| buf[(x, 0)].symbol() == " "));
    }
}
