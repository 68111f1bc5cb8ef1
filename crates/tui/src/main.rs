mod renderer;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shipwake_core::svg::render_svg;
use shipwake_core::views::timeline::{VoyageFrame, render_timeline};
use shipwake_core::{PageLayout, ScrollTracker, ThemeMode, TimelineEntry, WakeConfig, timeline};
use shipwake_protocol::MarkerPosition;
use tracing_subscriber::EnvFilter;

/// Virtual page width the layout is computed at, in px.
const PAGE_WIDTH: f64 = 1200.0;
const SVG_VIEWPORT_HEIGHT: f64 = 800.0;

#[derive(Debug, Parser)]
#[command(name = "shipwake", version, about = "Preview the portfolio voyage timeline")]
struct Cli {
    /// Timeline entries as a JSON array (defaults to the built-in hackathons)
    #[arg(long, global = true)]
    timeline: Option<PathBuf>,

    /// Curve and tracker settings as JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Initial theme
    #[arg(long, global = true, default_value = "light")]
    theme: ThemeMode,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scroll through the page in the terminal (default)
    Preview,
    /// Write the timeline section as a standalone SVG
    Svg {
        /// Scroll progress to draw the ship at, 0.0 to 1.0
        #[arg(long, default_value_t = 0.5)]
        progress: f64,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let entries = load_entries(cli.timeline.as_deref())?;
    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Preview) {
        Command::Preview => renderer::run_preview(&entries, config, cli.theme),
        Command::Svg { progress, out } => {
            // The preview owns the terminal, so only the export logs.
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
            export_svg(&entries, config, cli.theme, progress, out.as_deref())
        }
    }
}

fn load_entries(path: Option<&Path>) -> Result<Vec<TimelineEntry>> {
    let Some(path) = path else {
        return Ok(timeline::default_entries());
    };
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    timeline::load_entries(&data).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<WakeConfig> {
    let Some(path) = path else {
        return Ok(WakeConfig::default());
    };
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    WakeConfig::from_json(&data).with_context(|| format!("parsing {}", path.display()))
}

/// Document scroll offset at which the timeline reaches `progress`.
fn scroll_for_progress(layout: &PageLayout, viewport_height: f64, offset: f64, progress: f64) -> f64 {
    let section = layout.timeline_rect();
    let span = viewport_height + section.h - offset;
    let bottom_in_viewport = offset + (1.0 - progress.clamp(0.0, 1.0)) * span;
    section.bottom() - bottom_in_viewport
}

fn export_svg(
    entries: &[TimelineEntry],
    config: WakeConfig,
    theme: ThemeMode,
    progress: f64,
    out: Option<&Path>,
) -> Result<()> {
    let layout = PageLayout::new(entries, PAGE_WIDTH);
    let scroll = scroll_for_progress(
        &layout,
        SVG_VIEWPORT_HEIGHT,
        config.tracker.scroll_offset,
        progress,
    );
    let view = layout.viewport(scroll, SVG_VIEWPORT_HEIGHT);

    let mut tracker = ScrollTracker::new(config);
    let mut marker: Option<MarkerPosition> = None;
    if tracker.mount(&view, &mut marker).is_none() {
        tracing::warn!(
            entries = entries.len(),
            "not enough timeline entries for a voyage path"
        );
    }
    tracing::debug!(
        requested = progress,
        actual = tracker.progress(),
        scroll,
        "exporting timeline"
    );

    let section = layout.timeline_rect();
    let commands = render_timeline(&layout, entries, &VoyageFrame::from_tracker(&tracker));
    let svg = render_svg(&commands, section.w, section.h, theme.table());

    match out {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote svg");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(svg.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipwake_core::compute_progress;

    #[test]
    fn scroll_for_progress_inverts_the_tracker() {
        let layout = PageLayout::new(&timeline::default_entries(), PAGE_WIDTH);
        for p in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let scroll = scroll_for_progress(&layout, SVG_VIEWPORT_HEIGHT, 100.0, p);
            let view = layout.viewport(scroll, SVG_VIEWPORT_HEIGHT);
            assert_eq!(view.scroll_y(), scroll, "scroll clamped for p={p}");
            let anchor = layout.timeline_rect().translated_y(-scroll);
            let actual = compute_progress(&anchor, SVG_VIEWPORT_HEIGHT);
            assert!((actual - p).abs() < 1e-9, "p={p} actual={actual}");
        }
    }

    #[test]
    fn cli_parses_svg_subcommand() {
        let cli = Cli::parse_from(["shipwake", "--theme", "dark", "svg", "--progress", "0.3"]);
        assert_eq!(cli.theme, ThemeMode::Dark);
        assert!(matches!(cli.command, Some(Command::Svg { progress, out: None }) if progress == 0.3));
    }
}
