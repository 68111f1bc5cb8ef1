//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use shipwake_protocol::{RenderCommand, TextAlign, ThemeToken};

use crate::theme::ThemeTable;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions; colors are
/// resolved through `theme`.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, theme: &ThemeTable) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    ));
    svg.push_str(&format!(
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        color(theme, ThemeToken::Background),
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color: fill,
                border_color,
                label,
                ..
            } => {
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" rx="8""#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    color(theme, *fill),
                ));
                if let Some(border) = border_color {
                    svg.push_str(&format!(r#" stroke="{}""#, color(theme, *border)));
                }
                svg.push('>');
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color: stroke,
                width: line_width,
            } => {
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    color(theme, *stroke),
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color: fill,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    color(theme, *fill),
                    escape_xml(text),
                ));
            }
            RenderCommand::DrawPath {
                d,
                color: stroke,
                width: line_width,
                dashed,
                ..
            } => {
                svg.push_str(&format!(
                    r#"<path d="{d}" fill="none" stroke="{}" stroke-width="{line_width}" stroke-linecap="round""#,
                    color(theme, *stroke),
                ));
                if *dashed {
                    svg.push_str(r#" stroke-dasharray="10 8""#);
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawShip {
                center,
                heading_deg,
                size,
                color: fill,
            } => {
                // Hull pointing along +y, rotated to the path heading.
                let h = size / 2.0;
                svg.push_str(&format!(
                    r#"<g class="ship" transform="translate({} {}) rotate({})"><path d="M0 {h} L{} {} L0 {} L{} {} Z" fill="{}"/></g>"#,
                    center.x,
                    center.y,
                    -heading_deg,
                    h * 0.6,
                    -h,
                    -h * 0.5,
                    -h * 0.6,
                    -h,
                    color(theme, *fill),
                ));
            }
            RenderCommand::PushTransform { translate } => {
                svg.push_str(&format!(
                    r#"<g transform="translate({} {})">"#,
                    translate.x, translate.y
                ));
            }
            RenderCommand::BeginGroup { id, .. } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
            }
            RenderCommand::PopTransform | RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn color(theme: &ThemeTable, token: ThemeToken) -> String {
    theme.color(token).to_hex()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
