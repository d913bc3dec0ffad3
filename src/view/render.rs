//! Scene rendering.
//!
//! Draws the header and the visible body lines into their layout areas.
//! Every area is intersected with the frame first, so a layout that is a
//! step behind a resize never writes outside the buffer.

use crate::config::Alignment;
use crate::parser::Markup;
use crate::state::{BodyScene, Scene};
use crate::view_state::{Area, Layout};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

/// Render a complete scene.
pub fn render_scene(frame: &mut Frame, scene: &Scene<'_>) {
    let frame_area = frame.area();
    let base = Style::default().fg(scene.foreground).bg(scene.background);

    if let Some(header) = scene.header {
        let area = clip(scene.layout.title, frame_area);
        render_markup(frame, area, header, scene.title_align, base);
    }

    if let Some(body) = &scene.body {
        let highlight = Style::default().fg(scene.background).bg(scene.foreground);
        render_body(frame, scene.layout, body, base, highlight);
    }
}

fn render_body(frame: &mut Frame, layout: &Layout, body: &BodyScene<'_>, base: Style, highlight: Style) {
    let frame_area = frame.area();
    let slave = clip(layout.slave, frame_area);
    if !slave.is_empty() {
        frame.render_widget(Block::default().style(base), slave);
    }

    for (index, (text, area)) in body.lines.iter().zip(&layout.lines).enumerate() {
        let style = if body.highlighted == Some(index) { highlight } else { base };
        let markup = Markup::parse(text);
        render_markup(frame, clip(*area, frame_area), &markup, body.align, style);
    }
}

/// Fill `area` with `style` and draw the markup at its aligned offset.
fn render_markup(frame: &mut Frame, area: Rect, markup: &Markup, align: Alignment, style: Style) {
    if area.is_empty() {
        return;
    }
    frame.render_widget(Block::default().style(style), area);

    let offset = align.offset(area.width, markup.width());
    let text_area = Rect {
        x: area.x + offset,
        width: area.width - offset,
        ..area
    };
    frame.render_widget(Paragraph::new(markup_line(markup)), text_area);
}

/// Styled spans of a markup line; colours left unset keep the fill.
fn markup_line(markup: &Markup) -> Line<'_> {
    let spans: Vec<Span> = markup
        .spans
        .iter()
        .map(|span| {
            let mut style = Style::default();
            if let Some(fg) = span.fg {
                style = style.fg(fg);
            }
            if let Some(bg) = span.bg {
                style = style.bg(bg);
            }
            Span::styled(span.text.as_str(), style)
        })
        .collect();
    Line::from(spans)
}

fn clip(area: Area, frame_area: Rect) -> Rect {
    area.to_rect().intersection(frame_area)
}
