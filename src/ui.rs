//! Terminal UI rendering with ratatui

use crate::scene::SceneSprite;
use matchgrid::settings::BlockStyle;
use matchgrid::{CellKind, Coord, Level};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::collections::HashSet;

const EMPTY: &str = "  ";
const WALL: &str = "▓▓";
const FLOOR: &str = "··";
/// Each cell is two terminal columns wide
const CELL_WIDTH: u16 = 2;
const SIDE_PANEL_WIDTH: u16 = 26;

/// How a palette entry is drawn
#[derive(Debug, Clone)]
pub struct PieceStyle {
    pub glyph: String,
    pub color: Color,
}

impl PieceStyle {
    /// Build styles from a validated palette
    pub fn from_palette(palette: &[BlockStyle]) -> Vec<Self> {
        palette
            .iter()
            .map(|style| {
                let color = style
                    .rgb()
                    .map(|(r, g, b)| Color::Rgb(r, g, b))
                    .unwrap_or(Color::White);
                let glyph = style.glyph.chars().next().unwrap_or('●');
                Self {
                    glyph: format!("{glyph} "),
                    color,
                }
            })
            .collect()
    }
}

/// Everything the frame needs, gathered by the caller
pub struct View<'a> {
    pub level: &'a Level,
    pub sprites: &'a [SceneSprite],
    pub styles: &'a [PieceStyle],
    pub cursor: Coord,
    pub grabbed: Option<Coord>,
    /// Cells that take part in a destructive swap, when hints are on
    pub hints: Option<HashSet<Coord>>,
    pub locked: bool,
    pub legal_swaps: usize,
    pub status: &'a str,
    pub error: Option<&'a str>,
}

/// Screen area of the board including its border
pub fn board_rect(area: Rect, level: &Level) -> Rect {
    let board_width = level.width() as u16 * CELL_WIDTH + 2;
    let board_height = level.height() as u16 + 2;
    let outer = center_rect(area, board_width + SIDE_PANEL_WIDTH, board_height.max(12));
    Rect {
        x: outer.x,
        y: outer.y,
        width: board_width.min(outer.width),
        height: board_height.min(outer.height),
    }
}

/// The cell under a terminal position, if it is inside the board
pub fn cell_at(area: Rect, level: &Level, column: u16, row: u16) -> Option<Coord> {
    let board = board_rect(area, level);
    let inner_x = column.checked_sub(board.x + 1)?;
    let inner_y = row.checked_sub(board.y + 1)?;
    let coord = Coord::new(
        (inner_x / CELL_WIDTH) as i32,
        level.height() - 1 - inner_y as i32,
    );
    level.contains(coord).then_some(coord)
}

pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();
    let board = board_rect(area, view.level);

    render_board(frame, board, view);

    let panel = Rect {
        x: board.x + board.width,
        y: board.y,
        width: SIDE_PANEL_WIDTH.min(area.width.saturating_sub(board.x + board.width)),
        height: board.height.max(12).min(area.height.saturating_sub(board.y)),
    };
    render_side_panel(frame, panel, view);

    if let Some(error) = view.error {
        render_overlay(frame, area, "ERROR", error);
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn render_board(frame: &mut Frame, area: Rect, view: &View) {
    let level = view.level;
    let border = if view.locked { Color::DarkGray } else { Color::White };
    let block = Block::default()
        .title(" MATCHGRID ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Sprites snap to the nearest cell; later sprites win on overlap
    let mut sprites: Vec<Vec<Option<SceneSprite>>> =
        vec![vec![None; level.width() as usize]; level.height() as usize];
    for sprite in view.sprites {
        let x = sprite.position.x.round() as i32;
        let y = sprite.position.y.round() as i32;
        if level.contains(Coord::new(x, y)) {
            sprites[y as usize][x as usize] = Some(*sprite);
        }
    }

    let mut lines: Vec<Line> = Vec::new();
    // Top row first, since row 0 is the bottom of the board
    for y in (0..level.height()).rev() {
        let mut spans = Vec::new();
        for x in 0..level.width() {
            let coord = Coord::new(x, y);
            let (text, mut style) = match sprites[y as usize][x as usize] {
                Some(sprite) => sprite_cell(sprite, view.styles),
                None => match level.kind_of(coord) {
                    CellKind::Wall => (WALL.to_string(), Style::default().fg(Color::DarkGray)),
                    CellKind::Floor => (FLOOR.to_string(), Style::default().fg(Color::Rgb(60, 60, 70))),
                    CellKind::OutOfBounds => (EMPTY.to_string(), Style::default()),
                },
            };

            if view.hints.as_ref().is_some_and(|h| h.contains(&coord)) {
                style = style.underlined();
            }
            if view.grabbed == Some(coord) {
                style = style.bg(Color::Rgb(90, 70, 20));
            } else if view.cursor == coord {
                style = style.bg(Color::Rgb(50, 50, 60));
            }
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

fn sprite_cell(sprite: SceneSprite, styles: &[PieceStyle]) -> (String, Style) {
    let Some(piece) = styles.get(sprite.color.index()) else {
        return ("??".to_string(), Style::default().fg(Color::Red));
    };
    if sprite.flashing {
        return ("✶ ".to_string(), Style::default().fg(Color::White).bold());
    }
    (piece.glyph.clone(), Style::default().fg(piece.color).bold())
}

fn render_side_panel(frame: &mut Frame, area: Rect, view: &View) {
    if area.width < 4 {
        return;
    }
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[0]);
    frame.render_widget(block, layout[0]);

    let (state, state_color) = if view.locked {
        ("BUSY", Color::Yellow)
    } else {
        ("READY", Color::Green)
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("STATE ", Style::default().fg(Color::Gray)),
            Span::styled(state, Style::default().fg(state_color).bold()),
        ]),
        Line::from(vec![
            Span::styled("SWAPS ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{}", view.legal_swaps), Style::default().fg(Color::Cyan)),
        ]),
        Line::raw(""),
        Line::styled(view.status.to_string(), Style::default().fg(Color::Magenta)),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    let hints = vec![
        Line::styled("arrows/hjkl  move", Style::default().fg(Color::DarkGray)),
        Line::styled("space        grab", Style::default().fg(Color::DarkGray)),
        Line::styled("tab          hints", Style::default().fg(Color::DarkGray)),
        Line::styled("mouse drag   swap", Style::default().fg(Color::DarkGray)),
        Line::styled("q            quit", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(hints), layout[1]);
}

/// Render an overlay with a title and a message
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup_width = (message.chars().count() as u16 + 4).clamp(24, area.width.max(24));
    let popup_area = center_rect(area, popup_width, 5);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Red).bold()),
        Line::raw(""),
        Line::styled(message, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_maps_screen_to_board() {
        let level = Level::parse("####\n....\n....").unwrap();
        let area = Rect::new(0, 0, 80, 24);
        let board = board_rect(area, &level);
        // Top-left inner cell is the top row
        assert_eq!(cell_at(area, &level, board.x + 1, board.y + 1), Some(Coord::new(0, 2)));
        // Second terminal column of a cell maps to the same cell
        assert_eq!(cell_at(area, &level, board.x + 4, board.y + 3), Some(Coord::new(1, 0)));
        // The border is not a cell
        assert_eq!(cell_at(area, &level, board.x, board.y), None);
        assert_eq!(cell_at(area, &level, board.x + 1, board.y + 4), None);
    }

    #[test]
    fn test_palette_styles() {
        let styles = PieceStyle::from_palette(&[BlockStyle::new("red", "R", "#ff0000")]);
        assert_eq!(styles[0].glyph, "R ");
        assert_eq!(styles[0].color, Color::Rgb(255, 0, 0));
    }
}
