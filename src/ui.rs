//! Terminal UI rendering with ratatui

use crate::board::{Cell, Offset, BOARD_HEIGHT};
use crate::game::{Game, GameState};
use crate::highscore::{HighScoreScreen, MAX_HIGH_SCORES};
use crate::menu::Menu;
use crate::settings::Settings;
use crate::tetromino::{occupied_cells, PieceColor, PieceKind, MASK_SIZE};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Total width needed: hold(12) + board(22) + next/stats(16) = 50
const GAME_WIDTH: u16 = 50;
/// Total height needed: board(20) + 2 for borders
const GAME_HEIGHT: u16 = 22;

const MENU_WIDTH: u16 = 44;
const MENU_HEIGHT: u16 = 16;

const TABLE_WIDTH: u16 = 40;
const TABLE_HEIGHT: u16 = 18;

/// Terminal color for a piece color
fn piece_color(color: PieceColor) -> Color {
    match color {
        PieceColor::White => Color::White,
        PieceColor::Red => Color::Red,
        PieceColor::Yellow => Color::Yellow,
        PieceColor::Blue => Color::Blue,
        PieceColor::Magenta => Color::Magenta,
        PieceColor::Cyan => Color::Cyan,
        PieceColor::Green => Color::Green,
    }
}

/// Render the main menu
pub fn render_menu(frame: &mut Frame, menu: &Menu) {
    let area = frame.area();
    let menu_area = center_rect(area, MENU_WIDTH, MENU_HEIGHT);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8)])
        .split(menu_area);

    let title_lines = vec![
        Line::raw(""),
        Line::styled("B L O C K F A L L", Style::default().fg(Color::Cyan).bold()),
    ];
    let title = Paragraph::new(title_lines).alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));

    for (i, item) in menu.items.iter().enumerate() {
        let (prefix, style) = if i == menu.selected {
            ("▶ ", Style::default().fg(Color::Yellow).bold())
        } else {
            ("  ", Style::default().fg(Color::White))
        };
        lines.push(Line::styled(format!("{}{}", prefix, item.label), style));
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(
        "↑↓ Select  Enter Confirm  Q Quit",
        Style::default().fg(Color::DarkGray),
    ));

    let menu_text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(menu_text, inner);
}

/// Render the entire play screen
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let (block_char, _) = settings.visual.block_chars();

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // hold | board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(22),
            Constraint::Length(16),
        ])
        .split(game_area);

    render_piece_box(frame, main_layout[0], " HOLD ", game.held, block_char);
    render_board(frame, main_layout[1], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(9)])
        .split(main_layout[2]);

    render_piece_box(
        frame,
        right_layout[0],
        " NEXT ",
        Some(game.next.kind),
        block_char,
    );
    render_stats(frame, right_layout[1], game);

    match game.state {
        GameState::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        GameState::GameOver => render_overlay(frame, area, "GAME OVER", ""),
        GameState::Playing => {}
    }
}

/// Render the high score table, highlighting the row being typed
pub fn render_high_scores(frame: &mut Frame, screen: &HighScoreScreen) {
    let area = frame.area();
    let table_area = center_rect(area, TABLE_WIDTH, TABLE_HEIGHT);

    let block = Block::default()
        .title(" HIGH SCORES ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(table_area);
    frame.render_widget(block, table_area);

    let mut lines = vec![Line::raw("")];
    let entries = screen.ledger.entries();

    for rank in 0..MAX_HIGH_SCORES {
        let line = match entries.get(rank) {
            Some(entry) => {
                let typing = screen.typing() == Some(rank);
                let name = if typing {
                    format!("{}_", entry.name)
                } else {
                    entry.name.clone()
                };
                let style = if typing {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::White)
                };
                Line::styled(
                    format!("{:>2}. {:<16}{:>10}", rank + 1, name, entry.score),
                    style,
                )
            }
            None => Line::styled(
                format!("{:>2}. {:<16}{:>10}", rank + 1, "---", "-"),
                Style::default().fg(Color::DarkGray),
            ),
        };
        lines.push(line);
    }

    lines.push(Line::raw(""));
    let hint = if screen.is_typing() {
        "New high score! Type name, Enter"
    } else {
        "Enter Back"
    };
    lines.push(Line::styled(hint, Style::default().fg(Color::DarkGray)));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
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

/// Render a titled box holding a single piece preview (hold and next)
fn render_piece_box(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    kind: Option<PieceKind>,
    block_char: &str,
) {
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(kind) = kind {
        render_mini_piece(frame, inner, kind, block_char);
    }
}

/// Render a piece in its spawn orientation, trimmed to its occupied rows
fn render_mini_piece(frame: &mut Frame, area: Rect, kind: PieceKind, block_char: &str) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let color = piece_color(kind.color());
    let mask = &kind.shapes()[0];
    let cells: Vec<(usize, usize)> = occupied_cells(mask).collect();
    let (Some(min_row), Some(max_row)) = (
        cells.iter().map(|(r, _)| *r).min(),
        cells.iter().map(|(r, _)| *r).max(),
    ) else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    for row in min_row..=max_row {
        let spans: Vec<Span> = (0..MASK_SIZE)
            .map(|col| {
                if mask[row][col] {
                    Span::styled(block_char, Style::default().fg(color))
                } else {
                    Span::raw(EMPTY)
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Is board cell (row, col) covered by the current piece placed at `offset`
fn covered_by(game: &Game, offset: Offset, row: usize, col: usize) -> bool {
    let (r, c) = (row as i32 - offset.y, col as i32 - offset.x);
    (0..MASK_SIZE as i32).contains(&r)
        && (0..MASK_SIZE as i32).contains(&c)
        && game.current.mask()[r as usize][c as usize]
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();
    let show_ghost = settings.visual.show_ghost && game.state != GameState::GameOver;
    let ghost = game.landing_offset();
    let current_color = piece_color(game.current.color());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::with_capacity(BOARD_HEIGHT);

    for (row, cells) in game.board.rows().enumerate() {
        let spans: Vec<Span> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                if covered_by(game, game.position, row, col) {
                    Span::styled(block_char, Style::default().fg(current_color))
                } else if let Cell::Filled(color) = cell {
                    Span::styled(block_char, Style::default().fg(piece_color(*color)))
                } else if show_ghost && covered_by(game, ghost, row, col) {
                    Span::styled(ghost_char, Style::default().fg(current_color).dim())
                } else {
                    Span::raw(EMPTY)
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.score.points),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LEVEL", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.score.level),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", game.score.lines),
            Style::default().fg(Color::Green),
        )),
    ];

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 24, 5);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscore::Ledger;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn buffer_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn draw(render: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(render).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_center_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(center_rect(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(center_rect(area, 40, 40), Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn test_menu_shows_items() {
        let menu = Menu::new();
        let text = draw(|f| render_menu(f, &menu));
        assert!(text.contains("Play"));
        assert!(text.contains("High Scores"));
    }

    #[test]
    fn test_game_shows_stats_and_pause() {
        let mut game = Game::with_seed(3);
        game.process_action(crate::game::Action::Pause);
        let settings = Settings::default();
        let text = draw(|f| render_game(f, &game, &settings));
        assert!(text.contains("SCORE"));
        assert!(text.contains("NEXT"));
        assert!(text.contains("PAUSED"));
    }

    #[test]
    fn test_high_scores_marks_typing_row() {
        let mut ledger = Ledger::new();
        ledger.insert("ANN".to_string(), 900);
        let mut screen = HighScoreScreen::new(ledger);
        screen.record_new_high_score(500);
        let text = draw(|f| render_high_scores(f, &screen));
        assert!(text.contains("ANN"));
        assert!(text.contains("_"));
        assert!(text.contains("New high score!"));
    }
}
