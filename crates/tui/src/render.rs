//! Board rendering: cell roles, their glyphs and colours.

use pegsol_core::{Cell, Coord, GameSession, Phase};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub const PEG_GLYPH: &str = "●";
pub const HOLE_GLYPH: &str = "○";
pub const PENDING_CURSOR_GLYPH: &str = "◎";
pub const PENDING_FROM_GLYPH: &str = "◆";
pub const EATEN_GLYPH: &str = "×";

/// Colour palette shared by all panels.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary_fg: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub muted: Color,
    pub selection_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            accent_alt: Color::Blue,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

/// What a single board position shows on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    OutOfShape,
    Hole,
    Peg,
    /// Cursor while choosing the peg to move.
    Cursor(Cell),
    /// Cursor while choosing where the selected peg lands.
    PendingCursor(Cell),
    /// The peg waiting to jump.
    PendingFrom,
    /// Hole left by the most recently removed peg.
    Eaten,
}

/// Classify `coord` for drawing. The cursor wins over every other marker.
pub fn cell_role(game: &GameSession, coord: Coord) -> CellRole {
    let cell = game.board().get(coord).unwrap_or(Cell::OutOfShape);
    if coord == game.cursor() && cell.is_playable() {
        return match game.phase() {
            Phase::SelectingTo => CellRole::PendingCursor(cell),
            _ => CellRole::Cursor(cell),
        };
    }
    if game.pending_from() == Some(coord) {
        return CellRole::PendingFrom;
    }
    if game.last_eaten() == Some(coord) && cell == Cell::Hole {
        return CellRole::Eaten;
    }
    match cell {
        Cell::OutOfShape => CellRole::OutOfShape,
        Cell::Hole => CellRole::Hole,
        Cell::Peg => CellRole::Peg,
    }
}

/// Glyph and style for one cell role.
pub fn render_cell(role: CellRole, theme: &Theme) -> (&'static str, Style) {
    match role {
        CellRole::OutOfShape => (" ", Style::default()),
        CellRole::Hole => (HOLE_GLYPH, Style::default().fg(theme.muted)),
        CellRole::Peg => (PEG_GLYPH, Style::default().fg(theme.primary_fg)),
        CellRole::Cursor(cell) => (
            glyph_for(cell),
            Style::default()
                .fg(theme.accent)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        ),
        CellRole::PendingCursor(_) => (
            PENDING_CURSOR_GLYPH,
            Style::default()
                .fg(theme.warning)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        ),
        CellRole::PendingFrom => (
            PENDING_FROM_GLYPH,
            Style::default()
                .fg(theme.accent_alt)
                .add_modifier(Modifier::BOLD),
        ),
        CellRole::Eaten => (EATEN_GLYPH, Style::default().fg(theme.danger)),
    }
}

fn glyph_for(cell: Cell) -> &'static str {
    match cell {
        Cell::Peg => PEG_GLYPH,
        Cell::Hole => HOLE_GLYPH,
        Cell::OutOfShape => " ",
    }
}

/// One line of spans per board row, cells separated by a space.
pub fn board_lines(game: &GameSession, theme: &Theme) -> Vec<Line<'static>> {
    let board = game.board();
    (0..board.height())
        .map(|y| {
            let mut spans = Vec::with_capacity(board.width() * 2);
            for x in 0..board.width() {
                if x > 0 {
                    spans.push(Span::raw(" "));
                }
                let (glyph, style) = render_cell(cell_role(game, Coord::new(x, y)), theme);
                spans.push(Span::styled(glyph, style));
            }
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegsol_core::{Action, Layout};

    fn english() -> GameSession {
        GameSession::new(Layout::builtin("english").expect("built-in"))
    }

    #[test]
    fn cursor_starts_on_first_peg() {
        let game = english();
        assert_eq!(cell_role(&game, Coord::new(2, 0)), CellRole::Cursor(Cell::Peg));
        assert_eq!(cell_role(&game, Coord::new(0, 0)), CellRole::OutOfShape);
        assert_eq!(cell_role(&game, Coord::new(3, 3)), CellRole::Hole);
        assert_eq!(cell_role(&game, Coord::new(3, 0)), CellRole::Peg);
    }

    #[test]
    fn jump_marks_pending_and_eaten_cells() {
        let mut game = english();
        game.apply(Action::MoveRight).expect("in bounds");
        game.apply(Action::MoveDown).expect("in bounds");
        game.apply(Action::Confirm).expect("in bounds");
        assert_eq!(cell_role(&game, Coord::new(3, 1)), CellRole::PendingCursor(Cell::Peg));

        game.apply(Action::MoveDown).expect("in bounds");
        assert_eq!(cell_role(&game, Coord::new(3, 1)), CellRole::PendingFrom);
        assert_eq!(cell_role(&game, Coord::new(3, 3)), CellRole::PendingCursor(Cell::Hole));

        game.apply(Action::Confirm).expect("in bounds");
        assert_eq!(cell_role(&game, Coord::new(3, 2)), CellRole::Eaten);
        assert_eq!(cell_role(&game, Coord::new(3, 3)), CellRole::Cursor(Cell::Peg));
    }

    #[test]
    fn roles_render_distinctly() {
        let theme = Theme::default();
        let roles = [
            CellRole::Hole,
            CellRole::Peg,
            CellRole::Cursor(Cell::Peg),
            CellRole::PendingCursor(Cell::Hole),
            CellRole::PendingFrom,
            CellRole::Eaten,
        ];
        for (i, a) in roles.iter().enumerate() {
            for b in &roles[i + 1..] {
                assert_ne!(render_cell(*a, &theme), render_cell(*b, &theme), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn board_lines_cover_every_row() {
        let game = english();
        let lines = board_lines(&game, &Theme::default());
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0].spans.len(), 13);
    }
}
