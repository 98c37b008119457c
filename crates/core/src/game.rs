//! Game state machine: from-selection, to-selection, jumps and the end-of-game check.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    board::{Board, Cell, Coord, Direction},
    engine,
    error::{BoardError, GameError},
    layout::Layout,
};

/// Abstract input understood by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Confirm,
    Quit,
    Save,
    Load,
}

impl Action {
    /// Direction carried by a movement action.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Choosing the peg to move.
    SelectingFrom,
    /// Choosing where the selected peg lands.
    SelectingTo,
    /// The layout's win condition holds.
    Won,
    /// No legal jump remains and the game is not won.
    Stalemate,
    /// The player gave up.
    Quit,
}

impl Phase {
    /// Whether no further action can change the game.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Stalemate | Self::Quit)
    }
}

/// How a win compares to the layout's known minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreCategory {
    /// Fewer moves than any genuine solution needs.
    Cheater,
    /// Exactly the minimum.
    Optimal,
    /// Any other win.
    Normal,
}

impl ScoreCategory {
    /// Classify a win taking `moves` jumps against an optional minimum.
    pub fn classify(moves: u32, minimum: Option<u32>) -> Self {
        match minimum {
            Some(minimum) if moves < minimum => Self::Cheater,
            Some(minimum) if moves == minimum => Self::Optimal,
            _ => Self::Normal,
        }
    }
}

/// Terminal result reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Outcome {
    Won { moves: u32, category: ScoreCategory },
    Stalemate { pegs_left: usize },
    QuitByUser,
}

/// What a single action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Transition {
    /// Cursor moved to a new cell.
    CursorMoved(Coord),
    /// A peg was picked as the jump origin.
    Selected(Coord),
    /// The pending selection was dropped.
    Cancelled(Coord),
    /// A jump was carried out.
    Jumped { from: Coord, over: Coord, to: Coord },
    /// The action had no effect.
    Ignored,
    /// The game reached a terminal state.
    Finished(Outcome),
}

/// A single game in progress: the board plus cursor and selection state.
#[derive(Debug, Clone)]
pub struct GameSession {
    layout: Layout,
    board: Board,
    cursor: Coord,
    phase: Phase,
    pending_from: Option<Coord>,
    move_count: u32,
    last_eaten: Option<Coord>,
}

impl GameSession {
    /// Start a fresh game on `layout`.
    pub fn new(layout: Layout) -> Self {
        let board = layout.start().clone();
        let mut session = Self {
            cursor: initial_cursor(&board),
            layout,
            board,
            phase: Phase::SelectingFrom,
            pending_from: None,
            move_count: 0,
            last_eaten: None,
        };
        session.settle();
        info!(
            layout = session.layout.name(),
            pegs = session.board.peg_count(),
            "Game started"
        );
        session
    }

    /// Layout this game is played on.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Live board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Cell under the cursor; always playable.
    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Current state machine phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Origin of the jump being composed, if any.
    pub fn pending_from(&self) -> Option<Coord> {
        self.pending_from
    }

    /// Jumps made since the game started or was restored.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Cell emptied by the most recent jump, until the next origin is confirmed.
    pub fn last_eaten(&self) -> Option<Coord> {
        self.last_eaten
    }

    /// Terminal result, once the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Won => Some(Outcome::Won {
                moves: self.move_count,
                category: ScoreCategory::classify(self.move_count, self.layout.minimum_moves()),
            }),
            Phase::Stalemate => Some(Outcome::Stalemate {
                pegs_left: self.board.peg_count(),
            }),
            Phase::Quit => Some(Outcome::QuitByUser),
            Phase::SelectingFrom | Phase::SelectingTo => None,
        }
    }

    /// Feed one action through the state machine.
    ///
    /// Save and load are side effects owned by the session controller and are ignored
    /// here, as is every action once the game has finished.
    pub fn apply(&mut self, action: Action) -> Result<Transition, BoardError> {
        if self.phase.is_finished() {
            return Ok(Transition::Ignored);
        }

        let transition = match (self.phase, action) {
            (_, Action::Quit) => {
                info!(moves = self.move_count, "Game quit by user");
                self.phase = Phase::Quit;
                self.pending_from = None;
                Transition::Ignored
            }
            (_, Action::Save | Action::Load) => Transition::Ignored,
            (Phase::SelectingFrom, Action::Confirm) => self.confirm_from()?,
            (Phase::SelectingTo, Action::Confirm) => self.confirm_to()?,
            (phase, action) => match action.direction() {
                Some(direction) => self.move_cursor(phase, direction),
                None => Transition::Ignored,
            },
        };

        Ok(self.outcome().map_or(transition, Transition::Finished))
    }

    /// Replace the board with a restored one and reset all selection state.
    ///
    /// The board must have the layout's shape; otherwise nothing changes.
    pub fn restore(&mut self, board: Board) -> Result<(), GameError> {
        if !board.same_shape(self.layout.start()) {
            return Err(GameError::ShapeMismatch);
        }
        self.cursor = initial_cursor(&board);
        self.board = board;
        self.phase = Phase::SelectingFrom;
        self.pending_from = None;
        self.move_count = 0;
        self.last_eaten = None;
        self.settle();
        info!(pegs = self.board.peg_count(), "Board restored");
        Ok(())
    }

    fn move_cursor(&mut self, phase: Phase, direction: Direction) -> Transition {
        let next = match phase {
            Phase::SelectingTo => engine::next_target(&self.board, self.cursor, direction),
            _ => engine::next_peg(&self.board, self.cursor, direction),
        };
        if next == self.cursor {
            return Transition::Ignored;
        }
        debug!(from = %self.cursor, to = %next, ?direction, "Cursor moved");
        self.cursor = next;
        Transition::CursorMoved(next)
    }

    fn confirm_from(&mut self) -> Result<Transition, BoardError> {
        if self.board.cell_at(self.cursor)? != Cell::Peg {
            return Ok(Transition::Ignored);
        }
        self.last_eaten = None;
        self.pending_from = Some(self.cursor);
        self.phase = Phase::SelectingTo;
        debug!(from = %self.cursor, "Origin selected");
        Ok(Transition::Selected(self.cursor))
    }

    fn confirm_to(&mut self) -> Result<Transition, BoardError> {
        let Some(from) = self.pending_from else {
            self.phase = Phase::SelectingFrom;
            return Ok(Transition::Ignored);
        };
        let to = self.cursor;

        if to == from {
            self.pending_from = None;
            self.phase = Phase::SelectingFrom;
            debug!(at = %from, "Selection cancelled");
            return Ok(Transition::Cancelled(from));
        }
        if !engine::is_legal_jump(&self.board, from, to) {
            return Ok(Transition::Ignored);
        }

        let over = from.midpoint(to);
        engine::apply_jump(&mut self.board, from, to)?;
        self.move_count += 1;
        self.last_eaten = Some(over);
        self.pending_from = None;
        self.phase = Phase::SelectingFrom;
        info!(
            %from,
            %to,
            moves = self.move_count,
            pegs = self.board.peg_count(),
            "Jump applied"
        );
        self.settle();
        Ok(Transition::Jumped { from, over, to })
    }

    /// Win/stalemate check, run whenever the machine is back in `SelectingFrom`.
    fn settle(&mut self) {
        if self.phase != Phase::SelectingFrom {
            return;
        }
        if self.layout.is_won(&self.board) {
            self.phase = Phase::Won;
            info!(moves = self.move_count, "Game won");
        } else if !engine::has_any_legal_move(&self.board) {
            self.phase = Phase::Stalemate;
            info!(pegs = self.board.peg_count(), "No legal moves left");
        }
    }
}

/// First peg in reading order, falling back to the first playable cell.
fn initial_cursor(board: &Board) -> Coord {
    board
        .pegs()
        .next()
        .or_else(|| board.coords().find(|coord| board.is_playable(*coord)))
        .unwrap_or_default()
}
