//! Session controller: routes actions to the game and performs save/load.

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::{
    board::Board,
    game::{Action, GameSession, Outcome, Transition},
    layout::Layout,
};

/// Persistence collaborator for the live board.
pub trait BoardStore {
    /// Persist a snapshot of `board`.
    fn save(&mut self, board: &Board) -> Result<()>;

    /// Read back the most recently persisted board.
    ///
    /// Implementations read and validate the whole image before returning, so a failed
    /// load never yields a partial board.
    fn load(&mut self) -> Result<Board>;
}

/// Store that keeps the serialized board in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    bytes: Option<Vec<u8>>,
}

impl MemoryStore {
    /// Create a store pre-filled with raw bytes, e.g. a previously exported image.
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes: Some(bytes) }
    }

    /// Raw bytes of the last saved board.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl BoardStore for MemoryStore {
    fn save(&mut self, board: &Board) -> Result<()> {
        self.bytes = Some(board.to_bytes().context("failed to serialize board")?);
        Ok(())
    }

    fn load(&mut self) -> Result<Board> {
        let bytes = self
            .bytes
            .as_deref()
            .ok_or_else(|| anyhow!("nothing has been saved yet"))?;
        Board::from_bytes(bytes).context("failed to parse saved board")
    }
}

/// Non-terminal feedback from a handled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The game state machine handled the action.
    Game(Transition),
    /// The board was written to the store.
    Saved,
    /// The board was replaced from the store.
    Loaded,
}

/// Result of handling one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The game goes on.
    Continue(Notice),
    /// The game is over.
    Finished(Outcome),
}

/// Owns the game and its store, translating actions into transitions and side effects.
pub struct SessionController<S> {
    game: GameSession,
    store: S,
}

impl<S: BoardStore> SessionController<S> {
    /// Start a fresh game on `layout` backed by `store`.
    pub fn new(layout: Layout, store: S) -> Self {
        Self {
            game: GameSession::new(layout),
            store,
        }
    }

    /// Current game state, for rendering.
    pub fn game(&self) -> &GameSession {
        &self.game
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one action.
    ///
    /// A failed save or load is returned as an error and leaves the game untouched;
    /// the caller may keep feeding actions afterwards.
    pub fn handle(&mut self, action: Action) -> Result<Step> {
        if let Some(outcome) = self.game.outcome() {
            return Ok(Step::Finished(outcome));
        }

        match action {
            Action::Save => {
                self.store
                    .save(self.game.board())
                    .context("failed to save board")?;
                info!(
                    layout = self.game.layout().name(),
                    pegs = self.game.board().peg_count(),
                    "Board saved"
                );
                Ok(Step::Continue(Notice::Saved))
            }
            Action::Load => {
                let board = match self.store.load() {
                    Ok(board) => board,
                    Err(err) => {
                        warn!(error = %err, "Load rejected");
                        return Err(err.context("failed to load board"));
                    }
                };
                if let Err(err) = self.game.restore(board) {
                    warn!(error = %err, "Load rejected");
                    return Err(anyhow!(err).context("failed to load board"));
                }
                Ok(self.settled(Notice::Loaded))
            }
            action => {
                let transition = self.game.apply(action)?;
                Ok(self.settled(Notice::Game(transition)))
            }
        }
    }

    fn settled(&self, notice: Notice) -> Step {
        match self.game.outcome() {
            Some(outcome) => Step::Finished(outcome),
            None => Step::Continue(notice),
        }
    }
}
