use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pegsol_core::{
    BoardStore, Notice, Outcome, Phase, ScoreCategory, SessionController, Step, Transition,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    input::{self, KEY_HELP},
    render::{self, Theme},
};

const TICK_RATE: Duration = Duration::from_millis(250);

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal frontend for one game of peg solitaire.
pub struct PegsolApp<S> {
    controller: SessionController<S>,
    theme: Theme,
    status: String,
    outcome: Option<Outcome>,
    should_quit: bool,
}

impl<S: BoardStore> PegsolApp<S> {
    pub fn new(controller: SessionController<S>) -> Self {
        let status = format!("Playing {}", controller.game().layout().name());
        Self {
            controller,
            theme: Theme::default(),
            status,
            outcome: None,
            should_quit: false,
        }
    }

    /// Run until the game ends and the outcome panel is dismissed.
    pub async fn run(&mut self) -> Result<Outcome> {
        // A layout can be decided before the first key press.
        self.outcome = self.controller.game().outcome();

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        result?;

        Ok(self.outcome.unwrap_or(Outcome::QuitByUser))
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            match event_rx.recv().await {
                Some(AppEvent::Input(Event::Key(key))) => self.handle_key(key),
                Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => {}
                None => {
                    info!("Input channel closed");
                    break;
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.outcome.is_some() {
            self.should_quit = true;
            return;
        }
        let Some(action) = input::action_for(&key) else {
            return;
        };
        debug!(?action, "Key mapped");

        match self.controller.handle(action) {
            Ok(Step::Continue(notice)) => self.apply_notice(notice),
            Ok(Step::Finished(Outcome::QuitByUser)) => {
                self.outcome = Some(Outcome::QuitByUser);
                self.should_quit = true;
            }
            Ok(Step::Finished(outcome)) => {
                info!(?outcome, "Game finished");
                self.status = "Press any key to exit".to_string();
                self.outcome = Some(outcome);
            }
            Err(err) => {
                error!("Action {action:?} failed: {err:#}");
                self.status = format!("Error: {err:#}");
            }
        }
    }

    fn apply_notice(&mut self, notice: Notice) {
        match notice {
            Notice::Saved => self.status = "Board saved".to_string(),
            Notice::Loaded => self.status = "Board loaded, move counter reset".to_string(),
            Notice::Game(Transition::Selected(at)) => {
                self.status = format!("Peg at {at} selected");
            }
            Notice::Game(Transition::Cancelled(at)) => {
                self.status = format!("Selection at {at} cancelled");
            }
            Notice::Game(Transition::Jumped { from, to, .. }) => {
                self.status = format!("Jumped {from} -> {to}");
            }
            Notice::Game(Transition::Ignored)
                if self.controller.game().phase() == Phase::SelectingTo =>
            {
                self.status = "Not a legal landing spot".to_string();
            }
            Notice::Game(_) => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(9), Constraint::Length(3)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(36)])
            .split(rows[0]);

        self.render_board(frame, columns[0]);
        self.render_info(frame, columns[1]);
        self.render_status(frame, rows[1]);

        if let Some(outcome) = self.outcome {
            self.render_outcome(frame, area, outcome);
        }
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let game = self.controller.game();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Peg Solitaire: {}", game.layout().name()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = render::board_lines(game, &self.theme);
        let height = lines.len() as u16;
        let width = (game.board().width() * 2).saturating_sub(1) as u16;
        let board_area = centered_rect(width, height, inner);
        frame.render_widget(Paragraph::new(lines), board_area);
    }

    fn render_info(&self, frame: &mut Frame, area: Rect) {
        let game = self.controller.game();
        let heading = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.muted);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Layout: ", heading),
                Span::raw(game.layout().name().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Moves: ", heading),
                Span::raw(game.move_count().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Pegs: ", heading),
                Span::raw(game.board().peg_count().to_string()),
            ]),
        ];
        if let Some(minimum) = game.layout().minimum_moves() {
            lines.push(Line::from(vec![
                Span::styled("Best: ", heading),
                Span::raw(format!("{minimum} moves")),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            phase_hint(game.phase()),
            Style::default().fg(self.theme.warning),
        )));
        lines.push(Line::from(""));
        for (keys, description) in KEY_HELP {
            lines.push(Line::from(vec![
                Span::styled(format!("{keys:<18}"), heading),
                Span::styled(*description, muted),
            ]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Game"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let paragraph = Paragraph::new(Line::from(self.status.clone()))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_outcome(&self, frame: &mut Frame, area: Rect, outcome: Outcome) {
        let colour = match outcome {
            Outcome::Won {
                category: ScoreCategory::Cheater,
                ..
            } => self.theme.danger,
            Outcome::Won { .. } => self.theme.success,
            Outcome::Stalemate { .. } | Outcome::QuitByUser => self.theme.warning,
        };
        let style = Style::default().fg(colour).add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = outcome_lines(outcome)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, style)))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "press any key",
            Style::default().fg(self.theme.muted),
        )));

        let popup = centered_rect(34, lines.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Game Over"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

fn phase_hint(phase: Phase) -> &'static str {
    match phase {
        Phase::SelectingFrom => "Pick a peg to move.",
        Phase::SelectingTo => "Pick where it lands. Confirm on the peg again to cancel.",
        Phase::Won => "Solved!",
        Phase::Stalemate => "No jumps left.",
        Phase::Quit => "Leaving.",
    }
}

/// Final message for an outcome, shown in the panel and printed after exit.
pub fn outcome_lines(outcome: Outcome) -> Vec<String> {
    match outcome {
        Outcome::Won {
            category: ScoreCategory::Cheater,
            ..
        } => vec!["CHEATER".to_string()],
        Outcome::Won {
            category: ScoreCategory::Optimal,
            ..
        } => vec!["NERD <3!".to_string()],
        Outcome::Won {
            moves,
            category: ScoreCategory::Normal,
        } => vec!["GG!".to_string(), format!("In {moves} moves!")],
        Outcome::Stalemate { pegs_left } => vec![
            "No more jumps.".to_string(),
            format!("{pegs_left} pegs left."),
        ],
        Outcome::QuitByUser => Vec::new(),
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
