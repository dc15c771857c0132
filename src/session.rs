/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::io::{self, Write};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::{perft, splitperft, GameState, SessionCommand};

/// Whether a [`Session`] should keep reading commands after executing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// An interactive game: a [`GameState`] driven by [`SessionCommand`]s.
///
/// A command that fails (a malformed or illegal move, for example) reports why and leaves the game unchanged.
#[derive(Debug, Default)]
pub struct Session {
    /// The current state of the game.
    ///
    /// Replaced whenever moves are applied, and reset by [`SessionCommand::New`].
    state: GameState,
}

impl Session {
    /// Constructs a new [`Session`] at the standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new [`Session`] that continues from `state`.
    pub fn with_state(state: GameState) -> Self {
        Self { state }
    }

    /// The current state of the game.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Execute the main loop of the session, reading one command per line from `stdin`.
    ///
    /// Returns once an exit command is received or the input ends.
    pub fn run(&mut self) -> Result<()> {
        let mut buffer = String::with_capacity(256);

        loop {
            // Clear the buffer, read input, and trim the trailing newline
            buffer.clear();
            let bytes = io::stdin()
                .read_line(&mut buffer)
                .context("Failed to read line when parsing session commands")?;

            // For ctrl + d
            if 0 == bytes {
                debug!("Received input of 0 bytes; ending session");
                return Ok(());
            }

            // Trim any leading/trailing whitespace
            let buf = buffer.trim();

            // Ignore empty lines
            if buf.is_empty() {
                continue;
            }

            match buf.parse::<SessionCommand>() {
                Ok(cmd) => {
                    let mut stdout = io::stdout().lock();
                    if self.execute(cmd, &mut stdout)? == Flow::Exit {
                        return Ok(());
                    }
                }

                // Clap renders `help` as an "error", so it is printed rather than logged
                Err(err) => {
                    warn!("Could not parse {buf:?} as a command");
                    println!("{err}");
                }
            }
        }
    }

    /// Execute a single [`SessionCommand`], writing its output to `out`.
    ///
    /// Rejected moves are reported to `out` and are not errors; only a failure to write is.
    pub fn execute(&mut self, cmd: SessionCommand, out: &mut impl Write) -> Result<Flow> {
        debug!("Executing {cmd:?}");

        match cmd {
            SessionCommand::Move { mv } => match self.state.play_move(&mv) {
                Ok(next) => {
                    self.state = next;
                    writeln!(out, "ok")?;
                    self.report_outcome(out)?;
                }
                Err(err) => {
                    warn!("Rejected move {mv:?}: {err}");
                    writeln!(out, "error: {err}")?;
                }
            },

            SessionCommand::Play { moves } => match self.state.play(&moves) {
                Ok(next) => {
                    self.state = next;
                    writeln!(out, "ok")?;
                    self.report_outcome(out)?;
                }
                Err(err) => {
                    warn!("Rejected move sequence {moves:?}: {err}");
                    writeln!(out, "error: {err}")?;
                }
            },

            SessionCommand::Display => writeln!(out, "{}", self.state)?,

            SessionCommand::Moves {
                square,
                debug,
                sort,
            } => {
                // Get the legal moves
                let mut moves = if let Some(square) = square {
                    self.state.legal_moves_from(square)
                } else {
                    self.state.generate_legal_moves()
                };

                if sort {
                    moves.sort_by_key(|mv| mv.to_uci());
                }

                // If there are none, print "(none)"
                let moves_string = if moves.is_empty() {
                    String::from("(none)")
                } else {
                    // Otherwise, join them by comma-space
                    moves
                        .into_iter()
                        .map(|mv| {
                            if debug {
                                format!("{mv:?}")
                            } else {
                                mv.to_string()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                writeln!(out, "{moves_string}")?;
            }

            SessionCommand::Check => {
                let color = self.state.side_to_move();
                if self.state.in_check(color) {
                    writeln!(out, "{color} is in check")?;
                } else {
                    writeln!(out, "{color} is not in check")?;
                }
            }

            SessionCommand::Status => match self.state.outcome() {
                Some(outcome) => writeln!(out, "{outcome}")?,
                None => writeln!(out, "ongoing, {} to move", self.state.side_to_move())?,
            },

            SessionCommand::History => {
                let history = self.state.history();
                if history.is_empty() {
                    writeln!(out, "(none)")?;
                } else {
                    let moves = history.iter().map(|mv| mv.to_string()).collect::<Vec<_>>();
                    writeln!(out, "{}", moves.join(" "))?;
                }
            }

            SessionCommand::Perft { depth } => writeln!(out, "{}", perft(&self.state, depth))?,

            SessionCommand::Splitperft { depth } => {
                let (split, total) = splitperft(&self.state, depth);
                for (mv, nodes) in split {
                    writeln!(out, "{mv}\t{nodes}")?;
                }
                writeln!(out, "\n{total}")?;
            }

            SessionCommand::New => self.state = GameState::new(),

            SessionCommand::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    /// Prints the outcome after a move, if it ended the game.
    fn report_outcome(&self, out: &mut impl Write) -> Result<()> {
        if let Some(outcome) = self.state.outcome() {
            writeln!(out, "{outcome}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs each line as a command, returning everything written.
    fn run_lines(session: &mut Session, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            let cmd = line.parse::<SessionCommand>().unwrap();
            session.execute(cmd, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_moves_are_applied() {
        let mut session = Session::new();
        let out = run_lines(&mut session, &["move e2e4", "m e7e5", "history"]);
        assert_eq!(out, "ok\nok\ne2e4 e7e5\n");
        assert_eq!(session.state().history().len(), 2);
    }

    #[test]
    fn test_rejected_move_leaves_state_unchanged() {
        let mut session = Session::new();
        let before = session.state().clone();

        let out = run_lines(&mut session, &["move e2e5", "move e2"]);
        let lines = out.lines().collect::<Vec<_>>();
        assert!(lines[0].starts_with("error: illegal move e2e5"));
        assert!(lines[1].starts_with("error: expected"));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_play_is_all_or_nothing() {
        let mut session = Session::new();
        let out = run_lines(&mut session, &["play e2e4 e7e5 e1e3"]);
        assert!(out.starts_with("error:"));
        assert!(session.state().history().is_empty());

        let out = run_lines(&mut session, &["play f2f3 e7e5 g2g4 d8h4", "status"]);
        assert_eq!(
            out,
            "ok\ncheckmate, black wins\ncheckmate, black wins\n"
        );
    }

    #[test]
    fn test_listing_commands() {
        let mut session = Session::new();
        let out = run_lines(&mut session, &["moves b1 --sort", "check", "status", "perft 2"]);
        assert_eq!(
            out,
            "b1a3, b1c3\nwhite is not in check\nongoing, white to move\n400\n"
        );

        let out = run_lines(&mut session, &["moves e8"]);
        assert_eq!(out, "(none)\n");
    }

    #[test]
    fn test_new_and_exit() {
        let mut session = Session::new();
        run_lines(&mut session, &["move d2d4", "new"]);
        assert_eq!(session.state(), &GameState::new());

        let mut out = Vec::new();
        let flow = session.execute(SessionCommand::Exit, &mut out).unwrap();
        assert_eq!(flow, Flow::Exit);
    }
}
