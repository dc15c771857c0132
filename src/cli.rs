/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::Parser;

use crate::Square;

/// Command-line arguments for the `arbiter` binary.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Minimum level of log messages to print. `RUST_LOG` takes precedence when set.
    #[arg(
        long,
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    /// Moves to play from the starting position before anything else, such as `--moves e2e4 e7e5`.
    #[arg(long, num_args = 1.., value_name = "UCI")]
    pub moves: Vec<String>,

    /// A session command to run before reading from stdin, such as `-c "perft 3"`. May be repeated.
    #[arg(short, long = "command", value_name = "CMD")]
    pub commands: Vec<SessionCommand>,

    /// Exit after running the startup commands, instead of reading commands from stdin.
    #[arg(long, default_value = "false")]
    pub batch: bool,
}

/// A command to be executed by a [`crate::Session`].
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND> [ARGS]")
)]
pub enum SessionCommand {
    /// Validate a move in coordinate notation (such as `e2e4` or `e7e8q`) and apply it if legal.
    #[command(alias = "m")]
    Move { mv: String },

    /// Apply several moves in order. If any of them fails, none are applied.
    Play {
        #[arg(required = true)]
        moves: Vec<String>,
    },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves {
        square: Option<Square>,

        /// If set, moves will be printed using their debug formatter, which displays what kind of move it is (quiet, en passant, etc.).
        #[arg(short, long, default_value = "false")]
        debug: bool,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are generated in no particular order.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Print whether the side to move is in check.
    Check,

    /// Print how the game ended, or that it is still ongoing.
    Status,

    /// Print every move played so far.
    History,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Reset the game to the starting position.
    New,

    /// Leave the session.
    #[command(alias = "quit")]
    Exit,
}

impl FromStr for SessionCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`SessionCommand`] from a line of input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
