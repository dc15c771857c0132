/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use arbiter::{Cli, Flow, GameState, Session};
use clap::Parser;
use env_logger::Env;
use log::info;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    if let Err(e) = run(cli) {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let state = GameState::new()
        .play(&cli.moves)
        .context("Failed to apply the moves given with --moves")?;
    info!("Starting session after {} moves", state.history().len());

    let mut session = Session::with_state(state);

    // Startup commands share stdout with the interactive loop, so the lock is released before it starts
    {
        let mut stdout = std::io::stdout().lock();
        for cmd in cli.commands {
            if session.execute(cmd, &mut stdout)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    if cli.batch {
        return Ok(());
    }

    session.run()
}
