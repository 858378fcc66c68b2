#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Result, bail};
use clap::Parser;
use mapty::{AppContext, SqliteStore, cli, render, utils};

#[macro_use]
extern crate mapty;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let store = SqliteStore::open(&cli.db)?;
    let mut app = AppContext::start(store)?;
    dlog!(
        "db={} workouts={}",
        cli.db.display(),
        app.workouts().len()
    );

    match cli.cmd {
        cli::Cmd::Add { workout } => {
            let input = workout.into_input();
            let logged = app.log_workout(&input)?;
            println!("{}\t{}", logged.id(), render::list_line(&logged));
        }
        cli::Cmd::List => {
            if app.workouts().is_empty() {
                tracing::info!("no workouts logged yet");
            }
            for w in app.workouts() {
                println!("{}\t{}", w.id(), render::list_line(w));
            }
        }
        cli::Cmd::Show { id } => match app.select(&id) {
            Some(w) => println!("{}", render::details(w)),
            None => tracing::warn!(id = %id, "no workout with this id"),
        },
        cli::Cmd::Export => {
            println!("{}", app.export_text()?);
        }
        cli::Cmd::Import { file } => {
            let text = utils::read_text(&file)?;
            let count = app.import_text(&text)?;
            tracing::info!(file = %file.display(), workouts = count, "import done");
        }
        cli::Cmd::Reset { yes } => {
            if !yes {
                bail!("Refusing to erase the workout history without --yes.");
            }
            app.reset()?;
        }
    }

    Ok(())
}
