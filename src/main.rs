use docopt::Docopt;
use labyrinth::{
    cells::CellCoordinate,
    Labyrinth,
    LabyrinthConfigBuilder,
};
use log::info;
use serde_derive::Deserialize;
use std::{
    io,
    io::prelude::*,
    fs::File,
};

const USAGE: &str = "Labyrinth

Usage:
    labyrinth_driver -h | --help
    labyrinth_driver [--size=<n>] [--start-x=<x> --start-y=<y>] [--entry-x=<x> --entry-y=<y>] [--exit-x=<x> --exit-y=<y>] [--seed=<s>] [--solve] [--text-out=<path>]

Options:
    -h --help            Show this screen.
    --size=<n>           The grid size is n * n [default: 10].
    --start-x=<x>        x coordinate of the cell where carving starts. Random if not specified.
    --start-y=<y>        y coordinate of the cell where carving starts.
    --entry-x=<x>        x coordinate of the entry. Defaults to the carving start.
    --entry-y=<y>        y coordinate of the entry.
    --exit-x=<x>         x coordinate of the exit. Random if not specified.
    --exit-y=<y>         y coordinate of the exit.
    --seed=<s>           Seed for a reproducible maze and route.
    --solve              Find a route from the entry to the exit and show it.
    --text-out=<path>    Output file path for a textual rendering of the maze instead of stdout.
";
#[derive(Debug, Deserialize)]
struct LabyrinthArgs {
    flag_size: usize,
    flag_start_x: Option<u32>,
    flag_start_y: Option<u32>,
    flag_entry_x: Option<u32>,
    flag_entry_y: Option<u32>,
    flag_exit_x: Option<u32>,
    flag_exit_y: Option<u32>,
    flag_seed: Option<u64>,
    flag_solve: bool,
    flag_text_out: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Labyrinth(::labyrinth::errors::Error, ::labyrinth::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: LabyrinthArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let config = LabyrinthConfigBuilder::new()
        .size(args.flag_size)
        .start(coordinate_arg("start", args.flag_start_x, args.flag_start_y))
        .entry(coordinate_arg("entry", args.flag_entry_x, args.flag_entry_y))
        .exit(coordinate_arg("exit", args.flag_exit_x, args.flag_exit_y))
        .seed(args.flag_seed)
        .build();

    let mut maze = Labyrinth::new(config);
    if let Some(rejected) = maze.build_or_default()? {
        eprintln!("Ignoring the requested settings ({}), built a default {}x{} labyrinth instead.",
                  rejected, maze.size().0, maze.size().0);
    }

    if args.flag_solve {
        let route_length = maze.resolve()?.len();
        info!("Route of {} cells", route_length);
    }

    let grid = maze.grid().ok_or("The labyrinth has no grid after building")?;
    if args.flag_text_out.is_empty() {
        println!("{}", grid);
    } else {
        write_text_to_file(&format!("{}", grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

/// A point needs both of its coordinates, half of one is reported and then ignored.
fn coordinate_arg(name: &str, x: Option<u32>, y: Option<u32>) -> Option<CellCoordinate> {
    match (x, y) {
        (Some(x), Some(y)) => Some(CellCoordinate::new(x, y)),
        (None, None) => None,
        _ => {
            eprintln!("Ignoring the {} point: both --{}-x and --{}-y are needed.", name, name, name);
            None
        }
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
