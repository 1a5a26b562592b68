use std::{env::args, fs, process::exit};

pub use utils::Pos;
mod utils;

pub use world::{adjacent, Cell, Grid};
pub mod world;

pub use sim::{advance, Frame, Mode, Sim, SimHandle};
mod sim;

pub use view::View;
mod view;

/// cells are drawn two terminal characters wide to come out square-ish
const CELL_SIZE: (u16, u16) = (2, 1);

fn deserialize(str: &str) -> Vec<Pos> {
    let mut result = vec![];
    let mut pos = pos!(0, 0);
    for c in str.chars() {
        match c {
            '#' => {
                result.push(pos);
                pos.x += 1
            }
            '\n' => pos = pos!(0, pos.y + 1),
            _ => pos.x += 1,
        }
    }
    result
}

fn seed(handle: &SimHandle, content: &str) {
    let frame = handle.frame();
    for pos in deserialize(content) {
        if (0..frame.cols as i32).contains(&pos.x) && (0..frame.rows as i32).contains(&pos.y) {
            handle.toggle(pos.y as usize * frame.cols + pos.x as usize);
        }
    }
}

pub fn main() {
    let simulation = Sim::spawn(CELL_SIZE);
    let handle = simulation.handle();

    let (width, height) = termion::terminal_size().unwrap_or((80, 24));
    handle.viewport(width, height.saturating_sub(1));

    if let Some(tick) = args().nth(2) {
        handle.set_tick_duration(tick);
    }

    if let Some(path) = args().nth(1) {
        let content = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("[error] could not read pattern file: {err}");
            exit(1);
        });
        seed(&handle, &content);
    }

    let view = View::spawn(simulation.handle());

    simulation.join();
    view.join();
}

#[test]
fn test_deserialize_reads_hash_cells() {
    let parsed = deserialize(".#.\n#.#\n");
    assert_eq!(parsed, vec![pos!(1, 0), pos!(0, 1), pos!(2, 1)]);
}
