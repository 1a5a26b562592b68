use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
    time::{Duration, SystemTime},
};

use rand::Rng;

use crate::{
    utils::{parse_millis, DEFAULT_TICK_MILLIS},
    Cell, Grid,
};

/// Computes the next generation of a board.
///
/// Reads only the passed board and returns a fresh one of the same
/// dimensions, so the whole-board update is synchronous and the input stays
/// usable for comparison.
pub fn advance(grid: &Grid) -> Grid {
    let mut next = Grid::new(grid.width(), grid.height());
    for index in 0..grid.len() {
        let cell = match grid.neighbor_count(index) {
            3 => Cell::active(),   // birth, or survival at three
            2 => grid.get(index),  // keeps its current state
            _ => Cell::inactive(), // starved or overcrowded
        };
        next.set(index, cell);
    }
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Setup,
    Running,
}

/// The simulation state machine. Owns the board; everything else goes
/// through [`SimHandle`] messages or [`Frame`] snapshots.
#[derive(Debug)]
pub struct State {
    mode: Mode,
    grid: Grid,
    generation: u64,
    tick_interval: Duration,
    cell_size: (u16, u16),
    screen_size: (u16, u16),
}

impl State {
    pub fn new(cell_size: (u16, u16)) -> Self {
        // a cell thinner than one pixel cannot be laid out
        let cell_size = (cell_size.0.max(1), cell_size.1.max(1));
        Self {
            mode: Mode::Setup,
            grid: Grid::default(),
            generation: 0,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MILLIS),
            cell_size,
            screen_size: (0, 0),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Rebuilds the board to cover a viewport of the given pixel size,
    /// rounded up to a whole number of cells.
    ///
    /// A report that changes the board dimensions discards the current
    /// pattern and resets the generation counter; a report producing the
    /// same dimensions leaves the board alone, which makes repeated size
    /// polling safe.
    pub fn resize_viewport(&mut self, width_px: u16, height_px: u16) {
        let (cell_w, cell_h) = self.cell_size;
        let cols = (width_px / cell_w + 1) as usize;
        let rows = (height_px / cell_h + 1) as usize;
        if (cols, rows) == (self.grid.width(), self.grid.height()) {
            return;
        }
        self.grid = Grid::new(cols, rows);
        self.generation = 0;
        self.screen_size = (cols as u16 * cell_w, rows as u16 * cell_h);
    }

    /// Valid in both modes; toggling while running perturbs the live board.
    pub fn toggle_cell(&mut self, index: usize) {
        self.grid.toggle(index);
    }

    pub fn set_tick_duration(&mut self, text: &str) {
        self.tick_interval = parse_millis(text);
    }

    pub fn start(&mut self) {
        self.mode = Mode::Running;
    }

    /// Repopulates the board with roughly one live cell in three and resets
    /// the generation counter.
    pub fn randomize(&mut self) {
        let mut rng = rand::thread_rng();
        for index in 0..self.grid.len() {
            let cell = if rng.gen_ratio(1, 3) {
                Cell::active()
            } else {
                Cell::inactive()
            };
            self.grid.set(index, cell);
        }
        self.generation = 0;
    }

    fn may_advance(&self) -> bool {
        self.mode == Mode::Running && !self.grid.is_empty()
    }

    /// Advances one generation; inert outside of running mode and on a board
    /// that has not been sized yet.
    pub fn advance_generation(&mut self) {
        if !self.may_advance() {
            return;
        }
        self.grid = advance(&self.grid);
        self.generation += 1;
    }

    pub fn frame(&self) -> Frame {
        Frame {
            mode: self.mode,
            cols: self.grid.width(),
            rows: self.grid.height(),
            cells: self.grid.cells().to_vec(),
            screen_width: self.screen_size.0,
            screen_height: self.screen_size.1,
            tick_millis: self.tick_interval.as_millis() as u64,
            generation: self.generation,
        }
    }
}

/// Read-only snapshot handed out for rendering.
#[derive(Debug, Clone)]
pub struct Frame {
    pub mode: Mode,
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Cell>,
    pub screen_width: u16,
    pub screen_height: u16,
    pub tick_millis: u64,
    pub generation: u64,
}

impl Frame {
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[y * self.cols + x]
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_active()).count()
    }
}

pub enum SimCmd {
    Viewport(u16, u16),
    Toggle(usize),
    TickDuration(String),
    Start,
    Randomize,
    Frame(mpsc::Sender<Frame>),
}

pub struct SimHandle {
    sender: mpsc::Sender<SimCmd>,
}

impl SimHandle {
    pub fn new(sender: mpsc::Sender<SimCmd>) -> Self {
        Self { sender }
    }

    pub fn viewport(&self, width_px: u16, height_px: u16) {
        self.sender.send(SimCmd::Viewport(width_px, height_px)).unwrap();
    }

    pub fn toggle(&self, index: usize) {
        self.sender.send(SimCmd::Toggle(index)).unwrap();
    }

    pub fn set_tick_duration(&self, text: impl Into<String>) {
        self.sender.send(SimCmd::TickDuration(text.into())).unwrap();
    }

    pub fn start(&self) {
        self.sender.send(SimCmd::Start).unwrap();
    }

    pub fn randomize(&self) {
        self.sender.send(SimCmd::Randomize).unwrap();
    }

    pub fn frame(&self) -> Frame {
        let (sender, receiver) = mpsc::channel();
        self.sender.send(SimCmd::Frame(sender)).unwrap();
        receiver.recv().unwrap()
    }
}

#[derive(Debug)]
pub struct Sim {
    thread: JoinHandle<()>,
    sender: mpsc::Sender<SimCmd>,
}

impl Sim {
    pub fn spawn(cell_size: (u16, u16)) -> Self {
        let state = State::new(cell_size);
        let (sender, receiver) = mpsc::channel();
        let thread = thread::spawn(move || sim_loop(receiver, state));

        Self { sender, thread }
    }

    pub fn handle(&self) -> SimHandle {
        let sender = self.sender.clone();
        SimHandle { sender }
    }

    pub fn join(self) {
        self.thread.join().unwrap();
    }
}

const EVT_CHECK_TIMEOUT: Duration = Duration::from_millis(10);

fn sim_loop(receiver: mpsc::Receiver<SimCmd>, mut state: State) {
    let mut last_update = SystemTime::now();

    loop {
        while let Ok(cmd) = receiver.try_recv() {
            match cmd {
                SimCmd::Viewport(width_px, height_px) => state.resize_viewport(width_px, height_px),
                SimCmd::Toggle(index) => state.toggle_cell(index),
                SimCmd::TickDuration(text) => state.set_tick_duration(&text),
                SimCmd::Start => state.start(),
                SimCmd::Randomize => state.randomize(),
                SimCmd::Frame(sender) => sender.send(state.frame()).unwrap(),
            }
        }

        // the interval is re-read on every pass, so a change made mid-run
        // applies to the next scheduled advance
        let elapsed = SystemTime::now()
            .duration_since(last_update)
            .unwrap_or_default();
        if state.may_advance() && elapsed >= state.tick_interval() {
            state.advance_generation();
            last_update = SystemTime::now();
        }

        thread::sleep(EVT_CHECK_TIMEOUT);
    }
}

#[cfg(test)]
fn grid_from(rows: &[&str]) -> Grid {
    let width = rows[0].len();
    let mut grid = Grid::new(width, rows.len());
    for (y, row) in rows.iter().enumerate() {
        for (x, char) in row.chars().enumerate() {
            if char == '#' {
                grid.set(y * width + x, Cell::active());
            }
        }
    }
    grid
}

#[test]
fn test_advance_is_pure() {
    let rows = &["..#..", ".##..", ".....", "..#..", "....."];
    let grid = grid_from(rows);
    let once = advance(&grid);
    let twice = advance(&grid);
    assert_eq!(once, twice);
    assert_eq!(grid, grid_from(rows));
    assert_eq!(once.width(), grid.width());
    assert_eq!(once.height(), grid.height());
}

#[test]
fn test_block_is_a_still_life() {
    let block = grid_from(&[".....", ".##..", ".##..", ".....", "....."]);
    assert_eq!(advance(&block), block);
}

#[test]
fn test_blinker_oscillates_with_period_two() {
    let horizontal = grid_from(&[".....", ".....", ".###.", ".....", "....."]);
    let vertical = grid_from(&[".....", "..#..", "..#..", "..#..", "....."]);
    assert_eq!(advance(&horizontal), vertical);
    assert_eq!(advance(&vertical), horizontal);
}

#[test]
fn test_lonely_and_crowded_cells_die() {
    let sparse = grid_from(&["#....", ".....", ".....", ".....", "....#"]);
    assert_eq!(advance(&sparse).population(), 0);

    let crowded = grid_from(&["###", "###", "###"]);
    // on a fully wrapped 3x3 torus every cell has eight live neighbors
    assert_eq!(advance(&crowded).population(), 0);
}

#[cfg(test)]
impl Grid {
    fn population(&self) -> usize {
        self.cells().iter().filter(|cell| cell.is_active()).count()
    }
}

#[test]
fn test_tick_duration_parses_with_default() {
    let mut state = State::new((1, 1));
    state.set_tick_duration("50");
    assert_eq!(state.tick_interval(), Duration::from_millis(50));
    state.set_tick_duration("abc");
    assert_eq!(state.tick_interval(), Duration::from_millis(200));
}

#[test]
fn test_resize_derives_board_from_viewport() {
    let mut state = State::new((10, 10));
    state.resize_viewport(100, 40);

    let frame = state.frame();
    assert_eq!((frame.cols, frame.rows), (11, 5));
    assert_eq!(frame.screen_width, 11 * 10);
    assert_eq!(frame.screen_height, 5 * 10);
    assert_eq!(frame.cells.len(), 11 * 5);
    assert_eq!(frame.population(), 0);
    assert_eq!(frame.generation, 0);
}

#[test]
fn test_resize_to_same_dimensions_keeps_the_pattern() {
    let mut state = State::new((10, 10));
    state.resize_viewport(100, 40);
    state.toggle_cell(3);

    state.resize_viewport(100, 40);
    assert_eq!(state.frame().population(), 1);

    state.resize_viewport(100, 50);
    assert_eq!(state.frame().population(), 0);
    assert_eq!(state.generation(), 0);
}

#[test]
fn test_advance_requires_running_mode_and_a_board() {
    let mut state = State::new((1, 1));

    // no viewport reported yet, nothing to advance even when running
    state.start();
    state.advance_generation();
    assert_eq!(state.generation(), 0);

    let mut state = State::new((1, 1));
    state.resize_viewport(4, 4);
    state.advance_generation(); // still in setup
    assert_eq!(state.generation(), 0);

    state.start();
    state.start(); // idempotent
    assert_eq!(state.mode(), Mode::Running);
    state.advance_generation();
    assert_eq!(state.generation(), 1);
}

#[test]
fn test_randomize_resets_the_generation_counter() {
    let mut state = State::new((1, 1));
    state.resize_viewport(8, 8);
    state.start();
    state.advance_generation();
    assert_eq!(state.generation(), 1);

    state.randomize();
    assert_eq!(state.generation(), 0);
    assert_eq!(state.grid().len(), 9 * 9);
}

#[test]
fn test_handle_commands_apply_in_order() {
    let sim = Sim::spawn((1, 1));
    let handle = sim.handle();

    handle.viewport(4, 2);
    handle.toggle(0);
    handle.toggle(7);
    handle.toggle(7);
    handle.set_tick_duration("50");

    let frame = handle.frame();
    assert_eq!(frame.mode, Mode::Setup);
    assert_eq!((frame.cols, frame.rows), (5, 3));
    assert!(frame.cell(0, 0).is_active());
    assert_eq!(frame.population(), 1);
    assert_eq!(frame.tick_millis, 50);
}
