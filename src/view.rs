use std::{
    io::{stdin, stdout, Write},
    process::exit,
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use termion::{event::Key, input::TermRead, raw::IntoRawMode};

use crate::{pos, Frame, Mode, Pos, SimHandle};

pub struct View {
    thread: JoinHandle<()>,
}
impl View {
    pub fn spawn(handle: SimHandle) -> Self {
        let thread = thread::spawn(|| view_loop(handle));
        Self { thread }
    }

    pub fn join(self) {
        self.thread.join().unwrap();
    }
}

#[derive(Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug)]
pub enum InputCmd {
    Exit,
    Move(Dir),
    Toggle,
    Start,
    Randomize,
    Accelerate,
    Decelerate,
}

fn input_loop(sender: mpsc::Sender<InputCmd>) {
    let stdout = stdout().into_raw_mode().unwrap();
    for c in stdin().keys() {
        let command = match c.unwrap() {
            Key::Char('q') => InputCmd::Exit,
            Key::Up => InputCmd::Move(Dir::Up),
            Key::Down => InputCmd::Move(Dir::Down),
            Key::Left => InputCmd::Move(Dir::Left),
            Key::Right => InputCmd::Move(Dir::Right),
            Key::Char(' ') => InputCmd::Toggle,
            Key::Char('s') => InputCmd::Start,
            Key::Char('r') => InputCmd::Randomize,
            Key::Char('+') => InputCmd::Accelerate,
            Key::Char('-') => InputCmd::Decelerate,
            _ => continue,
        };

        sender.send(command).unwrap();
    }
    drop(stdout);
}

const VIEW_REFRESH_INTERVAL: Duration = Duration::from_millis(50);
const TICK_STEP_MILLIS: u64 = 50;

fn view_loop(handle: SimHandle) {
    let (sender, receiver) = mpsc::channel();
    let _input_handle = thread::spawn(|| input_loop(sender));

    let mut cursor = pos!(0, 0);
    let mut viewport = (0, 0);
    loop {
        let (term_width, term_height) = termion::terminal_size().unwrap();
        // the bottom row is reserved for the status line
        let current = (term_width, term_height.saturating_sub(1));
        if current != viewport {
            handle.viewport(current.0, current.1);
            viewport = current;
        }

        let frame = handle.frame();
        handle_inputs(&receiver, &handle, &frame, &mut cursor);
        display(&frame, viewport, cursor);
        thread::sleep(VIEW_REFRESH_INTERVAL);
    }
}

fn handle_inputs(
    receiver: &mpsc::Receiver<InputCmd>,
    handle: &SimHandle,
    frame: &Frame,
    cursor: &mut Pos,
) {
    while let Ok(cmd) = receiver.try_recv() {
        match cmd {
            InputCmd::Exit => exit(0),
            InputCmd::Move(direction) => {
                let moved = *cursor
                    + match direction {
                        Dir::Up => pos!(0, -1),
                        Dir::Down => pos!(0, 1),
                        Dir::Left => pos!(-1, 0),
                        Dir::Right => pos!(1, 0),
                    };
                *cursor = clamped(moved, frame);
            }
            InputCmd::Toggle => {
                handle.toggle(cursor.y as usize * frame.cols + cursor.x as usize)
            }
            InputCmd::Start => handle.start(),
            InputCmd::Randomize => handle.randomize(),
            InputCmd::Accelerate => handle.set_tick_duration(
                frame
                    .tick_millis
                    .saturating_sub(TICK_STEP_MILLIS)
                    .to_string(),
            ),
            InputCmd::Decelerate => {
                handle.set_tick_duration((frame.tick_millis + TICK_STEP_MILLIS).to_string())
            }
        }
    }
}

fn clamped(pos: Pos, frame: &Frame) -> Pos {
    let x = pos.x.clamp(0, frame.cols.saturating_sub(1) as i32);
    let y = pos.y.clamp(0, frame.rows.saturating_sub(1) as i32);
    pos!(x, y)
}

fn display(frame: &Frame, viewport: (u16, u16), cursor: Pos) {
    if frame.cols == 0 || frame.rows == 0 {
        return;
    }
    let cell_w = (frame.screen_width / frame.cols as u16).max(1);
    let cell_h = (frame.screen_height / frame.rows as u16).max(1);

    // the board rounds up past the viewport by up to one cell on each axis,
    // the overshoot is simply not painted
    let visible_width = frame.screen_width.min(viewport.0);
    let visible_height = frame.screen_height.min(viewport.1);

    let mut result = String::new();
    for ly in 0..visible_height {
        let next_line = termion::cursor::Goto(1, ly + 1);
        result += &format!("{next_line}");
        for lx in 0..visible_width {
            let x = (lx / cell_w) as usize;
            let y = (ly / cell_h) as usize;
            let char = if frame.cell(x, y).is_active() { '#' } else { ' ' };
            result.push(char);
        }
    }

    let mut status = status_line(frame);
    status.truncate(viewport.0 as usize);
    let goto_status = termion::cursor::Goto(1, visible_height + 1);
    result += &format!("{goto_status}{status}");

    // park the terminal caret on the selected cell
    let caret = termion::cursor::Goto(cursor.x as u16 * cell_w + 1, cursor.y as u16 * cell_h + 1);
    let clear = termion::clear::All;
    print!("{clear}{result}{caret}");
    stdout().flush().unwrap();
}

fn status_line(frame: &Frame) -> String {
    let mode = match frame.mode {
        Mode::Setup => "setup",
        Mode::Running => "running",
    };
    format!(
        "[{mode}] gen {} alive {} tick {}ms | arrows move, space toggle, r random, s start, +/- speed, q quit",
        frame.generation,
        frame.population(),
        frame.tick_millis,
    )
}
