use std::ops::Add;
use std::time::Duration;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[macro_export]
macro_rules! pos {
    ($x:expr, $y:expr) => {
        Pos { x: $x, y: $y }
    };
}

impl Add for Pos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        pos!(self.x + rhs.x, self.y + rhs.y)
    }
}

pub const DEFAULT_TICK_MILLIS: u64 = 200;

/// Parses a tick duration from user supplied text. Anything that is not a
/// non-negative integer falls back to the default.
pub fn parse_millis(text: &str) -> Duration {
    let millis = text.trim().parse().unwrap_or(DEFAULT_TICK_MILLIS);
    Duration::from_millis(millis)
}

#[test]
fn test_parse_millis() {
    assert_eq!(parse_millis("50"), Duration::from_millis(50));
    assert_eq!(parse_millis(" 1000 "), Duration::from_millis(1000));
    assert_eq!(parse_millis("0"), Duration::from_millis(0));
    assert_eq!(parse_millis("abc"), Duration::from_millis(200));
    assert_eq!(parse_millis(""), Duration::from_millis(200));
    assert_eq!(parse_millis("-5"), Duration::from_millis(200));
}
