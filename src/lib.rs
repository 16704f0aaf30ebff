use std::{
    error,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;

pub mod grid;
pub mod search;

pub use grid::{RiskGrid, RiskMap, RiskMapBuilder, TiledRiskMap};
pub use search::{find_path, AStarSearch, SearchNode};

/// How many times the cave repeats in each direction in the full map.
pub const DEFAULT_TILE_N: usize = 5;

#[derive(Debug)]
pub enum Error {
    EmptyMap,
    InconsistentRow(usize, usize, usize), // (row index, expected column count, given column count)
    InvalidChar(usize, usize, char),      // (row index, column index, character)
    InvalidRisk(usize, usize, usize),     // (row index, column index, risk level)
    OutOfBounds(Position, usize, usize),  // (position, width, height)
    InvalidTileCount(usize),
    TooManyTiles(usize, usize, usize), // (tile count, base width, base height)
    InvalidPositionText(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyMap => write!(f, "Expect at least one non-empty row in risk map."),
            Error::InconsistentRow(row_ind, expect_col_n, this_col_n) => write!(
                f,
                "Expect {} risk level(s) in each row, given {} in row {}.",
                expect_col_n, this_col_n, row_ind
            ),
            Error::InvalidChar(row_ind, col_ind, c) => write!(
                f,
                "Invalid character({}) at ({}, {}) in risk map text.",
                c, col_ind, row_ind
            ),
            Error::InvalidRisk(row_ind, col_ind, risk) => write!(
                f,
                "Invalid risk level({}) at ({}, {}), expect 1 to 9.",
                risk, col_ind, row_ind
            ),
            Error::OutOfBounds(pos, width, height) => write!(
                f,
                "Position {} is outside of the {}x{} risk map.",
                pos, width, height
            ),
            Error::InvalidTileCount(tile_n) => write!(
                f,
                "Invalid tile count({}), expect the map repeated at least once.",
                tile_n
            ),
            Error::TooManyTiles(tile_n, width, height) => write!(
                f,
                "Too many tiles({}), the {}x{} risk map can't be repeated that many times.",
                tile_n, width, height
            ),
            Error::InvalidPositionText(s) => write!(
                f,
                "Invalid text({}) for position, expect two coordinates like \"x,y\".",
                s
            ),
        }
    }
}

impl error::Error for Error {}

impl Error {
    /// Whether this error comes from building a risk map out of bad rows.
    pub fn is_malformed_grid(&self) -> bool {
        matches!(
            self,
            Error::EmptyMap
                | Error::InconsistentRow(..)
                | Error::InvalidChar(..)
                | Error::InvalidRisk(..)
        )
    }
}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Start position as "x,y", defaults to the top left corner.
    #[arg(long)]
    pub start: Option<Position>,
    /// Target position as "x,y", defaults to the bottom right corner.
    #[arg(long)]
    pub target: Option<Position>,
    /// How many times the map repeats in each direction, part 1 rejects it.
    #[arg(long)]
    pub tile_n: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub fn all_dirs() -> &'static [Direction] {
        static ALL_DIRECTIONS: [Direction; 4] = [
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Up,
        ];

        &ALL_DIRECTIONS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: usize,
    y: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        static POSITION_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^\s*(\d+)\s*,\s*(\d+)\s*$").unwrap());

        let invalid_text = || Error::InvalidPositionText(value.to_string());
        let caps = POSITION_REGEX.captures(value).ok_or_else(invalid_text)?;
        let x = caps[1].parse::<usize>().map_err(|_| invalid_text())?;
        let y = caps[2].parse::<usize>().map_err(|_| invalid_text())?;

        Ok(Position::new(x, y))
    }
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn neighbor(&self, dir: Direction) -> Option<Self> {
        match dir {
            Direction::Right => Some(Position::new(self.x + 1, self.y)),
            Direction::Down => Some(Position::new(self.x, self.y + 1)),
            Direction::Left if self.x > 0 => Some(Position::new(self.x - 1, self.y)),
            Direction::Up if self.y > 0 => Some(Position::new(self.x, self.y - 1)),
            _ => None,
        }
    }

    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

pub fn read_risk_map<P: AsRef<Path>>(path: P) -> Result<RiskMap> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut builder = RiskMapBuilder::new();
    for (ind, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} of given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
        builder
            .add_row(line.as_str())
            .with_context(|| format!("Failed to parse line {} as a row of risk levels.", ind + 1))?;
    }

    Ok(builder.build()?)
}
