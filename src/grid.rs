use std::str::FromStr;

use crate::{Error, Position};

/// Read-only view of a rectangular cave, where every position has a risk
/// level paid when entering it.
pub trait RiskGrid {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Risk level of entering `pos`, always in 1 to 9.
    fn risk(&self, pos: &Position) -> Result<usize, Error>;

    fn contains(&self, pos: &Position) -> bool {
        pos.x() < self.width() && pos.y() < self.height()
    }

    fn bottom_right(&self) -> Option<Position> {
        if self.width() > 0 && self.height() > 0 {
            Some(Position::new(self.width() - 1, self.height() - 1))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct RiskMap {
    risks: Vec<usize>,
    row_n: usize,
    col_n: usize,
}

impl RiskMap {
    pub fn new(rows: Vec<Vec<usize>>) -> Result<Self, Error> {
        let mut builder = RiskMapBuilder::new();
        for row in &rows {
            builder.add_risks(row)?;
        }

        builder.build()
    }

    pub fn tiled(&self, tile_n: usize) -> Result<TiledRiskMap<'_>, Error> {
        TiledRiskMap::new(self, tile_n)
    }
}

impl RiskGrid for RiskMap {
    fn width(&self) -> usize {
        self.col_n
    }

    fn height(&self) -> usize {
        self.row_n
    }

    fn risk(&self, pos: &Position) -> Result<usize, Error> {
        if !self.contains(pos) {
            return Err(Error::OutOfBounds(*pos, self.col_n, self.row_n));
        }

        Ok(self.risks[pos.y() * self.col_n + pos.x()])
    }
}

impl FromStr for RiskMap {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut builder = RiskMapBuilder::new();
        for line in text.lines() {
            builder.add_row(line)?;
        }

        builder.build()
    }
}

#[derive(Debug)]
pub struct RiskMapBuilder {
    risks: Vec<usize>,
    row_n: usize,
    col_n: Option<usize>,
    blank_row_n: usize,
}

impl RiskMapBuilder {
    pub fn new() -> Self {
        Self {
            risks: Vec::new(),
            row_n: 0,
            col_n: None,
            blank_row_n: 0,
        }
    }

    /// Add a row of digits. Blank rows are only allowed after the last row.
    pub fn add_row(&mut self, text: &str) -> Result<(), Error> {
        let text = text.trim_end();
        if text.is_empty() {
            self.blank_row_n += 1;
            return Ok(());
        }

        let row_ind = self.row_n;
        let risks = text
            .chars()
            .enumerate()
            .map(|(col_ind, c)| {
                c.to_digit(10)
                    .map(|d| d as usize)
                    .ok_or(Error::InvalidChar(row_ind, col_ind, c))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.add_risks(&risks)
    }

    pub fn add_risks(&mut self, risks: &[usize]) -> Result<(), Error> {
        let this_col_n = risks.len();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if self.blank_row_n > 0 {
            return Err(Error::InconsistentRow(self.row_n, expect_col_n, 0));
        }
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(self.row_n, expect_col_n, this_col_n));
        }

        if let Some((col_ind, risk)) = risks
            .iter()
            .enumerate()
            .find(|(_, risk)| !(1..=9).contains(*risk))
        {
            return Err(Error::InvalidRisk(self.row_n, col_ind, *risk));
        }

        self.risks.extend_from_slice(risks);
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<RiskMap, Error> {
        let col_n = self.col_n.unwrap_or(0);
        if self.row_n == 0 || col_n == 0 {
            return Err(Error::EmptyMap);
        }

        log::debug!("Built risk map of {}x{}.", col_n, self.row_n);
        Ok(RiskMap {
            risks: self.risks,
            row_n: self.row_n,
            col_n,
        })
    }
}

impl Default for RiskMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The full cave: `base` repeated `tile_n` times rightward and downward, with
/// the risk raised by one for every tile away from the top left one, wrapping
/// back to 1 after 9.
#[derive(Debug, Clone, Copy)]
pub struct TiledRiskMap<'a> {
    base: &'a RiskMap,
    tile_n: usize,
}

impl<'a> TiledRiskMap<'a> {
    pub fn new(base: &'a RiskMap, tile_n: usize) -> Result<Self, Error> {
        if tile_n == 0 {
            return Err(Error::InvalidTileCount(tile_n));
        }
        if base.width().checked_mul(tile_n).is_none() || base.height().checked_mul(tile_n).is_none()
        {
            return Err(Error::TooManyTiles(tile_n, base.width(), base.height()));
        }

        Ok(Self { base, tile_n })
    }

    pub fn base(&self) -> &RiskMap {
        self.base
    }

    pub fn tile_n(&self) -> usize {
        self.tile_n
    }
}

impl RiskGrid for TiledRiskMap<'_> {
    fn width(&self) -> usize {
        self.base.width() * self.tile_n
    }

    fn height(&self) -> usize {
        self.base.height() * self.tile_n
    }

    fn risk(&self, pos: &Position) -> Result<usize, Error> {
        if !self.contains(pos) {
            return Err(Error::OutOfBounds(*pos, self.width(), self.height()));
        }

        let (base_w, base_h) = (self.base.width(), self.base.height());
        let (tile_x, tile_y) = (pos.x() / base_w, pos.y() / base_h);
        let inner_pos = Position::new(pos.x() % base_w, pos.y() % base_h);
        // Tile indexes may be close to usize::MAX, reduce them before adding.
        let risk = self.base.risk(&inner_pos)? - 1 + tile_x % 9 + tile_y % 9;

        Ok(risk % 9 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_from_rows() {
        let map = RiskMap::new(vec![vec![1, 2], vec![1, 3]]).unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.height(), 2);
        assert_eq!(map.risk(&Position::new(1, 0)).unwrap(), 2);
        assert_eq!(map.risk(&Position::new(0, 1)).unwrap(), 1);
        assert_eq!(map.bottom_right(), Some(Position::new(1, 1)));
    }

    #[test]
    fn build_from_text() {
        let map = "1163\n1381\n2136\n".parse::<RiskMap>().unwrap();
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 3);
        assert_eq!(map.risk(&Position::new(3, 0)).unwrap(), 3);
        assert_eq!(map.risk(&Position::new(3, 2)).unwrap(), 6);
    }

    #[test]
    fn carriage_returns_and_trailing_blank_rows_are_ignored() {
        let map = "12\r\n13\r\n\n".parse::<RiskMap>().unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.height(), 2);
    }

    #[test]
    fn reject_malformed_input() {
        assert!(matches!(RiskMap::new(vec![]), Err(Error::EmptyMap)));
        assert!(matches!(RiskMap::new(vec![vec![]]), Err(Error::EmptyMap)));
        assert!(matches!("".parse::<RiskMap>(), Err(Error::EmptyMap)));
        assert!(matches!(
            RiskMap::new(vec![vec![1, 2, 3], vec![4, 5]]),
            Err(Error::InconsistentRow(1, 3, 2))
        ));
        assert!(matches!(
            "12\n\n34".parse::<RiskMap>(),
            Err(Error::InconsistentRow(1, 2, 0))
        ));
        assert!(matches!(
            "123\n405".parse::<RiskMap>(),
            Err(Error::InvalidRisk(1, 1, 0))
        ));
        assert!(matches!(
            RiskMap::new(vec![vec![1, 10]]),
            Err(Error::InvalidRisk(0, 1, 10))
        ));
        assert!(matches!(
            "12\n1a".parse::<RiskMap>(),
            Err(Error::InvalidChar(1, 1, 'a'))
        ));
    }

    #[test]
    fn out_of_bounds_lookup() {
        let map = RiskMap::new(vec![vec![1, 2], vec![1, 3]]).unwrap();
        assert!(matches!(
            map.risk(&Position::new(2, 0)),
            Err(Error::OutOfBounds(_, 2, 2))
        ));
        assert!(matches!(
            map.risk(&Position::new(0, 2)),
            Err(Error::OutOfBounds(_, 2, 2))
        ));
    }

    #[test]
    fn tiled_single_cell_wraps_at_every_tile_origin() {
        for base_risk in 1..=9 {
            let base = RiskMap::new(vec![vec![base_risk]]).unwrap();
            let tiled = base.tiled(5).unwrap();
            assert_eq!(tiled.width(), 5);
            assert_eq!(tiled.height(), 5);
            for tile_y in 0..5 {
                for tile_x in 0..5 {
                    assert_eq!(
                        tiled.risk(&Position::new(tile_x, tile_y)).unwrap(),
                        (base_risk + tile_x + tile_y - 1) % 9 + 1
                    );
                }
            }
        }
    }

    #[test]
    fn tiled_map_matches_expanded_rows() {
        let base = "8".parse::<RiskMap>().unwrap();
        let tiled = TiledRiskMap::new(&base, 5).unwrap();
        let rows = (0..5)
            .map(|y| {
                (0..5)
                    .map(|x| tiled.risk(&Position::new(x, y)).unwrap().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert_eq!(rows, vec!["89123", "91234", "12345", "23456", "34567"]);
    }

    #[test]
    fn tiled_map_keeps_inner_layout() {
        let base = "12\n34".parse::<RiskMap>().unwrap();
        let tiled = base.tiled(3).unwrap();
        assert_eq!(tiled.width(), 6);
        assert_eq!(tiled.height(), 6);
        assert_eq!(tiled.bottom_right(), Some(Position::new(5, 5)));
        // Tile (1, 0) adds one.
        assert_eq!(tiled.risk(&Position::new(2, 0)).unwrap(), 2);
        assert_eq!(tiled.risk(&Position::new(3, 1)).unwrap(), 5);
        // Tile (2, 2) adds four.
        assert_eq!(tiled.risk(&Position::new(4, 4)).unwrap(), 5);
        assert_eq!(tiled.risk(&Position::new(5, 5)).unwrap(), 8);
        assert!(matches!(
            tiled.risk(&Position::new(6, 0)),
            Err(Error::OutOfBounds(_, 6, 6))
        ));
    }

    #[test]
    fn tiled_map_rejects_overflowing_size() {
        let base = "12\n34".parse::<RiskMap>().unwrap();
        assert!(matches!(
            base.tiled(usize::MAX),
            Err(Error::TooManyTiles(usize::MAX, 2, 2))
        ));
        assert!(matches!(
            base.tiled(usize::MAX / 2 + 1),
            Err(Error::TooManyTiles(_, 2, 2))
        ));
        let largest = base.tiled(usize::MAX / 2).unwrap();
        assert_eq!(largest.width(), usize::MAX - 1);
    }

    #[test]
    fn tiled_map_far_risk_wraps_without_overflow() {
        let base = "1".parse::<RiskMap>().unwrap();
        let tiled = base.tiled(usize::MAX).unwrap();
        let far = usize::MAX - 1;
        let expect = ((1 + 2 * far as u128 - 1) % 9 + 1) as usize;
        assert_eq!(tiled.risk(&Position::new(far, far)).unwrap(), expect);
        assert_eq!(tiled.bottom_right(), Some(Position::new(far, far)));
    }

    #[test]
    fn tiled_map_needs_at_least_one_tile() {
        let base = "1".parse::<RiskMap>().unwrap();
        assert!(matches!(base.tiled(0), Err(Error::InvalidTileCount(0))));
        let single = base.tiled(1).unwrap();
        assert_eq!(single.width(), 1);
        assert_eq!(single.tile_n(), 1);
        assert_eq!(single.base().width(), 1);
    }
}
