use std::fmt;

use smallvec::SmallVec;

use crate::{array::Array2D, dims::Dims, search::SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Path,
    Wall,
}

impl CellState {
    /// Binary encoding used by [`Grid::from_rows`], `0` is a path, `1` a wall.
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(CellState::Path),
            1 => Some(CellState::Wall),
            _ => None,
        }
    }

    pub fn to_bit(self) -> u8 {
        match self {
            CellState::Path => 0,
            CellState::Wall => 1,
        }
    }
}

/// Rectangular maze board of path and wall cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2D<CellState>,
}

impl Grid {
    pub fn new_filled(width: usize, height: usize, state: CellState) -> Self {
        Self {
            cells: Array2D::new(state, width, height),
        }
    }

    /// Imports a binary matrix, rows indexed by `y`.
    ///
    /// The matrix must be non-empty, rectangular and contain only `0` (path) and `1` (wall).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, SearchError> {
        let Some(first) = rows.first() else {
            return Err(SearchError::InvalidMazeFormat("maze has no rows".into()));
        };

        let width = first.len();
        if width == 0 {
            return Err(SearchError::InvalidMazeFormat("maze has no columns".into()));
        }

        let mut buf = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SearchError::InvalidMazeFormat(format!(
                    "row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }

            for (x, &bit) in row.iter().enumerate() {
                let state = CellState::from_bit(bit).ok_or_else(|| {
                    SearchError::InvalidMazeFormat(format!("cell ({x}, {y}) has value {bit}"))
                })?;
                buf.push(state);
            }
        }

        let cells = Array2D::from_buf(buf, width, rows.len())
            .ok_or_else(|| SearchError::InvalidMazeFormat("inconsistent dimensions".into()))?;

        Ok(Self { cells })
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .rows()
            .map(|row| row.iter().map(|c| c.to_bit()).collect())
            .collect()
    }

    pub fn size(&self) -> Dims {
        self.cells.size()
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn is_in_bounds(&self, pos: Dims) -> bool {
        self.cells.dim_to_idx(pos).is_some()
    }

    pub fn get(&self, pos: Dims) -> Option<CellState> {
        self.cells.get(pos).copied()
    }

    pub(crate) fn set(&mut self, pos: Dims, state: CellState) {
        self.cells[pos] = state;
    }

    /// Out of bounds positions count as walls.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get(Dims(x, y)) != Some(CellState::Path)
    }

    pub fn is_path(&self, x: i32, y: i32) -> bool {
        !self.is_wall(x, y)
    }

    pub fn is_path_at(&self, pos: Dims) -> bool {
        self.get(pos) == Some(CellState::Path)
    }

    pub fn path_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == CellState::Path).count()
    }

    pub fn iter_pos(&self) -> impl Iterator<Item = Dims> + '_ {
        self.cells.iter_pos()
    }

    /// The four orthogonal neighbors in east, west, south, north order.
    ///
    /// Nothing is filtered, positions may be out of bounds or walls.
    pub fn neighbors(pos: Dims) -> SmallVec<[Dims; 4]> {
        Dims::DIRECTIONS.iter().map(|&dir| pos + dir).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for cell in row {
                let ch = match cell {
                    CellState::Path => ' ',
                    CellState::Wall => '#',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Grid {
        Grid::from_rows(&[vec![1, 1, 1], vec![0, 0, 1], vec![1, 0, 1]]).unwrap()
    }

    #[test]
    fn bounds_and_walls() {
        let grid = small();
        assert_eq!(grid.size(), Dims(3, 3));
        assert!(grid.is_path(0, 1));
        assert!(grid.is_wall(0, 0));
        assert!(grid.is_wall(-1, 1));
        assert!(grid.is_wall(3, 1));
        assert!(!grid.is_in_bounds(Dims(1, 3)));
        assert_eq!(grid.path_cell_count(), 3);
    }

    #[test]
    fn rows_round_trip() {
        let rows = vec![vec![1, 0], vec![0, 0], vec![1, 1]];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 3));
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(
            Grid::from_rows(&[]),
            Err(SearchError::InvalidMazeFormat(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![]]),
            Err(SearchError::InvalidMazeFormat(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![0, 1], vec![0]]),
            Err(SearchError::InvalidMazeFormat(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![0, 2]]),
            Err(SearchError::InvalidMazeFormat(_))
        ));
    }

    #[test]
    fn neighbor_order() {
        let n = Grid::neighbors(Dims(5, 5));
        assert_eq!(
            n.as_slice(),
            &[Dims(6, 5), Dims(4, 5), Dims(5, 6), Dims(5, 4)]
        );
    }

    #[test]
    fn display() {
        assert_eq!(small().to_string(), "###\n  #\n# #\n");
    }
}
