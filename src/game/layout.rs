//! Maze Layout
//!
//! Static grid the maze geometry is generated from. Layouts come from JSON
//! (`1` wall, `0` empty, `"O"` teleport, plus a `startPosition` cell) or
//! from a text block (`#` wall, `.` empty, `O` teleport, `S` start).
//! Either way the grid is validated on load: geometry built from a ragged
//! or unknown grid would silently break collision.

use serde::Deserialize;
use thiserror::Error;

/// One cell of the layout grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GridCell {
    /// Walkable floor
    #[default]
    Empty,
    /// Solid wall block
    Wall,
    /// Teleport pad
    Teleport,
}

impl GridCell {
    /// Parse a text-layout symbol. `S` marks the start cell and is empty floor.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' | '1' => Some(GridCell::Wall),
            '.' | '0' | ' ' | 'S' => Some(GridCell::Empty),
            'O' => Some(GridCell::Teleport),
            _ => None,
        }
    }

    /// Symbol used when rendering the layout back to text.
    pub fn symbol(self) -> char {
        match self {
            GridCell::Empty => '.',
            GridCell::Wall => '#',
            GridCell::Teleport => 'O',
        }
    }
}

/// Start cell, in grid coordinates (`x` = column, `z` = row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct StartCell {
    /// Column index
    pub x: usize,
    /// Row index
    pub z: usize,
}

/// Layout validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Grid has no rows or no columns.
    #[error("layout grid is empty")]
    EmptyGrid,

    /// A row length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Offending row
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        found: usize,
    },

    /// Cell symbol is not a known marker.
    #[error("unknown cell symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol {
        /// Row of the symbol
        row: usize,
        /// Column of the symbol
        col: usize,
        /// The symbol as written
        symbol: String,
    },

    /// Text layout has no `S` cell.
    #[error("layout has no start cell")]
    MissingStart,

    /// Text layout has more than one `S` cell.
    #[error("layout has more than one start cell")]
    DuplicateStart,

    /// Start cell lies outside the grid.
    #[error("start cell ({x}, {z}) is outside the {cols}x{rows} grid")]
    StartOutOfBounds {
        /// Start column
        x: usize,
        /// Start row
        z: usize,
        /// Grid width
        cols: usize,
        /// Grid height
        rows: usize,
    },

    /// Start cell is a wall.
    #[error("start cell ({x}, {z}) is a wall")]
    StartOnWall {
        /// Start column
        x: usize,
        /// Start row
        z: usize,
    },
}

/// A validated, rectangular maze layout.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLayout")]
pub struct MazeLayout {
    grid: Vec<Vec<GridCell>>,
    start: StartCell,
}

impl MazeLayout {
    /// Build a layout, validating shape and start cell.
    pub fn new(grid: Vec<Vec<GridCell>>, start: StartCell) -> Result<Self, LayoutError> {
        let cols = grid.first().map(|row| row.len()).unwrap_or(0);
        if cols == 0 {
            return Err(LayoutError::EmptyGrid);
        }

        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != cols {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
        }

        let rows = grid.len();
        if start.x >= cols || start.z >= rows {
            return Err(LayoutError::StartOutOfBounds {
                x: start.x,
                z: start.z,
                cols,
                rows,
            });
        }

        if grid[start.z][start.x] == GridCell::Wall {
            return Err(LayoutError::StartOnWall { x: start.x, z: start.z });
        }

        Ok(Self { grid, start })
    }

    /// Parse a text layout. Blank lines are ignored; every other line is a row.
    pub fn parse_text(text: &str) -> Result<Self, LayoutError> {
        let mut grid = Vec::new();
        let mut start = None;

        for line in text.lines().map(|l| l.trim_end_matches('\r')) {
            if line.trim().is_empty() {
                continue;
            }

            let row = grid.len();
            let mut cells = Vec::with_capacity(line.len());
            for (col, symbol) in line.chars().enumerate() {
                let cell = GridCell::from_symbol(symbol).ok_or_else(|| LayoutError::UnknownSymbol {
                    row,
                    col,
                    symbol: symbol.to_string(),
                })?;

                if symbol == 'S' {
                    if start.is_some() {
                        return Err(LayoutError::DuplicateStart);
                    }
                    start = Some(StartCell { x: col, z: row });
                }
                cells.push(cell);
            }
            grid.push(cells);
        }

        if grid.is_empty() {
            return Err(LayoutError::EmptyGrid);
        }

        let start = start.ok_or(LayoutError::MissingStart)?;
        Self::new(grid, start)
    }

    /// The built-in 32x32 layout for a 160x160 scene with 5-unit cells.
    pub fn builtin() -> Self {
        Self::parse_text(DEFAULT_LAYOUT).expect("built-in layout is valid")
    }

    /// Cell at (row, col), if inside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<GridCell> {
        self.grid.get(row).and_then(|cells| cells.get(col)).copied()
    }

    /// Rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.grid.iter().map(|row| row.as_slice())
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    /// Number of columns.
    pub fn col_count(&self) -> usize {
        self.grid[0].len()
    }

    /// Start cell.
    pub fn start(&self) -> StartCell {
        self.start
    }

    /// Render back to the text format.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.row_count() * (self.col_count() + 1));
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if row == self.start.z && col == self.start.x && *cell == GridCell::Empty {
                    out.push('S');
                } else {
                    out.push(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }
}

/// JSON cell value: `0`, `1` or `"O"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(u64),
    Symbol(String),
}

#[derive(Deserialize)]
struct RawLayout {
    grid: Vec<Vec<RawCell>>,
    #[serde(rename = "startPosition", alias = "start")]
    start: StartCell,
}

impl TryFrom<RawLayout> for MazeLayout {
    type Error = LayoutError;

    fn try_from(raw: RawLayout) -> Result<Self, Self::Error> {
        let mut grid = Vec::with_capacity(raw.grid.len());

        for (row, cells) in raw.grid.into_iter().enumerate() {
            let mut parsed = Vec::with_capacity(cells.len());
            for (col, cell) in cells.into_iter().enumerate() {
                let value = match cell {
                    RawCell::Number(0) => GridCell::Empty,
                    RawCell::Number(1) => GridCell::Wall,
                    RawCell::Symbol(s) if s == "O" => GridCell::Teleport,
                    RawCell::Symbol(s) => {
                        return Err(LayoutError::UnknownSymbol { row, col, symbol: s });
                    }
                    RawCell::Number(n) => {
                        return Err(LayoutError::UnknownSymbol { row, col, symbol: n.to_string() });
                    }
                };
                parsed.push(value);
            }
            grid.push(parsed);
        }

        MazeLayout::new(grid, raw.start)
    }
}

/// Built-in scene layout (32x32 cells).
pub const DEFAULT_LAYOUT: &str = "\
################################
#......#................#......#
#......#................#......#
#......#....O..................#
#..........................O...#
#.......................#......#
#......#................#......#
####..#########..#########..####
#......#................#......#
#......#................#......#
#......#................#......#
#..........###....###..........#
#..........###....###.......O..#
#......#...###....###...#......#
#......#................#......#
#...S................O.........#
#..............................#
#......#................#......#
#......#...###....###...#......#
#..O...#...###....###...#......#
#..........###....###..........#
#..............................#
#......#................#......#
#......#................#......#
####..#########..#########..####
#......#................#......#
#......#................#......#
#..............................#
#..................O...........#
#......#................#......#
#......#................#......#
################################
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layout() {
        let layout = MazeLayout::builtin();
        assert_eq!(layout.row_count(), 32);
        assert_eq!(layout.col_count(), 32);
        assert_eq!(layout.start(), StartCell { x: 4, z: 15 });

        let teleports = layout
            .rows()
            .flat_map(|row| row.iter())
            .filter(|c| **c == GridCell::Teleport)
            .count();
        assert_eq!(teleports, 6);
    }

    #[test]
    fn test_json_layout() {
        let json = r#"{"grid": [[1,1,1],[1,0,1],[1,"O",1]], "startPosition": {"x": 1, "z": 1}}"#;
        let layout: MazeLayout = serde_json::from_str(json).unwrap();

        assert_eq!(layout.cell(0, 0), Some(GridCell::Wall));
        assert_eq!(layout.cell(1, 1), Some(GridCell::Empty));
        assert_eq!(layout.cell(2, 1), Some(GridCell::Teleport));
        assert_eq!(layout.cell(3, 0), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let grid = vec![
            vec![GridCell::Wall, GridCell::Wall],
            vec![GridCell::Empty],
        ];
        let err = MazeLayout::new(grid, StartCell { x: 0, z: 1 }).unwrap_err();
        assert_eq!(err, LayoutError::RaggedRow { row: 1, expected: 2, found: 1 });
    }

    #[test]
    fn test_ragged_json_rejected() {
        let json = r#"{"grid": [[1,1,1],[1,0]], "startPosition": {"x": 1, "z": 1}}"#;
        assert!(serde_json::from_str::<MazeLayout>(json).is_err());
    }

    #[test]
    fn test_unknown_symbols_rejected() {
        let err = MazeLayout::parse_text("#S#\n#X#\n").unwrap_err();
        assert!(matches!(err, LayoutError::UnknownSymbol { row: 1, col: 1, .. }));

        let json = r#"{"grid": [[1,2]], "startPosition": {"x": 0, "z": 0}}"#;
        assert!(serde_json::from_str::<MazeLayout>(json).is_err());
    }

    #[test]
    fn test_start_validation() {
        assert_eq!(MazeLayout::parse_text("###\n#.#\n"), Err(LayoutError::MissingStart));
        assert_eq!(MazeLayout::parse_text("#SS\n"), Err(LayoutError::DuplicateStart));
        assert_eq!(MazeLayout::parse_text("\n\n"), Err(LayoutError::EmptyGrid));

        let grid = vec![vec![GridCell::Wall, GridCell::Empty]];
        assert_eq!(
            MazeLayout::new(grid.clone(), StartCell { x: 0, z: 0 }),
            Err(LayoutError::StartOnWall { x: 0, z: 0 })
        );
        assert!(matches!(
            MazeLayout::new(grid, StartCell { x: 5, z: 0 }),
            Err(LayoutError::StartOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_text_roundtrip() {
        let layout = MazeLayout::builtin();
        let reparsed = MazeLayout::parse_text(&layout.to_text()).unwrap();
        assert_eq!(layout, reparsed);
    }
}
