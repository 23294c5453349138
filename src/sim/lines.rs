//! Win-line detection
//!
//! A line is a fully drawn row, column or diagonal. Pure function of the
//! board and the drawn set.

use super::board::{BOARD_SIZE, Board, DrawnSet};

/// One of the 12 possible lines on a 5x5 board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

impl Line {
    /// Every line, rows first, then columns, then both diagonals
    pub fn all() -> impl Iterator<Item = Line> {
        (0..BOARD_SIZE)
            .map(Line::Row)
            .chain((0..BOARD_SIZE).map(Line::Column))
            .chain([Line::Diagonal, Line::AntiDiagonal])
    }

    /// Board coordinates `(row, col)` covered by this line
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..BOARD_SIZE).map(move |i| match self {
            Line::Row(r) => (r, i),
            Line::Column(c) => (i, c),
            Line::Diagonal => (i, i),
            Line::AntiDiagonal => (i, BOARD_SIZE - 1 - i),
        })
    }

    pub fn is_complete(self, board: &Board, drawn: &DrawnSet) -> bool {
        self.cells().all(|(r, c)| drawn.contains(board.at(r, c)))
    }
}

/// Lines that are fully drawn
pub fn completed_lines(board: &Board, drawn: &DrawnSet) -> Vec<Line> {
    Line::all().filter(|l| l.is_complete(board, drawn)).collect()
}

/// Number of fully drawn lines (0..=12)
pub fn count_lines(board: &Board, drawn: &DrawnSet) -> u32 {
    Line::all().filter(|l| l.is_complete(board, drawn)).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::CELL_COUNT;

    fn numbered_board() -> Board {
        // 1..=25 row-major, so (r, c) holds r*5 + c + 1
        Board::from_cells(std::array::from_fn(|i| i as u8 + 1)).unwrap()
    }

    #[test]
    fn test_no_numbers_drawn() {
        let board = numbered_board();
        assert_eq!(count_lines(&board, &DrawnSet::new()), 0);
    }

    #[test]
    fn test_first_row_only() {
        let board = numbered_board();
        let drawn: DrawnSet = board.cells()[..BOARD_SIZE].iter().copied().collect();
        assert_eq!(count_lines(&board, &drawn), 1);
        assert_eq!(completed_lines(&board, &drawn), vec![Line::Row(0)]);
    }

    #[test]
    fn test_everything_drawn() {
        let board = numbered_board();
        let drawn: DrawnSet = board.cells().iter().copied().collect();
        assert_eq!(drawn.len(), CELL_COUNT);
        assert_eq!(count_lines(&board, &drawn), 12);
    }

    #[test]
    fn test_column_and_diagonals() {
        let board = numbered_board();

        let column: DrawnSet = (0..BOARD_SIZE).map(|r| board.at(r, 2)).collect();
        assert_eq!(completed_lines(&board, &column), vec![Line::Column(2)]);

        let diag: DrawnSet = (0..BOARD_SIZE).map(|i| board.at(i, i)).collect();
        assert_eq!(completed_lines(&board, &diag), vec![Line::Diagonal]);

        let anti: DrawnSet = (0..BOARD_SIZE).map(|i| board.at(i, 4 - i)).collect();
        assert_eq!(completed_lines(&board, &anti), vec![Line::AntiDiagonal]);
    }

    #[test]
    fn test_numbers_off_the_board_do_not_count() {
        let board = numbered_board();
        let mut drawn: DrawnSet = (26..=70).collect();
        assert_eq!(count_lines(&board, &drawn), 0);

        // Four of five in the first row is still not a line
        for n in 1..=4 {
            drawn.insert(n);
        }
        assert_eq!(count_lines(&board, &drawn), 0);
        drawn.insert(5);
        assert_eq!(count_lines(&board, &drawn), 1);
    }

    #[test]
    fn test_cross_pattern() {
        // Middle row + middle column share the centre cell
        let board = numbered_board();
        let drawn: DrawnSet = (0..BOARD_SIZE)
            .flat_map(|i| [board.at(2, i), board.at(i, 2)])
            .collect();
        assert_eq!(
            completed_lines(&board, &drawn),
            vec![Line::Row(2), Line::Column(2)]
        );
    }

    #[test]
    fn test_line_enumeration() {
        assert_eq!(Line::all().count(), 12);
        let cells: Vec<_> = Line::AntiDiagonal.cells().collect();
        assert_eq!(cells[0], (0, 4));
        assert_eq!(cells[4], (4, 0));
    }
}
