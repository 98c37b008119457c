//! Jump legality, jump execution and cursor navigation over a [`Board`].

use crate::{
    board::{Board, Cell, Coord, Direction},
    error::BoardError,
};

/// Whether `to` lies exactly two cells from `from` along a row or a column.
pub fn is_adjacent_line(from: Coord, to: Coord) -> bool {
    let dx = from.x.abs_diff(to.x);
    let dy = from.y.abs_diff(to.y);
    (dx == 2 && dy == 0) || (dx == 0 && dy == 2)
}

/// Whether a peg at `from` may jump to `to` on `board`.
///
/// Any violation, including coordinates outside the grid, yields `false`.
pub fn is_legal_jump(board: &Board, from: Coord, to: Coord) -> bool {
    is_adjacent_line(from, to)
        && board.get(from) == Some(Cell::Peg)
        && board.get(to) == Some(Cell::Hole)
        && board.get(from.midpoint(to)) == Some(Cell::Peg)
}

/// Move the peg at `from` to `to`, removing the peg it jumps over.
///
/// The caller checks [`is_legal_jump`] first.
pub fn apply_jump(board: &mut Board, from: Coord, to: Coord) -> Result<(), BoardError> {
    debug_assert!(is_legal_jump(board, from, to), "illegal jump {from} -> {to}");
    board.set_cell_at(from, Cell::Hole)?;
    board.set_cell_at(from.midpoint(to), Cell::Hole)?;
    board.set_cell_at(to, Cell::Peg)
}

/// Every cell the peg at `from` can legally jump to.
pub fn legal_destinations_from(board: &Board, from: Coord) -> Vec<Coord> {
    Direction::ALL
        .iter()
        .filter_map(|direction| board.offset(from, *direction, 2))
        .filter(|to| is_legal_jump(board, from, *to))
        .collect()
}

/// Whether any peg on the board has a legal jump.
pub fn has_any_legal_move(board: &Board) -> bool {
    board
        .pegs()
        .any(|from| !legal_destinations_from(board, from).is_empty())
}

/// Cursor movement while choosing the peg to move.
///
/// Finds the nearest peg along the row or column, wrapping at the edge. When that line
/// holds no other peg the search continues across the whole grid in reading order
/// (column order for vertical moves). The cursor stays put when no other peg exists.
pub fn next_peg(board: &Board, start: Coord, direction: Direction) -> Coord {
    let is_peg = |cell: Cell| cell == Cell::Peg;
    stepped_search(board, start, direction, 1, is_peg)
        .or_else(|| sweep_search(board, start, direction, is_peg))
        .unwrap_or(start)
}

/// Cursor movement while choosing the destination of a pending jump.
///
/// Moves exactly two cells per step regardless of occupancy, wrapping at the edge and
/// skipping positions outside the playable shape.
pub fn next_target(board: &Board, start: Coord, direction: Direction) -> Coord {
    stepped_search(board, start, direction, 2, Cell::is_playable).unwrap_or(start)
}

/// Walk from `start` in `stride`-sized steps with wraparound, returning the first cell
/// accepted by `accept`. Out-of-shape cells are never returned.
fn stepped_search(
    board: &Board,
    start: Coord,
    direction: Direction,
    stride: usize,
    accept: impl Fn(Cell) -> bool,
) -> Option<Coord> {
    let span = if direction.is_horizontal() {
        board.width()
    } else {
        board.height()
    };
    let mut current = start;
    for _ in 0..span {
        current = board.wrapping_offset(current, direction, stride);
        if current == start {
            return None;
        }
        match board.get(current) {
            Some(cell) if cell.is_playable() && accept(cell) => return Some(current),
            _ => {}
        }
    }
    None
}

/// Linear scan over the flattened grid, row-major for horizontal moves and
/// column-major for vertical ones, wrapping from the last cell to the first.
fn sweep_search(
    board: &Board,
    start: Coord,
    direction: Direction,
    accept: impl Fn(Cell) -> bool,
) -> Option<Coord> {
    let (width, height) = (board.width(), board.height());
    let total = width * height;
    let horizontal = direction.is_horizontal();
    let coord_at = |index: usize| {
        if horizontal {
            Coord::new(index % width, index / width)
        } else {
            Coord::new(index / height, index % height)
        }
    };
    let origin = if horizontal {
        start.y * width + start.x
    } else {
        start.x * height + start.y
    };
    let forward = matches!(direction, Direction::Right | Direction::Down);

    (1..total)
        .map(|step| {
            if forward {
                (origin + step) % total
            } else {
                (origin + total - step) % total
            }
        })
        .map(coord_at)
        .find(|coord| {
            board
                .get(*coord)
                .is_some_and(|cell| cell.is_playable() && accept(cell))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn english() -> Board {
        Layout::builtin("english").expect("built-in").start().clone()
    }

    #[test]
    fn adjacency_requires_distance_two_on_one_axis() {
        let origin = Coord::new(3, 3);
        assert!(is_adjacent_line(origin, Coord::new(3, 1)));
        assert!(is_adjacent_line(origin, Coord::new(5, 3)));
        assert!(!is_adjacent_line(origin, origin));
        assert!(!is_adjacent_line(origin, Coord::new(3, 4)));
        assert!(!is_adjacent_line(origin, Coord::new(5, 5)));
        assert!(!is_adjacent_line(origin, Coord::new(3, 0)));
    }

    #[test]
    fn opening_jump_into_centre() {
        let mut board = english();
        let (from, to) = (Coord::new(3, 1), Coord::new(3, 3));
        assert!(is_legal_jump(&board, from, to));
        assert!(!is_legal_jump(&board, to, from));

        apply_jump(&mut board, from, to).expect("in bounds");
        assert_eq!(board.peg_count(), 31);
        assert_eq!(board.get(from), Some(Cell::Hole));
        assert_eq!(board.get(Coord::new(3, 2)), Some(Cell::Hole));
        assert_eq!(board.get(to), Some(Cell::Peg));
    }

    #[test]
    fn jump_needs_peg_in_between() {
        let mut board = english();
        apply_jump(&mut board, Coord::new(3, 1), Coord::new(3, 3)).expect("in bounds");
        // (3,1) is now empty, so (3,0) has nothing to jump over.
        assert!(!is_legal_jump(&board, Coord::new(3, 0), Coord::new(3, 2)));
        // (3,3) holds the moved peg, so (3,4) can jump back up into (3,2).
        assert!(is_legal_jump(&board, Coord::new(3, 4), Coord::new(3, 2)));
    }

    #[test]
    fn jumps_off_the_grid_are_rejected() {
        let board = english();
        assert!(!is_legal_jump(&board, Coord::new(3, 0), Coord::new(3, usize::MAX)));
        assert!(!is_legal_jump(&board, Coord::new(6, 3), Coord::new(8, 3)));
    }

    #[test]
    fn opening_destinations() {
        let board = english();
        assert_eq!(
            legal_destinations_from(&board, Coord::new(3, 1)),
            vec![Coord::new(3, 3)]
        );
        assert!(legal_destinations_from(&board, Coord::new(0, 2)).is_empty());
        assert!(has_any_legal_move(&board));
    }

    #[test]
    fn lone_peg_has_no_moves() {
        let board = Board::from_layout("ooo\no*o\nooo").expect("layout parses");
        assert!(!has_any_legal_move(&board));
    }

    #[test]
    fn peg_search_skips_holes_and_wraps() {
        let board = english();
        // Row 3 has the centre hole; moving right from (2,3) skips it.
        assert_eq!(next_peg(&board, Coord::new(2, 3), Direction::Right), Coord::new(4, 3));
        // Wraps from the right edge back to the left edge of the same row.
        assert_eq!(next_peg(&board, Coord::new(6, 3), Direction::Right), Coord::new(0, 3));
        // Column 3 from the top, moving up, wraps to the bottom.
        assert_eq!(next_peg(&board, Coord::new(3, 0), Direction::Up), Coord::new(3, 6));
        // Skips the out-of-shape corners.
        assert_eq!(next_peg(&board, Coord::new(4, 0), Direction::Right), Coord::new(2, 0));
    }

    #[test]
    fn peg_search_falls_back_to_whole_grid() {
        let board = Board::from_layout("*oo\nooo\noo*").expect("layout parses");
        assert_eq!(next_peg(&board, Coord::new(0, 0), Direction::Right), Coord::new(2, 2));
        assert_eq!(next_peg(&board, Coord::new(2, 2), Direction::Down), Coord::new(0, 0));
        let single = Board::from_layout("*o").expect("layout parses");
        assert_eq!(next_peg(&single, Coord::new(0, 0), Direction::Left), Coord::new(0, 0));
    }

    #[test]
    fn target_search_moves_two_and_skips_out_of_shape() {
        let board = english();
        assert_eq!(next_target(&board, Coord::new(3, 1), Direction::Down), Coord::new(3, 3));
        // (3,1) up by two wraps to row 6.
        assert_eq!(next_target(&board, Coord::new(3, 1), Direction::Up), Coord::new(3, 6));
        // (2,0) left by two lands on (0,0), out of shape; continues to (5,0), also out,
        // then (3,0).
        let target = next_target(&board, Coord::new(2, 0), Direction::Left);
        assert!(board.is_playable(target));
        assert_eq!(target, Coord::new(3, 0));
    }
}
