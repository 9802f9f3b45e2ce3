use crate::engine::Move;
use crate::logic::board::{Board, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("move {0} is outside the board")]
    OutOfBounds(Move),
    #[error("square {0} is already occupied")]
    Occupied(Move),
    #[error("move {0} does not flip any disk")]
    NoFlips(Move),
    #[error("the pass sentinel cannot be played while moves are available")]
    Pass,
    #[error("the game is already over")]
    GameOver,
}

const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Squares (as a bit mask) that `color` would flip by playing `mv`.
/// A run only counts when it is closed by a disk of `color`.
pub fn flip_mask(board: &Board, mv: Move, color: Color) -> u64 {
    let opponent = color.opposite();
    let mut mask = 0;

    for (dc, dr) in DIRECTIONS {
        let mut run = 0u64;
        let mut cursor = Move::new(mv.col + dc, mv.row + dr);
        loop {
            let Some(sq) = cursor.square() else {
                run = 0;
                break;
            };
            match board.at(sq) {
                Some(piece) if piece == opponent => run |= 1 << sq,
                Some(_) => break,
                None => {
                    run = 0;
                    break;
                }
            }
            cursor = Move::new(cursor.col + dc, cursor.row + dr);
        }
        mask |= run;
    }

    mask
}

/// Checks that `color` may play `mv`, returning the squares it flips.
pub fn validate_move(board: &Board, mv: Move, color: Color) -> Result<u64, MoveError> {
    if mv.is_pass() {
        return Err(MoveError::Pass);
    }
    let sq = mv.square().ok_or(MoveError::OutOfBounds(mv))?;
    if board.at(sq).is_some() {
        return Err(MoveError::Occupied(mv));
    }
    match flip_mask(board, mv, color) {
        0 => Err(MoveError::NoFlips(mv)),
        mask => Ok(mask),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(col: usize, row: usize) -> u64 {
        1 << Board::square_index(col, row)
    }

    #[test]
    fn test_flips_in_several_directions() {
        let board: Board = "........\n\
                            ..B.B.B.\n\
                            ...WWW..\n\
                            ..BW.WB.\n\
                            ...WWW..\n\
                            ..B.B.B.\n\
                            ........\n\
                            ........\n"
            .parse()
            .unwrap();

        let mask = flip_mask(&board, Move::new(4, 3), Color::Black);
        let expected = bit(3, 2)
            | bit(4, 2)
            | bit(5, 2)
            | bit(3, 3)
            | bit(5, 3)
            | bit(3, 4)
            | bit(4, 4)
            | bit(5, 4);
        assert_eq!(mask, expected);
    }

    #[test]
    fn test_open_run_does_not_flip() {
        // White run reaches the edge with no black disk behind it.
        let board: Board = "........\n\
                            ........\n\
                            ........\n\
                            ........\n\
                            ........\n\
                            ........\n\
                            ........\n\
                            .WWWWWWW\n"
            .parse()
            .unwrap();
        assert_eq!(flip_mask(&board, Move::new(0, 7), Color::Black), 0);
        assert_eq!(
            validate_move(&board, Move::new(0, 7), Color::Black),
            Err(MoveError::NoFlips(Move::new(0, 7)))
        );
    }

    #[test]
    fn test_validate_rejects_pass_and_off_board() {
        let board = Board::new();
        assert_eq!(
            validate_move(&board, Move::PASS, Color::Black),
            Err(MoveError::Pass)
        );
        assert_eq!(
            validate_move(&board, Move::new(0, 8), Color::Black),
            Err(MoveError::OutOfBounds(Move::new(0, 8)))
        );
        assert_eq!(
            validate_move(&board, Move::new(4, 5), Color::Black),
            Ok(bit(4, 4))
        );
    }
}
