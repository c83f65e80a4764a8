use crate::board::{Board, Color, PieceKind, Square};
use crate::moves::{Move, MoveFlag, MoveList, MoveRollback};

// Four diagonals first, then four orthogonals; the attack scan relies on
// that split to tell bishops from rooks.
const RAY_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

#[inline]
fn on_board(row: i8, col: i8) -> bool {
    Square::new(row, col).on_board()
}

impl Board {
    /// True iff a piece of `attacker` could capture on `(row, col)`. Purely
    /// geometric; whether the square is occupied does not matter.
    pub fn is_square_attacked(&self, row: i8, col: i8, attacker: Color) -> bool {
        for (i, &(dr, dc)) in RAY_DIRECTIONS.iter().enumerate() {
            let mut r = row + dr;
            let mut c = col + dc;
            while on_board(r, c) {
                if let Some(piece) = self.piece_on(r, c) {
                    if piece.color == attacker {
                        let diagonal = i < 4;
                        if piece.kind == PieceKind::Queen
                            || (diagonal && piece.kind == PieceKind::Bishop)
                            || (!diagonal && piece.kind == PieceKind::Rook)
                        {
                            return true;
                        }
                    }
                    break;
                }
                r += dr;
                c += dc;
            }
        }

        for (dr, dc) in KNIGHT_OFFSETS {
            let (r, c) = (row + dr, col + dc);
            if on_board(r, c)
                && self
                    .piece_on(r, c)
                    .is_some_and(|p| p.color == attacker && p.kind == PieceKind::Knight)
            {
                return true;
            }
        }

        // White pawns advance toward row 0, so a White attacker sits one row
        // below the target square.
        let pawn_row = row + if attacker == Color::White { 1 } else { -1 };
        for pawn_col in [col - 1, col + 1] {
            if on_board(pawn_row, pawn_col)
                && self
                    .piece_on(pawn_row, pawn_col)
                    .is_some_and(|p| p.color == attacker && p.kind == PieceKind::Pawn)
            {
                return true;
            }
        }

        for (dr, dc) in KING_OFFSETS {
            let (r, c) = (row + dr, col + dc);
            if on_board(r, c)
                && self
                    .piece_on(r, c)
                    .is_some_and(|p| p.color == attacker && p.kind == PieceKind::King)
            {
                return true;
            }
        }

        false
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        for row in 0..8 {
            for col in 0..8 {
                if self
                    .piece_on(row, col)
                    .is_some_and(|p| p.color == color && p.kind == PieceKind::King)
                {
                    return Some(Square::new(row, col));
                }
            }
        }
        None
    }

    pub fn is_king_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.is_square_attacked(king.row, king.col, !color),
            None => false,
        }
    }

    /// All moves permitted by piece geometry for the side to move, without
    /// testing for self-check.
    pub fn generate_pseudo_legal_moves(&self) -> MoveList {
        let mut result = MoveList::new();

        for row in 0..8 {
            for col in 0..8 {
                let Some(piece) = self.piece_on(row, col) else {
                    continue;
                };
                if piece.color != self.side_to_move {
                    continue;
                }

                match piece.kind {
                    PieceKind::Pawn => self.pawn_moves(&mut result, row, col),
                    PieceKind::Knight => self.knight_moves(&mut result, row, col),
                    PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                        self.sliding_moves(&mut result, row, col, piece.kind)
                    }
                    PieceKind::King => self.king_moves(&mut result, row, col),
                }
            }
        }

        result
    }

    /// Pseudo-legal moves filtered through make / own-king-in-check / unmake.
    pub fn generate_moves(&mut self) -> MoveList {
        let pseudo_legal = self.generate_pseudo_legal_moves();
        let mut result = MoveList::new();
        let mut rollback = MoveRollback::default();
        let mover = self.side_to_move;

        for r#move in &pseudo_legal {
            self.make_move(r#move, &mut rollback);
            if !self.is_king_in_check(mover) {
                result.push(*r#move);
            }
            self.unmake_move(r#move, &mut rollback);
        }

        result
    }

    /// Only kings left on the board. KN-vs-K and KB-vs-K are intentionally
    /// not covered.
    pub fn insufficient_material(&self) -> bool {
        for row in 0..8 {
            for col in 0..8 {
                if self.piece_on(row, col).is_some_and(|p| p.kind != PieceKind::King) {
                    return false;
                }
            }
        }
        true
    }

    /// Drops off-board targets and own-piece targets. En passant destinations
    /// are empty and must pass.
    fn add_move(&self, list: &mut MoveList, r#move: Move) {
        if !r#move.to.on_board() {
            return;
        }
        if r#move.flag != MoveFlag::EnPassant
            && self
                .piece_at(r#move.to)
                .is_some_and(|p| p.color == self.side_to_move)
        {
            return;
        }
        list.push(r#move);
    }

    fn pawn_moves(&self, list: &mut MoveList, row: i8, col: i8) {
        let (dir, start_row, promotion_row) = match self.side_to_move {
            Color::White => (-1, 6, 0),
            Color::Black => (1, 1, 7),
        };
        let from = Square::new(row, col);

        // Single push, fanning out to the four promotions on the last rank.
        if on_board(row + dir, col) && self.piece_on(row + dir, col).is_none() {
            let to = Square::new(row + dir, col);
            if row + dir == promotion_row {
                for kind in PROMOTION_KINDS {
                    self.add_move(list, Move::new(from, to, MoveFlag::Promotion(kind)));
                }
            } else {
                self.add_move(list, Move::new(from, to, MoveFlag::Normal));

                // Double push needs both squares empty.
                if row == start_row && self.piece_on(row + 2 * dir, col).is_none() {
                    self.add_move(
                        list,
                        Move::new(from, Square::new(row + 2 * dir, col), MoveFlag::Normal),
                    );
                }
            }
        }

        for capture_col in [col - 1, col + 1] {
            if !on_board(row + dir, capture_col) {
                continue;
            }
            let to = Square::new(row + dir, capture_col);

            if self
                .piece_at(to)
                .is_some_and(|p| p.color != self.side_to_move)
            {
                if row + dir == promotion_row {
                    for kind in PROMOTION_KINDS {
                        self.add_move(list, Move::new(from, to, MoveFlag::Promotion(kind)));
                    }
                } else {
                    self.add_move(list, Move::new(from, to, MoveFlag::Normal));
                }
            }

            if self.en_passant_target == Some(to) {
                self.add_move(list, Move::new(from, to, MoveFlag::EnPassant));
            }
        }
    }

    fn knight_moves(&self, list: &mut MoveList, row: i8, col: i8) {
        let from = Square::new(row, col);
        for (dr, dc) in KNIGHT_OFFSETS {
            self.add_move(
                list,
                Move::new(from, Square::new(row + dr, col + dc), MoveFlag::Normal),
            );
        }
    }

    fn sliding_moves(&self, list: &mut MoveList, row: i8, col: i8, kind: PieceKind) {
        let from = Square::new(row, col);
        let directions = match kind {
            PieceKind::Bishop => &RAY_DIRECTIONS[0..4],
            PieceKind::Rook => &RAY_DIRECTIONS[4..8],
            _ => &RAY_DIRECTIONS[..],
        };

        for &(dr, dc) in directions {
            let mut r = row + dr;
            let mut c = col + dc;
            while on_board(r, c) {
                match self.piece_on(r, c) {
                    None => {
                        self.add_move(list, Move::new(from, Square::new(r, c), MoveFlag::Normal));
                    }
                    Some(piece) => {
                        if piece.color != self.side_to_move {
                            self.add_move(list, Move::new(from, Square::new(r, c), MoveFlag::Normal));
                        }
                        break;
                    }
                }
                r += dr;
                c += dc;
            }
        }
    }

    fn king_moves(&self, list: &mut MoveList, row: i8, col: i8) {
        let from = Square::new(row, col);
        for (dr, dc) in KING_OFFSETS {
            self.add_move(
                list,
                Move::new(from, Square::new(row + dr, col + dc), MoveFlag::Normal),
            );
        }

        // Castling. Never out of check, never through or into an attacked
        // square, and only with the king and rook actually at home.
        let player = self.side_to_move;
        let home_row = if player == Color::White { 7 } else { 0 };
        if row != home_row || col != 4 || self.is_king_in_check(player) {
            return;
        }

        let opponent = !player;
        let (kingside_right, queenside_right) = match player {
            Color::White => (self.castling.wk, self.castling.wq),
            Color::Black => (self.castling.bk, self.castling.bq),
        };

        if kingside_right
            && self
                .piece_on(home_row, 7)
                .is_some_and(|p| p.color == player && p.kind == PieceKind::Rook)
            && self.piece_on(home_row, 5).is_none()
            && self.piece_on(home_row, 6).is_none()
            && !self.is_square_attacked(home_row, 5, opponent)
            && !self.is_square_attacked(home_row, 6, opponent)
        {
            self.add_move(
                list,
                Move::new(from, Square::new(home_row, 6), MoveFlag::CastleKing),
            );
        }

        if queenside_right
            && self
                .piece_on(home_row, 0)
                .is_some_and(|p| p.color == player && p.kind == PieceKind::Rook)
            && self.piece_on(home_row, 1).is_none()
            && self.piece_on(home_row, 2).is_none()
            && self.piece_on(home_row, 3).is_none()
            && !self.is_square_attacked(home_row, 2, opponent)
            && !self.is_square_attacked(home_row, 3, opponent)
        {
            self.add_move(
                list,
                Move::new(from, Square::new(home_row, 2), MoveFlag::CastleQueen),
            );
        }
    }
}

#[cfg(test)]
mod move_generator_tests {
    use crate::STARTING_FEN;
    use crate::board::{Piece, PieceKind};
    use crate::moves::MoveRollback;

    use super::*;

    #[test]
    pub fn starting_position_has_twenty_moves() {
        let mut board = Board::default();
        assert_eq!(20, board.generate_moves().len());
    }

    #[test]
    pub fn twenty_replies_after_first_push() {
        let mut board = Board::default();
        let mut rollback = MoveRollback::default();
        let initial = board.clone();

        let m = Move::new(Square::new(6, 4), Square::new(4, 4), MoveFlag::Normal);
        board.make_move(&m, &mut rollback);

        assert_eq!(Color::Black, board.side_to_move);
        assert_eq!(Some(Square::new(5, 4)), board.en_passant_target);
        assert_eq!(0, board.halfmove_clock);
        assert_eq!(1, board.fullmove_number);
        assert_eq!(20, board.generate_moves().len());

        board.unmake_move(&m, &mut rollback);
        assert_eq!(initial, board);
    }

    #[test]
    pub fn pawn_attack_orientation() {
        let mut board = Board::empty();
        board.set_piece(
            Square::new(4, 4),
            Some(Piece::new(PieceKind::Pawn, Color::White)),
        );

        // A pawn on e4 covers d5 and f5, nothing behind it.
        assert!(board.is_square_attacked(3, 3, Color::White));
        assert!(board.is_square_attacked(3, 5, Color::White));
        assert!(!board.is_square_attacked(3, 4, Color::White));
        assert!(!board.is_square_attacked(5, 3, Color::White));
        assert!(!board.is_square_attacked(5, 5, Color::White));

        let mut board = Board::empty();
        board.set_piece(
            Square::new(3, 3),
            Some(Piece::new(PieceKind::Pawn, Color::Black)),
        );
        assert!(board.is_square_attacked(4, 2, Color::Black));
        assert!(board.is_square_attacked(4, 4, Color::Black));
        assert!(!board.is_square_attacked(2, 2, Color::Black));
    }

    #[test]
    pub fn sliding_attacks_are_blocked() {
        let board = Board::from_fen("8/8/8/8/1R2p3/8/8/4k3 w - - 0 1").unwrap();

        // The b4 rook sees e4 but not past the pawn on it.
        assert!(board.is_square_attacked(4, 4, Color::White));
        assert!(!board.is_square_attacked(4, 6, Color::White));
        // A rook does not attack diagonally.
        assert!(!board.is_square_attacked(3, 0, Color::White));
    }

    #[test]
    pub fn king_check_detection() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1").unwrap();
        assert!(board.is_king_in_check(Color::Black));
        assert!(!board.is_king_in_check(Color::White));

        // No king at all reads as not in check.
        let board = Board::empty();
        assert!(!board.is_king_in_check(Color::White));
    }

    #[test]
    pub fn castling_blocked_by_attack_on_the_king_path() {
        // Black rook on f8 covers f1.
        let mut board = Board::from_fen("5r2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(
            !board
                .generate_moves()
                .iter()
                .any(|m| m.flag == MoveFlag::CastleKing)
        );

        let mut board = Board::from_fen("8/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(
            board
                .generate_moves()
                .iter()
                .any(|m| m.flag == MoveFlag::CastleKing)
        );
    }

    #[test]
    pub fn queenside_b_file_may_be_attacked() {
        // Black rook on b8 covers b1, which the king never crosses.
        let mut board = Board::from_fen("1r6/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(
            board
                .generate_moves()
                .iter()
                .any(|m| m.flag == MoveFlag::CastleQueen)
        );

        // A rook on c8 does block it.
        let mut board = Board::from_fen("2r5/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(
            !board
                .generate_moves()
                .iter()
                .any(|m| m.flag == MoveFlag::CastleQueen)
        );
    }

    #[test]
    pub fn castling_needs_clear_path_and_rights() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1").unwrap();
        let moves = board.generate_moves();
        assert!(moves.iter().any(|m| m.flag == MoveFlag::CastleKing));
        // Knight on b1 blocks the queenside.
        assert!(!moves.iter().any(|m| m.flag == MoveFlag::CastleQueen));

        // Same squares but no rights.
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K2R w - - 0 1").unwrap();
        assert!(
            !board
                .generate_moves()
                .iter()
                .any(|m| matches!(m.flag, MoveFlag::CastleKing | MoveFlag::CastleQueen))
        );

        // Not while in check.
        let mut board = Board::from_fen("4r3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(
            !board
                .generate_moves()
                .iter()
                .any(|m| m.flag == MoveFlag::CastleKing)
        );
    }

    #[test]
    pub fn promotion_moves_fan_out() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = board.generate_moves();

        let promotions: Vec<&Move> = moves
            .iter()
            .filter(|m| m.from == Square::new(1, 0) && m.to == Square::new(0, 0))
            .collect();
        assert_eq!(4, promotions.len());
        for kind in PROMOTION_KINDS {
            assert!(
                promotions
                    .iter()
                    .any(|m| m.flag == MoveFlag::Promotion(kind))
            );
        }
    }

    #[test]
    pub fn en_passant_is_generated_only_while_available() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let moves = board.generate_moves();
        let ep: Vec<&Move> = moves.iter().filter(|m| m.flag == MoveFlag::EnPassant).collect();
        assert_eq!(1, ep.len());
        assert_eq!(Square::new(3, 4), ep[0].from);
        assert_eq!(Square::new(2, 5), ep[0].to);

        // The same position without the target offers no en passant.
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3")
                .unwrap();
        assert!(
            !board
                .generate_moves()
                .iter()
                .any(|m| m.flag == MoveFlag::EnPassant)
        );
    }

    #[test]
    pub fn pinned_piece_cannot_move() {
        // The e2 bishop shields the king from the e8 rook.
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();

        let pseudo_legal = board.generate_pseudo_legal_moves();
        assert!(pseudo_legal.iter().any(|m| m.from == Square::new(6, 4)));

        let legal = board.generate_moves();
        assert!(!legal.iter().any(|m| m.from == Square::new(6, 4)));

        // Legal moves stay a subset of pseudo-legal ones.
        for m in &legal {
            assert!(pseudo_legal.contains(m));
        }
    }

    #[test]
    pub fn kings_are_never_captured() {
        let mut board =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        let black_king = board.find_king(Color::Black).unwrap();
        for r#move in board.generate_moves() {
            assert_ne!(black_king, r#move.to);
        }
    }

    #[test]
    pub fn stalemate_has_no_moves_and_no_check() {
        let mut board = Board::from_fen("8/8/8/8/8/6k1/5q2/7K w - - 0 1").unwrap();
        assert_eq!(0, board.generate_moves().len());
        assert!(!board.is_king_in_check(Color::White));
    }

    #[test]
    pub fn checkmate_has_no_moves_and_check() {
        let mut board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(0, board.generate_moves().len());
        assert!(board.is_king_in_check(Color::Black));
    }

    #[test]
    pub fn insufficient_material_is_kings_only() {
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1")
            .unwrap()
            .insufficient_material());
        assert!(!Board::from_fen("4k3/8/8/8/8/8/8/4KN2 w - - 0 1")
            .unwrap()
            .insufficient_material());
        assert!(!Board::from_fen(STARTING_FEN).unwrap().insufficient_material());
    }
}
