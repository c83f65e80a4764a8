use arrayvec::ArrayVec;

use crate::board::{Board, CastlingRights, Color, Piece, PieceKind, Square};

/// Upper bound comfortably above the ~218 legal moves of any reachable position.
pub const MAX_MOVES_IN_LIST: usize = 512;

pub type MoveList = ArrayVec<Move, MAX_MOVES_IN_LIST>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveFlag {
    Normal,
    Promotion(PieceKind),
    EnPassant,
    CastleKing,
    CastleQueen,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
}

impl Move {
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Move {
        Move { from, to, flag }
    }

    /// `e2e4`, or `a7a8q` for promotions.
    pub fn to_long_algebraic(&self) -> String {
        let mut result = format!("{}{}", self.from, self.to);
        if let MoveFlag::Promotion(kind) = self.flag {
            result.push(match kind {
                PieceKind::Knight => 'n',
                PieceKind::Bishop => 'b',
                PieceKind::Rook => 'r',
                _ => 'q',
            });
        }
        result
    }

    /// Parses 4- or 5-character long-algebraic input. The result carries only
    /// the `Normal`/`Promotion` distinction; matching against the generated
    /// legal moves supplies castling and en passant flags.
    pub fn from_long_algebraic(s: &str) -> Result<Move, String> {
        if s.len() != 4 && s.len() != 5 {
            return Err(format!(
                "Expected a move like e2e4 or a7a8q but got {} characters",
                s.len()
            ));
        }

        let from = Square::from_algebraic(&s[0..2])
            .ok_or_else(|| format!("'{}' is not a board square", &s[0..2]))?;
        let to = Square::from_algebraic(&s[2..4])
            .ok_or_else(|| format!("'{}' is not a board square", &s[2..4]))?;

        let flag = match s[4..].chars().next() {
            None => MoveFlag::Normal,
            Some(c) => match c.to_ascii_lowercase() {
                'q' => MoveFlag::Promotion(PieceKind::Queen),
                'r' => MoveFlag::Promotion(PieceKind::Rook),
                'b' => MoveFlag::Promotion(PieceKind::Bishop),
                'n' => MoveFlag::Promotion(PieceKind::Knight),
                _ => return Err(format!("'{}' is not a promotion piece", c)),
            },
        };

        Ok(Move::new(from, to, flag))
    }
}

/// Undo state pushed by `make_move` and popped by `unmake_move`. Side to move
/// and fullmove number are recomputed on unmake instead of being stored.
#[derive(Debug, Default)]
pub struct MoveRollback {
    captured_pieces: Vec<Option<Piece>>,
    ep_targets: Vec<Option<Square>>,
    castling_rights: Vec<CastlingRights>,
    halfmove_clocks: Vec<u32>,
}

impl MoveRollback {
    pub fn is_empty(&self) -> bool {
        self.captured_pieces.is_empty()
            && self.ep_targets.is_empty()
            && self.castling_rights.is_empty()
            && self.halfmove_clocks.is_empty()
    }
}

/// Row of the pawn removed by an en passant capture, one behind the landing
/// square from the capturer's point of view.
fn ep_captured_row(capturer: Color, to: Square) -> i8 {
    if capturer == Color::White {
        to.row + 1
    } else {
        to.row - 1
    }
}

impl Board {
    /// Applies a move produced by `generate_moves`. Anything else is a
    /// contract violation.
    pub fn make_move(&mut self, r#move: &Move, rollback: &mut MoveRollback) {
        let from = r#move.from;
        let to = r#move.to;
        let mover = self.side_to_move;

        let moving = self.piece_at(from);
        debug_assert!(moving.is_some_and(|p| p.color == mover), "no piece of the mover on {from}");
        let moving = moving.unwrap();

        rollback.ep_targets.push(self.en_passant_target);
        rollback.castling_rights.push(self.castling);
        rollback.halfmove_clocks.push(self.halfmove_clock);

        let mut captured = self.piece_at(to);
        let mut reset_halfmove = false;

        match r#move.flag {
            MoveFlag::CastleKing | MoveFlag::CastleQueen => {
                self.set_piece(to, Some(moving));
                self.set_piece(from, None);

                let row = from.row;
                let (rook_from, rook_to) = if r#move.flag == MoveFlag::CastleKing {
                    (Square::new(row, 7), Square::new(row, 5))
                } else {
                    (Square::new(row, 0), Square::new(row, 3))
                };
                let rook = self.piece_at(rook_from);
                self.set_piece(rook_to, rook);
                self.set_piece(rook_from, None);

                captured = None;
                self.en_passant_target = None;
                reset_halfmove = true;
            }
            MoveFlag::EnPassant => {
                self.set_piece(to, Some(moving));
                self.set_piece(from, None);

                let cap_sq = Square::new(ep_captured_row(mover, to), to.col);
                captured = self.piece_at(cap_sq);
                self.set_piece(cap_sq, None);

                self.en_passant_target = None;
                reset_halfmove = true;
            }
            MoveFlag::Promotion(kind) => {
                self.set_piece(to, Some(Piece::new(kind, mover)));
                self.set_piece(from, None);
                self.en_passant_target = None;
                reset_halfmove = true;
            }
            MoveFlag::Normal => {
                self.set_piece(to, Some(moving));
                self.set_piece(from, None);

                if captured.is_some() || moving.kind == PieceKind::Pawn {
                    reset_halfmove = true;
                }

                if moving.kind == PieceKind::Pawn && (to.row - from.row).abs() == 2 {
                    self.en_passant_target = Some(Square::new((from.row + to.row) / 2, from.col));
                } else {
                    self.en_passant_target = None;
                }
            }
        }

        // A captured rook still sitting on its home corner takes the
        // opponent's matching right with it.
        if let Some(piece) = captured {
            if piece.kind == PieceKind::Rook {
                match (to.row, to.col) {
                    (7, 0) => self.castling.wq = false,
                    (7, 7) => self.castling.wk = false,
                    (0, 0) => self.castling.bq = false,
                    (0, 7) => self.castling.bk = false,
                    _ => {}
                }
            }
        }

        if moving.kind == PieceKind::Rook {
            match (from.row, from.col) {
                (7, 0) => self.castling.wq = false,
                (7, 7) => self.castling.wk = false,
                (0, 0) => self.castling.bq = false,
                (0, 7) => self.castling.bk = false,
                _ => {}
            }
        }

        if moving.kind == PieceKind::King {
            if mover == Color::White {
                self.castling.wk = false;
                self.castling.wq = false;
            } else {
                self.castling.bk = false;
                self.castling.bq = false;
            }
            // King moves reset the clock here, castling included.
            reset_halfmove = true;
        }

        if reset_halfmove {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = !mover;

        rollback.captured_pieces.push(captured);
    }

    /// Reverses the most recent `make_move`. The move must be the one that
    /// was applied.
    pub fn unmake_move(&mut self, r#move: &Move, rollback: &mut MoveRollback) {
        let from = r#move.from;
        let to = r#move.to;

        if self.side_to_move == Color::White {
            self.fullmove_number -= 1;
        }
        self.side_to_move = !self.side_to_move;
        let mover = self.side_to_move;

        let captured = rollback.captured_pieces.pop().unwrap();
        self.halfmove_clock = rollback.halfmove_clocks.pop().unwrap();
        self.castling = rollback.castling_rights.pop().unwrap();
        self.en_passant_target = rollback.ep_targets.pop().unwrap();

        match r#move.flag {
            MoveFlag::CastleKing | MoveFlag::CastleQueen => {
                let king = self.piece_at(to);
                self.set_piece(from, king);
                self.set_piece(to, None);

                let row = from.row;
                let (rook_from, rook_to) = if r#move.flag == MoveFlag::CastleKing {
                    (Square::new(row, 7), Square::new(row, 5))
                } else {
                    (Square::new(row, 0), Square::new(row, 3))
                };
                let rook = self.piece_at(rook_to);
                self.set_piece(rook_from, rook);
                self.set_piece(rook_to, None);
            }
            MoveFlag::EnPassant => {
                let pawn = self.piece_at(to);
                self.set_piece(from, pawn);
                self.set_piece(to, None);
                self.set_piece(Square::new(ep_captured_row(mover, to), to.col), captured);
            }
            MoveFlag::Promotion(_) => {
                self.set_piece(from, Some(Piece::new(PieceKind::Pawn, mover)));
                self.set_piece(to, captured);
            }
            MoveFlag::Normal => {
                let moving = self.piece_at(to);
                self.set_piece(from, moving);
                self.set_piece(to, captured);
            }
        }
    }
}

/// Matches parsed user input against the legal move list. A bare promotion
/// input (`a7a8`) resolves to the queen promotion; otherwise the generated
/// move is taken as-is since it carries the correct flags.
pub fn resolve_move(legal_moves: &MoveList, input: &Move) -> Option<Move> {
    for r#move in legal_moves {
        if r#move.from != input.from || r#move.to != input.to {
            continue;
        }

        if let MoveFlag::Promotion(kind) = r#move.flag {
            match input.flag {
                MoveFlag::Promotion(requested) if requested == kind => return Some(*r#move),
                MoveFlag::Normal if kind == PieceKind::Queen => return Some(*r#move),
                _ => continue,
            }
        }

        return Some(*r#move);
    }

    None
}
