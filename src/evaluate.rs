use crate::board::{Board, Color, Piece, PieceKind};

pub const INFINITY: i32 = 1_000_000;
pub const MATE_VALUE: i32 = INFINITY - 1000;

/// Ordering values indexed with `PieceKind::index()`, so index 0 is no piece.
pub static CENTIPAWN_VALUES: [i32; 7] = [0, 100, 320, 330, 500, 900, 20_000];

// Tapered evaluation: a middlegame score and an endgame score, blended by
// game phase. The phase starts at 24 (knight/bishop 1, rook 2, queen 4) and
// drops as pieces come off the board.
const PHASE_TOTAL: i32 = 24;

static MG_VALUE: [i32; 7] = [0, 82, 337, 365, 477, 1025, 0];
static EG_VALUE: [i32; 7] = [0, 94, 281, 297, 512, 936, 0];

const MOBILITY_MG: i32 = 1;
const MOBILITY_EG: i32 = 1;

// Piece-square tables from White's point of view, rank 8 first; mirrored by
// rank for Black. Pawns gain value toward promotion, knights and bishops
// prefer the center, the king hides in the middlegame and activates in the
// endgame.
#[rustfmt::skip]
static PAWN_MG: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [ 50,  50,  50,  50,  50,  50,  50,  50],
    [ 10,  10,  20,  30,  30,  20,  10,  10],
    [  5,   5,  10,  25,  25,  10,   5,   5],
    [  0,   0,   0,  20,  20,   0,   0,   0],
    [  5,  -5, -10,   0,   0, -10,  -5,   5],
    [  5,  10,  10, -20, -20,  10,  10,   5],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

#[rustfmt::skip]
static PAWN_EG: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [ 80,  80,  80,  80,  80,  80,  80,  80],
    [ 50,  50,  50,  50,  50,  50,  50,  50],
    [ 30,  30,  30,  30,  30,  30,  30,  30],
    [ 20,  20,  20,  20,  20,  20,  20,  20],
    [ 10,  10,  10,  10,  10,  10,  10,  10],
    [ 10,  10,  10,  10,  10,  10,  10,  10],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

#[rustfmt::skip]
static KNIGHT_MG: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20,   0,   0,   0,   0, -20, -40],
    [-30,   0,  10,  15,  15,  10,   0, -30],
    [-30,   5,  15,  20,  20,  15,   5, -30],
    [-30,   0,  15,  20,  20,  15,   0, -30],
    [-30,   5,  10,  15,  15,  10,   5, -30],
    [-40, -20,   0,   5,   5,   0, -20, -40],
    [-50, -10, -30, -30, -30, -30, -10, -50],
];

#[rustfmt::skip]
static KNIGHT_EG: [[i32; 8]; 8] = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20,   0,   0,   0,   0, -20, -40],
    [-30,   0,  10,  15,  15,  10,   0, -30],
    [-30,   5,  15,  20,  20,  15,   5, -30],
    [-30,   0,  15,  20,  20,  15,   0, -30],
    [-30,   5,  10,  15,  15,  10,   5, -30],
    [-40, -20,   0,   5,   5,   0, -20, -40],
    [-50, -30, -20, -20, -20, -20, -30, -50],
];

#[rustfmt::skip]
static BISHOP_MG: [[i32; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,  10,  10,   5,   0, -10],
    [-10,   5,   5,  10,  10,   5,   5, -10],
    [-10,   0,  10,  10,  10,  10,   0, -10],
    [-10,  10,  10,  10,  10,  10,  10, -10],
    [-10,   5,   0,   0,   0,   0,   5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

#[rustfmt::skip]
static BISHOP_EG: [[i32; 8]; 8] = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,  10,  10,   5,   0, -10],
    [-10,   5,   5,  10,  10,   5,   5, -10],
    [-10,   0,  10,  10,  10,  10,   0, -10],
    [-10,  10,  10,  10,  10,  10,  10, -10],
    [-10,   5,   0,   0,   0,   0,   5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

#[rustfmt::skip]
static ROOK_MG: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  5,  10,  10,  10,  10,  10,  10,   5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [ -5,   0,   0,   0,   0,   0,   0,  -5],
    [  0,  -5,   0,   5,   5,   0,  -5,   0],
];

#[rustfmt::skip]
static ROOK_EG: [[i32; 8]; 8] = [
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [ 10,  10,  10,  10,  10,  10,  10,  10],
    [  5,   5,   5,   5,   5,   5,   5,   5],
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0],
];

#[rustfmt::skip]
static QUEEN_MG: [[i32; 8]; 8] = [
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,   5,   5,   5,   0, -10],
    [ -5,   0,   5,   5,   5,   5,   0,  -5],
    [  0,   0,   5,   5,   5,   5,   0,  -5],
    [-10,   0,   5,   5,   5,   5,   0, -10],
    [-10,   0,   5,   0,   0,   0,   0, -10],
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
];

#[rustfmt::skip]
static QUEEN_EG: [[i32; 8]; 8] = [
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
    [-10,   0,   0,   0,   0,   0,   0, -10],
    [-10,   0,   5,   5,   5,   5,   0, -10],
    [ -5,   0,   5,   5,   5,   5,   0,  -5],
    [  0,   0,   5,   5,   5,   5,   0,  -5],
    [-10,   0,   5,   5,   5,   5,   0, -10],
    [-10,   0,   5,   0,   0,   0,   0, -10],
    [-20, -10, -10,  -5,  -5, -10, -10, -20],
];

#[rustfmt::skip]
static KING_MG: [[i32; 8]; 8] = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [ 20,  20,   0,   0,   0,   0,  20,  20],
    [ 20,  30,  10,   0,   0,  10,  30,  20],
];

#[rustfmt::skip]
static KING_EG: [[i32; 8]; 8] = [
    [-50, -40, -30, -20, -20, -30, -40, -50],
    [-30, -20, -10,   0,   0, -10, -20, -30],
    [-30, -10,  20,  30,  30,  20, -10, -30],
    [-30, -10,  30,  40,  40,  30, -10, -30],
    [-30, -10,  30,  40,  40,  30, -10, -30],
    [-30, -10,  20,  30,  30,  20, -10, -30],
    [-30, -30,   0,   0,   0,   0, -30, -30],
    [-50, -30, -30, -30, -30, -30, -30, -50],
];

#[inline]
fn table_score(table: &[[i32; 8]; 8], row: i8, col: i8, color: Color) -> i32 {
    let row = if color == Color::White { row } else { 7 - row };
    table[row as usize][col as usize]
}

const SLIDING_DIRECTIONS: [(i8, i8); 8] = [
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

fn count_sliding_moves(board: &Board, row: i8, col: i8, piece: Piece) -> i32 {
    let directions = match piece.kind {
        PieceKind::Bishop => &SLIDING_DIRECTIONS[0..4],
        PieceKind::Rook => &SLIDING_DIRECTIONS[4..8],
        _ => &SLIDING_DIRECTIONS[..],
    };

    let mut count = 0;
    for &(dr, dc) in directions {
        let mut r = row + dr;
        let mut c = col + dc;
        while (0..8).contains(&r) && (0..8).contains(&c) {
            match board.piece_on(r, c) {
                None => count += 1,
                Some(target) => {
                    if target.color != piece.color {
                        count += 1;
                    }
                    break;
                }
            }
            r += dr;
            c += dc;
        }
    }
    count
}

fn count_knight_moves(board: &Board, row: i8, col: i8, piece: Piece) -> i32 {
    let mut count = 0;
    for (dr, dc) in KNIGHT_OFFSETS {
        let (r, c) = (row + dr, col + dc);
        if (0..8).contains(&r)
            && (0..8).contains(&c)
            && !board.piece_on(r, c).is_some_and(|p| p.color == piece.color)
        {
            count += 1;
        }
    }
    count
}

impl Board {
    /// Static score from White's perspective: positive favors White.
    pub fn evaluate(&self) -> i32 {
        let mut mg_score = 0;
        let mut eg_score = 0;
        let mut game_phase = 0;

        for row in 0..8 {
            for col in 0..8 {
                let Some(piece) = self.piece_on(row, col) else {
                    continue;
                };

                game_phase += match piece.kind {
                    PieceKind::Knight | PieceKind::Bishop => 1,
                    PieceKind::Rook => 2,
                    PieceKind::Queen => 4,
                    _ => 0,
                };

                let mut mg = MG_VALUE[piece.kind.index()];
                let mut eg = EG_VALUE[piece.kind.index()];

                match piece.kind {
                    PieceKind::Pawn => {
                        mg += table_score(&PAWN_MG, row, col, piece.color);
                        eg += table_score(&PAWN_EG, row, col, piece.color);
                    }
                    PieceKind::Knight => {
                        mg += table_score(&KNIGHT_MG, row, col, piece.color);
                        eg += table_score(&KNIGHT_EG, row, col, piece.color);
                        let mobility = count_knight_moves(self, row, col, piece);
                        mg += mobility * MOBILITY_MG;
                        eg += mobility * MOBILITY_EG;
                    }
                    PieceKind::Bishop => {
                        mg += table_score(&BISHOP_MG, row, col, piece.color);
                        eg += table_score(&BISHOP_EG, row, col, piece.color);
                        let mobility = count_sliding_moves(self, row, col, piece);
                        mg += mobility * MOBILITY_MG;
                        eg += mobility * MOBILITY_EG;
                    }
                    PieceKind::Rook => {
                        mg += table_score(&ROOK_MG, row, col, piece.color);
                        eg += table_score(&ROOK_EG, row, col, piece.color);
                        let mobility = count_sliding_moves(self, row, col, piece);
                        mg += mobility * MOBILITY_MG;
                        eg += mobility * MOBILITY_EG;
                    }
                    PieceKind::Queen => {
                        mg += table_score(&QUEEN_MG, row, col, piece.color);
                        eg += table_score(&QUEEN_EG, row, col, piece.color);
                        let mobility = count_sliding_moves(self, row, col, piece);
                        mg += mobility * MOBILITY_MG;
                        eg += mobility * MOBILITY_EG;
                    }
                    PieceKind::King => {
                        mg += table_score(&KING_MG, row, col, piece.color);
                        eg += table_score(&KING_EG, row, col, piece.color);
                    }
                }

                if piece.color == Color::White {
                    mg_score += mg;
                    eg_score += eg;
                } else {
                    mg_score -= mg;
                    eg_score -= eg;
                }
            }
        }

        let mg_weight = game_phase.min(PHASE_TOTAL);
        let eg_weight = PHASE_TOTAL - mg_weight;

        (mg_score * mg_weight + eg_score * eg_weight) / PHASE_TOTAL
    }

    /// Negamax-friendly score: positive favors the side to move.
    pub fn evaluate_side_to_move_relative(&self) -> i32 {
        match self.side_to_move {
            Color::White => self.evaluate(),
            Color::Black => -self.evaluate(),
        }
    }
}
