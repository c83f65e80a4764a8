use log::debug;

use crate::board::Board;
use crate::evaluate::{CENTIPAWN_VALUES, INFINITY, MATE_VALUE};
use crate::moves::{Move, MoveFlag, MoveList, MoveRollback};

pub const SEARCH_DEPTH: u8 = 6;

#[derive(Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth: u8,
}

/// MVV-LVA: captures first, biggest victim first, cheapest attacker breaking
/// ties; promotions next; everything else is quiet. En passant scores as
/// quiet because the destination square is empty.
fn score_move(board: &Board, r#move: &Move) -> i32 {
    if let Some(victim) = board.piece_at(r#move.to) {
        let attacker = board
            .piece_at(r#move.from)
            .map(|p| CENTIPAWN_VALUES[p.kind.index()])
            .unwrap_or(0);
        return 10_000 + CENTIPAWN_VALUES[victim.kind.index()] - attacker / 10;
    }

    if matches!(r#move.flag, MoveFlag::Promotion(_)) {
        return 9_000;
    }

    0
}

fn prioritize_moves(moves: &mut MoveList, board: &Board) {
    moves.sort_unstable_by_key(|m| -score_move(board, m));
}

impl Board {
    /// Picks a move for the side to move at the configured depth. `None` iff
    /// there is no legal move.
    pub fn find_best_move(&mut self) -> (Option<Move>, i32, SearchStats) {
        let result = self.find_best_move_at_depth(SEARCH_DEPTH);
        debug!(
            "searched {} nodes at depth {}, best {:?} score {}",
            result.2.nodes,
            result.2.depth,
            result.0.map(|m| m.to_long_algebraic()),
            result.1
        );
        result
    }

    pub fn find_best_move_at_depth(&mut self, depth: u8) -> (Option<Move>, i32, SearchStats) {
        let mut stats = SearchStats {
            nodes: 0,
            depth,
        };
        let mut rollback = MoveRollback::default();

        let mut moves = self.generate_moves();
        if moves.is_empty() {
            return (None, 0, stats);
        }
        prioritize_moves(&mut moves, self);

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_value = -INFINITY;
        let mut best_move = None;

        for r#move in &moves {
            self.make_move(r#move, &mut rollback);
            let value = -self.negamax(depth as i32 - 1, -beta, -alpha, 1, &mut rollback, &mut stats);
            self.unmake_move(r#move, &mut rollback);

            if value > best_value {
                best_value = value;
                best_move = Some(*r#move);
            }
            if value > alpha {
                alpha = value;
            }
        }

        debug_assert!(rollback.is_empty());
        (best_move, best_value, stats)
    }

    fn negamax(
        &mut self,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        ply: i32,
        rollback: &mut MoveRollback,
        stats: &mut SearchStats,
    ) -> i32 {
        if self.halfmove_clock >= 100 || self.insufficient_material() {
            return 0;
        }

        let in_check = self.is_king_in_check(self.side_to_move);
        let depth = if in_check { depth + 1 } else { depth };

        if depth <= 0 {
            return self.quiescence(alpha, beta, rollback, stats);
        }

        stats.nodes += 1;

        let mut moves = self.generate_moves();
        if moves.is_empty() {
            return if in_check { -MATE_VALUE + ply } else { 0 };
        }
        prioritize_moves(&mut moves, self);

        let mut best_value = -INFINITY;
        for r#move in &moves {
            self.make_move(r#move, rollback);
            let value = -self.negamax(depth - 1, -beta, -alpha, ply + 1, rollback, stats);
            self.unmake_move(r#move, rollback);

            if value > best_value {
                best_value = value;
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                break;
            }
        }

        best_value
    }

    /// Captures-only extension at the horizon to avoid cutting the search off
    /// in the middle of an exchange.
    fn quiescence(
        &mut self,
        mut alpha: i32,
        beta: i32,
        rollback: &mut MoveRollback,
        stats: &mut SearchStats,
    ) -> i32 {
        stats.nodes += 1;

        let stand_pat = self.evaluate_side_to_move_relative();
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = self.generate_moves();
        prioritize_moves(&mut moves, self);

        for r#move in &moves {
            let is_capture =
                self.piece_at(r#move.to).is_some() || r#move.flag == MoveFlag::EnPassant;
            if !is_capture {
                continue;
            }

            self.make_move(r#move, rollback);
            let value = -self.quiescence(-beta, -alpha, rollback, stats);
            self.unmake_move(r#move, rollback);

            if value >= beta {
                return beta;
            }
            if value > alpha {
                alpha = value;
            }
        }

        alpha
    }
}

#[cfg(test)]
mod search_tests {
    use crate::board::{Board, Square};
    use crate::evaluate::MATE_VALUE;
    use crate::moves::{MoveFlag, MoveRollback};

    use super::*;

    #[test]
    pub fn capture_ordering_prefers_big_victims_and_small_attackers() {
        // White can take the d5 queen with the e4 pawn or the c3 knight.
        let mut board = Board::from_fen("4k3/8/8/3q4/4P3/2N5/8/4K3 w - - 0 1").unwrap();
        let mut moves = board.generate_moves();
        prioritize_moves(&mut moves, &board);

        assert_eq!(Square::new(3, 3), moves[0].to);
        assert_eq!(Square::new(4, 4), moves[0].from, "pawn takes before knight takes");
        assert_eq!(Square::new(3, 3), moves[1].to);
        assert_eq!(Square::new(5, 2), moves[1].from);
    }

    #[test]
    pub fn promotions_order_ahead_of_quiet_moves() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut moves = board.generate_moves();
        prioritize_moves(&mut moves, &board);

        assert!(matches!(moves[0].flag, MoveFlag::Promotion(_)));
        assert!(matches!(moves[3].flag, MoveFlag::Promotion(_)));
        assert_eq!(MoveFlag::Normal, moves[4].flag);
    }

    #[test]
    pub fn finds_back_rank_mate_in_one() {
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let (best, score, _) = board.find_best_move_at_depth(2);

        let best = best.unwrap();
        assert_eq!(Square::new(7, 0), best.from);
        assert_eq!(Square::new(0, 0), best.to);
        assert!(score >= MATE_VALUE - 2, "expected a mate score, got {score}");
    }

    #[test]
    pub fn prefers_the_faster_mate() {
        // Either rook mates on a8 at once; everything else mates later at
        // best, so a mate-in-one must come back.
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/RR4K1 w - - 0 1").unwrap();
        let (best, score, _) = board.find_best_move_at_depth(4);

        let best = best.unwrap();
        board.make_move(&best, &mut MoveRollback::default());
        assert!(board.is_king_in_check(crate::board::Color::Black));
        assert!(board.generate_moves().is_empty(), "expected an immediate mate");
        assert!(score >= MATE_VALUE - 2);
    }

    #[test]
    pub fn stalemate_returns_no_move() {
        let mut board = Board::from_fen("8/8/8/8/8/6k1/5q2/7K w - - 0 1").unwrap();
        let (best, _, _) = board.find_best_move_at_depth(4);
        assert!(best.is_none());
        assert_eq!(0, board.generate_moves().len());
    }

    #[test]
    pub fn some_move_is_returned_whenever_one_exists() {
        let mut board = Board::default();
        let (best, _, _) = board.find_best_move_at_depth(3);
        assert!(best.is_some());
    }

    #[test]
    pub fn halfmove_rule_reads_as_a_draw() {
        // Up a rook but the clock has run out: the search scores it level.
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").unwrap();
        let mut rollback = MoveRollback::default();
        let mut stats = SearchStats::default();
        let score = board.negamax(2, -INFINITY, INFINITY, 1, &mut rollback, &mut stats);
        assert_eq!(0, score);
    }

    #[test]
    pub fn wins_the_hanging_queen() {
        let mut board = Board::from_fen("k7/8/8/3q4/4P3/8/8/7K w - - 0 1").unwrap();
        let (best, score, _) = board.find_best_move_at_depth(3);

        let best = best.unwrap();
        assert_eq!(Square::new(3, 3), best.to);
        assert!(score > 50, "winning the queen should score well, got {score}");
    }
}
