use std::time::Instant;

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::board::Board;
use crate::moves::{MoveFlag, MoveRollback};

impl Board {
    pub fn start_perft(&mut self, depth: u8, divide: bool) -> u64 {
        let mut rollback = MoveRollback::default();
        let mut stats = PerftStats::default();

        let start_time = Instant::now();
        do_perft(depth, self, &mut rollback, &mut stats, divide);
        let elapsed = start_time.elapsed();

        if divide {
            println!("\n{}", stats.nodes);
        }

        let nps = stats.nodes as f64 / elapsed.as_secs_f64();
        info!(
            "depth {depth} in {elapsed:#?}. Nodes: {}. Nodes per second: {}",
            stats.nodes.to_formatted_string(&Locale::en),
            (nps as u64).to_formatted_string(&Locale::en)
        );
        info!("{:?}", stats);
        debug_assert!(rollback.is_empty());

        stats.nodes
    }
}

#[derive(Debug, Default)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub eps: u64,
    pub castles: u64,
    pub promotions: u64,
}

// Code referenced from https://www.chessprogramming.org/Perft
fn do_perft(depth: u8, board: &mut Board, rollback: &mut MoveRollback, stats: &mut PerftStats, divide: bool) {
    if depth == 0 {
        stats.nodes += 1;
        return;
    }

    for r#move in board.generate_moves() {
        if depth == 1 {
            match r#move.flag {
                MoveFlag::EnPassant => {
                    stats.captures += 1;
                    stats.eps += 1;
                }
                MoveFlag::CastleKing | MoveFlag::CastleQueen => stats.castles += 1,
                _ => {
                    if board.piece_at(r#move.to).is_some() {
                        stats.captures += 1;
                    }
                    if matches!(r#move.flag, MoveFlag::Promotion(_)) {
                        stats.promotions += 1;
                    }
                }
            }
        }

        let nodes_before = stats.nodes;
        board.make_move(&r#move, rollback);
        do_perft(depth - 1, board, rollback, stats, false);
        board.unmake_move(&r#move, rollback);

        if divide {
            println!(
                "{} {}",
                r#move.to_long_algebraic(),
                stats.nodes - nodes_before
            );
        }
    }
}
