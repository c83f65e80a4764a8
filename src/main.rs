use std::io::{self, Write};
use std::path::Path;

use log::debug;

use marten_chess::board::{piece_char, Board, Color};
use marten_chess::fileio;
use marten_chess::moves::{resolve_move, Move, MoveRollback};

const BOARD_FILE: &str = "board.txt";

fn print_board(board: &Board) {
    println!("\n   +-----------------+");
    for row in 0..8 {
        print!(" {} | ", 8 - row);
        for col in 0..8 {
            let c = match board.piece_on(row, col) {
                Some(piece) => piece_char(piece),
                None => '.',
            };
            print!("{} ", c);
        }
        println!("|");
    }
    println!("   +-----------------+");
    println!("     a b c d e f g h");
    println!(
        "Side to move: {}",
        if board.side_to_move == Color::White { "White" } else { "Black" }
    );
}

fn read_token() -> Option<String> {
    print!("\nYour move (e.g. e2e4, a7a8q, or 'quit'): ");
    io::stdout().flush().ok()?;

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => input.split_whitespace().next().map(str::to_string),
    }
}

fn main() {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| BOARD_FILE.to_string());
    let path = Path::new(&path);

    let mut board = match fileio::load_board(path) {
        Ok(board) => board,
        Err(e) => {
            println!("No usable {} ({}). Loading standard start.", path.display(), e);
            Board::default()
        }
    };
    let mut rollback = MoveRollback::default();

    loop {
        print_board(&board);

        let legal_moves = board.generate_moves();
        if legal_moves.is_empty() {
            if board.is_king_in_check(board.side_to_move) {
                println!("Checkmate. Game over.");
            } else {
                println!("Stalemate. Game over.");
            }
            break;
        }

        if board.side_to_move == Color::White {
            let Some(token) = read_token() else {
                break;
            };

            if token == "quit" {
                break;
            }
            if token == "save" {
                match fileio::save_board(path, &board) {
                    Ok(()) => println!("Saved."),
                    Err(e) => println!("Save failed: {}", e),
                }
                continue;
            }

            let parsed = match Move::from_long_algebraic(&token) {
                Ok(m) => m,
                Err(e) => {
                    println!("Invalid format: {}", e);
                    continue;
                }
            };

            let Some(r#move) = resolve_move(&legal_moves, &parsed) else {
                println!("Illegal move.");
                continue;
            };

            board.make_move(&r#move, &mut rollback);
        } else {
            println!("\nEngine thinking...");
            let (best, score, stats) = board.find_best_move();

            let Some(r#move) = best else {
                println!("Game over (Checkmate or Stalemate).");
                break;
            };

            println!("Engine plays: {}", r#move.to_long_algebraic());
            debug!("engine score {score} after {} nodes", stats.nodes);
            board.make_move(&r#move, &mut rollback);
        }
    }

    println!("Exiting...");
}
