use std::fs;
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::board::{piece_char, piece_from_char, Board, Color, Square};

/// Errors from reading or writing the 13-line board text format.
#[derive(Debug, Error)]
pub enum BoardFileError {
    #[error("board file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed board file: {0}")]
    Format(String),
}

fn format_err<T>(message: impl Into<String>) -> Result<T, BoardFileError> {
    Err(BoardFileError::Format(message.into()))
}

/// Parses the save format: eight 8-character rows from rank 8 down, side to
/// move, castling rights, en passant target, halfmove clock, fullmove number.
pub fn parse_board_text(text: &str) -> Result<Board, BoardFileError> {
    let mut lines = text.lines();
    let mut board = Board::empty();

    for row in 0..8 {
        let Some(line) = lines.next() else {
            return format_err(format!("missing board row {}", row + 1));
        };
        let chars: Vec<char> = line.chars().collect();
        if chars.len() < 8 {
            return format_err(format!(
                "board row {} has {} characters, expected 8",
                row + 1,
                chars.len()
            ));
        }

        for col in 0..8 {
            let c = chars[col];
            let piece = if c == '.' {
                None
            } else {
                match piece_from_char(c) {
                    Some(piece) => Some(piece),
                    None => return format_err(format!("unexpected piece character '{}'", c)),
                }
            };
            board.set_piece(Square::new(row as i8, col as i8), piece);
        }
    }

    let Some(side) = lines.next() else {
        return format_err("missing side to move line");
    };
    board.side_to_move = match side.trim_end() {
        "w" => Color::White,
        "b" => Color::Black,
        other => return format_err(format!("unexpected side to move '{}'", other)),
    };

    let Some(castling) = lines.next() else {
        return format_err("missing castling rights line");
    };
    if castling.trim_end() != "-" {
        for c in castling.trim_end().chars() {
            match c {
                'K' => board.castling.wk = true,
                'Q' => board.castling.wq = true,
                'k' => board.castling.bk = true,
                'q' => board.castling.bq = true,
                _ => return format_err(format!("unexpected castling character '{}'", c)),
            }
        }
    }

    let Some(ep) = lines.next() else {
        return format_err("missing en passant line");
    };
    let ep = ep.trim_end();
    if ep != "-" {
        match Square::from_algebraic(ep) {
            Some(sq) => board.en_passant_target = Some(sq),
            None => return format_err(format!("unexpected en passant target '{}'", ep)),
        }
    }

    let Some(halfmove) = lines.next() else {
        return format_err("missing halfmove clock line");
    };
    board.halfmove_clock = match halfmove.trim().parse::<u32>() {
        Ok(v) => v,
        Err(e) => return format_err(format!("bad halfmove clock '{}': {}", halfmove.trim(), e)),
    };

    let Some(fullmove) = lines.next() else {
        return format_err("missing fullmove number line");
    };
    board.fullmove_number = match fullmove.trim().parse::<u32>() {
        Ok(v) => v,
        Err(e) => return format_err(format!("bad fullmove number '{}': {}", fullmove.trim(), e)),
    };

    Ok(board)
}

/// Renders the exact 13 lines `parse_board_text` reads.
pub fn render_board_text(board: &Board) -> String {
    let mut out = String::new();

    for row in 0..8 {
        for col in 0..8 {
            match board.piece_on(row, col) {
                Some(piece) => out.push(piece_char(piece)),
                None => out.push('.'),
            }
        }
        out.push('\n');
    }

    out.push(if board.side_to_move == Color::White { 'w' } else { 'b' });
    out.push('\n');

    if board.castling.any() {
        if board.castling.wk {
            out.push('K');
        }
        if board.castling.wq {
            out.push('Q');
        }
        if board.castling.bk {
            out.push('k');
        }
        if board.castling.bq {
            out.push('q');
        }
    } else {
        out.push('-');
    }
    out.push('\n');

    match board.en_passant_target {
        Some(sq) => out.push_str(&sq.to_string()),
        None => out.push('-'),
    }
    out.push('\n');

    out.push_str(&format!("{}\n{}\n", board.halfmove_clock, board.fullmove_number));
    out
}

pub fn load_board(path: &Path) -> Result<Board, BoardFileError> {
    let text = fs::read_to_string(path)?;
    let board = parse_board_text(&text)?;
    debug!("loaded board from {}", path.display());
    Ok(board)
}

pub fn save_board(path: &Path, board: &Board) -> Result<(), BoardFileError> {
    fs::write(path, render_board_text(board))?;
    debug!("saved board to {}", path.display());
    Ok(())
}
