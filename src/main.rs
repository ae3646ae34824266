use std::io::{self, BufRead, Write};

use chess_rules::{
    new_board, Board, ChessError, Color, GlyphStyle, MoveReport, OutputMode, Piece, PieceType,
    ShellConfig, ShellMsg, Square, HEIGHT, WIDTH,
};

fn glyph(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceType::King) => '\u{2654}',
        (Color::White, PieceType::Queen) => '\u{2655}',
        (Color::White, PieceType::Rook) => '\u{2656}',
        (Color::White, PieceType::Bishop) => '\u{2657}',
        (Color::White, PieceType::Knight) => '\u{2658}',
        (Color::White, PieceType::Pawn) => '\u{2659}',
        (Color::Black, PieceType::King) => '\u{265A}',
        (Color::Black, PieceType::Queen) => '\u{265B}',
        (Color::Black, PieceType::Rook) => '\u{265C}',
        (Color::Black, PieceType::Bishop) => '\u{265D}',
        (Color::Black, PieceType::Knight) => '\u{265E}',
        (Color::Black, PieceType::Pawn) => '\u{265F}',
    }
}

fn draw_board(board: &Board, style: GlyphStyle) {
    for row in 0..HEIGHT {
        print!("{} ", HEIGHT - row);
        for col in 0..WIDTH {
            let icon = match Square::new(row, col).and_then(|square| board.piece_at(square)) {
                None => '.',
                Some(p) => match style {
                    GlyphStyle::Unicode => glyph(p),
                    GlyphStyle::Ascii => p.letter(),
                },
            };
            print!("{} ", icon);
        }
        println!();
    }
    print!("  ");
    for col in 0..WIDTH {
        print!("{} ", (b'a' + col as u8) as char);
    }
    println!();
}

fn read_token(lines: &mut impl Iterator<Item = io::Result<String>>, prompt: &str) -> Option<String> {
    println!("{}", prompt);
    if let Err(e) = io::stdout().flush() {
        log::warn!("Cannot flush stdout, error: {}", e);
    }
    match lines.next() {
        Some(Ok(line)) => Some(line.trim().to_string()),
        Some(Err(e)) => {
            log::error!("Cannot read stdin, error: {}", e);
            None
        }
        None => None,
    }
}

fn emit(config: &ShellConfig, msg: &ShellMsg) {
    match config.output {
        OutputMode::Json => match serde_json::to_string(msg) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Cannot serialize, error: {}", e),
        },
        OutputMode::Text => match msg {
            ShellMsg::Move { report, .. } => {
                if !report.moved {
                    println!("That piece cannot move to that square, try another one!");
                }
                if let Some(taken) = report.captured {
                    println!("{:?} {:?} captured", taken.color, taken.kind);
                }
                print_status(report.in_check, report.checkmate);
            }
            ShellMsg::Promotion { report, .. } => print_status(report.in_check, report.checkmate),
            ShellMsg::Error { reason } => println!("{}", reason),
        },
    }
}

fn print_status(in_check: bool, checkmate: bool) {
    if checkmate {
        println!("Checkmate!");
    }
    else if in_check {
        println!("Check!");
    }
}

fn promotion_choice(letter: &str) -> PieceType {
    PieceType::from_promotion_letter(letter).unwrap_or_else(|e| {
        log::warn!("{}, promoting to a queen", e);
        PieceType::Queen
    })
}

fn play_turn(
    board: &mut Board,
    from: &str,
    to: &str,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    config: &ShellConfig,
) -> Result<(), ChessError> {
    let report: MoveReport = board.play(from, to)?;
    emit(config, &ShellMsg::Move { from, to, report });
    if report.promotion_pending {
        let letter = read_token(lines, "Promote pawn to (Q, R, N, B)?").unwrap_or_default();
        let piece = promotion_choice(&letter);
        let report = board.promote(piece)?;
        emit(config, &ShellMsg::Promotion { piece, report });
    }
    Ok(())
}

fn main() {
    let logger_env = env_logger::Env::default().filter_or("LOG_LEVEL", "warn");
    env_logger::Builder::from_env(logger_env).format_timestamp_millis().init();

    let config = ShellConfig::from_env();
    log::debug!("Shell config: {:?}", config);

    let mut board = new_board();
    draw_board(&board, config.glyphs);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("{:?} to move", board.color_to_play());
        let Some(from) = read_token(&mut lines, "From?") else { break };
        let Some(to) = read_token(&mut lines, "To?") else { break };

        if let Err(e) = play_turn(&mut board, &from, &to, &mut lines, &config) {
            emit(&config, &ShellMsg::Error { reason: e.to_string() });
        }
        draw_board(&board, config.glyphs);
        if board.is_checkmate() {
            break;
        }
    }
}
