//! Terminal driver for NeonMate
//!
//! A thin front end over the session controller and the relay connection:
//! moves are typed as coordinate pairs ("e2e4"), promotions as "=q", chat
//! and rematch handling as slash commands. Rendering is a plain ascii
//! board; everything that matters lives in `session` and `networking`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chess_logic::{Color, PieceKind, Position};
use neonmate::networking::Connection;
use neonmate::session::GameSession;
use shared::{ClientMessage, GameSnapshot, ServerMessage};

#[derive(Parser)]
#[command(name = "neonmate", about = "Two-player chess over a relay server")]
struct Cli {
    /// Relay server WebSocket endpoint
    #[arg(long, default_value = "ws://127.0.0.1:3001/ws")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hotseat game in this terminal, no server involved
    Local,
    /// Create an online room and wait for an opponent
    Create {
        /// Take the black pieces instead of white
        #[arg(long)]
        black: bool,
    },
    /// Join an existing room by its code
    Join { room_id: String },
}

/// One line of user input.
enum Input {
    Move(Position, Position),
    Promote(PieceKind),
    Chat(String),
    Rematch,
    Accept,
    Reject,
    Reset,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Local => run_local().await,
        Command::Create { black } => {
            let color = black.then_some(Color::Black);
            run_online(&cli.server, ClientMessage::CreateRoom { preferred_color: color }).await
        }
        Command::Join { room_id } => {
            run_online(&cli.server, ClientMessage::JoinRoom { room_id }).await
        }
    }
}

async fn run_local() -> Result<()> {
    println!("Local game. Moves like e2e4, promotion =q, /reset, /quit.");
    let mut session = GameSession::local();
    render(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_input(&line) else {
            println!("Commands: e2e4, =q/=r/=b/=n, /reset, /quit");
            continue;
        };
        match input {
            Input::Quit => break,
            Input::Reset => {
                session.reset();
                render(&session);
            }
            Input::Move(from, to) => {
                apply_move(&mut session, from, to);
                render(&session);
            }
            Input::Promote(kind) => {
                if session.choose_promotion(kind).is_some() {
                    render(&session);
                }
            }
            _ => println!("Only available in an online game"),
        }
    }
    Ok(())
}

async fn run_online(server: &str, opening: ClientMessage) -> Result<()> {
    let mut conn = Connection::connect(server).await?;
    conn.send(&opening).await?;

    let mut session: Option<GameSession> = None;
    let mut room_id = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            msg = conn.recv() => {
                let Some(msg) = msg? else {
                    println!("Connection closed.");
                    break;
                };
                handle_server_message(msg, &mut session, &mut room_id);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(input) = parse_input(&line) else {
                    println!("Commands: e2e4, =q, /say <text>, /rematch, /accept, /reject, /quit");
                    continue;
                };
                if !handle_input(input, &mut session, &room_id, &mut conn).await? {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Returns false when the user quits.
async fn handle_input(
    input: Input,
    session: &mut Option<GameSession>,
    room_id: &str,
    conn: &mut Connection,
) -> Result<bool> {
    let Some(active) = session.as_mut() else {
        if matches!(input, Input::Quit) {
            return Ok(false);
        }
        println!("Not in a room yet.");
        return Ok(true);
    };

    match input {
        Input::Quit => return Ok(false),
        Input::Move(from, to) => {
            if let Some(snapshot) = apply_move(active, from, to) {
                broadcast(conn, room_id, snapshot).await?;
                render(active);
            }
        }
        Input::Promote(kind) => {
            if let Some(snapshot) = active.choose_promotion(kind) {
                broadcast(conn, room_id, snapshot).await?;
                render(active);
            }
        }
        Input::Chat(text) => {
            if let Some(sender) = active.seat() {
                conn.send(&ClientMessage::SendMessage {
                    room_id: room_id.to_string(),
                    text,
                    sender,
                })
                .await?;
            }
        }
        Input::Rematch => {
            conn.send(&ClientMessage::RequestRematch { room_id: room_id.to_string() }).await?;
            println!("Rematch requested.");
        }
        Input::Accept => {
            conn.send(&ClientMessage::AcceptRematch { room_id: room_id.to_string() }).await?;
        }
        Input::Reject => {
            conn.send(&ClientMessage::RejectRematch { room_id: room_id.to_string() }).await?;
        }
        Input::Reset => println!("Online games reset through /rematch."),
    }
    Ok(true)
}

async fn broadcast(conn: &mut Connection, room_id: &str, state: GameSnapshot) -> Result<()> {
    conn.send(&ClientMessage::Move {
        room_id: room_id.to_string(),
        state,
    })
    .await
}

fn handle_server_message(
    msg: ServerMessage,
    session: &mut Option<GameSession>,
    room_id: &mut String,
) {
    match msg {
        ServerMessage::RoomCreated { room_id: id, color } => {
            println!("Room created: {id} - you play {color:?}. Share the code!");
            *room_id = id;
            *session = Some(GameSession::online(color));
        }
        ServerMessage::RoomJoined { room_id: id, color } => {
            println!("Joined room {id} as {color:?}.");
            *room_id = id;
            let mut joined = GameSession::online(color);
            joined.mark_opponent_joined();
            render(&joined);
            *session = Some(joined);
        }
        ServerMessage::GameStart { .. } => {
            if let Some(active) = session.as_mut() {
                active.mark_opponent_joined();
                println!("Opponent joined - game on.");
                render(active);
            }
        }
        ServerMessage::ReceiveMove { state } => {
            if let Some(active) = session.as_mut() {
                active.adopt_snapshot(state);
                render(active);
            }
        }
        ServerMessage::ReceiveMessage { sender, text, .. } => {
            println!("[chat] {sender:?}: {text}");
        }
        ServerMessage::RematchRequestReceived => {
            println!("Opponent requests a rematch (/accept or /reject).");
        }
        ServerMessage::GameReset => {
            if let Some(active) = session.as_mut() {
                active.reset();
                println!("Rematch accepted - new game.");
                render(active);
            }
        }
        ServerMessage::RematchRejected => println!("Rematch declined."),
        ServerMessage::ReceiveTimeout { payload } => {
            debug!("[CLIENT] Timeout report: {payload}");
            println!("Timeout reported: {payload}");
        }
        ServerMessage::OpponentDisconnected => {
            if let Some(active) = session.as_mut() {
                active.opponent_left();
                println!("Opponent disconnected - you win!");
            }
        }
        ServerMessage::Error { message } => println!("Server error: {message}"),
    }
}

/// Drive a move as the two clicks the session expects. Failed attempts
/// leave the session unselected so the next line starts fresh.
fn apply_move(session: &mut GameSession, from: Position, to: Position) -> Option<GameSnapshot> {
    session.handle_square_click(from);
    if session.selection().is_none() {
        println!("Nothing to move on {from}.");
        return None;
    }

    let snapshot = session.handle_square_click(to);
    if snapshot.is_none() {
        if session.promotion_pending().is_some() {
            println!("Promote with =q, =r, =b or =n.");
        } else {
            println!("{from}{to} is not a legal move.");
            if let Some(pos) = session.selection().map(|s| s.pos) {
                session.handle_square_click(pos);
            }
        }
    }
    snapshot
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix("/say ") {
        return Some(Input::Chat(text.to_string()));
    }
    match line {
        "/quit" | "/exit" => return Some(Input::Quit),
        "/rematch" => return Some(Input::Rematch),
        "/accept" => return Some(Input::Accept),
        "/reject" => return Some(Input::Reject),
        "/reset" => return Some(Input::Reset),
        _ => {}
    }
    if let Some(kind) = line.strip_prefix('=') {
        let kind = match kind {
            "q" => PieceKind::Queen,
            "r" => PieceKind::Rook,
            "b" => PieceKind::Bishop,
            "n" => PieceKind::Knight,
            _ => return None,
        };
        return Some(Input::Promote(kind));
    }
    if line.len() == 4 && line.is_ascii() {
        let from = Position::from_algebraic(&line[..2])?;
        let to = Position::from_algebraic(&line[2..])?;
        return Some(Input::Move(from, to));
    }
    None
}

fn render(session: &GameSession) {
    let board = session.board();
    println!();
    for row in 0..8u8 {
        print!("{} ", 8 - row);
        for col in 0..8u8 {
            match board.piece_at(Position::new(row, col)) {
                Some(piece) => print!("{} ", piece.glyph()),
                None => print!("· "),
            }
        }
        println!();
    }
    println!("  a b c d e f g h");

    let captured = session.captured();
    if !captured.white_captured.is_empty() || !captured.black_captured.is_empty() {
        println!(
            "Captured - white: {:?}, black: {:?}",
            captured.white_captured, captured.black_captured
        );
    }

    if session.is_game_over() {
        match session.winner() {
            Some(winner) => println!("GAME OVER - {winner:?} wins!"),
            None => println!("GAME OVER"),
        }
    } else if session.in_check() {
        println!("CHECK! ({:?} to move)", session.turn());
    } else {
        println!("{:?} to move", session.turn());
    }
}
