//! Turn state machine for one chess session
//!
//! Interaction model: a click either selects a friendly piece (caching its
//! legal destinations), re-selects, deselects, or - when it lands on a
//! cached destination - applies the move. Moves that finalize flip the turn,
//! recompute the opponent's check status and produce a full state snapshot
//! for broadcast; a pawn reaching the far rank parks the session until a
//! promotion kind is chosen.
//!
//! Illegal clicks are silent no-ops. In an online session, clicks while it
//! is not the local seat's turn (or before the opponent arrives) are no-ops
//! as well. Snapshots received from the peer are adopted verbatim without
//! re-validation.

use tracing::{debug, info, warn};

use chess_logic::{
    has_any_legal_move, is_in_check, legal_destinations, simulate_move, Board, CapturedPieces,
    CastlingRights, Color, LastMove, Piece, PieceKind, Position,
};
use shared::GameSnapshot;

/// A selected piece with its cached legal destinations.
#[derive(Clone, Debug)]
pub struct Selection {
    pub pos: Position,
    pub destinations: Vec<Position>,
}

/// The session controller. Exclusively owns its board; all speculative
/// legality work happens on copies inside the rules engine.
pub struct GameSession {
    board: Board,
    turn: Color,
    selected: Option<Selection>,
    in_check: bool,
    game_over: bool,
    winner: Option<Color>,
    captured: CapturedPieces,
    last_move: Option<LastMove>,
    castling_rights: CastlingRights,
    promotion_pending: Option<Position>,
    /// The local player's seat in an online game; `None` means hotseat play.
    seat: Option<Color>,
    opponent_joined: bool,
}

impl GameSession {
    /// A hotseat session: both colors are played at this terminal.
    pub fn local() -> Self {
        Self::with_seat(None)
    }

    /// An online session playing the given seat. Moves are gated until the
    /// opponent joins.
    pub fn online(seat: Color) -> Self {
        Self::with_seat(Some(seat))
    }

    fn with_seat(seat: Option<Color>) -> Self {
        GameSession {
            board: Board::initial(),
            turn: Color::White,
            selected: None,
            in_check: false,
            game_over: false,
            winner: None,
            captured: CapturedPieces::default(),
            last_move: None,
            castling_rights: CastlingRights::initial(),
            promotion_pending: None,
            seat,
            opponent_joined: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn in_check(&self) -> bool {
        self.in_check
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn captured(&self) -> &CapturedPieces {
        &self.captured
    }

    pub fn promotion_pending(&self) -> Option<Position> {
        self.promotion_pending
    }

    pub fn seat(&self) -> Option<Color> {
        self.seat
    }

    /// The opponent's seat is filled; moves are allowed from here on.
    pub fn mark_opponent_joined(&mut self) {
        self.opponent_joined = true;
    }

    /// Process a click on a board cell. Returns the state snapshot to
    /// broadcast when the click completed a move; `None` otherwise
    /// (selection changes, no-ops, and moves parked on promotion).
    pub fn handle_square_click(&mut self, pos: Position) -> Option<GameSnapshot> {
        if self.game_over || self.promotion_pending.is_some() {
            return None;
        }
        if let Some(seat) = self.seat {
            if self.turn != seat || !self.opponent_joined {
                return None;
            }
        }

        let Some(selection) = self.selected.clone() else {
            self.try_select(pos);
            return None;
        };

        // Clicking the selected cell again deselects.
        if selection.pos == pos {
            self.selected = None;
            return None;
        }

        // Clicking another friendly piece switches the selection.
        if self.board.piece_at(pos).is_some_and(|p| p.color == self.turn) {
            self.try_select(pos);
            return None;
        }

        if selection.destinations.contains(&pos) {
            return self.apply_move(selection.pos, pos);
        }

        // Illegal destination: no state change, selection persists.
        None
    }

    /// Resolve a pending promotion. Only the four promotion kinds are
    /// accepted; anything else leaves the session parked.
    pub fn choose_promotion(&mut self, kind: PieceKind) -> Option<GameSnapshot> {
        let square = self.promotion_pending?;
        if !matches!(
            kind,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        ) {
            return None;
        }

        self.board.set(square, Some(Piece::new(kind, self.turn)));
        self.promotion_pending = None;
        Some(self.finalize())
    }

    /// Adopt the peer's broadcast state verbatim.
    pub fn adopt_snapshot(&mut self, snapshot: GameSnapshot) {
        self.board = snapshot.board;
        self.turn = snapshot.turn;
        self.in_check = snapshot.in_check;
        self.game_over = snapshot.game_over;
        self.winner = snapshot.winner;
        self.captured = snapshot.captured;
        self.last_move = snapshot.last_move;
        self.castling_rights = snapshot.castling_rights;
        self.selected = None;
        self.promotion_pending = None;
    }

    /// The complete current state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            turn: self.turn,
            in_check: self.in_check,
            game_over: self.game_over,
            winner: self.winner,
            captured: self.captured.clone(),
            last_move: self.last_move,
            castling_rights: self.castling_rights,
        }
    }

    /// The peer disconnected: an immediate, unconditional win for the
    /// remaining player.
    pub fn opponent_left(&mut self) {
        self.game_over = true;
        self.winner = self.seat;
        self.opponent_joined = false;
    }

    /// Start over (local replay or an accepted rematch), keeping the seat.
    pub fn reset(&mut self) {
        let seat = self.seat;
        let opponent_joined = self.opponent_joined;
        *self = Self::with_seat(seat);
        self.opponent_joined = opponent_joined;
    }

    fn try_select(&mut self, pos: Position) {
        let Some(piece) = self.board.piece_at(pos) else {
            return;
        };
        if piece.color != self.turn {
            return;
        }
        let destinations = legal_destinations(
            &self.board,
            pos,
            self.turn,
            self.last_move.as_ref(),
            &self.castling_rights,
        );
        debug!("[SESSION] Selected {pos} ({} destinations)", destinations.len());
        self.selected = Some(Selection { pos, destinations });
    }

    /// Apply a validated move: capture bookkeeping, rights revocation, the
    /// board effect (including en passant removal and the castling rook
    /// slide), and the promotion hold when a pawn reaches the far rank.
    fn apply_move(&mut self, from: Position, to: Position) -> Option<GameSnapshot> {
        let piece = self.board.piece_at(from)?;
        let target = self.board.piece_at(to);

        // A diagonal pawn move onto an empty square is en passant; the
        // victim never occupied the destination cell.
        if piece.kind == PieceKind::Pawn && from.col != to.col && target.is_none() {
            self.captured.record(self.turn, PieceKind::Pawn);
        }
        if let Some(target) = target {
            self.captured.record(self.turn, target.kind);
        }

        self.update_castling_rights(piece, from, to, target);
        self.board = simulate_move(&self.board, from, to);
        self.last_move = Some(LastMove { from, to, piece });
        self.selected = None;

        if piece.kind == PieceKind::Pawn && (to.row == 0 || to.row == 7) {
            // The move is fully applied but the turn does not flip until a
            // promotion kind is chosen.
            self.promotion_pending = Some(to);
            return None;
        }

        Some(self.finalize())
    }

    /// Revocations are monotonic: a king move drops both flags, a rook move
    /// from its home square drops that side, and a rook captured on its
    /// home square drops the victim's side.
    fn update_castling_rights(
        &mut self,
        piece: Piece,
        from: Position,
        to: Position,
        target: Option<Piece>,
    ) {
        if piece.kind == PieceKind::King {
            self.castling_rights.revoke_all(piece.color);
        }
        if piece.kind == PieceKind::Rook && from.row == home_row(piece.color) {
            let side = self.castling_rights.side_mut(piece.color);
            match from.col {
                0 => side.queen_side = false,
                7 => side.king_side = false,
                _ => {}
            }
        }
        if let Some(target) = target {
            if target.kind == PieceKind::Rook && to.row == home_row(target.color) {
                let side = self.castling_rights.side_mut(target.color);
                match to.col {
                    0 => side.queen_side = false,
                    7 => side.king_side = false,
                    _ => {}
                }
            }
        }
    }

    /// Shared tail of a normal move and a resolved promotion: flip the
    /// turn, recompute the opponent's status, and emit the snapshot.
    fn finalize(&mut self) -> GameSnapshot {
        let mover = self.turn;
        let next = mover.opponent();
        self.turn = next;
        self.selected = None;

        self.in_check = is_in_check(&self.board, next);
        let any_move =
            has_any_legal_move(&self.board, next, self.last_move.as_ref(), &self.castling_rights);

        if self.in_check {
            if any_move {
                info!("[SESSION] {next:?} is in check");
            } else {
                info!("[SESSION] Checkmate - {mover:?} wins");
                self.game_over = true;
                self.winner = Some(mover);
            }
        } else if !any_move {
            // Recognized, but not a game-ending outcome.
            warn!("[SESSION] {next:?} is stalemated");
        }

        self.snapshot()
    }
}

fn home_row(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}
