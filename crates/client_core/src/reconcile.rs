//! Pure reconciliation of authoritative snapshots into render models.
//!
//! Every snapshot is recomputed whole; nothing here patches prior state, so
//! an in-order snapshot stream can never leave a stale fragment behind. The
//! authority owns all legality decisions; the `playable` flags computed here
//! are a rendering hint, mirrored by the gesture gating in the client.

use serde::Serialize;
use shared::{
    domain::{Card, ConnectionId, RoomId},
    protocol::{GameStateSnapshot, PlayerSummary},
};
use thiserror::Error;

use crate::session::Session;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("waiting-room snapshot arrived without a confirmed room id")]
    MissingRoom,
    #[error("started-game snapshot is missing the discard top")]
    MissingDiscardTop,
    #[error("started-game snapshot is missing the current turn holder")]
    MissingCurrentTurn,
}

/// The one entity marked as holding the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum TurnHighlight {
    #[default]
    None,
    Me,
    Opponent(ConnectionId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub connection_id: ConnectionId,
    pub username: String,
    pub is_host: bool,
}

impl RosterEntry {
    /// Host-annotated display label for the waiting-room player list.
    pub fn label(&self) -> String {
        if self.is_host {
            format!("{} (Host)", self.username)
        } else {
            self.username.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingRoomModel {
    pub room_code: RoomId,
    pub roster: Vec<RosterEntry>,
    /// Whether the start control should be offered; equals the local host
    /// flag. The authority still decides whether a start is honored.
    pub can_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandCard {
    pub card: Card,
    pub playable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpponentView {
    pub connection_id: ConnectionId,
    pub username: String,
    pub card_count: usize,
    /// Exactly `card_count` face-down placeholders. Opponents' actual cards
    /// never reach the render model.
    pub hidden_hand: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableModel {
    pub hand: Vec<HandCard>,
    /// Opponents in turn-rotation order starting immediately after self.
    pub opponents: Vec<OpponentView>,
    pub discard_top: Card,
    pub draw_pile_count: usize,
    pub my_turn: bool,
    pub highlight: TurnHighlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerEvent {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Reconciled {
    Winner(WinnerEvent),
    WaitingRoom(WaitingRoomModel),
    Table(TableModel),
}

/// Derives the render model for one authoritative snapshot.
///
/// Reads session identity only; no side effects. A winner snapshot is
/// terminal and short-circuits every other field.
pub fn reconcile(
    snapshot: &GameStateSnapshot,
    session: &Session,
) -> Result<Reconciled, ReconcileError> {
    if let Some(winner) = &snapshot.winner {
        return Ok(Reconciled::Winner(WinnerEvent {
            message: format!("{winner} wins!"),
        }));
    }

    if !snapshot.game_started {
        let room_code = session
            .room_id()
            .cloned()
            .ok_or(ReconcileError::MissingRoom)?;
        let roster = snapshot
            .players
            .iter()
            .map(|player| RosterEntry {
                connection_id: player.connection_id.clone(),
                username: player.username.clone(),
                is_host: player.connection_id == snapshot.host_connection_id,
            })
            .collect();
        return Ok(Reconciled::WaitingRoom(WaitingRoomModel {
            room_code,
            roster,
            can_start: session.is_host(),
        }));
    }

    let discard_top = snapshot
        .discard_top
        .clone()
        .ok_or(ReconcileError::MissingDiscardTop)?;
    let current_turn = snapshot
        .current_turn_connection_id
        .as_ref()
        .ok_or(ReconcileError::MissingCurrentTurn)?;
    let my_turn = session.connection_id() == Some(current_turn);

    let hand = snapshot
        .player_hand
        .iter()
        .map(|card| HandCard {
            playable: my_turn && card.can_follow(&discard_top),
            card: card.clone(),
        })
        .collect();

    let opponents: Vec<OpponentView> = opponent_rotation(&snapshot.players, session.connection_id())
        .into_iter()
        .map(|player| OpponentView {
            connection_id: player.connection_id.clone(),
            username: player.username.clone(),
            card_count: player.card_count,
            hidden_hand: vec![Card::face_down(); player.card_count],
        })
        .collect();

    let highlight = if my_turn {
        TurnHighlight::Me
    } else if opponents
        .iter()
        .any(|opponent| opponent.connection_id == *current_turn)
    {
        TurnHighlight::Opponent(current_turn.clone())
    } else {
        // Turn holder is not rendered locally; nothing gets highlighted.
        TurnHighlight::None
    };

    Ok(Reconciled::Table(TableModel {
        hand,
        opponents,
        discard_top,
        draw_pile_count: snapshot.draw_pile_count,
        my_turn,
        highlight,
    }))
}

/// Opponents in turn-rotation order: everyone after self, then everyone
/// before self. Without a self entry the authority's order is kept as-is.
fn opponent_rotation<'a>(
    players: &'a [PlayerSummary],
    me: Option<&ConnectionId>,
) -> Vec<&'a PlayerSummary> {
    let Some(me) = me else {
        return players.iter().collect();
    };
    match players.iter().position(|player| player.connection_id == *me) {
        Some(index) => players[index + 1..]
            .iter()
            .chain(players[..index].iter())
            .collect(),
        None => players.iter().collect(),
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
