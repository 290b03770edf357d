//! Top-level view routing, overlay flags, and the opponent slot map.

use std::collections::HashMap;

use shared::domain::ConnectionId;
use tracing::debug;

use crate::reconcile::OpponentView;

/// Mutually exclusive top-level views. Exactly one is active at any
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Lobby,
    WaitingRoom,
    GameTable,
}

/// Routing state: the single active view, independent overlay flags shown
/// atop the game table, and the connection-id → render-slot map refreshed on
/// every reconciliation.
///
/// There is no transition history and no back-navigation; activating a view
/// deactivates all siblings. The winner overlay latches: once shown it has
/// no hide path, and neither does the color picker outside of a resolved
/// color choice.
#[derive(Debug, Default)]
pub struct ViewRouter {
    active: View,
    color_picker: bool,
    winner: bool,
    slots: HashMap<ConnectionId, usize>,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `target`, implicitly deactivating all siblings.
    pub fn activate(&mut self, target: View) {
        if self.active != target {
            debug!(from = ?self.active, to = ?target, "switching active view");
        }
        self.active = target;
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn show_color_picker(&mut self) {
        self.color_picker = true;
    }

    pub fn hide_color_picker(&mut self) {
        self.color_picker = false;
    }

    pub fn color_picker_visible(&self) -> bool {
        self.color_picker
    }

    pub fn show_winner(&mut self) {
        self.winner = true;
    }

    pub fn winner_visible(&self) -> bool {
        self.winner
    }

    /// Rebuild the opponent slot map from this reconciliation's display
    /// order. Slot indices are positions in the opponent strip.
    pub fn refresh_slots(&mut self, opponents: &[OpponentView]) {
        self.slots = opponents
            .iter()
            .enumerate()
            .map(|(slot, opponent)| (opponent.connection_id.clone(), slot))
            .collect();
    }

    pub fn slot_for(&self, connection_id: &ConnectionId) -> Option<usize> {
        self.slots.get(connection_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opponent(id: &str) -> OpponentView {
        OpponentView {
            connection_id: ConnectionId::new(id),
            username: id.to_string(),
            card_count: 0,
            hidden_hand: Vec::new(),
        }
    }

    #[test]
    fn starts_in_the_lobby() {
        assert_eq!(ViewRouter::new().active(), View::Lobby);
    }

    #[test]
    fn activation_is_mutually_exclusive() {
        let mut router = ViewRouter::new();
        router.activate(View::WaitingRoom);
        assert_eq!(router.active(), View::WaitingRoom);
        router.activate(View::GameTable);
        assert_eq!(router.active(), View::GameTable);
    }

    #[test]
    fn refreshing_slots_drops_stale_entries() {
        let mut router = ViewRouter::new();
        router.refresh_slots(&[opponent("b"), opponent("c")]);
        assert_eq!(router.slot_for(&ConnectionId::new("b")), Some(0));
        assert_eq!(router.slot_for(&ConnectionId::new("c")), Some(1));

        router.refresh_slots(&[opponent("c")]);
        assert_eq!(router.slot_for(&ConnectionId::new("c")), Some(0));
        assert_eq!(router.slot_for(&ConnectionId::new("b")), None);
    }
}
