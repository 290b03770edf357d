//! Client-local session identity and membership state.

use shared::domain::{Card, ConnectionId, RoomId};
use tracing::{info, warn};

/// Single source of truth for this client's identity and room membership.
///
/// One value per connection, owned by its [`GameClient`](crate::GameClient);
/// mutated only by confirmations arriving from the transport boundary, read
/// by everything else.
#[derive(Debug, Clone, Default)]
pub struct Session {
    connection_id: Option<ConnectionId>,
    username: Option<String>,
    room_id: Option<RoomId>,
    is_host: bool,
    pending_wild: Option<Card>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connection identity is assigned once per connection lifetime; a
    /// differing reassignment is dropped.
    pub fn confirm_connected(&mut self, connection_id: ConnectionId) {
        match &self.connection_id {
            Some(existing) if *existing != connection_id => {
                warn!(
                    existing = %existing,
                    incoming = %connection_id,
                    "ignoring connection id reassignment"
                );
            }
            Some(_) => {}
            None => {
                info!(connection_id = %connection_id, "connection established");
                self.connection_id = Some(connection_id);
            }
        }
    }

    pub fn confirm_room_created(&mut self, room_id: RoomId) {
        self.confirm_room(room_id, true);
    }

    pub fn confirm_room_joined(&mut self, room_id: RoomId) {
        self.confirm_room(room_id, false);
    }

    fn confirm_room(&mut self, room_id: RoomId, is_host: bool) {
        if let Some(existing) = &self.room_id {
            // The authority never returns a client to the lobby, so a second
            // confirmation is unexpected; the latest one still wins.
            warn!(
                existing = %existing,
                incoming = %room_id,
                "room confirmation replaces existing membership"
            );
        }
        info!(room_id = %room_id, is_host, "room membership confirmed");
        self.room_id = Some(room_id);
        self.is_host = is_host;
    }

    pub fn remember_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    pub fn is_host(&self) -> bool {
        self.is_host
    }

    /// At most one wild card may await a color choice; staging a second one
    /// replaces the first.
    pub fn stage_pending_wild(&mut self, card: Card) {
        if let Some(previous) = self.pending_wild.replace(card) {
            warn!(card = %previous, "replacing unresolved pending wild selection");
        }
    }

    pub fn take_pending_wild(&mut self) -> Option<Card> {
        self.pending_wild.take()
    }

    pub fn pending_wild(&self) -> Option<&Card> {
        self.pending_wild.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::CardColor;

    #[test]
    fn connection_id_is_assigned_once() {
        let mut session = Session::new();
        session.confirm_connected(ConnectionId::new("c-1"));
        session.confirm_connected(ConnectionId::new("c-2"));
        assert_eq!(session.connection_id(), Some(&ConnectionId::new("c-1")));
    }

    #[test]
    fn room_created_marks_host_and_room_joined_does_not() {
        let mut host = Session::new();
        host.confirm_room_created(RoomId::new("ABCD"));
        assert_eq!(host.room_id(), Some(&RoomId::new("ABCD")));
        assert!(host.is_host());

        let mut guest = Session::new();
        guest.confirm_room_joined(RoomId::new("ABCD"));
        assert_eq!(guest.room_id(), Some(&RoomId::new("ABCD")));
        assert!(!guest.is_host());
    }

    #[test]
    fn staging_a_second_wild_replaces_the_first() {
        let mut session = Session::new();
        session.stage_pending_wild(Card::new(CardColor::Wild, "Wild"));
        session.stage_pending_wild(Card::new(CardColor::Wild, "Wild Draw Four"));
        assert_eq!(
            session.take_pending_wild(),
            Some(Card::new(CardColor::Wild, "Wild Draw Four"))
        );
        assert_eq!(session.take_pending_wild(), None);
    }
}
