use shared::{
    domain::{Card, CardColor, RoomId},
    protocol::{ClientIntent, GameStateSnapshot, ServerMessage},
};
use tracing::{debug, info, warn};

pub mod reconcile;
pub mod session;
pub mod transport;
pub mod view;

pub use reconcile::{
    reconcile, HandCard, OpponentView, Reconciled, ReconcileError, RosterEntry, TableModel,
    TurnHighlight, WaitingRoomModel, WinnerEvent,
};
pub use session::Session;
pub use transport::{IntentSink, TransportError, TransportEvent, WsIntentSink, WsTransport};
pub use view::{View, ViewRouter};

const ERR_NAME_REQUIRED: &str = "Please enter a name.";
const ERR_NAME_AND_ROOM_REQUIRED: &str = "Please enter name and room code.";
const ERR_TRANSPORT_LOST: &str = "Connection to the game server was lost.";

/// One client instance per connection: owns the session state, the view
/// router, the last render model, the inline error text, and the outbound
/// intent sink.
///
/// Execution is cooperative and single-threaded: every inbound message and
/// every user gesture runs to completion through `&mut self` before the next
/// is processed, so no locking is needed anywhere in here.
pub struct GameClient<S: IntentSink> {
    session: Session,
    router: ViewRouter,
    last_render: Option<Reconciled>,
    error_text: Option<String>,
    winner: Option<WinnerEvent>,
    sink: S,
}

impl<S: IntentSink> GameClient<S> {
    pub fn new(sink: S) -> Self {
        Self {
            session: Session::new(),
            router: ViewRouter::new(),
            last_render: None,
            error_text: None,
            winner: None,
            sink,
        }
    }

    // --- inbound dispatch ---

    /// Maps a transport event onto the inbound dispatch table.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Message(message) => self.handle_server_message(message),
            TransportEvent::Failed(reason) => {
                warn!(%reason, "transport reported a failure");
                self.error_text = Some(reason);
            }
            TransportEvent::Closed => {
                info!("transport closed");
                self.error_text = Some(ERR_TRANSPORT_LOST.to_string());
            }
        }
    }

    /// Explicit dispatch over inbound message kinds, consumed by a single
    /// message loop one message at a time.
    pub fn handle_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Connected { connection_id } => {
                self.session.confirm_connected(connection_id);
            }
            ServerMessage::RoomCreated { room_id } => {
                self.session.confirm_room_created(room_id);
            }
            ServerMessage::RoomJoined { room_id } => {
                self.session.confirm_room_joined(room_id);
            }
            ServerMessage::UpdateGameState { snapshot } => self.apply_snapshot(&snapshot),
            ServerMessage::Error(err) => {
                // Surfaced verbatim; the active view stays put so the user
                // can retry.
                warn!(message = %err.message, "authority reported an error");
                self.error_text = Some(err.message);
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: &GameStateSnapshot) {
        if self.winner.is_some() {
            debug!("dropping snapshot received after winner announcement");
            return;
        }
        match reconcile(snapshot, &self.session) {
            Ok(Reconciled::Winner(event)) => {
                info!(message = %event.message, "winner announced");
                self.router.show_winner();
                self.winner = Some(event);
            }
            Ok(Reconciled::WaitingRoom(model)) => {
                self.router.activate(View::WaitingRoom);
                self.last_render = Some(Reconciled::WaitingRoom(model));
            }
            Ok(Reconciled::Table(model)) => {
                self.router.refresh_slots(&model.opponents);
                self.router.activate(View::GameTable);
                self.last_render = Some(Reconciled::Table(model));
            }
            Err(err) => {
                warn!(%err, "snapshot could not be reconciled");
                self.error_text = Some(err.to_string());
            }
        }
    }

    // --- gesture handlers ---

    pub fn handle_create_room(&mut self, username: &str) {
        let username = username.trim();
        if username.is_empty() {
            self.error_text = Some(ERR_NAME_REQUIRED.to_string());
            return;
        }
        self.error_text = None;
        self.session.remember_username(username);
        self.emit(ClientIntent::CreateRoom {
            username: username.to_string(),
        });
    }

    pub fn handle_join_room(&mut self, username: &str, room_id: &str) {
        let username = username.trim();
        let room_id = room_id.trim();
        if username.is_empty() || room_id.is_empty() {
            self.error_text = Some(ERR_NAME_AND_ROOM_REQUIRED.to_string());
            return;
        }
        self.error_text = None;
        self.session.remember_username(username);
        self.emit(ClientIntent::JoinRoom {
            username: username.to_string(),
            room_id: RoomId::new(room_id),
        });
    }

    /// Host-only visibility of the start control is the only local gate;
    /// the authority decides whether the start is honored.
    pub fn handle_start_game(&mut self) {
        let Some(room_id) = self.session.room_id().cloned() else {
            debug!("start gesture outside a room; ignoring");
            return;
        };
        self.emit(ClientIntent::StartGame { room_id });
    }

    /// A tap on a hand card. Silently ignored unless it is this client's
    /// turn and the card was marked playable by the last reconciliation.
    pub fn handle_card_click(&mut self, card: &Card) {
        let playable = self
            .table()
            .map(|table| {
                table.my_turn
                    && table
                        .hand
                        .iter()
                        .any(|hand_card| hand_card.card == *card && hand_card.playable)
            })
            .unwrap_or(false);
        if !playable {
            debug!(card = %card, "ignoring click on a non-playable card");
            return;
        }
        let Some(room_id) = self.session.room_id().cloned() else {
            debug!("card click without room membership; ignoring");
            return;
        };
        if card.is_wild() {
            self.session.stage_pending_wild(card.clone());
            self.router.show_color_picker();
            return;
        }
        self.emit(ClientIntent::PlayCard {
            room_id,
            card: card.clone(),
            chosen_color: None,
        });
    }

    /// Resolves the pending wild selection into a play intent. The emitted
    /// card keeps its `Wild` color; the chosen color rides alongside.
    pub fn handle_color_chosen(&mut self, color: CardColor) {
        if !color.is_solid() {
            debug!(%color, "ignoring non-solid wild color choice");
            return;
        }
        let Some(card) = self.session.take_pending_wild() else {
            debug!("color chosen without a pending wild selection; ignoring");
            return;
        };
        self.router.hide_color_picker();
        let Some(room_id) = self.session.room_id().cloned() else {
            warn!("pending wild resolved outside a room; dropping play");
            return;
        };
        self.emit(ClientIntent::PlayCard {
            room_id,
            card,
            chosen_color: Some(color),
        });
    }

    pub fn handle_draw_click(&mut self) {
        let my_turn = self.table().map(|table| table.my_turn).unwrap_or(false);
        if !my_turn {
            debug!("draw click outside own turn; ignoring");
            return;
        }
        let Some(room_id) = self.session.room_id().cloned() else {
            debug!("draw click without room membership; ignoring");
            return;
        };
        self.emit(ClientIntent::DrawCard { room_id });
    }

    fn emit(&mut self, intent: ClientIntent) {
        if let Err(err) = self.sink.send(intent) {
            warn!(%err, "failed to hand intent to transport");
            self.error_text = Some(ERR_TRANSPORT_LOST.to_string());
        }
    }

    // --- read accessors ---

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn active_view(&self) -> View {
        self.router.active()
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    pub fn winner(&self) -> Option<&WinnerEvent> {
        self.winner.as_ref()
    }

    pub fn last_render(&self) -> Option<&Reconciled> {
        self.last_render.as_ref()
    }

    pub fn waiting_room(&self) -> Option<&WaitingRoomModel> {
        match &self.last_render {
            Some(Reconciled::WaitingRoom(model)) => Some(model),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&TableModel> {
        match &self.last_render {
            Some(Reconciled::Table(model)) => Some(model),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
