use anyhow::Result;
use clap::Parser;
use client_core::{GameClient, TransportEvent, TurnHighlight, View, WsIntentSink, WsTransport};
use shared::domain::CardColor;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    server_url: String,
    #[arg(long)]
    username: String,
    /// Join this room instead of creating a new one.
    #[arg(long)]
    room: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut transport = WsTransport::connect(&args.server_url).await?;
    let mut client = GameClient::new(transport.sink.clone());

    match &args.room {
        Some(room) => client.handle_join_room(&args.username, room),
        None => client.handle_create_room(&args.username),
    }
    render(&client);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    print_help();
    loop {
        tokio::select! {
            event = transport.events.recv() => {
                let Some(event) = event else { break };
                let closed = matches!(event, TransportEvent::Closed);
                client.handle_transport_event(event);
                render(&client);
                if closed {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                handle_command(&mut client, line.trim());
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("commands: start | play <n> | draw | color <red|yellow|green|blue> | state | help");
}

fn handle_command(client: &mut GameClient<WsIntentSink>, line: &str) {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("start") => client.handle_start_game(),
        Some("draw") => client.handle_draw_click(),
        Some("play") => {
            let Some(index) = parts.next().and_then(|raw| raw.parse::<usize>().ok()) else {
                println!("usage: play <card index>");
                return;
            };
            let card = client
                .table()
                .and_then(|table| table.hand.get(index))
                .map(|hand_card| hand_card.card.clone());
            match card {
                Some(card) => client.handle_card_click(&card),
                None => println!("no card at index {index}"),
            }
        }
        Some("color") => {
            let color = match parts.next() {
                Some("red") => CardColor::Red,
                Some("yellow") => CardColor::Yellow,
                Some("green") => CardColor::Green,
                Some("blue") => CardColor::Blue,
                _ => {
                    println!("usage: color <red|yellow|green|blue>");
                    return;
                }
            };
            client.handle_color_chosen(color);
        }
        Some("state") => match client.last_render() {
            Some(model) => match serde_json::to_string_pretty(model) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("failed to encode state: {err}"),
            },
            None => println!("no state yet"),
        },
        Some("help") => print_help(),
        Some(other) => println!("unknown command: {other}"),
        None => {}
    }
    render(client);
}

fn render(client: &GameClient<WsIntentSink>) {
    println!();
    match client.active_view() {
        View::Lobby => println!("[lobby] waiting for a room confirmation"),
        View::WaitingRoom => {
            if let Some(model) = client.waiting_room() {
                println!("[room {}]", model.room_code);
                for entry in &model.roster {
                    println!("  {}", entry.label());
                }
                if model.can_start {
                    println!("  type `start` to begin");
                }
            }
        }
        View::GameTable => {
            if let Some(table) = client.table() {
                for opponent in &table.opponents {
                    let marker = if table.highlight
                        == TurnHighlight::Opponent(opponent.connection_id.clone())
                    {
                        "  <- turn"
                    } else {
                        ""
                    };
                    println!("  {} ({} cards){marker}", opponent.username, opponent.card_count);
                }
                println!(
                    "  discard: {}   draw pile: {} cards",
                    table.discard_top, table.draw_pile_count
                );
                for (index, hand_card) in table.hand.iter().enumerate() {
                    let marker = if hand_card.playable { " *" } else { "" };
                    println!("  [{index}] {}{marker}", hand_card.card);
                }
                if table.my_turn {
                    println!("  your turn: `play <n>` or `draw`");
                }
            }
        }
    }
    if client.router().color_picker_visible() {
        println!("  pick a color for the wild: `color <red|yellow|green|blue>`");
    }
    if let Some(winner) = client.winner() {
        println!("*** {} ***", winner.message);
    }
    if let Some(error) = client.error_text() {
        println!("! {error}");
    }
}
