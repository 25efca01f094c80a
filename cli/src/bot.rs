use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use empirio_core::codec::encode_client_packet;
use empirio_core::protocol::{
    dispatch, ClientPacket, ConnectionHandler, ServerAttack, ServerError, ServerPlayerJoin,
    ServerPlayerLost, ServerStart, ServerTileChange,
};
use empirio_core::room::{PlayerProfile, Room};

#[derive(clap::Subcommand)]
pub(crate) enum BotCommand {
    /// Join a room and keep attacking eligible tiles until the clock or the
    /// opposition runs the bot out.
    Run {
        #[arg(long, env = "EMPIRIO_WS_URL", default_value = "ws://localhost:8080/socket")]
        url: String,
        #[arg(long, default_value = "bot")]
        username: String,
        /// RGB hex without the leading '#'.
        #[arg(long, default_value = "7f7f7f")]
        colour: String,
        /// Room number to join; omitted means the server picks one.
        #[arg(long)]
        room: Option<u32>,
        #[arg(long, default_value_t = 60)]
        duration_secs: u64,
        /// Pause between attack decisions.
        #[arg(long, default_value_t = 750)]
        think_ms: u64,
        /// Power to hoard before spending a click.
        #[arg(long, default_value_t = 4)]
        min_power: u32,
    },
}

pub(crate) async fn run(command: BotCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        BotCommand::Run {
            url,
            username,
            colour,
            room,
            duration_secs,
            think_ms,
            min_power,
        } => {
            let profile = PlayerProfile {
                name: username,
                colour,
            };
            let config = BotRunConfig {
                duration_secs,
                think_ms,
                min_power,
            };
            run_bot(&url, profile, room, config).await
        }
    }
}

struct BotRunConfig {
    duration_secs: u64,
    think_ms: u64,
    min_power: u32,
}

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Mirrors room state through the same dispatch path the browser shell
/// uses. Handlers queue outbound packets; the socket loop drains them.
struct BotSession {
    profile: PlayerProfile,
    room: Option<Room>,
    outbox: Vec<ClientPacket>,
    map_loaded: bool,
    done: bool,
}

impl BotSession {
    fn new(profile: PlayerProfile) -> Self {
        Self {
            profile,
            room: None,
            outbox: Vec::new(),
            map_loaded: false,
            done: false,
        }
    }

    fn drain_outbox(&mut self) -> Vec<ClientPacket> {
        std::mem::take(&mut self.outbox)
    }

    /// One attack decision: hoard power up to the configured floor, then
    /// click a random eligible tile.
    fn think(&mut self, now_ms: f64, min_power: u32) {
        let Some(room) = self.room.as_mut() else {
            return;
        };
        if !self.map_loaded || room.power_level(now_ms) < min_power.max(1) {
            return;
        }
        let candidates: Vec<(u32, u32)> = room
            .field()
            .tiles()
            .map(|tile| (tile.x(), tile.y()))
            .filter(|(x, y)| {
                !room.field().is_owned_by(*x as i32, *y as i32, room.self_id())
                    && room.can_attack(*x, *y, now_ms)
            })
            .collect();
        if candidates.is_empty() {
            return;
        }
        let mut rng = rand::rng();
        let (x, y) = candidates[rng.random_range(0..candidates.len())];
        if let Some(packet) = room.tile_clicked(x, y, now_ms) {
            tracing::info!(x, y, "attacking");
            self.outbox.push(packet);
        }
    }
}

impl ConnectionHandler for BotSession {
    fn on_open(&mut self) {
        tracing::info!("connected");
    }

    fn on_socket_closed(&mut self) {
        tracing::info!("socket closed");
        self.done = true;
    }

    fn on_socket_error(&mut self, reason: &str) {
        tracing::warn!(reason, "socket error");
    }

    fn on_error(&mut self, packet: ServerError) {
        tracing::warn!(message = %packet.message, "server error");
        self.done = true;
    }

    fn on_start(&mut self, packet: ServerStart) {
        match Room::new(&packet, &self.profile, now_ms()) {
            Ok(room) => {
                tracing::info!(
                    room = room.room_number(),
                    width = room.field().width(),
                    height = room.field().height(),
                    "joined"
                );
                self.room = Some(room);
                self.map_loaded = false;
            }
            Err(err) => {
                tracing::warn!(%err, "rejecting start packet");
                self.done = true;
            }
        }
    }

    fn on_player_joined(&mut self, packet: ServerPlayerJoin) {
        if let Some(room) = self.room.as_mut() {
            room.handle_player_join(packet);
        }
    }

    fn on_tile_change(&mut self, packet: ServerTileChange) {
        let Some(room) = self.room.as_mut() else {
            return;
        };
        if let Err(err) = room.handle_tile_change(packet) {
            tracing::warn!(%err, "dropping tile change");
        }
    }

    fn on_map_loaded(&mut self) {
        self.map_loaded = true;
        tracing::info!("map loaded");
    }

    fn on_player_lost(&mut self, packet: ServerPlayerLost) {
        let Some(room) = self.room.as_mut() else {
            return;
        };
        if room.handle_player_lost(packet) {
            tracing::info!("eliminated");
            self.done = true;
        }
    }

    fn on_attacked(&mut self, _packet: ServerAttack) {}
}

async fn run_bot(
    url: &str,
    profile: PlayerProfile,
    room: Option<u32>,
    config: BotRunConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(url)?;
    let (ws, _response) = connect_async(url.as_str()).await?;
    let (mut write, mut read) = ws.split();

    let mut session = BotSession::new(profile.clone());
    session.on_open();

    let play = ClientPacket::Play {
        username: profile.name,
        colour: profile.colour,
        room,
    };
    if let Some(json) = encode_client_packet(&play) {
        write.send(Message::Text(json.into())).await?;
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(config.duration_secs);
    let timeout = tokio::time::sleep_until(deadline);
    tokio::pin!(timeout);
    let mut think = tokio::time::interval(Duration::from_millis(config.think_ms.max(1)));

    loop {
        tokio::select! {
            _ = &mut timeout => {
                tracing::info!("time is up");
                break;
            }
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => dispatch(&mut session, text.as_str()),
                    Some(Ok(Message::Close(_))) | None => {
                        session.on_socket_closed();
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        session.on_socket_error(&err.to_string());
                        session.done = true;
                    }
                }
            }
            _ = think.tick() => {
                session.think(now_ms(), config.min_power);
            }
        }
        for packet in session.drain_outbox() {
            if let Some(json) = encode_client_packet(&packet) {
                write.send(Message::Text(json.into())).await?;
            }
        }
        if session.done {
            break;
        }
    }

    write.close().await.ok();
    Ok(())
}
