//! Discord adapter
//!
//! The gateway connection, heartbeats and reconnects are owned by serenity;
//! this module only converts events and sends responses.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serenity::all::{
    ChannelId, Client, Context, EventHandler, GatewayIntents, Message as DiscordMessage, Ready,
    ResumedEvent,
};
use serenity::http::Http;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::{DispatchOutcome, MessageDispatcher};
use crate::domain::entities::{ChannelKind, Message, User};
use crate::domain::traits::{Bot, BotInfo};

/// Gateway intents needed to read prefixed messages in guilds and DMs
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Discord bot adapter bound to an HTTP client
pub struct DiscordAdapter {
    http: Arc<Http>,
    info: BotInfo,
}

impl DiscordAdapter {
    pub fn new(http: Arc<Http>, info: BotInfo) -> Self {
        Self { http, info }
    }
}

#[async_trait]
impl Bot for DiscordAdapter {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        let channel = parse_channel_id(channel_id)?;
        let sent = channel
            .say(&self.http, text)
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;
        Ok(sent.id.to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

fn parse_channel_id(channel_id: &str) -> Result<ChannelId, BotError> {
    match channel_id.parse::<u64>() {
        Ok(id) if id != 0 => Ok(ChannelId::new(id)),
        _ => Err(BotError::Internal(format!("Invalid channel id: {}", channel_id))),
    }
}

/// Convert a serenity message into the bot's message type
pub fn convert_message(msg: &DiscordMessage) -> Message {
    let mut author = User::new(msg.author.id.to_string()).with_name(msg.author.name.clone());
    if msg.author.bot {
        author = author.as_bot();
    }

    let message = Message::new(msg.channel_id.to_string(), author, msg.content.clone())
        .with_id(msg.id.to_string());

    match msg.guild_id {
        Some(guild_id) => message.in_guild(guild_id.to_string()),
        None => message.with_channel(ChannelKind::Direct),
    }
}

/// Serenity event handler feeding the dispatcher
pub struct DiscordHandler {
    dispatcher: Arc<MessageDispatcher>,
    info: OnceCell<BotInfo>,
}

impl DiscordHandler {
    pub fn new(dispatcher: Arc<MessageDispatcher>) -> Self {
        Self {
            dispatcher,
            info: OnceCell::new(),
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.get().cloned().unwrap_or_else(|| BotInfo {
            id: "unknown".to_string(),
            name: "herald-bot".to_string(),
        })
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let _ = self.info.set(BotInfo {
            id: ready.user.id.to_string(),
            name: ready.user.name.clone(),
        });
        tracing::info!("{} is online!", ready.user.name);
    }

    async fn resume(&self, _ctx: Context, _event: ResumedEvent) {
        tracing::info!("Gateway session resumed");
    }

    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        let message = convert_message(&msg);
        let bot = DiscordAdapter::new(ctx.http.clone(), self.bot_info());

        match self.dispatcher.dispatch(&bot, &message).await {
            DispatchOutcome::Ignored => {}
            outcome => tracing::debug!("[{}] Dispatch outcome: {:?}", message.channel_id, outcome),
        }
    }
}

/// Connect to the gateway and process events until the client stops
pub async fn run_discord_bot(token: &str, dispatcher: Arc<MessageDispatcher>) -> Result<(), BotError> {
    let mut client = Client::builder(token, required_intents())
        .event_handler(DiscordHandler::new(dispatcher))
        .await
        .map_err(|e| BotError::Auth(format!("Failed to create Discord client: {}", e)))?;

    tracing::info!("Connecting to Discord gateway...");
    client
        .start()
        .await
        .map_err(|e| BotError::Gateway(e.to_string()))
}
