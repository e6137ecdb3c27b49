use super::User;
use chrono::{DateTime, Utc};

/// Kind of channel a message arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// One-to-one conversation with the bot
    Direct,
    /// Multi-user channel inside a guild
    Guild,
}

impl ChannelKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChannelKind::Direct => "dm",
            ChannelKind::Guild => "text",
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, ChannelKind::Direct)
    }
}

/// An inbound chat message, scoped to a single dispatch
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub channel: ChannelKind,
    pub guild_id: Option<String>,
    pub author: User,
    pub content: String,
    /// When the message was received; cooldowns are measured against it
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            channel: ChannelKind::Guild,
            guild_id: None,
            author,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_channel(mut self, channel: ChannelKind) -> Self {
        self.channel = channel;
        self
    }

    /// Mark the message as coming from a channel inside `guild_id`
    pub fn in_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.channel = ChannelKind::Guild;
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_direct(&self) -> bool {
        self.channel.is_direct()
    }
}
