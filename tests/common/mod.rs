//! Recording fakes for driving the dispatcher without a platform

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use async_trait::async_trait;

use guild_bot::application::errors::{BotError, StorageError};
use guild_bot::application::messaging::Dispatcher;
use guild_bot::application::services::MutationPolicy;
use guild_bot::domain::entities::{Capability, GatewayEvent, GuildConfiguration, GuildInfo, MessageEvent, Reply};
use guild_bot::domain::traits::{BotInfo, Gateway, GuildStore, PermissionOracle};
use guild_bot::infrastructure::storage::MemoryGuildStore;

pub const BOT_ID: &str = "999999999999999999";
pub const GUILD: &str = "500000000000000000";
pub const C1: &str = "111111111111111111";
pub const C2: &str = "222222222222222222";
pub const C3: &str = "333333333333333333";
pub const ADMIN: &str = "admin";
pub const MEMBER: &str = "member";

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
pub struct RecordingGateway {
    pub replies: Mutex<Vec<(String, Reply)>>,
    pub reactions: Mutex<Vec<(String, String, String)>>,
    pub fail_sends: AtomicBool,
    pub fail_reactions: AtomicBool,
    pub fail_guild_lookup: AtomicBool,
}

impl RecordingGateway {
    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn last_reply(&self) -> Option<Reply> {
        self.replies().last().cloned()
    }

    pub fn reactions(&self) -> Vec<String> {
        self.reactions.lock().unwrap().iter().map(|(_, _, e)| e.clone()).collect()
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn send_reply(&self, channel_id: &str, reply: &Reply) -> Result<String, BotError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(BotError::Network("send failed".to_string()));
        }
        let mut replies = self.replies.lock().unwrap();
        replies.push((channel_id.to_string(), reply.clone()));
        Ok(format!("reply-{}", replies.len()))
    }

    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<(), BotError> {
        if self.fail_reactions.load(Ordering::SeqCst) {
            return Err(BotError::Network("reaction failed".to_string()));
        }
        self.reactions.lock().unwrap().push((
            channel_id.to_string(),
            message_id.to_string(),
            emoji.to_string(),
        ));
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<GuildInfo, BotError> {
        if self.fail_guild_lookup.load(Ordering::SeqCst) {
            return Err(BotError::NotFound(format!("guild {}", guild_id)));
        }
        Ok(GuildInfo::new(guild_id, "Test Guild"))
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: BOT_ID.to_string(),
            name: "guild-bot".to_string(),
        }
    }
}

pub struct FakeOracle {
    pub admins: HashSet<String>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeOracle {
    pub fn with_admins(admins: &[&str]) -> Self {
        Self {
            admins: admins.iter().map(|a| a.to_string()).collect(),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PermissionOracle for FakeOracle {
    async fn has_capability(&self, _guild_id: &str, user_id: &str, _capability: Capability) -> Result<bool, BotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(BotError::Network("permission lookup failed".to_string()));
        }
        Ok(self.admins.contains(user_id))
    }
}

/// Memory store that counts writes; writes can be switched to fail
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryGuildStore,
    pub upserts: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GuildStore for CountingStore {
    async fn find_by_guild_id(&self, guild_id: &str) -> Result<Option<GuildConfiguration>, StorageError> {
        self.inner.find_by_guild_id(guild_id).await
    }

    async fn upsert(&self, config: &GuildConfiguration) -> Result<(), StorageError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Serialization("disk full".to_string()));
        }
        self.inner.upsert(config).await
    }
}

pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub gateway: Arc<RecordingGateway>,
    pub oracle: Arc<FakeOracle>,
    pub store: Arc<CountingStore>,
}

impl Harness {
    pub fn new() -> Self {
        ensure_init();
        let gateway = Arc::new(RecordingGateway::default());
        let oracle = Arc::new(FakeOracle::with_admins(&[ADMIN]));
        let store = Arc::new(CountingStore::default());
        let dispatcher = Dispatcher::with_defaults(
            store.clone(),
            gateway.clone(),
            oracle.clone(),
            MutationPolicy::default(),
            "!",
        );
        Self {
            dispatcher: Arc::new(dispatcher),
            gateway,
            oracle,
            store,
        }
    }

    /// Harness whose guild has already joined with channels C1 and C2
    pub async fn joined() -> Self {
        let harness = Self::new();
        let guild = GuildInfo::new(GUILD, "Test Guild").with_channels(vec![C1.to_string(), C2.to_string()]);
        harness.dispatcher.on_guild_join(&guild).await.unwrap();
        harness
    }

    pub async fn send(&self, channel: &str, author: &str, content: &str) -> Result<(), BotError> {
        let event = GatewayEvent::Message(MessageEvent::new(GUILD, channel, author, content));
        self.dispatcher.dispatch(&event).await
    }

    pub async fn stored(&self) -> GuildConfiguration {
        self.store.find_by_guild_id(GUILD).await.unwrap().unwrap()
    }
}
