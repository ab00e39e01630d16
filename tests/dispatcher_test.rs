//! Dispatcher integration tests
//! Run with: cargo test --test dispatcher_test

mod common;

use std::sync::atomic::Ordering;
use common::*;
use guild_bot::application::errors::BotError;
use guild_bot::application::messaging::{spawn_event, wait_for_event};
use guild_bot::application::services::commands::PING_REACTION;
use guild_bot::domain::entities::{GatewayEvent, GuildInfo, MessageEvent, FAILURE_COLOR, SUCCESS_COLOR};
use guild_bot::domain::traits::GuildStore;

#[tokio::test]
async fn test_join_creates_single_default_record() {
    let harness = Harness::joined().await;

    let config = harness.stored().await;
    assert_eq!(config.prefix, "!");
    assert_eq!(config.guild_name, "Test Guild");
    assert_eq!(config.bot_channels, vec![C1, C2]);
    assert_eq!(harness.store.upserts(), 1);

    // A second join leaves the record alone
    let guild = GuildInfo::new(GUILD, "Renamed").with_channels(vec![C3.to_string()]);
    harness.dispatcher.on_guild_join(&guild).await.unwrap();
    assert_eq!(harness.store.upserts(), 1);
    assert_eq!(harness.stored().await.bot_channels, vec![C1, C2]);
}

#[tokio::test]
async fn test_ping_replies_and_reacts() {
    let harness = Harness::joined().await;
    harness.send(C1, MEMBER, "!ping").await.unwrap();

    let reply = harness.gateway.last_reply().unwrap();
    assert_eq!(reply.description, "pong!");
    assert_eq!(reply.color, SUCCESS_COLOR);
    assert_eq!(harness.gateway.reactions(), vec![PING_REACTION]);
}

#[tokio::test]
async fn test_reaction_targets_invoking_message() {
    let harness = Harness::joined().await;
    let event = GatewayEvent::Message(MessageEvent::new(GUILD, C1, MEMBER, "!ping").with_id("m-42"));
    harness.dispatcher.dispatch(&event).await.unwrap();

    let reactions = harness.gateway.reactions.lock().unwrap().clone();
    assert_eq!(reactions, vec![(C1.to_string(), "m-42".to_string(), PING_REACTION.to_string())]);
}

#[tokio::test]
async fn test_unprefixed_messages_are_ignored() {
    let harness = Harness::joined().await;
    for content in ["ping", "hello !ping", "?prefix ?", " !ping"] {
        harness.send(C1, ADMIN, content).await.unwrap();
    }

    assert!(harness.gateway.replies().is_empty());
    assert!(harness.gateway.reactions().is_empty());
    assert_eq!(harness.store.upserts(), 1);
}

#[tokio::test]
async fn test_own_messages_are_ignored() {
    let harness = Harness::joined().await;
    for content in ["!ping", "!prefix ?", "!setbotchannel"] {
        harness.send(C1, BOT_ID, content).await.unwrap();
    }

    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.store.upserts(), 1);
    assert_eq!(harness.oracle.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_disallowed_channel_is_ignored() {
    let harness = Harness::joined().await;
    harness.send(C3, ADMIN, "!ping").await.unwrap();
    harness.send(C3, ADMIN, "!prefix ?").await.unwrap();

    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.stored().await.prefix, "!");
}

#[tokio::test]
async fn test_unconfigured_guild_fails_without_reply() {
    let harness = Harness::new();
    let err = harness.send(C1, ADMIN, "!ping").await.unwrap_err();

    assert!(matches!(err, BotError::GuildNotConfigured(id) if id == GUILD));
    assert!(harness.gateway.replies().is_empty());
}

#[tokio::test]
async fn test_keyword_must_match_exactly() {
    let harness = Harness::joined().await;
    harness.send(C1, ADMIN, "!prefixxx").await.unwrap();
    harness.send(C1, ADMIN, "!pingpong").await.unwrap();
    harness.send(C1, ADMIN, "!setbotchannels").await.unwrap();

    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.store.upserts(), 1);
}

#[tokio::test]
async fn test_prefix_shown_to_anyone() {
    let harness = Harness::joined().await;
    harness.send(C1, MEMBER, "!prefix").await.unwrap();

    assert_eq!(
        harness.gateway.last_reply().unwrap().description,
        "The prefix for this server is `!`."
    );
    assert_eq!(harness.oracle.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_prefix_too_long_is_rejected() {
    let harness = Harness::joined().await;
    harness.send(C1, ADMIN, "!prefix abc").await.unwrap();

    let reply = harness.gateway.last_reply().unwrap();
    assert_eq!(reply.description, "The chosen prefix is too long.");
    assert_eq!(reply.color, FAILURE_COLOR);
    assert_eq!(harness.stored().await.prefix, "!");
    assert_eq!(harness.store.upserts(), 1);
}

#[tokio::test]
async fn test_prefix_change_by_member_is_silent_noop() {
    let harness = Harness::joined().await;
    harness.send(C1, MEMBER, "!prefix ?").await.unwrap();

    assert_eq!(harness.oracle.calls.load(Ordering::SeqCst), 1);
    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.store.upserts(), 1);
    assert_eq!(harness.stored().await.prefix, "!");
}

#[tokio::test]
async fn test_oracle_failure_aborts_silently() {
    let harness = Harness::joined().await;
    harness.oracle.fail.store(true, Ordering::SeqCst);

    let result = harness.send(C1, ADMIN, "!prefix ?").await;
    assert!(matches!(result, Err(BotError::Network(_))));
    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.store.upserts(), 1);
}

#[tokio::test]
async fn test_prefix_round_trip() {
    let harness = Harness::joined().await;
    harness.send(C1, ADMIN, "!prefix ?").await.unwrap();
    assert_eq!(
        harness.gateway.last_reply().unwrap().description,
        "Updated successfully prefix now set to `?`"
    );

    // Old prefix no longer works, new one does
    harness.send(C1, MEMBER, "!prefix").await.unwrap();
    assert_eq!(harness.gateway.replies().len(), 1);

    harness.send(C1, MEMBER, "?prefix").await.unwrap();
    assert_eq!(
        harness.gateway.last_reply().unwrap().description,
        "The prefix for this server is `?`."
    );

    // The allow-list survives a prefix change
    assert_eq!(harness.stored().await.bot_channels, vec![C1, C2]);
}

#[tokio::test]
async fn test_setbotchannel_without_args_uses_current_channel() {
    let harness = Harness::joined().await;
    harness.send(C2, ADMIN, "!setbotchannel").await.unwrap();

    assert_eq!(harness.stored().await.bot_channels, vec![C2]);
    assert_eq!(
        harness.gateway.last_reply().unwrap().description,
        format!("Updated successfully this channel is set to take bot commands; channel ID: `{}`", C2)
    );

    // C1 is no longer eligible
    harness.send(C1, ADMIN, "!ping").await.unwrap();
    assert_eq!(harness.gateway.replies().len(), 1);
}

#[tokio::test]
async fn test_setbotchannel_rejects_whole_list_on_bad_id() {
    let harness = Harness::joined().await;
    harness
        .send(C1, ADMIN, &format!("!setbotchannel {} 12345 {}", C3, C1))
        .await
        .unwrap();

    let reply = harness.gateway.last_reply().unwrap();
    assert_eq!(reply.color, FAILURE_COLOR);
    assert!(reply.description.contains("`12345`"));
    assert_eq!(harness.stored().await.bot_channels, vec![C1, C2]);
    assert_eq!(harness.store.upserts(), 1);
}

#[tokio::test]
async fn test_setbotchannel_is_idempotent() {
    let harness = Harness::joined().await;
    let command = format!("!setbotchannel {} {}", C1, C3);

    harness.send(C1, ADMIN, &command).await.unwrap();
    let first = harness.stored().await.bot_channels;
    harness.send(C1, ADMIN, &command).await.unwrap();
    let second = harness.stored().await.bot_channels;

    assert_eq!(first, vec![C1, C3]);
    assert_eq!(second, first);

    let replies = harness.gateway.replies();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0], replies[1]);
    assert_eq!(
        replies[1].description,
        format!("Updated successfully the channel IDs: \n`{},{}` \nnow take bot commands.", C1, C3)
    );
}

#[tokio::test]
async fn test_setbotchannel_by_member_is_silent_noop() {
    let harness = Harness::joined().await;
    harness.send(C1, MEMBER, &format!("!setbotchannel {}", C3)).await.unwrap();

    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.stored().await.bot_channels, vec![C1, C2]);
}

#[tokio::test]
async fn test_send_failure_skips_reaction() {
    let harness = Harness::joined().await;
    harness.gateway.fail_sends.store(true, Ordering::SeqCst);

    let result = harness.send(C1, MEMBER, "!ping").await;
    assert!(matches!(result, Err(BotError::Network(_))));
    assert!(harness.gateway.reactions().is_empty());
}

#[tokio::test]
async fn test_store_write_failure_aborts_silently() {
    let harness = Harness::joined().await;
    harness.store.fail_writes.store(true, Ordering::SeqCst);

    let result = harness.send(C1, ADMIN, "!prefix ?").await;
    assert!(matches!(result, Err(BotError::Storage(_))));
    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.stored().await.prefix, "!");

    let result = harness.send(C1, ADMIN, &format!("!setbotchannel {}", C3)).await;
    assert!(matches!(result, Err(BotError::Storage(_))));
    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.stored().await.bot_channels, vec![C1, C2]);
}

#[tokio::test]
async fn test_guild_lookup_failure_aborts_prefix_change() {
    let harness = Harness::joined().await;
    harness.gateway.fail_guild_lookup.store(true, Ordering::SeqCst);

    let result = harness.send(C1, ADMIN, "!prefix ?").await;
    assert!(matches!(result, Err(BotError::NotFound(_))));
    assert!(harness.gateway.replies().is_empty());
    assert_eq!(harness.store.upserts(), 1);
    assert_eq!(harness.stored().await.prefix, "!");
}

#[tokio::test]
async fn test_reaction_failure_is_returned() {
    let harness = Harness::joined().await;
    harness.gateway.fail_reactions.store(true, Ordering::SeqCst);

    let result = harness.send(C1, MEMBER, "!ping").await;
    assert!(matches!(result, Err(BotError::Network(_))));
    // The reply went out before the reaction was attempted
    assert_eq!(harness.gateway.replies().len(), 1);
    assert!(harness.gateway.reactions().is_empty());
    assert_eq!(harness.store.upserts(), 1);
}

#[tokio::test]
async fn test_help_lists_commands_with_prefix() {
    let harness = Harness::joined().await;
    harness.send(C1, MEMBER, "!help").await.unwrap();

    assert_eq!(harness.dispatcher.registry().len(), 4);
    let reply = harness.gateway.last_reply().unwrap();
    assert!(reply.description.contains("`!ping`"));
    assert!(reply.description.contains("`!prefix [new prefix]`"));
    assert!(reply.description.contains("`!setbotchannel [channel id...]`"));
}

#[tokio::test]
async fn test_spawned_events_run_in_isolation() {
    let harness = Harness::new();

    // No configuration yet: the task logs and finishes without panicking
    let missing = GatewayEvent::Message(MessageEvent::new(GUILD, C1, MEMBER, "!ping"));
    spawn_event(harness.dispatcher.clone(), missing).await.unwrap();

    let join = GatewayEvent::GuildJoin(GuildInfo::new(GUILD, "Test Guild").with_channels(vec![C1.to_string()]));
    spawn_event(harness.dispatcher.clone(), join).await.unwrap();

    let ping = GatewayEvent::Message(MessageEvent::new(GUILD, C1, MEMBER, "!ping"));
    spawn_event(harness.dispatcher.clone(), ping).await.unwrap();

    assert_eq!(harness.gateway.replies().len(), 1);
    assert!(harness.store.find_by_guild_id(GUILD).await.unwrap().is_some());
}

#[tokio::test]
async fn test_panicking_event_task_is_contained() {
    let harness = Harness::joined().await;

    let panicking = tokio::spawn(async { panic!("handler blew up"); });
    wait_for_event(panicking).await;

    // The dispatcher keeps serving events afterwards
    let ping = GatewayEvent::Message(MessageEvent::new(GUILD, C1, MEMBER, "!ping"));
    wait_for_event(spawn_event(harness.dispatcher.clone(), ping)).await;
    assert_eq!(harness.gateway.replies().len(), 1);
}
