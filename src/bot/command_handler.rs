//! Command Handler module for text commands
//!
//! Handlers take the caller and a [`Messenger`] rather than a raw Telegram
//! message so they can run against any transport.

use anyhow::Result;
use teloxide::utils::html;
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::{t, t_args};

use crate::fanout::{send_to_all, DispatchResult};
use crate::messenger::Messenger;

// Import UI builder functions
use super::ui_builder::{
    channel_post_text, create_channel_keyboard, create_webapp_keyboard, format_caller_info,
    format_test_summary, welcome_text,
};
use super::{AppContext, Caller};

/// Handle /start and /startapp: greet the user and offer the menu button.
///
/// Repeated triggers within the cooldown window are dropped without a reply.
pub async fn handle_start<M>(messenger: &M, ctx: &AppContext, caller: &Caller) -> Result<()>
where
    M: Messenger + ?Sized,
{
    if !ctx.limiter.allow(caller.user_id).await {
        debug!(user_id = %caller.user_id, "Duplicate start suppressed");
        return Ok(());
    }

    messenger
        .send_text(
            caller.chat_id.into(),
            welcome_text(&ctx.config.brand),
            Some(create_webapp_keyboard(&ctx.config.webapp_url).into()),
        )
        .await?;

    info!(user_id = %caller.user_id, "Welcome message sent");
    Ok(())
}

/// Handle /id: show the caller their own identifiers
pub async fn handle_id<M>(messenger: &M, caller: &Caller) -> Result<()>
where
    M: Messenger + ?Sized,
{
    messenger
        .send_text(caller.chat_id.into(), format_caller_info(caller), None)
        .await?;
    Ok(())
}

/// Refuse an admin command for a caller outside the admin set.
///
/// Returns `true` if the caller was refused.
async fn refuse_non_admin<M>(messenger: &M, ctx: &AppContext, caller: &Caller) -> Result<bool>
where
    M: Messenger + ?Sized,
{
    if ctx.config.is_admin(caller.user_id) {
        return Ok(false);
    }

    warn!(user_id = %caller.user_id, "Admin command refused");
    messenger
        .send_text(caller.chat_id.into(), t("access-denied"), None)
        .await?;
    Ok(true)
}

/// Handle /post_menu: publish the menu announcement to the channel and pin it
pub async fn handle_post_menu<M>(messenger: &M, ctx: &AppContext, caller: &Caller) -> Result<()>
where
    M: Messenger + ?Sized,
{
    if refuse_non_admin(messenger, ctx, caller).await? {
        return Ok(());
    }

    let channel = ctx.config.channel.clone();
    let post = messenger
        .send_text(
            channel.clone(),
            channel_post_text(&ctx.config.brand),
            Some(create_channel_keyboard(&ctx.config.menu_deep_link).into()),
        )
        .await;

    let reply = match post {
        Ok(message_id) => match messenger.pin(channel, message_id).await {
            Ok(()) => {
                info!(user_id = %caller.user_id, "Menu posted to channel and pinned");
                t("channel-posted-pinned")
            }
            Err(e) => {
                warn!(user_id = %caller.user_id, error = %e, "Menu posted but pin failed");
                format!("{}\n{}", t("channel-posted"), t("channel-pin-failed"))
            }
        },
        Err(e) => {
            error!(user_id = %caller.user_id, error = %e, "Failed to post menu to channel");
            let error = html::escape(&e.to_string());
            t_args("channel-post-failed", &[("error", error.as_str())])
        }
    };

    messenger
        .send_text(caller.chat_id.into(), reply, None)
        .await?;
    Ok(())
}

/// Handle /test_admins: run a test fan-out and report the outcome inline.
///
/// Returns the dispatch result, or `None` when the caller was refused.
pub async fn handle_test_admins<M>(
    messenger: &M,
    ctx: &AppContext,
    caller: &Caller,
) -> Result<Option<DispatchResult>>
where
    M: Messenger + ?Sized,
{
    if refuse_non_admin(messenger, ctx, caller).await? {
        return Ok(None);
    }

    let results = send_to_all(messenger, &ctx.config.admin_ids, &t("test-broadcast-text")).await;
    info!(
        user_id = %caller.user_id,
        delivered = results.succeeded().len(),
        failed = results.failed().len(),
        "Test broadcast finished"
    );

    messenger
        .send_text(caller.chat_id.into(), format_test_summary(&results), None)
        .await?;
    Ok(Some(results))
}
