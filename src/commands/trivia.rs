// Trivia command - start, force and cancel rounds
// Lookup and leaderboard subcommands live in their own modules

use std::time::Duration;

use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use tracing::{info, warn};

use super::leaderboard::{score, top};
use super::lookup::{champ, info, item, rune, skin, summ};
use crate::features::questions::{self, force_help, QuestionKind};
use crate::features::trivia_session::Outcome;
use crate::utils::config::DISABLE_TRIVIA_ROLE;
use crate::utils::embeds;
use crate::{Context, Error};

/// Play LoL Trivia: `!trivia [number of questions]`
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    subcommands(
        "start", "force", "cancel", "info", "champ", "item", "skin", "summ", "rune", "score",
        "top"
    )
)]
pub async fn trivia(
    ctx: Context<'_>,
    #[description = "Number of questions"] num: Option<u32>,
) -> Result<(), Error> {
    start_session(ctx, num).await
}

/// Start a game of LoL Trivia
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn start(
    ctx: Context<'_>,
    #[description = "Number of questions"] num: Option<u32>,
) -> Result<(), Error> {
    start_session(ctx, num).await
}

/// Start a game ignoring the cooldown, optionally of a single question type
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn force(
    ctx: Context<'_>,
    #[description = "Number of questions"] num: Option<u32>,
    #[description = "Question type index"] force_index: Option<u32>,
) -> Result<(), Error> {
    let data = ctx.data();
    if data.sessions.is_busy(ctx.channel_id()) {
        return Ok(());
    }

    let kind = match force_index {
        None => None,
        Some(index) => match QuestionKind::from_index(index as usize) {
            Some(kind) => Some(kind),
            None => {
                ctx.say(format!("Unknown question type. Available types:\n```\n{}\n```", force_help()))
                    .await?;
                return Ok(());
            }
        },
    };

    let games = data.config.clamp_games(num.unwrap_or(1), true);
    run_session(ctx, games, kind).await
}

/// Stop the trivia game running in this channel
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn cancel(ctx: Context<'_>) -> Result<(), Error> {
    let sessions = &ctx.data().sessions;
    if !sessions.is_busy(ctx.channel_id()) {
        ctx.say("There is no trivia game running in this channel.").await?;
        return Ok(());
    }

    let cancelled = sessions.cancel(ctx.channel_id());
    info!(
        "{} cancelled trivia in channel {} ({} pending)",
        ctx.author().name,
        ctx.channel_id(),
        cancelled
    );
    ctx.say("Trivia game cancelled.").await?;
    Ok(())
}

async fn start_session(ctx: Context<'_>, num: Option<u32>) -> Result<(), Error> {
    let data = ctx.data();
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    if data.sessions.is_busy(ctx.channel_id()) || trivia_disabled(ctx) {
        return Ok(());
    }

    if let Some(left) = data.sessions.cooldown_remaining(guild_id, data.config.cooldown) {
        ctx.say(format!(
            "Trivia is on cooldown. You can start a new round in {} seconds.",
            whole_secs(left)
        ))
        .await?;
        return Ok(());
    }

    let staff = can_manage_messages(ctx).await;
    let games = data.config.clamp_games(num.unwrap_or(1), staff);
    run_session(ctx, games, None).await
}

/// Post `games` questions one after another until done or cancelled
async fn run_session(ctx: Context<'_>, games: u32, kind: Option<QuestionKind>) -> Result<(), Error> {
    let data = ctx.data();
    let channel_id = ctx.channel_id();

    // Lost a race with another `!trivia` in the same channel
    let Some(guard) = data.sessions.begin(channel_id) else {
        return Ok(());
    };
    if let Some(guild_id) = ctx.guild_id() {
        data.sessions.mark_cooldown(guild_id);
    }

    info!(
        "{} started {} trivia question(s) in channel {}",
        ctx.author().name,
        games,
        channel_id
    );
    ctx.say(format!(
        "{} started a game of LoL Trivia! Get ready!",
        ctx.author().mention()
    ))
    .await?;

    let game_length = data.config.game_length;
    for round in 1..=games {
        tokio::time::sleep(data.config.question_delay).await;
        if !guard.is_current() {
            return Ok(());
        }

        let game_data = data.game_data.snapshot().await;
        if game_data.is_empty() {
            ctx.say("Game data isn't available right now, try again later.").await?;
            break;
        }
        let question = {
            let mut rng = rand::rng();
            questions::random(&game_data, kind, &mut rng)
        };
        let Some(question) = question else {
            warn!("No trivia question could be generated (patch {})", game_data.version);
            ctx.say("Game data isn't available right now, try again later.").await?;
            break;
        };

        ctx.send(poise::CreateReply::default().embed(embeds::question(
            &question,
            round,
            games,
            game_length.as_secs(),
        )))
        .await?;

        // Cancelled while the question was being sent
        let Some(pending) = data.sessions.post(&guard, question) else {
            return Ok(());
        };

        match pending.wait(game_length).await {
            Outcome::Answered { .. } => {}
            Outcome::Expired(question) => {
                ctx.send(poise::CreateReply::default().embed(embeds::expired(&question)))
                    .await?;
            }
            Outcome::Cancelled => return Ok(()),
        }
    }

    drop(guard);

    let left = ctx
        .guild_id()
        .and_then(|g| data.sessions.cooldown_remaining(g, data.config.cooldown))
        .unwrap_or(Duration::ZERO);
    ctx.say(format!(
        "You can start a new round in {} seconds.",
        whole_secs(left)
    ))
    .await?;

    Ok(())
}

/// Seconds, rounded up so "0 seconds" only shows when the wait is over
fn whole_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// The bot has the opt-out role in this guild
fn trivia_disabled(ctx: Context<'_>) -> bool {
    let bot_id = ctx.framework().bot_id;
    let Some(guild) = ctx.guild() else {
        return false;
    };
    let Some(member) = guild.members.get(&bot_id) else {
        return false;
    };

    member.roles.iter().any(|role_id| {
        guild
            .roles
            .get(role_id)
            .is_some_and(|role| role.name == DISABLE_TRIVIA_ROLE)
    })
}

/// Staff may queue more rounds than regular members
async fn can_manage_messages(ctx: Context<'_>) -> bool {
    let Some(member) = ctx.author_member().await else {
        return false;
    };
    // Interactions carry resolved permissions
    if let Some(permissions) = member.permissions {
        return permissions.manage_messages();
    }

    let Some(guild) = ctx.guild() else {
        return false;
    };
    let permissions: serenity::Permissions = match guild.channels.get(&ctx.channel_id()) {
        Some(channel) => guild.user_permissions_in(channel, &member),
        None => guild.member_permissions(&member),
    };
    permissions.manage_messages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_secs_rounds_up() {
        assert_eq!(whole_secs(Duration::ZERO), 0);
        assert_eq!(whole_secs(Duration::from_secs(30)), 30);
        assert_eq!(whole_secs(Duration::from_millis(29_001)), 30);
        assert_eq!(whole_secs(Duration::from_millis(1)), 1);
    }
}
