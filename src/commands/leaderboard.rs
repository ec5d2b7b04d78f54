// Leaderboard commands - personal score and the top players

use poise::serenity_prelude as serenity;
use tracing::error;

use crate::utils::config::colors;
use crate::utils::embeds;
use crate::utils::formatters::points_label;
use crate::{Context, Error};

const TOP_LIMIT: usize = 10;

/// Show your trivia score, or someone else's
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn score(
    ctx: Context<'_>,
    #[description = "User to check"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target = user.as_ref().unwrap_or_else(|| ctx.author());
    let db = &ctx.data().db;

    let (score, rank) = match db.get_score(target.id.get()).and_then(|score| {
        db.get_rank(target.id.get()).map(|rank| (score, rank))
    }) {
        Ok(found) => found,
        Err(e) => {
            error!("Failed to fetch score for {}: {}", target.id, e);
            ctx.send(poise::CreateReply::default().embed(embeds::error("Failed to fetch score data.")))
                .await?;
            return Ok(());
        }
    };

    let description = match (score, rank) {
        (Some(score), Some(rank)) => format!("**{}** (rank #{})", points_label(score), rank),
        _ => "No points yet. Answer a trivia question to get on the board!".to_string(),
    };

    let embed = serenity::CreateEmbed::new()
        .author(
            serenity::CreateEmbedAuthor::new(&target.name)
                .icon_url(target.avatar_url().unwrap_or_else(|| target.default_avatar_url())),
        )
        .title("LoL Trivia Score")
        .description(description)
        .color(colors::INFO);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Show the top 10 trivia players
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn top(ctx: Context<'_>) -> Result<(), Error> {
    let entries = match ctx.data().db.get_top(TOP_LIMIT) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to fetch leaderboard: {}", e);
            ctx.send(poise::CreateReply::default().embed(embeds::error("Failed to fetch leaderboard data.")))
                .await?;
            return Ok(());
        }
    };

    if entries.is_empty() {
        ctx.say("Nobody has scored yet. Start a game with `!trivia`!").await?;
        return Ok(());
    }

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = if entry.name.trim().is_empty() {
            resolve_name(ctx, entry.discord_id).await
        } else {
            entry.name
        };
        rows.push((name, entry.score));
    }

    ctx.send(poise::CreateReply::default().embed(embeds::scoreboard(&rows)))
        .await?;
    Ok(())
}

/// Guild member name from cache, then a user fetch, then the raw id
async fn resolve_name(ctx: Context<'_>, discord_id: u64) -> String {
    let user_id = serenity::UserId::new(discord_id);

    let cached = ctx.guild().and_then(|guild| {
        guild
            .members
            .get(&user_id)
            .map(|member| member.display_name().to_string())
    });
    if let Some(name) = cached {
        return name;
    }

    match user_id.to_user(ctx.serenity_context()).await {
        Ok(user) => user.name,
        Err(_) => discord_id.to_string(),
    }
}
