// Help command - show usage guide

use poise::serenity_prelude as serenity;

use crate::features::questions::force_help;
use crate::utils::config::colors;
use crate::{Context, Error};

/// Show help and usage guide
#[poise::command(slash_command, prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let config = &ctx.data().config;
    let p = &config.prefix;

    let embed = serenity::CreateEmbed::new()
        .title("LoL Trivia - Help")
        .description("League of Legends trivia and game info")
        .color(colors::PRIMARY)
        .field(
            "Trivia",
            format!(
                "`{p}trivia [num]` - Start a game of up to {} questions\n\
                `{p}trivia score [user]` - Show a trivia score\n\
                `{p}trivia top` - Top 10 players\n\
                Answer by typing in the channel. First correct answer wins!",
                config.max_games
            ),
            false,
        )
        .field(
            "Lookups",
            format!(
                "`{p}trivia info <name> [extra]` - Best match across everything\n\
                `{p}trivia champ <name> [p/q/w/e/r]` - Champion or ability\n\
                `{p}trivia item <name|id>` - Item\n\
                `{p}trivia skin <name> [loading]` - Skin\n\
                `{p}trivia summ <name>` - Summoner spell\n\
                `{p}trivia rune <name>` - Rune"
            ),
            false,
        )
        .field(
            "Moderation (Manage Messages)",
            format!(
                "`{p}trivia force [num] [type]` - Start ignoring the cooldown\n\
                `{p}trivia cancel` - Stop the game in this channel"
            ),
            false,
        )
        .field("Question types", format!("```\n{}\n```", force_help()), false)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Cooldown: {}s • {}s per question",
            config.cooldown.as_secs(),
            config.game_length.as_secs()
        )));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
