// Lookup commands - champion, item, skin, summoner spell and rune info

use std::time::Instant;

use poise::serenity_prelude as serenity;

use crate::features::lookup::{self, LookupHit};
use crate::utils::embeds;
use crate::{Context, Error};

const NO_MATCH: &str = "No match found.";

/// Ability keys accepted after a champion name
const ABILITY_KEYS: &[&str] = &["p", "q", "w", "e", "r"];

/// Skin art variants accepted after a skin name
const SKIN_KINDS: &[&str] = &["loading", "splash"];

/// Look up anything: champion, item, skin, summoner spell or rune
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn info(
    ctx: Context<'_>,
    #[description = "Name to look up, optionally followed by an ability key or 'loading'"]
    #[rest]
    query: String,
) -> Result<(), Error> {
    if round_active(ctx).await? {
        return Ok(());
    }

    let (name, extra) = split_trailing(&query, &[ABILITY_KEYS, SKIN_KINDS].concat());
    let data = ctx.data().game_data.snapshot().await;

    let started = Instant::now();
    let Some((hit, score)) = lookup::best_of(&data, name) else {
        ctx.say(NO_MATCH).await?;
        return Ok(());
    };
    let elapsed = started.elapsed().as_millis();

    let extra = extra.unwrap_or("");
    let embed = match hit {
        LookupHit::Champion(champ) => embeds::champ_info(champ, extra),
        LookupHit::Item(item) => embeds::item_info(item, &data),
        LookupHit::Skin(skin) => embeds::skin_info(&skin, extra),
        LookupHit::Summoner(summ) => embeds::summ_info(summ),
        LookupHit::Rune(rune) => embeds::rune_info(rune),
    };
    let footer = format!("Time elapsed: {} ms/Match Score: {}", elapsed, score);

    send_lookup(ctx, embed, footer).await
}

/// Champion overview, or one ability with a key (p, q, w, e, r)
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn champ(
    ctx: Context<'_>,
    #[description = "Champion name, optionally followed by an ability key"]
    #[rest]
    query: String,
) -> Result<(), Error> {
    if round_active(ctx).await? {
        return Ok(());
    }

    let (name, key) = split_trailing(&query, ABILITY_KEYS);
    let data = ctx.data().game_data.snapshot().await;
    let Some((champ, score)) = lookup::champion_by_name(&data, name) else {
        ctx.say(NO_MATCH).await?;
        return Ok(());
    };

    let embed = embeds::champ_info(champ, key.unwrap_or(""));
    send_lookup(ctx, embed, match_footer(score)).await
}

/// Item stats and recipe, by name or id
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn item(
    ctx: Context<'_>,
    #[description = "Item name or id"]
    #[rest]
    query: String,
) -> Result<(), Error> {
    if round_active(ctx).await? {
        return Ok(());
    }

    let data = ctx.data().game_data.snapshot().await;
    let Some((item, score)) = lookup::item(&data, &query) else {
        ctx.say(NO_MATCH).await?;
        return Ok(());
    };

    let embed = embeds::item_info(item, &data);
    send_lookup(ctx, embed, match_footer(score)).await
}

/// Skin splash art, price and release date; add 'loading' for the loading screen art
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn skin(
    ctx: Context<'_>,
    #[description = "Skin name, optionally followed by 'loading'"]
    #[rest]
    query: String,
) -> Result<(), Error> {
    if round_active(ctx).await? {
        return Ok(());
    }

    let (name, kind) = split_trailing(&query, SKIN_KINDS);
    let data = ctx.data().game_data.snapshot().await;
    let Some((skin, score)) = lookup::skin_by_name(&data, name) else {
        ctx.say(NO_MATCH).await?;
        return Ok(());
    };

    let embed = embeds::skin_info(&skin, kind.unwrap_or(""));
    send_lookup(ctx, embed, match_footer(score)).await
}

/// Summoner spell info
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn summ(
    ctx: Context<'_>,
    #[description = "Summoner spell name"]
    #[rest]
    query: String,
) -> Result<(), Error> {
    if round_active(ctx).await? {
        return Ok(());
    }

    let data = ctx.data().game_data.snapshot().await;
    let Some((summ, score)) = lookup::summoner_spell_by_name(&data, &query) else {
        ctx.say(NO_MATCH).await?;
        return Ok(());
    };

    send_lookup(ctx, embeds::summ_info(summ), match_footer(score)).await
}

/// Rune info
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn rune(
    ctx: Context<'_>,
    #[description = "Rune name"]
    #[rest]
    query: String,
) -> Result<(), Error> {
    if round_active(ctx).await? {
        return Ok(());
    }

    let data = ctx.data().game_data.snapshot().await;
    let Some((rune, score)) = lookup::rune_by_name(&data, &query) else {
        ctx.say(NO_MATCH).await?;
        return Ok(());
    };

    send_lookup(ctx, embeds::rune_info(rune), match_footer(score)).await
}

/// Lookups would give answers away during a round. Prefix commands stay
/// silent; slash commands get an ephemeral notice since they need a reply.
async fn round_active(ctx: Context<'_>) -> Result<bool, Error> {
    if !ctx.data().sessions.is_busy(ctx.channel_id()) {
        return Ok(false);
    }

    if let poise::Context::Application(_) = ctx {
        ctx.send(
            poise::CreateReply::default()
                .content("Lookups are disabled while a trivia round is running here.")
                .ephemeral(true),
        )
        .await?;
    }
    Ok(true)
}

fn match_footer(score: u8) -> String {
    format!("Match Score: {}", score)
}

async fn send_lookup(
    ctx: Context<'_>,
    embed: serenity::CreateEmbed,
    footer: String,
) -> Result<(), Error> {
    let embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Split an optional trailing option word ("ahri q" -> ("ahri", Some("q"))).
/// A query made of only the option word is kept as the name.
fn split_trailing<'a>(query: &'a str, options: &[&str]) -> (&'a str, Option<&'a str>) {
    let query = query.trim();
    if let Some((name, last)) = query.rsplit_once(char::is_whitespace) {
        if options.iter().any(|o| o.eq_ignore_ascii_case(last)) {
            return (name.trim_end(), Some(last));
        }
    }
    (query, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trailing() {
        assert_eq!(split_trailing("ahri q", ABILITY_KEYS), ("ahri", Some("q")));
        assert_eq!(split_trailing("  lee sin  R ", ABILITY_KEYS), ("lee sin", Some("R")));
        assert_eq!(split_trailing("lee sin", ABILITY_KEYS), ("lee sin", None));
        assert_eq!(split_trailing("e", ABILITY_KEYS), ("e", None));
        assert_eq!(
            split_trailing("dynasty ahri loading", SKIN_KINDS),
            ("dynasty ahri", Some("loading"))
        );
        assert_eq!(split_trailing("", SKIN_KINDS), ("", None));
    }

    #[test]
    fn test_match_footer() {
        assert_eq!(match_footer(87), "Match Score: 87");
    }
}
