// Embed builders for lookups, trivia questions and the scoreboard

use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;

use crate::features::questions::Question;
use crate::models::game_data::{Champion, GameData, Item, Rune, SkinInfo, SummonerSpell};
use crate::utils::config::colors;
use crate::utils::formatters::{
    format_price, parse_tooltip, points_label, shorten, strip_html, wiki_anchor, wiki_link,
};

/// Field values are capped at 1024 characters by Discord
const FIELD_LIMIT: usize = 1024;

fn lookup_embed(title: impl Into<String>, url: String) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .url(url)
        .color(colors::INFO)
}

fn champion_author(champ: &Champion) -> serenity::CreateEmbedAuthor {
    serenity::CreateEmbedAuthor::new(&champ.name)
        .icon_url(&champ.icon_url)
        .url(wiki_link(&champ.name))
}

fn field_text(text: &str) -> String {
    shorten(text, FIELD_LIMIT, "...")
}

/// Champion overview, or a single ability when `key` is p/q/w/e/r
pub fn champ_info(champ: &Champion, key: &str) -> serenity::CreateEmbed {
    let key = key.trim();
    if key.eq_ignore_ascii_case("p") {
        return passive_info(champ);
    }
    if champ.spell_by_key(key).is_some() {
        return spell_info(champ, key);
    }

    let mut embed = lookup_embed(format!("{}, {}", champ.name, champ.title), wiki_link(&champ.name))
        .description(champ.tags.join("/"))
        .thumbnail(&champ.icon_url)
        .field(
            format!("Passive - {}", champ.passive.name),
            shorten(&strip_html(&champ.passive.description), 125, "..."),
            false,
        );

    for (key, spell) in "QWER".chars().zip(&champ.spells) {
        embed = embed.field(
            format!("{} - {}", key, spell.name),
            shorten(&strip_html(&spell.description), 125, "..."),
            true,
        );
    }

    embed
}

/// A single Q/W/E/R ability; falls back to the overview on a bad key
pub fn spell_info(champ: &Champion, key: &str) -> serenity::CreateEmbed {
    let Some((key, spell)) = champ.spell_by_key(key) else {
        return champ_info(champ, "");
    };

    let cost = if spell.cost_burn.is_empty() || spell.cost_burn == "0" {
        "No cost".to_string()
    } else {
        format!("{} {}", spell.cost_burn, champ.partype)
    };
    let tooltip = strip_html(&parse_tooltip(&spell.tooltip, &spell.effect_burn, &spell.vars));

    lookup_embed(
        format!("{} ({})", spell.name, key),
        wiki_anchor(&champ.name, &spell.name),
    )
    .description(cost)
    .author(champion_author(champ))
    .thumbnail(&spell.icon_url)
    .field("Cooldown", or_dash(&spell.cooldown_burn), true)
    .field("Range", or_dash(&spell.range_burn), true)
    .field("Tooltip", field_text(&tooltip), false)
}

pub fn passive_info(champ: &Champion) -> serenity::CreateEmbed {
    let passive = &champ.passive;
    lookup_embed(
        format!("{} (Passive)", passive.name),
        wiki_anchor(&champ.name, &passive.name),
    )
    .description(strip_html(&passive.description))
    .author(champion_author(champ))
    .thumbnail(&passive.icon_url)
}

/// Skin card; `kind` "loading" shows the loading screen art instead of the splash
pub fn skin_info(info: &SkinInfo<'_>, kind: &str) -> serenity::CreateEmbed {
    let image = if kind.trim().eq_ignore_ascii_case("loading") {
        info.loading_url()
    } else {
        info.splash_url()
    };
    let release = info
        .release_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    lookup_embed(
        info.display_name(),
        format!("{}/Skins", wiki_link(&info.champion.name)),
    )
    .author(champion_author(info.champion))
    .field("Price", format_price(info.price, &info.currency), true)
    .field("Release Date", release, true)
    .image(image)
}

pub fn item_info(item: &Item, data: &GameData) -> serenity::CreateEmbed {
    let mut embed = lookup_embed(&item.name, wiki_link(&item.name))
        .description(strip_html(&item.description))
        .thumbnail(&item.icon_url);

    if item.gold.total != 0 {
        embed = embed
            .field("Gold (Buy)", format!("{}g", item.gold.total), true)
            .field("Gold (Sell)", format!("{}g", item.gold.sell), true);
    }
    if item.gold.total != item.gold.base {
        embed = embed.field("Gold (Recipe)", format!("{}g", item.gold.base), true);
    }

    let names = |ids: &[String]| {
        ids.iter()
            .map(|id| data.item_by_id(id).map_or(id.as_str(), |i| i.name.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !item.from.is_empty() {
        embed = embed.field("Builds From", field_text(&names(&item.from)), true);
    }
    if !item.into.is_empty() {
        embed = embed.field("Builds Into", field_text(&names(&item.into)), true);
    }

    embed
}

pub fn summ_info(summ: &SummonerSpell) -> serenity::CreateEmbed {
    let tooltip = strip_html(&parse_tooltip(&summ.tooltip, &summ.effect_burn, &summ.vars));

    lookup_embed(&summ.name, wiki_link(&summ.name))
        .description(format!("Available at summoner level {}", summ.summoner_level))
        .thumbnail(&summ.icon_url)
        .field("Cooldown", or_dash(&summ.cooldown_burn), true)
        .field("Range", or_dash(&summ.range_burn), true)
        .field("Tooltip", field_text(&tooltip), false)
}

pub fn rune_info(rune: &Rune) -> serenity::CreateEmbed {
    lookup_embed(&rune.name, wiki_link(&rune.name))
        .description(format!("{}: {}", rune.path, rune.tier_name()))
        .thumbnail(&rune.icon_url)
        .field("Description", field_text(&strip_html(&rune.long_desc)), false)
}

/// Question card posted at the start of each round
pub fn question(question: &Question, round: u32, total: u32, game_length_secs: u64) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(format!("LoL Trivia - Question {}/{}", round, total))
        .description(&question.prompt)
        .color(colors::PRIMARY)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} • {} seconds to answer",
            points_label(question.points as i64),
            game_length_secs
        )));

    if let Some(url) = &question.thumbnail_url {
        embed = embed.thumbnail(url);
    }
    embed
}

/// Nobody got it in time
pub fn expired(question: &Question) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Time's up!")
        .description(format!("The answer was **{}**.", question.display_answer))
        .color(colors::WARNING)
}

/// Winner announcement with their new total, if it could be saved
pub fn correct(
    winner: serenity::UserId,
    question: &Question,
    points: u32,
    total: Option<i64>,
) -> serenity::CreateEmbed {
    let total = match total {
        Some(total) => format!("total: {}", points_label(total)),
        None => "score could not be saved".to_string(),
    };

    serenity::CreateEmbed::new()
        .title("Correct!")
        .description(format!(
            "{} got it: **{}**\n+{} ({})",
            winner.mention(),
            question.display_answer,
            points_label(points as i64),
            total
        ))
        .color(colors::SUCCESS)
}

/// Red card for failed commands
pub fn error(message: impl std::fmt::Display) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Something went wrong")
        .description(format!("❌ {}", message))
        .color(colors::ERROR)
}

/// Top players; `rows` are already resolved display names with scores
pub fn scoreboard(rows: &[(String, i64)]) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title("LoL Trivia Scoreboard")
        .description("Top 10 LoL Trivia players\n\n")
        .color(colors::INFO);

    for (rank, (name, score)) in rows.iter().enumerate() {
        embed = embed.field(format!("{}. {}", rank + 1, name), points_label(*score), true);
    }
    embed
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
