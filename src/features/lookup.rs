// Name resolution for the info commands
// Every lookup returns the best candidate and its match score (0-100)

use crate::models::game_data::{Champion, GameData, Item, Rune, SkinInfo, SummonerSpell};
use crate::utils::fuzzy::best_match;

/// Whatever `!trivia info` resolved to
#[derive(Debug)]
pub enum LookupHit<'a> {
    Champion(&'a Champion),
    Item(&'a Item),
    Skin(SkinInfo<'a>),
    Summoner(&'a SummonerSpell),
    Rune(&'a Rune),
}

pub fn champion_by_name<'a>(data: &'a GameData, query: &str) -> Option<(&'a Champion, u8)> {
    best_match(query, &data.champions, |c| vec![c.name.clone(), c.id.clone()])
}

/// Item by exact id ("3031") or by name
pub fn item<'a>(data: &'a GameData, name_or_id: &str) -> Option<(&'a Item, u8)> {
    let trimmed = name_or_id.trim();
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Some(item) = data.item_by_id(trimmed) {
            return Some((item, 100));
        }
    }
    best_match(trimmed, &data.items, |i| vec![i.name.clone()])
}

pub fn skin_by_name<'a>(data: &'a GameData, query: &str) -> Option<(SkinInfo<'a>, u8)> {
    best_match(query, data.skins(), |s| vec![s.display_name()])
}

pub fn summoner_spell_by_name<'a>(
    data: &'a GameData,
    query: &str,
) -> Option<(&'a SummonerSpell, u8)> {
    best_match(query, &data.summoner_spells, |s| vec![s.name.clone()])
}

pub fn rune_by_name<'a>(data: &'a GameData, query: &str) -> Option<(&'a Rune, u8)> {
    best_match(query, &data.runes, |r| vec![r.name.clone()])
}

/// Try every category and keep the highest score. On a tie the earlier
/// category wins: champion, item, skin, summoner spell, rune.
pub fn best_of<'a>(data: &'a GameData, query: &str) -> Option<(LookupHit<'a>, u8)> {
    let candidates = [
        champion_by_name(data, query).map(|(c, s)| (LookupHit::Champion(c), s)),
        item(data, query).map(|(i, s)| (LookupHit::Item(i), s)),
        skin_by_name(data, query).map(|(k, s)| (LookupHit::Skin(k), s)),
        summoner_spell_by_name(data, query).map(|(m, s)| (LookupHit::Summoner(m), s)),
        rune_by_name(data, query).map(|(r, s)| (LookupHit::Rune(r), s)),
    ];

    let mut best: Option<(LookupHit<'a>, u8)> = None;
    for (hit, score) in candidates.into_iter().flatten() {
        if best.as_ref().map_or(true, |(_, s)| score > *s) {
            best = Some((hit, score));
        }
    }
    best
}
