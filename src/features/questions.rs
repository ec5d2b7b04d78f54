// Trivia question generation
// Each question kind draws a random subject from the static game data

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::models::game_data::{Champion, GameData};
use crate::utils::fuzzy::{normalize, similarity};

/// Name answers need at least this similarity to count
pub const ANSWER_THRESHOLD: u8 = 80;

/// Retries before giving up when a generator finds nothing suitable
const MAX_ATTEMPTS: usize = 10;

/// Question types; the position in `ALL` is the index `!trivia force` takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    ChampionFromTitle,
    ChampionFromAbility,
    AbilityName,
    ChampionFromPassive,
    SkinOwner,
    ItemFromRecipe,
    ItemCost,
    SummonerCooldown,
    RunePath,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 9] = [
        QuestionKind::ChampionFromTitle,
        QuestionKind::ChampionFromAbility,
        QuestionKind::AbilityName,
        QuestionKind::ChampionFromPassive,
        QuestionKind::SkinOwner,
        QuestionKind::ItemFromRecipe,
        QuestionKind::ItemCost,
        QuestionKind::SummonerCooldown,
        QuestionKind::RunePath,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::ChampionFromTitle => "champion_from_title",
            QuestionKind::ChampionFromAbility => "champion_from_ability",
            QuestionKind::AbilityName => "ability_name",
            QuestionKind::ChampionFromPassive => "champion_from_passive",
            QuestionKind::SkinOwner => "skin_owner",
            QuestionKind::ItemFromRecipe => "item_from_recipe",
            QuestionKind::ItemCost => "item_cost",
            QuestionKind::SummonerCooldown => "summoner_cooldown",
            QuestionKind::RunePath => "rune_path",
        }
    }

    fn points(&self) -> u32 {
        match self {
            QuestionKind::ChampionFromTitle
            | QuestionKind::SkinOwner
            | QuestionKind::RunePath => 1,
            QuestionKind::ChampionFromAbility | QuestionKind::ChampionFromPassive => 2,
            QuestionKind::AbilityName
            | QuestionKind::ItemFromRecipe
            | QuestionKind::ItemCost
            | QuestionKind::SummonerCooldown => 3,
        }
    }
}

/// Listing appended to the help of `!trivia force`
pub fn force_help() -> String {
    QuestionKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("{}. {}", i, kind.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerKind {
    Name,
    Number,
}

#[derive(Debug, Clone)]
pub struct Question {
    pub kind: QuestionKind,
    pub prompt: String,
    pub thumbnail_url: Option<String>,
    pub answers: Vec<String>,
    pub display_answer: String,
    pub points: u32,
    answer_kind: AnswerKind,
}

impl Question {
    fn name(kind: QuestionKind, prompt: String, answer: &str) -> Self {
        Self {
            kind,
            prompt,
            thumbnail_url: None,
            answers: vec![answer.to_string()],
            display_answer: answer.to_string(),
            points: kind.points(),
            answer_kind: AnswerKind::Name,
        }
    }

    fn number(kind: QuestionKind, prompt: String, answer: i64, unit: &str) -> Self {
        Self {
            kind,
            prompt,
            thumbnail_url: None,
            answers: vec![answer.to_string()],
            display_answer: format!("{} {}", answer, unit),
            points: kind.points(),
            answer_kind: AnswerKind::Number,
        }
    }

    fn thumbnail(mut self, url: &str) -> Self {
        if !url.is_empty() {
            self.thumbnail_url = Some(url.to_string());
        }
        self
    }

    /// Points earned by `guess`, or None if it's wrong
    pub fn check(&self, guess: &str) -> Option<u32> {
        let correct = match self.answer_kind {
            AnswerKind::Name => self
                .answers
                .iter()
                .any(|answer| similarity(guess, answer) >= ANSWER_THRESHOLD),
            AnswerKind::Number => parse_number(guess).is_some_and(|n| {
                self.answers
                    .iter()
                    .any(|answer| answer.parse::<i64>().ok() == Some(n))
            }),
        };
        correct.then_some(self.points)
    }
}

/// "1,100 gold" -> 1100, "300s" -> 300
fn parse_number(guess: &str) -> Option<i64> {
    let lower = guess.trim().to_lowercase();
    let mut text = lower.as_str();
    for suffix in ["seconds", "second", "secs", "sec", "gold", "g", "s"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped;
            break;
        }
    }
    let digits: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    digits.parse().ok()
}

/// A question of a random kind (or `force`), None when the data has nothing to ask about
pub fn random<R: Rng + ?Sized>(
    data: &GameData,
    force: Option<QuestionKind>,
    rng: &mut R,
) -> Option<Question> {
    for _ in 0..MAX_ATTEMPTS {
        let kind = match force {
            Some(kind) => kind,
            None => QuestionKind::ALL[rng.random_range(0..QuestionKind::ALL.len())],
        };
        if let Some(question) = generate(kind, data, rng) {
            return Some(question);
        }
    }
    None
}

pub fn generate<R: Rng + ?Sized>(
    kind: QuestionKind,
    data: &GameData,
    rng: &mut R,
) -> Option<Question> {
    match kind {
        QuestionKind::ChampionFromTitle => {
            let champ = data.champions.choose(rng)?;
            Some(Question::name(
                kind,
                format!("Which champion is known as **{}**?", champ.title),
                &champ.name,
            ))
        }
        QuestionKind::ChampionFromAbility => {
            let champ = data.champions.choose(rng)?;
            let spell = champ.spells.choose(rng)?;
            Some(
                Question::name(
                    kind,
                    format!("Which champion has the ability **{}**?", spell.name),
                    &champ.name,
                )
                .thumbnail(&spell.icon_url),
            )
        }
        QuestionKind::AbilityName => {
            let champ = data.champions.choose(rng)?;
            if champ.spells.is_empty() {
                return None;
            }
            let index = rng.random_range(0..champ.spells.len().min(4));
            let key = "QWER".chars().nth(index)?;
            Some(
                Question::name(
                    kind,
                    format!("What is the name of **{}**'s **{}** ability?", champ.name, key),
                    &champ.spells[index].name,
                )
                .thumbnail(&champ.icon_url),
            )
        }
        QuestionKind::ChampionFromPassive => {
            let champ = data.champions.choose(rng)?;
            Some(
                Question::name(
                    kind,
                    format!("Which champion's passive is **{}**?", champ.passive.name),
                    &champ.name,
                )
                .thumbnail(&champ.passive.icon_url),
            )
        }
        QuestionKind::SkinOwner => {
            let skins: Vec<_> = data
                .champions
                .iter()
                .flat_map(|champ| champ.skins.iter().map(move |skin| (champ, skin)))
                .filter(|(_, skin)| skin.num != 0)
                .collect();
            let (champ, skin) = skins.choose(rng)?;
            let redacted = redact_owner(&skin.name, champ);
            Some(Question::name(
                kind,
                format!("Which champion wears the skin **{}**?", redacted),
                &champ.name,
            ))
        }
        QuestionKind::ItemFromRecipe => {
            let recipes: Vec<_> = data
                .items
                .iter()
                .filter(|item| !item.from.is_empty() && item.gold.purchasable && item.gold.total > 0)
                .collect();
            let item = recipes.choose(rng)?;
            let components = item
                .from
                .iter()
                .filter_map(|id| data.item_by_id(id))
                .map(|component| format!("**{}**", component.name))
                .collect::<Vec<_>>();
            if components.is_empty() {
                return None;
            }
            Some(Question::name(
                kind,
                format!(
                    "Which item builds from {} for a total of **{}g**?",
                    components.join(" + "),
                    item.gold.total
                ),
                &item.name,
            ))
        }
        QuestionKind::ItemCost => {
            let buyable: Vec<_> = data
                .items
                .iter()
                .filter(|item| item.gold.purchasable && item.gold.total > 0)
                .collect();
            let item = buyable.choose(rng)?;
            Some(
                Question::number(
                    kind,
                    format!("How much gold does **{}** cost in total?", item.name),
                    item.gold.total,
                    "gold",
                )
                .thumbnail(&item.icon_url),
            )
        }
        QuestionKind::SummonerCooldown => {
            let spells: Vec<_> = data
                .summoner_spells
                .iter()
                .filter(|s| s.is_classic())
                .filter_map(|s| base_cooldown(&s.cooldown_burn).map(|cd| (s, cd)))
                .collect();
            let (spell, cooldown) = spells.choose(rng)?;
            Some(
                Question::number(
                    kind,
                    format!("What is the cooldown of **{}**, in seconds?", spell.name),
                    *cooldown,
                    "seconds",
                )
                .thumbnail(&spell.icon_url),
            )
        }
        QuestionKind::RunePath => {
            let rune = data.runes.choose(rng)?;
            Some(
                Question::name(
                    kind,
                    format!("Which rune path does **{}** belong to?", rune.name),
                    &rune.path,
                )
                .thumbnail(&rune.icon_url),
            )
        }
    }
}

/// Blank out the champion's name in a skin name: the full name, its id and
/// every word of 3+ letters ("Corporate Mundo" -> "Corporate ____")
fn redact_owner(skin_name: &str, champ: &Champion) -> String {
    let mut owner_words: Vec<String> = champ
        .name
        .split_whitespace()
        .map(normalize)
        .filter(|word| word.chars().count() >= 3)
        .collect();
    owner_words.push(normalize(&champ.id));

    let replaced = skin_name.replace(&champ.name, "____");
    let words: Vec<&str> = replaced
        .split_whitespace()
        .map(|word| {
            if owner_words.contains(&normalize(word)) {
                "____"
            } else {
                word
            }
        })
        .collect();
    words.join(" ")
}

/// First rank of a "210/180/150" burn string
fn base_cooldown(burn: &str) -> Option<i64> {
    burn.split('/').next()?.trim().parse::<f64>().ok().map(|v| v.round() as i64)
}
