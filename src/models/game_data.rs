// Static game data (Data Dragon shapes)
// Deserialized straight from the CDN JSON, image URLs resolved after load

use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Deserialize;

pub const DDRAGON_BASE: &str = "https://ddragon.leagueoflegends.com";

/// Tier names per rune path; tier 0 is always the keystone row
static RUNE_TIER_NAMES: Lazy<HashMap<&'static str, [&'static str; 4]>> = Lazy::new(|| {
    HashMap::from([
        ("Precision", ["Keystone", "Heroism", "Legend", "Combat"]),
        ("Domination", ["Keystone", "Malice", "Tracking", "Hunter"]),
        ("Sorcery", ["Keystone", "Artifact", "Excellence", "Power"]),
        ("Resolve", ["Keystone", "Strength", "Resistance", "Vitality"]),
        ("Inspiration", ["Keystone", "Contraption", "Tomorrow", "Beyond"]),
    ])
});

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub full: String,
}

/// Ratio entry used by `{{ aN }}` / `{{ fN }}` tooltip placeholders
#[derive(Debug, Clone, Deserialize)]
pub struct SpellVar {
    pub key: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub coeff: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionSpell {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub cooldown_burn: String,
    #[serde(default)]
    pub cost_burn: String,
    #[serde(default)]
    pub range_burn: String,
    #[serde(default)]
    pub effect_burn: Vec<Option<String>>,
    #[serde(default)]
    pub vars: Vec<SpellVar>,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(skip)]
    pub icon_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Passive {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(skip)]
    pub icon_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Skin {
    pub id: String,
    pub num: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Champion {
    pub id: String,
    pub key: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub partype: String,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(default)]
    pub spells: Vec<ChampionSpell>,
    pub passive: Passive,
    #[serde(default)]
    pub skins: Vec<Skin>,
    #[serde(skip)]
    pub icon_url: String,
}

impl Champion {
    /// Spell bound to Q/W/E/R, case-insensitive
    pub fn spell_by_key(&self, key: &str) -> Option<(char, &ChampionSpell)> {
        let key = key.trim().to_ascii_uppercase();
        let index = ["Q", "W", "E", "R"].iter().position(|k| *k == key)?;
        self.spells
            .get(index)
            .map(|spell| ("QWER".as_bytes()[index] as char, spell))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemGold {
    #[serde(default)]
    pub base: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub sell: i64,
    #[serde(default)]
    pub purchasable: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub plaintext: String,
    #[serde(default)]
    pub gold: ItemGold,
    #[serde(default)]
    pub from: Vec<String>,
    #[serde(default)]
    pub into: Vec<String>,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(skip)]
    pub icon_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerSpell {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub cooldown_burn: String,
    #[serde(default)]
    pub range_burn: String,
    #[serde(default)]
    pub summoner_level: u32,
    #[serde(default)]
    pub effect_burn: Vec<Option<String>>,
    #[serde(default)]
    pub vars: Vec<SpellVar>,
    #[serde(default)]
    pub modes: Vec<String>,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(skip)]
    pub icon_url: String,
}

impl SummonerSpell {
    /// Available on Summoner's Rift
    pub fn is_classic(&self) -> bool {
        self.modes.iter().any(|m| m == "CLASSIC")
    }
}

/// A rune flattened out of its path/slot nesting
#[derive(Debug, Clone)]
pub struct Rune {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub short_desc: String,
    pub long_desc: String,
    pub icon_url: String,
    pub path: String,
    pub tier: usize,
}

impl Rune {
    pub fn tier_name(&self) -> String {
        RUNE_TIER_NAMES
            .get(self.path.as_str())
            .and_then(|names| names.get(self.tier))
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("Slot {}", self.tier))
    }
}

/// Price and release info not published by Data Dragon
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkinMeta {
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub release_date: Option<String>,
}

/// A skin together with its owner and store metadata
#[derive(Debug, Clone)]
pub struct SkinInfo<'a> {
    pub champion: &'a Champion,
    pub skin: &'a Skin,
    pub price: Option<i64>,
    pub currency: String,
    pub release_date: Option<NaiveDate>,
}

impl SkinInfo<'_> {
    /// Data Dragon calls base skins "default"
    pub fn display_name(&self) -> String {
        if self.skin.name == "default" {
            format!("Classic {}", self.champion.name)
        } else {
            self.skin.name.clone()
        }
    }

    pub fn splash_url(&self) -> String {
        format!(
            "{DDRAGON_BASE}/cdn/img/champion/splash/{}_{}.jpg",
            self.champion.id, self.skin.num
        )
    }

    pub fn loading_url(&self) -> String {
        format!(
            "{DDRAGON_BASE}/cdn/img/champion/loading/{}_{}.jpg",
            self.champion.id, self.skin.num
        )
    }
}

/// Everything the trivia and lookup features read from
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub version: String,
    pub champions: Vec<Champion>,
    pub items: Vec<Item>,
    pub summoner_spells: Vec<SummonerSpell>,
    pub runes: Vec<Rune>,
    pub skin_meta: HashMap<String, SkinMeta>,
}

impl GameData {
    pub fn is_empty(&self) -> bool {
        self.champions.is_empty() && self.items.is_empty()
    }

    pub fn item_by_id(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn skin_info<'a>(&'a self, champion: &'a Champion, skin: &'a Skin) -> SkinInfo<'a> {
        let meta = self.skin_meta.get(&skin.id);
        SkinInfo {
            champion,
            skin,
            price: meta.and_then(|m| m.price),
            currency: meta
                .and_then(|m| m.currency.clone())
                .unwrap_or_else(|| "RP".to_string()),
            release_date: meta
                .and_then(|m| m.release_date.as_deref())
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        }
    }

    /// Every skin of every champion
    pub fn skins(&self) -> Vec<SkinInfo<'_>> {
        self.champions
            .iter()
            .flat_map(|champ| champ.skins.iter().map(move |skin| (champ, skin)))
            .map(|(champ, skin)| self.skin_info(champ, skin))
            .collect()
    }

    /// Fill in CDN URLs for every image reference
    pub fn resolve_images(&mut self) {
        let cdn = format!("{DDRAGON_BASE}/cdn/{}/img", self.version);
        for champ in &mut self.champions {
            champ.icon_url = format!("{cdn}/champion/{}", champ.image.full);
            champ.passive.icon_url = format!("{cdn}/passive/{}", champ.passive.image.full);
            for spell in &mut champ.spells {
                spell.icon_url = format!("{cdn}/spell/{}", spell.image.full);
            }
        }
        for item in &mut self.items {
            item.icon_url = format!("{cdn}/item/{}", item.image.full);
        }
        for summ in &mut self.summoner_spells {
            summ.icon_url = format!("{cdn}/spell/{}", summ.image.full);
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    fn spell(id: &str, name: &str, cooldown: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("{name} does things."),
            "tooltip": "Deals {{ e1 }} <physicalDamage>physical damage</physicalDamage> (+{{ a1 }}).",
            "cooldownBurn": cooldown,
            "costBurn": "50",
            "rangeBurn": "600",
            "effectBurn": [null, "10/20/30"],
            "vars": [{ "key": "a1", "link": "attackdamage", "coeff": 0.6 }],
            "image": { "full": format!("{id}.png") }
        })
    }

    pub fn champion(id: &str, name: &str, title: &str, spells: [&str; 4], skins: &[&str]) -> Champion {
        let keys = ["Q", "W", "E", "R"];
        let spells: Vec<_> = spells
            .iter()
            .zip(keys)
            .map(|(spell_name, key)| spell(&format!("{id}{key}"), spell_name, "8/7/6/5/4"))
            .collect();
        let skins: Vec<_> = std::iter::once("default")
            .chain(skins.iter().copied())
            .enumerate()
            .map(|(num, name)| json!({ "id": format!("{id}{num:03}"), "num": num, "name": name }))
            .collect();
        serde_json::from_value(json!({
            "id": id,
            "key": "1",
            "name": name,
            "title": title,
            "tags": ["Fighter", "Assassin"],
            "partype": "Mana",
            "image": { "full": format!("{id}.png") },
            "spells": spells,
            "passive": {
                "name": format!("{name}'s Resolve"),
                "description": "Gains <b>bonus</b> damage.",
                "image": { "full": format!("{id}_P.png") }
            },
            "skins": skins
        }))
        .unwrap()
    }

    fn item(id: &str, name: &str, total: i64, base: i64, from: &[&str], into: &[&str]) -> Item {
        let mut item: Item = serde_json::from_value(json!({
            "name": name,
            "description": "<stats>+10 Attack Damage</stats>",
            "plaintext": "Slightly increases attack damage",
            "gold": { "base": base, "total": total, "sell": total * 7 / 10, "purchasable": true },
            "from": from,
            "into": into,
            "image": { "full": format!("{id}.png") }
        }))
        .unwrap();
        item.id = id.to_string();
        item
    }

    pub fn game_data() -> GameData {
        let summoners: Vec<SummonerSpell> = serde_json::from_value(json!([
            {
                "id": "SummonerFlash", "name": "Flash",
                "description": "Teleports your champion a short distance.",
                "tooltip": "Teleports your champion toward your cursor.",
                "cooldownBurn": "300", "rangeBurn": "425", "summonerLevel": 7,
                "modes": ["CLASSIC", "ARAM"], "image": { "full": "SummonerFlash.png" }
            },
            {
                "id": "SummonerSnowball", "name": "Mark",
                "description": "Throw a snowball.", "tooltip": "",
                "cooldownBurn": "80", "rangeBurn": "1600", "summonerLevel": 6,
                "modes": ["ARAM"], "image": { "full": "SummonerSnowball.png" }
            }
        ]))
        .unwrap();

        let mut data = GameData {
            version: "14.1.1".to_string(),
            champions: vec![
                champion(
                    "Ahri",
                    "Ahri",
                    "the Nine-Tailed Fox",
                    ["Orb of Deception", "Fox-Fire", "Charm", "Spirit Rush"],
                    &["Dynasty Ahri", "Arcade Ahri"],
                ),
                champion(
                    "Yasuo",
                    "Yasuo",
                    "the Unforgiven",
                    ["Steel Tempest", "Wind Wall", "Sweeping Blade", "Last Breath"],
                    &["High Noon Yasuo"],
                ),
                champion(
                    "MonkeyKing",
                    "Wukong",
                    "the Monkey King",
                    ["Crushing Blow", "Warrior Trickster", "Nimbus Strike", "Cyclone"],
                    &[],
                ),
            ],
            items: vec![
                item("1036", "Long Sword", 350, 350, &[], &["3133"]),
                item("3133", "Caulfield's Warhammer", 1100, 400, &["1036", "1036"], &[]),
            ],
            summoner_spells: summoners,
            runes: vec![
                Rune {
                    id: 8112,
                    key: "Electrocute".into(),
                    name: "Electrocute".into(),
                    short_desc: "Hitting a champion with 3 attacks deals bonus damage.".into(),
                    long_desc: "Hitting a champion with 3 <b>separate</b> attacks deals damage.".into(),
                    icon_url: format!("{DDRAGON_BASE}/cdn/img/perk-images/Electrocute.png"),
                    path: "Domination".into(),
                    tier: 0,
                },
                Rune {
                    id: 8126,
                    key: "CheapShot".into(),
                    name: "Cheap Shot".into(),
                    short_desc: "Deal bonus true damage to impaired enemies.".into(),
                    long_desc: "Damaging champions with impaired movement deals true damage.".into(),
                    icon_url: format!("{DDRAGON_BASE}/cdn/img/perk-images/CheapShot.png"),
                    path: "Domination".into(),
                    tier: 1,
                },
            ],
            skin_meta: HashMap::from([(
                "Ahri001".to_string(),
                SkinMeta {
                    price: Some(975),
                    currency: Some("RP".into()),
                    release_date: Some("2011-12-14".into()),
                },
            )]),
        };
        data.resolve_images();
        data
    }
}
