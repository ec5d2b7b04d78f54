// Riot Data Dragon client
// Static champion/item/summoner/rune data served as plain JSON from the CDN

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::game_data::{
    Champion, GameData, Item, Rune, SkinMeta, SummonerSpell, DDRAGON_BASE,
};

const REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 3600);
/// Retry pacing while no game data has loaded yet
const RETRY_START: Duration = Duration::from_secs(30);
const RETRY_MAX: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("request to Data Dragon failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Data Dragon returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("Data Dragon published no versions")]
    NoVersion,
}

/// Data Dragon HTTP client
#[derive(Clone)]
pub struct DataDragon {
    client: reqwest::Client,
    locale: String,
}

impl DataDragon {
    pub fn new(client: reqwest::Client, locale: impl Into<String>) -> Self {
        Self {
            client,
            locale: locale.into(),
        }
    }

    /// Most recent patch, e.g. "14.1.1"
    pub async fn latest_version(&self) -> Result<String, DataError> {
        let versions: Vec<String> = self
            .fetch(format!("{DDRAGON_BASE}/api/versions.json"))
            .await?;
        versions.into_iter().next().ok_or(DataError::NoVersion)
    }

    /// Download every dataset for one patch
    pub async fn load(&self, version: &str) -> Result<GameData, DataError> {
        let base = format!("{DDRAGON_BASE}/cdn/{version}/data/{}", self.locale);

        let (champions, items, summoners, rune_paths) = futures::try_join!(
            self.fetch::<DataFile<Champion>>(format!("{base}/championFull.json")),
            self.fetch::<DataFile<Item>>(format!("{base}/item.json")),
            self.fetch::<DataFile<SummonerSpell>>(format!("{base}/summoner.json")),
            self.fetch::<Vec<RunePathDto>>(format!("{base}/runesReforged.json")),
        )?;

        let mut champions: Vec<Champion> = champions.data.into_values().collect();
        champions.sort_by(|a, b| a.name.cmp(&b.name));

        let mut items: Vec<Item> = items
            .data
            .into_iter()
            .map(|(id, mut item)| {
                item.id = id;
                item
            })
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));

        let mut summoner_spells: Vec<SummonerSpell> = summoners.data.into_values().collect();
        summoner_spells.sort_by(|a, b| a.name.cmp(&b.name));

        let mut data = GameData {
            version: version.to_string(),
            champions,
            items,
            summoner_spells,
            runes: flatten_runes(rune_paths),
            skin_meta: HashMap::new(),
        };
        data.resolve_images();

        Ok(data)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: String) -> Result<T, DataError> {
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(DataError::Status {
                status: response.status(),
                url,
            });
        }

        Ok(response.json().await?)
    }
}

/// Load the optional skin price/release supplement (skin id -> meta)
pub fn load_skin_meta(path: &str) -> HashMap<String, SkinMeta> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!("No skin data at {}: {}", path, e);
            return HashMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(meta) => meta,
        Err(e) => {
            warn!("Ignoring malformed skin data in {}: {}", path, e);
            HashMap::new()
        }
    }
}

/// Holder for the current game data, swapped wholesale on refresh
pub struct GameDataStore {
    inner: RwLock<Arc<GameData>>,
}

impl GameDataStore {
    pub fn new(data: GameData) -> Self {
        Self {
            inner: RwLock::new(Arc::new(data)),
        }
    }

    pub async fn snapshot(&self) -> Arc<GameData> {
        Arc::clone(&*self.inner.read().await)
    }

    pub async fn replace(&self, data: GameData) {
        *self.inner.write().await = Arc::new(data);
    }
}

/// Resolve the version to use and download it, attaching skin metadata
pub async fn fetch_game_data(
    ddragon: &DataDragon,
    pinned_version: Option<&str>,
    skin_data_path: &str,
) -> Result<GameData, DataError> {
    let version = match pinned_version {
        Some(v) => v.to_string(),
        None => ddragon.latest_version().await?,
    };

    let mut data = ddragon.load(&version).await?;
    data.skin_meta = load_skin_meta(skin_data_path);
    Ok(data)
}

/// Re-download game data in the background; failures keep the old data
pub fn spawn_refresh(
    store: Arc<GameDataStore>,
    ddragon: DataDragon,
    pinned_version: Option<String>,
    skin_data_path: String,
) {
    tokio::spawn(async move {
        let mut failures = 0;
        loop {
            let has_data = !store.snapshot().await.is_empty();
            tokio::time::sleep(next_delay(has_data, failures)).await;
            match fetch_game_data(&ddragon, pinned_version.as_deref(), &skin_data_path).await {
                Ok(data) => {
                    info!(
                        "Game data refreshed: patch {} ({} champions, {} items)",
                        data.version,
                        data.champions.len(),
                        data.items.len()
                    );
                    store.replace(data).await;
                    failures = 0;
                }
                Err(e) => {
                    failures += 1;
                    warn!("Game data refresh failed ({} in a row): {}", failures, e);
                }
            }
        }
    });
}

/// Wait before the next download. Without any data the bot retries soon,
/// doubling the wait per failure up to `RETRY_MAX`.
fn next_delay(has_data: bool, failures: u32) -> Duration {
    if has_data {
        return REFRESH_INTERVAL;
    }
    RETRY_START
        .saturating_mul(2u32.saturating_pow(failures))
        .min(RETRY_MAX)
}

fn flatten_runes(paths: Vec<RunePathDto>) -> Vec<Rune> {
    let mut runes = Vec::new();
    for path in paths {
        for (tier, slot) in path.slots.into_iter().enumerate() {
            for rune in slot.runes {
                runes.push(Rune {
                    id: rune.id,
                    key: rune.key,
                    name: rune.name,
                    short_desc: rune.short_desc,
                    long_desc: rune.long_desc,
                    icon_url: format!("{DDRAGON_BASE}/cdn/img/{}", rune.icon),
                    path: path.name.clone(),
                    tier,
                });
            }
        }
    }
    runes
}

// Response structures
#[derive(Debug, Deserialize)]
struct DataFile<T> {
    data: HashMap<String, T>,
}

#[derive(Debug, Deserialize)]
struct RunePathDto {
    name: String,
    slots: Vec<RuneSlotDto>,
}

#[derive(Debug, Deserialize)]
struct RuneSlotDto {
    runes: Vec<RuneDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuneDto {
    id: i64,
    key: String,
    name: String,
    icon: String,
    #[serde(default)]
    short_desc: String,
    #[serde(default)]
    long_desc: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_runes_assigns_tiers() {
        let paths: Vec<RunePathDto> = serde_json::from_value(json!([
            {
                "id": 8000, "key": "Precision", "icon": "perk-images/Styles/7201_Precision.png",
                "name": "Precision",
                "slots": [
                    { "runes": [
                        { "id": 8005, "key": "PressTheAttack", "icon": "perk-images/PTA.png",
                          "name": "Press the Attack", "shortDesc": "short", "longDesc": "long" },
                        { "id": 8021, "key": "FleetFootwork", "icon": "perk-images/Fleet.png",
                          "name": "Fleet Footwork", "shortDesc": "short", "longDesc": "long" }
                    ]},
                    { "runes": [
                        { "id": 9101, "key": "Overheal", "icon": "perk-images/Overheal.png",
                          "name": "Overheal", "shortDesc": "short", "longDesc": "long" }
                    ]}
                ]
            }
        ]))
        .unwrap();

        let runes = flatten_runes(paths);
        assert_eq!(runes.len(), 3);
        assert_eq!(runes[0].tier, 0);
        assert_eq!(runes[2].name, "Overheal");
        assert_eq!(runes[2].tier, 1);
        assert_eq!(runes[2].path, "Precision");
        assert_eq!(runes[2].tier_name(), "Heroism");
        assert_eq!(
            runes[0].icon_url,
            "https://ddragon.leagueoflegends.com/cdn/img/perk-images/PTA.png"
        );
    }

    #[test]
    fn test_item_file_shape() {
        let file: DataFile<Item> = serde_json::from_value(json!({
            "type": "item",
            "version": "14.1.1",
            "data": {
                "1001": {
                    "name": "Boots",
                    "description": "<mainText>Slightly increases Move Speed</mainText>",
                    "plaintext": "Slightly increases Move Speed",
                    "into": ["3006"],
                    "image": { "full": "1001.png", "sprite": "item0.png" },
                    "gold": { "base": 300, "purchasable": true, "total": 300, "sell": 210 },
                    "tags": ["Boots"]
                }
            }
        }))
        .unwrap();

        let boots = &file.data["1001"];
        assert_eq!(boots.gold.total, 300);
        assert!(boots.from.is_empty());
        assert_eq!(boots.into, vec!["3006".to_string()]);
    }

    #[test]
    fn test_missing_skin_data_is_empty() {
        assert!(load_skin_meta("does/not/exist.json").is_empty());
    }

    #[test]
    fn test_empty_store_retries_with_backoff() {
        assert_eq!(next_delay(false, 0), Duration::from_secs(30));
        assert_eq!(next_delay(false, 1), Duration::from_secs(60));
        assert_eq!(next_delay(false, 3), Duration::from_secs(240));
        assert_eq!(next_delay(false, 4), RETRY_MAX);
        assert_eq!(next_delay(false, 40), RETRY_MAX);
    }

    #[test]
    fn test_loaded_store_refreshes_on_interval() {
        assert_eq!(next_delay(true, 0), REFRESH_INTERVAL);
        assert_eq!(next_delay(true, 5), REFRESH_INTERVAL);
    }

    #[tokio::test]
    async fn test_store_replace() {
        let store = GameDataStore::new(GameData::default());
        assert!(store.snapshot().await.is_empty());

        let data = crate::models::game_data::fixtures::game_data();
        store.replace(data).await;
        assert_eq!(store.snapshot().await.version, "14.1.1");
    }
}
