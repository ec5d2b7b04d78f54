// LoL Trivia Bot
// League of Legends trivia rounds and game info lookups for Discord

mod api;
mod commands;
mod db;
mod features;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::ddragon::{fetch_game_data, spawn_refresh, DataDragon, GameDataStore};
use crate::db::TriviaDb;
use crate::features::trivia_session::TriviaSessions;
use crate::models::game_data::GameData;
use crate::utils::config::BotConfig;

/// User data shared across all commands
pub struct Data {
    pub config: BotConfig,
    pub game_data: Arc<GameDataStore>,
    pub sessions: Arc<TriviaSessions>,
    pub db: Arc<TriviaDb>,
}

// Manual Debug impl: keeps the token out of logs
impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("prefix", &self.config.prefix)
            .field("game_data", &"GameDataStore")
            .field("active_channels", &self.sessions.active_channels())
            .field("db", &self.config.db_path)
            .finish()
    }
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![commands::trivia::trivia(), commands::help::help()]
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "lol_trivia=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env();

    info!("Starting LoL Trivia Bot...");

    // Build HTTP client for Data Dragon
    let http_client = reqwest::Client::builder()
        .user_agent("LoL-Trivia-Bot/1.0")
        .build()
        .expect("Failed to create HTTP client");
    let ddragon = DataDragon::new(http_client, config.ddragon_locale.clone());

    // An empty data set keeps the bot usable; the refresh task retries later
    let game_data = match fetch_game_data(
        &ddragon,
        config.ddragon_version.as_deref(),
        &config.skin_data_path,
    )
    .await
    {
        Ok(data) => {
            info!(
                "Loaded game data for patch {} ({} champions, {} items, {} runes)",
                data.version,
                data.champions.len(),
                data.items.len(),
                data.runes.len()
            );
            data
        }
        Err(e) => {
            warn!("Failed to load game data: {}", e);
            GameData::default()
        }
    };
    let game_data = Arc::new(GameDataStore::new(game_data));
    spawn_refresh(
        Arc::clone(&game_data),
        ddragon,
        config.ddragon_version.clone(),
        config.skin_data_path.clone(),
    );

    let db = TriviaDb::open(&config.db_path).expect("Failed to open score database");
    let db = Arc::new(db);
    info!("Score database opened at {}", config.db_path);

    let sessions = TriviaSessions::new();
    let token = config.discord_token.clone();
    let prefix = config.prefix.clone();
    let activity = format!("Use {}trivia to play.", config.prefix);

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(features::event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command error: {:?}", error);
                            let _ = ctx
                                .send(poise::CreateReply::default().embed(utils::embeds::error(&error)))
                                .await;
                        }
                        err => {
                            if let Err(e) = poise::builtins::on_error(err).await {
                                error!("Framework error: {:?}", e);
                            }
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Registering commands...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully!");

                ctx.set_activity(Some(serenity::ActivityData::playing(activity)));

                Ok(Data {
                    config,
                    game_data,
                    sessions,
                    db,
                })
            })
        })
        .build();

    // MESSAGE_CONTENT is privileged; enable it in the Discord Dev Portal
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Failed to create client");

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to register Ctrl+C handler");
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    info!("Goodbye!");
}
