pub mod answer_handler;
pub mod lookup;
pub mod questions;
pub mod trivia_session;

use poise::serenity_prelude as serenity;

use crate::{Data, Error};

/// Gateway events that are not commands
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            answer_handler::handle_answer_message(ctx, new_message, data, framework.bot_id).await?;
        }
        serenity::FullEvent::Ready { data_about_bot } => {
            tracing::info!("{} is connected", data_about_bot.user.name);
        }
        _ => {}
    }
    Ok(())
}
