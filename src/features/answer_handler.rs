// Answer Handler - checks channel messages against pending trivia questions

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::utils::embeds;
use crate::Data;

/// Handle a message posted while a question may be pending
pub async fn handle_answer_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
    bot_id: serenity::UserId,
) -> Result<(), anyhow::Error> {
    // Ignore bots, including our own questions and announcements
    if msg.author.bot || msg.author.id == bot_id {
        return Ok(());
    }

    if !data.sessions.is_busy(msg.channel_id) {
        return Ok(());
    }

    let Some(correct) = data
        .sessions
        .try_answer(msg.channel_id, msg.author.id, &msg.content)
    else {
        return Ok(());
    };

    info!(
        "{} answered {} question in channel {} (+{})",
        msg.author.name,
        correct.question.kind.name(),
        msg.channel_id,
        correct.points
    );

    let total = match data
        .db
        .add_score(msg.author.id.get(), correct.points as i64, &msg.author.name)
    {
        Ok(total) => Some(total),
        Err(e) => {
            error!("Failed to save score for {}: {}", msg.author.id, e);
            None
        }
    };

    msg.channel_id
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .embed(embeds::correct(msg.author.id, &correct.question, correct.points, total))
                .reference_message(msg),
        )
        .await?;

    Ok(())
}
