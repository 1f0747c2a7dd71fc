use std::future::Future;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, ParseMode};
use tokio::time::sleep;

use crate::state::SharedState;

/// Pause between deliveries, keeps the fan-out under Telegram's outbound
/// rate limits.
const DELIVERY_PACING: Duration = Duration::from_millis(50);

/// One broadcast carries exactly one payload kind.
#[derive(Debug, Clone)]
pub enum BroadcastPayload {
    Text(String),
    Photo { file_id: FileId, caption: String },
    Video { file_id: FileId, caption: String },
}

impl BroadcastPayload {
    pub fn from_message(msg: &Message) -> Option<Self> {
        if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
            return Some(Self::Photo {
                file_id: photo.file.id.clone(),
                caption: msg.caption().unwrap_or_default().to_string(),
            });
        }
        if let Some(video) = msg.video() {
            return Some(Self::Video {
                file_id: video.file.id.clone(),
                caption: msg.caption().unwrap_or_default().to_string(),
            });
        }
        let text = msg.text().or_else(|| msg.caption())?;
        Some(Self::Text(text.to_string()))
    }

    async fn send_to(&self, bot: &Bot, chat_id: ChatId) -> Result<(), teloxide::RequestError> {
        match self {
            Self::Text(text) => {
                bot.send_message(chat_id, text).parse_mode(ParseMode::Html).await?;
            }
            Self::Photo { file_id, caption } => {
                bot.send_photo(chat_id, InputFile::file_id(file_id.clone()))
                    .caption(caption)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            Self::Video { file_id, caption } => {
                bot.send_video(chat_id, InputFile::file_id(file_id.clone()))
                    .caption(caption)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
}

impl BroadcastReport {
    pub fn summary(&self) -> String {
        format!(
            "<b>Рассылка завершена!</b>\n\n\
             <b>Отчет:</b>\n\
             - Успешно отправлено: <b>{}</b>\n\
             - Не удалось отправить: <b>{}</b>\n\
             - Всего получателей: <b>{}</b>\n\n\
             <i>Для новой рассылки снова нажмите \"Сделать рассылку\"</i>",
            self.sent, self.failed, self.total
        )
    }
}

/// Sequential fan-out over a fixed recipient list. Per-recipient failures
/// are counted and logged, the run itself never aborts.
async fn deliver_all<F, Fut, E>(recipients: &[i64], mut send: F) -> BroadcastReport
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut report = BroadcastReport {
        sent: 0,
        failed: 0,
        total: recipients.len(),
    };

    for (idx, &chat_id) in recipients.iter().enumerate() {
        if idx > 0 {
            sleep(DELIVERY_PACING).await;
        }
        match send(chat_id).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                log::warn!("Error sending to user {}: {}", chat_id, e);
                report.failed += 1;
            }
        }
    }

    report
}

/// Admin free text that is not a panel button: broadcast it to every
/// subscriber known at this moment.
pub async fn broadcast_handler(bot: Bot, msg: Message, state: SharedState) -> Result<(), anyhow::Error> {
    let Some(payload) = BroadcastPayload::from_message(&msg) else {
        log::warn!("Admin message carries no broadcastable payload, ignoring");
        return Ok(());
    };

    let recipients = {
        let state = state.lock().await;
        state.subscribers.snapshot()
    };

    if recipients.is_empty() {
        bot.send_message(msg.chat.id, "Нет подписчиков для рассылки!").await?;
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        format!("Начинаю рассылку на {} пользователей...", recipients.len()),
    )
    .await?;

    let report = deliver_all(&recipients, |chat_id| {
        let bot = bot.clone();
        let payload = payload.clone();
        async move { payload.send_to(&bot, ChatId(chat_id)).await }
    })
    .await;

    bot.send_message(msg.chat.id, report.summary())
        .parse_mode(ParseMode::Html)
        .await?;

    log::info!(
        "Mailing report: success {}, failed {}, total {}",
        report.sent,
        report.failed,
        report.total
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn all_deliveries_succeed() {
        let recipients = vec![1, 2, 3];
        let report = deliver_all(&recipients, |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(
            report,
            BroadcastReport {
                sent: 3,
                failed: 0,
                total: 3
            }
        );
    }

    #[tokio::test]
    async fn failures_are_counted_and_do_not_abort_the_run() {
        let recipients = vec![1, 2, 3, 4, 5];
        let report = deliver_all(&recipients, |chat_id| async move {
            if chat_id % 2 == 0 {
                Err("bot was blocked by the user".to_string())
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(report.sent, 3);
        assert_eq!(report.failed, 2);
        assert_eq!(report.sent + report.failed, recipients.len());
        assert_eq!(report.total, recipients.len());
    }

    #[tokio::test]
    async fn empty_recipient_list_attempts_nothing() {
        let mut attempts = 0;
        let report = deliver_all(&[], |_| {
            attempts += 1;
            async { Ok::<(), String>(()) }
        })
        .await;
        assert_eq!(attempts, 0);
        assert_eq!(
            report,
            BroadcastReport {
                sent: 0,
                failed: 0,
                total: 0
            }
        );
    }
}
