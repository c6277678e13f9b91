use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::config::TelegramConfig;
use crate::platform::IncomingMessage;
use crate::plugin::{Event, EventContext, PluginHost};

const MAX_MESSAGE_LEN: usize = 4000;

/// Split long messages for Telegram's 4096 char limit
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}

/// `/help` body: the help of every visible plugin, in dispatch order.
fn help_reply(host: &PluginHost) -> String {
    let sections: Vec<String> = host
        .list()
        .into_iter()
        .filter_map(|meta| {
            host.help_text(&meta.name)
                .map(|help| format!("【{}】\n{}", meta.name, help))
        })
        .collect();

    if sections.is_empty() {
        "No plugins loaded.".to_string()
    } else {
        sections.join("\n\n")
    }
}

fn start_reply(host: &PluginHost) -> String {
    let mut text = String::from(
        "Hello! Send me a command and I'll look it up for you.\n\n\
         Commands:\n\
         /help - Show usage and supported currencies\n\n\
         Plugins:\n",
    );
    for meta in host.list() {
        text.push_str(&format!("  - {} v{}: {}\n", meta.name, meta.version, meta.description));
    }
    text
}

/// Run the Telegram bot platform
pub async fn run(host: Arc<PluginHost>, telegram: TelegramConfig, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    let handler = Update::filter_message()
        .filter_map(move |msg: Message| {
            let user = msg.from.as_ref()?;
            if telegram.is_allowed(user.id.0) {
                Some(msg)
            } else {
                None
            }
        })
        .endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![host])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, host: Arc<PluginHost>) -> ResponseResult<()> {
    let incoming = match msg.text() {
        Some(text) => IncomingMessage::text(text),
        None => IncomingMessage::other(),
    };

    if incoming.is_text() {
        info!("Telegram message in chat {}: {}", msg.chat.id.0, incoming.content);

        match incoming.content.trim() {
            "/start" => {
                bot.send_message(msg.chat.id, start_reply(&host)).await?;
                return Ok(());
            }
            "/help" => {
                for chunk in split_message(&help_reply(&host), MAX_MESSAGE_LEN) {
                    bot.send_message(msg.chat.id, chunk).await?;
                }
                return Ok(());
            }
            _ => {}
        }
    }

    let mut ctx = EventContext::new(incoming);
    host.emit(Event::OnHandleContext, &mut ctx).await;

    if let Some(reply) = ctx.reply {
        for chunk in split_message(&reply.text, MAX_MESSAGE_LEN) {
            bot.send_message(msg.chat.id, chunk).await.ok();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{PluginMetadata, Registration};
    use std::collections::HashMap;

    fn registration(name: &str, hidden: bool) -> Registration {
        Registration {
            metadata: PluginMetadata {
                name: name.to_string(),
                priority: 0,
                description: "desc".to_string(),
                version: "1.0".to_string(),
                hidden,
            },
            handlers: HashMap::new(),
            help_text: format!("usage of {name}"),
        }
    }

    #[test]
    fn test_short_message_is_not_split() {
        assert_eq!(split_message("hello", 10), vec!["hello".to_string()]);
    }

    #[test]
    fn test_split_prefers_newlines() {
        let chunks = split_message("aaaa\nbbbb\ncccc", 10);
        assert_eq!(chunks, vec!["aaaa\nbbbb\n", "cccc"]);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let text = "卡路里".repeat(10);
        let chunks = split_message(&text, 7);
        assert!(chunks.iter().all(|c| c.len() <= 7));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_help_reply_skips_hidden_plugins() {
        let mut host = PluginHost::new();
        host.register(registration("shown", false));
        host.register(registration("hidden", true));

        assert_eq!(help_reply(&host), "【shown】\nusage of shown");
        assert!(start_reply(&host).contains("  - shown v1.0: desc"));
        assert!(!start_reply(&host).contains("hidden"));
    }

    #[test]
    fn test_help_reply_without_plugins() {
        assert_eq!(help_reply(&PluginHost::new()), "No plugins loaded.");
    }
}
