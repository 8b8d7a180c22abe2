//! MyList - JSON-lines gateway
//!
//! One `InboundEvent` per input line, one `DisplayDocument` per output line.
//! A chat transport sits on the other side of the pipe.

use std::sync::Arc;

use mylist_core::{Config, DisplayDocument, ListBot, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    mylist_core::init_logging(&config.log_filter);

    let bot = Arc::new(ListBot::from_config(&config)?);
    let reaper = bot.registry().spawn_reaper(config.reap_interval());

    tracing::info!(
        database = %config.database_path.display(),
        session_ttl_secs = config.session_ttl_secs,
        "MyList bot started"
    );

    let served = serve(&bot, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await;

    reaper.abort();
    tracing::info!("MyList bot stopped");
    served
}

/// Answer every event line until the reader is exhausted.
pub async fn serve<R, W>(bot: &ListBot, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match bot.handle_json(&line).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed event");
                serde_json::to_string(&DisplayDocument::owner_only(format!("Malformed event: {e}")))?
            }
        };

        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
