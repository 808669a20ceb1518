//! Terminal playback for `sceneboard play <id>`.

use std::io::Write;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::adapter::inbound::cli::event::fetch;
use crate::adapter::inbound::cli::output;
use crate::application::player::{typewriter, Frame, Player, PlayerConfig};
use crate::domain::Speaker;
use crate::error::Result;
use crate::port::outbound::store::EventStore;

/// Column where right-hand lines end.
const STAGE_WIDTH: usize = 72;

/// Execute `play`.
///
/// Animated playback types each line out and advances on a timer. With
/// `no_animate` every line is printed whole and Enter advances.
pub async fn execute(
    store: &dyn EventStore,
    id: &str,
    config: &PlayerConfig,
    no_animate: bool,
) -> Result<()> {
    let event = fetch(store, id).await?;
    let mut player = Player::new(&event);

    if output::is_json() {
        loop {
            output::json_output(frame_json(&player));
            if !player.next() {
                return Ok(());
            }
        }
    }

    output::section(event.name());
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let frame = player.frame();
        if let Some(image) = frame.left_image.or(frame.right_image) {
            output::note(&format!("[{}]", image));
        }

        if no_animate {
            println!("{}", stage_line(frame.speaker, frame.text));
        } else {
            type_out(&frame, config).await?;
        }
        output::note(&player.progress());

        if player.is_last() {
            return Ok(());
        }
        if no_animate {
            // End of input plays the rest straight through.
            let _ = stdin.next_line().await?;
        } else if let Some(pause) = config.advance_after(&player) {
            tokio::time::sleep(pause).await;
        }
        player.next();
    }
}

fn frame_json(player: &Player<'_>) -> serde_json::Value {
    let frame = player.frame();
    json!({
        "command": "play",
        "position": player.position() + 1,
        "total": player.total(),
        "speaker": frame.speaker,
        "text": frame.text,
        "left_image": frame.left_image,
        "right_image": frame.right_image,
    })
}

/// Reveal a line one character at a time.
async fn type_out(frame: &Frame<'_>, config: &PlayerConfig) -> Result<()> {
    let mut stdout = std::io::stdout();
    let mut typed = false;
    for prefix in typewriter(frame.text) {
        write!(stdout, "\r{}", stage_line(frame.speaker, prefix))?;
        stdout.flush()?;
        typed = true;
        tokio::time::sleep(config.char_delay()).await;
    }
    if !typed {
        write!(stdout, "{}", stage_line(frame.speaker, ""))?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Left lines hug the left edge; right lines end at the stage width.
fn stage_line(speaker: Speaker, text: &str) -> String {
    match speaker {
        Speaker::Left => format!("◀ {text}"),
        Speaker::Right => format!("{:>width$}", format!("{text} ▶"), width = STAGE_WIDTH),
    }
}
