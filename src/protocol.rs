//! Line-oriented loop between the game host and the strategy.
//!
//! The host writes one JSON object per line:
//! 1. the game configuration (it carries `unitInformation`),
//! 2. for every turn, a decision frame, answered with two lines
//!    (builds, then deployments),
//! 3. any number of action sub-frames for the turn just submitted,
//! 4. a final frame with phase 2.

use std::io::{BufRead, Write};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::Tuning;
use crate::error::{FrameError, ProtocolError};
use crate::game::{Frame, Phase, Turn, UnitCatalog};
use crate::strategy::Strategy;

/// Totals for a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSummary {
    /// Decision phases answered.
    pub turns_played: u32,
    /// Action sub-frames consumed.
    pub action_frames: u64,
    /// Breaches suffered.
    pub breaches_suffered: usize,
}

/// Play one game: read frames from `reader` and answer on `writer`.
///
/// Returns when the host signals game over or closes the pipe.
///
/// # Errors
///
/// Returns an error on I/O failure, on a frame that breaks the host
/// contract, or on a turn frame before the configuration.
pub fn run<R: BufRead, W: Write>(
    tuning: &Tuning,
    reader: R,
    mut writer: W,
) -> Result<GameSummary, ProtocolError> {
    // The catalog is kept beside the strategy so a turn can borrow it while
    // the strategy is borrowed mutably.
    let mut game: Option<(UnitCatalog, Strategy)> = None;
    let mut summary = GameSummary::default();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .map_err(|e| FrameError::Json(e.to_string()))?;

        if value.get("unitInformation").is_some() {
            let catalog = UnitCatalog::from_config_value(&value)?;
            info!("game configured");
            game = Some((catalog.clone(), Strategy::new(tuning.clone(), catalog)));
            continue;
        }

        let frame = Frame::from_value(&value)?;
        let (catalog, strategy) = game.as_mut().ok_or(ProtocolError::NotConfigured)?;

        match frame.info.phase {
            Phase::Decision => {
                let mut turn = Turn::from_frame(catalog, &frame);
                strategy.on_turn(&mut turn, frame.info.turn);

                let submission = turn
                    .submission()
                    .map_err(|e| FrameError::Json(e.to_string()))?;
                writeln!(writer, "{}", submission.build)?;
                writeln!(writer, "{}", submission.deploy)?;
                writer.flush()?;

                debug!(
                    turn = turn.number(),
                    accepted = turn.orders().len(),
                    rejected = turn.rejected(),
                    "turn submitted"
                );
                summary.turns_played += 1;
            }
            Phase::Action => {
                strategy.on_action_frame(&frame);
                summary.action_frames += 1;
            }
            Phase::GameOver => {
                info!("game over");
                break;
            }
        }
    }

    summary.breaches_suffered = game.map_or(0, |(_, s)| s.telemetry().breaches().len());
    Ok(summary)
}
