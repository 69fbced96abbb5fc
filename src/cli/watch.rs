//! Watch mode: fetch, redraw, count down, repeat until interrupted.

use std::io::Write;
use std::sync::Arc;

use tokio::time::{Duration, interval, sleep};

use super::run::fetch_frame;
use crate::core::models::{Frame, Region};
use crate::core::poll_state::PollState;
use crate::error::Result;
use crate::render::{Presenter, Screen, WatchInfo, render_width, terminal_width};
use crate::storage::config::ResolvedConfig;
use crate::storage::credentials::CredentialStore;
use crate::util::env::stdout_is_tty;

/// Period of the countdown repaint.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// State tracking across watch iterations.
#[derive(Debug, Default)]
pub struct WatchState {
    pub last_frame: Option<Frame>,
    pub fetch_count: u64,
    pub skipped_count: u64,
}

impl WatchState {
    /// Create a new watch state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched frame.
    pub(crate) fn update(&mut self, frame: Frame) {
        self.fetch_count += 1;
        self.last_frame = Some(frame);
    }

    /// Record a frame skipped because the credential store was unreadable.
    /// The previous frame stays on screen.
    pub(crate) const fn skip(&mut self) {
        self.skipped_count += 1;
    }
}

/// Run watch mode until Ctrl+C.
///
/// # Errors
/// Returns an error if the terminal cannot be written.
pub async fn run_watch(config: &ResolvedConfig, presenter: &Presenter) -> Result<()> {
    let state = Arc::new(PollState::new());

    // Ctrl+C only flips the run flag; the loop notices and exits cleanly.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                state.request_stop();
            }
        });
    }

    let width = render_width(config.render.max_width, terminal_width());
    let mut screen = Screen::stdout(width, stdout_is_tty());
    watch_loop(config, presenter, &state, &mut screen, terminal_width).await
}

/// The poll loop, parameterised over the output sink and width source.
///
/// # Errors
/// Returns an error if the screen cannot be written or a non-recoverable
/// error occurs while building a frame.
pub async fn watch_loop<W: Write>(
    config: &ResolvedConfig,
    presenter: &Presenter,
    state: &PollState,
    screen: &mut Screen<W>,
    columns: impl Fn() -> u16,
) -> Result<()> {
    let mut watch = WatchState::new();

    while state.is_running() {
        screen.set_width(render_width(config.render.max_width, columns()));

        match CredentialStore::load(&config.credentials_path) {
            // Dropping an unfinished fetch kills its provider processes.
            Ok(store) => tokio::select! {
                biased;
                () = state.stopped() => break,
                frame = fetch_frame(&store) => watch.update(frame),
            },
            Err(e) if e.is_frame_recoverable() => {
                tracing::warn!(error = %e, "Skipping frame");
                watch.skip();
            }
            Err(e) => return Err(e),
        }

        state.schedule_next(config.interval);

        let countdown_visible = match &watch.last_frame {
            Some(frame) => {
                let info = WatchInfo {
                    interval: config.interval,
                    remaining: state.time_until_next(),
                };
                let lines = presenter.assemble(frame, &config.render, Some(&info), screen.width());
                screen.redraw(&lines)?;
                config.render.shows(Region::Footer)
            }
            None => false,
        };

        tracing::debug!(
            fetches = watch.fetch_count,
            skipped = watch.skipped_count,
            "Frame rendered, waiting for next update"
        );

        let frame_timer = sleep(config.interval);
        tokio::pin!(frame_timer);
        let mut countdown = interval(COUNTDOWN_TICK);
        countdown.tick().await;

        loop {
            tokio::select! {
                biased;
                () = state.stopped() => break,
                () = &mut frame_timer => break,
                _ = countdown.tick() => {
                    if countdown_visible {
                        let line = presenter.countdown_line(state.time_until_next(), screen.width());
                        screen.repaint_last_line(&line)?;
                    }
                }
            }
        }
    }

    screen.farewell(&presenter.farewell_line())?;
    Ok(())
}
