//! Single-shot dashboard run.

use std::io::Write;

use chrono::Local;

use crate::core::models::Frame;
use crate::core::query::{build_frame, fetch_all};
use crate::error::Result;
use crate::render::{Palette, Presenter, Screen, render_width, terminal_width};
use crate::storage::config::ResolvedConfig;
use crate::storage::credentials::CredentialStore;
use crate::util::env::should_use_color;

/// Run the dashboard once, or keep it running in watch mode.
///
/// # Errors
/// Returns an error if the credential store cannot be read (single-shot
/// only) or the terminal cannot be written.
pub async fn execute(config: &ResolvedConfig) -> Result<()> {
    let presenter = Presenter::new(Palette::new(should_use_color(config.no_color)));

    if config.watch {
        return super::watch::run_watch(config, &presenter).await;
    }

    let width = render_width(config.render.max_width, terminal_width());
    let mut screen = Screen::stdout(width, false);
    run_once(config, &presenter, &mut screen).await
}

/// Fetch every configured provider and build one frame.
pub async fn fetch_frame(store: &CredentialStore) -> Frame {
    let fetched = fetch_all(store).await;
    build_frame(fetched.outcomes, fetched.derived, Local::now())
}

/// Render one frame to `screen`; an empty frame prints a setup hint instead.
///
/// # Errors
/// Returns an error if the credential store cannot be read or the screen
/// cannot be written.
pub async fn run_once<W: Write>(
    config: &ResolvedConfig,
    presenter: &Presenter,
    screen: &mut Screen<W>,
) -> Result<()> {
    let store = CredentialStore::load(&config.credentials_path)?;
    let frame = fetch_frame(&store).await;

    tracing::info!(
        reports = frame.reports.len(),
        failures = frame.failures.len(),
        "Fetched quotas"
    );

    if frame.is_empty() {
        let path = config.credentials_path.display().to_string();
        return screen.print(&presenter.empty_hint(&path));
    }

    let lines = presenter.assemble(&frame, &config.render, None, screen.width());
    screen.print(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Cli;
    use crate::error::QuotaError;
    use crate::storage::paths::AppPaths;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ResolvedConfig {
        let paths = AppPaths {
            config: dir.path().to_path_buf(),
        };
        ResolvedConfig::resolve_with(&Cli::default(), |_| None, &paths).unwrap()
    }

    #[tokio::test]
    async fn unreadable_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let mut screen = Screen::new(Vec::new(), 80, false);
        let err = run_once(&config, &Presenter::new(Palette::plain()), &mut screen)
            .await
            .unwrap_err();
        assert!(matches!(err, QuotaError::CredentialRead { .. }));
        assert!(screen.into_inner().is_empty());
    }

    #[tokio::test]
    async fn empty_store_prints_hint() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("credentials.json"), "{}").unwrap();
        let config = config_in(&dir);
        let mut screen = Screen::new(Vec::new(), 80, false);
        run_once(&config, &Presenter::new(Palette::plain()), &mut screen)
            .await
            .unwrap();
        let text = String::from_utf8(screen.into_inner()).unwrap();
        assert!(text.contains("No quota providers configured."));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn renders_configured_provider() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("credentials.json"),
            r#"{"kimi": {"command": ["sh", "-c", "printf 'Account: dev\nWeekly 45%%\n'"]}}"#,
        )
        .unwrap();
        let config = config_in(&dir);
        let mut screen = Screen::new(Vec::new(), 60, false);
        run_once(&config, &Presenter::new(Palette::plain()), &mut screen)
            .await
            .unwrap();
        let text = String::from_utf8(screen.into_inner()).unwrap();
        assert!(text.contains("Active providers: 1"));
        assert!(text.contains("  ● ◐ Kimi (45%)"));
        assert!(text.contains("Account: dev"));
    }
}
