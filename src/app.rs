use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use tubefetch::client::{ApiClient, ClientError, DownloadForm, Format, is_previewable};
use tubefetch::config::Config;
use tubefetch::health::check_health;
use tubefetch::humanize::ByteSize;
use tubefetch::poller::{DownloadAction, Poller, ProgressView, SessionOutcome, render};
use tubefetch::prefs::{Preferences, Theme};
use tubefetch::view::TerminalView;

use crate::cli::{DownloadArgs, InfoArgs, StatusArgs, ThemeAction};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Exit status for a Ctrl+C interruption
const INTERRUPTED: u8 = 130;

pub async fn download(config: &Config, args: DownloadArgs) -> Result<ExitCode, AnyError> {
    let view = Arc::new(terminal_view(config));
    let client = Arc::new(ApiClient::new(&config.api.http_config())?);

    check_health(&client, view.as_ref()).await;

    if !args.no_preview {
        preview(&client, &view, &args.url).await;
    }

    let format = args.format.unwrap_or(config.download.default_format);
    let quality = match format {
        Format::Mp4 => args.quality.or(config.download.default_quality),
        Format::Mp3 => None,
    };
    let form = DownloadForm {
        url: args.url,
        format,
        quality,
    };

    let mut poller = Poller::new(client.clone(), view.clone(), config.api.poll_interval());
    let handle = match poller.submit(&form).await {
        Ok(handle) => handle,
        Err(e) => {
            info!(error = %e, "Submission failed");
            return Ok(ExitCode::FAILURE);
        }
    };

    let outcome = tokio::select! {
        outcome = poller.wait() => outcome,
        _ = tokio::signal::ctrl_c() => None,
    };

    let Some(outcome) = outcome else {
        poller.stop_polling();
        view.show_error("Interrupted, the task keeps running on the server");
        view.notice(&format!("Check it later with: tubefetch status {}", handle.task_id));
        return Ok(ExitCode::from(INTERRUPTED));
    };

    match outcome {
        SessionOutcome::Completed(state) => {
            let Some(action) = state.download else {
                return Ok(ExitCode::SUCCESS);
            };
            let output_dir = args.output_dir.or_else(|| config.download.output_dir.clone());
            deliver(&client, &view, &action, output_dir.as_deref()).await
        }
        SessionOutcome::Failed(_) | SessionOutcome::Aborted(_) | SessionOutcome::Cancelled => {
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn info(config: &Config, args: InfoArgs) -> Result<ExitCode, AnyError> {
    let view = terminal_view(config);
    let client = ApiClient::new(&config.api.http_config())?;

    if preview(&client, &view, &args.url).await {
        Ok(ExitCode::SUCCESS)
    } else {
        view.notice("No preview available for this URL");
        Ok(ExitCode::FAILURE)
    }
}

pub async fn status(config: &Config, args: StatusArgs) -> Result<ExitCode, AnyError> {
    let view = terminal_view(config);
    let client = ApiClient::new(&config.api.http_config())?;

    match client.task_status(&args.task_id).await {
        Ok(snapshot) => {
            let state = render(&args.task_id, &snapshot);
            view.show_progress(&args.task_id);
            view.render(&state);
            if let Some(error) = &state.error {
                view.show_error(error);
            }
            if let Some(action) = &state.download {
                view.notice(&format!("File: {}", client.file_url(&action.task_id)?));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            view.show_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn health(config: &Config) -> Result<ExitCode, AnyError> {
    let view = terminal_view(config);
    let client = ApiClient::new(&config.api.http_config())?;

    if check_health(&client, &view).await {
        view.notice(&format!("API reachable at {}", client.base_url()));
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

pub fn theme(config: &Config, action: ThemeAction) -> Result<ExitCode, AnyError> {
    let path = &config.ui.prefs_path;
    let theme = match action {
        ThemeAction::Show => Preferences::load(path)?.theme,
        ThemeAction::Toggle => Preferences::toggle_theme(path)?,
    };

    println!("{}", theme.as_str());
    Ok(ExitCode::SUCCESS)
}

fn terminal_view(config: &Config) -> TerminalView {
    let theme = Preferences::load(&config.ui.prefs_path)
        .map(|prefs| prefs.theme)
        .unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable preferences");
            Theme::default()
        });

    TerminalView::new(theme, config.ui.color)
}

/// Shows the preview panel when the service can describe the URL
async fn preview(client: &ApiClient, view: &TerminalView, url: &str) -> bool {
    if !is_previewable(url) {
        return false;
    }

    match client.video_info(url).await {
        Ok(info) => {
            view.show_preview(&info);
            true
        }
        Err(e) => {
            info!(error = %e, "Preview not available");
            false
        }
    }
}

/// Saves the finished file, or points at it when no output directory is set
async fn deliver(
    client: &ApiClient,
    view: &TerminalView,
    action: &DownloadAction,
    output_dir: Option<&Path>,
) -> Result<ExitCode, AnyError> {
    let Some(dir) = output_dir else {
        view.notice(&format!("Download: {}", client.file_url(&action.task_id)?));
        return Ok(ExitCode::SUCCESS);
    };

    let target = dir.join(local_file_name(action));
    match save_file(client, &action.task_id, &target).await {
        Ok(size) => {
            view.notice(&format!("Saved {} to {}", size, target.display()));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            view.show_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn save_file(client: &ApiClient, task_id: &str, target: &Path) -> Result<ByteSize, ClientError> {
    let bytes = client.fetch_file(task_id).await?;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, &bytes).await?;

    info!(task_id, path = %target.display(), size = bytes.len(), "File saved");
    Ok(ByteSize::from(bytes.len()))
}

/// File name inside the output directory; never escapes it
fn local_file_name(action: &DownloadAction) -> PathBuf {
    action
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&action.task_id))
}
