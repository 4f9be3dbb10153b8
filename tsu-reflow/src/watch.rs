use std::path::Path;
use std::time::{Duration, SystemTime};

use tokio::fs;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use tsu_schedule::{ChangeWatcher, Dom, Variant};

/// Keeps one document in sync with `input` and re-renders it on every change.
pub async fn watch(
  input: &Path,
  output: &Path,
  variant: Variant,
  period: Duration,
) -> anyhow::Result<()> {
  let mut dom = Dom::default();
  let mut watcher = ChangeWatcher::new(variant);
  watcher.start(&mut dom);

  let mut ticker = interval(period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

  let shutdown = tokio::signal::ctrl_c();
  tokio::pin!(shutdown);

  let mut last_modified: Option<SystemTime> = None;

  info!("Watching {} every {:?}", input.display(), period);

  loop {
    tokio::select! {
      result = &mut shutdown => {
        result?;
        watcher.stop(&mut dom);
        info!("Stopped watching {}", input.display());
        return Ok(());
      }
      _ = ticker.tick() => {}
    }

    let modified = match fs::metadata(input).await.and_then(|meta| meta.modified()) {
      Err(err) => {
        error!("Unable to read {}: {}", input.display(), err);
        continue;
      }
      Ok(modified) => modified,
    };

    if last_modified != Some(modified) {
      let html = match fs::read_to_string(input).await {
        Err(err) => {
          error!("Unable to read {}: {}", input.display(), err);
          continue;
        }
        Ok(html) => html,
      };

      last_modified = Some(modified);
      dom.replace_document(&html);
    }

    match watcher.poll(&mut dom) {
      Err(err) => error!("Error executing render pass: {}", err),
      Ok(None) => {}
      Ok(Some(summary)) => {
        fs::write(output, dom.html()).await?;
        info!(
          "Wrote {} with {} lessons",
          output.display(),
          summary.lessons
        );
      }
    }
  }
}
