use std::fs;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use include_dir::{include_dir, Dir};
use serde_json::Value;
use tracing::info;

static MANIFESTS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/manifest");

pub const MANIFEST_FILE: &str = "manifest.json";


/// Output directory of a build mode.
pub fn build_dir(mode: &str) -> &'static str {
  match mode {
    "chrome" => "build-chrome",
    "firefox" => "build-firefox",
    _ => "build",
  }
}

/// Browsers with a bundled manifest, sorted.
pub fn browsers() -> Vec<&'static str> {
  let mut browsers = MANIFESTS
    .files()
    .filter_map(|file| file.path().file_stem()?.to_str())
    .collect::<Vec<&str>>();
  browsers.sort_unstable();
  browsers
}

pub fn manifest(browser: &str) -> anyhow::Result<&'static str> {
  MANIFESTS
    .get_file(format!("{browser}.json"))
    .and_then(|file| file.contents_utf8())
    .ok_or_else(|| anyhow!("No manifest for browser {browser}"))
}

/// Copies the browser's manifest into `out_dir` as `manifest.json`.
pub fn write_manifest(browser: &str, out_dir: &Path) -> anyhow::Result<PathBuf> {
  let contents = manifest(browser)?;

  let value: Value = serde_json::from_str(contents)?;
  if value.get("manifest_version").is_none() {
    return Err(anyhow!("Manifest for {browser} has no manifest_version"));
  }

  fs::create_dir_all(out_dir)?;
  let path = out_dir.join(MANIFEST_FILE);
  fs::write(&path, contents)?;

  info!("Wrote {} manifest to {}", browser, path.display());

  Ok(path)
}
