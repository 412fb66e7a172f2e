use std::path::Path;

use anyhow::Context;
use log::{info, warn};

use crate::config::GaitConfig;

/// Leser inn konfig fra disk (JSON) og validerer den.
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<GaitConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("fant ikke konfig på {}, bruker default", path.display());
        return Ok(GaitConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("kunne ikke lese {}", path.display()))?;
    let cfg = GaitConfig::from_json_str(&contents)
        .with_context(|| format!("ugyldig konfig i {}", path.display()))?;
    info!(
        "konfig lastet fra {} (fs={} Hz, threshold={})",
        path.display(),
        cfg.sampling_rate_hz,
        cfg.step_threshold
    );
    Ok(cfg)
}

/// Lagrer konfig til disk som JSON (pretty-print). Ugyldig konfig lagres ikke.
pub fn save_config(cfg: &GaitConfig, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    cfg.validate().context("nekter å lagre ugyldig konfig")?;
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).with_context(|| format!("kunne ikke skrive {}", path.display()))?;
    info!("konfig lagret til {}", path.display());
    Ok(())
}
