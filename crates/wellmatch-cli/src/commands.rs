//! Command implementations shared by the binary and the integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use wellmatch_ingest::{CancelToken, FileSource, RejectedRow, load_registry};
use wellmatch_match::{MatchReport, MatchService};
use wellmatch_model::{MatchOptions, MatchRequest, RegistrySnapshot, SymptomQuery};

use crate::logging::redact_value;

/// Built-in calibrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Default,
    Strict,
    Relaxed,
}

impl Preset {
    pub fn options(self) -> MatchOptions {
        match self {
            Self::Default => MatchOptions::default(),
            Self::Strict => MatchOptions::strict(),
            Self::Relaxed => MatchOptions::relaxed(),
        }
    }
}

/// Resolves the engine calibration.
///
/// A JSON config file wins over the preset; fields it omits take their
/// default values.
pub fn load_options(config: Option<&Path>, preset: Preset) -> Result<MatchOptions> {
    let options = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str::<MatchOptions>(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => preset.options(),
    };
    options.validate().context("validate match options")?;
    Ok(options)
}

/// Inputs for `wellmatch match`.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub registry: PathBuf,
    pub symptoms: String,
    pub city: Option<String>,
    pub config: Option<PathBuf>,
    pub preset: Preset,
}

pub fn run_match(input: &MatchInput) -> Result<MatchReport> {
    let span = info_span!("match", registry = %input.registry.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = load_options(input.config.as_deref(), input.preset)?;
    let service = MatchService::new(options).context("build match engine")?;
    let summary = service
        .refresh(&FileSource::new(&input.registry), &CancelToken::new())
        .with_context(|| format!("load registry {}", input.registry.display()))?;
    if summary.rejected > 0 {
        warn!(rejected = summary.rejected, "registry rows were skipped");
    }

    debug!(
        symptoms = %redact_value(&input.symptoms),
        city = input.city.as_deref().map_or("-", redact_value),
        "matching request"
    );
    let mut request = MatchRequest::new(input.symptoms.clone());
    if let Some(city) = &input.city {
        request = request.with_location(city.clone());
    }
    let report = service.recommend(&request).context("recommend practitioners")?;

    info!(
        strategy = %report.strategy,
        results = report.entries.len(),
        considered = report.considered,
        duration_ms = start.elapsed().as_millis(),
        "recommendation complete"
    );
    Ok(report)
}

/// Accepted and rejected rows of one registry file.
#[derive(Debug, Clone)]
pub struct RegistryListing {
    pub snapshot: RegistrySnapshot,
    pub rejected: Vec<RejectedRow>,
}

pub fn run_practitioners(registry: &Path) -> Result<RegistryListing> {
    let loaded = load_registry(&FileSource::new(registry), &CancelToken::new())
        .with_context(|| format!("load registry {}", registry.display()))?;
    info!(
        practitioners = loaded.snapshot.len(),
        specialties = loaded.snapshot.specialty_count(),
        rejected = loaded.rejected.len(),
        "registry loaded"
    );
    Ok(RegistryListing {
        snapshot: loaded.snapshot,
        rejected: loaded.rejected,
    })
}

pub fn run_normalize(text: &str, options: MatchOptions) -> Result<SymptomQuery> {
    let service = MatchService::new(options).context("build match engine")?;
    let query = service
        .engine()
        .normalize(text)
        .context("normalize symptoms")?;
    Ok(query)
}
