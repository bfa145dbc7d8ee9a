//! The simulation driver: seeded invocation loop and run report.
//!
//! The driver owns a validated catalog and config. Each invocation gets its
//! own RNG stream derived from the base seed and the invocation index, so a
//! report plus its seed is enough to replay any single invocation in
//! isolation.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use ledgersim_error::{SimError, SimResult};
use ledgersim_types::SimAccount;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::catalog::OperationCatalog;
use crate::config::SimConfig;
use crate::derive_invocation_seed;
use crate::env::{AccountKeeper, SimEnv, StateQuery, TxSubmitter};
use crate::outcome::Outcome;

/// Schema tag stamped on serialized run reports.
pub const REPORT_SCHEMA_V1: &str = "ledgersim.report.v1";

/// RNG provenance recorded in every report.
///
/// Replaying a run requires the same algorithm and crate version, not just
/// the same seed; the report says which ones produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngSpec {
    /// RNG algorithm family.
    pub algorithm: String,
    /// Crate version the streams were drawn with.
    pub version: String,
}

impl Default for RngSpec {
    fn default() -> Self {
        Self {
            algorithm: "StdRng/ChaCha12".to_owned(),
            version: "rand 0.8".to_owned(),
        }
    }
}

/// Status of one recorded invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Skip,
    Error,
}

/// One line of the per-invocation record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Invocation index within the run.
    pub invocation: u64,
    /// Operation kind the catalog selected.
    pub kind: String,
    /// How the invocation ended.
    pub status: OutcomeStatus,
    /// Skip reason code, present only for skips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Failing stage, present only for errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Error rendering, present only for errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Per-kind selection and outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTally {
    /// Times the catalog selected this kind.
    pub selected: u64,
    /// Successful submissions.
    pub success: u64,
    /// Skipped invocations.
    pub skip: u64,
    /// Failed invocations.
    pub error: u64,
}

/// One failed invocation, kept verbatim for triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Invocation index within the run.
    pub invocation: u64,
    /// Operation kind that failed.
    pub kind: String,
    /// Failing pipeline stage.
    pub stage: String,
    /// Error category code.
    pub category: String,
    /// Error rendering, preserved from the failing layer.
    pub detail: String,
}

/// Full result of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version.
    pub schema_version: String,
    /// The configuration the run executed with, seed included.
    pub config: SimConfig,
    /// RNG provenance.
    pub rng: RngSpec,
    /// Invocations executed.
    pub invocations: u64,
    /// Total successful submissions.
    pub success: u64,
    /// Total skipped invocations.
    pub skips: u64,
    /// Total failed invocations.
    pub errors: u64,
    /// Counts per operation kind, keyed by kind code.
    pub per_kind: BTreeMap<String, KindTally>,
    /// Counts per skip reason, keyed by reason code.
    pub skip_reasons: BTreeMap<String, u64>,
    /// Every failed invocation, in order.
    pub failures: Vec<FailureRecord>,
    /// Every invocation, in order.
    pub records: Vec<OutcomeRecord>,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// `false` when any failure was a data or submission error.
    pub ok: bool,
}

impl RunReport {
    /// Pretty-printed JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Internal`] if serialization fails.
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| SimError::internal(format!("serialize run report: {err}")))
    }

    /// The per-invocation records as one JSONL document.
    ///
    /// Two runs with the same seed, catalog, and starting state produce
    /// byte-identical JSONL, which is what the determinism tests compare.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Internal`] if serialization fails.
    pub fn records_jsonl(&self) -> SimResult<String> {
        let mut out = String::new();
        for record in &self.records {
            let line = serde_json::to_string(record)
                .map_err(|err| SimError::internal(format!("serialize outcome record: {err}")))?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Writes the pretty JSON rendering to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] on write failure.
    pub fn save_json(&self, path: &Path) -> SimResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a report back from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] on read failure and [`SimError::Data`] when
    /// the file does not deserialize as a report.
    pub fn load_json(path: &Path) -> SimResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| SimError::data("run report", err.to_string()))
    }
}

/// Drives a catalog against a service for a configured number of invocations.
#[derive(Debug)]
pub struct SimDriver {
    catalog: OperationCatalog,
    config: SimConfig,
}

impl SimDriver {
    /// Pairs a catalog with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration error when `config` is invalid. Setup
    /// problems abort here; they never show up as per-invocation skips.
    pub fn new(catalog: OperationCatalog, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// The validated run configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The catalog this driver selects from.
    #[must_use]
    pub const fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Executes the configured number of invocations and reports.
    ///
    /// Never aborts mid-run: every invocation collapses into a record, and
    /// errors are tallied rather than propagated.
    #[must_use]
    pub fn run(
        &self,
        query: &dyn StateQuery,
        keeper: &dyn AccountKeeper,
        submitter: &dyn TxSubmitter,
        accounts: &[SimAccount],
    ) -> RunReport {
        let started = Instant::now();
        let env = SimEnv {
            query,
            keeper,
            submitter,
            accounts,
            config: &self.config,
        };

        let mut records = Vec::new();
        let mut per_kind: BTreeMap<String, KindTally> = BTreeMap::new();
        let mut skip_reasons: BTreeMap<String, u64> = BTreeMap::new();
        let mut failures = Vec::new();
        let mut success = 0u64;
        let mut skips = 0u64;
        let mut errors = 0u64;
        let mut test_failures = 0u64;

        for invocation in 0..self.config.invocations {
            let stream = derive_invocation_seed(self.config.seed, invocation);
            let mut rng = StdRng::seed_from_u64(stream);
            let entry = self.catalog.select(&mut rng);
            let outcome = entry.run(&mut rng, &env);

            let kind = entry.kind();
            let tally = per_kind.entry(kind.to_owned()).or_default();
            tally.selected += 1;

            let record = match &outcome {
                Outcome::Success(operation) => {
                    success += 1;
                    tally.success += 1;
                    debug!(
                        invocation,
                        kind,
                        target = operation.target(),
                        "operation applied"
                    );
                    OutcomeRecord {
                        invocation,
                        kind: kind.to_owned(),
                        status: OutcomeStatus::Success,
                        reason: None,
                        stage: None,
                        detail: None,
                    }
                }
                Outcome::Skip(reason) => {
                    skips += 1;
                    tally.skip += 1;
                    *skip_reasons.entry(reason.as_str().to_owned()).or_insert(0) += 1;
                    debug!(
                        invocation,
                        kind,
                        reason = reason.as_str(),
                        "state does not admit operation"
                    );
                    OutcomeRecord {
                        invocation,
                        kind: kind.to_owned(),
                        status: OutcomeStatus::Skip,
                        reason: Some(reason.as_str().to_owned()),
                        stage: None,
                        detail: None,
                    }
                }
                Outcome::Error { stage, cause } => {
                    errors += 1;
                    tally.error += 1;
                    if cause.is_test_failure() {
                        test_failures += 1;
                    }
                    error!(
                        invocation,
                        kind,
                        stage = stage.as_str(),
                        category = cause.category(),
                        cause = %cause,
                        "invocation failed"
                    );
                    failures.push(FailureRecord {
                        invocation,
                        kind: kind.to_owned(),
                        stage: stage.as_str().to_owned(),
                        category: cause.category().to_owned(),
                        detail: cause.to_string(),
                    });
                    OutcomeRecord {
                        invocation,
                        kind: kind.to_owned(),
                        status: OutcomeStatus::Error,
                        reason: None,
                        stage: Some(stage.as_str().to_owned()),
                        detail: Some(cause.to_string()),
                    }
                }
            };
            records.push(record);
        }

        let ok = test_failures == 0;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            invocations = self.config.invocations,
            success, skips, errors, ok, "simulation run complete"
        );

        RunReport {
            schema_version: REPORT_SCHEMA_V1.to_owned(),
            config: self.config.clone(),
            rng: RngSpec::default(),
            invocations: self.config.invocations,
            success,
            skips,
            errors,
            per_kind,
            skip_reasons,
            failures,
            records,
            duration_ms,
            ok,
        }
    }
}
