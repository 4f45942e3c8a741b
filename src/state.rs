use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::data::filter::{filter, FilterSpec};
use crate::data::handle::DatasetHandle;
use crate::data::model::{Column, Dataset, Disease, EnvFactor, Month};
use crate::stats::correlation::{correlation_matrix, trendline, CorrelationMatrix, Trendline};
use crate::stats::metrics::{summarize, SummaryMetrics};
use crate::stats::series::{scatter, time_series};
use crate::stats::Estimate;

// ---------------------------------------------------------------------------
// Selection – everything the user can choose
// ---------------------------------------------------------------------------

/// Current user choices. Passed by value into every computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub filter: FilterSpec,
    pub disease: Disease,
    pub env_factor: EnvFactor,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            filter: FilterSpec::default(),
            disease: Disease::Asthma,
            env_factor: EnvFactor::Pm25Avg,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot – one recomputation pass
// ---------------------------------------------------------------------------

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Increases with every recomputation; the highest one is current.
    pub generation: u64,
    pub selection: Selection,
    /// Dataset positions of the visible rows.
    pub indices: Vec<usize>,
    pub disease: SummaryMetrics,
    pub env: SummaryMetrics,
    pub trend: Vec<(NaiveDate, f64)>,
    pub scatter: Vec<(f64, f64)>,
    pub fit: Estimate<Trendline>,
    pub matrix: Estimate<CorrelationMatrix>,
}

impl Snapshot {
    pub fn rows(&self) -> usize {
        self.indices.len()
    }
}

/// Filter the dataset and compute every statistic for `selection`.
pub fn compute_snapshot(dataset: &Dataset, selection: Selection, generation: u64) -> Snapshot {
    let view = filter(dataset, &selection.filter);
    let disease = Column::Disease(selection.disease);
    let env = Column::Env(selection.env_factor);

    Snapshot {
        generation,
        selection,
        indices: view.indices().to_vec(),
        disease: summarize(&view, disease),
        env: summarize(&view, env),
        trend: time_series(&view, disease),
        scatter: scatter(&view, env, disease),
        fit: trendline(&view, env, disease),
        matrix: correlation_matrix(&view),
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None when loading failed).
    pub handle: Option<DatasetHandle>,

    /// What the user has selected.
    pub selection: Selection,

    /// Results for `selection` (None until a dataset is loaded).
    pub snapshot: Option<Snapshot>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Selection::default())
    }
}

impl AppState {
    pub fn new(selection: Selection) -> Self {
        Self {
            handle: None,
            selection,
            snapshot: None,
            status_message: None,
            generation: 0,
        }
    }

    /// Current dataset, if one is loaded.
    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.handle.as_ref().map(DatasetHandle::dataset)
    }

    /// Years available in the year selector, newest first.
    pub fn years(&self) -> Vec<i32> {
        self.dataset().map(|ds| ds.years()).unwrap_or_default()
    }

    /// Install a freshly opened dataset and compute the dashboard for it.
    pub fn set_handle(&mut self, handle: DatasetHandle) {
        let ds = handle.dataset();
        if ds.is_empty() {
            log::warn!("{} contains no data rows", handle.path().display());
        }
        self.status_message = load_summary(&ds);
        self.handle = Some(handle);
        self.recompute();
    }

    /// Open a data file. On failure the message is shown and nothing is
    /// computed.
    pub fn open(&mut self, path: &Path) {
        match DatasetHandle::open(path) {
            Ok(handle) => self.set_handle(handle),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.handle = None;
                self.snapshot = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current file. A failed reload keeps the old data.
    pub fn reload(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        match handle.reload() {
            Ok(()) => {
                log::info!("Reloaded {}", handle.path().display());
                self.status_message = load_summary(&handle.dataset());
                self.recompute();
            }
            Err(e) => {
                log::error!("Reload failed: {e}");
                self.status_message = Some(format!("Reload failed, showing previous data: {e}"));
            }
        }
    }

    pub fn set_year(&mut self, year: Option<i32>) {
        self.update(|s| s.filter.year = year);
    }

    pub fn set_month(&mut self, month: Option<Month>) {
        self.update(|s| s.filter.month = month);
    }

    pub fn set_disease(&mut self, disease: Disease) {
        self.update(|s| s.disease = disease);
    }

    pub fn set_env_factor(&mut self, env_factor: EnvFactor) {
        self.update(|s| s.env_factor = env_factor);
    }

    fn update(&mut self, change: impl FnOnce(&mut Selection)) {
        let before = self.selection;
        change(&mut self.selection);
        if self.selection != before {
            self.recompute();
        }
    }

    /// Replace the snapshot with one for the current selection.
    pub fn recompute(&mut self) {
        let Some(ds) = self.dataset() else {
            self.snapshot = None;
            return;
        };
        self.generation += 1;
        let snapshot = compute_snapshot(&ds, self.selection, self.generation);
        log::debug!(
            "Recomputed generation {} ({}): {} rows, correlation matrix {}",
            snapshot.generation,
            snapshot.selection.filter,
            snapshot.rows(),
            if snapshot.matrix.is_available() { "ready" } else { "unavailable" }
        );
        self.accept(snapshot);
    }

    /// Keep `snapshot` unless a newer one is already in place.
    pub fn accept(&mut self, snapshot: Snapshot) {
        let stale = self
            .snapshot
            .as_ref()
            .is_some_and(|current| current.generation > snapshot.generation);
        if stale {
            log::debug!("Dropping stale generation {}", snapshot.generation);
            return;
        }
        self.snapshot = Some(snapshot);
    }
}

fn load_summary(ds: &Dataset) -> Option<String> {
    let undated = ds.undated_rows();
    (!ds.warnings.is_empty()).then(|| {
        format!(
            "{} cells could not be parsed ({undated} rows without a valid date)",
            ds.warnings.len()
        )
    })
}
