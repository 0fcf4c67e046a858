// src/dashboard/mod.rs
//! The presentation layer: owns the widget handles, calls into the core, and
//! decides which failures the user gets to see.
//!
//! Only input the user can fix (an incomplete comparison, a refused location
//! request) produces a message. Data-layer failures leave the view empty and
//! are reported through `tracing` only.

pub mod views;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use tracing::{debug, info, warn};

pub use views::{Coordinates, DashboardView, FixedLocator, Geolocator, MapView};

use crate::compare::ComparisonResolver;
use crate::error::{FetchError, GeoError, ResolutionError};
use crate::present::{to_chart_series, to_comparison_series, to_list_items, to_options};
use crate::project::{project, DEFAULT_LIMIT};
use crate::record::{AliasTable, RecordSet};
use crate::store::RecordSource;

pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 20.5937,
    lon: 78.9629,
};
pub const DEFAULT_ZOOM: u8 = 5;
pub const LOCATE_ZOOM: u8 = 10;
pub const HERE_POPUP: &str = "You are here!";
pub const MISSING_SELECTION_PROMPT: &str = "Select two districts!";
pub const LOCATION_DENIED_PROMPT: &str = "Location access denied.";
pub const LOCATION_UNSUPPORTED_PROMPT: &str = "Geolocation not supported.";

/// Observable dashboard state. Failures return to `Idle` or `Loaded`; there is no error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
}

/// What an interaction ended up doing to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    /// Fetch failed, name unresolved, or set empty; the view shows nothing new.
    NoData,
    /// A newer request of the same kind started while this one was in flight.
    Superseded,
    /// Empty selection; nothing was fetched.
    Ignored,
    /// The user was shown a message.
    Prompted,
}

#[derive(Debug)]
struct PhaseState {
    phase: Phase,
    in_flight: usize,
    loaded_once: bool,
}

pub struct Dashboard<S> {
    source: S,
    aliases: AliasTable,
    limit: usize,
    resolver: ComparisonResolver,
    view: Arc<dyn DashboardView>,
    map: Arc<dyn MapView>,
    locator: Arc<dyn Geolocator>,
    state: Mutex<PhaseState>,
    detail_gen: AtomicU64,
    compare_gen: AtomicU64,
}

impl<S: RecordSource> Dashboard<S> {
    pub fn new(
        source: S,
        view: Arc<dyn DashboardView>,
        map: Arc<dyn MapView>,
        locator: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            source,
            aliases: AliasTable::default(),
            limit: DEFAULT_LIMIT,
            resolver: ComparisonResolver::default(),
            view,
            map,
            locator,
            state: Mutex::new(PhaseState {
                phase: Phase::Idle,
                in_flight: 0,
                loaded_once: false,
            }),
            detail_gen: AtomicU64::new(0),
            compare_gen: AtomicU64::new(0),
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.resolver = ComparisonResolver::new(aliases.clone(), self.limit);
        self.aliases = aliases;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self.resolver = ComparisonResolver::new(self.aliases.clone(), limit);
        self
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).phase
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Initial map view, then populate the selectors.
    pub async fn start(&self) -> Outcome {
        self.map.center(DEFAULT_CENTER, DEFAULT_ZOOM);
        self.load_regions().await
    }

    /// Fill every selector from a fresh fetch. On failure the selectors keep
    /// only their placeholder.
    pub async fn load_regions(&self) -> Outcome {
        match self.fetch().await {
            Ok(records) => {
                info!(count = records.len(), "populating region selectors");
                self.view.show_options(&to_options(&self.aliases, &records));
                if records.is_empty() {
                    Outcome::NoData
                } else {
                    Outcome::Rendered
                }
            }
            Err(e) => {
                warn!(error = %e, "region list unavailable");
                self.view
                    .show_options(&to_options(&self.aliases, &RecordSet::empty()));
                Outcome::NoData
            }
        }
    }

    /// Show the detail panel for `name`.
    pub async fn select_region(&self, name: &str) -> Outcome {
        if name.is_empty() {
            return Outcome::Ignored;
        }
        let gen = self.detail_gen.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.hide_detail();

        let result = self.fetch().await;
        if self.detail_gen.load(Ordering::SeqCst) != gen {
            debug!(name, gen, "dropping superseded detail response");
            return Outcome::Superseded;
        }

        let records = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(name, error = %e, "detail fetch failed");
                return Outcome::NoData;
            }
        };
        let Some(record) = self.aliases.find(&records, name) else {
            debug!(name, "selected region not in fetched set");
            return Outcome::NoData;
        };

        let items = to_list_items(record);
        let values = project(record, self.limit);
        let chart = (!values.is_empty()).then(|| to_chart_series(&values).into_payload());
        self.view
            .show_detail(&self.aliases.display_name(record), &items, chart.as_ref());
        Outcome::Rendered
    }

    /// Compare two regions side by side.
    ///
    /// An incomplete selection prompts the user without fetching and leaves
    /// any comparison already in flight alone.
    pub async fn compare_regions(&self, first: &str, second: &str) -> Outcome {
        if first.is_empty() || second.is_empty() {
            self.view.notify(MISSING_SELECTION_PROMPT);
            return Outcome::Prompted;
        }
        let gen = self.compare_gen.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self
            .resolver
            .compare(&Tracked(self), first, second)
            .await;
        match result {
            Err(ResolutionError::MissingSelection) => {
                self.view.notify(MISSING_SELECTION_PROMPT);
                Outcome::Prompted
            }
            _ if self.compare_gen.load(Ordering::SeqCst) != gen => {
                debug!(first, second, gen, "dropping superseded comparison");
                Outcome::Superseded
            }
            Ok(cmp) => {
                self.view
                    .show_comparison(&to_comparison_series(&cmp).into_payload());
                Outcome::Rendered
            }
            Err(ResolutionError::NotFound { which, name }) => {
                debug!(?which, %name, "comparison region not in fetched set");
                Outcome::NoData
            }
            Err(ResolutionError::Fetch(e)) => {
                warn!(error = %e, "comparison fetch failed");
                Outcome::NoData
            }
        }
    }

    /// Recenter the map on the user's position.
    pub fn locate(&self) -> Outcome {
        match self.locator.current_position() {
            Ok(at) => {
                self.map.center(at, LOCATE_ZOOM);
                self.map.place_marker(at, HERE_POPUP);
                Outcome::Rendered
            }
            Err(e) => {
                info!(error = %e, "geolocation unavailable");
                self.view.notify(match e {
                    GeoError::PermissionDenied => LOCATION_DENIED_PROMPT,
                    GeoError::Unsupported => LOCATION_UNSUPPORTED_PROMPT,
                });
                Outcome::Prompted
            }
        }
    }

    /// Fetch through the source, keeping the phase and spinner in step.
    /// Overlapping calls are not merged; each performs its own fetch.
    async fn fetch(&self) -> Result<RecordSet, FetchError> {
        self.begin_fetch();
        let result = self.source.fetch_all().await;
        self.end_fetch(result.is_ok());
        result
    }

    fn begin_fetch(&self) {
        let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.in_flight += 1;
        st.phase = Phase::Loading;
        drop(st);
        self.view.set_loading(true);
    }

    fn end_fetch(&self, ok: bool) {
        let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        st.in_flight = st.in_flight.saturating_sub(1);
        st.loaded_once |= ok;
        if st.in_flight > 0 {
            return;
        }
        st.phase = if st.loaded_once {
            Phase::Loaded
        } else {
            Phase::Idle
        };
        drop(st);
        self.view.set_loading(false);
    }
}

/// Routes the resolver's fetch through the dashboard's phase tracking.
struct Tracked<'a, S>(&'a Dashboard<S>);

impl<S: RecordSource> RecordSource for Tracked<'_, S> {
    async fn fetch_all(&self) -> Result<RecordSet, FetchError> {
        self.0.fetch().await
    }
}
