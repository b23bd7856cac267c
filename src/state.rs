use crate::data::clean::clean;
use crate::data::error::DataError;
use crate::data::filter::{distinct_values, filter_by_equality, filter_by_range};
use crate::data::model::{CellValue, Dataset};

const TORQUE: &str = "torque (lb-ft)";
const ENGINE: &str = "engine size (l)";
const MAKE: &str = "car make";

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Explicit per-session dashboard state, independent of rendering: the loaded
/// dataset, the current widget selections, and the cached filtered views each
/// chart reads. One instance per session; nothing is shared across sessions.
#[derive(Default)]
pub struct SessionState {
    /// Dataset as loaded, before cleaning (shown by the raw-data toggle).
    raw: Option<Dataset>,

    /// Cleaned dataset every filter runs against (cached per session).
    data: Option<Dataset>,

    /// Raw-data toggle.
    pub show_raw: bool,

    /// Full torque / engine size extents, used as slider endpoints.
    torque_bounds: (f64, f64),
    engine_bounds: (f64, f64),

    /// Current slider selections.
    torque_range: (f64, f64),
    engine_range: (f64, f64),

    /// Current dropdown selection and its option list.
    selected_make: Option<CellValue>,
    make_options: Vec<CellValue>,

    /// Cached views: bar chart (torque range), box plot (price per make),
    /// histogram (engine size range).
    torque_view: Option<Dataset>,
    price_view: Option<Dataset>,
    engine_view: Option<Dataset>,
}

impl SessionState {
    /// Ingest a newly loaded dataset: clean it, seed both ranges with the
    /// full column extents, default the make selection to the first distinct
    /// make, and compute all three views.
    pub fn set_dataset(&mut self, raw: Dataset) -> Result<(), DataError> {
        let data = clean(&raw);
        log::info!(
            "ingested {} records ({} after cleaning), columns {:?}",
            raw.len(),
            data.len(),
            data.columns
        );

        let torque_bounds = data.numeric_extent(TORQUE)?.unwrap_or((0.0, 0.0));
        let engine_bounds = data.numeric_extent(ENGINE)?.unwrap_or((0.0, 0.0));
        let make_options = distinct_values(&data, MAKE)?;
        let selected_make = make_options.first().cloned();

        self.torque_view = Some(filter_by_range(
            &data,
            TORQUE,
            torque_bounds.0,
            torque_bounds.1,
        )?);
        self.engine_view = Some(filter_by_range(
            &data,
            ENGINE,
            engine_bounds.0,
            engine_bounds.1,
        )?);
        self.price_view = Some(match &selected_make {
            Some(make) => filter_by_equality(&data, MAKE, make)?,
            None => data.with_records(Vec::new()),
        });

        self.torque_bounds = torque_bounds;
        self.engine_bounds = engine_bounds;
        self.torque_range = torque_bounds;
        self.engine_range = engine_bounds;
        self.selected_make = selected_make;
        self.make_options = make_options;
        self.raw = Some(raw);
        self.data = Some(data);
        Ok(())
    }

    /// Move the torque slider. State is untouched when the range is invalid.
    pub fn set_torque_range(&mut self, low: f64, high: f64) -> Result<(), DataError> {
        if low > high {
            return Err(DataError::InvalidRange { low, high });
        }
        if let Some(data) = &self.data {
            self.torque_view = Some(filter_by_range(data, TORQUE, low, high)?);
        }
        self.torque_range = (low, high);
        Ok(())
    }

    /// Move the engine size slider.
    pub fn set_engine_range(&mut self, low: f64, high: f64) -> Result<(), DataError> {
        if low > high {
            return Err(DataError::InvalidRange { low, high });
        }
        if let Some(data) = &self.data {
            self.engine_view = Some(filter_by_range(data, ENGINE, low, high)?);
        }
        self.engine_range = (low, high);
        Ok(())
    }

    /// Pick a make in the dropdown.
    pub fn set_selected_make(&mut self, make: CellValue) -> Result<(), DataError> {
        if let Some(data) = &self.data {
            self.price_view = Some(filter_by_equality(data, MAKE, &make)?);
        }
        self.selected_make = Some(make);
        Ok(())
    }

    // -- Accessors the presentation layer reads --

    /// Dataset as loaded, before cleaning.
    pub fn raw_data(&self) -> Option<&Dataset> {
        self.raw.as_ref()
    }

    /// Cleaned dataset.
    pub fn data(&self) -> Option<&Dataset> {
        self.data.as_ref()
    }

    /// View behind the torque bar chart.
    pub fn torque_view(&self) -> Option<&Dataset> {
        self.torque_view.as_ref()
    }

    /// View behind the price-per-make box plot.
    pub fn price_view(&self) -> Option<&Dataset> {
        self.price_view.as_ref()
    }

    /// View behind the engine size histogram.
    pub fn engine_view(&self) -> Option<&Dataset> {
        self.engine_view.as_ref()
    }

    pub fn torque_bounds(&self) -> (f64, f64) {
        self.torque_bounds
    }

    pub fn engine_bounds(&self) -> (f64, f64) {
        self.engine_bounds
    }

    pub fn torque_range(&self) -> (f64, f64) {
        self.torque_range
    }

    pub fn engine_range(&self) -> (f64, f64) {
        self.engine_range
    }

    pub fn selected_make(&self) -> Option<&CellValue> {
        self.selected_make.as_ref()
    }

    /// Dropdown options: distinct makes in first-seen order.
    pub fn make_options(&self) -> &[CellValue] {
        &self.make_options
    }
}
