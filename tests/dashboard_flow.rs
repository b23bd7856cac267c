//! End-to-end flow a dashboard session goes through: load a CSV once, ingest
//! it into session state, then answer widget interactions with derived views.

use std::fs;

use car_dash::data::loader::{self, DEFAULT_MAX_ROWS};
use car_dash::{CellValue, SessionState};
use tempfile::TempDir;

const CARPRICES_CSV: &str = "\
Car Make,Car Model,Engine Size (L),Torque (lb-ft),Price (in USD)
Audi,A4,2.0,273,42000
Audi,R8,5.2,413,158600
BMW,M4,3.0,406,78100
Toyota,Supra,3.0,368,43540
Toyota,Corolla,1.8,126,21550
Tesla,Model 3,Electric,-,40240
Lancia,Delta Integrale,2.0,N/A,65000
";

#[test]
fn load_ingest_and_filter_drive_the_three_charts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("carprices.csv");
    fs::write(&path, CARPRICES_CSV).unwrap();

    let dataset = loader::load_file(&path, DEFAULT_MAX_ROWS).unwrap();
    assert_eq!(dataset.len(), 7);

    let mut session = SessionState::default();
    session.set_dataset(dataset).unwrap();

    // The EV and the row with unreadable torque are gone after cleaning; the
    // raw view still has them for the raw-data toggle.
    assert_eq!(session.raw_data().unwrap().len(), 7);
    assert_eq!(session.data().unwrap().len(), 5);

    // Sliders start at the full extents, so every chart shows everything.
    assert_eq!(session.torque_bounds(), (126.0, 413.0));
    assert_eq!(session.torque_view().unwrap().len(), 5);
    assert_eq!(session.engine_view().unwrap().len(), 5);

    // Bar chart: narrow the torque slider.
    session.set_torque_range(300.0, 413.0).unwrap();
    let models: Vec<String> = session
        .torque_view()
        .unwrap()
        .records
        .iter()
        .map(|r| r.get("car model").unwrap().to_string())
        .collect();
    assert_eq!(models, vec!["R8", "M4", "Supra"]);

    // Box plot: pick a make in the dropdown.
    session
        .set_selected_make(CellValue::String("Toyota".into()))
        .unwrap();
    let prices: Vec<f64> = session
        .price_view()
        .unwrap()
        .records
        .iter()
        .map(|r| r.numeric("price (in usd)").unwrap())
        .collect();
    assert_eq!(prices, vec![43540.0, 21550.0]);

    // Histogram: narrow the engine size slider.
    session.set_engine_range(1.8, 2.0).unwrap();
    assert_eq!(session.engine_view().unwrap().len(), 2);

    // The base dataset never shrinks as views change.
    assert_eq!(session.data().unwrap().len(), 5);
}
