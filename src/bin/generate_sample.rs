use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use car_dash::data::clean::clean;
use car_dash::data::loader;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    make: String,
    model: String,
    year: i64,
    engine: String,
    torque: String,
    horsepower: i64,
    price: f64,
}

fn main() {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // (make, model, engine size L, base torque lb-ft, base price USD)
    let lineup: Vec<(&str, &str, f64, f64, f64)> = vec![
        ("Audi", "A4", 2.0, 273.0, 42000.0),
        ("Audi", "Q5", 2.0, 273.0, 45000.0),
        ("Audi", "R8", 5.2, 413.0, 158600.0),
        ("BMW", "330i", 2.0, 295.0, 43800.0),
        ("BMW", "M4", 3.0, 406.0, 78100.0),
        ("Toyota", "Corolla", 1.8, 126.0, 21550.0),
        ("Toyota", "Supra", 3.0, 368.0, 43540.0),
        ("Honda", "Civic", 1.5, 192.0, 24650.0),
        ("Honda", "Accord", 1.5, 192.0, 27295.0),
        ("Ford", "Mustang GT", 5.0, 420.0, 42995.0),
        ("Ford", "F-150", 3.5, 500.0, 36570.0),
        ("Porsche", "911 Carrera", 3.0, 331.0, 106100.0),
        ("Chevrolet", "Corvette", 6.2, 470.0, 64500.0),
        ("Mazda", "MX-5", 2.0, 151.0, 28050.0),
    ];
    let years = [2019i64, 2020, 2021, 2022, 2023];

    let mut rows: Vec<Row> = Vec::new();

    for &(make, model, engine, torque, price) in &lineup {
        for &year in &years {
            // Newer model years creep up in output and price.
            let age = (year - 2019) as f64;
            let t = rng.gauss(torque * (1.0 + 0.01 * age), torque * 0.02);
            let p = rng.gauss(price * (1.0 + 0.03 * age), price * 0.015);
            let hp = (t * 1.15 + rng.gauss(0.0, 10.0)).round() as i64;

            rows.push(Row {
                make: make.to_string(),
                model: model.to_string(),
                year,
                engine: format!("{engine:.1}"),
                torque: format!("{:.0}", t.max(50.0)),
                horsepower: hp.max(60),
                price: (p.max(15000.0) * 100.0).round() / 100.0,
            });
        }
    }

    // Electric and malformed entries: torque / engine size that will not
    // coerce to numbers, so cleaning has rows to drop.
    for (make, model, year, hp, price) in [
        ("Tesla", "Model 3", 2022i64, 271i64, 40240.0),
        ("Tesla", "Model S Plaid", 2023, 1020, 108490.0),
        ("Nissan", "Leaf", 2021, 147, 28040.0),
    ] {
        rows.push(Row {
            make: make.to_string(),
            model: model.to_string(),
            year,
            engine: "Electric".to_string(),
            torque: "-".to_string(),
            horsepower: hp,
            price,
        });
    }
    rows.push(Row {
        make: "Lancia".to_string(),
        model: "Delta Integrale".to_string(),
        year: 2019,
        engine: "2.0".to_string(),
        torque: "N/A".to_string(),
        horsepower: 212,
        price: 65000.0,
    });

    write_csv(&rows, "carprices.csv");
    write_parquet(&rows, "carprices.parquet");

    // Read the CSV back through the pipeline to confirm it is loadable.
    let dataset = loader::load_file(Path::new("carprices.csv"), loader::DEFAULT_MAX_ROWS)
        .expect("Failed to re-read generated CSV");
    let cleaned = clean(&dataset);
    log::info!(
        "re-read carprices.csv: {} rows, {} survive cleaning",
        dataset.len(),
        cleaned.len()
    );

    println!(
        "Wrote {} cars to carprices.csv and carprices.parquet",
        rows.len()
    );
}

/// Headers are deliberately mixed-case: loading normalizes them to lowercase.
const HEADERS: [&str; 7] = [
    "Car Make",
    "Car Model",
    "Year",
    "Engine Size (L)",
    "Torque (lb-ft)",
    "Horsepower",
    "Price (in USD)",
];

fn write_csv(rows: &[Row], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer.write_record(HEADERS).expect("Failed to write CSV header");
    for row in rows {
        let year = row.year.to_string();
        let horsepower = row.horsepower.to_string();
        let price = row.price.to_string();
        writer
            .write_record([
                row.make.as_str(),
                row.model.as_str(),
                year.as_str(),
                row.engine.as_str(),
                row.torque.as_str(),
                horsepower.as_str(),
                price.as_str(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

fn write_parquet(rows: &[Row], path: &str) {
    let make_array = StringArray::from(rows.iter().map(|r| r.make.as_str()).collect::<Vec<_>>());
    let model_array = StringArray::from(rows.iter().map(|r| r.model.as_str()).collect::<Vec<_>>());
    let year_array = Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>());
    // Engine size and torque stay textual: the mixed entries ("Electric",
    // "-", "N/A") make them object columns, exactly what cleaning expects.
    let engine_array =
        StringArray::from(rows.iter().map(|r| r.engine.as_str()).collect::<Vec<_>>());
    let torque_array =
        StringArray::from(rows.iter().map(|r| r.torque.as_str()).collect::<Vec<_>>());
    let hp_array = Int64Array::from(rows.iter().map(|r| r.horsepower).collect::<Vec<_>>());
    let price_array = Float64Array::from(rows.iter().map(|r| r.price).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("Car Make", DataType::Utf8, false),
        Field::new("Car Model", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Engine Size (L)", DataType::Utf8, false),
        Field::new("Torque (lb-ft)", DataType::Utf8, false),
        Field::new("Horsepower", DataType::Int64, false),
        Field::new("Price (in USD)", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(make_array),
            Arc::new(model_array),
            Arc::new(year_array),
            Arc::new(engine_array),
            Arc::new(torque_array),
            Arc::new(hp_array),
            Arc::new(price_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
