//! Example prediction client
//!
//! Sends the two reference feature records to a running `clf-api serve`
//! instance and prints the parsed responses. Pass a base URL as the first
//! argument to target a non-default host/port.
//!
//! Equivalent curl invocation:
//! curl -d '{"sepal.lenght": 5.1, "sepal.width": 3.5, "petal.lenght": 1.4, "petal.width": 0.2}' \
//!      -H "Content-Type: application/json" -X POST http://127.0.0.1:8080/predict

use clf_api::server::{FeatureRecord, PredictResponse};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());

    let client = reqwest::blocking::Client::new();

    let settings = client.get(format!("{base_url}/settings")).send()?.text()?;
    println!("{settings}");

    let records = [
        // A setosa sample, expected class 0
        FeatureRecord {
            sepal_length: 5.1,
            sepal_width: 3.5,
            petal_length: 1.4,
            petal_width: 0.2,
        },
        // A virginica sample, expected class 2
        FeatureRecord {
            sepal_length: 5.9,
            sepal_width: 3.0,
            petal_length: 5.1,
            petal_width: 1.8,
        },
    ];

    for record in &records {
        let response: PredictResponse = client
            .post(format!("{base_url}/predict"))
            .json(record)
            .send()?
            .error_for_status()?
            .json()?;

        println!("{record:?} -> target value {}", response.target_value);
    }

    Ok(())
}
