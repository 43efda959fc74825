pub mod influxdb;

// A single backend value
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub field: String,
    pub value: f64,
    pub tags: Vec<(String, String)>,
}
