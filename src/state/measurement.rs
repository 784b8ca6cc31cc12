/// Cleaned numeric readings from one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    pub source_name: String,
    pub values: Vec<f64>,
}

impl MeasurementSeries {
    pub fn new(source_name: String, values: Vec<f64>) -> Self {
        Self { source_name, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
