use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use super::{sales_array, SalesSource};
use crate::error::Result;

/// Sales exported from the backend's listing endpoint into a JSON file.
pub struct FileSalesSource {
    path: PathBuf,
}

impl FileSalesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SalesSource for FileSalesSource {
    fn fetch_sales(&self) -> Result<Vec<Value>> {
        let body = fs::read_to_string(&self.path)?;
        sales_array(&body, &self.describe())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
