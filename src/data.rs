//! Sales data handling: the validated yearly series and the tabular
//! extractors that feed forecasting and alerting

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Column holding the calendar year of each sales record
pub const YEAR_COLUMN: &str = "Year";
/// Column holding the model name of each sales record
pub const MODEL_COLUMN: &str = "Model";
/// Column holding the region name of each sales record
pub const REGION_COLUMN: &str = "Region";
/// Column holding the unit volume of each sales record
pub const VOLUME_COLUMN: &str = "Sales_Volume";

const TOTAL_COLUMN: &str = "Total_Sales";

/// An ordered yearly sales series: (year, value) pairs with strictly
/// increasing years. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl SalesSeries {
    /// Create a new series, validating ordering
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Result<Self> {
        if years.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Years length ({}) doesn't match values length ({})",
                years.len(),
                values.len()
            )));
        }

        if !years.windows(2).all(|w| w[0] < w[1]) {
            return Err(ForecastError::DataError(
                "Years must be strictly increasing".to_string(),
            ));
        }

        Ok(Self { years, values })
    }

    /// Get the years
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Get the values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Get the last year, if any
    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Get the last value, if any
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Calculate the mean of the values
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }

        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Get a sub-series from start to end index (end clamped to the length)
    pub fn slice(&self, start: usize, end: Option<usize>) -> SalesSeries {
        let end = end.unwrap_or(self.years.len()).min(self.years.len());
        let start = start.min(end);

        SalesSeries {
            years: self.years[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        }
    }
}

/// Data loader for tabular sales data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load sales data from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesData> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        SalesData::from_dataframe(df)
    }
}

/// Cleaned per-record sales data with the aggregations the forecast
/// engine and alert evaluator consume
#[derive(Debug, Clone)]
pub struct SalesData {
    df: DataFrame,
}

impl SalesData {
    /// Create sales data from an existing DataFrame, validating the schema
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        for column in [YEAR_COLUMN, MODEL_COLUMN, REGION_COLUMN, VOLUME_COLUMN] {
            if df.column(column).is_err() {
                return Err(ForecastError::DataError(format!(
                    "Column '{}' not found in sales data",
                    column
                )));
            }
        }

        Ok(Self { df })
    }

    /// Get the underlying DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Number of sales records
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Total sales volume per year, in year order
    pub fn yearly_totals(&self) -> Result<SalesSeries> {
        let totals = self
            .df
            .clone()
            .lazy()
            .groupby([col(YEAR_COLUMN)])
            .agg([col(VOLUME_COLUMN).sum().alias(TOTAL_COLUMN)])
            .sort(YEAR_COLUMN, Default::default())
            .collect()?;

        SalesSeries::new(
            column_as_years(&totals, YEAR_COLUMN)?,
            column_as_f64(&totals, TOTAL_COLUMN)?,
        )
    }

    /// Names of the top `n` models by total sales volume
    pub fn top_models(&self, n: usize) -> Result<Vec<String>> {
        let totals = self
            .df
            .clone()
            .lazy()
            .groupby([col(MODEL_COLUMN)])
            .agg([col(VOLUME_COLUMN).sum().alias(TOTAL_COLUMN)])
            .sort(
                TOTAL_COLUMN,
                SortOptions {
                    descending: true,
                    ..Default::default()
                },
            )
            .collect()?;

        let names = totals.column(MODEL_COLUMN)?.utf8().map_err(|e| {
            ForecastError::DataError(format!("Column '{}' is not textual: {}", MODEL_COLUMN, e))
        })?;

        Ok(names
            .into_iter()
            .flatten()
            .take(n)
            .map(String::from)
            .collect())
    }

    /// Yearly sales series for one model
    pub fn model_series(&self, name: &str) -> Result<SalesSeries> {
        self.entity_yearly(MODEL_COLUMN, name)
    }

    /// Yearly sales series for one region
    pub fn region_series(&self, name: &str) -> Result<SalesSeries> {
        self.entity_yearly(REGION_COLUMN, name)
    }

    /// Per-model yearly sales histories, in year order
    pub fn model_history(&self, models: &[String]) -> Result<BTreeMap<String, Vec<f64>>> {
        let mut history = BTreeMap::new();
        for name in models {
            let series = self.entity_yearly(MODEL_COLUMN, name)?;
            history.insert(name.clone(), series.values().to_vec());
        }

        Ok(history)
    }

    /// Per-region sales volume for the most recent year
    pub fn region_latest(&self) -> Result<BTreeMap<String, f64>> {
        let latest = self.latest_year()?;
        let totals = self
            .df
            .clone()
            .lazy()
            .filter(col(YEAR_COLUMN).eq(lit(latest)))
            .groupby([col(REGION_COLUMN)])
            .agg([col(VOLUME_COLUMN).sum().alias(TOTAL_COLUMN)])
            .collect()?;

        let names = totals.column(REGION_COLUMN)?.utf8().map_err(|e| {
            ForecastError::DataError(format!("Column '{}' is not textual: {}", REGION_COLUMN, e))
        })?;
        let values = column_as_f64(&totals, TOTAL_COLUMN)?;

        Ok(names
            .into_iter()
            .flatten()
            .map(String::from)
            .zip(values)
            .collect())
    }

    /// The most recent year present in the data
    pub fn latest_year(&self) -> Result<i32> {
        let years = column_as_years(&self.df, YEAR_COLUMN)?;
        years
            .into_iter()
            .max()
            .ok_or_else(|| ForecastError::DataError("No sales records present".to_string()))
    }

    /// All distinct region names
    pub fn regions(&self) -> Result<Vec<String>> {
        let unique = self.df.column(REGION_COLUMN)?.unique()?;
        let names = unique.utf8().map_err(|e| {
            ForecastError::DataError(format!("Column '{}' is not textual: {}", REGION_COLUMN, e))
        })?;

        let mut regions: Vec<String> = names.into_iter().flatten().map(String::from).collect();
        regions.sort();
        Ok(regions)
    }

    /// Mean of the yearly sales totals
    pub fn mean_yearly_total(&self) -> Result<f64> {
        self.yearly_totals()?
            .mean()
            .ok_or_else(|| ForecastError::DataError("No sales records present".to_string()))
    }

    /// Mean per-record volume for one model
    pub fn mean_volume_by_model(&self, name: &str) -> Result<f64> {
        self.mean_volume(MODEL_COLUMN, name)
    }

    /// Mean per-record volume for one region
    pub fn mean_volume_by_region(&self, name: &str) -> Result<f64> {
        self.mean_volume(REGION_COLUMN, name)
    }

    fn mean_volume(&self, column: &'static str, name: &str) -> Result<f64> {
        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(col(column).eq(lit(name)))
            .collect()?;

        let volumes = column_as_f64(&filtered, VOLUME_COLUMN)?;
        if volumes.is_empty() {
            return Err(ForecastError::DataError(format!(
                "No records for {} '{}'",
                column, name
            )));
        }

        Ok(volumes.iter().sum::<f64>() / volumes.len() as f64)
    }

    fn entity_yearly(&self, column: &'static str, name: &str) -> Result<SalesSeries> {
        let totals = self
            .df
            .clone()
            .lazy()
            .filter(col(column).eq(lit(name)))
            .groupby([col(YEAR_COLUMN)])
            .agg([col(VOLUME_COLUMN).sum().alias(TOTAL_COLUMN)])
            .sort(YEAR_COLUMN, Default::default())
            .collect()?;

        SalesSeries::new(
            column_as_years(&totals, YEAR_COLUMN)?,
            column_as_f64(&totals, TOTAL_COLUMN)?,
        )
    }
}

/// Read a column as f64 values
fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df
        .column(name)
        .map_err(|e| ForecastError::DataError(format!("Column '{}' not found: {}", name, e)))?;

    match col.dtype() {
        DataType::Float64 => Ok(col.f64().unwrap().into_iter().flatten().collect()),
        DataType::Float32 => Ok(col
            .f32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int64 => Ok(col
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        DataType::Int32 => Ok(col
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as f64)
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            name
        ))),
    }
}

/// Read a column of calendar years as i32 values
fn column_as_years(df: &DataFrame, name: &str) -> Result<Vec<i32>> {
    let col = df
        .column(name)
        .map_err(|e| ForecastError::DataError(format!("Column '{}' not found: {}", name, e)))?;

    match col.dtype() {
        DataType::Int64 => Ok(col
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .map(|v| v as i32)
            .collect()),
        DataType::Int32 => Ok(col.i32().unwrap().into_iter().flatten().collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to years",
            name
        ))),
    }
}
