use polars::prelude::*;

pub const VENDOR_ID: &str = "vendorid";
pub const PICKUP_DATETIME: &str = "pickup_datetime";
pub const DROPOFF_DATETIME: &str = "dropoff_datetime";
pub const PASSENGER_COUNT: &str = "passenger_count";
pub const TRIP_DISTANCE: &str = "trip_distance";
pub const FARE_AMOUNT: &str = "fare_amount";
pub const PICKUP_LOCATION_ID: &str = "pickup_location_id";
pub const DROPOFF_LOCATION_ID: &str = "dropoff_location_id";
pub const PAYMENT_TYPE: &str = "payment_type";
pub const EXTRACTED_AT: &str = "extracted_at";
pub const TAXI_TYPE: &str = "taxi_type";

/// Unit used for every temporal column this crate produces.
pub const TIME_UNIT: TimeUnit = TimeUnit::Microseconds;

/// Naive (UTC) microsecond datetime.
pub fn datetime_dtype() -> DataType {
    DataType::Datetime(TIME_UNIT, None)
}

/// Column contracts for trip tables
pub struct TripSchema;

impl TripSchema {
    /// The canonical output schema. Types apply to null-filled columns; columns
    /// carried over from source files keep their source type.
    pub fn canonical() -> Schema {
        Schema::from_iter(vec![
            Field::new(VENDOR_ID.into(), DataType::Int64),
            Field::new(PICKUP_DATETIME.into(), datetime_dtype()),
            Field::new(DROPOFF_DATETIME.into(), datetime_dtype()),
            Field::new(PASSENGER_COUNT.into(), DataType::Float64),
            Field::new(TRIP_DISTANCE.into(), DataType::Float64),
            Field::new(FARE_AMOUNT.into(), DataType::Float64),
            Field::new(PICKUP_LOCATION_ID.into(), DataType::Int64),
            Field::new(DROPOFF_LOCATION_ID.into(), DataType::Int64),
            Field::new(PAYMENT_TYPE.into(), DataType::Int64),
            Field::new(EXTRACTED_AT.into(), datetime_dtype()),
            Field::new(TAXI_TYPE.into(), DataType::String),
        ])
    }

    /// Columns of the empty aggregate, named as the archive spells them before
    /// normalization.
    pub fn raw_expected() -> Schema {
        Schema::from_iter(vec![
            Field::new(VENDOR_ID.into(), DataType::Int64),
            Field::new("tpep_pickup_datetime".into(), datetime_dtype()),
            Field::new("tpep_dropoff_datetime".into(), datetime_dtype()),
            Field::new(PASSENGER_COUNT.into(), DataType::Float64),
            Field::new(TRIP_DISTANCE.into(), DataType::Float64),
            Field::new(PAYMENT_TYPE.into(), DataType::Int64),
            Field::new(EXTRACTED_AT.into(), datetime_dtype()),
        ])
    }

    /// Zero-row table with the pre-normalization columns.
    pub fn empty_raw() -> DataFrame {
        DataFrame::empty_with_schema(&Self::raw_expected())
    }

    /// Check that every canonical column is present.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        for field in Self::canonical().iter_fields() {
            if df.get_column_index(field.name()).is_none() {
                return Err(SchemaError::MissingColumn(field.name().to_string()));
            }
        }

        let pickup = df
            .column(PICKUP_DATETIME)
            .map_err(|_| SchemaError::MissingColumn(PICKUP_DATETIME.to_string()))?;
        if !matches!(pickup.dtype(), DataType::Datetime(_, _)) {
            return Err(SchemaError::TypeMismatch {
                column: PICKUP_DATETIME.to_string(),
                expected: datetime_dtype(),
                actual: pickup.dtype().clone(),
            });
        }

        let dropoff = df
            .column(DROPOFF_DATETIME)
            .map_err(|_| SchemaError::MissingColumn(DROPOFF_DATETIME.to_string()))?;
        if !matches!(dropoff.dtype(), DataType::Datetime(_, _)) {
            return Err(SchemaError::TypeMismatch {
                column: DROPOFF_DATETIME.to_string(),
                expected: datetime_dtype(),
                actual: dropoff.dtype().clone(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },
}
