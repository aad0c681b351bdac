//! Typed search criteria and the parser that builds them from a raw JSON
//! filter object.
//!
//! Parsing is strict: a value of the wrong JSON type, an unparseable date or
//! enum label, a reversed range, a half-open date window or a key the resource
//! does not know is reported as a [`ValidationError`]. Every problem in the
//! payload is collected before the request is rejected. `null` values and
//! empty strings/arrays are treated as "no constraint".

use chrono::NaiveDate;
use sea_orm::{ActiveEnum, Condition, Iterable};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt::Display;

use crate::entities::rental::RentalStatus;
use crate::entities::vehicle::{FuelType, Transmission};
use crate::validation::{ValidationError, ValidationErrors};

use super::conditions::{rental_condition, vehicle_condition};

const MAX_SEARCH_LENGTH: usize = 100;
const MAX_LIST_LENGTH: usize = 50;

/// A resource-specific set of optional constraints.
pub trait Criteria: Sized + Default {
    /// Builds the criteria from a decoded filter object.
    ///
    /// # Errors
    ///
    /// Returns every malformed, inconsistent or unknown field.
    fn from_filter(filter: &Map<String, Value>) -> Result<Self, ValidationErrors>;

    /// The conjunction of every populated constraint.
    fn condition(&self) -> Condition;
}

/// Decodes the `filter` query parameter. Absent means "no constraints".
///
/// # Errors
///
/// Fails when the parameter is not a JSON object.
pub fn parse_filter_json(filter: Option<&str>) -> Result<Map<String, Value>, ValidationErrors> {
    let Some(raw) = filter.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::new("filter", "must be a JSON object").into()),
        Err(e) => Err(ValidationError::new("filter", format!("is not valid JSON: {e}")).into()),
    }
}

/// Parses both the filter string and the resource criteria in one step.
///
/// # Errors
///
/// See [`parse_filter_json`] and [`Criteria::from_filter`].
pub fn parse_criteria<C: Criteria>(filter: Option<&str>) -> Result<C, ValidationErrors> {
    C::from_filter(&parse_filter_json(filter)?)
}

/// Half-open day interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// # Errors
    ///
    /// Fails unless `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::new(
                "dateRange",
                format!("start {start} must be before end {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of rented days.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// `self.start < other.end && self.end > other.start`; touching windows
    /// do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleCriteria {
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub active: Option<bool>,
    pub min_daily_rental_fee: Option<f64>,
    pub max_daily_rental_fee: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_seats: Option<i32>,
    pub max_seats: Option<i32>,
    /// The vehicle must carry every one of these features.
    pub feature_ids: Vec<i32>,
    /// Case-insensitive fragment of plate number, brand or model.
    pub search: Option<String>,
    /// No confirmed rental may overlap this window.
    pub available: Option<DateWindow>,
}

impl Criteria for VehicleCriteria {
    fn from_filter(filter: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut reader = FilterReader::new(filter);
        let criteria = Self {
            category_id: reader.id("categoryId"),
            location_id: reader.id("locationId"),
            transmission: reader.enumeration("transmission"),
            fuel_type: reader.enumeration("fuelType"),
            active: reader.boolean("active"),
            min_daily_rental_fee: reader.amount("minDailyRentalFee"),
            max_daily_rental_fee: reader.amount("maxDailyRentalFee"),
            min_year: reader.integer("minYear"),
            max_year: reader.integer("maxYear"),
            min_seats: reader.integer("minSeats"),
            max_seats: reader.integer("maxSeats"),
            feature_ids: reader.id_list("featureIds"),
            search: reader.text("search"),
            available: reader.window("availableFrom", "availableTo"),
        };
        reader.ordered(
            "minDailyRentalFee",
            criteria.min_daily_rental_fee,
            "maxDailyRentalFee",
            criteria.max_daily_rental_fee,
        );
        reader.ordered("minYear", criteria.min_year, "maxYear", criteria.max_year);
        reader.ordered("minSeats", criteria.min_seats, "maxSeats", criteria.max_seats);
        reader.finish()?;
        Ok(criteria)
    }

    fn condition(&self) -> Condition {
        vehicle_condition(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalCriteria {
    pub user_id: Option<i32>,
    pub vehicle_id: Option<i32>,
    pub pickup_location_id: Option<i32>,
    pub status: Option<RentalStatus>,
    pub min_total_price: Option<f64>,
    pub max_total_price: Option<f64>,
    /// Case-insensitive fragment of the vehicle plate, user name or email.
    pub search: Option<String>,
    /// Rentals whose period overlaps this window.
    pub overlapping: Option<DateWindow>,
}

impl Criteria for RentalCriteria {
    fn from_filter(filter: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut reader = FilterReader::new(filter);
        let criteria = Self {
            user_id: reader.id("userId"),
            vehicle_id: reader.id("vehicleId"),
            pickup_location_id: reader.id("pickupLocationId"),
            status: reader.enumeration("status"),
            min_total_price: reader.amount("minTotalPrice"),
            max_total_price: reader.amount("maxTotalPrice"),
            search: reader.text("search"),
            overlapping: reader.window("overlapsFrom", "overlapsTo"),
        };
        reader.ordered(
            "minTotalPrice",
            criteria.min_total_price,
            "maxTotalPrice",
            criteria.max_total_price,
        );
        reader.finish()?;
        Ok(criteria)
    }

    fn condition(&self) -> Condition {
        rental_condition(self)
    }
}

/// Typed accessors over a filter object that remember which keys were read
/// and which values were rejected.
struct FilterReader<'a> {
    filter: &'a Map<String, Value>,
    known: BTreeSet<&'static str>,
    errors: ValidationErrors,
}

impl<'a> FilterReader<'a> {
    fn new(filter: &'a Map<String, Value>) -> Self {
        Self {
            filter,
            known: BTreeSet::new(),
            errors: ValidationErrors::new(),
        }
    }

    fn value(&mut self, key: &'static str) -> Option<&'a Value> {
        self.known.insert(key);
        self.filter.get(key).filter(|value| !value.is_null())
    }

    fn reject<T>(&mut self, key: &str, message: impl Into<String>) -> Option<T> {
        self.errors.add(ValidationError::new(key, message));
        None
    }

    fn integer(&mut self, key: &'static str) -> Option<i32> {
        let value = self.value(key)?;
        match value.as_i64().map(i32::try_from) {
            Some(Ok(number)) => Some(number),
            Some(Err(_)) => self.reject(key, "is out of range"),
            None => self.reject(key, format!("must be an integer, got {value}")),
        }
    }

    fn id(&mut self, key: &'static str) -> Option<i32> {
        let id = self.integer(key)?;
        if id < 1 {
            return self.reject(key, "must be a positive identifier");
        }
        Some(id)
    }

    fn amount(&mut self, key: &'static str) -> Option<f64> {
        let value = self.value(key)?;
        match value.as_f64() {
            Some(number) if number.is_finite() && number >= 0.0 => Some(number),
            Some(_) => self.reject(key, "must be a non-negative number"),
            None => self.reject(key, format!("must be a number, got {value}")),
        }
    }

    fn boolean(&mut self, key: &'static str) -> Option<bool> {
        let value = self.value(key)?;
        match value.as_bool() {
            Some(flag) => Some(flag),
            None => self.reject(key, format!("must be true or false, got {value}")),
        }
    }

    fn text(&mut self, key: &'static str) -> Option<String> {
        let value = self.value(key)?;
        let Some(text) = value.as_str() else {
            return self.reject(key, format!("must be a string, got {value}"));
        };
        let text = text.trim();
        if text.chars().count() > MAX_SEARCH_LENGTH {
            return self.reject(key, format!("must be at most {MAX_SEARCH_LENGTH} characters"));
        }
        (!text.is_empty()).then(|| text.to_string())
    }

    fn date(&mut self, key: &'static str) -> Option<NaiveDate> {
        let value = self.value(key)?;
        let Some(text) = value.as_str() else {
            return self.reject(key, format!("must be a date string, got {value}"));
        };
        match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => self.reject(key, format!("'{text}' is not a YYYY-MM-DD date")),
        }
    }

    fn id_list(&mut self, key: &'static str) -> Vec<i32> {
        let Some(value) = self.value(key) else {
            return Vec::new();
        };
        let Some(items) = value.as_array() else {
            self.errors.add(ValidationError::new(
                key,
                format!("must be an array of identifiers, got {value}"),
            ));
            return Vec::new();
        };
        if items.len() > MAX_LIST_LENGTH {
            self.errors.add(ValidationError::new(
                key,
                format!("must list at most {MAX_LIST_LENGTH} identifiers"),
            ));
            return Vec::new();
        }

        let mut ids = BTreeSet::new();
        for item in items {
            match item.as_i64().and_then(|id| i32::try_from(id).ok()) {
                Some(id) if id >= 1 => {
                    ids.insert(id);
                }
                _ => {
                    self.errors.add(ValidationError::new(
                        key,
                        format!("contains an invalid identifier: {item}"),
                    ));
                }
            }
        }
        ids.into_iter().collect()
    }

    fn enumeration<E>(&mut self, key: &'static str) -> Option<E>
    where
        E: ActiveEnum<Value = String>,
    {
        let value = self.value(key)?;
        let Some(label) = value.as_str() else {
            return self.reject(key, format!("must be a string, got {value}"));
        };
        let label = label.trim();
        if let Some(variant) = E::iter().find(|variant| variant.to_value().eq_ignore_ascii_case(label)) {
            return Some(variant);
        }
        let allowed: Vec<String> = E::iter().map(|variant| variant.to_value()).collect();
        self.reject(
            key,
            format!("'{label}' is not one of: {}", allowed.join(", ")),
        )
    }

    fn window(&mut self, from_key: &'static str, to_key: &'static str) -> Option<DateWindow> {
        let from = self.date(from_key);
        let to = self.date(to_key);
        let from_given = self.filter.get(from_key).is_some_and(|v| !v.is_null());
        let to_given = self.filter.get(to_key).is_some_and(|v| !v.is_null());

        match (from, to) {
            (Some(start), Some(end)) => match DateWindow::new(start, end) {
                Ok(window) => Some(window),
                Err(_) => self.reject(
                    from_key,
                    format!("must be before {to_key} ({start} is not before {end})"),
                ),
            },
            _ if from_given != to_given => {
                let missing = if from_given { to_key } else { from_key };
                self.reject(missing, format!("is required together with {from_key}/{to_key}"))
            }
            _ => None,
        }
    }

    fn ordered<T: PartialOrd + Display>(
        &mut self,
        min_key: &str,
        min: Option<T>,
        max_key: &str,
        max: Option<T>,
    ) {
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            self.errors.add(ValidationError::new(
                min_key,
                format!("{min} is greater than {max_key} {max}"),
            ));
        }
    }

    fn finish(mut self) -> Result<(), ValidationErrors> {
        let unknown: Vec<&String> = self
            .filter
            .keys()
            .filter(|key| !self.known.contains(key.as_str()))
            .collect();
        for key in unknown {
            self.errors.add(ValidationError::new(
                key.as_str(),
                "unsupported filter field",
            ));
        }
        self.errors.result()
    }
}
