//! Row transformer: one spreadsheet row in, one [`Shipment`] out.
//!
//! Every column the record needs must be present in the row. Empty optional
//! cells become `null` in the payload; values that cannot be coerced to
//! their field's type reject the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::lookup::{country_code, country_name, destination_city, resolve_vehicle};
use crate::error::{RowError, RowResult};
use crate::models::{LineItem, Location, Package, Shipment, ShipmentKind, TransportLeg};
use crate::parser::{columns, format_datetime, Row};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Build a shipment record from a normalized row.
pub fn transform_row(row: &Row) -> RowResult<Shipment> {
    let filed = filed_date(row)?;
    let shipment_id = integer(row, columns::ID)?.to_string();

    let origin_city = text(row, columns::ORIGIN_CITY)?;
    let origin_country = text(row, columns::ORIGIN)?;
    let custom_type = text(row, columns::TYPE)?;
    let destination_code = text(row, columns::DESTINATION)?;
    let mass = optional_number(row, columns::WEIGHT)?;
    let volume = optional_number(row, columns::CBM)?;
    let mode = text(row, columns::MODE)?;
    let quantity = integer(row, columns::TOTAL_UNITS)?;

    let origin = Location {
        country_code: origin_country
            .as_deref()
            .and_then(country_code)
            .map(str::to_string),
        city: origin_city,
        country: origin_country,
    };

    let code = destination_code.as_deref();
    let destination = Location {
        city: code.and_then(destination_city).map(str::to_string),
        country: code.and_then(country_name).map(str::to_string),
        country_code: destination_code,
    };

    let vehicle = resolve_vehicle(custom_type.as_deref(), mode.as_deref());

    Ok(Shipment {
        line_items: vec![LineItem::placeholder(&shipment_id, quantity)],
        shipment_id,
        kind: ShipmentKind::Inbound,
        filed,
        origin,
        custom_type,
        destination,
        package: Package::new(mass, volume),
        transportation_modes: vec![TransportLeg::midleg(vehicle)],
    })
}

/// Raw text of the row's shipment id, for error reports.
pub fn raw_shipment_id(row: &Row) -> Option<String> {
    match row.get(columns::ID)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field<'a>(row: &'a Row, name: &str) -> RowResult<&'a Value> {
    row.get(name).ok_or_else(|| RowError::missing(name))
}

/// Text value of a column; numbers and booleans are rendered as text.
fn text(row: &Row, name: &str) -> RowResult<Option<String>> {
    match field(row, name)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(RowError::transform(format!(
            "column '{}' holds a nested value: {}",
            name, other
        ))),
    }
}

/// Integer value of a column. Fractional numbers are truncated toward zero.
fn integer(row: &Row, name: &str) -> RowResult<i64> {
    let value = field(row, name)?;
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(RowError::transform(format!(
                    "column '{}' value {} is out of range",
                    name, n
                ))),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| RowError::coercion(name, value, "an integer")),
        _ => Err(RowError::coercion(name, value, "an integer")),
    }
}

/// Numeric value of a column, `None` for an empty cell.
fn optional_number(row: &Row, name: &str) -> RowResult<Option<f64>> {
    let value = field(row, name)?;
    let number = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(f) if f.is_finite() => Ok(Some(f)),
        _ => Err(RowError::coercion(name, value, "a number")),
    }
}

/// Filing date as an ISO-8601 UTC timestamp.
fn filed_date(row: &Row) -> RowResult<String> {
    let value = field(row, columns::WEEK_COM)?;
    value
        .as_str()
        .and_then(parse_datetime)
        .map(|dt| format!("{}Z", format_datetime(&dt)))
        .ok_or_else(|| RowError::coercion(columns::WEEK_COM, value, "a date"))
}

/// Parse the date representations found in exports.
///
/// Timestamps carrying an offset are converted to UTC; naive ones are taken
/// as UTC already.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleType;
    use serde_json::json;

    fn valid_row() -> Row {
        let value = json!({
            "WEEK COM": "2023-01-02T00:00:00",
            "ID": 1001,
            "ORIGIN CITY": "Istanbul",
            "ORIGIN": "Turkey",
            "DESTINATION  (DROP LIST)": "DE",
            "TYPE": "FTL",
            "WEIGHT": 1200.5,
            "CBM": 33,
            "TOTAL UNITS": 40,
            "MODE": "Road"
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn with(mut row: Row, column: &str, value: Value) -> Row {
        row.insert(column.to_string(), value);
        row
    }

    fn without(mut row: Row, column: &str) -> Row {
        row.remove(column);
        row
    }

    #[test]
    fn test_valid_row() {
        let shipment = transform_row(&valid_row()).unwrap();

        assert_eq!(shipment.shipment_id, "1001");
        assert_eq!(shipment.filed, "2023-01-02T00:00:00Z");
        assert_eq!(shipment.kind, ShipmentKind::Inbound);
        assert_eq!(shipment.origin.city.as_deref(), Some("Istanbul"));
        assert_eq!(shipment.origin.country_code.as_deref(), Some("TR"));
        assert_eq!(shipment.custom_type.as_deref(), Some("FTL"));
        assert_eq!(shipment.package.mass.value, Some(1200.5));
        assert_eq!(shipment.package.volume.value, Some(33.0));
        assert_eq!(shipment.line_items[0].quantity, 40);
        assert_eq!(shipment.line_items[0].order_id, "Order_1001");
        assert_eq!(shipment.transportation_modes.len(), 1);
        assert_eq!(
            shipment.transportation_modes[0].transportation_mode.vehicle,
            Some(VehicleType::Hgv)
        );
    }

    #[test]
    fn test_filed_date_is_utc_iso8601() {
        let shipment = transform_row(&valid_row()).unwrap();
        let parsed = DateTime::parse_from_rfc3339(&shipment.filed).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_id_coercion() {
        let row = with(valid_row(), columns::ID, json!(1002.9));
        assert_eq!(transform_row(&row).unwrap().shipment_id, "1002");

        let row = with(valid_row(), columns::ID, json!(" 1003 "));
        assert_eq!(transform_row(&row).unwrap().shipment_id, "1003");

        let row = with(valid_row(), columns::ID, json!("A-17"));
        let err = transform_row(&row).unwrap_err();
        assert!(matches!(err, RowError::TypeCoercion { ref field, .. } if field == "ID"));

        let row = with(valid_row(), columns::ID, Value::Null);
        assert!(matches!(transform_row(&row), Err(RowError::TypeCoercion { .. })));
    }

    #[test]
    fn test_destination_lookup() {
        let shipment = transform_row(&valid_row()).unwrap();
        assert_eq!(shipment.destination.country.as_deref(), Some("Germany"));
        assert_eq!(shipment.destination.city.as_deref(), Some("Berlin"));
        assert_eq!(shipment.destination.country_code.as_deref(), Some("DE"));

        let row = with(valid_row(), columns::DESTINATION, json!("FR"));
        let shipment = transform_row(&row).unwrap();
        assert_eq!(shipment.destination.city, None);
        assert_eq!(shipment.destination.country.as_deref(), Some("France"));

        let row = with(valid_row(), columns::DESTINATION, json!("PL"));
        let shipment = transform_row(&row).unwrap();
        assert_eq!(shipment.destination.city, None);
        assert_eq!(shipment.destination.country, None);
        assert_eq!(shipment.destination.country_code.as_deref(), Some("PL"));
    }

    #[test]
    fn test_origin_passthrough() {
        let row = with(valid_row(), columns::ORIGIN, json!("Italy"));
        let row = with(row, columns::ORIGIN_CITY, Value::Null);
        let shipment = transform_row(&row).unwrap();

        assert_eq!(shipment.origin.city, None);
        assert_eq!(shipment.origin.country.as_deref(), Some("Italy"));
        assert_eq!(shipment.origin.country_code, None);
    }

    #[test]
    fn test_empty_measurements_are_absent() {
        let row = with(valid_row(), columns::WEIGHT, Value::Null);
        let row = with(row, columns::CBM, Value::Null);
        let shipment = transform_row(&row).unwrap();

        assert_eq!(shipment.package.mass.value, None);
        assert_eq!(shipment.package.volume.value, None);
    }

    #[test]
    fn test_volume_is_not_converted() {
        let row = with(valid_row(), columns::CBM, json!(1.75));
        let payload = transform_row(&row).unwrap().to_payload().unwrap();

        assert_eq!(payload["Package"]["Volume"]["Value"], 1.75);
        assert_eq!(payload["Package"]["Volume"]["Unit"], "cm3");
    }

    #[test]
    fn test_non_numeric_weight_rejected() {
        let row = with(valid_row(), columns::WEIGHT, json!("heavy"));
        let err = transform_row(&row).unwrap_err();
        assert_eq!(
            err,
            RowError::TypeCoercion {
                field: "WEIGHT".into(),
                value: "\"heavy\"".into(),
                expected: "a number",
            }
        );

        let row = with(valid_row(), columns::WEIGHT, json!("12.5"));
        assert_eq!(transform_row(&row).unwrap().package.mass.value, Some(12.5));

        let row = with(valid_row(), columns::CBM, json!("NaN"));
        assert!(transform_row(&row).is_err());
    }

    #[test]
    fn test_total_units_must_be_integer() {
        let row = with(valid_row(), columns::TOTAL_UNITS, Value::Null);
        assert!(matches!(transform_row(&row), Err(RowError::TypeCoercion { .. })));

        let row = with(valid_row(), columns::TOTAL_UNITS, json!("forty"));
        assert!(matches!(transform_row(&row), Err(RowError::TypeCoercion { .. })));
    }

    #[test]
    fn test_missing_fields() {
        for column in columns::ALL {
            let err = transform_row(&without(valid_row(), column)).unwrap_err();
            assert_eq!(err, RowError::missing(column), "column {}", column);
        }
    }

    #[test]
    fn test_bad_dates() {
        let row = with(valid_row(), columns::WEEK_COM, Value::Null);
        assert!(matches!(transform_row(&row), Err(RowError::TypeCoercion { .. })));

        let row = with(valid_row(), columns::WEEK_COM, json!("week 1"));
        assert!(matches!(transform_row(&row), Err(RowError::TypeCoercion { .. })));

        let row = with(valid_row(), columns::WEEK_COM, json!(44928));
        assert!(matches!(transform_row(&row), Err(RowError::TypeCoercion { .. })));
    }

    #[test]
    fn test_nested_value_is_transform_error() {
        let row = with(valid_row(), columns::MODE, json!(["Road"]));
        assert!(matches!(transform_row(&row), Err(RowError::Transform { .. })));
    }

    #[test]
    fn test_transport_modes() {
        let cases = [
            ("FTL", "Road", Some(VehicleType::Hgv)),
            ("LTL", "Road", Some(VehicleType::Lgv)),
            ("FTL", "Air", Some(VehicleType::Plane)),
            ("LCL", "Sea", Some(VehicleType::CargoShip)),
            ("FTL", "Rail", None),
        ];
        for (kind, mode, expected) in cases {
            let row = with(valid_row(), columns::TYPE, json!(kind));
            let row = with(row, columns::MODE, json!(mode));
            let shipment = transform_row(&row).unwrap();
            assert_eq!(
                shipment.transportation_modes[0].transportation_mode.vehicle,
                expected,
                "{} by {}",
                kind,
                mode
            );
        }
    }

    #[test]
    fn test_transform_is_idempotent() {
        let row = valid_row();
        let first = serde_json::to_vec(&transform_row(&row).unwrap()).unwrap();
        let second = serde_json::to_vec(&transform_row(&row).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 2)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(parse_datetime("2023-01-02"), Some(expected));
        assert_eq!(parse_datetime("02/01/2023"), Some(expected));
        assert_eq!(parse_datetime("2023-01-02 00:00:00"), Some(expected));
        assert_eq!(parse_datetime("2023-01-02T01:00:00+01:00"), Some(expected));
        assert_eq!(parse_datetime("next monday"), None);
    }

    #[test]
    fn test_raw_shipment_id() {
        assert_eq!(raw_shipment_id(&valid_row()).as_deref(), Some("1001"));
        assert_eq!(raw_shipment_id(&without(valid_row(), columns::ID)), None);
    }
}
