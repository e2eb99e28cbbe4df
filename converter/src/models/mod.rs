//! Shipment payload models.
//!
//! These types serialize to the document accepted by the shipment-tracking
//! API, one [`Shipment`] per spreadsheet row:
//!
//! - [`Shipment`] - identity, origin/destination, package, legs, line items
//! - [`Location`] - city, country name and ISO country code
//! - [`Package`] - mass and volume measurements
//! - [`TransportLeg`] - leg type plus vehicle
//! - [`LineItem`] - quantity and order reference
//!
//! Absent values serialize as `null`; the API expects every key.

use serde::{Deserialize, Serialize};

// =============================================================================
// Enumerations
// =============================================================================

/// Direction of a shipment. Only inbound exports are converted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentKind {
    #[default]
    Inbound,
}

/// Position of a leg in the journey.
///
/// Exported shipments travel between consolidation centres, so every leg is
/// a mid-leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegType {
    #[default]
    Midleg,
}

/// Vehicle class of a transportation leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Heavy goods vehicle
    Hgv,
    /// Light goods vehicle
    Lgv,
    Plane,
    CargoShip,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MassUnit {
    #[serde(rename = "kg")]
    Kilogram,
}

/// Volume unit tag.
///
/// The source column is labelled CBM (cubic metres) but the payload has
/// always been tagged `cm3` with no conversion. Kept until the data owner
/// confirms which one is intended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VolumeUnit {
    #[serde(rename = "cm3")]
    CubicCentimetre,
}

// =============================================================================
// Nested groups
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Location {
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

/// A value with its unit; `value` is `None` when the source cell was empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement<U> {
    pub value: Option<f64>,
    pub unit: U,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    pub mass: Measurement<MassUnit>,
    pub volume: Measurement<VolumeUnit>,
}

impl Package {
    pub fn new(mass_kg: Option<f64>, volume: Option<f64>) -> Self {
        Self {
            mass: Measurement {
                value: mass_kg,
                unit: MassUnit::Kilogram,
            },
            volume: Measurement {
                value: volume,
                unit: VolumeUnit::CubicCentimetre,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TransportationMode {
    #[serde(rename = "Type")]
    pub vehicle: Option<VehicleType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TransportLeg {
    pub leg_type: LegType,
    pub transportation_mode: TransportationMode,
}

impl TransportLeg {
    pub fn midleg(vehicle: Option<VehicleType>) -> Self {
        Self {
            leg_type: LegType::Midleg,
            transportation_mode: TransportationMode { vehicle },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LineItem {
    pub quantity: i64,
    pub order_id: String,
}

impl LineItem {
    /// The export has no order numbers, so the reference is derived from the
    /// shipment id.
    pub fn placeholder(shipment_id: &str, quantity: i64) -> Self {
        Self {
            quantity,
            order_id: format!("Order_{}", shipment_id),
        }
    }
}

// =============================================================================
// Shipment
// =============================================================================

/// A shipment record in the payload format of the tracking API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Shipment {
    pub shipment_id: String,
    #[serde(rename = "Type")]
    pub kind: ShipmentKind,
    /// ISO-8601 timestamp with a `Z` suffix
    pub filed: String,
    pub origin: Location,
    pub custom_type: Option<String>,
    pub destination: Location,
    pub package: Package,
    pub transportation_modes: Vec<TransportLeg>,
    pub line_items: Vec<LineItem>,
}

impl Shipment {
    /// JSON payload for the tracking API.
    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Shipment {
        Shipment {
            shipment_id: "1001".into(),
            kind: ShipmentKind::Inbound,
            filed: "2023-01-02T00:00:00Z".into(),
            origin: Location {
                city: Some("Istanbul".into()),
                country: Some("Turkey".into()),
                country_code: Some("TR".into()),
            },
            custom_type: Some("FTL".into()),
            destination: Location {
                city: None,
                country: Some("France".into()),
                country_code: Some("FR".into()),
            },
            package: Package::new(Some(1200.5), None),
            transportation_modes: vec![TransportLeg::midleg(Some(VehicleType::CargoShip))],
            line_items: vec![LineItem::placeholder("1001", 40)],
        }
    }

    #[test]
    fn test_payload_keys() {
        let payload = sample().to_payload().unwrap();

        assert_eq!(payload["ShipmentId"], "1001");
        assert_eq!(payload["Type"], "inbound");
        assert_eq!(payload["Origin"]["CountryCode"], "TR");
        assert_eq!(payload["Package"]["Mass"]["Unit"], "kg");
        assert_eq!(payload["Package"]["Volume"]["Unit"], "cm3");
        assert_eq!(payload["TransportationModes"][0]["LegType"], "midleg");
        assert_eq!(
            payload["TransportationModes"][0]["TransportationMode"]["Type"],
            "cargo_ship"
        );
        assert_eq!(payload["LineItems"][0]["OrderId"], "Order_1001");
    }

    #[test]
    fn test_absent_values_are_null() {
        let payload = sample().to_payload().unwrap();

        assert!(payload["Destination"]["City"].is_null());
        assert!(payload["Package"]["Volume"]["Value"].is_null());
        assert!(payload["Package"]["Volume"].get("Value").is_some());
    }

    #[test]
    fn test_vehicle_names() {
        let names: Vec<String> = [
            VehicleType::Hgv,
            VehicleType::Lgv,
            VehicleType::Plane,
            VehicleType::CargoShip,
        ]
        .iter()
        .map(|v| serde_json::to_value(v).unwrap().as_str().unwrap().to_string())
        .collect();
        assert_eq!(names, vec!["hgv", "lgv", "plane", "cargo_ship"]);
    }

    #[test]
    fn test_shipment_deserializes_back() {
        let json = serde_json::to_string(&sample()).unwrap();
        let parsed: Shipment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }
}
