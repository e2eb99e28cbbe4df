//! Static lookup tables for the customer export.

use crate::models::VehicleType;

/// Country name to ISO 3166-1 alpha-2 code. Codes must stay unique, the
/// table is also searched by code.
pub const COUNTRY_CODES: [(&str, &str); 6] = [
    ("Turkey", "TR"),
    ("Spain", "ES"),
    ("Germany", "DE"),
    ("France", "FR"),
    ("United Kingdom", "GB"),
    ("United States", "US"),
];

/// City used for each destination country code.
pub const DESTINATION_CITIES: [(&str, &str); 4] = [
    ("CZ", "Prague"),
    ("DE", "Berlin"),
    ("GB", "London"),
    ("US", "New York"),
];

/// Shipment type that upgrades road transport to a heavy goods vehicle.
pub const FULL_TRUCK_LOAD: &str = "FTL";

pub fn country_code(name: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(country, _)| *country == name)
        .map(|(_, code)| *code)
}

pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(country, _)| *country)
}

pub fn destination_city(code: &str) -> Option<&'static str> {
    DESTINATION_CITIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, city)| *city)
}

/// Vehicle for a transport mode as written in the export.
pub fn vehicle_for_mode(mode: &str) -> Option<VehicleType> {
    match mode {
        "Road" => Some(VehicleType::Lgv),
        "Air" => Some(VehicleType::Plane),
        "Sea" => Some(VehicleType::CargoShip),
        _ => None,
    }
}

/// Resolve the vehicle of a shipment.
///
/// Full truck loads by road travel on an HGV; everything else follows the
/// mode table.
pub fn resolve_vehicle(shipment_type: Option<&str>, mode: Option<&str>) -> Option<VehicleType> {
    match (shipment_type, mode) {
        (Some(FULL_TRUCK_LOAD), Some("Road")) => Some(VehicleType::Hgv),
        (_, Some(mode)) => vehicle_for_mode(mode),
        (_, None) => None,
    }
}
