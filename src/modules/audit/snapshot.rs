use crate::database::models::Vehicle;
use serde_json::{json, Map, Value};

/// identifying field subset captured on create / update audit records
fn field_subset(v: &Vehicle) -> Map<String, Value> {
    let mut map = Map::new();

    map.insert("make".into(), json!(v.make));
    map.insert("model".into(), json!(v.model));
    map.insert("year".into(), json!(v.year));
    map.insert("price".into(), json!(v.price.to_string()));
    map.insert("mileage".into(), json!(v.mileage));
    map.insert("vin".into(), json!(v.vin));
    map.insert("stockNumber".into(), json!(v.stock_number));
    map.insert("status".into(), json!(v.status));
    map.insert("isFeatured".into(), json!(v.is_featured));

    map
}

/// audit details for a vehicle creation, the identifying fields of
/// the new entity
pub fn creation_snapshot(vehicle: &Vehicle) -> Value {
    Value::Object(field_subset(vehicle))
}

/// audit details for a vehicle update: `{before, changes, after}` where
/// `changes` contains only the keys of the subset that actually changed,
/// with their new values
pub fn change_set(before: &Vehicle, after: &Vehicle) -> Value {
    let before_fields = field_subset(before);
    let after_fields = field_subset(after);

    let changes: Map<String, Value> = after_fields
        .iter()
        .filter(|(key, after_value)| before_fields.get(*key) != Some(after_value))
        .map(|(key, after_value)| (key.clone(), after_value.clone()))
        .collect();

    json!({
        "before": before_fields,
        "changes": changes,
        "after": after_fields,
    })
}

/// audit details for a vehicle deletion, a wider snapshot than the create /
/// update subset since the entity can no longer be queried afterwards
pub fn deletion_snapshot(vehicle: &Vehicle) -> Value {
    let mut map = field_subset(vehicle);

    map.insert("condition".into(), json!(vehicle.condition));
    map.insert("exteriorColor".into(), json!(vehicle.exterior_color));
    map.insert("interiorColor".into(), json!(vehicle.interior_color));
    map.insert("fuelType".into(), json!(vehicle.fuel_type));
    map.insert("transmission".into(), json!(vehicle.transmission));

    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use std::str::FromStr;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: 1,
            created_at: Utc::now(),
            updated_at: None,
            make: String::from("Toyota"),
            model: String::from("Tacoma"),
            year: 2021,
            trim: Some(String::from("TRD Off-Road")),
            price: BigDecimal::from_str("32999.00").unwrap(),
            mileage: 41000,
            condition: String::from("used"),
            exterior_color: Some(String::from("Cement")),
            interior_color: Some(String::from("Black")),
            fuel_type: Some(String::from("Gasoline")),
            transmission: Some(String::from("Automatic")),
            drivetrain: Some(String::from("4WD")),
            features: vec![String::from("Tow Package")],
            images: vec![],
            status: String::from("available"),
            status_banner: None,
            stock_number: String::from("T-1042"),
            vin: String::from("3TMCZ5AN0MM400001"),
            is_featured: false,
            description: None,
            dealership_id: Some(7),
        }
    }

    #[test]
    fn creation_snapshot_captures_identifying_fields() {
        let snapshot = creation_snapshot(&vehicle());

        assert_eq!(snapshot["make"], "Toyota");
        assert_eq!(snapshot["year"], 2021);
        assert_eq!(snapshot["price"], "32999.00");
        assert_eq!(snapshot["stockNumber"], "T-1042");
        assert_eq!(snapshot["isFeatured"], false);

        // the create subset never leaks fields outside the fixed set
        assert!(snapshot.get("condition").is_none());
        assert!(snapshot.get("dealershipId").is_none());
    }

    #[test]
    fn change_set_only_lists_changed_fields() {
        let before = vehicle();

        let mut after = vehicle();
        after.price = BigDecimal::from_str("29999.00").unwrap();
        after.status = String::from("pending");

        let diff = change_set(&before, &after);

        let changes = diff["changes"].as_object().unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes["price"], "29999.00");
        assert_eq!(changes["status"], "pending");

        assert_eq!(diff["before"]["price"], "32999.00");
        assert_eq!(diff["after"]["price"], "29999.00");
    }

    #[test]
    fn change_set_is_empty_for_identical_vehicles() {
        let diff = change_set(&vehicle(), &vehicle());

        assert!(diff["changes"].as_object().unwrap().is_empty());
    }

    #[test]
    fn deletion_snapshot_is_wider_than_the_create_subset() {
        let snapshot = deletion_snapshot(&vehicle());

        assert_eq!(snapshot["condition"], "used");
        assert_eq!(snapshot["exteriorColor"], "Cement");
        assert_eq!(snapshot["interiorColor"], "Black");
        assert_eq!(snapshot["fuelType"], "Gasoline");
        assert_eq!(snapshot["transmission"], "Automatic");
        // plus everything the create subset has
        assert_eq!(snapshot["vin"], "3TMCZ5AN0MM400001");
    }
}
