//! The ordered form plan built from one listing record.

use lotlift_browser::ControlKind;
use lotlift_core::record::ListingRecord;
use lotlift_core::text::collapse_whitespace;
use lotlift_core::vehicle::{
    condition_label, infer_body_style, infer_fuel, infer_transmission, preferred_description,
};

/// The vehicle-type option that unlocks the rest of the target form.
pub const VEHICLE_TYPE_OPTION: &str = "Car/van";

/// Label pattern of the year combo; it appears only after the vehicle
/// type has been chosen.
pub const YEAR_LABEL: &str = "^year$";

/// Label pattern of the make combo.
pub const MAKE_LABEL: &str = "^make$";

/// What gets written into one form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Typed into a plain input, textarea, or rich-text surface
    Text(String),
    /// Chosen from a dropdown popup
    Combo(String),
    /// Toggled to the given state
    Checkbox(bool),
}

/// One planned field write.
#[derive(Debug, Clone)]
pub struct FieldStep {
    /// Field name used in reports
    pub name: &'static str,
    /// Case-insensitive regex matched against labels on the page
    pub label_pattern: &'static str,
    /// The value to write
    pub value: FieldValue,
}

impl FieldStep {
    /// The control shape this step's label should resolve to.
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        match self.value {
            FieldValue::Text(_) => ControlKind::Text,
            FieldValue::Combo(_) => ControlKind::Combo,
            FieldValue::Checkbox(_) => ControlKind::Checkbox,
        }
    }

    /// Whether the record supplied anything to write.
    #[must_use]
    pub fn has_value(&self) -> bool {
        match &self.value {
            FieldValue::Text(v) | FieldValue::Combo(v) => !v.is_empty(),
            FieldValue::Checkbox(_) => true,
        }
    }
}

fn text(name: &'static str, label_pattern: &'static str, value: String) -> FieldStep {
    FieldStep {
        name,
        label_pattern,
        value: FieldValue::Text(value),
    }
}

fn combo(name: &'static str, label_pattern: &'static str, value: String) -> FieldStep {
    FieldStep {
        name,
        label_pattern,
        value: FieldValue::Combo(value),
    }
}

/// Build the ordered form plan for a record.
///
/// The first step is always the vehicle type; the target form renders
/// the remaining controls only after it is chosen. Steps whose record
/// field is unknown carry an empty value and are skipped at run time.
#[must_use]
pub fn field_plan(record: &ListingRecord) -> Vec<FieldStep> {
    let number = |n: Option<u32>| n.map(|v| v.to_string()).unwrap_or_default();

    vec![
        combo("vehicle type", "^vehicle type$", VEHICLE_TYPE_OPTION.to_string()),
        combo("year", YEAR_LABEL, record.year.map(|y| y.to_string()).unwrap_or_default()),
        combo("make", MAKE_LABEL, record.make.clone()),
        text("model", "^model$", record.model.clone()),
        combo("body style", "body style|bodytype", infer_body_style(record).to_string()),
        combo(
            "condition",
            "vehicle condition|condition",
            condition_label(record.mileage).to_string(),
        ),
        text("mileage", "^mileage|odometer$", number(record.mileage)),
        combo(
            "exterior color",
            "exterior colou?r",
            record.exterior_color.clone().unwrap_or_default(),
        ),
        combo(
            "interior color",
            "interior colou?r",
            record.interior_color.clone().unwrap_or_default(),
        ),
        combo("fuel type", "fuel type|fuel", infer_fuel(record).to_string()),
        combo("transmission", "transmission", infer_transmission(record).to_string()),
        FieldStep {
            name: "clean title",
            label_pattern: "clean title",
            value: FieldValue::Checkbox(true),
        },
        text("price", "^price$", number(record.price)),
        text("title", "^title$", record.composed_title()),
        text(
            "description",
            "^description|about",
            collapse_whitespace(&preferred_description(record)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotlift_core::types::SiteId;

    fn record() -> ListingRecord {
        let site = SiteId::new("cars-com").expect("valid site ID");
        let mut r = ListingRecord::new(site, "https://example.com/listing/1");
        r.year = Some(2018);
        r.make = "Chevrolet".to_string();
        r.model = "Equinox".to_string();
        r.trim = "Premier".to_string();
        r.price = Some(23_991);
        r.mileage = Some(48_254);
        r.exterior_color = Some("Silver".to_string());
        r.interior_color = Some("Black".to_string());
        r.transmission = "6-Speed Automatic".to_string();
        r
    }

    #[test]
    fn test_plan_order_matches_form_flow() {
        let names: Vec<&str> = field_plan(&record()).iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "vehicle type",
                "year",
                "make",
                "model",
                "body style",
                "condition",
                "mileage",
                "exterior color",
                "interior color",
                "fuel type",
                "transmission",
                "clean title",
                "price",
                "title",
                "description",
            ]
        );
    }

    #[test]
    fn test_vehicle_type_is_first_and_fixed() {
        let plan = field_plan(&record());
        assert_eq!(plan[0].value, FieldValue::Combo("Car/van".to_string()));
        assert_eq!(plan[0].kind(), ControlKind::Combo);
    }

    #[test]
    fn test_values_come_from_the_record() {
        let plan = field_plan(&record());
        let by_name = |name: &str| {
            plan.iter()
                .find(|s| s.name == name)
                .unwrap_or_else(|| panic!("{name} missing"))
        };

        assert_eq!(by_name("year").value, FieldValue::Combo("2018".to_string()));
        assert_eq!(by_name("model").value, FieldValue::Text("Equinox".to_string()));
        assert_eq!(by_name("mileage").value, FieldValue::Text("48254".to_string()));
        assert_eq!(by_name("body style").value, FieldValue::Combo("SUV".to_string()));
        assert_eq!(by_name("condition").value, FieldValue::Combo("Good".to_string()));
        assert_eq!(by_name("clean title").value, FieldValue::Checkbox(true));
        assert_eq!(
            by_name("title").value,
            FieldValue::Text("2018 Chevrolet Equinox Premier".to_string())
        );
    }

    #[test]
    fn test_missing_record_fields_have_no_value() {
        let site = SiteId::new("cars-com").expect("valid site ID");
        let empty = ListingRecord::new(site, "https://example.com/x");
        let plan = field_plan(&empty);

        let empties: Vec<&str> = plan.iter().filter(|s| !s.has_value()).map(|s| s.name).collect();
        assert!(empties.contains(&"year"));
        assert!(empties.contains(&"make"));
        assert!(empties.contains(&"price"));
        assert!(empties.contains(&"title"));

        // Inferred attributes always carry a value
        let inferred = plan.iter().find(|s| s.name == "fuel type").expect("fuel step");
        assert_eq!(inferred.value, FieldValue::Combo("Petrol".to_string()));
        assert!(inferred.has_value());
    }

    #[test]
    fn test_description_prefers_ai_text() {
        let mut r = record();
        r.ai_description = Some("A  wonderful\ncommuter.".to_string());
        let plan = field_plan(&r);
        let description = plan.iter().find(|s| s.name == "description").expect("description step");
        assert_eq!(
            description.value,
            FieldValue::Text("A wonderful commuter.".to_string())
        );
    }
}
