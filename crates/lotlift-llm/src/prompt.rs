//! Prompt assembly for marketplace description generation.

use lotlift_core::text::group_thousands;
use lotlift_core::ListingRecord;

/// Instructions used when the user has not customized them.
pub const DEFAULT_INSTRUCTIONS: &str = "Write a compelling Facebook Marketplace \
description emphasizing key features, condition, and value.";

/// Closing directive appended to every prompt.
const CLOSING: &str = "Write a Facebook Marketplace vehicle description that is \
engaging, informative, and likely to attract buyers. Keep it concise but \
compelling.";

/// Assemble the generation prompt for a record.
///
/// Instructions first, then a labeled block of vehicle data with N/A for
/// anything unknown, then a fixed closing directive.
#[must_use]
pub fn build_prompt(instructions: &str, record: &ListingRecord) -> String {
    format!(
        "{}\n\nHere's the vehicle information:\n{}\n\n{}",
        instructions.trim(),
        vehicle_block(record),
        CLOSING
    )
}

fn vehicle_block(record: &ListingRecord) -> String {
    let title = record.composed_title();
    let price = match record.price {
        Some(p) => format!("${}", group_thousands(p)),
        None => "N/A".to_string(),
    };
    let mileage = match record.mileage {
        Some(m) => format!("{} miles", group_thousands(m)),
        None => "N/A".to_string(),
    };
    let vin = record
        .vin
        .as_ref()
        .map_or("N/A", lotlift_core::Vin::as_str);

    [
        format!("Vehicle: {}", or_na(&title)),
        format!("Price: {price}"),
        format!("Mileage: {mileage}"),
        format!("Exterior Color: {}", opt_or_na(&record.exterior_color)),
        format!("Interior Color: {}", opt_or_na(&record.interior_color)),
        format!("Drivetrain: {}", or_na(&record.drivetrain)),
        format!("Transmission: {}", or_na(&record.transmission)),
        format!("Engine: {}", or_na(&record.engine)),
        format!("VIN: {vin}"),
    ]
    .join("\n")
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

fn opt_or_na(value: &Option<String>) -> &str {
    value.as_deref().map_or("N/A", or_na)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotlift_core::{SiteId, Vin};

    fn record() -> ListingRecord {
        let site = SiteId::new("capitol-chevrolet").expect("valid site id");
        let mut record = ListingRecord::new(site, "https://example.com/inventory/123");
        record.year = Some(2018);
        record.make = "Chevrolet".to_string();
        record.model = "Equinox".to_string();
        record.trim = "Premier".to_string();
        record.price = Some(23_991);
        record.mileage = Some(48_254);
        record.vin = Some(Vin::new("2GNAXMEV1J6102807").expect("valid vin"));
        record.exterior_color = Some("Silver".to_string());
        record.interior_color = Some("Black".to_string());
        record.drivetrain = "Front Wheel Drive".to_string();
        record.transmission = "6-Speed Automatic".to_string();
        record.engine = "1.5L Turbo 4-Cylinder".to_string();
        record
    }

    #[test]
    fn test_prompt_structure() {
        let prompt = build_prompt(DEFAULT_INSTRUCTIONS, &record());
        assert!(prompt.starts_with(DEFAULT_INSTRUCTIONS));
        assert!(prompt.contains("Here's the vehicle information:"));
        assert!(prompt.ends_with("Keep it concise but compelling."));
    }

    #[test]
    fn test_vehicle_block_fields() {
        let prompt = build_prompt("Sell it.", &record());
        assert!(prompt.contains("Vehicle: 2018 Chevrolet Equinox Premier"));
        assert!(prompt.contains("Price: $23,991"));
        assert!(prompt.contains("Mileage: 48,254 miles"));
        assert!(prompt.contains("Exterior Color: Silver"));
        assert!(prompt.contains("Interior Color: Black"));
        assert!(prompt.contains("Drivetrain: Front Wheel Drive"));
        assert!(prompt.contains("Transmission: 6-Speed Automatic"));
        assert!(prompt.contains("Engine: 1.5L Turbo 4-Cylinder"));
        assert!(prompt.contains("VIN: 2GNAXMEV1J6102807"));
    }

    #[test]
    fn test_missing_fields_render_na() {
        let site = SiteId::new("cars-marketplace").expect("valid site id");
        let empty = ListingRecord::new(site, "https://example.com/listing");
        let prompt = build_prompt("Sell it.", &empty);
        assert!(prompt.contains("Vehicle: N/A"));
        assert!(prompt.contains("Price: N/A"));
        assert!(prompt.contains("Mileage: N/A"));
        assert!(prompt.contains("Exterior Color: N/A"));
        assert!(prompt.contains("Drivetrain: N/A"));
        assert!(prompt.contains("VIN: N/A"));
    }

    #[test]
    fn test_custom_instructions_trimmed() {
        let prompt = build_prompt("  Mention the warranty.  ", &record());
        assert!(prompt.starts_with("Mention the warranty.\n\n"));
    }
}
