//! Delivery address captured at checkout.

use serde::{Deserialize, Serialize};

/// Delivery details the shopper fills in before paying.
///
/// All five fields are required; [`DeliveryAddress::missing_fields`]
/// drives the pre-payment validation in checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub full_name: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub postal_code: String,
}

impl DeliveryAddress {
    /// Names of the fields that are blank after trimming.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields: [(&'static str, &str); 5] = [
            ("fullName", &self.full_name),
            ("phone", &self.phone),
            ("addressLine", &self.address_line),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Whether every field is filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Single-line summary sent to the backend and shown on receipts.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}, {}, {}, {}. Phone: {}",
            self.full_name, self.address_line, self.city, self.postal_code, self.phone
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> DeliveryAddress {
        DeliveryAddress {
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            address_line: "12 Rose Lane".to_string(),
            city: "Bengaluru".to_string(),
            postal_code: "560001".to_string(),
        }
    }

    #[test]
    fn test_complete_address_has_no_missing_fields() {
        assert!(complete().is_complete());
    }

    #[test]
    fn test_blank_and_whitespace_fields_are_missing() {
        let mut address = complete();
        address.phone = "   ".to_string();
        address.city = String::new();
        assert_eq!(address.missing_fields(), vec!["phone", "city"]);
        assert!(!address.is_complete());
    }

    #[test]
    fn test_summary_format() {
        assert_eq!(
            complete().summary(),
            "Asha Rao, 12 Rose Lane, Bengaluru, 560001. Phone: 9876543210"
        );
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(complete()).expect("serialize");
        assert!(json.get("fullName").is_some());
        assert!(json.get("postalCode").is_some());
    }
}
