//! Domain types shared across entities, services and handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Canonical quotation status vocabulary.
///
/// `submitted` and `accepted` circulate in older exports and are accepted on
/// input as aliases of `pending` and `approved`; the database only ever
/// stores canonical values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QuoteStatus {
    Draft,
    #[serde(alias = "submitted")]
    #[strum(to_string = "pending", serialize = "submitted")]
    Pending,
    UnderReview,
    #[serde(alias = "accepted")]
    #[strum(to_string = "approved", serialize = "accepted")]
    Approved,
    Rejected,
}

impl QuoteStatus {
    /// Parses a status string, folding legacy aliases onto the canonical
    /// vocabulary.
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        value.parse().map_err(|_| {
            ServiceError::ValidationError(format!("Unknown quotation status: {value}"))
        })
    }
}

/// Caller roles. Admins see and may mutate every row; ordinary users are
/// restricted to rows they created.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    User,
}

/// Template types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TemplateType {
    Default,
    Custom,
}

/// Kind of a dynamic template field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Boolean,
    Select,
}

/// Optional validation rules attached to a field definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// A single dynamic field declared by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

/// Structural checks applied whenever a field-definition list is written.
pub fn validate_field_defs(fields: &[FieldDef]) -> Result<(), ServiceError> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        let name = field.name.trim();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Template field names must not be empty".to_string(),
            ));
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(ServiceError::ValidationError(format!(
                "Duplicate template field name: {name}"
            )));
        }
        match field.kind {
            FieldKind::Select => {
                if field.options.is_empty() {
                    return Err(ServiceError::ValidationError(format!(
                        "Select field '{name}' requires at least one option"
                    )));
                }
            }
            _ => {
                if !field.options.is_empty() {
                    return Err(ServiceError::ValidationError(format!(
                        "Field '{name}' does not accept options"
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Geo location attached to a quotation's site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl GeoPoint {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return Err(ServiceError::ValidationError(format!(
                "Coordinates out of range: ({}, {})",
                self.lat, self.lng
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_is_canonical() {
        assert_eq!(QuoteStatus::Draft.to_string(), "draft");
        assert_eq!(QuoteStatus::Pending.to_string(), "pending");
        assert_eq!(QuoteStatus::UnderReview.to_string(), "under_review");
        assert_eq!(QuoteStatus::Approved.to_string(), "approved");
        assert_eq!(QuoteStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn status_parse_accepts_legacy_aliases() {
        assert_eq!(QuoteStatus::parse("submitted").unwrap(), QuoteStatus::Pending);
        assert_eq!(QuoteStatus::parse("accepted").unwrap(), QuoteStatus::Approved);
        assert_eq!(QuoteStatus::parse("Pending").unwrap(), QuoteStatus::Pending);
        assert!(QuoteStatus::parse("shipped").is_err());
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
    }

    #[test]
    fn field_defs_reject_duplicates_and_empty_names() {
        let dup = vec![
            FieldDef {
                name: "Voltage".into(),
                kind: FieldKind::Number,
                required: true,
                default_value: None,
                options: vec![],
                validation: None,
            },
            FieldDef {
                name: "voltage".into(),
                kind: FieldKind::Text,
                required: false,
                default_value: None,
                options: vec![],
                validation: None,
            },
        ];
        assert!(validate_field_defs(&dup).is_err());

        let empty = vec![FieldDef {
            name: "  ".into(),
            kind: FieldKind::Text,
            required: false,
            default_value: None,
            options: vec![],
            validation: None,
        }];
        assert!(validate_field_defs(&empty).is_err());
    }

    #[test]
    fn select_fields_require_options() {
        let select = vec![FieldDef {
            name: "connection_type".into(),
            kind: FieldKind::Select,
            required: true,
            default_value: None,
            options: vec![],
            validation: None,
        }];
        assert!(validate_field_defs(&select).is_err());
    }

    #[test]
    fn geo_point_bounds() {
        let ok = GeoPoint {
            lat: 51.5,
            lng: -0.12,
            postcode: Some("EC1A".into()),
            area: None,
        };
        assert!(ok.validate().is_ok());

        let bad = GeoPoint {
            lat: 123.0,
            lng: 0.0,
            postcode: None,
            area: None,
        };
        assert!(bad.validate().is_err());
    }
}
