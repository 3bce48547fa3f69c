use serde::{Deserialize, Serialize};

pub const ROLE_RESTAURANT: &str = "restaurant";
pub const ROLE_CUSTOMER: &str = "customer";

/// Identity cached for the current browser tab.
///
/// Every mandatory field must be a non-empty string; use [`Session::validate`]
/// after deserializing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub restaurant_slug: Option<String>,
}

impl Session {
    /// Returns the name of the first empty mandatory field, if any.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("id", &self.id),
            ("name", &self.name),
            ("email", &self.email),
            ("role", &self.role),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("session field '{}' is empty", field));
            }
        }
        Ok(())
    }

    pub fn is_restaurant(&self) -> bool {
        self.role == ROLE_RESTAURANT
    }

    /// Slug of the restaurant this session manages, ignoring blank values.
    pub fn slug(&self) -> Option<&str> {
        self.restaurant_slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: "admin".to_string(),
            restaurant_slug: None,
        }
    }

    #[test]
    fn test_valid_session() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_blank_field_is_rejected() {
        let mut session = sample();
        session.email = "  ".to_string();
        assert_eq!(session.validate().unwrap_err(), "session field 'email' is empty");
    }

    #[test]
    fn test_slug_uses_camel_case_key() {
        let json = r#"{"id":"r1","name":"Pizza","email":"p@x.io","role":"restaurant","restaurantSlug":"pizza"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(session.is_restaurant());
        assert_eq!(session.slug(), Some("pizza"));
    }
}
