use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Documento da collection "customer_users"
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub phone_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// bcrypt hash; None until the customer sets a password
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<BsonDateTime>,
}

impl UserRecord {
    pub fn new(phone_number: &str, name: &str, email: &str) -> Self {
        Self {
            id: ObjectId::new(),
            phone_number: phone_number.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: None,
            created_at: Some(BsonDateTime::now()),
            updated_at: None,
        }
    }
}
