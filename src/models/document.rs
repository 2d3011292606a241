use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

/// Acknowledgment returned by the create endpoints.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InsertAck {
    pub acknowledged: bool,
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
}

impl InsertAck {
    pub fn new(inserted_id: Bson) -> Self {
        let inserted_id = match inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}
