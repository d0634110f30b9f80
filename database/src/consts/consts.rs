use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
/// Identifier assigned by the document store on insert. Opaque to callers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new() -> DocumentId {
        DocumentId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Stored field names, these must match existing data bit for bit
pub const ID_FIELD: &str = "_id";
pub const DNI_FIELD: &str = "dni";
pub const FIRST_NAME_FIELD: &str = "firstname";
pub const LAST_NAME_FIELD: &str = "lastname";
/// Misspelt in the stored documents, kept for compatibility
pub const ADDRESS_FIELD: &str = "adress";

// Values
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "golang";
pub const DEFAULT_COLLECTION: &str = "people";
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);
