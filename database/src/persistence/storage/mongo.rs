use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, Document as BsonDocument},
    Client, Collection,
};
use serde_json::Value;

use crate::consts::consts::{
    DocumentId, DEFAULT_COLLECTION, DEFAULT_DATABASE, DEFAULT_MONGO_URI, ID_FIELD,
};

use super::{
    filter::Filter, DeleteResult, Document, DocumentStore, StorageResult, StoreError,
    UpdateResult,
};

#[derive(Debug, Clone)]
pub struct MongoOptions {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl MongoOptions {
    pub fn set_uri(mut self, uri: String) -> Self {
        self.uri = uri;
        self
    }

    pub fn set_database(mut self, database: String) -> Self {
        self.database = database;
        self
    }

    pub fn set_collection(mut self, collection: String) -> Self {
        self.collection = collection;
        self
    }
}

impl Default for MongoOptions {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// Single collection of a MongoDB deployment.
///
/// The driver pools connections internally, one `MongoStore` is meant to live for the whole
/// process and be shared between requests.
pub struct MongoStore {
    collection: Collection<BsonDocument>,
}

impl MongoStore {
    pub async fn connect(options: &MongoOptions) -> StorageResult<Self> {
        let client = Client::with_uri_str(&options.uri)
            .await
            .map_err(backend_error)?;

        log::info!(
            "MongoDB client ready [Database: {}, Collection: {}]",
            options.database,
            options.collection
        );

        Ok(Self::from_client(&client, options))
    }

    pub fn from_client(client: &Client, options: &MongoOptions) -> Self {
        Self {
            collection: client
                .database(&options.database)
                .collection::<BsonDocument>(&options.collection),
        }
    }
}

fn backend_error(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn to_bson_filter(filter: &Filter) -> StorageResult<BsonDocument> {
    let mut document = BsonDocument::new();

    for (field, value) in filter.conditions() {
        let value = bson::to_bson(value).map_err(|err| StoreError::Encode(err.to_string()))?;

        document.insert(field.clone(), value);
    }

    Ok(document)
}

fn to_bson_document(mut document: Document) -> StorageResult<BsonDocument> {
    // The server assigns `_id`, never forward one
    document.remove(ID_FIELD);

    bson::to_document(&document).map_err(|err| StoreError::Encode(err.to_string()))
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(object_id) => object_id.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

/// ObjectIds are rendered as their hex string, everything else as relaxed extended JSON
fn from_bson_document(mut document: BsonDocument) -> StorageResult<Document> {
    let id = document.remove(ID_FIELD).map(id_to_string);

    let mut json = match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => {
            return Err(StoreError::Decode {
                id: id.unwrap_or_default(),
                message: "stored value is not a document".to_string(),
            })
        }
    };

    if let Some(id) = id {
        json.insert(ID_FIELD.to_string(), Value::String(id));
    }

    Ok(json)
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[tracing::instrument(skip(self))]
    async fn find(&self, filter: &Filter) -> StorageResult<Vec<Document>> {
        let cursor = self
            .collection
            .find(to_bson_filter(filter)?)
            .await
            .map_err(backend_error)?;

        let documents: Vec<BsonDocument> = cursor.try_collect().await.map_err(backend_error)?;

        documents.into_iter().map(from_bson_document).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn find_one(&self, filter: &Filter) -> StorageResult<Option<Document>> {
        let document = self
            .collection
            .find_one(to_bson_filter(filter)?)
            .await
            .map_err(backend_error)?;

        document.map(from_bson_document).transpose()
    }

    #[tracing::instrument(skip(self, document))]
    async fn insert_one(&self, document: Document) -> StorageResult<DocumentId> {
        let result = self
            .collection
            .insert_one(to_bson_document(document)?)
            .await
            .map_err(backend_error)?;

        Ok(DocumentId(id_to_string(result.inserted_id)))
    }

    #[tracing::instrument(skip(self, set))]
    async fn update_one(&self, filter: &Filter, set: Document) -> StorageResult<UpdateResult> {
        let update = doc! { "$set": to_bson_document(set)? };

        let result = self
            .collection
            .update_one(to_bson_filter(filter)?, update)
            .await
            .map_err(backend_error)?;

        Ok(UpdateResult {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete_one(&self, filter: &Filter) -> StorageResult<DeleteResult> {
        let result = self
            .collection
            .delete_one(to_bson_filter(filter)?)
            .await
            .map_err(backend_error)?;

        Ok(DeleteResult {
            deleted_count: result.deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    use super::*;

    #[test]
    fn filter_becomes_equality_document() {
        let filter = Filter::all().eq("dni", "33333333");

        let document = to_bson_filter(&filter).unwrap();

        assert_eq!(document, doc! { "dni": "33333333" });
    }

    #[test]
    fn outgoing_documents_never_carry_an_id() {
        let mut document = Document::new();
        document.insert("_id".to_string(), json!("client"));
        document.insert("dni".to_string(), json!("1"));

        let bson_document = to_bson_document(document).unwrap();

        assert_eq!(bson_document, doc! { "dni": "1" });
    }

    #[test]
    fn object_ids_are_read_back_as_hex() {
        let object_id = ObjectId::new();
        let stored = doc! {
            "_id": object_id,
            "dni": "1",
            "adress": { "street": "Avenida Siempreviva", "number": "742" },
        };

        let document = from_bson_document(stored).unwrap();

        assert_eq!(document.get("_id"), Some(&json!(object_id.to_hex())));
        assert_eq!(document.get("dni"), Some(&json!("1")));
        assert_eq!(
            document.get("adress"),
            Some(&json!({ "street": "Avenida Siempreviva", "number": "742" }))
        );
    }

    #[test]
    fn default_options_point_at_the_people_collection() {
        let options = MongoOptions::default();

        assert_eq!(options.uri, "mongodb://localhost:27017");
        assert_eq!(options.database, "golang");
        assert_eq!(options.collection, "people");
    }
}
