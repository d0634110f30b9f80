use actix_web::{delete, get, post, put, web, HttpResponse};
use database::{
    consts::consts::DocumentId,
    database::repository::PersonRepository,
    model::person::Person,
    persistence::storage::{DeleteResult, UpdateResult},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// Write results keep the field names existing clients already parse

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct InsertOneResponse {
    #[serde(rename = "InsertedID")]
    pub inserted_id: DocumentId,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct UpdateResponse {
    #[serde(rename = "MatchedCount")]
    pub matched_count: u64,
    #[serde(rename = "ModifiedCount")]
    pub modified_count: u64,
    /// Updates never upsert, always 0
    #[serde(rename = "UpsertedCount")]
    pub upserted_count: u64,
    #[serde(rename = "UpsertedID")]
    pub upserted_id: Option<DocumentId>,
}

impl From<UpdateResult> for UpdateResponse {
    fn from(result: UpdateResult) -> Self {
        UpdateResponse {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct DeleteResponse {
    #[serde(rename = "DeletedCount")]
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteResponse {
    fn from(result: DeleteResult) -> Self {
        DeleteResponse {
            deleted_count: result.deleted_count,
        }
    }
}

/// POST /people -- `{"dni": "33333333", "firstname": "Nahuel", "lastname": "Avalos", "adress": {"street": "Avenida Siempreviva", "number": "742"}}`
#[post("/people")]
pub async fn create_person(
    repository: web::Data<PersonRepository>,
    person: web::Json<Person>,
) -> Result<HttpResponse, ApiError> {
    let inserted_id = repository.create(person.into_inner()).await?;

    Ok(HttpResponse::Ok().json(InsertOneResponse { inserted_id }))
}

/// GET /people
#[get("/people")]
pub async fn get_people(
    repository: web::Data<PersonRepository>,
) -> Result<HttpResponse, ApiError> {
    let people = repository.list_all().await?;

    Ok(HttpResponse::Ok().json(people))
}

/// GET /people/{dni}
#[get("/people/{dni}")]
pub async fn get_person(
    repository: web::Data<PersonRepository>,
    dni: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let person = repository.find_by_dni(&dni).await?;

    Ok(HttpResponse::Ok().json(person))
}

/// PUT /people/{dni} -- partial person, only non-empty fields are written
#[put("/people/{dni}")]
pub async fn update_person(
    repository: web::Data<PersonRepository>,
    dni: web::Path<String>,
    patch: web::Json<Person>,
) -> Result<HttpResponse, ApiError> {
    let result = repository.update(&dni, patch.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UpdateResponse::from(result)))
}

/// DELETE /people/{dni}
#[delete("/people/{dni}")]
pub async fn delete_person(
    repository: web::Data<PersonRepository>,
    dni: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let result = repository.delete_by_dni(&dni).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse::from(result)))
}
