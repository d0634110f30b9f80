use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    consts::consts::{DocumentId, ID_FIELD},
    persistence::storage::{Document, StorageResult, StoreError},
};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Address {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub street: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub number: String,
}

impl Address {
    pub fn new(street: &str, number: &str) -> Self {
        Address {
            street: street.to_string(),
            number: number.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.street.is_empty() && self.number.is_empty()
    }
}

/// A person as stored in the `people` collection and exchanged over HTTP.
///
/// Blank values are never serialised: an empty string, an empty address and a missing value
/// all mean "absent". Field names match the stored documents, including `adress`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Person {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "string_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<DocumentId>,

    /// Natural key, not unique
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dni: String,

    #[serde(rename = "firstname", default, skip_serializing_if = "is_blank")]
    pub first_name: Option<String>,

    #[serde(rename = "lastname", default, skip_serializing_if = "is_blank")]
    pub last_name: Option<String>,

    #[serde(
        rename = "adress",
        alias = "address",
        default,
        skip_serializing_if = "is_blank_address"
    )]
    pub address: Option<Address>,
}

/// Ids are assigned by the store, an id of any other shape on input is dropped, not rejected
fn string_id<'de, D>(deserializer: D) -> Result<Option<DocumentId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(Some(DocumentId(id))),
        _ => Ok(None),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn is_blank_address(value: &Option<Address>) -> bool {
    value.as_ref().map_or(true, Address::is_empty)
}

impl Person {
    pub fn new(dni: &str, first_name: Option<&str>, last_name: Option<&str>) -> Self {
        Person {
            id: None,
            dni: dni.to_string(),
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
            address: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Storage form of the person. The id is owned by the store and is left out.
    pub fn to_document(&self) -> StorageResult<Document> {
        let person = Person {
            id: None,
            ..self.clone()
        };

        match serde_json::to_value(&person).map_err(|err| StoreError::Encode(err.to_string()))? {
            Value::Object(document) => Ok(document),
            other => Err(StoreError::Encode(format!(
                "person serialised to a non object value: {}",
                other
            ))),
        }
    }

    pub fn from_document(document: Document) -> StorageResult<Person> {
        let id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        serde_json::from_value(Value::Object(document)).map_err(|err| StoreError::Decode {
            id,
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        }
    }

    mod wire_format {
        use super::*;

        #[test]
        fn decodes_the_documented_example_payload() {
            let payload = r#"{"dni": "33333333", "firstname":"Nahuel", "lastname":"Avalos", "adress":{"street":"Avenida Siempreviva","number":"742"}}"#;

            let person: Person = serde_json::from_str(payload).unwrap();

            assert_eq!(
                person,
                Person::new("33333333", Some("Nahuel"), Some("Avalos"))
                    .with_address(Address::new("Avenida Siempreviva", "742"))
            );
        }

        #[test]
        fn accepts_correctly_spelt_address() {
            let payload = r#"{"dni": "1", "address":{"street":"Calle","number":"1"}}"#;

            let person: Person = serde_json::from_str(payload).unwrap();

            assert_eq!(person.address, Some(Address::new("Calle", "1")));
        }

        #[test]
        fn non_string_ids_are_dropped() {
            for payload in [
                r#"{"_id": 5, "dni": "1"}"#,
                r#"{"_id": {"$oid": "65f1c0ffee0000000000beef"}, "dni": "1"}"#,
                r#"{"_id": null, "dni": "1"}"#,
            ] {
                let person: Person = serde_json::from_str(payload).unwrap();

                assert_eq!(person, Person::new("1", None, None));
            }
        }

        #[test]
        fn blank_values_are_omitted() {
            let person = Person {
                id: None,
                dni: "1".to_string(),
                first_name: Some(String::new()),
                last_name: None,
                address: Some(Address::default()),
            };

            let encoded = serde_json::to_value(&person).unwrap();

            assert_eq!(encoded, json!({ "dni": "1" }));
        }

        #[test]
        fn id_is_encoded_as_underscore_id() {
            let person = Person {
                id: Some(DocumentId("abc".to_string())),
                ..Person::new("1", None, None)
            };

            let encoded = serde_json::to_value(&person).unwrap();

            assert_eq!(encoded, json!({ "_id": "abc", "dni": "1" }));
        }
    }

    mod document_conversion {
        use super::*;

        #[test]
        fn to_document_drops_the_id() {
            let person = Person {
                id: Some(DocumentId("client-supplied".to_string())),
                ..Person::new("1", Some("A"), None)
            };

            let stored = person.to_document().unwrap();

            assert_eq!(stored, document(json!({ "dni": "1", "firstname": "A" })));
        }

        #[test]
        fn from_document_reads_the_id() {
            let person = Person::from_document(document(json!({
                "_id": "abc",
                "dni": "1",
                "lastname": "B",
            })))
            .unwrap();

            assert_eq!(person.id, Some(DocumentId("abc".to_string())));
            assert_eq!(person.last_name.as_deref(), Some("B"));
        }

        #[test]
        fn from_document_reports_the_broken_document() {
            let error = Person::from_document(document(json!({
                "_id": "abc",
                "firstname": 42,
            })))
            .expect_err("a number is not a name");

            assert!(matches!(error, StoreError::Decode { ref id, .. } if id == "abc"));
        }
    }
}
