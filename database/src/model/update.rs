use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    consts::consts::{ADDRESS_FIELD, DNI_FIELD, FIRST_NAME_FIELD, LAST_NAME_FIELD},
    persistence::storage::{Document, StorageResult, StoreError},
};

use super::person::{Address, Person};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum UpdateStatement<T> {
    Set(T),
    NoChanges,
}

impl<T> UpdateStatement<T> {
    fn is_set(&self) -> bool {
        matches!(self, UpdateStatement::Set(_))
    }
}

/// Field level merge description of a partial update.
///
/// There is no `Unset`: a field missing from the patch is left as it is in storage, it is
/// never cleared.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdatePersonData {
    pub dni: UpdateStatement<String>,
    pub first_name: UpdateStatement<String>,
    pub last_name: UpdateStatement<String>,
    pub address: UpdateStatement<Address>,
}

fn non_empty(value: String) -> UpdateStatement<String> {
    match value.is_empty() {
        true => UpdateStatement::NoChanges,
        false => UpdateStatement::Set(value),
    }
}

impl UpdatePersonData {
    /// Every non-empty field of `patch` is set, everything else is untouched. The patch id is
    /// ignored, ids belong to the store.
    pub fn from_patch(patch: Person) -> Self {
        UpdatePersonData {
            dni: non_empty(patch.dni),
            first_name: patch
                .first_name
                .map_or(UpdateStatement::NoChanges, non_empty),
            last_name: patch
                .last_name
                .map_or(UpdateStatement::NoChanges, non_empty),
            address: match patch.address {
                Some(address) if !address.is_empty() => UpdateStatement::Set(address),
                _ => UpdateStatement::NoChanges,
            },
        }
    }

    pub fn has_changes(&self) -> bool {
        self.dni.is_set() || self.first_name.is_set() || self.last_name.is_set() || self.address.is_set()
    }

    /// Fields to assign on the stored document
    pub fn to_set_document(&self) -> StorageResult<Document> {
        let mut set = Document::new();

        let text_fields = [
            (DNI_FIELD, &self.dni),
            (FIRST_NAME_FIELD, &self.first_name),
            (LAST_NAME_FIELD, &self.last_name),
        ];

        for (field, statement) in text_fields {
            if let UpdateStatement::Set(value) = statement {
                set.insert(field.to_string(), Value::String(value.clone()));
            }
        }

        if let UpdateStatement::Set(address) = &self.address {
            let address =
                serde_json::to_value(address).map_err(|err| StoreError::Encode(err.to_string()))?;

            set.insert(ADDRESS_FIELD.to_string(), address);
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::consts::consts::DocumentId;

    use super::*;

    #[test]
    fn only_non_empty_fields_are_set() {
        // Given a patch that only carries a last name
        let patch = Person::new("1", None, Some("C"));

        // When we build the update
        let update = UpdatePersonData::from_patch(patch);

        // Then the first name and address are untouched
        assert_eq!(
            update,
            UpdatePersonData {
                dni: UpdateStatement::Set("1".to_string()),
                first_name: UpdateStatement::NoChanges,
                last_name: UpdateStatement::Set("C".to_string()),
                address: UpdateStatement::NoChanges,
            }
        );

        assert_eq!(
            update.to_set_document().unwrap(),
            match json!({ "dni": "1", "lastname": "C" }) {
                Value::Object(map) => map,
                _ => unreachable!(),
            }
        );
    }

    #[rstest]
    #[case::all_absent(Person::default())]
    #[case::empty_strings(Person {
        first_name: Some(String::new()),
        last_name: Some(String::new()),
        ..Person::default()
    })]
    #[case::empty_address(Person::default().with_address(Address::default()))]
    #[case::only_an_id(Person {
        id: Some(DocumentId("abc".to_string())),
        ..Person::default()
    })]
    fn blank_patches_have_no_changes(#[case] patch: Person) {
        let update = UpdatePersonData::from_patch(patch);

        assert!(!update.has_changes());
        assert!(update.to_set_document().unwrap().is_empty());
    }

    #[test]
    fn address_is_set_as_a_whole() {
        let patch = Person::default().with_address(Address::new("Calle", "1"));

        let set = UpdatePersonData::from_patch(patch)
            .to_set_document()
            .unwrap();

        assert_eq!(
            set.get("adress"),
            Some(&json!({ "street": "Calle", "number": "1" }))
        );
    }
}
