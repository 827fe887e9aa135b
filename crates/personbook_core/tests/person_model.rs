use personbook_core::{DeleteSummary, NewPerson, Person, PersonValidationError};

#[test]
fn new_person_builder_sets_optional_fields() {
    let input = NewPerson::new("Ada").with_age(36).with_foods(["tea", "cake"]);

    assert_eq!(input.name, "Ada");
    assert_eq!(input.age, Some(36));
    assert_eq!(input.favorite_foods, vec!["tea", "cake"]);
    assert!(input.validate().is_ok());
}

#[test]
fn new_person_deserializes_with_defaults() {
    let input: NewPerson = serde_json::from_value(serde_json::json!({ "name": "Ada" })).unwrap();

    assert_eq!(input, NewPerson::new("Ada"));
}

#[test]
fn empty_name_fails_validation() {
    assert_eq!(
        NewPerson::new("").validate(),
        Err(PersonValidationError::MissingName)
    );
}

#[test]
fn whitespace_only_name_passes_validation() {
    assert!(NewPerson::new("\t ").validate().is_ok());
}

#[test]
fn person_uses_document_field_names() {
    let value = serde_json::json!({
        "_id": "11111111-2222-4333-8444-555555555555",
        "name": "Ada",
        "age": 36,
        "favoriteFoods": ["tea", "cake"]
    });

    let mut person: Person = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(person.id().to_string(), "11111111-2222-4333-8444-555555555555");
    assert_eq!(serde_json::to_value(&person).unwrap(), value);

    person.add_favorite_food("pie");
    assert_eq!(person.favorite_foods, vec!["tea", "cake", "pie"]);
}

#[test]
fn delete_summary_wire_name() {
    let json = serde_json::to_value(DeleteSummary { deleted_count: 3 }).unwrap();
    assert_eq!(json, serde_json::json!({ "deletedCount": 3 }));
}
