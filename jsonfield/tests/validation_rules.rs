use jsonfield::{LeafField, PathFieldGroup, SubmittedForm, ValidationRule};

fn address() -> PathFieldGroup {
    PathFieldGroup::new("Address")
        .field(
            LeafField::new("Street")
                .rule(ValidationRule::Required)
                .rule(ValidationRule::Length { min: None, max: Some(20) }),
        )
        .field(
            PathFieldGroup::new("Location")
                .field(LeafField::new("Latitude").rule(ValidationRule::Range {
                    min: Some(-90.0),
                    max: Some(90.0),
                }))
                .field(LeafField::new("Longitude")),
        )
        .field(LeafField::new("Website").rule(ValidationRule::Url))
        .bound()
}

#[test]
fn rule_keys_are_prefixed_with_group_path() {
    let rules = address().rules();
    let keys: Vec<&str> = rules.keys().map(String::as_str).collect();
    assert_eq!(keys, ["address->location->latitude", "address->street", "address->website"]);
    assert_eq!(rules["address->street"].len(), 2);
}

#[test]
fn anonymous_wrapper_leaves_rule_keys_unprefixed() {
    let wrapper = PathFieldGroup::make("", vec![LeafField::new("Street").rule(ValidationRule::Required).into()]).bound();
    assert!(wrapper.rules().contains_key("street"));
}

#[test]
fn valid_submission_passes() {
    let form = SubmittedForm::new()
        .with("address->street", "Main Street 1")
        .with("address->location->latitude", "52.37")
        .with("address->website", "https://example.com");
    assert!(address().validate(&form).is_ok());
}

#[test]
fn issues_are_keyed_by_working_path() {
    let form = SubmittedForm::new()
        .with("address->location->latitude", "120")
        .with("address->website", "not a url");
    let err = address().validate(&form).unwrap_err();

    let codes: Vec<(&str, &str)> = err
        .issues
        .iter()
        .map(|issue| (issue.field.as_str(), issue.code.as_str()))
        .collect();
    assert_eq!(
        codes,
        [
            ("address->street", "validation.required"),
            ("address->location->latitude", "validation.range"),
            ("address->website", "validation.url"),
        ]
    );
    assert_eq!(err.for_field("address->street").count(), 1);
}

#[test]
fn optional_rules_ignore_missing_values() {
    let form = SubmittedForm::new().with("address->street", "Main");
    assert!(address().validate(&form).is_ok());
}
