/// Checks a type, field, argument or enum value name against
/// `/^[_a-zA-Z][_a-zA-Z0-9]*$/`.
pub fn is_valid_name(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns the schema construction error for an invalid name.
pub(crate) fn assert_valid_name(name: &str) -> Result<(), String> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(format!(
            "Names must match /^[_a-zA-Z][_a-zA-Z0-9]*$/ but \"{name}\" does not.",
        ))
    }
}

#[test]
fn test_name_is_valid() {
    assert!(is_valid_name("Foo"));
    assert!(is_valid_name("foo42"));
    assert!(is_valid_name("_Foo"));
    assert!(is_valid_name("_Foo42"));
    assert!(is_valid_name("_foo42"));
    assert!(is_valid_name("_42Foo"));

    assert!(!is_valid_name("42_Foo"));
    assert!(!is_valid_name("Foo-42"));
    assert!(!is_valid_name("Foo???"));
    assert!(!is_valid_name(""));
}

#[test]
fn test_assert_valid_name_message() {
    assert_eq!(
        assert_valid_name("bad-name"),
        Err("Names must match /^[_a-zA-Z][_a-zA-Z0-9]*$/ but \"bad-name\" does not.".into()),
    );
}
