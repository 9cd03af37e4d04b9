use flatsyntax::{value, Error, ErrorCode, Extra, Syntax, Value};

fn person() -> Syntax {
    Syntax::object(vec![
        ("name", Syntax::string()),
        ("age", Syntax::number()),
        ("is_programmer", Syntax::boolean()),
        ("friends", Syntax::array(Syntax::string())),
    ])
    .unwrap()
}

fn relaxed_person() -> Syntax {
    Syntax::object(vec![
        ("name", Syntax::optional(Syntax::string(), "Unknown")),
        ("age", Syntax::optional(Syntax::number(), 0)),
        ("is_programmer", Syntax::optional(Syntax::boolean(), false)),
        (
            "friends",
            Syntax::optional(Syntax::array(Syntax::string()), Value::Array(vec![])),
        ),
    ])
    .unwrap()
}

fn repos() -> Syntax {
    let repo = Syntax::object(vec![("name", Syntax::string()), ("stars", Syntax::number())])
        .unwrap();
    Syntax::array(repo)
}

#[test]
fn test_parse_person() {
    let value = person().parse("Foo:76:yes:Bar,Baz").unwrap();
    assert_eq!(
        value,
        value!({ "name": "Foo", "age": 76, "is_programmer": true, "friends": ["Bar", "Baz"] })
    );
}

#[test]
fn test_parse_quoted_items() {
    let value = person()
        .parse(r#""Foo:Bar:Baz":76:no:"Bar,Baz",lorem"#)
        .unwrap();
    assert_eq!(value.get("name"), Some(&Value::from("Foo:Bar:Baz")));
    assert_eq!(value.get("friends"), Some(&value!(["Bar,Baz", "lorem"])));
}

#[test]
fn test_invalid_field_position() {
    let err = person().parse("Foo:76::Bar,Baz").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidField));
    assert_eq!(err.position(), Some(7));
    assert_eq!(
        err.extra(),
        Some(&Extra::InvalidField {
            field: "is_programmer".to_string(),
            item: String::new(),
            position: 0,
        })
    );
    assert_eq!(err.cause().and_then(Error::code), Some(ErrorCode::NotBoolean));
}

#[test]
fn test_error_position_inside_quotes() {
    let err = person().parse(r#""Foo":x:yes:Bar"#).unwrap_err();
    assert_eq!(err.position(), Some(6));
}

#[test]
fn test_error_positions_are_characters() {
    let err = person().parse("Zoé:x").unwrap_err();
    assert_eq!(err.position(), Some(4));
}

#[test]
fn test_additional_items() {
    let err = person()
        .parse("Foo:76:false:Bar,Baz:additional")
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AdditionalItems));
    assert_eq!(err.position(), Some(20));
    assert_eq!(
        err.to_string(),
        "Error while parsing 'Foo:76:false:Bar,Baz:additional' as Object {name: String, age: Number, \
         is_programmer: Boolean, friends: Array of (String) separated by ','} separated by ':' \
         at character 20: Additional items with no corresponding fields"
    );
    assert_eq!(
        serde_json::to_value(err.extra().unwrap()).unwrap(),
        serde_json::json!({ "type": "additional-items", "items": ["additional"], "position": 20 })
    );
}

#[test]
fn test_additional_items_at_third_token() {
    let pair = Syntax::object(vec![("a", Syntax::string()), ("b", Syntax::string())]).unwrap();
    let err = pair.parse("x:y:z").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AdditionalItems));
    assert_eq!(err.position(), Some(3));

    let flag = Syntax::object(vec![("on", Syntax::optional(Syntax::boolean(), false))]).unwrap();
    let err = flag.parse("maybe").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AdditionalItems));
    assert_eq!(err.position(), Some(0));
}

#[test]
fn test_missing_field() {
    let syntax = Syntax::object(vec![
        ("name", Syntax::string()),
        ("is_programmer", Syntax::boolean()),
        ("age", Syntax::number()),
    ])
    .unwrap();
    let err = syntax.parse("Foo:yes").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MissingField));
    assert_eq!(err.position(), Some(8));
    assert_eq!(err.message(), "No item left for field 'age'");
    assert_eq!(
        err.extra(),
        Some(&Extra::MissingField {
            field: "age".to_string(),
            position: 8,
        })
    );
}

#[test]
fn test_required_field_missing_from_single_item() {
    let syntax = Syntax::object(vec![("a", Syntax::string()), ("b", Syntax::number())]).unwrap();
    let err = syntax.parse("X").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::MissingField));
    assert_eq!(err.position(), Some(2));
}

#[test]
fn test_optional_field_steps_aside() {
    let syntax = Syntax::object(vec![
        ("a", Syntax::string()),
        ("b", Syntax::optional(Syntax::number(), 0)),
        ("c", Syntax::string()),
    ])
    .unwrap();
    assert_eq!(
        syntax.parse("X:Y").unwrap(),
        value!({ "a": "X", "b": 0, "c": "Y" })
    );
    assert_eq!(
        syntax.parse("X:5:Y").unwrap(),
        value!({ "a": "X", "b": 5, "c": "Y" })
    );
}

#[test]
fn test_earliest_optional_field_wins() {
    let syntax = Syntax::object(vec![
        ("first", Syntax::optional(Syntax::number(), 1)),
        ("second", Syntax::optional(Syntax::number(), 2)),
    ])
    .unwrap();
    assert_eq!(
        syntax.parse("7").unwrap(),
        value!({ "first": 7, "second": 2 })
    );
}

#[test]
fn test_all_optional_fields() {
    let syntax = relaxed_person();
    assert_eq!(
        syntax.parse("").unwrap(),
        value!({ "name": "Unknown", "age": 0, "is_programmer": false, "friends": [] })
    );
    assert_eq!(
        syntax.parse("Me:code").unwrap(),
        value!({ "name": "Me", "age": 0, "is_programmer": false, "friends": ["code"] })
    );
    assert_eq!(
        syntax.parse("27:23:yes").unwrap(),
        value!({ "name": "27", "age": 23, "is_programmer": true, "friends": [] })
    );
}

#[test]
fn test_array_of_numbers() {
    let numbers = Syntax::array(Syntax::number());
    assert_eq!(
        numbers.parse("5,-6.5,20.4").unwrap(),
        value!([5, (-6.5), 20.4])
    );

    let err = numbers.parse("5,nan,20.4").unwrap_err();
    assert_eq!(err.position(), Some(2));
    assert_eq!(err.root_cause().code(), Some(ErrorCode::NotNumeric));
    assert_eq!(
        err.to_string(),
        "Error while parsing '5,nan,20.4' as Array of (Number) separated by ',' at character 2: \
         Unable to parse the item 'nan'"
    );
}

#[test]
fn test_empty_array_text_is_one_empty_item() {
    let err = Syntax::array(Syntax::string()).parse("").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidItem));
    assert_eq!(err.root_cause().code(), Some(ErrorCode::EmptyInput));

    let optional = Syntax::array(Syntax::optional(Syntax::string(), "none"));
    assert_eq!(optional.parse("").unwrap(), value!(["none"]));
}

#[test]
fn test_multichar_separators() {
    let syntax = Syntax::object_with(
        vec![
            ("name", Syntax::string()),
            ("tags", Syntax::array_with(Syntax::string(), ", ")),
        ],
        "||",
    )
    .unwrap();
    let value = syntax.parse("Foo||a, b, c").unwrap();
    assert_eq!(value.get("tags"), Some(&value!(["a", "b", "c"])));
    assert_eq!(syntax.dump(&value).unwrap(), "Foo||a, b, c");
}

#[test]
fn test_nested_error_chain() {
    let err = repos().parse("flat:12,grid:x").unwrap_err();
    assert_eq!(err.position(), Some(13));

    let codes: Vec<_> = err.chain().filter_map(Error::code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::InvalidItem, ErrorCode::InvalidField, ErrorCode::NotNumeric]
    );
    let positions: Vec<_> = err.chain().filter_map(Error::position).collect();
    assert_eq!(positions, vec![13, 5, 0]);
}

#[test]
fn test_dump_person() {
    let syntax = person();
    let value = value!({ "name": "Foo:Bar", "age": 76, "is_programmer": false, "friends": ["Bar,Baz", "lorem"] });
    let text = syntax.dump(&value).unwrap();
    assert_eq!(text, r#""Foo:Bar":76:false:"Bar,Baz",lorem"#);
    assert_eq!(syntax.parse(&text).unwrap(), value);
}

#[test]
fn test_dump_follows_field_order() {
    let value = value!({ "friends": ["x"], "extra": 1, "is_programmer": true, "age": 3.5, "name": "Foo" });
    assert_eq!(person().dump(&value).unwrap(), "Foo:3.5:true:x");
}

#[test]
fn test_dump_missing_field() {
    let err = person()
        .dump(&value!({ "name": "Foo", "age": 76 }))
        .unwrap_err();
    assert!(err.is_dump());
    assert_eq!(err.code(), Some(ErrorCode::MissingField));
    assert_eq!(err.message(), "Missing field 'is_programmer'");
}

#[test]
fn test_dump_invalid_field() {
    let err = person()
        .dump(&value!({ "name": "Foo", "age": "old", "is_programmer": true, "friends": ["x"] }))
        .unwrap_err();
    assert_eq!(err.message(), "Unable to dump the field 'age'");
    let cause = err.cause().unwrap();
    assert_eq!(cause.code(), Some(ErrorCode::TypeMismatch));
    assert_eq!(cause.message(), "Not a numeric value");
}

#[test]
fn test_dump_invalid_item() {
    let err = Syntax::array(Syntax::boolean())
        .dump(&value!([true, 15]))
        .unwrap_err();
    assert_eq!(err.message(), "Unable to dump item at key 1");
    assert_eq!(
        err.to_string(),
        "Error while dumping some input as Array of (Boolean) separated by ',': Unable to dump item at key 1"
    );
}

#[test]
fn test_dump_rejects_text_that_does_not_read_back() {
    let syntax = Syntax::object(vec![
        ("a", Syntax::string()),
        ("b", Syntax::optional(Syntax::string(), "z")),
    ])
    .unwrap();
    // "x:" would read b as its default and leave an item over
    let err = syntax.dump(&value!({ "a": "x", "b": "" })).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidField));
    assert_eq!(err.message(), "Unable to dump the field 'b'");
    assert_eq!(syntax.dump(&value!({ "a": "x", "b": "z" })).unwrap(), "x:z");

    let words = Syntax::array(Syntax::string());
    for value in [value!(["a[", "b"]), value!([""]), value!(["(", ")"])] {
        let err = words.dump(&value).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidItem), "{}", value);
    }
}

#[test]
fn test_relaxed_person_drops_trailing_defaults() {
    let syntax = relaxed_person();
    let value = syntax.parse("Foo").unwrap();
    assert_eq!(value.get("friends"), Some(&value!([])));
    let text = syntax.dump(&value).unwrap();
    assert_eq!(text, "Foo:0:false");
    assert_eq!(syntax.parse(&text).unwrap(), value);

    let tail = Syntax::object(vec![
        ("name", Syntax::string()),
        ("tags", Syntax::optional(Syntax::array(Syntax::string()), Value::Array(vec![]))),
        ("links", Syntax::optional(Syntax::array(Syntax::string()), Value::Array(vec![]))),
    ])
    .unwrap();
    let value = value!({ "name": "Foo", "tags": [], "links": [] });
    assert_eq!(tail.dump(&value).unwrap(), "Foo");
    assert_eq!(tail.parse("Foo").unwrap(), value);
}

#[test]
fn test_optional_defaults_do_not_affect_dump() {
    let syntax = relaxed_person();
    let value = syntax.parse("Me:code").unwrap();
    assert_eq!(syntax.dump(&value).unwrap(), "Me:0:false:code");
}

#[test]
fn test_choice_and_constant() {
    let limit = Syntax::choice(vec![
        ("unlimited", Syntax::constant_ignore_case("none")),
        ("count", Syntax::number()),
    ])
    .unwrap();
    assert_eq!(limit.parse("NONE").unwrap(), Value::from("none"));
    assert_eq!(limit.parse("12").unwrap(), Value::from(12));

    let err = limit.parse("many").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NoMatch));

    let ambiguous = Syntax::choice(vec![("word", Syntax::string()), ("count", Syntax::number())])
        .unwrap();
    let err = ambiguous.parse("12").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::AmbiguousMatch));
    assert_eq!(
        err.message(),
        "Unable to choose an option: '12' can be parsed as many options: word (String), count (Number)"
    );
}

#[test]
fn test_choice_inside_object() {
    let syntax = Syntax::object(vec![
        ("name", Syntax::string()),
        (
            "limit",
            Syntax::choice(vec![
                ("unlimited", Syntax::constant("none")),
                ("count", Syntax::number()),
            ])
            .unwrap(),
        ),
    ])
    .unwrap();
    let value = syntax.parse("Foo:none").unwrap();
    assert_eq!(value.get("limit"), Some(&Value::from("none")));
    assert_eq!(syntax.dump(&value!({ "name": "Foo", "limit": 3 })).unwrap(), "Foo:3");
}

#[test]
fn test_field_lookup() {
    let syntax = Syntax::object(vec![("owner", Syntax::string()), ("repos", repos())]).unwrap();
    assert_eq!(syntax.field("repos.stars").unwrap(), &Syntax::Number);
    let err = syntax.field("repos.forks").unwrap_err();
    assert_eq!(err.to_string(), "Invalid syntax definition: No field with name 'forks' is found");
}

#[test]
fn test_syntax_is_shareable_across_threads() {
    let syntax = std::sync::Arc::new(relaxed_person());
    let handles: Vec<_> = ["Me:code", "27:23:yes", ""]
        .into_iter()
        .map(|text| {
            let syntax = std::sync::Arc::clone(&syntax);
            std::thread::spawn(move || syntax.parse(text).unwrap())
        })
        .collect();
    let values: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(values[2].get("name"), Some(&Value::from("Unknown")));
}
