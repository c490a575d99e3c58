use sqlsplice::{parse_template, render, MarkerKind, MySqlEscaper, ParseError, Value};

fn parse(template: &str, args: &[Value]) -> Result<String, ParseError> {
    render(template, args, &MySqlEscaper::new())
}

#[test]
fn no_markers_returns_the_template_unchanged() {
    let sql = "SELECT id, name FROM users WHERE flags & 7 = 7";

    assert_eq!(parse(sql, &[]).unwrap(), sql);
}

#[test]
fn no_markers_with_arguments_is_an_arity_error() {
    assert!(matches!(
        parse("SELECT 1", &[Value::Int(1)]),
        Err(ParseError::ArityMismatch {
            markers: 0,
            arguments: 1
        })
    ));
}

#[test]
fn arity_mismatch_fails_both_ways() {
    assert!(matches!(
        parse("SELECT ?i, ?i", &[Value::Int(1)]),
        Err(ParseError::ArityMismatch {
            markers: 2,
            arguments: 1
        })
    ));

    assert!(matches!(
        parse("SELECT ?i", &[Value::Int(1), Value::Int(2)]),
        Err(ParseError::ArityMismatch {
            markers: 1,
            arguments: 2
        })
    ));
}

#[test]
fn markers_resolve_in_scan_order() {
    assert_eq!(
        parse(
            "SELECT ?s, ?s, ?s",
            &["first".into(), "second".into(), "third".into()]
        )
        .unwrap(),
        "SELECT 'first', 'second', 'third'"
    );
}

#[test]
fn string_kind_escapes_and_quotes() {
    assert_eq!(
        parse("SELECT ?s", &["it's a \\ test".into()]).unwrap(),
        "SELECT 'it\\'s a \\\\ test'"
    );

    assert_eq!(
        parse("SELECT ?s", &["nul \0 byte".into()]).unwrap(),
        "SELECT 'nul \\0 byte'"
    );

    // multi-byte text survives intact
    assert_eq!(
        parse("SELECT ?s", &["наïve 文字".into()]).unwrap(),
        "SELECT 'наïve 文字'"
    );
}

#[test]
fn string_kind_quotes_stay_balanced() {
    // walks `body` as a single-quoted literal, honoring backslash escapes;
    // true if the literal closes exactly at the end of the statement
    fn literal_is_terminated(body: &str) -> bool {
        let mut chars = body.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '\'' => return chars.next().is_none(),
                _ => {}
            }
        }

        false
    }

    for input in ["", "'", "''", "\\'", "\\", "\0", "a'b\\c", "文'字"] {
        let sql = parse("SELECT ?s", &[input.into()]).unwrap();
        let body = sql.strip_prefix("SELECT '").unwrap();

        assert!(literal_is_terminated(body), "{:?} from {:?}", sql, input);
    }
}

#[test]
fn string_kind_accepts_any_scalar() {
    assert_eq!(parse("?s", &[Value::Null]).unwrap(), "NULL");
    assert_eq!(parse("?s", &[Value::Int(-7)]).unwrap(), "'-7'");
    assert_eq!(parse("?s", &[Value::UInt(7)]).unwrap(), "'7'");
    assert_eq!(parse("?s", &[Value::Float(1.5)]).unwrap(), "'1.5'");
    assert_eq!(parse("?s", &[Value::Bool(true)]).unwrap(), "'1'");
    assert_eq!(parse("?s", &[Value::Bool(false)]).unwrap(), "''");
}

#[test]
fn string_kind_rejects_containers() {
    assert!(matches!(
        parse("?s", &[vec![1i64].into()]),
        Err(ParseError::TypeMismatch {
            marker: "?s",
            actual: "list",
            ..
        })
    ));
}

#[test]
fn integer_kind_truncates_toward_zero() {
    assert_eq!(parse("?i", &[Value::Float(3.999)]).unwrap(), "3");
    assert_eq!(parse("?i", &[Value::Float(-3.999)]).unwrap(), "-3");
    assert_eq!(parse("?i", &["3.999".into()]).unwrap(), "3");
    assert_eq!(parse("?i", &["-3.999".into()]).unwrap(), "-3");
}

#[test]
fn integer_kind_passes_integers_and_null() {
    assert_eq!(parse("?i", &[Value::Null]).unwrap(), "NULL");
    assert_eq!(parse("?i", &[Value::Int(i64::MIN)]).unwrap(), "-9223372036854775808");
    assert_eq!(parse("?i", &[Value::UInt(u64::MAX)]).unwrap(), "18446744073709551615");
}

#[test]
fn integer_kind_keeps_arbitrary_precision_digits() {
    let wide = "1234567890123456789012345678901234567890";
    assert_eq!(wide.len(), 40);

    assert_eq!(parse("?i", &[wide.into()]).unwrap(), wide);

    let negative_wide = "-123456789012345678901234567890123456789.777";
    assert_eq!(
        parse("?i", &[negative_wide.into()]).unwrap(),
        "-123456789012345678901234567890123456789"
    );
}

#[test]
fn integer_kind_validates_the_textual_form() {
    for bad in ["0x1A", "0b101", "1e3", " 5", "5 ", "+5", "five", "", "1.2.3"] {
        assert!(
            matches!(
                parse("?i", &[bad.into()]),
                Err(ParseError::MalformedNumber { .. })
            ),
            "expected {:?} to be rejected",
            bad
        );
    }

    assert!(matches!(
        parse("?i", &[Value::Bool(true)]),
        Err(ParseError::TypeMismatch { marker: "?i", .. })
    ));
}

#[test]
fn identifier_kind_quotes_names() {
    assert_eq!(parse("SELECT * FROM ?n", &["users".into()]).unwrap(), "SELECT * FROM `users`");

    // numeric scalars are identifiers via their string form
    assert_eq!(parse("?n", &[Value::Int(2024)]).unwrap(), "`2024`");

    // a backtick in the name is doubled
    assert_eq!(parse("?n", &["we`ird".into()]).unwrap(), "`we``ird`");
}

#[test]
fn identifier_kind_rejects_unusable_names() {
    assert!(matches!(
        parse("?n", &["".into()]),
        Err(ParseError::InvalidIdentifier { marker: "?n", .. })
    ));

    assert!(matches!(
        parse("?n", &["bad\0name".into()]),
        Err(ParseError::InvalidIdentifier { .. })
    ));

    // outside the basic plane
    assert!(matches!(
        parse("?n", &["t🦀ble".into()]),
        Err(ParseError::InvalidIdentifier { .. })
    ));

    assert!(matches!(
        parse("?n", &[Value::Null]),
        Err(ParseError::TypeMismatch { marker: "?n", .. })
    ));
}

#[test]
fn array_kind_renders_elements_per_string_rule() {
    assert_eq!(
        parse(
            "?a",
            &[Value::List(vec![
                Value::Int(1),
                Value::Null,
                "a'b".into()
            ])]
        )
        .unwrap(),
        "'1', NULL, 'a\\'b'"
    );
}

#[test]
fn array_kind_rejects_empty_and_nested() {
    assert!(matches!(
        parse("?a", &[Value::List(vec![])]),
        Err(ParseError::EmptyContainer { marker: "?a", .. })
    ));

    assert!(matches!(
        parse("?a", &[Value::Int(3)]),
        Err(ParseError::TypeMismatch { marker: "?a", .. })
    ));

    // a nested list is reported against the `?a` marker
    assert!(matches!(
        parse("?a", &[Value::List(vec![Value::List(vec![Value::Int(1)])])]),
        Err(ParseError::TypeMismatch {
            marker: "?a",
            actual: "list",
            ..
        })
    ));
}

#[test]
fn map_kind_renders_assignments() {
    let pairs = Value::Map(
        [
            ("a".to_owned(), Value::Int(1)),
            ("b".to_owned(), Value::Null),
        ]
        .into_iter()
        .collect(),
    );

    assert_eq!(
        parse("UPDATE t SET ?u", &[pairs]).unwrap(),
        "UPDATE t SET `a`='1', `b`=NULL"
    );
}

#[test]
fn map_kind_rejects_empty_and_bad_keys() {
    assert!(matches!(
        parse("?u", &[Value::Map(Default::default())]),
        Err(ParseError::EmptyContainer { marker: "?u", .. })
    ));

    let bad_key = Value::Map(
        [(String::new(), Value::Int(1))].into_iter().collect(),
    );
    assert!(matches!(
        parse("?u", &[bad_key]),
        Err(ParseError::InvalidIdentifier { marker: "?u", .. })
    ));
}

#[test]
fn raw_kind_splices_verbatim() {
    assert_eq!(
        parse("ORDER BY name ?p", &["DESC".into()]).unwrap(),
        "ORDER BY name DESC"
    );

    // no escaping at all: the caller is trusted
    assert_eq!(
        parse("?p", &["id IN ('a', 'b')".into()]).unwrap(),
        "id IN ('a', 'b')"
    );
}

#[test]
fn raw_kind_keeps_the_falsey_split() {
    // empty string and false render as an empty fragment
    assert_eq!(parse("SELECT 1 ?p", &["".into()]).unwrap(), "SELECT 1 ");
    assert_eq!(
        parse("SELECT 1 ?p", &[Value::Bool(false)]).unwrap(),
        "SELECT 1 "
    );

    // null and containers stay rejected
    assert!(matches!(
        parse("SELECT 1 ?p", &[Value::Null]),
        Err(ParseError::TypeMismatch { marker: "?p", .. })
    ));
    assert!(matches!(
        parse("SELECT 1 ?p", &[vec![1i64].into()]),
        Err(ParseError::TypeMismatch { marker: "?p", .. })
    ));
}

#[test]
fn failure_happens_before_any_output() {
    // the second argument is invalid; the call must fail even though the
    // first would have rendered fine
    assert!(parse(
        "INSERT INTO t (a, b) VALUES (?s, ?i)",
        &["ok".into(), "0x1A".into()]
    )
    .is_err());
}

#[test]
fn select_in_end_to_end() {
    assert_eq!(
        parse(
            "SELECT * FROM ?n WHERE id IN (?a)",
            &["users".into(), vec![1i64, 2, 3].into()]
        )
        .unwrap(),
        "SELECT * FROM `users` WHERE id IN ('1', '2', '3')"
    );
}

#[test]
fn parsed_template_can_be_rendered_repeatedly() {
    let parsed = parse_template("SELECT * FROM t WHERE id = ?i LIMIT ?i");

    assert_eq!(parsed.markers().len(), 2);
    assert!(parsed
        .markers()
        .iter()
        .all(|marker| marker.kind == MarkerKind::Int));

    let escaper = MySqlEscaper::new();

    assert_eq!(
        parsed
            .render(&[Value::Int(7), Value::Int(1)], &escaper)
            .unwrap(),
        "SELECT * FROM t WHERE id = 7 LIMIT 1"
    );
    assert_eq!(
        parsed
            .render(&[Value::Int(9), Value::Int(5)], &escaper)
            .unwrap(),
        "SELECT * FROM t WHERE id = 9 LIMIT 5"
    );
}
