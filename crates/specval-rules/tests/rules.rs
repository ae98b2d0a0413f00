use chrono::{DateTime, TimeZone, Utc};
use specval_core::{
    AuthoringIssue, SchemeError, Settings, Specification, Validator, ENGLISH,
};
use specval_rules::numbers::keys as number_keys;
use specval_rules::{
    translations, BoolRules, CollectionRules, GuidRules, NumberRules, TextRules, TimeRules,
};
use uuid::Uuid;

fn validator<T: 'static>(spec: &Specification<T>) -> Validator<T> {
    let settings = Settings::new().with_translation(ENGLISH, translations::ENGLISH_RULES);
    Validator::with_settings(spec, settings).expect("valid specification")
}

fn messages<T: 'static>(validator: &Validator<T>, model: &T) -> Vec<String> {
    let result = validator.validate(model).expect("no reference loop");
    result.message_map().remove("").unwrap_or_default()
}

fn authoring_issues<T: 'static>(spec: &Specification<T>) -> Vec<AuthoringIssue> {
    match Validator::new(spec) {
        Err(SchemeError::InvalidSpecification(issues)) => {
            issues.into_iter().map(|located| located.issue).collect()
        }
        other => panic!("expected invalid specification, got {other:?}"),
    }
}

fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("unambiguous date")
}

// ── texts ──

#[test]
fn text_rules_render_their_args() {
    let spec = Specification::<String>::new(|s| {
        s.starts_with("ab")
            .and()
            .ends_with("yz")
            .and()
            .contains("mid")
            .and()
            .not_contains("bad")
    });
    let v = validator(&spec);

    assert!(messages(&v, &"ab-mid-yz".to_string()).is_empty());
    assert_eq!(
        messages(&v, &"x-bad-x".to_string()),
        vec![
            "Must start with 'ab'",
            "Must end with 'yz'",
            "Must contain 'mid'",
            "Must not contain 'bad'",
        ]
    );
}

#[test]
fn lengths_count_characters() {
    let spec = Specification::<String>::new(|s| s.min_length(5).and().max_length(6));
    let v = validator(&spec);

    assert_eq!(
        messages(&v, &"żółw".to_string()),
        vec!["Must be at least 5 characters in length"]
    );
    assert!(messages(&v, &"żółwik".to_string()).is_empty());
}

#[test]
fn exact_length_and_between() {
    let exact = validator(&Specification::<String>::new(|s| s.exact_length(3)));
    assert!(messages(&exact, &"abc".to_string()).is_empty());
    assert_eq!(
        messages(&exact, &"ab".to_string()),
        vec!["Must be exactly 3 characters in length"]
    );

    let between = validator(&Specification::<String>::new(|s| s.length_between(2, 3)));
    assert!(messages(&between, &"ab".to_string()).is_empty());
    assert!(messages(&between, &"abc".to_string()).is_empty());
    assert_eq!(
        messages(&between, &"abcd".to_string()),
        vec!["Must be between 2 and 3 characters in length"]
    );
}

#[test]
fn blank_texts() {
    let v = validator(&Specification::<String>::new(|s| {
        s.not_empty().and().not_white_space().and().single_line()
    }));

    assert_eq!(
        messages(&v, &String::new()),
        vec![
            "Must not be empty",
            "Must not consist only of whitespace characters",
        ]
    );
    assert_eq!(
        messages(&v, &" \t".to_string()),
        vec!["Must not consist only of whitespace characters"]
    );
    assert_eq!(
        messages(&v, &"a\r\nb".to_string()),
        vec!["Must consist of single line"]
    );
}

#[test]
fn equality_is_ordinal() {
    let v = validator(&Specification::<String>::new(|s| s.equal_to("Abc")));
    assert!(messages(&v, &"Abc".to_string()).is_empty());
    assert_eq!(messages(&v, &"abc".to_string()), vec!["Must be equal to 'Abc'"]);

    let v = validator(&Specification::<String>::new(|s| s.not_equal_to("Abc")));
    assert!(messages(&v, &"abc".to_string()).is_empty());
}

#[test]
fn email_shapes() {
    let v = validator(&Specification::<String>::new(|s| s.email()));

    for valid in ["a@b.com", "first.last@sub.example.org", "x@localhost"] {
        assert!(messages(&v, &valid.to_string()).is_empty(), "{valid}");
    }
    for invalid in ["plain", "a@@b.com", "a@b..com", "a b@c.com", "@b.com"] {
        assert_eq!(
            messages(&v, &invalid.to_string()),
            vec!["Must be a valid email address"],
            "{invalid}"
        );
    }
}

#[test]
fn matches_pattern() {
    let v = validator(&Specification::<String>::new(|s| s.matches(r"^\d{3}$")));
    assert!(messages(&v, &"123".to_string()).is_empty());
    insta::assert_snapshot!(
        v.validate(&"12a".to_string()).expect("no loop"),
        @r"Must match RegEx pattern '^\d{3}$'"
    );
}

#[test]
fn malformed_pattern_is_an_authoring_issue() {
    let issues = authoring_issues(&Specification::<String>::new(|s| s.matches("(unclosed")));
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        &issues[0],
        AuthoringIssue::InvalidArgument { name, .. } if name == "pattern"
    ));
}

// ── numbers ──

#[test]
fn integer_comparisons() {
    let v = validator(&Specification::<i32>::new(|s| {
        s.greater_than(0).and().less_than_or_equal_to(10).and().not_equal_to(5)
    }));

    assert!(messages(&v, &7).is_empty());
    assert_eq!(messages(&v, &0), vec!["Must be greater than 0"]);
    assert_eq!(messages(&v, &11), vec!["Must be less than or equal to 10"]);
    assert_eq!(messages(&v, &5), vec!["Must not be equal to 5"]);
}

#[test]
fn between_bounds() {
    let exclusive = validator(&Specification::<u8>::new(|s| s.between(1, 3)));
    assert!(messages(&exclusive, &2).is_empty());
    assert_eq!(
        messages(&exclusive, &3),
        vec!["Must be between 1 and 3 (exclusive)"]
    );

    let inclusive = validator(&Specification::<u8>::new(|s| s.between_or_equal_to(1, 3)));
    assert!(messages(&inclusive, &3).is_empty());
    assert!(messages(&inclusive, &1).is_empty());
}

#[test]
fn signs() {
    let v = validator(&Specification::<i64>::new(|s| s.positive()));
    assert_eq!(messages(&v, &0), vec!["Must be positive"]);

    let v = validator(&Specification::<i64>::new(|s| s.non_negative()));
    assert!(messages(&v, &0).is_empty());
    assert_eq!(messages(&v, &-1), vec!["Must not be negative"]);

    let v = validator(&Specification::<isize>::new(|s| s.negative().and().non_zero()));
    assert_eq!(messages(&v, &0), vec!["Must be negative", "Must not be zero"]);

    let v = validator(&Specification::<usize>::new(|s| s.non_positive()));
    assert!(messages(&v, &0).is_empty());
}

#[test]
fn floats_reject_nan() {
    let v = validator(&Specification::<f64>::new(|s| s.greater_than_or_equal_to(1.5)));
    assert!(messages(&v, &1.5).is_empty());
    assert_eq!(
        messages(&v, &f64::NAN),
        vec!["Must be greater than or equal to 1.5"]
    );

    let v = validator(&Specification::<f32>::new(|s| s.non_nan().and().non_zero()));
    assert_eq!(
        messages(&v, &f32::NAN),
        vec!["Must be a number", "Must not be zero"]
    );
    assert!(messages(&v, &0.5).is_empty());
}

#[test]
fn reversed_number_range() {
    let issues = authoring_issues(&Specification::<i32>::new(|s| s.between(3, 3)));
    assert_eq!(
        issues,
        vec![AuthoringIssue::InvalidRange {
            min: "3".into(),
            max: "3".into(),
            relation: "less than",
        }]
    );

    let single = Specification::<i32>::new(|s| s.between_or_equal_to(3, 3));
    assert!(Validator::new(&single).is_ok());
}

#[test]
fn number_keys_without_translation_fall_back_to_key() {
    let spec = Specification::<i32>::new(|s| s.equal_to(1));
    let v = Validator::new(&spec).expect("valid specification");
    let result = v.validate(&2).expect("no loop");
    assert_eq!(result.message_map()[""], vec![number_keys::EQUAL_TO]);
}

// ── collections ──

#[test]
fn collection_sizes() {
    let v = validator(&Specification::<Vec<u32>>::new(|s| {
        s.not_empty_collection().and().max_collection_size(2)
    }));
    assert_eq!(messages(&v, &vec![]), vec!["Must not be empty"]);
    assert_eq!(
        messages(&v, &vec![1, 2, 3]),
        vec!["Must contain at most 2 items"]
    );

    let v = validator(&Specification::<Vec<String>>::new(|s| {
        s.collection_size_between(1, 2)
    }));
    assert!(messages(&v, &vec!["a".to_string()]).is_empty());

    let v = validator(&Specification::<Vec<u8>>::new(|s| s.exact_collection_size(2)));
    assert_eq!(messages(&v, &vec![1]), vec!["Must contain exactly 2 items"]);

    let v = validator(&Specification::<Vec<u8>>::new(|s| {
        s.empty_collection().and().min_collection_size(0)
    }));
    assert!(messages(&v, &vec![]).is_empty());
}

// ── bools, guids, times ──

#[test]
fn booleans() {
    let v = validator(&Specification::<bool>::new(|s| s.true_value()));
    assert!(messages(&v, &true).is_empty());
    assert_eq!(messages(&v, &false), vec!["Must be true"]);

    let v = validator(&Specification::<bool>::new(|s| s.false_value()));
    assert_eq!(messages(&v, &true), vec!["Must be false"]);
}

#[test]
fn guids() {
    let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
    let v = validator(&Specification::<Uuid>::new(move |s| {
        s.not_nil().and().equal_to_guid(id)
    }));

    assert!(messages(&v, &id).is_empty());
    assert_eq!(
        messages(&v, &Uuid::nil()),
        vec![
            "Must not be nil".to_string(),
            format!("Must be equal to {}", id.hyphenated()),
        ]
    );

    let v = validator(&Specification::<Uuid>::new(move |s| s.not_equal_to_guid(id)));
    assert!(messages(&v, &Uuid::nil()).is_empty());
}

#[test]
fn times() {
    let v = validator(&Specification::<DateTime<Utc>>::new(|s| {
        s.between_times(utc(2024, 1, 1), utc(2024, 12, 31))
    }));
    assert!(messages(&v, &utc(2024, 6, 1)).is_empty());
    assert_eq!(
        messages(&v, &utc(2024, 1, 1)),
        vec!["Must be between 2024-01-01T00:00:00+00:00 and 2024-12-31T00:00:00+00:00"]
    );

    let v = validator(&Specification::<DateTime<Utc>>::new(|s| {
        s.after(utc(2020, 1, 1)).and().before(utc(2021, 1, 1))
    }));
    assert_eq!(
        messages(&v, &utc(2019, 1, 1)),
        vec!["Must be after 2020-01-01T00:00:00+00:00"]
    );

    let issues = authoring_issues(&Specification::<DateTime<Utc>>::new(|s| {
        s.between_times(utc(2021, 1, 1), utc(2020, 1, 1))
    }));
    assert_eq!(issues.len(), 1);
}

// ── composition ──

#[test]
fn rules_accept_parameters() {
    let v = validator(&Specification::<String>::new(|s| {
        s.not_empty()
            .with_message("Name is missing")
            .and()
            .max_length(3)
            .with_code("TOO_LONG")
    }));

    assert_eq!(messages(&v, &String::new()), vec!["Name is missing"]);

    let result = v.validate(&"abcd".to_string()).expect("no loop");
    assert_eq!(result.codes(), vec!["TOO_LONG"]);
}
