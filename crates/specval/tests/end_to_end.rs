//! Integration tests for the facade: built-in rules, default settings, and
//! settings files.

use chrono::{DateTime, TimeZone, Utc};
use specval::prelude::*;
use specval::{ConfigError, ValidationReport, ENGLISH};
use std::collections::BTreeMap;
use std::sync::Once;
use uuid::Uuid;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone)]
struct Line {
    sku: String,
    quantity: u32,
}

#[derive(Debug, Clone)]
struct Order {
    id: Uuid,
    email: String,
    placed: DateTime<Utc>,
    lines: Vec<Line>,
    attributes: BTreeMap<String, String>,
    gift: Option<String>,
    accepted_terms: bool,
}

fn order_spec() -> Specification<Order> {
    let sku = Specification::<String>::new(|s| s.exact_length(6).and().matches("^[A-Z0-9]+$"));
    let quantity = Specification::<u32>::new(|s| s.between_or_equal_to(1, 99));
    let line = Specification::<Line>::new(move |s| {
        s.member("Sku", |l| &l.sku, sku.clone())
            .and()
            .member("Quantity", |l| &l.quantity, quantity.clone())
    });
    let lines = Specification::<Vec<Line>>::new(move |s| {
        s.not_empty_collection()
            .and()
            .max_collection_size(3)
            .and()
            .as_collection(line.clone())
    });
    let attribute = Specification::<String>::new(|s| s.not_white_space().and().max_length(10));
    let attributes = Specification::<BTreeMap<String, String>>::new(move |s| {
        s.as_dictionary(attribute.clone())
    });
    let gift = Specification::<String>::new(|s| s.optional().single_line());
    let id = Specification::<Uuid>::new(|s| s.not_nil());
    let email = Specification::<String>::new(|s| s.email().with_code("EMAIL"));
    let placed = Specification::<DateTime<Utc>>::new(|s| s.after(epoch()));
    let terms = Specification::<bool>::new(|s| s.true_value());

    Specification::<Order>::new(move |s| {
        s.member("Id", |o| &o.id, id.clone())
            .and()
            .member("Email", |o| &o.email, email.clone())
            .and()
            .member("Placed", |o| &o.placed, placed.clone())
            .and()
            .member("Lines", |o| &o.lines, lines.clone())
            .and()
            .member("Attributes", |o| &o.attributes, attributes.clone())
            .and()
            .member_optional("Gift", |o| o.gift.as_ref(), gift.clone())
            .and()
            .member("AcceptedTerms", |o| &o.accepted_terms, terms.clone())
    })
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .expect("unambiguous date")
}

fn valid_order() -> Order {
    Order {
        id: Uuid::from_u128(42),
        email: "buyer@example.com".into(),
        placed: Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("unambiguous date"),
        lines: vec![Line {
            sku: "ABC123".into(),
            quantity: 2,
        }],
        attributes: BTreeMap::from([("color".to_string(), "red".to_string())]),
        gift: None,
        accepted_terms: true,
    }
}

fn map(entries: &[(&str, Vec<&str>)]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(path, messages)| {
            (
                (*path).to_string(),
                messages.iter().map(|m| (*m).to_string()).collect(),
            )
        })
        .collect()
}

// ── Validation ──

#[test]
fn valid_order_passes() {
    init_tracing();
    let validator = specval::validator(&order_spec()).expect("specification should compile");

    let order = valid_order();
    assert!(validator.is_valid(&order).expect("no loop"));
    assert!(!validator.validate(&order).expect("no loop").any_errors());
}

#[test]
fn every_rule_reports_at_its_path() {
    init_tracing();
    let validator = specval::validator(&order_spec()).expect("specification should compile");

    let order = Order {
        id: Uuid::nil(),
        email: "nobody".into(),
        placed: epoch(),
        lines: vec![
            Line {
                sku: "ABC123".into(),
                quantity: 0,
            },
            Line {
                sku: "abc".into(),
                quantity: 1,
            },
        ],
        attributes: BTreeMap::from([("..size..".to_string(), "   ".to_string())]),
        gift: Some("to\nyou".into()),
        accepted_terms: false,
    };

    let result = validator.validate(&order).expect("no loop");
    assert_eq!(
        result.message_map(),
        map(&[
            ("Id", vec!["Must not be nil"]),
            ("Placed", vec!["Must be after 2020-01-01T00:00:00+00:00"]),
            ("Lines.#0.Quantity", vec!["Must be between 1 and 99 (inclusive)"]),
            (
                "Lines.#1.Sku",
                vec![
                    "Must be exactly 6 characters in length",
                    "Must match RegEx pattern '^[A-Z0-9]+$'",
                ]
            ),
            (
                "Attributes.size",
                vec!["Must not consist only of whitespace characters"]
            ),
            ("Gift", vec!["Must consist of single line"]),
            ("AcceptedTerms", vec!["Must be true"]),
        ])
    );
    assert_eq!(result.codes(), vec!["EMAIL"]);
    assert_eq!(
        result.paths().collect::<Vec<_>>(),
        vec![
            "Id",
            "Email",
            "Placed",
            "Lines.#0.Quantity",
            "Lines.#1.Sku",
            "Attributes.size",
            "Gift",
            "AcceptedTerms",
        ]
    );
}

#[test]
fn fail_fast_stops_at_first_error() {
    let validator = specval::validator(&order_spec()).expect("specification should compile");

    let mut order = valid_order();
    order.id = Uuid::nil();
    order.accepted_terms = false;

    let result = validator.validate_fail_fast(&order).expect("no loop");
    assert_eq!(result.paths().collect::<Vec<_>>(), vec!["Id"]);
    assert!(!validator.is_valid(&order).expect("no loop"));
}

#[test]
fn template_lists_generic_paths() {
    let validator = specval::validator(&order_spec()).expect("specification should compile");
    let template = validator.template();
    let paths: Vec<_> = template.paths().collect();

    assert!(paths.contains(&"Lines.#.Sku"));
    assert!(paths.contains(&"Lines.#.Quantity"));
    assert!(paths.contains(&"Attributes.#"));
    assert_eq!(
        template.message_map()["Lines"],
        vec![
            "Required",
            "Must not be empty",
            "Must contain at most 3 items",
        ]
    );
}

// ── Settings ──

#[test]
fn settings_file_adds_a_translation() {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("specval.toml"),
        r#"
default_translation = "Polish"

[translations.Polish]
"Global.Required" = "Wymagane"
"Bools.True" = "Musi być prawdą"
"Guids.NotNil" = "Nie może być pusty"
"#,
    )
    .expect("write settings");

    let settings = specval::load_settings(dir.path()).expect("settings should load");
    let validator =
        Validator::with_settings(&order_spec(), settings).expect("specification should compile");

    let mut order = valid_order();
    order.id = Uuid::nil();
    order.accepted_terms = false;

    let result = validator.validate(&order).expect("no loop");
    assert_eq!(
        result.message_map(),
        map(&[
            ("Id", vec!["Nie może być pusty"]),
            ("AcceptedTerms", vec!["Musi być prawdą"]),
        ])
    );
    assert_eq!(
        result
            .translated_message_map(ENGLISH)
            .expect("english is registered")["AcceptedTerms"],
        vec!["Must be true"]
    );

    let mut names: Vec<_> = result.translation_names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["English", "Polish"]);
}

#[test]
fn broken_settings_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "default_translation = [").expect("write settings");

    assert!(matches!(
        specval::load_settings_file(&path),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        specval::load_settings_file(&dir.path().join("missing.toml")),
        Err(ConfigError::Io { .. })
    ));
}

// ── Reports ──

#[test]
fn display_and_report() {
    let validator = specval::validator(&order_spec()).expect("specification should compile");

    let mut order = valid_order();
    order.email = "nobody".into();
    order.gift = Some("a\nb".into());

    let result = validator.validate(&order).expect("no loop");
    insta::assert_snapshot!(result, @r"
    EMAIL

    Gift: Must consist of single line
    ");

    let report = result.to_report(None).expect("default translation");
    let json = serde_json::to_string(&report).expect("serialize");
    let back: ValidationReport = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, report);
    assert!(!back.valid);
    assert_eq!(back.codes, vec!["EMAIL"]);
    assert_eq!(back.entries.len(), 2);
}
