use chrono::{Local, TimeZone};
use headline_core::{AcceptedTitle, Aggregator, Candidate, NoiseClassifier, SourceId};
use pretty_assertions::assert_eq;

fn accepted(text: &str, source: &str) -> AcceptedTitle {
    let candidate = Candidate::new(text, SourceId::new(source)).expect("non-blank");
    NoiseClassifier::default()
        .accept(candidate)
        .expect("test titles are articles")
}

#[test]
fn duplicates_are_dropped_keeping_first_occurrence() {
    let mut aggregator = Aggregator::new();
    assert!(aggregator.add(accepted("Ceny energií klesají pod vládní strop", "a")));
    assert!(aggregator.add(accepted("Nový iPhone má USB-C", "b")));
    assert!(!aggregator.add(accepted("ceny  energií klesají POD vládní strop", "b")));
    assert!(!aggregator.add(accepted("Nový iPhone má USB-C", "a")));

    let result = aggregator.finalize();
    assert_eq!(
        result.texts().collect::<Vec<_>>(),
        vec!["Ceny energií klesají pod vládní strop", "Nový iPhone má USB-C"]
    );
    assert_eq!(result.titles()[0].source().as_str(), "a");
    assert_eq!(result.titles()[1].source().as_str(), "b");
}

#[test]
fn order_follows_insertion_not_alphabet() {
    let mut aggregator = Aggregator::new();
    for text in ["Zima bude mírná", "Akcie rostou třetí den", "Most v Praze opraven"] {
        aggregator.add(accepted(text, "s"));
    }
    let result = aggregator.finalize();
    assert_eq!(
        result.texts().collect::<Vec<_>>(),
        vec!["Zima bude mírná", "Akcie rostou třetí den", "Most v Praze opraven"]
    );
}

#[test]
fn result_has_no_two_equal_keys() {
    let inputs = [
        "Vláda schválila rozpočet",
        "VLÁDA SCHVÁLILA ROZPOČET NA PŘÍŠTÍ ROK",
        "vláda schválila   rozpočet",
        "Vláda schválila rozpočet na příští rok",
        "Vláda Schválila Rozpočet",
    ];
    let mut aggregator = Aggregator::new();
    let classifier = NoiseClassifier::default();
    for text in inputs {
        let candidate = Candidate::new(text, SourceId::new("s")).unwrap();
        if let Ok(title) = classifier.accept(candidate) {
            aggregator.add(title);
        }
    }
    let result = aggregator.finalize();
    let mut keys: Vec<String> = result.titles().iter().map(AcceptedTitle::key).collect();
    let before = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), before);
    assert_eq!(
        result.texts().collect::<Vec<_>>(),
        vec!["Vláda schválila rozpočet", "Vláda schválila rozpočet na příští rok"]
    );
}

#[test]
fn finalize_at_stamps_given_time() {
    let stamp = Local.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
    let result = Aggregator::new().finalize_at(stamp);
    assert!(result.is_empty());
    assert_eq!(result.created_at(), stamp);
}

#[test]
fn finalize_uses_wall_clock_at_finalize() {
    let mut aggregator = Aggregator::new();
    aggregator.add(accepted("Karel Gott opět ve studiu", "s"));
    let before = Local::now();
    let result = aggregator.finalize();
    assert!(result.created_at() >= before);
    assert_eq!(result.len(), 1);
}
