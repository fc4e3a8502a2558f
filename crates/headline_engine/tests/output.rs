mod common;

use std::fs;

use chrono::{Local, TimeZone};
use common::rss;
use headline_core::{Aggregator, Candidate, NoiseClassifier, RunResult, SourceId};
use headline_engine::{ensure_output_dir, write_atomic, Loader, TitleFileLoader};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn run_result(titles: &[&str]) -> RunResult {
    let classifier = NoiseClassifier::default();
    let mut aggregator = Aggregator::new();
    for text in titles {
        let candidate = Candidate::new(text, SourceId::new("s")).unwrap();
        aggregator.add(classifier.accept(candidate).unwrap());
    }
    aggregator.finalize_at(Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 42).unwrap())
}

#[test]
fn writes_one_title_per_line_with_timestamped_name() {
    let temp = TempDir::new().unwrap();
    let loader = TitleFileLoader::new(temp.path().join("scraped_output"));

    let path = loader
        .write(run_result(&["Ceny energií klesají", "Nový iPhone má USB-C"]))
        .unwrap()
        .expect("artifact written");

    assert_eq!(path.file_name().unwrap(), "titles_20240309_070542.txt");
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Ceny energií klesají\nNový iPhone má USB-C\n"
    );
}

#[test]
fn previous_artifacts_are_pruned_but_other_files_kept() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("titles_20200101_000000.txt"), "old\n").unwrap();
    fs::write(temp.path().join("titles_notes.md"), "keep").unwrap();
    fs::write(temp.path().join("readme.txt"), "keep").unwrap();

    let loader = TitleFileLoader::new(temp.path());
    let path = loader
        .write(run_result(&["Karel Gott opět ve studiu"]))
        .unwrap()
        .expect("artifact written");

    assert!(path.exists());
    assert!(!temp.path().join("titles_20200101_000000.txt").exists());
    assert!(temp.path().join("titles_notes.md").exists());
    assert!(temp.path().join("readme.txt").exists());
}

#[test]
fn pruning_can_be_disabled_and_prefix_changed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("corpus_20200101_000000.txt"), "old\n").unwrap();

    let loader = TitleFileLoader::new(temp.path())
        .with_prefix("corpus")
        .with_prune_previous(false);
    let path = loader
        .write(run_result(&["Karel Gott opět ve studiu"]))
        .unwrap()
        .expect("artifact written");

    assert_eq!(path.file_name().unwrap(), "corpus_20240309_070542.txt");
    assert!(temp.path().join("corpus_20200101_000000.txt").exists());
}

#[test]
fn empty_run_keeps_the_previous_corpus() {
    let temp = TempDir::new().unwrap();
    let previous = temp.path().join("titles_20200101_000000.txt");
    fs::write(&previous, "Karel Gott opět ve studiu\n").unwrap();

    let saved = TitleFileLoader::new(temp.path()).write(run_result(&[])).unwrap();

    assert_eq!(saved, None);
    assert_eq!(
        fs::read_to_string(&previous).unwrap(),
        "Karel Gott opět ve studiu\n"
    );
    assert!(!temp.path().join("titles_20240309_070542.txt").exists());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let first = write_atomic(temp.path(), "feed.xml", &rss(&["A"])).unwrap();
    let second = write_atomic(temp.path(), "feed.xml", "replaced").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(second).unwrap(), "replaced");
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(ensure_output_dir(&file_path).is_err());
    let result = TitleFileLoader::new(&file_path).write(run_result(&["Karel Gott opět ve studiu"]));
    assert!(result.is_err());
}
