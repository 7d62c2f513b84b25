use bookcore::{Error, SuggestIndex};
use std::io::Write;
use std::path::PathBuf;

fn write_catalog(dir: &std::path::Path, rows: &[(u32, &str)]) -> PathBuf {
    let path = dir.join("books.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "index,title,summary,genre").unwrap();
    for (idx, title) in rows {
        writeln!(f, "{idx},{title},,").unwrap();
    }
    path
}

#[test]
fn loads_from_csv_and_suggests() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_catalog(
        dir.path(),
        &[
            (0, "Harry Potter and the Sorcerer's Stone"),
            (1, "Harry Potter and the Chamber of Secrets"),
            (2, "The Hobbit"),
        ],
    );

    let index = SuggestIndex::load(&path).unwrap();
    assert_eq!(index.len(), 3);

    let got = index.suggest("Harry Potter", 2).unwrap();
    assert_eq!(
        got,
        vec![
            "Harry Potter and the Sorcerer's Stone".to_string(),
            "Harry Potter and the Chamber of Secrets".to_string(),
        ]
    );

    let got = index.suggest("Hobbit", 5).unwrap();
    assert_eq!(got[0], "The Hobbit");
    assert_eq!(got.len(), 3);
}

#[test]
fn rows_without_titles_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "index,title,summary,genre").unwrap();
    writeln!(f, "0,The Hobbit,,").unwrap();
    writeln!(f, "1,,a summary without a title,").unwrap();
    writeln!(f, "2,   ,,").unwrap();
    drop(f);

    let index = SuggestIndex::load(&path).unwrap();
    assert_eq!(index.len(), 1);
}

#[test]
fn catalog_with_no_usable_titles_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "index,title,summary,genre").unwrap();
    writeln!(f, "0,,only summaries here,").unwrap();
    drop(f);

    assert!(matches!(
        SuggestIndex::load(&path),
        Err(Error::DataLoad { .. })
    ));
}

#[test]
fn missing_file_fails_to_load() {
    assert!(matches!(
        SuggestIndex::load("nonexistent.csv"),
        Err(Error::DataLoad { .. })
    ));
}

#[test]
fn every_title_retrieves_itself() {
    let dir = tempfile::tempdir().unwrap();
    let titles = [
        (0, "A Tale of Two Cities"),
        (1, "Crime and Punishment"),
        (2, "Brave New World"),
        (3, "The Count of Monte Cristo"),
    ];
    let path = write_catalog(dir.path(), &titles);
    let index = SuggestIndex::load(&path).unwrap();

    for (_, title) in titles {
        let got = index.suggest(title, 1).unwrap();
        assert_eq!(got, vec![title.to_string()], "query: {title}");
    }
}

#[test]
fn result_length_is_bounded_and_ordering_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_catalog(
        dir.path(),
        &[(0, "Dune"), (1, "Dune Messiah"), (2, "Children of Dune")],
    );
    let index = SuggestIndex::load(&path).unwrap();

    for top_n in 1..=5 {
        let got = index.suggest("Dune", top_n).unwrap();
        assert!(got.len() <= top_n.min(index.len()));
    }
    // Repeated queries are identical, including tie order.
    let a = index.suggest("Dune", 3).unwrap();
    let b = index.suggest("Dune", 3).unwrap();
    assert_eq!(a, b);
}
