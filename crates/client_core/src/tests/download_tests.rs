use super::*;

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn saves_document_under_given_name() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = DirectoryDownloadSink::new(temp.path());

    let path = sink.save("out.pdf", b"%PDF-1.4").await.expect("save");

    assert_eq!(path, temp.path().join("out.pdf"));
    assert_eq!(std::fs::read(&path).expect("read"), b"%PDF-1.4");
    assert_eq!(dir_entries(temp.path()), vec!["out.pdf".to_string()]);
}

#[tokio::test]
async fn creates_missing_download_dir() {
    let temp = tempfile::tempdir().expect("tempdir");
    let nested = temp.path().join("nested").join("downloads");
    let sink = DirectoryDownloadSink::new(&nested);

    sink.save("invoice.pdf", b"doc").await.expect("save");

    assert!(nested.join("invoice.pdf").exists());
}

#[tokio::test]
async fn numbers_colliding_names() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = DirectoryDownloadSink::new(temp.path());

    let first = sink.save("invoice.pdf", b"1").await.expect("first");
    let second = sink.save("invoice.pdf", b"2").await.expect("second");
    let third = sink.save("invoice.pdf", b"3").await.expect("third");

    assert_eq!(first, temp.path().join("invoice.pdf"));
    assert_eq!(second, temp.path().join("invoice (1).pdf"));
    assert_eq!(third, temp.path().join("invoice (2).pdf"));
    assert_eq!(std::fs::read(&first).expect("read"), b"1");
    assert_eq!(std::fs::read(&third).expect("read"), b"3");
}

#[test]
fn numbered_name_keeps_extension() {
    assert_eq!(numbered_name("invoice.pdf", 1), "invoice (1).pdf");
    assert_eq!(numbered_name("archive.tar.gz", 2), "archive.tar (2).gz");
    assert_eq!(numbered_name("README", 3), "README (3)");
}

#[test]
fn numbered_name_stays_within_name_limit() {
    let stem = format!("{}a", "Я".repeat(125));
    let name = numbered_name(&format!("{stem}.pdf"), 7);

    assert!(name.len() <= MAX_FILE_NAME_BYTES, "{} bytes", name.len());
    assert!(name.ends_with(" (7).pdf"));
    assert!(name.starts_with("ЯЯЯ"));
}

#[tokio::test]
async fn occupied_names_are_skipped_without_leftovers() {
    let temp = tempfile::tempdir().expect("tempdir");
    // A directory sitting at the target name must not be replaced either.
    std::fs::create_dir(temp.path().join("blocked.pdf")).expect("mkdir");
    std::fs::write(temp.path().join("blocked (1).pdf"), b"x").expect("seed");
    let sink = DirectoryDownloadSink::new(temp.path());

    let saved = sink.save("blocked.pdf", b"doc").await.expect("save");

    assert_eq!(saved, temp.path().join("blocked (2).pdf"));
    assert_eq!(std::fs::read(temp.path().join("blocked (1).pdf")).expect("read"), b"x");
    assert_eq!(
        dir_entries(temp.path()),
        vec![
            "blocked (1).pdf".to_string(),
            "blocked (2).pdf".to_string(),
            "blocked.pdf".to_string(),
        ]
    );
}

#[tokio::test]
async fn saves_names_close_to_the_filesystem_limit() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = DirectoryDownloadSink::new(temp.path());
    let filename = format!("{}.pdf", "Я".repeat(123));
    assert_eq!(filename.len(), 250);

    let first = sink.save(&filename, b"doc").await.expect("first save");
    let second = sink.save(&filename, b"again").await.expect("second save");

    assert_eq!(first, temp.path().join(&filename));
    assert_eq!(std::fs::read(&first).expect("read"), b"doc");
    assert_eq!(std::fs::read(&second).expect("read"), b"again");
    assert_eq!(dir_entries(temp.path()).len(), 2);
}

#[tokio::test]
async fn too_long_name_fails_without_leftovers() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = DirectoryDownloadSink::new(temp.path());

    let err = sink
        .save(&format!("{}.pdf", "a".repeat(300)), b"doc")
        .await
        .expect_err("must fail");

    assert!(matches!(err, SubmitError::Download { .. }), "got {err:?}");
    assert!(dir_entries(temp.path()).is_empty());
}

#[tokio::test]
async fn unwritable_dir_reports_download_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file_in_the_way = temp.path().join("not-a-dir");
    std::fs::write(&file_in_the_way, b"x").expect("seed");
    let sink = DirectoryDownloadSink::new(file_in_the_way.join("downloads"));

    let err = sink.save("invoice.pdf", b"doc").await.expect_err("must fail");

    assert!(matches!(err, SubmitError::Download { .. }), "got {err:?}");
}
