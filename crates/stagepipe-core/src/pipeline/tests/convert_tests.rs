use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::pipeline::convert;
use crate::pipeline::StageFile;
use crate::registry::{fingerprint, FileRecord};

#[test]
fn record_to_stage_file_carries_content_and_mtime() {
    let mut record = FileRecord::with_content("/base/sample.js", "contents");
    record.mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(42);

    let file = convert::to_stage_file(&record);

    assert_eq!(file.path, Path::new("/base/sample.js"));
    assert_eq!(file.contents.as_deref(), Some(b"contents".as_slice()));
    assert_eq!(file.mtime, record.mtime);
}

#[test]
fn unloaded_record_yields_empty_buffer() {
    let mut record = FileRecord::with_content("/base/sample.js", "");
    record.content = None;

    assert_eq!(convert::to_stage_file(&record).contents, None);
}

#[test]
fn stage_file_to_record_rebuilds_provenance() {
    let mut file = StageFile::new("/base/out.js", None);
    file.set_text("payload");

    let record = convert::to_record(file);

    assert_eq!(record.path, Path::new("/base/out.js"));
    assert_eq!(record.original_path, record.path);
    assert_eq!(record.content_path, None);
    assert!(!record.is_url);
    assert_eq!(record.content.as_deref(), Some("payload"));
    assert_eq!(record.content_hash, fingerprint(b"payload"));
}

#[test]
fn empty_stage_file_becomes_empty_content() {
    let record = convert::to_record(StageFile::new("/base/empty.js", None));

    assert_eq!(record.content.as_deref(), Some(""));
    assert_eq!(record.content_hash, fingerprint(b""));
}
