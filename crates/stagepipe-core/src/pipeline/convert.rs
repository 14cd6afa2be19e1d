//! Record conversion at the stage boundary.
//!
//! A registry record becomes a [`StageFile`] when it enters a stage; a stage
//! output becomes a fresh [`FileRecord`] when the synchronizer installs it.
//! Records produced here always carry a recomputed content fingerprint, with
//! `original_path` set to the output path and no staging location.

use crate::pipeline::StageFile;
use crate::registry::{fingerprint, FileRecord};

pub fn to_stage_file(record: &FileRecord) -> StageFile {
    StageFile {
        path: record.path.clone(),
        contents: record
            .content
            .as_ref()
            .map(|content| content.as_bytes().to_vec()),
        mtime: record.mtime,
    }
}

pub fn to_record(file: StageFile) -> FileRecord {
    let content = match file.contents {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => String::new(),
    };
    FileRecord {
        original_path: file.path.clone(),
        path: file.path,
        content_path: None,
        mtime: file.mtime,
        is_url: false,
        content_hash: fingerprint(content.as_bytes()),
        content: Some(content),
    }
}
