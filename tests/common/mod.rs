use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

/// A source tree holding only files the organizer ignores.
pub fn media_free_source(temp_dir: &TempDir) -> ChildPath {
    let source = temp_dir.child("source");
    source.create_dir_all().unwrap();
    source.child("notes.txt").write_str("not media").unwrap();
    source.child("render.png").write_binary(b"\x89PNG\r\n").unwrap();
    source.child("nested/more.txt").write_str("still not media").unwrap();
    source
}

pub fn empty_target(temp_dir: &TempDir) -> ChildPath {
    let target = temp_dir.child("target");
    target.create_dir_all().unwrap();
    target
}
