pub mod archivist_core;
