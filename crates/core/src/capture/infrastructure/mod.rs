pub mod image_sequence_source;
pub mod snapshot_file_source;
