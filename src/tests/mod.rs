mod test_metadata;

mod asyoutypeformatter_tests;
mod metadata_source_tests;
