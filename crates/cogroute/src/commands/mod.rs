pub mod evaluate;
pub mod ingest;
pub mod optimize;
pub mod simulate;
pub mod version;
