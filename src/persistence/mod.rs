pub mod archive;

pub use archive::{
    ArchiveError, JsonFileArchive, MemoryArchive, RoundArchive, read_rounds, write_rounds,
};
