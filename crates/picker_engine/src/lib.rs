//! Picker engine: listing fetch, retrieval and the run coordinator.
mod decode;
mod fetch;
mod filename;
mod persist;
mod pipeline;
mod retrieve;
mod types;

pub use decode::{decode_listing, DecodeError, DecodedListing};
pub use fetch::{FetchSettings, Fetcher, LogProgressSink, ProgressSink, ReqwestFetcher};
pub use filename::landing_name;
pub use persist::{ensure_output_dir, PersistError, StagedFile};
pub use pipeline::{Picker, PickerError, RunContext};
pub use retrieve::{HttpRetriever, RetrieveError, Retriever, Verbosity, WgetRetriever};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, PickedItem, RunReport,
};
