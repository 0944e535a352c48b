// fshare-net/src/lib.rs
pub mod http;
pub mod validation;

pub use http::{CandidateAttempt, FetchReport, RepoClient, RetrievedSet};
pub use validation::validate_url;
