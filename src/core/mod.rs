//! Core data models, provider queries and run state.

pub mod http;
pub mod logging;
pub mod models;
pub mod poll_state;
pub mod provider;
pub mod query;

pub use models::{
    DerivedUsage, Frame, ProviderFailure, ProviderReport, QueryResult, Region, RenderConfig,
};
pub use poll_state::PollState;
pub use provider::Provider;
pub use query::{FetchedQuotas, build_frame, fetch_all, query_provider};
