pub mod display;
pub mod fetcher;
pub mod metrics;
pub mod models;
pub mod paginator;
pub mod query;
pub mod view;

pub use fetcher::{FetchError, FetchLimits, FetchedProfile, ProfileFetcher};
pub use models::{Repository, UserProfile};
pub use paginator::{page_window, paginate, PageSlice};
pub use query::{apply, QueryState, SortKey};
pub use view::{ProfileView, SearchTicket, ViewSnapshot, ViewStatus};
