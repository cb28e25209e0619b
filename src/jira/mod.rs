// Windowed open/closed issue counting against Jira servers.

pub mod errors;
pub mod gather;
pub mod query;
pub mod report;
pub mod search;
pub mod window;

pub use errors::GatherError;
pub use gather::JiraKpis;
pub use query::{ClassificationQuery, StatusClass};
pub use report::window_record;
pub use search::{HttpJqlCounter, JqlCounter};
pub use window::{DateRange, WindowKind};
