pub mod api;
pub mod graph_file;

pub use api::{ApiError, ApiServer, ApiServerConfig, AppState};
pub use graph_file::GraphFile;
