pub mod app;
pub mod domain;
pub mod error;
pub mod etl;
pub mod infra;
pub mod query;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::review_service::ReviewService;
pub use domain::condition::{ColumnUpdate, Condition, Predicate, QueryInput, Scalar};
pub use domain::country::{CountryLookup, CountryTable};
pub use domain::model::{ModelRegistry, ReviewsModel, TableModel};
pub use domain::review::{Review, ReviewInput};
pub use error::{LoadError, PipelineError, ServiceError, StoreError, ValidationError};
pub use etl::{load_data, prepare_data_for_loading};
pub use storage::{Gateway, Record};
