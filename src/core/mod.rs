pub mod alert;
pub mod engine;
pub mod extract;
pub mod fetch;
pub mod query;
pub mod rank;
pub mod shutdown;

pub use crate::domain::model::{
    Alert, EligibilityFilter, LoadOutcome, QueryPlan, RankedResultSet, Record, RequestParams,
    SearchTarget, SessionQuery,
};
pub use crate::domain::ports::{ConfigProvider, Notifier, Pipeline, Timer, Transport};
pub use crate::utils::error::Result;
pub use rank::rank;
