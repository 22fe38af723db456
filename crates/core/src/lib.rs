pub mod config;
pub mod datasource;
pub mod domain;
pub mod errors;

pub use datasource::DataSource;
pub use domain::answer::{Answer, Confidence};
pub use domain::intent::{ClassifiedIntent, Intent};
pub use domain::query::{DataSet, QuerySpec};
pub use domain::question::{Question, StoreId};
pub use domain::record::{DataOrigin, InventoryLevel, LineItem, Order, Records, ResultSet};
pub use errors::{ApplicationError, DomainError, InterfaceError};
