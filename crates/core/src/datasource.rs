use async_trait::async_trait;

use crate::domain::query::QuerySpec;
use crate::domain::record::ResultSet;

/// Seam between the pipeline and whatever produces records. Infallible by
/// contract: implementations resolve transport and credential failures
/// internally (falling back to deterministic mock data) so the pipeline never
/// sees an error at this boundary.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, spec: &QuerySpec) -> ResultSet;
}
