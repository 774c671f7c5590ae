use async_trait::async_trait;

use crate::errors::RetrievalError;
use crate::models::WebResult;

/// Live web search.
#[async_trait]
pub trait IWebSearchProvider: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<WebResult>, RetrievalError>;

    fn name(&self) -> &str;
}
