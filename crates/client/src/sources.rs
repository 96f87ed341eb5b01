//! [`PageSource`] implementations backed by the REST client.

use api_types::{
    bill::BillView,
    page::{Page, PageQuery},
};
use uuid::Uuid;

use crate::{error::ClientError, feed::PageSource, http::Client};

/// Bills of one group, optionally filtered by a search term.
///
/// Changing the search means building a new source (or loader) and resetting.
#[derive(Debug, Clone)]
pub struct GroupBillsSource {
    client: Client,
    group_id: Uuid,
    search: Option<String>,
}

impl GroupBillsSource {
    pub fn new(client: Client, group_id: Uuid) -> Self {
        Self {
            client,
            group_id,
            search: None,
        }
    }

    /// Blank terms are treated as no search.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    pub fn group_id(&self) -> Uuid {
        self.group_id
    }
}

impl PageSource<BillView> for GroupBillsSource {
    type Error = ClientError;

    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<BillView>, ClientError> {
        let query = PageQuery {
            skip: offset,
            limit,
            search: self.search.clone(),
        };
        self.client.bills_by_group(self.group_id, &query).await
    }
}

/// Every bill visible to the signed-in user.
#[derive(Debug, Clone)]
pub struct ActivitySource {
    client: Client,
}

impl ActivitySource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageSource<BillView> for ActivitySource {
    type Error = ClientError;

    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Page<BillView>, ClientError> {
        let query = PageQuery {
            skip: offset,
            limit,
            search: None,
        };
        self.client.activity(&query).await
    }
}
