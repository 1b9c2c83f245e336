use tracing::debug;

use crate::errors::CoreError;
use crate::models::history::{HistoryFilter, HistoryItem};
use crate::models::settings::AccountContext;
use crate::providers::traits::AccountApi;

/// Offset/limit pager over the transaction history for one filter.
///
/// `reset` starts over from offset 0; `load_more` appends the next page.
/// A failed request leaves the loaded rows and the offset untouched.
#[derive(Debug, Clone)]
pub struct HistoryPager {
    filter: HistoryFilter,
    page_size: u32,
    items: Vec<HistoryItem>,
    has_more: bool,
}

impl HistoryPager {
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: HistoryFilter::All,
            page_size: page_size.max(1),
            items: Vec::new(),
            has_more: false,
        }
    }

    pub fn filter(&self) -> HistoryFilter {
        self.filter
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// True while the last page came back full.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Offset the next `load_more` will request.
    pub fn next_offset(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    /// Switch to `filter` and load its first page.
    pub async fn reset(
        &mut self,
        api: &dyn AccountApi,
        ctx: &AccountContext,
        filter: HistoryFilter,
    ) -> Result<&[HistoryItem], CoreError> {
        self.filter = filter;
        self.items.clear();
        self.has_more = false;

        let page = api.history(ctx, filter, self.page_size, 0).await?;
        self.has_more = page.items.len() >= self.page_size as usize;
        self.items = page.items;
        debug!(%filter, loaded = self.items.len(), "history reset");
        Ok(&self.items)
    }

    /// Append the next page for the current filter.
    pub async fn load_more(
        &mut self,
        api: &dyn AccountApi,
        ctx: &AccountContext,
    ) -> Result<&[HistoryItem], CoreError> {
        let offset = self.next_offset();
        let page = api.history(ctx, self.filter, self.page_size, offset).await?;
        self.has_more = page.items.len() >= self.page_size as usize;
        self.items.extend(page.items);
        debug!(filter = %self.filter, offset, loaded = self.items.len(), "history page appended");
        Ok(&self.items)
    }
}
