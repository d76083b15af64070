use std::collections::VecDeque;

use crate::error::Result;

use super::RecordStore;

/// Lazy, finite iterator over keys sharing a prefix.
///
/// Keys are pulled from the store one page at a time, so memory stays bounded
/// by `page_size` regardless of how many keys match. Keys written behind the
/// cursor after the scan passed them are not observed; keys deleted ahead of
/// it are skipped. After the first error the iterator is exhausted.
pub struct KeyScan<'a, S: RecordStore> {
    store: &'a S,
    prefix: String,
    page_size: usize,
    buffered: VecDeque<String>,
    fetch_cursor: Option<String>,
    last_yielded: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<S: RecordStore> std::fmt::Debug for KeyScan<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyScan")
            .field("prefix", &self.prefix)
            .field("page_size", &self.page_size)
            .field("last_yielded", &self.last_yielded)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl<'a, S: RecordStore> KeyScan<'a, S> {
    pub fn new(store: &'a S, prefix: &str, page_size: usize) -> Self {
        Self::resume(store, prefix, page_size, None)
    }

    /// Restarts a scan strictly after `cursor`, typically a value previously
    /// returned by [`KeyScan::cursor`].
    pub fn resume(store: &'a S, prefix: &str, page_size: usize, cursor: Option<String>) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
            page_size: page_size.max(1),
            buffered: VecDeque::new(),
            fetch_cursor: cursor.clone(),
            last_yielded: cursor,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Last key handed out by this scan.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.last_yielded.as_deref()
    }

    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    fn fill(&mut self) -> Result<()> {
        let page = self
            .store
            .scan_page(&self.prefix, self.fetch_cursor.as_deref(), self.page_size)?;
        self.pages_fetched += 1;
        if page.keys.len() < self.page_size || page.next_cursor.is_none() {
            self.exhausted = true;
        }
        self.fetch_cursor = page.next_cursor;
        self.buffered.extend(page.keys);
        Ok(())
    }
}

impl<S: RecordStore> Iterator for KeyScan<'_, S> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffered.is_empty() && !self.exhausted {
            if let Err(err) = self.fill() {
                self.exhausted = true;
                self.buffered.clear();
                return Some(Err(err));
            }
        }
        let key = self.buffered.pop_front()?;
        self.last_yielded = Some(key.clone());
        Some(Ok(key))
    }
}
