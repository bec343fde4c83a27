//! Per-process record of each cycle's winning quote.

use crate::models::Quote;

/// Append-only sequence of the cheapest quote from each productive cycle.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Quote>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, quote: Quote) {
        self.entries.push(quote);
    }

    /// Cheapest quote recorded so far; the earliest one wins ties
    pub fn best(&self) -> Option<&Quote> {
        self.entries.iter().fold(None, |best, quote| match best {
            Some(b) if b.price <= quote.price => Some(b),
            _ => Some(quote),
        })
    }

    pub fn latest(&self) -> Option<&Quote> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[Quote] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
