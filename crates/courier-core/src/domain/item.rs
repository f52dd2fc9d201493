//! Queue item handle.

/// An opaque work item leased from a pull queue.
///
/// The queue owns the item; the leaser holds this handle for the duration of
/// one leasing cycle and hands it back on delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    name: String,
    payload: Vec<u8>,
    retry_count: u32,
    tag: Option<String>,
}

impl QueueItem {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
            retry_count: 0,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the number of times this item has been leased (current lease included).
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}
