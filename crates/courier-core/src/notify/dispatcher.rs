//! MessageDispatcher - ordered provider table.

use std::sync::Arc;

use tracing::debug;

use super::approve::CommentApproveProvider;
use super::comment::NewCommentProvider;
use super::follow::NewFollowerProvider;
use super::provider::{MessageProvider, ProviderError};
use crate::domain::{Dispatch, NotificationPayload};
use crate::ports::{Clock, IdGenerator};

/// Asks each provider in order; the first one that claims the payload wins.
///
/// The table is total: a payload no provider recognizes yields `Ok(None)`.
/// That is a valid outcome, not an error.
pub struct MessageDispatcher {
    providers: Vec<Arc<dyn MessageProvider>>,
}

impl MessageDispatcher {
    pub fn new(providers: Vec<Arc<dyn MessageProvider>>) -> Self {
        Self { providers }
    }

    /// Approve, comment and follow providers sharing one id generator.
    pub fn with_default_providers(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        let providers: Vec<Arc<dyn MessageProvider>> = vec![
            Arc::new(CommentApproveProvider::new(ids.clone(), clock.clone())),
            Arc::new(NewCommentProvider::new(ids.clone(), clock.clone())),
            Arc::new(NewFollowerProvider::new(ids, clock)),
        ];
        Self::new(providers)
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    pub fn dispatch(&self, payload: &NotificationPayload) -> Result<Option<Dispatch>, ProviderError> {
        for provider in &self.providers {
            if let Some(dispatch) = provider.check(payload)? {
                debug!(kind = provider.kind(), notification_id = %dispatch.notification.id, "Payload dispatched");
                return Ok(Some(dispatch));
            }
        }
        debug!(kind = %payload.kind, "No provider recognized payload");
        Ok(None)
    }
}
