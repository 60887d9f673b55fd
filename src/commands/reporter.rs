//! Failure notices.

use std::sync::Arc;

use log::warn;

use crate::commands::notice::{Notice, Replier};

/// Renders user-facing failures into the room they originated from.
///
/// Each call sends exactly one notice. Delivery is best effort: a failure to
/// send is logged and dropped.
#[derive(Clone)]
pub struct ErrorReporter {
    replier: Arc<dyn Replier>,
}

impl ErrorReporter {
    pub fn new(replier: Arc<dyn Replier>) -> Self {
        ErrorReporter { replier }
    }

    pub async fn on_error(&self, room_id: &str, title: &str, tip: Option<&str>) {
        let notice = Notice::error(title, tip);

        if let Err(e) = self.replier.send_notice(room_id, &notice).await {
            warn!("failed to send error notice to {}: {:?}", room_id, e);
        }
    }
}
