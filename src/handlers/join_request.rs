// Routes chat_join_request updates into the debouncer.

use crate::debounce::{JoinRequest, JoinRequestDebouncer, Outcome};
use crate::handlers::utils::display_name;
use std::sync::Arc;
use teloxide::{prelude::*, types::ChatJoinRequest};
use tokio::time::Instant;
use tracing::debug;

// Telegram only stamps updates with whole seconds, so receipt time is used instead.
pub fn join_request_from_update(req: &ChatJoinRequest) -> JoinRequest {
    JoinRequest::new(req.from.id, req.chat.id, display_name(Some(&req.from))).at(Instant::now())
}

pub async fn handle_join_request(
    req: ChatJoinRequest,
    debouncer: Arc<JoinRequestDebouncer<Bot>>,
) -> ResponseResult<()> {
    debug!(
        "Join request received: chat_id = {}, user_id = {}",
        req.chat.id, req.from.id.0
    );

    // Failures are logged inside the debouncer and never reach the dispatcher.
    if let Outcome::Failed(e) = debouncer.handle(join_request_from_update(&req)).await {
        debug!("Join request left pending: {e}");
    }
    Ok(())
}
