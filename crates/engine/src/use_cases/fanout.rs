//! Bounded-parallel gateway fan-out.

use futures_util::stream::{self, StreamExt};

use citadels_domain::{ChatId, MessageId};

use crate::infrastructure::ports::MessagingGateway;

/// Concurrency cap for bulk gateway calls.
const FANOUT_LIMIT: usize = 4;

/// Deletes a batch of messages with bounded parallelism, awaiting all of
/// them before returning. Individual failures are logged and dropped so a
/// handler can keep going with the state it is about to mutate.
pub async fn delete_many(gateway: &dyn MessagingGateway, chat: ChatId, messages: Vec<MessageId>) {
    stream::iter(messages)
        .for_each_concurrent(FANOUT_LIMIT, |message| async move {
            if let Err(e) = gateway.delete_message(chat, message).await {
                tracing::warn!(%chat, %message, error = %e, "failed to delete message");
            }
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{GatewayError, MockMessagingGateway};

    #[tokio::test]
    async fn deletes_every_message() {
        let chat = ChatId::new(7);
        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_delete_message()
            .times(3)
            .returning(|_, _| Ok(()));

        let ids = vec![MessageId::new(1), MessageId::new(2), MessageId::new(3)];
        delete_many(&gateway, chat, ids).await;
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_batch() {
        let chat = ChatId::new(7);
        let mut gateway = MockMessagingGateway::new();
        gateway.expect_delete_message().times(2).returning(|_, m| {
            if m == MessageId::new(1) {
                Err(GatewayError::Network("timeout".into()))
            } else {
                Ok(())
            }
        });

        delete_many(&gateway, chat, vec![MessageId::new(1), MessageId::new(2)]).await;
    }
}
