use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::types::MessageId;

/// One in-flight request: its cancellation token and the assistant entry it
/// writes into.
#[derive(Debug, Clone)]
pub struct StreamSession {
    id: Uuid,
    token: CancellationToken,
    target: MessageId,
}

impl StreamSession {
    #[must_use]
    pub fn new(target: MessageId) -> Self {
        Self {
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
            target,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn target(&self) -> MessageId {
        self.target
    }

    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_distinct() {
        let a = StreamSession::new(MessageId::new(2));
        let b = StreamSession::new(MessageId::new(2));

        assert!(!a.same_as(&b));
        assert!(a.same_as(&a.clone()));
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let session = StreamSession::new(MessageId::new(4));
        let handle = session.clone();

        assert!(!handle.is_cancelled());
        session.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(handle.target(), MessageId::new(4));
    }
}
