// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tokio::sync::watch;

/// A live query: yields the full snapshot every time the backend publishes a new one.
///
/// Each snapshot is complete, so a slow consumer only ever sees the latest one; skipped
/// intermediate snapshots carry no information the latest does not. The current snapshot
/// is delivered once right after subscribing.
///
/// Dropping the subscription cancels it; [`Subscription::unsubscribe`] does the same
/// explicitly.
#[derive(Debug)]
pub struct Subscription<T> {
    label: &'static str,
    rx: watch::Receiver<T>,
    primed: bool,
}

impl<T: Clone> Subscription<T> {
    pub fn new(label: &'static str, rx: watch::Receiver<T>) -> Self {
        Self { label, rx, primed: false }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Waits for the next snapshot. Returns `None` once the publisher is gone.
    pub async fn next(&mut self) -> Option<T> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Returns an already-published snapshot that has not been seen yet, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            Ok(false) | Err(_) => None,
        }
    }

    /// True once the publisher has been dropped and no further snapshots can arrive.
    pub fn is_closed(&self) -> bool {
        self.rx.has_changed().is_err()
    }

    pub fn unsubscribe(self) {
        tracing::debug!(subscription = self.label, "unsubscribed");
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::watch;

    use super::Subscription;

    #[tokio::test]
    async fn delivers_current_value_first_then_changes() {
        let (tx, rx) = watch::channel(1);
        let mut sub = Subscription::new("numbers", rx);

        assert_eq!(sub.next().await, Some(1));
        assert_eq!(sub.try_next(), None);

        tx.send_replace(2);
        tx.send_replace(3);
        assert_eq!(sub.try_next(), Some(3));
        assert_eq!(sub.try_next(), None);

        tx.send_replace(4);
        assert_eq!(sub.next().await, Some(4));
    }

    #[tokio::test]
    async fn ends_when_publisher_is_dropped() {
        let (tx, rx) = watch::channel("x".to_owned());
        let mut sub = Subscription::new("strings", rx);
        assert_eq!(sub.try_next().as_deref(), Some("x"));

        drop(tx);
        assert!(sub.is_closed());
        assert_eq!(sub.next().await, None);
    }

    #[test]
    fn unsubscribe_releases_the_receiver() {
        let (tx, rx) = watch::channel(0u8);
        let sub = Subscription::new("count", rx);
        assert_eq!(tx.receiver_count(), 1);

        sub.unsubscribe();
        assert_eq!(tx.receiver_count(), 0);
    }
}
