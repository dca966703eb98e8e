//! Duplex ports between execution contexts.
//!
//! A port pair is the only thing two contexts share. Delivery is ordered and
//! at-most-once; either end may disconnect, after which the peer drains what
//! was already queued and then observes the closure.

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("port is disconnected")]
pub struct ChannelClosed;

/// One end of a duplex channel: sends `Out`, receives `In`.
pub struct Port<Out, In> {
    name: &'static str,
    tx: Option<mpsc::UnboundedSender<Out>>,
    rx: mpsc::UnboundedReceiver<In>,
}

/// Create a connected pair of ports.
pub fn duplex<A, B>(name: &'static str) -> (Port<A, B>, Port<B, A>) {
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();
    (
        Port {
            name,
            tx: Some(a_tx),
            rx: b_rx,
        },
        Port {
            name,
            tx: Some(b_tx),
            rx: a_rx,
        },
    )
}

impl<Out, In> Port<Out, In> {
    pub fn send(&self, msg: Out) -> Result<(), ChannelClosed> {
        match &self.tx {
            Some(tx) => tx.send(msg).map_err(|_| ChannelClosed),
            None => Err(ChannelClosed),
        }
    }

    /// Next message from the peer, or `None` once the peer is gone and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<In> {
        self.rx.recv().await
    }

    /// Close both directions. Idempotent.
    pub fn disconnect(&mut self) {
        if self.tx.take().is_some() {
            debug!(port = self.name, "Port disconnected");
        }
        self.rx.close();
    }

    /// False after our own `disconnect` or once the peer has hung up.
    pub fn is_connected(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_messages_arrive_in_send_order() {
        let (a, mut b) = duplex::<u32, ()>("test");
        for i in 0..5 {
            a.send(i).unwrap();
        }
        for i in 0..5 {
            assert_eq!(b.recv().await, Some(i));
        }
    }

    #[tokio::test]
    async fn test_queued_messages_survive_disconnect() {
        let (mut a, mut b) = duplex::<&str, ()>("test");
        a.send("first").unwrap();
        a.send("second").unwrap();
        a.disconnect();

        assert_eq!(b.recv().await, Some("first"));
        assert_eq!(b.recv().await, Some("second"));
        assert_eq!(b.recv().await, None);
        assert!(!b.is_connected());
    }

    #[tokio::test]
    async fn test_send_after_disconnect_is_rejected() {
        let (mut a, _b) = duplex::<u8, u8>("test");
        a.disconnect();
        a.disconnect();
        assert_eq!(a.send(1), Err(ChannelClosed));
        assert!(!a.is_connected());
    }

    #[tokio::test]
    async fn test_dropping_peer_closes_port() {
        let (a, b) = duplex::<u8, u8>("test");
        drop(b);
        assert!(!a.is_connected());
        assert_eq!(a.send(7), Err(ChannelClosed));
    }
}
