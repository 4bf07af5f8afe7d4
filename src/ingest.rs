//! Upstream detection feed.
//!
//! The video pipeline runs as a separate process and pushes one
//! JSON-encoded [`DetectionFrame`] per UDP datagram. The receiver
//! parses each datagram, counts what it sees, and hands good frames
//! to the engine; malformed datagrams are logged at debug level and
//! dropped, since upstream hiccups are routine and absorbed by the
//! engine's absence handling.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::api::AppState;
use crate::domain::DetectionFrame;

/// Where and how to listen for detection frames.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Address to bind
    pub bind_address: String,
    /// UDP port (default: 5600)
    pub port: u16,
    /// Receive buffer size per datagram
    pub buffer_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5600,
            buffer_size: 65536,
        }
    }
}

/// Counters for the detection feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiverStats {
    /// Datagrams received
    pub frames_received: u64,
    /// Datagrams that parsed into a frame
    pub frames_parsed: u64,
    /// Datagrams discarded as malformed
    pub parse_errors: u64,
    /// Total bytes received
    pub bytes_received: u64,
}

/// UDP receiver for detection frames.
pub struct FrameReceiver {
    socket: UdpSocket,
    buffer: Vec<u8>,
    stats: ReceiverStats,
}

impl FrameReceiver {
    /// Bind the receiver socket.
    pub async fn bind(config: &IngestConfig) -> std::io::Result<Self> {
        let addr = format!("{}:{}", config.bind_address, config.port);
        let socket = UdpSocket::bind(&addr).await?;
        tracing::info!(addr = %socket.local_addr()?, "detection feed listening");

        Ok(Self {
            socket,
            buffer: vec![0u8; config.buffer_size],
            stats: ReceiverStats::default(),
        })
    }

    /// The bound socket address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive the next datagram. Returns `Ok(None)` for a malformed
    /// datagram (counted and skipped).
    pub async fn receive(&mut self) -> std::io::Result<Option<DetectionFrame>> {
        let (len, peer) = self.socket.recv_from(&mut self.buffer).await?;
        self.stats.frames_received += 1;
        self.stats.bytes_received += len as u64;

        match serde_json::from_slice::<DetectionFrame>(&self.buffer[..len]) {
            Ok(frame) => {
                self.stats.frames_parsed += 1;
                Ok(Some(frame))
            }
            Err(err) => {
                self.stats.parse_errors += 1;
                tracing::debug!(%peer, %err, "discarding malformed detection frame");
                Ok(None)
            }
        }
    }

    /// Current feed counters.
    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }
}

/// Pump frames from the feed into the engine until the socket fails.
pub async fn run(state: AppState, config: IngestConfig) -> std::io::Result<()> {
    let mut receiver = FrameReceiver::bind(&config).await?;
    loop {
        if let Some(frame) = receiver.receive().await? {
            state.ingest(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_config() -> IngestConfig {
        IngestConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_receive_parses_frame() {
        let mut receiver = FrameReceiver::bind(&loopback_config()).await.unwrap();
        let addr = receiver.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let payload = r#"{"detections":[{"tracker_id":7,"class_id":0,"confidence":0.9,
            "bbox":{"left":100.0,"top":100.0,"width":60.0,"height":200.0}}]}"#;
        sender.send_to(payload.as_bytes(), addr).await.unwrap();

        let frame = receiver.receive().await.unwrap().unwrap();
        assert_eq!(frame.detections.len(), 1);
        assert_eq!(frame.detections[0].tracker_id, 7);
        assert_eq!(receiver.stats().frames_parsed, 1);
    }

    #[tokio::test]
    async fn test_malformed_datagram_is_counted_and_skipped() {
        let mut receiver = FrameReceiver::bind(&loopback_config()).await.unwrap();
        let addr = receiver.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"not a frame", addr).await.unwrap();

        assert!(receiver.receive().await.unwrap().is_none());
        let stats = receiver.stats();
        assert_eq!(stats.frames_received, 1);
        assert_eq!(stats.parse_errors, 1);
        assert_eq!(stats.frames_parsed, 0);
    }
}
