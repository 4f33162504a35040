//! WebSocket transport implementation.
//!
//! WebSocket传输实现。

use super::{Connection, Connector};
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};
use tracing::{debug, trace};
use url::Url;

/// A connector that opens `ws://` / `wss://` connections.
///
/// 打开 `ws://` / `wss://` 连接的连接器。
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

/// An open WebSocket connection.
///
/// Text and binary frames carry message bodies; ping/pong are handled by
/// the protocol library; a close frame, the end of the stream, and a
/// protocol error are all treated identically as closure.
///
/// 打开的WebSocket连接。
///
/// 文本帧和二进制帧承载消息体；ping/pong由协议库处理；
/// 关闭帧、流结束与协议错误被同等视为关闭。
pub struct WsConnection {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connector for WsConnector {
    type Connection = WsConnection;

    async fn connect(&self, target: &Url) -> Result<Self::Connection> {
        match target.scheme() {
            "ws" | "wss" => {}
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        }

        debug!(url = %target, "Opening WebSocket connection");
        let (inner, _response) = connect_async(target.as_str()).await.map_err(|e| match e {
            WsError::Io(io) => Error::Io(io),
            other => Error::Transport(other.to_string()),
        })?;
        debug!(url = %target, "WebSocket connection established");

        Ok(WsConnection { inner })
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn next_message(&mut self) -> Option<Bytes> {
        loop {
            match self.inner.next().await {
                Some(Ok(msg @ (Message::Text(_) | Message::Binary(_)))) => {
                    return Some(msg.into_data());
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "WebSocket closed by peer");
                    return None;
                }
                // Ping/pong/raw frames carry no message body.
                Some(Ok(other)) => {
                    trace!(kind = ?other, "Skipping non-data frame");
                    continue;
                }
                Some(Err(e)) => {
                    debug!(error = %e, "WebSocket errored; treating as closure");
                    return None;
                }
                None => return None,
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.inner.close(None).await {
            trace!(error = %e, "Error while closing WebSocket; ignored");
        }
    }
}
