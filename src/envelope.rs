//! Decoding of the wire-level message envelope.
//!
//! Each inbound transport message body is a textual encoding of a
//! structured object. Its internal structure is opaque to this crate: the
//! body is decoded generically and the decoded value forwarded verbatim.
//!
//! 线路级消息信封的解码。
//!
//! 每条入站传输消息体都是一个结构化对象的文本编码。其内部结构对本crate
//! 是不透明的：消息体被泛化解码，解码后的值原样转发。

use bytes::Bytes;
use serde_json::Value;

/// An error produced while decoding a message body.
///
/// This is a local condition: a malformed body fails the message, never
/// the connection it arrived on.
///
/// 解码消息体时产生的错误。
///
/// 这是一个局部问题：畸形的消息体只使该条消息失败，绝不影响它所到达的连接。
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not valid UTF-8 text.
    #[error("message body is not valid UTF-8: {0}")]
    NotText(#[from] std::str::Utf8Error),

    /// The body is not a well-formed JSON document.
    #[error("message body is not well-formed JSON: {0}")]
    NotJson(#[from] serde_json::Error),
}

/// Decodes a raw message body into a generic payload value.
/// 将原始消息体解码为泛型载荷值。
pub fn decode(body: &Bytes) -> Result<Value, DecodeError> {
    let text = std::str::from_utf8(body)?;
    Ok(serde_json::from_str(text)?)
}
