//! Outbound replies.
//!
//! Commands and the dispatcher talk to the room through the [`Replier`] trait,
//! so they never depend on the Matrix client directly.

use async_trait::async_trait;
use mockall::automock;

/// Accent color of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    /// Hex code used in formatted messages.
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Red => "#dd5353",
            Color::Green => "#3bb273",
            Color::Blue => "#3e70dd",
        }
    }
}

/// A formatted notice: a title, an optional footer hint and an accent color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub tip: Option<String>,
    pub color: Color,
}

impl Notice {
    pub fn error(title: &str, tip: Option<&str>) -> Self {
        Notice {
            title: title.to_string(),
            tip: tip.map(str::to_string),
            color: Color::Red,
        }
    }

    pub fn success(title: &str) -> Self {
        Notice {
            title: title.to_string(),
            tip: None,
            color: Color::Green,
        }
    }

    pub fn info(title: &str) -> Self {
        Notice {
            title: title.to_string(),
            tip: None,
            color: Color::Blue,
        }
    }

    /// Plain text rendering, used as the fallback body of formatted messages.
    pub fn plain(&self) -> String {
        match &self.tip {
            Some(tip) => format!("{}\n\n{}", self.title, tip),
            None => self.title.clone(),
        }
    }

    /// HTML rendering with the accent color applied to the title.
    pub fn html(&self) -> String {
        let title = format!(
            "<font data-mx-color=\"{}\"><b>{}</b></font>",
            self.color.hex(),
            escape(&self.title)
        );
        match &self.tip {
            Some(tip) => format!("{}<br><sub>{}</sub>", title, escape(tip)),
            None => title,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Capability to send messages into a room.
#[automock]
#[async_trait]
pub trait Replier: Send + Sync {
    /// Sends a formatted notice into the room.
    async fn send_notice(&self, room_id: &str, notice: &Notice) -> anyhow::Result<()>;
    /// Sends a Markdown message into the room.
    async fn send_markdown(&self, room_id: &str, body: &str) -> anyhow::Result<()>;
}
