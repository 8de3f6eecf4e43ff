use serde::{Deserialize, Serialize};

/// How a song link can be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicKind {
    /// Embeddable video player (YouTube).
    Video,
    /// Embeddable audio player (Spotify track).
    Audio,
    /// Anything else, shown as a plain link.
    Link,
}

/// A classified song link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicEmbed {
    pub kind: MusicKind,
    pub embed_url: Option<String>,
    pub link: String,
}
