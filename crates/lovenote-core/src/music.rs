//! Song-link classification for the confession page.

use std::sync::LazyLock;

use regex::Regex;

use lovenote_types::music::{MusicEmbed, MusicKind};

static YOUTUBE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
        .expect("valid regex")
});
static YOUTUBE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9_-]{11})$").expect("valid regex"));
static SPOTIFY_TRACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"track/([a-zA-Z0-9]+)").expect("valid regex"));

/// Classify a song link. Returns `None` for a blank link.
pub fn classify_music_link(link: &str) -> Option<MusicEmbed> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    if let Some(id) = youtube_id(link) {
        return Some(MusicEmbed {
            kind: MusicKind::Video,
            embed_url: Some(format!("https://www.youtube.com/embed/{id}")),
            link: link.to_string(),
        });
    }

    if let Some(caps) = SPOTIFY_TRACK_RE.captures(link) {
        return Some(MusicEmbed {
            kind: MusicKind::Audio,
            embed_url: Some(format!("https://open.spotify.com/embed/track/{}", &caps[1])),
            link: link.to_string(),
        });
    }

    Some(MusicEmbed {
        kind: MusicKind::Link,
        embed_url: None,
        link: link.to_string(),
    })
}

fn youtube_id(link: &str) -> Option<&str> {
    YOUTUBE_URL_RE
        .captures(link)
        .or_else(|| YOUTUBE_ID_RE.captures(link))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_variants() {
        for link in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
        ] {
            let embed = classify_music_link(link).unwrap();
            assert_eq!(embed.kind, MusicKind::Video, "{link}");
            assert_eq!(
                embed.embed_url.as_deref(),
                Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
            );
            assert_eq!(embed.link, link);
        }
    }

    #[test]
    fn test_spotify_track() {
        let embed =
            classify_music_link("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=x").unwrap();
        assert_eq!(embed.kind, MusicKind::Audio);
        assert_eq!(
            embed.embed_url.as_deref(),
            Some("https://open.spotify.com/embed/track/4uLU6hMCjMI75M1A2tKUQC")
        );
    }

    #[test]
    fn test_other_links_fall_back() {
        let embed = classify_music_link("https://soundcloud.com/artist/song").unwrap();
        assert_eq!(embed.kind, MusicKind::Link);
        assert_eq!(embed.embed_url, None);
        assert!(classify_music_link("   ").is_none());
    }
}
