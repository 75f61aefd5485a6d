use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{PlaylistItem, TrackTableRow};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Fisher–Yates: walks from the last index down and swaps each slot with a
/// uniformly chosen index in `[0, i]`.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// `m:ss` below one hour, `Hh Mm SSs` above.
pub fn format_duration(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let rest = ms % 3_600_000;
    let minutes = rest / 60_000;
    let seconds = (rest % 60_000) / 1000;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds:02}s")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Turns what a user may paste into a track URI.
///
/// Accepts `spotify:track:<id>`, `https://open.spotify.com/track/<id>?...`
/// and a bare track id.
pub fn normalize_track_uri(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.starts_with("spotify:") {
        return Some(input.to_string());
    }

    if let Some(rest) = input.split("open.spotify.com/track/").nth(1) {
        let id = rest.split(['?', '/', '#']).next().unwrap_or_default();
        return (!id.is_empty()).then(|| format!("spotify:track:{id}"));
    }

    if input.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Some(format!("spotify:track:{input}"));
    }

    None
}

pub fn track_rows(items: &[PlaylistItem]) -> Vec<TrackTableRow> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match &item.track {
            Some(track) => TrackTableRow {
                position: index,
                name: track.name.clone(),
                artists: track.artist_names(),
                album: track
                    .album
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                duration: format_duration(track.duration_ms),
            },
            None => TrackTableRow {
                position: index,
                name: "<unavailable>".to_string(),
                artists: String::new(),
                album: String::new(),
                duration: String::new(),
            },
        })
        .collect()
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
