//! Album-art placeholder mapping
//!
//! There is no artwork lookup; library entries get a deterministic colored
//! placeholder derived from the first character of the file name.

/// URL path of the placeholder art for a track name
pub fn album_art_url(track_name: &str) -> String {
    let color = match track_name.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a') | Some('m') | Some('y') => "blue",
        Some('b') | Some('n') | Some('z') => "red",
        Some('c') | Some('o') => "green",
        Some('d') | Some('p') => "purple",
        Some('e') | Some('q') => "orange",
        Some('f') | Some('r') => "teal",
        Some('g') | Some('s') => "pink",
        Some('h') | Some('t') => "indigo",
        Some('i') | Some('u') => "amber",
        Some('j') | Some('v') => "cyan",
        Some('k') | Some('w') => "lime",
        Some('l') | Some('x') => "yellow",
        _ => "gray",
    };
    format!("/static/images/album-art/{}.svg", color)
}
