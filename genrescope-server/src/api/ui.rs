//! UI Routes - HTML pages for the genrescope web interface
//!
//! Plain HTML/CSS with a little vanilla JS over the JSON API; no template
//! engine and no frontend framework.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome_page))
        .route("/about", get(about_page))
        .route("/contact", get(contact_page))
        .route("/library", get(library_page))
}

const PAGE_STYLE: &str = r#"
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #6633cc;
            padding-bottom: 10px;
        }
        .button {
            display: inline-block;
            padding: 10px 20px;
            background: #6633cc;
            color: white;
            text-decoration: none;
            border: none;
            border-radius: 4px;
            margin: 10px 5px;
            cursor: pointer;
        }
        .button:hover { background: #5228a3; }
        .track { display: flex; align-items: center; gap: 12px; padding: 8px 0; border-bottom: 1px solid #eee; }
        .track img { width: 40px; height: 40px; }
        .result { background: #f6f3fc; border-radius: 6px; padding: 16px; margin-top: 20px; }
        input, textarea { width: 100%; padding: 8px; margin: 4px 0 12px; box-sizing: border-box; }
        .error { color: #a3282f; }
"#;

fn page(title: &str, body: &str, script: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Genrescope</title>
    <style>{PAGE_STYLE}</style>
</head>
<body>
    <nav>
        <a href="/">Home</a> | <a href="/library">Library</a> |
        <a href="/about">About</a> | <a href="/contact">Contact</a>
    </nav>
    {body}
    <script>{script}</script>
</body>
</html>"#
    ))
}

/// Welcome page
async fn welcome_page() -> impl IntoResponse {
    page(
        "Welcome",
        r#"
    <h1>Genrescope</h1>
    <p>Upload a track, find out its genre, and discover similar music from
    emerging artists.</p>
    <a class="button" href="/library">Open your library</a>
"#,
        "",
    )
}

/// About page
async fn about_page() -> impl IntoResponse {
    page(
        "About",
        r#"
    <h1>About</h1>
    <p>Genrescope analyzes the audio itself: it computes a mel spectrogram
    of your track, classifies it into one of ten genres with a pretrained
    model, and recommends catalog tracks with a similar energy,
    danceability and loudness profile.</p>
    <p>When the matched genre has emerging artists in the catalog, they are
    recommended first.</p>
"#,
        "",
    )
}

/// Contact page
async fn contact_page() -> impl IntoResponse {
    page(
        "Contact",
        r#"
    <h1>Contact</h1>
    <p id="status"></p>
    <form id="contact-form">
        <label>Name <input name="name" required></label>
        <label>Email <input name="email" type="email" required></label>
        <label>Message <textarea name="message" rows="5" required></textarea></label>
        <button class="button" type="submit">Send</button>
    </form>
"#,
        r#"
document.getElementById('contact-form').addEventListener('submit', async (e) => {
    e.preventDefault();
    const data = Object.fromEntries(new FormData(e.target).entries());
    const res = await fetch('/api/contact', {
        method: 'POST',
        headers: {'Content-Type': 'application/json'},
        body: JSON.stringify(data),
    });
    const body = await res.json();
    const status = document.getElementById('status');
    if (res.ok) {
        status.textContent = body.message;
        e.target.reset();
    } else {
        status.textContent = body.error.message;
        status.className = 'error';
    }
});
"#,
    )
}

/// Library page: track listing, analysis results, downloads
async fn library_page() -> impl IntoResponse {
    page(
        "Library",
        r#"
    <h1>Your Library</h1>
    <form id="download-form">
        <input name="query" placeholder="Search and download a song...">
        <button class="button" type="submit">Download</button>
        <span id="download-status"></span>
    </form>
    <div id="tracks"><p>Loading tracks...</p></div>
    <div id="result"></div>
"#,
        r#"
async function loadTracks() {
    const res = await fetch('/api/tracks');
    const tracks = await res.json();
    const container = document.getElementById('tracks');
    if (tracks.length === 0) {
        container.innerHTML = '<p>No tracks yet. Download one above.</p>';
        return;
    }
    container.innerHTML = '';
    for (const track of tracks) {
        const row = document.createElement('div');
        row.className = 'track';
        const art = document.createElement('img');
        art.src = track.album_art;
        const name = document.createElement('span');
        name.textContent = track.name;
        const button = document.createElement('button');
        button.className = 'button';
        button.textContent = 'Analyze';
        button.addEventListener('click', () => analyze(track.name));
        row.append(art, name, button);
        container.appendChild(row);
    }
}

async function analyze(filename) {
    const result = document.getElementById('result');
    result.innerHTML = '<p>Analyzing...</p>';
    const res = await fetch('/api/analyze', {
        method: 'POST',
        headers: {'Content-Type': 'application/json'},
        body: JSON.stringify({filename}),
    });
    const body = await res.json();
    if (!res.ok) {
        result.innerHTML = '<p class="error"></p>';
        result.firstChild.textContent = body.error.message;
        return;
    }
    const recs = body.recommendations
        .map(r => `<li>${r.song} — ${r.artist}</li>`)
        .join('') || '<li>No similar tracks in the catalog.</li>';
    result.className = 'result';
    result.innerHTML = `
        <h2>Genre: ${body.genre}</h2>
        <p>Energy ${body.features.energy} · Danceability ${body.features.danceability}
           · Loudness ${body.features.loudness}</p>
        ${body.genre_fact ? `<p><em>${body.genre_fact}</em></p>` : ''}
        <h3>You might also like</h3>
        <ul>${recs}</ul>`;
}

document.getElementById('download-form').addEventListener('submit', async (e) => {
    e.preventDefault();
    const status = document.getElementById('download-status');
    status.textContent = 'Downloading...';
    const query = new FormData(e.target).get('query');
    const res = await fetch('/api/download', {
        method: 'POST',
        headers: {'Content-Type': 'application/json'},
        body: JSON.stringify({query}),
    });
    const body = await res.json();
    status.textContent = res.ok ? body.message : body.error.message;
    if (res.ok) loadTracks();
});

loadTracks();
"#,
    )
}
