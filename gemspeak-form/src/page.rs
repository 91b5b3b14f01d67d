//! HTML for the single form page.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gemspeak::WavInfo;

/// Name offered to the browser when the audio is downloaded.
pub const DOWNLOAD_NAME: &str = "output.wav";

pub enum Outcome {
    Idle,
    Failed(String),
    Generated { wav: Vec<u8>, info: WavInfo },
}

/// Everything the page shows. The key is refilled so it survives between
/// generations; it is never logged.
pub struct PageView<'a> {
    pub api_key: &'a str,
    pub style: &'a str,
    pub script: &'a str,
    pub outcome: Outcome,
}

impl Default for PageView<'_> {
    fn default() -> Self {
        Self {
            api_key: "",
            style: "",
            script: "",
            outcome: Outcome::Idle,
        }
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn describe(info: &WavInfo) -> String {
    let layout = match info.channels {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        n => format!("{} channels", n),
    };
    format!(
        "{}, {} Hz, {}-bit, {:.2} s",
        layout, info.sample_rate, info.bits_per_sample, info.duration_secs
    )
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Gemini TTS Generator</title>
<style>
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 16rem; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; max-width: 44rem; margin: 0 auto; padding: 2rem; }
label { display: block; font-weight: 600; margin: 1rem 0 .3rem; }
input, textarea { width: 100%; box-sizing: border-box; padding: .5rem; font: inherit; }
textarea { min-height: 9rem; }
button { margin-top: 1rem; padding: .6rem 1.2rem; font: inherit; cursor: pointer; }
.banner { padding: .8rem 1rem; border-radius: .4rem; margin: 1rem 0; }
.error { background: #fde8e8; color: #8a1c1c; }
.success { background: #e6f4ea; color: #1e5631; }
#busy { display: none; margin-top: 1rem; }
audio { width: 100%; margin-top: .5rem; }
</style>
</head>
<body>
<form method="post" action="/generate" onsubmit="document.getElementById('busy').style.display='block'; this.querySelector('button').disabled=true;" style="display: contents">
"#;

const TAIL: &str = r#"</form>
</body>
</html>
"#;

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::from(HEAD);

    let _ = write!(
        html,
        r#"<aside>
<h3>🔑 Gemini API Key</h3>
<label for="api_key">Enter your API Key</label>
<input id="api_key" name="api_key" type="password" placeholder="sk-xxxxxxxxxxxxxxxx" autocomplete="off" value="{}">
</aside>
<main>
<h1>🎙️ Gemini Text-to-Speech</h1>
<p>Generate <strong>high-quality speech</strong> from text using <strong>Google Gemini</strong>.
Just enter your API key, choose a style, and write your script.</p>
"#,
        escape_html(view.api_key)
    );

    let _ = write!(
        html,
        r#"<label for="style">🎭 Speaking Style</label>
<input id="style" name="style" type="text" placeholder="Example: Calm and friendly tone" value="{}">
<label for="script">📝 Script to Speak</label>
<textarea id="script" name="script" placeholder="Type your text here...">{}</textarea>
<button type="submit">🎧 Generate Audio</button>
<div id="busy">Generating audio... ⏳</div>
"#,
        escape_html(view.style),
        escape_html(view.script)
    );

    match &view.outcome {
        Outcome::Idle => {}
        Outcome::Failed(message) => {
            let _ = write!(
                html,
                "<div class=\"banner error\" role=\"alert\">{}</div>\n",
                escape_html(message)
            );
        }
        Outcome::Generated { wav, info } => {
            let data_uri = format!("data:audio/wav;base64,{}", STANDARD.encode(wav));
            let _ = write!(
                html,
                r#"<div class="banner success">✅ Audio generated successfully!</div>
<audio controls src="{uri}"></audio>
<p><small>{details}</small></p>
<a href="{uri}" download="{name}">⬇️ Download Audio</a>
"#,
                uri = data_uri,
                details = escape_html(&describe(info)),
                name = DOWNLOAD_NAME
            );
        }
    }

    html.push_str("</main>\n");
    html.push_str(TAIL);
    html
}
