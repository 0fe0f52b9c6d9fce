use crate::clip::Clip;
use crate::controller::RequestState;

const STYLE: &str = "body{margin:0;min-height:100vh;background:#111827;color:#f3f4f6;font-family:system-ui,sans-serif;display:flex;justify-content:center;padding:2rem 1rem}\
main{width:100%;max-width:56rem}\
header{text-align:center}header h1{color:#22d3ee;font-size:2.5rem;margin:0}header p{color:#9ca3af}\
form{display:flex;gap:.75rem;margin-top:2rem}\
input{flex:1;padding:.75rem 1rem;border-radius:.5rem;border:1px solid #374151;background:#1f2937;color:inherit}\
button{padding:.75rem 1.5rem;border:0;border-radius:.5rem;background:#0891b2;color:#fff;font-weight:600}\
button:disabled{opacity:.5}\
.error{margin-top:1.5rem;text-align:center;color:#f87171;background:rgba(127,29,29,.5);padding:.75rem;border-radius:.5rem}\
.results{margin-top:3rem}\
.spinner{margin:4rem auto;width:3rem;height:3rem;border:4px solid #374151;border-top-color:#22d3ee;border-radius:50%;animation:spin 1s linear infinite}\
@keyframes spin{to{transform:rotate(360deg)}}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(16rem,1fr));gap:1.5rem}\
.card{background:#1f2937;border-radius:.75rem;padding:1.25rem}.card .index{color:#22d3ee;font-size:.8rem}\
.card .range{font-family:monospace;color:#67e8f9}.card p{color:#d1d5db}\
.empty{text-align:center;padding:4rem 1.5rem;background:rgba(31,41,55,.5);border-radius:.5rem}.empty h3{color:#22d3ee;font-size:1.5rem}";

pub const EMPTY_STATE_TITLE: &str = "No Clips Generated";
pub const EMPTY_STATE_MESSAGE: &str =
    "The AI couldn't generate clip ideas for this topic. Please try a different URL or rephrase your request.";

/// Renders the whole page for `state`.
pub fn render_page(state: &RequestState) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    if state.is_loading {
        html.push_str("<meta http-equiv=\"refresh\" content=\"2\">");
    }
    html.push_str("<title>Clip Suggester</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body><main>");

    html.push_str("<header><h1>Clip Suggester</h1><p>Paste a YouTube link and get ideas for short clips.</p></header>");
    render_form(&mut html, state);

    if let Some(error) = &state.error {
        html.push_str(&format!("<div class=\"error\" role=\"alert\">{}</div>", escape(error)));
    }

    html.push_str("<section class=\"results\">");
    if state.is_loading {
        html.push_str("<div class=\"spinner\" aria-label=\"Generating clips\"></div>");
    } else if !state.clips.is_empty() {
        html.push_str("<div class=\"grid\">");
        for (index, clip) in state.clips.iter().enumerate() {
            render_card(&mut html, index, clip);
        }
        html.push_str("</div>");
    } else if state.shows_empty_state() {
        html.push_str(&format!(
            "<div class=\"empty\"><h3>{}</h3><p>{}</p></div>",
            EMPTY_STATE_TITLE,
            escape(EMPTY_STATE_MESSAGE)
        ));
    }
    html.push_str("</section></main></body></html>");

    html
}

fn render_form(html: &mut String, state: &RequestState) {
    let disabled = if state.is_loading { " disabled" } else { "" };
    html.push_str(&format!(
        "<form method=\"post\" action=\"/generate\">\
         <input type=\"text\" name=\"url\" value=\"{}\" placeholder=\"https://www.youtube.com/watch?v=...\" aria-label=\"YouTube URL\"{disabled}>\
         <button type=\"submit\"{disabled}>{}</button></form>",
        escape(&state.url),
        if state.is_loading { "Generating..." } else { "Generate Clips" },
    ));
}

fn render_card(html: &mut String, index: usize, clip: &Clip) {
    html.push_str(&format!(
        "<article class=\"card\"><span class=\"index\">Clip #{}</span><h2>{}</h2>\
         <div class=\"range\">{} &ndash; {}</div><p>{}</p></article>",
        index + 1,
        escape(&clip.title),
        escape(&clip.start_time),
        escape(&clip.end_time),
        escape(&clip.description),
    ));
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
