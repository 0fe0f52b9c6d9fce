use once_cell::sync::Lazy;
use serde_json::{json, Value};

const INSTRUCTIONS: &str = "You are an expert video editor who finds the most engaging moments in long-form videos. \
Analyze the YouTube video at the URL below and suggest 3 to 5 short clips that would work well as standalone social media shorts. \
For each clip give a catchy title, a start time and an end time formatted as MM:SS (or H:MM:SS for videos over an hour), \
and a one or two sentence description of why the moment is compelling. \
Respond only with a JSON array of objects with the keys \"title\", \"startTime\", \"endTime\" and \"description\".\n\nVideo URL: ";

/// Gemini `responseSchema` for a list of clips.
pub static CLIP_LIST_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "startTime": { "type": "STRING" },
                "endTime": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "required": ["title", "startTime", "endTime", "description"],
            "propertyOrdering": ["title", "startTime", "endTime", "description"]
        }
    })
});

pub fn build_prompt(url: &str) -> String {
    let mut result = String::with_capacity(INSTRUCTIONS.len() + url.len());
    result.push_str(INSTRUCTIONS);
    result.push_str(url);
    result
}
