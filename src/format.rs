//! Markdown-lite to HTML
//!
//! Supports exactly three constructs: fenced code blocks, `**bold**` and `*italic*`. Code blocks
//! are cut out first so emphasis never touches code.
//!
//! Trust boundary: nothing is HTML-escaped. Model output goes into the fragment verbatim, so any
//! consumer that injects it into a document is trusting the model.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid fenced block pattern"));
static FENCE_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_]*)\n(.*?)```").expect("valid fence parts pattern")
});
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));

/// Render model text as an HTML fragment.
pub fn to_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut html = String::with_capacity(text.len());
    let mut last = 0;

    for block in FENCED_BLOCK.find_iter(text) {
        html.push_str(&prose(&text[last..block.start()]));
        html.push_str(&code_block(block.as_str()));
        last = block.end();
    }
    html.push_str(&prose(&text[last..]));

    html
}

/// Text between closed fences. A segment that opens with a fence never closed (truncated
/// output) is code and stays as it is.
fn prose(segment: &str) -> String {
    if segment.starts_with("```") {
        segment.to_string()
    } else {
        emphasis(segment)
    }
}

fn code_block(fenced: &str) -> String {
    FENCE_PARTS
        .replace_all(fenced, r#"<pre><code class="language-$1">$2</code></pre>"#)
        .into_owned()
}

fn emphasis(prose: &str) -> String {
    let bold = BOLD.replace_all(prose, "<strong>$1</strong>");
    ITALIC.replace_all(&bold, "<em>$1</em>").into_owned()
}
