// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use memchr::memmem;
use regex::Regex;

const FENCE: &str = "```";
const DIAGRAM_TAG: &str = "mermaid";

/// Pulls diagram source out of a completion, first match wins:
/// a fenced block tagged `mermaid`, then any fenced block, then the full
/// text with HTML-comment annotations stripped. The result is trimmed.
pub fn extract_diagram_source(response: &str) -> String {
    if let Some(block) = fenced_block(response, Some(DIAGRAM_TAG)) {
        return block.trim().to_owned();
    }
    if let Some(block) = fenced_block(response, None) {
        return block.trim().to_owned();
    }
    strip_html_comments(response).trim().to_owned()
}

/// Content of the first fence whose info string matches `tag` (any info
/// string when `tag` is `None`). Returns `None` for unclosed fences.
fn fenced_block<'a>(text: &'a str, tag: Option<&str>) -> Option<&'a str> {
    let finder = memmem::Finder::new(FENCE);

    let mut search_from = 0;
    while let Some(found) = finder.find(text[search_from..].as_bytes()) {
        let open = search_from + found;
        let after_fence = open + FENCE.len();
        let rest = &text[after_fence..];

        let info_end = rest.find('\n').map(|i| after_fence + i)?;
        let info = text[after_fence..info_end].trim();
        let body_start = info_end + 1;

        let matches = match tag {
            Some(tag) => info.eq_ignore_ascii_case(tag),
            None => true,
        };

        if matches {
            let close = finder.find(text[body_start..].as_bytes())?;
            return Some(&text[body_start..body_start + close]);
        }

        // Skip past this fence's closer so tagged search does not land inside
        // an unrelated block's body.
        let close = finder.find(text[body_start..].as_bytes())?;
        search_from = body_start + close + FENCE.len();
    }

    None
}

fn strip_html_comments(text: &str) -> String {
    static HTML_COMMENT: OnceLock<Regex> = OnceLock::new();
    let re = HTML_COMMENT
        .get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment pattern compiles"));
    re.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::extract_diagram_source;

    #[test]
    fn tagged_fence_wins_and_markers_are_removed() {
        let response = "Here you go:\n```mermaid\ngraph TD\n A-->B\n```\nEnjoy!";
        assert_eq!(extract_diagram_source(response), "graph TD\n A-->B");
    }

    #[test]
    fn tagged_fence_is_preferred_over_an_earlier_untagged_one() {
        let response = "```text\nnot a diagram\n```\n```mermaid\ngraph LR\n X-->Y\n```";
        assert_eq!(extract_diagram_source(response), "graph LR\n X-->Y");
    }

    #[test]
    fn any_fence_is_used_when_no_tagged_fence_exists() {
        let response = "Sure:\n```\ngraph TD\n A-->B\n```";
        assert_eq!(extract_diagram_source(response), "graph TD\n A-->B");

        let response = "```mmd\nflowchart LR\n A-->B\n```";
        assert_eq!(extract_diagram_source(response), "flowchart LR\n A-->B");
    }

    #[test]
    fn bare_responses_lose_html_comments_and_whitespace() {
        let response = "  graph TD\n A-->B\n<!-- generated -->\n";
        assert_eq!(extract_diagram_source(response), "graph TD\n A-->B");

        let response = "<!-- a\nmultiline note -->graph TD\n A-->B";
        assert_eq!(extract_diagram_source(response), "graph TD\n A-->B");
    }

    #[test]
    fn unclosed_fences_fall_through_to_the_bare_path() {
        let response = "```mermaid\ngraph TD\n A-->B";
        assert_eq!(extract_diagram_source(response), "```mermaid\ngraph TD\n A-->B");
    }

    #[test]
    fn tag_matching_ignores_case() {
        let response = "```Mermaid\ngraph TD\n A-->B\n```";
        assert_eq!(extract_diagram_source(response), "graph TD\n A-->B");
    }
}
