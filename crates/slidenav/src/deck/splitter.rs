/// Split a deck body (frontmatter already removed) into raw panel sources.
///
/// A new panel starts at:
/// 1. a `---` line with blank lines on both sides
/// 2. three or more consecutive blank lines
/// 3. a `# ` heading when the current panel already has content
///
/// Nothing inside a fenced code block ever starts a panel.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut panels = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence = Fence::default();
    let mut blank_run = 0;

    for (i, &line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if fence.is_open() {
            fence.feed(trimmed);
            current.push(line);
            continue;
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                flush(&mut current, &mut panels);
            } else if blank_run < 3 {
                current.push(line);
            }
            continue;
        }

        let prev_blank = i == 0 || blank_run > 0;
        let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
        blank_run = 0;

        if is_dash_separator(trimmed) && prev_blank && next_blank {
            flush(&mut current, &mut panels);
            continue;
        }

        if line.starts_with("# ") && has_content(&current) {
            flush(&mut current, &mut panels);
        }

        fence.feed(trimmed);
        current.push(line);
    }
    flush(&mut current, &mut panels);

    panels
}

fn flush(current: &mut Vec<&str>, panels: &mut Vec<String>) {
    let text = current.join("\n").trim().to_string();
    if !text.is_empty() {
        panels.push(text);
    }
    current.clear();
}

fn has_content(lines: &[&str]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

/// Tracks whether we are inside a ``` or ~~~ fenced block.
#[derive(Default)]
struct Fence {
    marker: Option<(char, usize)>,
}

impl Fence {
    fn is_open(&self) -> bool {
        self.marker.is_some()
    }

    fn feed(&mut self, trimmed: &str) {
        match self.marker {
            Some((ch, len)) => {
                let count = trimmed.chars().take_while(|&c| c == ch).count();
                if count >= len && trimmed.chars().skip(count).all(char::is_whitespace) {
                    self.marker = None;
                }
            }
            None => {
                for ch in ['`', '~'] {
                    let count = trimmed.chars().take_while(|&c| c == ch).count();
                    if count >= 3 {
                        self.marker = Some((ch, count));
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_split() {
        let panels = split("Panel one\n\n\n\nPanel two");
        assert_eq!(panels, vec!["Panel one", "Panel two"]);
    }

    #[test]
    fn test_two_blank_lines_do_not_split() {
        let panels = split("Panel one\n\n\nstill one");
        assert_eq!(panels.len(), 1);
    }

    #[test]
    fn test_dash_separator() {
        let panels = split("Panel one\n\n---\n\nPanel two");
        assert_eq!(panels, vec!["Panel one", "Panel two"]);
    }

    #[test]
    fn test_dash_without_blank_lines_is_content() {
        let panels = split("Panel one\n---\nstill one");
        assert_eq!(panels.len(), 1);
        assert!(panels[0].contains("---"));
    }

    #[test]
    fn test_heading_inference() {
        let panels = split("# First\n\nContent\n\n# Second\n\nMore content");
        assert_eq!(panels.len(), 2);
        assert!(panels[0].starts_with("# First"));
        assert!(panels[1].starts_with("# Second"));
    }

    #[test]
    fn test_h2_no_split() {
        assert_eq!(split("# Title\n\n## Subtitle\n\nContent").len(), 1);
    }

    #[test]
    fn test_combined_separators() {
        // Overlapping separators make a single break.
        let panels = split("Panel one\n\n\n\n---\n\n\n\nPanel two");
        assert_eq!(panels.len(), 2);
    }

    #[test]
    fn test_heading_in_code_block_no_split() {
        let body = "# Title\n\n```python\n# this is a comment\n\n\n\n---\n\nprint('hi')\n```";
        let panels = split(body);
        assert_eq!(panels.len(), 1, "fenced content must stay in one panel");
    }

    #[test]
    fn test_tilde_fence() {
        let body = "# Title\n\n~~~~\n# not a heading\n~~~~\n\n# Next";
        assert_eq!(split(body).len(), 2);
    }

    #[test]
    fn test_crlf_and_empty_input() {
        assert_eq!(split("A\r\n\r\n---\r\n\r\nB").len(), 2);
        assert!(split("\n\n\n\n").is_empty());
    }
}
