pub mod splitter;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// The slide list of the built-in deck.
pub const BUILTIN_SLIDE_NAMES: [&str; 13] = [
    "Title",
    "Problem",
    "Solution",
    "Architecture",
    "Flow",
    "ML Pipeline",
    "Scoring",
    "Security",
    "Token",
    "Performance",
    "Use Cases",
    "Stats",
    "Closing",
];

const BUILTIN_BODIES: [&str; 13] = [
    "Scroll, click a dot, or press \u{2192} to begin.",
    "Why the status quo falls short.",
    "What we built instead.",
    "How the pieces fit together.",
    "One request, end to end.",
    "Models, features and training.",
    "Turning signals into a score.",
    "Threat model and safeguards.",
    "The token and what it is for.",
    "Latency and throughput numbers.",
    "Where this is used today.",
    "The project by the numbers.",
    "Thank you. Questions?",
];

#[derive(Debug, Clone)]
pub struct Deck {
    pub meta: DeckMeta,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub name: String,
    pub body: String,
}

impl Deck {
    pub fn builtin() -> Self {
        let panels = BUILTIN_SLIDE_NAMES
            .iter()
            .zip(BUILTIN_BODIES)
            .map(|(name, body)| Panel {
                name: name.to_string(),
                body: body.to_string(),
            })
            .collect();
        Self {
            meta: DeckMeta::default(),
            panels,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let deck = Self::parse(&content)?;
        if deck.is_empty() {
            anyhow::bail!("No slides found in {}", path.display());
        }
        tracing::debug!(path = %path.display(), slides = deck.panels.len(), "deck loaded");
        Ok(deck)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let (meta, body) = extract_frontmatter(content)?;
        let panels = splitter::split(body)
            .iter()
            .enumerate()
            .map(|(i, raw)| Panel::from_source(i, raw))
            .collect();
        Ok(Self { meta, panels })
    }

    pub fn slide_names(&self) -> Vec<String> {
        self.panels.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

impl Panel {
    /// Name the panel after its first heading, or `Slide N` without one.
    fn from_source(index: usize, raw: &str) -> Self {
        let mut name = None;
        let mut body = Vec::new();
        for line in raw.lines() {
            if name.is_none() {
                if let Some(heading) = heading_text(line) {
                    name = Some(heading.to_string());
                    continue;
                }
            }
            body.push(line);
        }
        Self {
            name: name.unwrap_or_else(|| format!("Slide {}", index + 1)),
            body: body.join("\n").trim().to_string(),
        }
    }
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = line[hashes..].strip_prefix(' ')?.trim();
    (!rest.is_empty()).then_some(rest)
}

/// Split an optional leading `---` YAML block from the body.
fn extract_frontmatter(content: &str) -> Result<(DeckMeta, &str)> {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok((DeckMeta::default(), content));
    };
    let Some(end) = rest.find("\n---") else {
        return Ok((DeckMeta::default(), content));
    };
    let yaml = &rest[..end];
    let after = &rest[end + 4..];
    let body = after.split_once('\n').map(|(_, b)| b).unwrap_or("");
    let meta = if yaml.trim().is_empty() {
        DeckMeta::default()
    } else {
        serde_yaml::from_str(yaml).context("Invalid deck frontmatter")?
    };
    Ok((meta, body))
}
