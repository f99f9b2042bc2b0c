//! Gazetteer annotator.
//!
//! A lightweight NER backend driven by a lexicon "model" file. Each line of
//! the input is tokenized on whitespace and scanned left to right:
//!
//! 1. a run of capitalized tokens ending in an organization suffix
//!    ("Acme Widgets Inc.") is an organization,
//! 2. the longest labelled phrase starting at the token ("New York") takes
//!    the phrase's label,
//! 3. a known given name followed by up to two capitalized tokens
//!    ("John Q. Doe") is a person.
//!
//! Spans never cross line breaks. Output is in order of position.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use addrex_core::error::{AddrexError, AddrexResult};
use addrex_core::traits::Annotator;
use addrex_core::types::{AnnotatedEntity, EntityCategory};

/// Suffixes used when a model does not list its own. "Co" is left out
/// because it collides with the Colorado abbreviation.
static DEFAULT_ORG_SUFFIXES: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "inc", "incorporated", "llc", "llp", "ltd", "limited", "corp", "corporation", "company",
        "gmbh", "ag", "plc", "pty", "bv", "group", "holdings",
    ]
    .iter()
    .map(|s| suffix_key(s))
    .collect()
});

const MAX_ORG_TOKENS: usize = 6;
const MAX_SURNAME_TOKENS: usize = 2;

/// A labelled phrase in a gazetteer model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerPhrase {
    /// Phrase text, matched token by token.
    pub text: String,
    /// Backend label (`GPE`, `ORG`, `PERSON`, `LOC`, ...).
    pub label: String,
}

/// On-disk gazetteer model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerModel {
    /// Model name.
    pub name: String,
    /// Model version.
    pub version: String,
    /// Labelled phrases.
    pub phrases: Vec<GazetteerPhrase>,
    /// Given names that start a person span.
    pub given_names: Vec<String>,
    /// Organization suffixes; the built-in list is used when empty.
    pub org_suffixes: Vec<String>,
    /// Match phrases and names case-sensitively.
    pub case_sensitive: bool,
}

impl GazetteerModel {
    /// Parse a model from file content, picking the format by extension.
    pub fn parse(content: &str, path: &Path) -> AddrexResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str());
        let parsed = match ext {
            Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
            Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
            Some("yaml" | "yml") => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            _ => Err("unsupported model format, use .json, .toml or .yaml".to_string()),
        };

        parsed.map_err(|e| {
            AddrexError::Configuration(format!(
                "Failed to load annotator model {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// One whitespace-delimited token with its byte span in the full text.
#[derive(Debug, Clone)]
struct Token<'a> {
    text: &'a str,
    start: usize,
    end: usize,
    // Trailing punctuation (a comma, a colon) was stripped.
    closed: bool,
}

impl Token<'_> {
    fn is_capitalized(&self) -> bool {
        self.text
            .chars()
            .next()
            .map(|c| c.is_uppercase() || c.is_ascii_digit())
            .unwrap_or(false)
    }
}

/// Gazetteer-backed annotator.
pub struct GazetteerAnnotator {
    name: String,
    case_sensitive: bool,
    // First normalized token -> (phrase tokens, category), longest first.
    phrases: HashMap<String, Vec<(Vec<String>, EntityCategory)>>,
    given_names: HashSet<String>,
    org_suffixes: HashSet<String>,
}

impl GazetteerAnnotator {
    /// Build an annotator from a parsed model.
    pub fn from_model(model: GazetteerModel) -> AddrexResult<Self> {
        if model.phrases.is_empty() && model.given_names.is_empty() {
            return Err(AddrexError::Configuration(format!(
                "Annotator model '{}' has no phrases or given names",
                model.name
            )));
        }

        let case_sensitive = model.case_sensitive;
        let norm = |s: &str| normalize(s, case_sensitive);

        let mut phrases: HashMap<String, Vec<(Vec<String>, EntityCategory)>> = HashMap::new();
        for phrase in &model.phrases {
            let tokens: Vec<String> = tokenize(&phrase.text, 0).iter().map(|t| norm(t.text)).collect();
            let Some(first) = tokens.first().cloned() else {
                continue;
            };
            phrases
                .entry(first)
                .or_default()
                .push((tokens, EntityCategory::from_label(&phrase.label)));
        }
        for candidates in phrases.values_mut() {
            candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        }

        let given_names: HashSet<String> =
            model.given_names.iter().map(|n| norm(n.as_str())).collect();

        let org_suffixes: HashSet<String> = if model.org_suffixes.is_empty() {
            DEFAULT_ORG_SUFFIXES.clone()
        } else {
            model.org_suffixes.iter().map(|s| suffix_key(s)).collect()
        };

        let name = if model.name.is_empty() {
            addrex_core::traits::DEFAULT_MODEL.to_string()
        } else {
            model.name
        };

        Ok(Self {
            name,
            case_sensitive,
            phrases,
            given_names,
            org_suffixes,
        })
    }

    /// Load a model file.
    ///
    /// A missing file is a configuration error that names the path and how
    /// to provision the model.
    pub async fn load(path: impl AsRef<Path>, model: &str) -> AddrexResult<Self> {
        let path = path.as_ref();
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AddrexError::model_missing(
                    model,
                    &path.display().to_string(),
                    "Copy models/en_address_gazetteer.json there or set ADDREX_ANNOTATOR_MODEL_PATH.",
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut parsed = GazetteerModel::parse(&content, path)?;
        if parsed.name.is_empty() {
            parsed.name = model.to_string();
        }
        let annotator = Self::from_model(parsed)?;
        info!(
            model = %annotator.name,
            path = %path.display(),
            phrases = annotator.phrases.values().map(Vec::len).sum::<usize>(),
            given_names = annotator.given_names.len(),
            "Loaded gazetteer model"
        );
        Ok(annotator)
    }

    /// Annotate synchronously; the async trait method delegates here.
    pub fn annotate_sync(&self, text: &str) -> Vec<AnnotatedEntity> {
        let mut entities = Vec::new();
        let mut offset = 0;

        for line in text.split('\n') {
            let tokens = tokenize(line, offset);
            self.annotate_line(text, &tokens, &mut entities);
            offset += line.len() + 1;
        }

        entities
    }

    fn annotate_line(&self, text: &str, tokens: &[Token<'_>], out: &mut Vec<AnnotatedEntity>) {
        let mut i = 0;
        while i < tokens.len() {
            if let Some(end) = self.match_organization(tokens, i) {
                out.push(span(text, tokens, i, end, EntityCategory::Organization));
                i = end + 1;
            } else if let Some((end, category)) = self.match_phrase(tokens, i) {
                out.push(span(text, tokens, i, end, category));
                i = end + 1;
            } else if let Some(end) = self.match_person(tokens, i) {
                out.push(span(text, tokens, i, end, EntityCategory::PersonName));
                i = end + 1;
            } else {
                i += 1;
            }
        }
    }

    /// Capitalized run from `i` that ends in an organization suffix.
    fn match_organization(&self, tokens: &[Token<'_>], i: usize) -> Option<usize> {
        // The suffix alone ("Co.") is not an organization.
        if !tokens[i].is_capitalized() || self.is_org_suffix(&tokens[i]) {
            return None;
        }

        let limit = (i + MAX_ORG_TOKENS).min(tokens.len());
        for j in (i + 1)..limit {
            let token = &tokens[j];
            if self.is_org_suffix(token) {
                return Some(j);
            }
            if !(token.is_capitalized() || token.text == "&") {
                return None;
            }
        }
        None
    }

    /// Longest labelled phrase starting at `i`.
    fn match_phrase(&self, tokens: &[Token<'_>], i: usize) -> Option<(usize, EntityCategory)> {
        let first = self.norm(tokens[i].text);
        let candidates = self.phrases.get(&first)?;

        candidates.iter().find_map(|(phrase, category)| {
            let end = i + phrase.len();
            if end > tokens.len() {
                return None;
            }
            let matches = tokens[i..end]
                .iter()
                .zip(phrase)
                .all(|(t, p)| self.norm(t.text) == *p);
            matches.then_some((end - 1, *category))
        })
    }

    /// Given name at `i`, plus any capitalized surname tokens.
    fn match_person(&self, tokens: &[Token<'_>], i: usize) -> Option<usize> {
        let token = &tokens[i];
        if !token.is_capitalized() || !self.given_names.contains(&self.norm(token.text)) {
            return None;
        }

        let mut end = i;
        while end + 1 < tokens.len() && end - i < MAX_SURNAME_TOKENS && !tokens[end].closed {
            let next = &tokens[end + 1];
            let alphabetic = next.text.chars().next().is_some_and(char::is_alphabetic);
            if !(next.is_capitalized() && alphabetic) || self.is_org_suffix(next) {
                break;
            }
            end += 1;
        }
        Some(end)
    }

    fn is_org_suffix(&self, token: &Token<'_>) -> bool {
        self.org_suffixes.contains(&suffix_key(token.text))
    }

    fn norm(&self, s: &str) -> String {
        normalize(s, self.case_sensitive)
    }
}

#[async_trait]
impl Annotator for GazetteerAnnotator {
    async fn annotate(&self, text: &str) -> AddrexResult<Vec<AnnotatedEntity>> {
        let entities = self.annotate_sync(text);
        debug!(model = %self.name, entities = entities.len(), "Gazetteer annotation");
        Ok(entities)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

fn span(
    text: &str,
    tokens: &[Token<'_>],
    first: usize,
    last: usize,
    category: EntityCategory,
) -> AnnotatedEntity {
    let start = tokens[first].start;
    let end = tokens[last].end;
    AnnotatedEntity::new(&text[start..end], category).at(start)
}

fn normalize(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}

fn suffix_key(s: &str) -> String {
    s.trim_end_matches('.').to_lowercase()
}

const LEADING_PUNCT: &[char] = &['"', '\'', '(', '[', '{', '<'];
const TRAILING_PUNCT: &[char] = &[',', ';', ':', '!', '?', '"', '\'', ')', ']', '}', '>'];

/// Split on whitespace and strip surrounding punctuation, keeping byte
/// offsets relative to the full text (`base` is the line's offset).
fn tokenize(line: &str, base: usize) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = word_start.take() {
                push_token(line, base, s, idx, &mut tokens);
            }
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }
    if let Some(s) = word_start {
        push_token(line, base, s, line.len(), &mut tokens);
    }

    tokens
}

fn push_token<'a>(line: &'a str, base: usize, from: usize, to: usize, tokens: &mut Vec<Token<'a>>) {
    let raw = &line[from..to];
    let without_lead = raw.trim_start_matches(LEADING_PUNCT);
    let trimmed = without_lead.trim_end_matches(TRAILING_PUNCT);
    if trimmed.is_empty() {
        return;
    }

    let start = from + (raw.len() - without_lead.len());
    tokens.push(Token {
        text: &line[start..start + trimmed.len()],
        start: base + start,
        end: base + start + trimmed.len(),
        closed: trimmed.len() < without_lead.len(),
    });
}
