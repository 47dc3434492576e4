use regex::{Captures, Regex};

use super::grammar::Grammar;

/// A URL offered for a record field, with the priority of the pattern
/// that found it (0 is highest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub rank: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub link: Option<Candidate>,
    pub image: Option<Candidate>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.link.is_none() && self.image.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub description: String,
    pub price: String,
    /// Link or image carried on the header line itself.
    pub inline: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Header(Header),
    Metadata(Metadata),
    /// "Available ..." notes that sit inside a listing block.
    Continuation,
    Blank,
    Prose,
}

/// Classify one line. The line is trimmed first.
pub fn classify(line: &str, grammar: &Grammar) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Blank;
    }

    if let Some(header) = match_header(line, grammar) {
        return Line::Header(header);
    }

    let meta = match_metadata(line, grammar);
    if !meta.is_empty() {
        return Line::Metadata(meta);
    }

    if grammar.is_continuation(line) {
        return Line::Continuation;
    }

    Line::Prose
}

/// Classify every line of a message, in order.
pub fn classify_lines(message: &str, grammar: &Grammar) -> Vec<Line> {
    message.split('\n').map(|l| classify(l, grammar)).collect()
}

fn match_header(line: &str, grammar: &Grammar) -> Option<Header> {
    let caps = grammar.headers().iter().find_map(|re| re.captures(line))?;
    Some(Header {
        name: group(&caps, "name").to_string(),
        description: group(&caps, "description").to_string(),
        price: grammar.first_price(group(&caps, "price")),
        inline: match_metadata(line, grammar),
    })
}

fn match_metadata(line: &str, grammar: &Grammar) -> Metadata {
    Metadata {
        link: first_candidate(line, grammar.links()),
        image: first_candidate(line, grammar.images()),
    }
}

// Groups are verified when the grammar compiles but may sit in an optional branch.
fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str().trim())
}

fn first_candidate(line: &str, patterns: &[Regex]) -> Option<Candidate> {
    patterns.iter().enumerate().find_map(|(rank, re)| {
        re.captures(line).map(|caps| Candidate {
            url: group(&caps, "url").to_string(),
            rank,
        })
    })
}
