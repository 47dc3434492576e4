use super::grammar::Grammar;
use super::lines::{classify, Line};
use crate::model::ParsedMessage;

/// Where the scan is relative to the listing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No header seen yet.
    Before,
    /// Inside the block of header and metadata lines.
    Block,
    /// The block has ended; everything else is trailing prose.
    After,
}

/// Destination of one raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Before,
    Consumed,
    After,
}

/// Transition function of the segmenter.
pub fn step(phase: Phase, line: &Line) -> (Phase, Route) {
    match (phase, line) {
        (Phase::Before, Line::Header(_)) => (Phase::Block, Route::Consumed),
        (Phase::Before, _) => (Phase::Before, Route::Before),
        (Phase::Block, Line::Prose) => (Phase::After, Route::After),
        (Phase::Block, _) => (Phase::Block, Route::Consumed),
        (Phase::After, _) => (Phase::After, Route::After),
    }
}

/// Split a message into the prose before and after its listing block.
pub fn segment(message: &str, grammar: &Grammar) -> ParsedMessage {
    let mut phase = Phase::Before;
    let mut before: Vec<&str> = Vec::new();
    let mut after: Vec<&str> = Vec::new();

    for raw in message.split('\n') {
        let (next, route) = step(phase, &classify(raw, grammar));
        match route {
            Route::Before => before.push(raw),
            Route::After => after.push(raw),
            Route::Consumed => {}
        }
        phase = next;
    }

    if phase == Phase::Before {
        return ParsedMessage::unsegmented(message);
    }

    ParsedMessage {
        before: before.join("\n").trim().to_string(),
        has_products: true,
        after: after.join("\n").trim().to_string(),
    }
}
