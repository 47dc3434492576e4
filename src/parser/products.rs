use tracing::debug;

use super::lines::{Candidate, Header, Line, Metadata};
use crate::model::ProductRecord;

/// Field value plus the rank of the pattern that set it.
#[derive(Debug, Default)]
struct Slot {
    value: Option<Candidate>,
}

impl Slot {
    /// First set wins; only a strictly higher-priority pattern may replace it.
    fn offer(&mut self, candidate: Option<Candidate>) {
        let Some(c) = candidate else { return };
        match &self.value {
            Some(current) if current.rank <= c.rank => {}
            _ => self.value = Some(c),
        }
    }

    fn into_url(self) -> Option<String> {
        self.value.map(|c| c.url)
    }
}

#[derive(Debug)]
struct OpenRecord {
    name: String,
    description: String,
    price: String,
    link: Slot,
    image: Slot,
}

impl OpenRecord {
    fn from_header(header: Header) -> Self {
        let mut rec = Self {
            name: header.name,
            description: header.description,
            price: header.price,
            link: Slot::default(),
            image: Slot::default(),
        };
        rec.apply(header.inline);
        rec
    }

    fn apply(&mut self, meta: Metadata) {
        self.link.offer(meta.link);
        self.image.offer(meta.image);
    }

    fn finish(self) -> Option<ProductRecord> {
        let record = ProductRecord {
            name: self.name,
            description: self.description,
            price: self.price,
            link: self.link.into_url(),
            image: self.image.into_url(),
        };
        if record.is_presentable() {
            Some(record)
        } else {
            debug!(name = %record.name, "dropping product without link or image");
            None
        }
    }
}

/// Folds classified lines into product records, one open record at a time.
#[derive(Debug, Default)]
pub struct Accumulator {
    current: Option<OpenRecord>,
    output: Vec<ProductRecord>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line) {
        match line {
            Line::Header(header) => {
                self.flush();
                debug!(name = %header.name, price = %header.price, "found product");
                self.current = Some(OpenRecord::from_header(header));
            }
            Line::Metadata(meta) => {
                if let Some(rec) = self.current.as_mut() {
                    rec.apply(meta);
                }
            }
            Line::Continuation | Line::Blank | Line::Prose => {}
        }
    }

    pub fn finish(mut self) -> Vec<ProductRecord> {
        self.flush();
        self.output
    }

    fn flush(&mut self) {
        if let Some(record) = self.current.take().and_then(OpenRecord::finish) {
            self.output.push(record);
        }
    }
}

/// Collect every presentable product record, in document order.
pub fn collect_products(lines: impl IntoIterator<Item = Line>) -> Vec<ProductRecord> {
    let mut acc = Accumulator::new();
    for line in lines {
        acc.push(line);
    }
    acc.finish()
}
