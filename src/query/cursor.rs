use crate::document::Document;

/// Materialized result window of a `find_docs` call.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub docs: Vec<Document>,
    pub pos: usize,
}

impl Cursor {
    pub fn advance(&mut self) -> Option<Document> {
        let d = self.docs.get(self.pos)?.clone();
        self.pos += 1;
        Some(d)
    }

    #[must_use]
    pub fn to_vec(mut self) -> Vec<Document> {
        if self.pos == 0 {
            return self.docs;
        }
        self.docs.split_off(self.pos.min(self.docs.len()))
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.docs.len().saturating_sub(self.pos)
    }
}

impl Iterator for Cursor {
    type Item = Document;
    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}
