/*!
This modules contains the result types shared by every engine of the crate.
*/

use std::ops::Range;

/// A span in a &str. Similar to [`std::ops::Range`], but implements Copy.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub fn empty(&self) -> bool {
        self.from == self.to
    }
}

impl From<Range<usize>> for Span {
    fn from(value: Range<usize>) -> Self {
        Self {
            from: value.start,
            to: value.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(val: Span) -> Self {
        val.from..val.to
    }
}

impl From<regex_syntax::ast::Span> for Span {
    fn from(value: regex_syntax::ast::Span) -> Self {
        Self {
            from: value.start.offset,
            to: value.end.offset,
        }
    }
}

/// The bounds of the overall match, or of a single capture group.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub struct Match<'s> {
    pub subject: &'s str,
    pub span: Span,
}

impl<'s> Match<'s> {
    pub fn new(subject: &'s str, span: impl Into<Span>) -> Self {
        let span = span.into();
        Self { subject, span }
    }

    pub fn as_str(&self) -> &'s str {
        &self.subject[self.span.from..self.span.to]
    }

    pub fn range(&self) -> Range<usize> {
        self.span.into()
    }
}

/// Successful match, with the capture slots written by the winning thread.
///
/// Slot `2k` holds the start and slot `2k + 1` the end of group `k`, group 0
/// being the overall match. Slots whose `Save` never ran stay `None`. Every
/// offset is a byte offset into the subject, so `(é+)ß` against `"ééßx"`
/// records `[0, 6, 0, 4]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'s> {
    subject: &'s str,
    slots: Box<[Option<usize>]>,
}

impl<'s> Captures<'s> {
    pub fn new(subject: &'s str, slots: Box<[Option<usize>]>) -> Self {
        Self { subject, slots }
    }

    pub fn get(&self, group_index: usize) -> Option<Match<'s>> {
        let from = self.slots.get(2 * group_index)?;
        let to = self.slots.get(2 * group_index + 1)?;
        match (from, to) {
            (Some(from), Some(to)) => Some(Match::new(self.subject, *from..*to)),
            _ => None,
        }
    }

    pub fn group0(&self) -> Match<'s> {
        // Save(0) is the first instruction and Match writes slot 1, so both
        // are set on every successful match.
        self.get(0).unwrap()
    }

    pub fn group_len(&self) -> usize {
        self.slots.len() / 2
    }

    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// The recorded byte offsets in slot order, skipping the unset ones.
    pub fn offsets(&self) -> Vec<usize> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Match<'s>>> + '_ {
        (0..self.group_len()).map(|i| self.get(i))
    }
}
