use std::io::{self, Read};

use log::trace;

use crate::source::ByteSource;
use crate::view::BoundedView;

/// Reads its members back to back.
///
/// A member is only left once it returns `Ok(0)`. Errors from the active
/// member are returned unchanged and the member stays active.
#[derive(Debug)]
pub struct Concat<R> {
    members: Vec<R>,
    active: usize,
}

impl<R: Read> Concat<R> {
    pub fn new<I>(members: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        Self {
            members: members.into_iter().collect(),
            active: 0,
        }
    }

    /// Append a member after the current last one.
    pub fn push(&mut self, member: R) {
        self.members.push(member);
    }

    /// Index of the member the next read is served from.
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        self.active >= self.members.len()
    }

    pub fn members(&self) -> &[R] {
        &self.members
    }

    pub fn into_inner(self) -> Vec<R> {
        self.members
    }
}

impl<S: ByteSource> Concat<BoundedView<S>> {
    /// Concatenation of views; lengths are known up front.
    pub fn of_views<I>(views: I) -> Self
    where
        I: IntoIterator<Item = BoundedView<S>>,
    {
        Self::new(views)
    }

    /// Sum of member lengths.
    pub fn len(&self) -> u64 {
        self.members.iter().map(BoundedView::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes not yet read across all members.
    pub fn remaining(&self) -> u64 {
        self.members
            .iter()
            .skip(self.active)
            .map(BoundedView::remaining)
            .sum()
    }
}

impl<R: Read> Read for Concat<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while let Some(member) = self.members.get_mut(self.active) {
            let n = member.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            trace!("[CONCAT] member {} exhausted", self.active);
            self.active += 1;
        }

        Ok(0)
    }
}
