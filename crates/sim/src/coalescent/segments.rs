//! Half-open site intervals and sets of them.

use crate::base::circular_ranges;

/// Half-open interval of sites `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Sorted set of disjoint, non-adjacent, non-empty segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The whole genome `[0, length)`.
    pub fn full(length: usize) -> Self {
        Self::from_unsorted([Segment::new(0, length)])
    }

    /// The circular window of `len` sites starting at `start` on a genome of
    /// `length` sites.
    pub fn window(start: usize, len: usize, length: usize) -> Self {
        Self::from_unsorted(
            circular_ranges(start, len, length)
                .into_iter()
                .map(|r| Segment::new(r.start, r.end)),
        )
    }

    /// Normalise arbitrary segments: sort, drop empties, merge overlaps and
    /// touching neighbours.
    pub fn from_unsorted(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut raw: Vec<Segment> = segments.into_iter().filter(|s| !s.is_empty()).collect();
        raw.sort_unstable_by_key(|s| s.start);
        let mut merged: Vec<Segment> = Vec::with_capacity(raw.len());
        for seg in raw {
            match merged.last_mut() {
                Some(last) if seg.start <= last.end => last.end = last.end.max(seg.end),
                _ => merged.push(seg),
            }
        }
        Self { segments: merged }
    }

    /// Build the set covering exactly the given ascending sites.
    pub fn from_sorted_sites(sites: impl IntoIterator<Item = usize>) -> Self {
        let mut segments: Vec<Segment> = Vec::new();
        for site in sites {
            match segments.last_mut() {
                Some(last) if last.end == site => last.end += 1,
                _ => segments.push(Segment::new(site, site + 1)),
            }
        }
        Self::from_unsorted(segments)
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = Segment> + '_ {
        self.segments.iter().copied()
    }

    /// Every site covered by the set, ascending.
    pub fn sites(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().flat_map(|s| s.start..s.end)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of sites covered.
    pub fn total_len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    pub fn contains(&self, site: usize) -> bool {
        let idx = self.segments.partition_point(|s| s.end <= site);
        self.segments.get(idx).is_some_and(|s| s.start <= site)
    }

    pub fn union(&self, other: &SegmentSet) -> SegmentSet {
        Self::from_unsorted(self.iter().chain(other.iter()))
    }

    pub fn intersect(&self, other: &SegmentSet) -> SegmentSet {
        let (a, b) = (&self.segments, &other.segments);
        let (mut i, mut j) = (0, 0);
        let mut out = Vec::new();
        while i < a.len() && j < b.len() {
            let start = a[i].start.max(b[j].start);
            let end = a[i].end.min(b[j].end);
            if start < end {
                out.push(Segment::new(start, end));
            }
            if a[i].end < b[j].end {
                i += 1;
            } else {
                j += 1;
            }
        }
        SegmentSet { segments: out }
    }

    /// Sites in `self` that are not in `other`.
    pub fn subtract(&self, other: &SegmentSet) -> SegmentSet {
        let b = &other.segments;
        let mut out = Vec::new();
        let mut j = 0;
        for seg in &self.segments {
            let mut cursor = seg.start;
            while j < b.len() && b[j].end <= cursor {
                j += 1;
            }
            let mut k = j;
            while k < b.len() && b[k].start < seg.end {
                if b[k].start > cursor {
                    out.push(Segment::new(cursor, b[k].start));
                }
                cursor = cursor.max(b[k].end);
                k += 1;
            }
            if cursor < seg.end {
                out.push(Segment::new(cursor, seg.end));
            }
        }
        SegmentSet { segments: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(usize, usize)]) -> SegmentSet {
        SegmentSet::from_unsorted(pairs.iter().map(|&(s, e)| Segment::new(s, e)))
    }

    #[test]
    fn test_from_unsorted_merges() {
        let s = set(&[(5, 8), (0, 2), (2, 3), (7, 10), (12, 12)]);
        assert_eq!(s, set(&[(0, 3), (5, 10)]));
        assert_eq!(s.segments().len(), 2);
        assert_eq!(s.total_len(), 8);
    }

    #[test]
    fn test_full_and_empty() {
        assert_eq!(SegmentSet::full(10).total_len(), 10);
        assert!(SegmentSet::full(0).is_empty());
        assert!(SegmentSet::new().is_empty());
    }

    #[test]
    fn test_window_wraps() {
        assert_eq!(SegmentSet::window(8, 4, 10), set(&[(0, 2), (8, 10)]));
        assert_eq!(SegmentSet::window(3, 4, 10), set(&[(3, 7)]));
        assert_eq!(SegmentSet::window(3, 40, 10), SegmentSet::full(10));
    }

    #[test]
    fn test_intersect() {
        let a = set(&[(0, 10), (20, 30)]);
        let b = set(&[(5, 25)]);
        assert_eq!(a.intersect(&b), set(&[(5, 10), (20, 25)]));
        assert!(a.intersect(&set(&[(10, 20)])).is_empty());
        assert_eq!(a.intersect(&a), a);
    }

    #[test]
    fn test_subtract() {
        let a = set(&[(0, 10), (20, 30)]);
        assert_eq!(a.subtract(&set(&[(5, 25)])), set(&[(0, 5), (25, 30)]));
        assert_eq!(a.subtract(&set(&[(2, 3), (4, 6)])), set(&[(0, 2), (3, 4), (6, 10), (20, 30)]));
        assert!(a.subtract(&set(&[(0, 30)])).is_empty());
        assert_eq!(a.subtract(&SegmentSet::new()), a);
    }

    #[test]
    fn test_union() {
        let a = set(&[(0, 5)]);
        let b = set(&[(5, 8), (10, 12)]);
        assert_eq!(a.union(&b), set(&[(0, 8), (10, 12)]));
    }

    #[test]
    fn test_partition_identity() {
        let a = set(&[(0, 40), (60, 100)]);
        let w = SegmentSet::window(90, 30, 100);
        let inside = a.intersect(&w);
        let outside = a.subtract(&w);
        assert!(inside.intersect(&outside).is_empty());
        assert_eq!(inside.union(&outside), a);
        assert_eq!(inside, set(&[(0, 20), (90, 100)]));
    }

    #[test]
    fn test_from_sorted_sites_and_contains() {
        let s = SegmentSet::from_sorted_sites([1, 2, 3, 7, 9, 10]);
        assert_eq!(s, set(&[(1, 4), (7, 8), (9, 11)]));
        assert!(s.contains(1));
        assert!(s.contains(10));
        assert!(!s.contains(4));
        assert!(!s.contains(11));
        assert_eq!(s.sites().collect::<Vec<_>>(), vec![1, 2, 3, 7, 9, 10]);
    }
}
