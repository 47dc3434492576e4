/// Horizontal distance a swipe must exceed to change slides.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Cyclic position over a fixed, non-empty list of records.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideIndex {
    current: usize,
    len: usize,
    threshold: f32,
}

impl SlideIndex {
    /// `None` for an empty list: nothing to show, no carousel.
    pub fn new(len: usize) -> Option<Self> {
        Self::with_threshold(len, DEFAULT_SWIPE_THRESHOLD)
    }

    pub fn with_threshold(len: usize, threshold: f32) -> Option<Self> {
        (len > 0).then_some(Self {
            current: 0,
            len,
            threshold,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.len;
    }

    pub fn previous(&mut self) {
        self.current = (self.current + self.len - 1) % self.len;
    }

    /// Out-of-range targets clamp to the last slide.
    pub fn go_to(&mut self, index: usize) {
        self.current = index.min(self.len - 1);
    }

    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Next => self.next(),
            Direction::Previous => self.previous(),
        }
    }

    /// Map a finished horizontal gesture to a direction, if it went far enough.
    pub fn swipe_direction(&self, start_x: f32, end_x: f32) -> Option<Direction> {
        let distance = start_x - end_x;
        if distance > self.threshold {
            Some(Direction::Next)
        } else if distance < -self.threshold {
            Some(Direction::Previous)
        } else {
            None
        }
    }

    pub fn swipe(&mut self, start_x: f32, end_x: f32) -> Option<Direction> {
        let dir = self.swipe_direction(start_x, end_x)?;
        self.step(dir);
        Some(dir)
    }

    // Display hints only; next/previous stay cyclic regardless.
    pub fn at_start(&self) -> bool {
        self.current == 0
    }

    pub fn at_end(&self) -> bool {
        self.current == self.len - 1
    }

    /// "2 of 3 products", or `None` when there is a single slide.
    pub fn counter(&self) -> Option<String> {
        (self.len > 1).then(|| format!("{} of {} products", self.current + 1, self.len))
    }
}

/// Tracks one touch gesture from start through moves to release.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwipeTracker {
    start: Option<f32>,
    end: Option<f32>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32) {
        self.start = Some(x);
        self.end = None;
    }

    pub fn moved(&mut self, x: f32) {
        self.end = Some(x);
    }

    /// Apply the gesture to `slides`. A touch that never moved is ignored.
    pub fn release(&mut self, slides: &mut SlideIndex) -> Option<Direction> {
        let (start, end) = (self.start.take()?, self.end.take()?);
        slides.swipe(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_carousel() {
        assert!(SlideIndex::new(0).is_none());
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut s = SlideIndex::new(3).unwrap();
        s.previous();
        assert_eq!(s.current(), 2);
    }

    #[test]
    fn next_wraps_to_first() {
        let mut s = SlideIndex::new(3).unwrap();
        s.go_to(2);
        s.next();
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn single_slide_stays_put() {
        let mut s = SlideIndex::new(1).unwrap();
        s.next();
        assert_eq!(s.current(), 0);
        s.previous();
        assert_eq!(s.current(), 0);
        assert!(s.at_start() && s.at_end());
        assert_eq!(s.counter(), None);
    }

    #[test]
    fn go_to_clamps() {
        let mut s = SlideIndex::new(4).unwrap();
        s.go_to(1);
        assert_eq!(s.current(), 1);
        s.go_to(99);
        assert_eq!(s.current(), 3);
    }

    #[test]
    fn hints_do_not_block_navigation() {
        let mut s = SlideIndex::new(2).unwrap();
        assert!(s.at_start());
        s.previous();
        assert!(s.at_end());
        assert_eq!(s.current(), 1);
        s.next();
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn counter_text() {
        let mut s = SlideIndex::new(3).unwrap();
        s.next();
        assert_eq!(s.counter().as_deref(), Some("2 of 3 products"));
    }

    #[test]
    fn swipe_threshold() {
        let mut s = SlideIndex::new(3).unwrap();
        assert_eq!(s.swipe(200.0, 150.0), None); // exactly 50 is not enough
        assert_eq!(s.current(), 0);
        assert_eq!(s.swipe(200.0, 149.0), Some(Direction::Next));
        assert_eq!(s.current(), 1);
        assert_eq!(s.swipe(100.0, 151.0), Some(Direction::Previous));
        assert_eq!(s.current(), 0);
        assert_eq!(s.swipe(100.0, 151.0), Some(Direction::Previous));
        assert_eq!(s.current(), 2);
    }

    #[test]
    fn custom_threshold() {
        let mut s = SlideIndex::with_threshold(3, 10.0).unwrap();
        assert_eq!(s.swipe(20.0, 5.0), Some(Direction::Next));
    }

    #[test]
    fn tracker_needs_start_and_move() {
        let mut s = SlideIndex::new(3).unwrap();
        let mut t = SwipeTracker::default();
        assert_eq!(t.release(&mut s), None);

        t.begin(300.0);
        assert_eq!(t.release(&mut s), None);

        t.begin(300.0);
        t.moved(280.0);
        t.moved(100.0);
        assert_eq!(t.release(&mut s), Some(Direction::Next));
        assert_eq!(s.current(), 1);
    }

    #[test]
    fn new_touch_clears_previous_end() {
        let mut s = SlideIndex::new(3).unwrap();
        let mut t = SwipeTracker::default();
        t.begin(300.0);
        t.moved(100.0);
        t.begin(300.0);
        assert_eq!(t.release(&mut s), None);
        assert_eq!(s.current(), 0);
    }
}
