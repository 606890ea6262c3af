use std::collections::VecDeque;

pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 50;
pub const DEFAULT_TRANSCRIPT_RETAIN: usize = 30;

/// Rolling conversation log. Overflowing `capacity` drops all but the newest `retain` lines.
#[derive(Debug, Clone)]
pub struct Transcript {
    lines: VecDeque<String>,
    capacity: usize,
    retain: usize,
}

impl Transcript {
    pub fn new(capacity: usize, retain: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity + 1),
            capacity,
            retain: retain.clamp(1, capacity),
        }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
        if self.lines.len() > self.capacity {
            let excess = self.lines.len() - self.retain;
            self.lines.drain(..excess);
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.lines.iter()
    }

    /// The newest `count` lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_CAPACITY, DEFAULT_TRANSCRIPT_RETAIN)
    }
}
