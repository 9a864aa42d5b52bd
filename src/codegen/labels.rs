/// Program-wide label counters.
///
/// One allocator is created per linked program and shared by every unit,
/// so generated labels never repeat across files. Counters only grow.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    compare: u64,
    call: u64,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next comparison id.
    pub fn next_compare(&mut self) -> u64 {
        let id = self.compare;
        self.compare += 1;
        id
    }

    /// Take the next call-site id.
    pub fn next_call(&mut self) -> u64 {
        let id = self.call;
        self.call += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent_and_monotonic() {
        let mut labels = LabelAllocator::new();
        assert_eq!(labels.next_compare(), 0);
        assert_eq!(labels.next_compare(), 1);
        assert_eq!(labels.next_call(), 0);
        assert_eq!(labels.next_compare(), 2);
        assert_eq!(labels.next_call(), 1);
    }

    #[test]
    fn test_separate_allocators_do_not_interfere() {
        let mut a = LabelAllocator::new();
        let mut b = LabelAllocator::new();
        a.next_compare();
        a.next_compare();
        assert_eq!(b.next_compare(), 0);
    }
}
