#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Completed,
    Current,
    Empty,
}

impl Slot {
    pub fn class(self) -> &'static str {
        match self {
            Slot::Completed => "progress-dot completed",
            Slot::Current => "progress-dot current",
            Slot::Empty => "progress-dot",
        }
    }
}

/// Bounded progress approximation. The real number of questions is decided
/// by the server, so past the last slot the final dot just stays current.
pub fn slots(cap: usize, question_count: usize) -> Vec<Slot> {
    if cap == 0 {
        return Vec::new();
    }
    let current = question_count.saturating_sub(1).min(cap - 1);
    (0..cap)
        .map(|i| match i.cmp(&current) {
            std::cmp::Ordering::Less => Slot::Completed,
            std::cmp::Ordering::Equal => Slot::Current,
            std::cmp::Ordering::Greater => Slot::Empty,
        })
        .collect()
}

pub fn all_completed(cap: usize) -> Vec<Slot> {
    vec![Slot::Completed; cap]
}

#[cfg(test)]
mod tests {
    use super::*;
    use Slot::*;

    #[test]
    fn third_question_of_seven() {
        assert_eq!(slots(7, 3), vec![Completed, Completed, Current, Empty, Empty, Empty, Empty]);
    }

    #[test]
    fn overflow_pins_the_last_slot() {
        let dots = slots(7, 12);
        assert_eq!(dots.len(), 7);
        assert_eq!(dots[6], Current);
        assert!(dots[..6].iter().all(|s| *s == Completed));
    }

    #[test]
    fn zero_questions_marks_first_slot_current() {
        assert_eq!(slots(3, 0), vec![Current, Empty, Empty]);
        assert!(slots(0, 4).is_empty());
    }
}
