#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MxRecord {
    pub exchange: String,
    pub priority: u16,
}

impl MxRecord {
    pub fn new(priority: u16, exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            priority,
        }
    }
}

/// Lowest priority wins. Among equal priorities the first record in `records`
/// is kept.
pub fn preferred_exchange(records: &[MxRecord]) -> Option<&MxRecord> {
    records.iter().reduce(|best, candidate| {
        if candidate.priority < best.priority {
            candidate
        } else {
            best
        }
    })
}
