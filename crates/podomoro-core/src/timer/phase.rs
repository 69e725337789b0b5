use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// Focus and break alternate; there are no other transitions.
    pub fn next(self) -> Phase {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::Focus => "Focus time",
            Phase::Break => "Break time",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Phase::Focus => "Stay with the task in front of you",
            Phase::Break => "Step away for a moment and recharge",
        }
    }

    /// Lowercase name, as used in serialized output.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_toggles() {
        assert_eq!(Phase::Focus.next(), Phase::Break);
        assert_eq!(Phase::Break.next(), Phase::Focus);
        assert_eq!(Phase::Focus.next().next(), Phase::Focus);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Break).unwrap(), "\"break\"");
    }
}
