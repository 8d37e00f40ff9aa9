use thiserror::Error;

/// A sentiment score string that does not have the
/// `{'neg': .., 'neu': .., 'pos': .., 'compound': ..}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sentiment score {input:?}: {reason}")]
pub struct SentimentParseError {
    pub input: String,
    pub reason: String,
}

impl SentimentParseError {
    pub(crate) fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }
}
