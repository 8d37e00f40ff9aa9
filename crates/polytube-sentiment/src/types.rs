use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SentimentParseError;

/// Compound score at or above which a comment is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Upper bound (exclusive) of the negative side of the neutral band.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Four-component polarity score of one text.
///
/// `neg`, `neu` and `pos` are proportions in `[0, 1]` rounded to three
/// decimals; `compound` is the normalized overall polarity in `[-1, 1]`
/// rounded to four decimals.
///
/// In tables the score is stored in its dict-string form:
/// `{'neg': 0.0, 'neu': 0.328, 'pos': 0.672, 'compound': 0.6166}`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SentimentScore {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl SentimentScore {
    #[must_use]
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_compound(self.compound)
    }
}

impl fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'neg': {}, 'neu': {}, 'pos': {}, 'compound': {}}}",
            dict_float(self.neg),
            dict_float(self.neu),
            dict_float(self.pos),
            dict_float(self.compound)
        )
    }
}

/// Render a float the way the dict-string form expects: integral values
/// keep a trailing `.0`.
fn dict_float(value: f64) -> String {
    // Adding +0.0 folds -0.0 into 0.0.
    let mut rendered = (value + 0.0).to_string();
    if rendered.chars().all(|c| c.is_ascii_digit() || c == '-') {
        rendered.push_str(".0");
    }
    rendered
}

impl FromStr for SentimentScore {
    type Err = SentimentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .trim()
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| SentimentParseError::new(s, "expected a {...} mapping"))?;

        let mut neg = None;
        let mut neu = None;
        let mut pos = None;
        let mut compound = None;

        for entry in body.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry
                .split_once(':')
                .ok_or_else(|| SentimentParseError::new(s, format!("entry {entry:?} has no ':'")))?;
            let key = key.trim().trim_matches(|c| c == '\'' || c == '"');
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| SentimentParseError::new(s, format!("{key} is not a number")))?;

            let slot = match key {
                "neg" => &mut neg,
                "neu" => &mut neu,
                "pos" => &mut pos,
                "compound" => &mut compound,
                other => {
                    return Err(SentimentParseError::new(s, format!("unknown key {other:?}")));
                }
            };
            *slot = Some(value);
        }

        let require = |value: Option<f64>, key: &str| {
            value.ok_or_else(|| SentimentParseError::new(s, format!("missing {key}")))
        };

        Ok(Self {
            neg: require(neg, "neg")?,
            neu: require(neu, "neu")?,
            pos: require(pos, "pos")?,
            compound: require(compound, "compound")?,
        })
    }
}

impl Serialize for SentimentScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SentimentScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Three-way classification of a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Classify a compound score.
    ///
    /// `>= 0.05` is positive and only the open interval `(-0.05, 0.05)` is
    /// neutral, so a compound of exactly `-0.05` is negative.
    #[must_use]
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound > NEGATIVE_THRESHOLD && compound < POSITIVE_THRESHOLD {
            SentimentLabel::Neutral
        } else {
            SentimentLabel::Negative
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Positive => "Positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_boundary_is_inclusive() {
        assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(0.9), SentimentLabel::Positive);
    }

    #[test]
    fn negative_boundary_is_not_neutral() {
        assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_compound(-0.7), SentimentLabel::Negative);
    }

    #[test]
    fn open_band_is_neutral() {
        assert_eq!(SentimentLabel::from_compound(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(0.0499), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.0499), SentimentLabel::Neutral);
    }

    #[test]
    fn nan_compound_falls_through_to_negative() {
        assert_eq!(SentimentLabel::from_compound(f64::NAN), SentimentLabel::Negative);
    }

    #[test]
    fn renders_dict_string() {
        let score = SentimentScore {
            neg: 0.0,
            neu: 0.328,
            pos: 0.672,
            compound: 0.6166,
        };
        assert_eq!(
            score.to_string(),
            "{'neg': 0.0, 'neu': 0.328, 'pos': 0.672, 'compound': 0.6166}"
        );
    }

    #[test]
    fn renders_integral_and_negative_values() {
        let score = SentimentScore {
            neg: 1.0,
            neu: 0.0,
            pos: 0.0,
            compound: -0.5423,
        };
        assert_eq!(
            score.to_string(),
            "{'neg': 1.0, 'neu': 0.0, 'pos': 0.0, 'compound': -0.5423}"
        );
    }

    #[test]
    fn negative_zero_renders_as_zero() {
        let score = SentimentScore {
            compound: -0.0,
            ..SentimentScore::default()
        };
        assert!(score.to_string().ends_with("'compound': 0.0}"));
    }

    #[test]
    fn dict_string_parses_back() {
        let score = SentimentScore {
            neg: 0.123,
            neu: 0.5,
            pos: 0.377,
            compound: -0.1027,
        };
        let parsed: SentimentScore = score.to_string().parse().unwrap();
        assert_eq!(parsed, score);
    }

    #[test]
    fn parses_double_quoted_keys_in_any_order() {
        let parsed: SentimentScore =
            r#"{"compound": 0.25, "pos": 0.4, "neu": 0.6, "neg": 0.0}"#.parse().unwrap();
        assert!((parsed.compound - 0.25).abs() < f64::EPSILON);
        assert!((parsed.neu - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_component_is_rejected() {
        let err = "{'neg': 0.0, 'neu': 1.0, 'pos': 0.0}"
            .parse::<SentimentScore>()
            .unwrap_err();
        assert!(err.reason.contains("compound"));
    }

    #[test]
    fn non_numeric_component_is_rejected() {
        let err = "{'neg': x, 'neu': 1.0, 'pos': 0.0, 'compound': 0.0}"
            .parse::<SentimentScore>()
            .unwrap_err();
        assert!(err.reason.contains("neg"));
    }

    #[test]
    fn bare_text_is_rejected() {
        assert!("0.5".parse::<SentimentScore>().is_err());
    }

    #[test]
    fn label_uses_compound() {
        let score = SentimentScore {
            compound: 0.05,
            ..SentimentScore::default()
        };
        assert_eq!(score.label(), SentimentLabel::Positive);
        assert_eq!(score.label().to_string(), "Positive");
    }
}
