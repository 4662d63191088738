use crate::models::Sentiment;

const POSITIVE_WORDS: &[&str] = &["amazing", "great", "excellent", "masterpiece", "good", "love"];
const NEGATIVE_WORDS: &[&str] = &["bad", "boring", "waste", "poor", "predictable"];

/// Keyword classifier. Each keyword counts once if it appears anywhere in the
/// lower-cased comment, positive words add one and negative words subtract one.
pub fn classify(comment: &str) -> Sentiment {
    let text = comment.to_lowercase();

    let hits = |words: &[&str]| words.iter().filter(|w| text.contains(*w)).count() as i32;
    let score = hits(POSITIVE_WORDS) - hits(NEGATIVE_WORDS);

    match score {
        s if s > 0 => Sentiment::Positive,
        s if s < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sample_comments() {
        assert_eq!(classify("Amazing visuals and soundtrack!"), Sentiment::Positive);
        assert_eq!(classify("Story was predictable but fun."), Sentiment::Negative);
        assert_eq!(classify("It was okay I guess"), Sentiment::Neutral);
        assert_eq!(classify("Masterpiece storytelling."), Sentiment::Positive);
    }

    #[test]
    fn empty_comment_is_neutral() {
        assert_eq!(classify(""), Sentiment::Neutral);
    }

    #[test]
    fn positive_and_negative_hits_cancel() {
        assert_eq!(classify("Great cast, boring plot"), Sentiment::Neutral);
    }

    #[test]
    fn keyword_counts_once_however_often_it_appears() {
        // one "bad" against "good" and "great"
        assert_eq!(classify("bad bad bad bad, but good and great"), Sentiment::Positive);
    }

    #[test]
    fn matches_substrings() {
        // "goodness" contains "good", "badly" contains "bad"
        assert_eq!(classify("Goodness me"), Sentiment::Positive);
        assert_eq!(classify("badly paced"), Sentiment::Negative);
    }
}
