//! Text sentiment scoring for complaint intake.
//!
//! The default scorer is an AFINN-style word list: each known word carries
//! an integer valence in [-5, 5]; the score of a text is the sum over its
//! words. A negator immediately before a scored word flips that word's sign.
//!
//! The list is a reduced subset of AFINN-165, picked for the vocabulary of
//! civic complaints (infrastructure, sanitation, safety, service tone).
//! Words outside it score 0, so text the full list would mark mildly
//! negative can come out neutral. Plug a fuller `SentimentScorer` in
//! through `CivicEngine::build_with` when that matters.

/// Maps complaint text to a signed score. More negative = more distressed.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

const NEGATORS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "cant", "can't", "cannot", "isnt", "isn't",
    "wasnt", "wasn't", "wont", "won't", "without", "nobody", "nothing",
];

const LEXICON: &[(&str, i32)] = &[
    // strongly negative
    ("catastrophic", -4), ("deadly", -4), ("disgusting", -4), ("horrible", -3),
    ("horrific", -4), ("nightmare", -3), ("outrageous", -3), ("terrible", -3),
    ("awful", -3), ("worst", -3), ("hazardous", -3), ("dangerous", -2),
    ("disaster", -2), ("unbearable", -3), ("unacceptable", -3), ("furious", -3),
    ("filthy", -3), ("toxic", -3), ("sick", -2), ("injured", -2), ("injury", -2),
    ("accident", -2), ("fire", -2), ("flood", -2), ("flooded", -2), ("flooding", -2),
    ("hate", -3), ("angry", -3), ("stinks", -2), ("stink", -2), ("smelly", -2),
    // mildly negative
    ("bad", -3), ("poor", -2), ("broken", -1), ("damaged", -2), ("damage", -3),
    ("leak", -1), ("leaking", -1), ("leaks", -1), ("dirty", -2), ("overflowing", -1),
    ("blocked", -1), ("problem", -2), ("problems", -2), ("issue", -1), ("issues", -1),
    ("delay", -1), ("delayed", -1), ("ignored", -2), ("neglected", -2), ("waste", -1),
    ("unsafe", -2), ("risk", -2), ("crack", -1), ("cracked", -1), ("outage", -2),
    ("dark", -1), ("noisy", -1), ("annoying", -2), ("frustrated", -2), ("frustrating", -2),
    ("worried", -3), ("concerned", -2), ("stuck", -2), ("fail", -2), ("failed", -2),
    ("failure", -2), ("shortage", -2), ("pain", -2), ("mess", -2), ("trash", -1),
    ("abandoned", -2), ("abuse", -3), ("annoyed", -2), ("careless", -2), ("chaos", -2),
    ("collapse", -2), ("collapsed", -2), ("contaminated", -2), ("crash", -2),
    ("danger", -2), ("dead", -3), ("died", -3), ("disappointed", -2),
    ("disappointing", -2), ("disgusted", -3), ("emergency", -2), ("fear", -2),
    ("filth", -2), ("frightened", -2), ("harm", -2), ("helpless", -2), ("hurt", -2),
    ("ignore", -1), ("ill", -2), ("irritated", -3), ("miserable", -3),
    ("negligence", -2), ("pathetic", -2), ("polluted", -2), ("pollution", -2),
    ("rotten", -3), ("rubbish", -2), ("scared", -2), ("shame", -2), ("shocked", -2),
    ("stolen", -2), ("suffer", -2), ("suffering", -2), ("threat", -2), ("ugly", -3),
    ("unhappy", -2), ("upset", -2), ("useless", -2), ("violence", -3), ("worse", -3),
    ("wrong", -2),
    // positive
    ("good", 3), ("great", 3), ("excellent", 3), ("amazing", 4), ("awesome", 4),
    ("thanks", 2), ("thank", 2), ("appreciate", 2), ("appreciated", 2), ("helpful", 2),
    ("clean", 2), ("safe", 1), ("fixed", 2), ("resolved", 2), ("happy", 3),
    ("glad", 3), ("nice", 3), ("please", 1), ("kindly", 2), ("quick", 2),
    ("fine", 2), ("better", 2), ("improve", 2), ("improved", 2), ("working", 1),
    ("best", 3), ("love", 3), ("perfect", 3), ("satisfied", 2), ("pleased", 3),
    ("grateful", 3), ("wonderful", 4), ("success", 2), ("support", 2), ("hope", 2),
];

/// Default word-list scorer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl LexiconScorer {
    fn valence(word: &str) -> Option<i32> {
        LEXICON
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, v)| *v)
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphabetic() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut total = 0i32;
        for (i, token) in tokens.iter().enumerate() {
            let Some(v) = Self::valence(token) else {
                continue;
            };
            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1]);
            total += if negated { -v } else { v };
        }
        f64::from(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_word_valences() {
        let s = LexiconScorer;
        assert_eq!(s.score("Terrible smell, bins broken"), -4.0);
        assert_eq!(s.score("Streetlight on Elm Street"), 0.0);
        assert_eq!(s.score("Thanks, great work"), 5.0);
    }

    #[test]
    fn negator_flips_next_word() {
        let s = LexiconScorer;
        assert_eq!(s.score("not good"), -3.0);
        assert_eq!(s.score("it isn't safe"), -1.0);
    }

    #[test]
    fn case_and_punctuation_insensitive() {
        let s = LexiconScorer;
        assert_eq!(s.score("AWFUL!!!"), -3.0);
        assert_eq!(s.score("...leaking..."), -1.0);
    }

    #[test]
    fn sanitation_vocabulary_is_scored() {
        let s = LexiconScorer;
        assert_eq!(s.score("Rotten rubbish everywhere"), -5.0);
        assert_eq!(s.score("Residents upset, road is useless"), -4.0);
    }

    #[test]
    fn no_word_listed_twice() {
        let mut words: Vec<&str> = LEXICON.iter().map(|(w, _)| *w).collect();
        words.sort_unstable();
        let before = words.len();
        words.dedup();
        assert_eq!(words.len(), before);
    }
}
