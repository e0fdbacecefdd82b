//! Lexical normalization and dictionary segmentation of raw requests.
//!
//! Input is NFKC-folded (full-width digits and punctuation become ASCII) and
//! stripped of control characters before any extractor sees it. Segmentation
//! splits on Unicode word boundaries, then greedily merges adjacent segments
//! into the longest registered vocabulary word (forward maximum matching).

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::lexicon::CategoryLexicon;

/// Time-of-day vocabulary registered with every segmenter.
const TIME_WORDS: &[&str] = &[
    "上午", "下午", "早上", "中午", "傍晚", "晚上", "凌晨", "点", "点钟", "小时", "分钟", "半", "整",
];

/// Relative-day and party vocabulary.
const REQUEST_WORDS: &[&str] = &[
    "今天", "明天", "后天", "大后天", "一个人", "我自己", "我和", "我们", "朋友", "周岁", "志愿活动",
];

/// Fold a raw request into the form every extractor expects.
pub fn normalize_text(raw: &str) -> String {
    raw.nfkc()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Dictionary segmenter with a registered domain vocabulary.
#[derive(Debug, Clone)]
pub struct Segmenter {
    vocabulary: HashSet<String>,
    /// Longest registered word, in characters.
    max_word_chars: usize,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            vocabulary: HashSet::new(),
            max_word_chars: 1,
        }
    }

    /// Segmenter preloaded with the time vocabulary and every lexicon keyword.
    pub fn with_lexicon(lexicon: &CategoryLexicon) -> Self {
        let mut segmenter = Self::new();
        for word in TIME_WORDS.iter().chain(REQUEST_WORDS) {
            segmenter.add_word(word);
        }
        for word in lexicon.keywords() {
            segmenter.add_word(word);
        }
        segmenter
    }

    pub fn add_word(&mut self, word: &str) {
        let word = normalize_text(word);
        if word.is_empty() {
            return;
        }
        self.max_word_chars = self.max_word_chars.max(word.chars().count());
        self.vocabulary.insert(word);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocabulary.contains(word)
    }

    /// Split `text` into tokens, dropping whitespace.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = text
            .split_word_bounds()
            .filter(|s| !s.trim().is_empty())
            .collect();

        let mut tokens = Vec::with_capacity(pieces.len());
        let mut i = 0;
        while i < pieces.len() {
            let mut taken = 1;
            let mut best = pieces[i].to_string();

            let mut candidate = pieces[i].to_string();
            for (offset, piece) in pieces[i + 1..].iter().enumerate() {
                candidate.push_str(piece);
                if candidate.chars().count() > self.max_word_chars {
                    break;
                }
                if self.vocabulary.contains(&candidate) {
                    taken = offset + 2;
                    best = candidate.clone();
                }
            }

            tokens.push(best);
            i += taken;
        }
        tokens
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}
