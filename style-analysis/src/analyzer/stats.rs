//! Document statistics and the four readability formulas pinned exactly as
//! spec'd (§4.4 step 5, §11 supplement).

use style_core::model::analysis::DocumentStats;
use style_core::model::block::StructuralBlock;

/// Computes every field of `DocumentStats` over the prose blocks of a
/// document. `sentences_per_block[i]` are the sentence strings the toolkit
/// produced for `prose_blocks[i]`; code spans are excluded by the caller
/// before this is invoked (§4.4 step 4).
pub fn compute(prose_sentences: &[Vec<String>], paragraph_count: usize) -> DocumentStats {
    let mut word_count = 0usize;
    let mut sentence_count = 0usize;
    let mut complex_words = 0usize;
    let mut syllable_sum = 0usize;
    let mut passive_sentences = 0usize;
    let mut vocabulary = style_core::FxHashSet::default();

    for sentences in prose_sentences {
        for sentence in sentences {
            sentence_count += 1;
            if looks_passive(sentence) {
                passive_sentences += 1;
            }
            for word in words(sentence) {
                word_count += 1;
                let syllables = count_syllables(&word);
                syllable_sum += syllables;
                if syllables >= 3 {
                    complex_words += 1;
                }
                vocabulary.insert(word.to_lowercase());
            }
        }
    }

    let average_sentence_length = ratio(word_count, sentence_count);
    let syllables_per_word = ratio(syllable_sum, word_count);
    let complex_word_ratio = ratio(complex_words, word_count);
    let passive_voice_ratio = ratio(passive_sentences, sentence_count);
    let vocabulary_diversity = ratio(vocabulary.len(), word_count);

    DocumentStats {
        word_count,
        sentence_count,
        paragraph_count,
        average_sentence_length,
        passive_voice_ratio,
        complex_word_ratio,
        vocabulary_diversity,
        flesch_reading_ease: flesch_reading_ease(average_sentence_length, syllables_per_word),
        flesch_kincaid_grade: flesch_kincaid_grade(average_sentence_length, syllables_per_word),
        gunning_fog: gunning_fog(average_sentence_length, complex_word_ratio),
        smog: smog(complex_words, sentence_count),
    }
}

pub fn count_prose_paragraphs(blocks: &[StructuralBlock]) -> usize {
    blocks
        .iter()
        .filter(|b| b.block_type.is_prose() && b.block_type == style_core::model::BlockType::Paragraph)
        .count()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn words(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
}

/// Vowel-group transition heuristic (§11): count vowel-group runs, subtract
/// one for a trailing silent `e`, floor at 1 per word.
fn count_syllables(word: &str) -> usize {
    let lower = word.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups = 0usize;
    let mut in_group = false;
    for &c in &chars {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
                in_group = true;
            }
        } else {
            in_group = false;
        }
    }

    if chars.len() > 2 && chars[chars.len() - 1] == 'e' && !is_vowel(chars[chars.len() - 2]) {
        groups = groups.saturating_sub(1);
    }

    groups.max(1)
}

/// A coarse passive-voice heuristic (be-verb immediately followed by a past
/// participle) used when the toolkit is degraded and no dependency parse is
/// available; the real toolkit's `morph`/`dep` fields supersede this once
/// populated.
fn looks_passive(sentence: &str) -> bool {
    const BE_VERBS: &[&str] = &["is", "was", "were", "are", "been", "being", "be"];
    let words: Vec<&str> = sentence.split_whitespace().collect();
    for window in words.windows(2) {
        let be = window[0].trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
        let participle = window[1].trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
        if BE_VERBS.contains(&be.as_str()) && participle.ends_with("ed") {
            return true;
        }
    }
    false
}

fn flesch_reading_ease(words_per_sentence: f64, syllables_per_word: f64) -> f64 {
    206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word
}

fn flesch_kincaid_grade(words_per_sentence: f64, syllables_per_word: f64) -> f64 {
    0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59
}

fn gunning_fog(words_per_sentence: f64, complex_word_ratio: f64) -> f64 {
    0.4 * (words_per_sentence + 100.0 * complex_word_ratio)
}

fn smog(complex_words: usize, sentence_count: usize) -> f64 {
    if sentence_count == 0 {
        return 0.0;
    }
    1.0430 * ((complex_words as f64) * (30.0 / sentence_count as f64)).sqrt() + 3.1291
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syllable_heuristic_handles_silent_e() {
        assert_eq!(count_syllables("code"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("a"), 1);
    }

    #[test]
    fn flesch_formulas_match_pinned_constants() {
        assert!((flesch_reading_ease(0.0, 0.0) - 206.835).abs() < 1e-9);
        assert!((flesch_kincaid_grade(0.0, 0.0) + 15.59).abs() < 1e-9);
    }

    #[test]
    fn stats_over_empty_input_do_not_panic() {
        let stats = compute(&[], 0);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.average_sentence_length, 0.0);
    }

    #[test]
    fn detects_be_verb_past_participle_as_passive() {
        assert!(looks_passive("The report was written by the team."));
        assert!(!looks_passive("The team wrote the report."));
    }
}
