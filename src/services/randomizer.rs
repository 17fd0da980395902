//! 单题乱序
//!
//! 只负责"一道题"：打乱选项、给题干编号、序列化回文本。
//! 不校验正确选项数量，严格校验由组卷流程决定是否执行。

use crate::error::QuestionError;
use crate::models::document::QuestionDocument;
use crate::services::question_parser::parse_question;
use rand::Rng;

/// 对已解析的题目做乱序和编号
pub fn randomize_document<R: Rng + ?Sized>(
    mut document: QuestionDocument,
    question_number: usize,
    rng: &mut R,
) -> QuestionDocument {
    document.shuffle_answers(rng);
    document.number_statement(question_number);
    document
}

/// 解析题目原文，打乱选项顺序，并在题干前加上 `Question {n}: `
///
/// # 参数
/// - `source_id`: 题目来源标识（用于报错）
/// - `question_text`: 题目原文
/// - `question_number`: 题号（从 1 开始，由调用方分配）
/// - `rng`: 随机数源
pub fn randomize<R: Rng + ?Sized>(
    source_id: &str,
    question_text: &str,
    question_number: usize,
    rng: &mut R,
) -> Result<String, QuestionError> {
    let document = parse_question(source_id, question_text)?;
    Ok(randomize_document(document, question_number, rng).render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{AnswerEntry, CORRECT_MARKER};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const QUESTION: &str = "% keep me\n\\question{Which planet is largest?}\n\\begin{answers}\n    \\answer{Mars}\n    \\answer[correct]{Jupiter}\n    \\answer{Venus}\n    \\answer{Mercury}\n\\end{answers}\n% trailer\n";

    fn sorted_answers(text: &str) -> Vec<AnswerEntry> {
        let mut answers = parse_question("check", text)
            .unwrap()
            .answers()
            .unwrap()
            .to_vec();
        answers.sort();
        answers
    }

    #[test]
    fn test_multiset_preserved_for_many_seeds() {
        let expected = sorted_answers(QUESTION);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let output = randomize("q1.tex", QUESTION, 3, &mut rng).unwrap();
            assert_eq!(sorted_answers(&output), expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_statement_numbered() {
        let mut rng = StdRng::seed_from_u64(1);
        let output = randomize("q1.tex", QUESTION, 7, &mut rng).unwrap();
        assert!(output.contains("\\question{Question 7: Which planet is largest?}"));
        assert_eq!(output.matches(CORRECT_MARKER).count(), 1);
    }

    #[test]
    fn test_outside_text_untouched() {
        let mut rng = StdRng::seed_from_u64(2);
        let output = randomize("q1.tex", QUESTION, 1, &mut rng).unwrap();
        assert!(output.starts_with("% keep me\n\\question{"));
        assert!(output.ends_with("\\end{answers}\n% trailer\n"));
    }

    #[test]
    fn test_every_order_reachable() {
        let mut seen = HashSet::new();
        for seed in 0..400 {
            let mut rng = StdRng::seed_from_u64(seed);
            let doc = parse_question("q1.tex", QUESTION).unwrap();
            let doc = randomize_document(doc, 1, &mut rng);
            let order: Vec<String> = doc
                .answers()
                .unwrap()
                .iter()
                .map(|a| a.text.clone())
                .collect();
            seen.insert(order);
        }
        // 4 个选项共 24 种排列
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_zero_answers_gives_empty_block() {
        let text = "\\question{Nothing to pick}\n\\begin{answers}\n\\end{answers}\n";
        let mut rng = StdRng::seed_from_u64(3);
        let output = randomize("q0.tex", text, 1, &mut rng).unwrap();
        assert_eq!(
            output,
            "\\question{Question 1: Nothing to pick}\n\\begin{answers}\n\n\\end{answers}\n"
        );
    }

    #[test]
    fn test_missing_statement_not_an_error() {
        let text = "\\begin{answers}\n\\answer[correct]{a}\n\\answer{b}\n\\end{answers}";
        let mut rng = StdRng::seed_from_u64(4);
        let output = randomize("q2.tex", text, 2, &mut rng).unwrap();
        assert!(!output.contains("Question 2:"));
        assert_eq!(sorted_answers(&output).len(), 2);
    }

    #[test]
    fn test_multiple_correct_passed_through() {
        let text = "\\question{Q}\\begin{answers}\\answer[correct]{a}\\answer[correct]{b}\\answer{c}\\end{answers}";
        let mut rng = StdRng::seed_from_u64(5);
        let output = randomize("q3.tex", text, 1, &mut rng).unwrap();
        assert_eq!(output.matches(CORRECT_MARKER).count(), 2);
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = randomize("q1.tex", QUESTION, 1, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = randomize("q1.tex", QUESTION, 1, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
