//! 题目文档解析器
//!
//! 把一份题目源文件拆成 [`QuestionDocument`]：
//! - 第一个 `\question{...}` 作为题干
//! - 第一个 `\begin{answers} ... \end{answers}` 作为选项块
//! - 选项块内的每个 `\answer{...}` / `\answer[correct]{...}` 作为一个选项
//!
//! 正则只用来定位标签开头，标签内容靠花括号配对截取，所以选项里可以有嵌套花括号。
//!
//! 重新序列化时有两处不保留原文：
//! - 选项块内、选项之间的文本（注释、空行等）会被丢弃
//! - 标签中的空白会被规范化，`\question {x}` 写回为 `\question{x}`，
//!   `\answer [correct] {x}` 写回为 `\answer[correct]{x}`

use crate::error::{Problem, QuestionElement, QuestionError};
use crate::models::document::{QuestionDocument, Segment};
use crate::models::question::AnswerEntry;
use regex::Regex;
use std::sync::LazyLock;

/// 标签开头的正则
struct TagPatterns {
    statement_open: Regex,
    answers_begin: Regex,
    answers_end: Regex,
    answer_open: Regex,
}

impl TagPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            statement_open: Regex::new(r"\\question\s*\{")?,
            answers_begin: Regex::new(r"\\begin\s*\{answers\}")?,
            answers_end: Regex::new(r"\\end\s*\{answers\}")?,
            answer_open: Regex::new(r"\\answer\s*(\[correct\])?\s*\{")?,
        })
    }
}

static PATTERNS: LazyLock<Result<TagPatterns, regex::Error>> = LazyLock::new(TagPatterns::compile);

fn patterns(source_id: &str) -> Result<&'static TagPatterns, QuestionError> {
    PATTERNS.as_ref().map_err(|e| QuestionError::Pattern {
        source_id: source_id.to_string(),
        source: e.clone(),
    })
}

/// 文档中一段被识别出的标签（字节区间为 `[start, end)`）
struct Span {
    start: usize,
    end: usize,
    segment: Segment,
}

/// 解析题目源文件
///
/// 缺少题干或选项块不算解析错误（交给 [`QuestionDocument::validate`] 判断），
/// 花括号不配对、选项块没有结束标记、题干与选项块交叠则直接报错。
pub fn parse_question(source_id: &str, text: &str) -> Result<QuestionDocument, QuestionError> {
    let patterns = patterns(source_id)?;
    let answers = find_answers_block(patterns, source_id, text)?;
    let statement = find_statement(patterns, source_id, text)?;

    if let (Some(s), Some(a)) = (&statement, &answers) {
        if s.start < a.end && a.start < s.end {
            return Err(QuestionError::malformed(
                source_id,
                QuestionElement::Statement,
                Problem::Overlapping,
            ));
        }
    }

    let mut spans: Vec<Span> = statement.into_iter().chain(answers).collect();
    spans.sort_by_key(|span| span.start);

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            segments.push(Segment::Text(text[cursor..span.start].to_string()));
        }
        segments.push(span.segment);
        cursor = span.end;
    }
    if cursor < text.len() {
        segments.push(Segment::Text(text[cursor..].to_string()));
    }

    let statement_tags = patterns.statement_open.find_iter(text).count();
    let answers_blocks = patterns.answers_begin.find_iter(text).count();

    Ok(QuestionDocument::new(
        source_id,
        segments,
        statement_tags,
        answers_blocks,
    ))
}

fn find_statement(
    patterns: &TagPatterns,
    source_id: &str,
    text: &str,
) -> Result<Option<Span>, QuestionError> {
    let Some(open) = patterns.statement_open.find(text) else {
        return Ok(None);
    };

    let close = find_closing_brace(text, open.end()).ok_or_else(|| {
        QuestionError::malformed(source_id, QuestionElement::Statement, Problem::Unbalanced)
    })?;

    Ok(Some(Span {
        start: open.start(),
        end: close + 1,
        segment: Segment::Statement(text[open.end()..close].to_string()),
    }))
}

fn find_answers_block(
    patterns: &TagPatterns,
    source_id: &str,
    text: &str,
) -> Result<Option<Span>, QuestionError> {
    let Some(begin) = patterns.answers_begin.find(text) else {
        return Ok(None);
    };

    let end = patterns.answers_end.find_at(text, begin.end()).ok_or_else(|| {
        QuestionError::malformed(source_id, QuestionElement::AnswersBlock, Problem::Unterminated)
    })?;

    let entries = parse_entries(&patterns.answer_open, source_id, text, begin.end(), end.start())?;

    Ok(Some(Span {
        start: begin.start(),
        end: end.end(),
        segment: Segment::Answers(entries),
    }))
}

/// 解析 `[from, to)` 区间内的所有选项，保持原顺序
fn parse_entries(
    answer_open: &Regex,
    source_id: &str,
    text: &str,
    from: usize,
    to: usize,
) -> Result<Vec<AnswerEntry>, QuestionError> {
    let mut entries = Vec::new();
    let mut pos = from;

    while let Some(caps) = answer_open.captures_at(text, pos) {
        let Some(open) = caps.get(0) else { break };
        if open.start() >= to {
            break;
        }

        let close = find_closing_brace(text, open.end())
            .filter(|&close| close < to)
            .ok_or_else(|| {
                QuestionError::malformed(source_id, QuestionElement::Answer, Problem::Unbalanced)
            })?;

        entries.push(AnswerEntry::new(
            caps.get(1).is_some(),
            &text[open.end()..close],
        ));
        pos = close + 1;
    }

    Ok(entries)
}

/// 从 `content_start`（左花括号之后）开始寻找与之配对的右花括号
///
/// `\{` 和 `\}` 是转义字符，不参与配对。
fn find_closing_brace(text: &str, content_start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut chars = text[content_start..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(content_start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "% Geography\n\\question{What is the capital of France?}\n\\begin{answers}\n    \\answer{Berlin}\n    \\answer[correct]{Paris}\n    \\answer{Madrid}\n\\end{answers}\n";

    #[test]
    fn test_parse_sample() {
        let doc = parse_question("q1.tex", SAMPLE).unwrap();
        assert_eq!(doc.statement(), Some("What is the capital of France?"));
        let answers = doc.answers().unwrap();
        assert_eq!(
            answers,
            &[
                AnswerEntry::new(false, "Berlin"),
                AnswerEntry::new(true, "Paris"),
                AnswerEntry::new(false, "Madrid"),
            ]
        );
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_tag_patterns_compile() {
        assert!(TagPatterns::compile().is_ok());
        assert!(patterns("q1.tex").is_ok());
    }

    #[test]
    fn test_tag_whitespace_normalized_on_render() {
        let text = "\\question {Q}\n\\begin {answers}\n\\answer [correct] {a}\n\\answer {b}\n\\end {answers}";
        let doc = parse_question("q5.tex", text).unwrap();
        assert_eq!(doc.correct_count(), 1);
        assert_eq!(
            doc.render(),
            "\\question{Q}\n\\begin{answers}\n    \\answer[correct]{a}\n    \\answer{b}\n\\end{answers}"
        );
    }

    #[test]
    fn test_canonical_input_round_trips() {
        let doc = parse_question("q1.tex", SAMPLE).unwrap();
        assert_eq!(doc.render(), SAMPLE);
    }

    #[test]
    fn test_nested_braces_in_answers() {
        let text = "\\question{Solve $x^{2} = 4$}\n\\begin{answers}\n\\answer[correct]{$\\pm 2$}\n\\answer{$\\frac{1}{2}$}\n\\end{answers}";
        let doc = parse_question("q2.tex", text).unwrap();
        assert_eq!(doc.statement(), Some("Solve $x^{2} = 4$"));
        let answers = doc.answers().unwrap();
        assert_eq!(answers[1].text, "$\\frac{1}{2}$");
        assert!(answers[0].correct);
    }

    #[test]
    fn test_escaped_braces_do_not_count() {
        let text = "\\question{Set \\{1, 2\\}}\\begin{answers}\\answer[correct]{\\{\\}}\\end{answers}";
        let doc = parse_question("q3.tex", text).unwrap();
        assert_eq!(doc.statement(), Some("Set \\{1, 2\\}"));
        assert_eq!(doc.answers().unwrap()[0].text, "\\{\\}");
    }

    #[test]
    fn test_text_outside_tags_preserved() {
        let text = "before\n\\question{Q}\nmiddle\n\\begin{answers}\n\\answer[correct]{a}\n\\end{answers}\nafter";
        let doc = parse_question("q4.tex", text).unwrap();
        let segments = doc.segments();
        assert_eq!(segments[0], Segment::Text("before\n".to_string()));
        assert_eq!(segments[2], Segment::Text("\nmiddle\n".to_string()));
        assert_eq!(segments[4], Segment::Text("\nafter".to_string()));
    }

    #[test]
    fn test_missing_statement_is_tolerated() {
        let text = "\\begin{answers}\n\\answer[correct]{a}\n\\end{answers}";
        let doc = parse_question("q5.tex", text).unwrap();
        assert_eq!(doc.statement(), None);
        assert!(matches!(
            doc.validate(),
            Err(QuestionError::Malformed {
                element: QuestionElement::Statement,
                problem: Problem::Missing,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_answers() {
        let text = "\\question{Empty}\n\\begin{answers}\n\\end{answers}";
        let doc = parse_question("q6.tex", text).unwrap();
        assert_eq!(doc.answers().map(|a| a.len()), Some(0));
        assert!(matches!(
            doc.validate(),
            Err(QuestionError::InvariantViolation { correct_count: 0, .. })
        ));
    }

    #[test]
    fn test_unterminated_answers_block() {
        let text = "\\question{Q}\n\\begin{answers}\n\\answer{a}\n";
        let err = parse_question("q7.tex", text).unwrap_err();
        assert!(matches!(
            err,
            QuestionError::Malformed {
                element: QuestionElement::AnswersBlock,
                problem: Problem::Unterminated,
                ..
            }
        ));
        assert_eq!(err.source_id(), "q7.tex");
    }

    #[test]
    fn test_unbalanced_statement() {
        let err = parse_question("q8.tex", "\\question{never closed").unwrap_err();
        assert!(matches!(
            err,
            QuestionError::Malformed {
                element: QuestionElement::Statement,
                problem: Problem::Unbalanced,
                ..
            }
        ));
    }

    #[test]
    fn test_answer_brace_cannot_escape_block() {
        let text = "\\question{Q}\\begin{answers}\\answer{open\\end{answers} }";
        let err = parse_question("q9.tex", text).unwrap_err();
        assert!(matches!(
            err,
            QuestionError::Malformed {
                element: QuestionElement::Answer,
                problem: Problem::Unbalanced,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_blocks_are_counted() {
        let text = "\\question{A}\\question{B}\\begin{answers}\\answer[correct]{x}\\end{answers}";
        let doc = parse_question("q10.tex", text).unwrap();
        assert_eq!(doc.statement(), Some("A"));
        assert!(matches!(
            doc.validate(),
            Err(QuestionError::Malformed {
                element: QuestionElement::Statement,
                problem: Problem::Duplicated,
                ..
            })
        ));
    }
}
