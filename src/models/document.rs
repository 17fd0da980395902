//! 题目文档的结构化表示
//!
//! 一份题目文档被拆成若干片段：题干、选项块，以及两者之外原样保留的文本。
//! 重新序列化时只有题干和选项块会变化。

use crate::error::{Problem, QuestionElement, QuestionError};
use crate::models::question::AnswerEntry;
use rand::seq::SliceRandom;
use rand::Rng;

/// 文档片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// 标签之外的原文
    Text(String),
    /// `\question{...}` 的内容
    Statement(String),
    /// `\begin{answers} ... \end{answers}` 中的选项
    Answers(Vec<AnswerEntry>),
}

/// 解析后的题目文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDocument {
    source_id: String,
    segments: Vec<Segment>,
    statement_tags: usize,
    answers_blocks: usize,
}

impl QuestionDocument {
    pub(crate) fn new(
        source_id: impl Into<String>,
        segments: Vec<Segment>,
        statement_tags: usize,
        answers_blocks: usize,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            segments,
            statement_tags,
            answers_blocks,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 题干原文（没有题干标签时为 None）
    pub fn statement(&self) -> Option<&str> {
        self.segments.iter().find_map(|s| match s {
            Segment::Statement(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// 选项列表（没有选项块时为 None）
    pub fn answers(&self) -> Option<&[AnswerEntry]> {
        self.segments.iter().find_map(|s| match s {
            Segment::Answers(entries) => Some(entries.as_slice()),
            _ => None,
        })
    }

    fn answers_mut(&mut self) -> Option<&mut Vec<AnswerEntry>> {
        self.segments.iter_mut().find_map(|s| match s {
            Segment::Answers(entries) => Some(entries),
            _ => None,
        })
    }

    pub fn correct_count(&self) -> usize {
        self.answers()
            .map(|entries| entries.iter().filter(|a| a.correct).count())
            .unwrap_or(0)
    }

    /// 打乱选项顺序，正确标记跟随选项移动
    pub fn shuffle_answers<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(entries) = self.answers_mut() {
            entries.shuffle(rng);
        }
    }

    /// 在题干前加上 `Question {n}: `，没有题干时不做任何事
    pub fn number_statement(&mut self, question_number: usize) {
        for segment in &mut self.segments {
            if let Segment::Statement(text) = segment {
                *text = format!("Question {}: {}", question_number, text);
                return;
            }
        }
    }

    /// 严格校验：恰好一个题干、一个选项块、一个正确选项
    pub fn validate(&self) -> Result<(), QuestionError> {
        check_single(&self.source_id, QuestionElement::Statement, self.statement_tags)?;
        check_single(&self.source_id, QuestionElement::AnswersBlock, self.answers_blocks)?;

        let correct_count = self.correct_count();
        if correct_count != 1 {
            return Err(QuestionError::InvariantViolation {
                source_id: self.source_id.clone(),
                correct_count,
            });
        }
        Ok(())
    }

    /// 序列化回 LaTeX 文本
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Statement(text) => {
                    out.push_str("\\question{");
                    out.push_str(text);
                    out.push('}');
                }
                Segment::Answers(entries) => out.push_str(&render_answers_block(entries)),
            }
        }
        out
    }
}

fn check_single(source_id: &str, element: QuestionElement, count: usize) -> Result<(), QuestionError> {
    match count {
        1 => Ok(()),
        0 => Err(QuestionError::malformed(source_id, element, Problem::Missing)),
        _ => Err(QuestionError::malformed(source_id, element, Problem::Duplicated)),
    }
}

/// 每个选项一行，缩进四个空格
pub fn render_answers_block(entries: &[AnswerEntry]) -> String {
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| format!("    {}", entry.to_tex()))
        .collect();
    format!("\\begin{{answers}}\n{}\n\\end{{answers}}", lines.join("\n"))
}
