//! 试卷文档模板
//!
//! 使用 Handlebars 渲染整份 LaTeX 文档。模板可用变量：
//! - `title`: 试卷标题（已带版本号）
//! - `version`: 版本标签
//! - `question_count`: 题目数量
//! - `instructions`: 已渲染的答题说明（未启用时为空字符串）
//! - `questions`: 拼接好的全部题目
//! - `highlight_correct`: 答案卷中是否加粗正确选项
//!
//! 答题说明模板可用 `version`、`question_count`、`show_question_count`。

use crate::config::TemplateSettings;
use crate::error::TemplateError;
use handlebars::Handlebars;
use serde::Serialize;

const DOCUMENT_TEMPLATE: &str = "document";
const INSTRUCTIONS_TEMPLATE: &str = "instructions";

/// 默认文档模板
pub const DEFAULT_DOCUMENT_TEMPLATE: &str = r#"\documentclass{article}
{{#if highlight_correct}}
\usepackage{ifthen}
{{/if}}
\newcommand{\question}[1]{\section*{#1}}
\newenvironment{answers}{\begin{enumerate}}{\end{enumerate}}
{{#if highlight_correct}}
\newcommand{\answer}[2][]{\item \ifthenelse{\equal{#1}{correct}}{\textbf{#2}}{#2}}
{{else}}
\newcommand{\answer}[2][]{\item #2}
{{/if}}

\title{ {{~title~}} }

\begin{document}

\maketitle

{{#if instructions}}
\begin{center}
\fbox{\parbox{0.9\textwidth}{ {{~instructions~}} }}
\end{center}

{{/if}}
{{questions}}
\end{document}
"#;

/// 默认答题说明
pub const DEFAULT_INSTRUCTIONS: &str = "{{#if show_question_count}}This exam contains {{question_count}} questions. {{/if}}Select exactly one answer for each question.";

#[derive(Serialize)]
struct InstructionsData<'a> {
    version: &'a str,
    question_count: usize,
    show_question_count: bool,
}

#[derive(Serialize)]
struct DocumentData<'a> {
    title: String,
    version: &'a str,
    question_count: usize,
    instructions: String,
    questions: &'a str,
    highlight_correct: bool,
}

/// 编译好的试卷模板
pub struct ExamTemplate {
    handlebars: Handlebars<'static>,
    exam_title: String,
    include_instructions: bool,
    show_question_count: bool,
    highlight_correct: bool,
}

impl ExamTemplate {
    /// 根据配置编译模板
    ///
    /// # 参数
    /// - `settings`: 模板配置
    /// - `custom_document`: 自定义文档模板内容，None 时使用默认模板
    pub fn new(settings: &TemplateSettings, custom_document: Option<String>) -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        // LaTeX 输出，不做 HTML 转义
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        let document = custom_document.unwrap_or_else(|| DEFAULT_DOCUMENT_TEMPLATE.to_string());
        register(&mut handlebars, DOCUMENT_TEMPLATE, &document)?;
        register(&mut handlebars, INSTRUCTIONS_TEMPLATE, &settings.instructions)?;

        Ok(Self {
            handlebars,
            exam_title: settings.exam_title.clone(),
            include_instructions: settings.include_instructions,
            show_question_count: settings.show_question_count,
            highlight_correct: settings.highlight_correct,
        })
    }

    /// 使用默认配置和默认模板
    pub fn with_defaults() -> Result<Self, TemplateError> {
        Self::new(&TemplateSettings::default(), None)
    }

    /// 渲染完整文档
    pub fn render(&self, version: &str, question_count: usize, questions: &str) -> Result<String, TemplateError> {
        let instructions = if self.include_instructions {
            let data = InstructionsData {
                version,
                question_count,
                show_question_count: self.show_question_count,
            };
            render(&self.handlebars, INSTRUCTIONS_TEMPLATE, &data)?
        } else {
            String::new()
        };

        let data = DocumentData {
            title: format!("{} ({})", self.exam_title, version),
            version,
            question_count,
            instructions,
            questions,
            highlight_correct: self.highlight_correct,
        };
        render(&self.handlebars, DOCUMENT_TEMPLATE, &data)
    }
}

fn register(handlebars: &mut Handlebars<'static>, name: &str, template: &str) -> Result<(), TemplateError> {
    handlebars
        .register_template_string(name, template)
        .map_err(|e| TemplateError::Compile {
            name: name.to_string(),
            source: Box::new(e),
        })
}

fn render<T: Serialize>(handlebars: &Handlebars<'static>, name: &str, data: &T) -> Result<String, TemplateError> {
    handlebars.render(name, data).map_err(|e| TemplateError::Render {
        name: name.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "\\question{Question 1: Q}\n\\begin{answers}\n    \\answer[correct]{a}\n\\end{answers}\n\n";

    #[test]
    fn test_default_document() {
        let template = ExamTemplate::with_defaults().unwrap();
        let doc = template.render("A", 1, BODY).unwrap();
        assert!(doc.starts_with("\\documentclass{article}"));
        assert!(doc.contains("\\title{Module 2: Exam (A)}"));
        assert!(doc.contains("\\newcommand{\\answer}[2][]{\\item #2}"));
        assert!(doc.contains("This exam contains 1 questions."));
        assert!(doc.contains(BODY));
        assert!(doc.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_latex_is_not_escaped() {
        let template = ExamTemplate::with_defaults().unwrap();
        let doc = template.render("B", 1, "a & b < c\n").unwrap();
        assert!(doc.contains("a & b < c"));
    }

    #[test]
    fn test_instructions_can_be_disabled() {
        let settings = TemplateSettings {
            include_instructions: false,
            ..TemplateSettings::default()
        };
        let template = ExamTemplate::new(&settings, None).unwrap();
        let doc = template.render("A", 3, BODY).unwrap();
        assert!(!doc.contains("\\fbox"));
        assert!(!doc.contains("Select exactly one answer"));
    }

    #[test]
    fn test_question_count_can_be_hidden() {
        let settings = TemplateSettings {
            show_question_count: false,
            ..TemplateSettings::default()
        };
        let template = ExamTemplate::new(&settings, None).unwrap();
        let doc = template.render("A", 3, BODY).unwrap();
        assert!(!doc.contains("This exam contains"));
        assert!(doc.contains("Select exactly one answer for each question."));
    }

    #[test]
    fn test_highlight_correct_macro() {
        let settings = TemplateSettings {
            highlight_correct: true,
            ..TemplateSettings::default()
        };
        let template = ExamTemplate::new(&settings, None).unwrap();
        let doc = template.render("A", 1, BODY).unwrap();
        assert!(doc.contains("\\usepackage{ifthen}"));
        assert!(doc.contains("\\textbf{#2}"));
    }

    #[test]
    fn test_custom_document_template() {
        let custom = "% {{title}} / {{question_count}}\n{{questions}}".to_string();
        let template = ExamTemplate::new(&TemplateSettings::default(), Some(custom)).unwrap();
        let doc = template.render("C", 2, "body").unwrap();
        assert_eq!(doc, "% Module 2: Exam (C) / 2\nbody");
    }

    #[test]
    fn test_unknown_variable_is_render_error() {
        let custom = "{{no_such_field}}".to_string();
        let template = ExamTemplate::new(&TemplateSettings::default(), Some(custom)).unwrap();
        assert!(matches!(
            template.render("A", 1, ""),
            Err(TemplateError::Render { .. })
        ));
    }

    #[test]
    fn test_broken_template_is_compile_error() {
        let custom = "{{#if questions}}never closed".to_string();
        assert!(matches!(
            ExamTemplate::new(&TemplateSettings::default(), Some(custom)),
            Err(TemplateError::Compile { .. })
        ));
    }
}
