//! 组卷流程 - 流程层
//!
//! 核心职责：定义"一个版本的试卷"如何生成
//!
//! 流程顺序：
//! 1. 解析全部题目（严格模式下逐题校验）
//! 2. 打乱题目顺序
//! 3. 按顺序编号，逐题打乱选项
//! 4. 拼接题目并套用文档模板，得到答案卷
//! 5. 去掉正确标记，得到学生卷

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{AppResult, ConfigError};
use crate::models::document::QuestionDocument;
use crate::models::question::{QuestionSource, RenderedExam, CORRECT_MARKER};
use crate::services::exam_template::ExamTemplate;
use crate::services::question_parser::parse_question;
use crate::services::randomizer::randomize_document;
use crate::utils::logging::truncate_text;
use crate::workflow::question_ctx::QuestionCtx;

/// 组卷器
///
/// - 不持有随机数源，每次组卷由调用方传入
/// - 不读写文件
pub struct ExamAssembler {
    template: ExamTemplate,
    strict_validation: bool,
}

impl ExamAssembler {
    pub fn new(template: ExamTemplate, strict_validation: bool) -> Self {
        Self {
            template,
            strict_validation,
        }
    }

    /// 生成一个版本的答案卷和学生卷
    ///
    /// # 参数
    /// - `sources`: 题库中的全部题目
    /// - `version`: 版本标签，只出现在标题中
    /// - `rng`: 随机数源，题目顺序和选项顺序都从这里抽取
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        sources: &[QuestionSource],
        version: &str,
        rng: &mut R,
    ) -> AppResult<RenderedExam> {
        if sources.is_empty() {
            return Err(ConfigError::EmptyQuestionPool.into());
        }

        let mut documents = sources
            .iter()
            .map(|source| self.prepare(source))
            .collect::<AppResult<Vec<_>>>()?;

        documents.shuffle(rng);

        let question_count = documents.len();
        let mut questions = String::new();
        for (index, document) in documents.into_iter().enumerate() {
            let ctx = QuestionCtx::new(version, document.source_id(), index + 1, question_count);
            let document = randomize_document(document, ctx.question_number, rng);
            debug!(
                "{} 题干: {}",
                ctx,
                truncate_text(document.statement().unwrap_or_default(), 60)
            );

            questions.push_str(&document.render());
            questions.push_str("\n\n");
        }

        let solution = self.template.render(version, question_count, &questions)?;
        let student = strip_markers(&solution);

        Ok(RenderedExam {
            version: version.to_string(),
            question_count,
            solution,
            student,
        })
    }

    fn prepare(&self, source: &QuestionSource) -> AppResult<QuestionDocument> {
        let document = parse_question(&source.id, &source.content)?;
        if self.strict_validation {
            document.validate()?;
        }
        Ok(document)
    }
}

/// 去掉所有正确标记
pub fn strip_markers(text: &str) -> String {
    text.replace(CORRECT_MARKER, "")
}
