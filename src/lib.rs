//! # Exam Shuffler
//!
//! 从 LaTeX 题库生成多个乱序版本试卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 题目源文件、解析后的题目文档、渲染结果
//! - `loaders` - 扫描题目目录
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题目或单份文档
//! - `question_parser` - 解析题干和选项
//! - `randomizer` - 单题选项乱序和编号
//! - `ExamTemplate` - Handlebars 文档模板
//! - `ExamWriter` - 原子写入试卷文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个版本"的完整组卷流程
//! - `QuestionCtx` - 上下文封装（版本 + 题号）
//! - `ExamAssembler` - 组卷（题目乱序 → 逐题乱序 → 模板 → 学生卷）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量版本处理器，管理资源和并发
//! - `orchestrator/version_processor` - 单个版本处理器，组卷并写入
//!
//! ## 模块结构

pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::question::{AnswerEntry, QuestionSource, RenderedExam, WrittenExam};
pub use models::QuestionDocument;
pub use orchestrator::{process_version, App, RunSummary};
pub use services::{parse_question, randomize};
pub use workflow::{ExamAssembler, QuestionCtx};
