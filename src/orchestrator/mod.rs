//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量版本处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载题目（Vec<QuestionSource>）
//! - 为每个版本启动独立任务
//! - 输出全局统计信息
//!
//! ### `version_processor` - 单个版本处理器
//! - 组卷并写入答案卷、学生卷
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<版本>)
//!     ↓
//! version_processor (处理单个版本)
//!     ↓
//! workflow::ExamAssembler (组卷：题目乱序 + 逐题乱序 + 模板)
//!     ↓
//! services (能力层：parser / randomizer / template / writer)
//! ```

pub mod batch_processor;
pub mod version_processor;

pub use batch_processor::{App, RunSummary};
pub use version_processor::process_version;
