//! 文件处理上下文
//!
//! 封装"我正在处理第几个文件"这一信息

use std::fmt::Display;

/// 文件处理上下文
#[derive(Debug, Clone)]
pub struct FileCtx {
    /// 文件ID（与进度记录一致）
    pub file_id: String,

    /// 入队序号（从1开始，仅用于日志显示）
    pub file_index: usize,

    /// 文件名
    pub file_name: String,
}

impl FileCtx {
    pub fn new(file_id: String, file_index: usize, file_name: String) -> Self {
        Self {
            file_id,
            file_index,
            file_name,
        }
    }
}

impl Display for FileCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件 #{} {} ID#{}]", self.file_index, self.file_name, self.file_id)
    }
}
