// ==========================================
// 蛋鸡生产记录核心 - 记录导入 Trait
// ==========================================
// 职责: 定义导入编排接口（不包含实现）
// ==========================================

use crate::domain::import::ImportReport;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// RecordImporter Trait
// ==========================================
// 用途: CLI / 外壳调用的导入主接口
// 实现者: RecordImporterImpl
pub trait RecordImporter {
    /// 从文本导入日产记录
    ///
    /// # 参数
    /// - text: 分隔文本（含表头）
    ///
    /// # 返回
    /// - Ok(ImportReport): 解析 / 合并 / 落库统计
    /// - Err: 存储写入失败、配置读取失败
    ///
    /// # 导入流程
    /// 1. 读取配置，构造解析参数
    /// 2. 解析文本（坏行跳过）
    /// 3. 检测文件内重复自然键
    /// 4. 加载现有集合（失败按空集合处理）
    /// 5. 按自然键合并
    /// 6. 整体落库
    fn import_production_text(&self, text: &str) -> ImportResult<ImportReport>;

    /// 从文本导入特征快照（流程同上）
    fn import_characterization_text(&self, text: &str) -> ImportResult<ImportReport>;

    /// 从 CSV 文件导入日产记录
    ///
    /// # 参数
    /// - file_path: .csv / .txt 文件路径
    ///
    /// # 返回
    /// - Err: 文件不存在、扩展名不支持、读取失败，以及文本导入的全部错误
    fn import_production_file(&self, file_path: &Path) -> ImportResult<ImportReport>;

    /// 从 CSV 文件导入特征快照
    fn import_characterization_file(&self, file_path: &Path) -> ImportResult<ImportReport>;
}
