// ==========================================
// 蛋鸡生产记录核心 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::{Aviary, FeatheringQuality};
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait ImportConfigReader: Send + Sync {
    // ===== 解析默认值 =====

    /// 获取默认鸡舍（表格中无法识别鸡舍时使用）
    ///
    /// # 默认值
    /// - 1
    fn get_default_aviary(&self) -> Result<Aviary, Box<dyn Error>>;

    /// 获取默认羽毛评级（表格中无法识别评级时使用）
    ///
    /// # 默认值
    /// - GOOD
    fn get_default_feathering(&self) -> Result<FeatheringQuality, Box<dyn Error>>;

    // ===== 鸡舍属性 =====

    /// 获取散养鸡舍列表（地面蛋只在这些鸡舍有意义）
    ///
    /// # 默认值
    /// - [1, 2]
    ///
    /// # 用途
    /// - 笼养鸡舍出现地面蛋时，导入报告给出警告
    fn get_cage_free_aviaries(&self) -> Result<Vec<Aviary>, Box<dyn Error>>;

    // ===== 行过滤阈值 =====

    /// 获取数据行最少列数（少于该值的行视为页脚 / 垃圾行）
    ///
    /// # 默认值
    /// - 3
    fn get_min_row_tokens(&self) -> Result<usize, Box<dyn Error>>;

    /// 获取可沿用 ID 的最小长度（长度需严格大于该值）
    ///
    /// # 默认值
    /// - 5
    fn get_min_identifier_len(&self) -> Result<usize, Box<dyn Error>>;
}
