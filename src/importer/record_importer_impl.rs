// ==========================================
// 蛋鸡生产记录核心 - 记录导入器实现
// ==========================================
// 职责: 整合导入流程，从文本 / 文件到存储
// 流程: 配置 → 解析 → 重复键检测 → 加载 → 合并 → 落库
// 红线: 解析阶段静默恢复；只有存储写入与配置读取失败才向上返回
// ==========================================

use crate::config::{config_keys, ImportConfigReader};
use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::import::ImportReport;
use crate::domain::production::{ComputedRecord, ProductionRecord};
use crate::domain::types::{Aviary, RecordKind};
use crate::engine::import_merge::{detect_duplicate_keys, merge_import, Identified};
use crate::engine::record_derivation::derive_records;
use crate::engine::temporal::today;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::record_importer_trait::RecordImporter;
use crate::importer::tabular_parser::{ParseOutcome, ParserOptions, TabularParser};
use crate::repository::{RecordRepository, RepositoryResult};
use chrono::{NaiveDate, Utc};
use std::hash::Hash;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 支持的文件扩展名
const SUPPORTED_EXTENSIONS: [&str; 2] = ["csv", "txt"];

// ==========================================
// ImportTarget - 可导入的记录类别
// ==========================================
// 把两类集合的差异（解析入口 / 自然键 / 存取）收敛到一处，流程只写一遍
trait ImportTarget: Identified + Clone + Sized {
    type Key: Ord + Eq + Hash;

    const KIND: RecordKind;

    fn parse(parser: &TabularParser, text: &str) -> ParseOutcome<Self>;

    fn key(&self) -> Self::Key;

    fn load<R: RecordRepository>(repo: &R) -> RepositoryResult<Vec<Self>>;

    fn save<R: RecordRepository>(repo: &R, records: &[Self]) -> RepositoryResult<usize>;

    /// 类别特有的非阻断警告
    fn warnings(_records: &[Self], _cage_free: &[Aviary]) -> Vec<String> {
        Vec::new()
    }
}

impl ImportTarget for ProductionRecord {
    type Key = (NaiveDate, Aviary);

    const KIND: RecordKind = RecordKind::Production;

    fn parse(parser: &TabularParser, text: &str) -> ParseOutcome<Self> {
        parser.parse_production(text)
    }

    fn key(&self) -> Self::Key {
        self.natural_key()
    }

    fn load<R: RecordRepository>(repo: &R) -> RepositoryResult<Vec<Self>> {
        repo.load_production()
    }

    fn save<R: RecordRepository>(repo: &R, records: &[Self]) -> RepositoryResult<usize> {
        repo.save_production(records)
    }

    /// 笼养鸡舍出现地面蛋
    fn warnings(records: &[Self], cage_free: &[Aviary]) -> Vec<String> {
        records
            .iter()
            .filter(|r| !cage_free.contains(&r.aviary) && r.floor_eggs.unwrap_or(0) > 0)
            .map(|r| {
                format!(
                    "{} {}: 笼养鸡舍记录了地面蛋 ({})",
                    r.date,
                    r.aviary.label(),
                    r.floor_eggs.unwrap_or(0)
                )
            })
            .collect()
    }
}

impl ImportTarget for CharacterizationSnapshot {
    type Key = (NaiveDate, Aviary, String);

    const KIND: RecordKind = RecordKind::Characterization;

    fn parse(parser: &TabularParser, text: &str) -> ParseOutcome<Self> {
        parser.parse_characterizations(text)
    }

    fn key(&self) -> Self::Key {
        self.natural_key()
    }

    fn load<R: RecordRepository>(repo: &R) -> RepositoryResult<Vec<Self>> {
        repo.load_characterizations()
    }

    fn save<R: RecordRepository>(repo: &R, records: &[Self]) -> RepositoryResult<usize> {
        repo.save_characterizations(records)
    }

    /// 缺少批次号的快照无法参与批次关联
    fn warnings(records: &[Self], _cage_free: &[Aviary]) -> Vec<String> {
        records
            .iter()
            .filter(|s| s.batch_id.is_empty())
            .map(|s| format!("{} {}: 快照缺少批次号", s.date, s.aviary.label()))
            .collect()
    }
}

// ==========================================
// RecordImporterImpl - 记录导入器实现
// ==========================================
pub struct RecordImporterImpl<R, C>
where
    R: RecordRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    repo: R,

    // 配置读取器
    config: C,

    // 日期单元格为空时使用的日期（None → 当天）
    fallback_date: Option<NaiveDate>,
}

impl<R, C> RecordImporterImpl<R, C>
where
    R: RecordRepository,
    C: ImportConfigReader,
{
    /// 创建新的导入器实例
    ///
    /// # 参数
    /// - repo: 记录集合仓储
    /// - config: 配置读取器
    pub fn new(repo: R, config: C) -> Self {
        Self {
            repo,
            config,
            fallback_date: None,
        }
    }

    /// 固定空白日期的回退值
    pub fn with_fallback_date(mut self, date: NaiveDate) -> Self {
        self.fallback_date = Some(date);
        self
    }

    /// 仓储引用
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 由配置构造解析参数
    pub fn parser_options(&self) -> ImportResult<ParserOptions> {
        Ok(ParserOptions {
            min_row_tokens: self
                .config
                .get_min_row_tokens()
                .map_err(|e| config_error(config_keys::MIN_ROW_TOKENS, e))?,
            min_identifier_len: self
                .config
                .get_min_identifier_len()
                .map_err(|e| config_error(config_keys::MIN_IDENTIFIER_LEN, e))?,
            default_aviary: self
                .config
                .get_default_aviary()
                .map_err(|e| config_error(config_keys::DEFAULT_AVIARY, e))?,
            default_feathering: self
                .config
                .get_default_feathering()
                .map_err(|e| config_error(config_keys::DEFAULT_FEATHERING, e))?,
            fallback_date: self.fallback_date.unwrap_or_else(today),
        })
    }

    /// 读取现有集合并派生全部日产记录
    pub fn computed_records(&self) -> ImportResult<Vec<ComputedRecord>> {
        let records = self.repo.load_production()?;
        let snapshots = self.repo.load_characterizations()?;
        Ok(derive_records(&records, &snapshots))
    }

    /// 导入主流程
    #[instrument(skip(self, text), fields(kind = %T::KIND))]
    fn run_import<T: ImportTarget>(
        &self,
        text: &str,
        file_name: Option<String>,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let import_id = Uuid::new_v4().to_string();
        info!(import_id = %import_id, file_name = ?file_name, "开始导入");

        // === 步骤 1: 读取配置 ===
        debug!("步骤 1: 读取配置");
        let options = self.parser_options()?;
        let cage_free = self
            .config
            .get_cage_free_aviaries()
            .map_err(|e| config_error(config_keys::CAGE_FREE_AVIARIES, e))?;

        // === 步骤 2: 解析文本 ===
        debug!("步骤 2: 解析文本");
        let outcome = T::parse(&TabularParser::new(options), text);
        let parsed_rows = outcome.records.len();
        info!(
            total_rows = outcome.total_rows,
            parsed_rows,
            skipped_rows = outcome.skipped_rows,
            "文本解析完成"
        );

        // === 步骤 3: 重复键检测 ===
        debug!("步骤 3: 重复键检测");
        let duplicates = detect_duplicate_keys(&outcome.records, T::key);
        let mut warnings = Vec::new();
        for (idx, id) in &duplicates {
            warn!(row = idx + 1, id = %id, "文件内自然键重复，后写覆盖");
            warnings.push(format!("第 {} 条记录与前面的记录自然键重复，已覆盖", idx + 1));
        }
        for message in T::warnings(&outcome.records, &cage_free) {
            warn!(warning = %message, "导入警告");
            warnings.push(message);
        }

        // === 步骤 4: 加载现有集合 ===
        // 加载失败时中止：保存是整体替换，不能用部分集合覆盖已存数据
        debug!("步骤 4: 加载现有集合");
        let existing = T::load(&self.repo).map_err(|e| {
            warn!(error = %e, "现有集合加载失败，导入中止，已存数据保持不变");
            ImportError::from(e)
        })?;

        // === 步骤 5: 合并 ===
        debug!(existing = existing.len(), "步骤 5: 按自然键合并");
        let merged = merge_import(&existing, outcome.records, T::key);
        info!(
            inserted = merged.inserted,
            updated = merged.updated,
            collection_size = merged.records.len(),
            "合并完成"
        );
        for (old_id, new_id) in &merged.reassigned {
            warn!(old_id = %old_id, new_id = %new_id, "ID 已被其它记录占用，换发新 ID");
            warnings.push(format!("ID {} 已被其它记录占用，新记录改用 {}", old_id, new_id));
        }

        // === 步骤 6: 落库 ===
        debug!("步骤 6: 落库");
        let saved = T::save(&self.repo, &merged.records)?;

        let elapsed = start_time.elapsed();
        let report = ImportReport {
            import_id,
            kind: T::KIND,
            file_name,
            total_rows: outcome.total_rows,
            parsed_rows,
            skipped_rows: outcome.skipped_rows,
            inserted: merged.inserted,
            updated: merged.updated,
            duplicate_keys: duplicates.len(),
            warnings,
            collection_size: saved,
            imported_at: Utc::now(),
            elapsed_ms: elapsed.as_millis(),
        };

        info!(
            import_id = %report.import_id,
            inserted = report.inserted,
            updated = report.updated,
            warnings = report.warnings.len(),
            elapsed_ms = report.elapsed_ms,
            "导入完成"
        );

        Ok(report)
    }

    /// 读取导入文件（检查存在性与扩展名，非 UTF-8 字节按替换字符处理）
    fn read_import_file(file_path: &Path) -> ImportResult<(String, Option<String>)> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = std::fs::read(file_path)?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());
        Ok((String::from_utf8_lossy(&bytes).into_owned(), file_name))
    }
}

impl<R, C> RecordImporter for RecordImporterImpl<R, C>
where
    R: RecordRepository,
    C: ImportConfigReader,
{
    fn import_production_text(&self, text: &str) -> ImportResult<ImportReport> {
        self.run_import::<ProductionRecord>(text, None)
    }

    fn import_characterization_text(&self, text: &str) -> ImportResult<ImportReport> {
        self.run_import::<CharacterizationSnapshot>(text, None)
    }

    fn import_production_file(&self, file_path: &Path) -> ImportResult<ImportReport> {
        let (text, file_name) = Self::read_import_file(file_path)?;
        self.run_import::<ProductionRecord>(&text, file_name)
    }

    fn import_characterization_file(&self, file_path: &Path) -> ImportResult<ImportReport> {
        let (text, file_name) = Self::read_import_file(file_path)?;
        self.run_import::<CharacterizationSnapshot>(&text, file_name)
    }
}

fn config_error(key: &str, err: Box<dyn std::error::Error>) -> ImportError {
    ImportError::ConfigReadError {
        key: key.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::FeatheringQuality;
    use crate::repository::RepositoryError;
    use std::error::Error;
    use std::sync::Mutex;

    // ===== 内存仓储 =====
    #[derive(Default)]
    struct MemoryRepo {
        production: Mutex<Vec<ProductionRecord>>,
        snapshots: Mutex<Vec<CharacterizationSnapshot>>,
        fail_load: bool,
    }

    impl RecordRepository for MemoryRepo {
        fn load_production(&self) -> RepositoryResult<Vec<ProductionRecord>> {
            if self.fail_load {
                return Err(RepositoryError::LockError("poisoned".to_string()));
            }
            Ok(self.production.lock().unwrap().clone())
        }

        fn save_production(&self, records: &[ProductionRecord]) -> RepositoryResult<usize> {
            *self.production.lock().unwrap() = records.to_vec();
            Ok(records.len())
        }

        fn load_characterizations(&self) -> RepositoryResult<Vec<CharacterizationSnapshot>> {
            Ok(self.snapshots.lock().unwrap().clone())
        }

        fn save_characterizations(
            &self,
            snapshots: &[CharacterizationSnapshot],
        ) -> RepositoryResult<usize> {
            *self.snapshots.lock().unwrap() = snapshots.to_vec();
            Ok(snapshots.len())
        }
    }

    // ===== 固定配置 =====
    struct FixedConfig;

    impl ImportConfigReader for FixedConfig {
        fn get_default_aviary(&self) -> Result<Aviary, Box<dyn Error>> {
            Ok(Aviary::A1)
        }
        fn get_default_feathering(&self) -> Result<FeatheringQuality, Box<dyn Error>> {
            Ok(FeatheringQuality::Good)
        }
        fn get_cage_free_aviaries(&self) -> Result<Vec<Aviary>, Box<dyn Error>> {
            Ok(vec![Aviary::A1, Aviary::A2])
        }
        fn get_min_row_tokens(&self) -> Result<usize, Box<dyn Error>> {
            Ok(3)
        }
        fn get_min_identifier_len(&self) -> Result<usize, Box<dyn Error>> {
            Ok(5)
        }
    }

    const PRODUCTION_CSV: &str = "ID;Data;Aviário;Limpos;Sujos;Chão;Aves\n\
                                  rec-000001;01/03/2024;1;900;10;5;1000\n\
                                  rec-000002;01/03/2024;3;800;20;4;1000\n";

    #[test]
    fn test_import_production_text_inserts_and_warns() {
        let importer = RecordImporterImpl::new(MemoryRepo::default(), FixedConfig);

        let report = importer.import_production_text(PRODUCTION_CSV).unwrap();

        assert_eq!(report.kind, RecordKind::Production);
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.parsed_rows, 2);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.updated, 0);
        assert_eq!(report.collection_size, 2);
        // 鸡舍 3 为笼养，地面蛋给出警告
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(importer.repository().load_production().unwrap().len(), 2);
    }

    #[test]
    fn test_reimport_updates_in_place() {
        let importer = RecordImporterImpl::new(MemoryRepo::default(), FixedConfig);
        importer.import_production_text(PRODUCTION_CSV).unwrap();

        let again = "Data;Aviário;Limpos;Aves\n01/03/2024;1;950;1000\n";
        let report = importer.import_production_text(again).unwrap();

        assert_eq!(report.inserted, 0);
        assert_eq!(report.updated, 1);
        let stored = importer.repository().load_production().unwrap();
        let a1 = stored.iter().find(|r| r.aviary == Aviary::A1).unwrap();
        assert_eq!(a1.id, "rec-000001");
        assert_eq!(a1.clean_eggs, 950);
    }

    #[test]
    fn test_load_failure_aborts_without_saving() {
        let stored = vec![ProductionRecord::new(
            "rec-antigo",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            Aviary::A2,
        )];
        let repo = MemoryRepo {
            production: Mutex::new(stored.clone()),
            fail_load: true,
            ..Default::default()
        };
        let importer = RecordImporterImpl::new(repo, FixedConfig);

        let result = importer.import_production_text(PRODUCTION_CSV);

        assert!(matches!(
            result,
            Err(ImportError::RepositoryError(RepositoryError::LockError(_)))
        ));
        assert_eq!(*importer.repository().production.lock().unwrap(), stored);
    }

    #[test]
    fn test_reused_id_on_new_date_is_reassigned() {
        let importer = RecordImporterImpl::new(MemoryRepo::default(), FixedConfig);
        importer.import_production_text(PRODUCTION_CSV).unwrap();

        let moved = "ID;Data;Aviário;Limpos;Aves
rec-000001;02/03/2024;1;700;1000
";
        let report = importer.import_production_text(moved).unwrap();

        assert_eq!(report.inserted, 1);
        assert!(report.warnings.iter().any(|w| w.contains("rec-000001")));
        let stored = importer.repository().load_production().unwrap();
        assert_eq!(stored.len(), 3);
        let ids: std::collections::HashSet<&str> = stored.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_duplicate_keys_reported() {
        let importer = RecordImporterImpl::new(MemoryRepo::default(), FixedConfig);
        let text = "Data;Aviário;Limpos;Aves\n01/03/2024;2;10;10\n01/03/2024;2;20;10\n";

        let report = importer.import_production_text(text).unwrap();

        assert_eq!(report.duplicate_keys, 1);
        assert_eq!(report.collection_size, 1);
        assert_eq!(
            importer.repository().load_production().unwrap()[0].clean_eggs,
            20
        );
    }

    #[test]
    fn test_computed_records_use_imported_snapshots() {
        let importer = RecordImporterImpl::new(MemoryRepo::default(), FixedConfig)
            .with_fallback_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        importer
            .import_characterization_text(
                "Data;Aviário;Lote;Idade;Peso;Uniformidade;Empenamento\n\
                 01/02/2024;1;L-7;30;1,6;85;Boa\n",
            )
            .unwrap();
        importer.import_production_text(PRODUCTION_CSV).unwrap();

        let computed = importer.computed_records().unwrap();
        let a1 = computed.iter().find(|c| c.record.aviary == Aviary::A1).unwrap();
        let a3 = computed.iter().find(|c| c.record.aviary == Aviary::A3).unwrap();
        assert_eq!(a1.resolved_batch_id.as_deref(), Some("L-7"));
        assert_eq!(a3.resolved_batch_id, None);
    }

    #[test]
    fn test_file_checks() {
        let importer = RecordImporterImpl::new(MemoryRepo::default(), FixedConfig);

        let missing = importer.import_production_file(Path::new("/nao/existe.csv"));
        assert!(matches!(missing, Err(ImportError::FileNotFound(_))));

        let xlsx = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let unsupported = importer.import_production_file(xlsx.path());
        assert!(matches!(unsupported, Err(ImportError::UnsupportedFormat(_))));
    }
}
