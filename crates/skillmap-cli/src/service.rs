use crate::config::Config;
use anyhow::{Context, Result};
use chrono::Local;
use skillmap_analysis::{compare, group_slices, summarize, GroupSlice, OverallSummary};
use skillmap_export::{
    unused_timestamped_path, PageLayout, PdfExporter, PdfReport, SpreadsheetExporter,
};
use skillmap_persistence::{StoreError, WorkerStore};
use skillmap_types::{ReportEntry, SkillError, SkillLevel, Taxonomy, WorkerRecord};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Application service: the only holder of the worker store.
///
/// Everything handed out is a value copy reconciled to the taxonomy.
pub struct SkillService {
    store: Arc<WorkerStore>,
    taxonomy: Taxonomy,
    spreadsheet: SpreadsheetExporter,
    pdf: PdfExporter,
    output_dir: PathBuf,
}

impl SkillService {
    pub fn new(
        store: Arc<WorkerStore>,
        taxonomy: Taxonomy,
        spreadsheet: SpreadsheetExporter,
        pdf: PdfExporter,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            taxonomy,
            spreadsheet,
            pdf,
            output_dir,
        }
    }

    /// Open the configured database and wire up the exporters
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = WorkerStore::open(&config.database.path)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.path))?;
        let taxonomy = config.taxonomy();
        info!(
            "Taxonomy: {} groups, {} categories",
            taxonomy.groups().len(),
            taxonomy.category_count()
        );

        Ok(Self::new(
            Arc::new(store),
            taxonomy,
            SpreadsheetExporter::new(config.export.sheet_name.clone()),
            PdfExporter::new(PageLayout::from_config(&config.pdf), config.export.font_path()),
            PathBuf::from(&config.export.output_dir),
        ))
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub async fn get_all_workers(&self) -> Result<Vec<WorkerRecord>, StoreError> {
        let records = self.store.get_all().await?;
        Ok(records
            .iter()
            .map(|record| record.reconciled(&self.taxonomy))
            .collect())
    }

    pub async fn get_worker_by_name(&self, name: &str) -> Result<Option<WorkerRecord>, StoreError> {
        let record = self.store.get_by_name(name).await?;
        Ok(record.map(|record| record.reconciled(&self.taxonomy)))
    }

    /// Add a worker. Levels outside 1..=5 are rejected before anything is stored.
    pub async fn add_worker(&self, name: &str, levels: &[SkillLevel]) -> Result<(), StoreError> {
        self.store.add(name, levels).await
    }

    pub async fn update_worker(
        &self,
        old_name: &str,
        new_name: &str,
        levels: &[SkillLevel],
    ) -> Result<(), StoreError> {
        self.store.update(old_name, new_name, levels).await
    }

    pub async fn delete_worker(&self, name: &str) -> Result<bool, StoreError> {
        self.store.delete(name).await
    }

    /// Totals and means across every worker
    pub async fn overall(&self) -> Result<OverallSummary, StoreError> {
        let records = self.get_all_workers().await?;
        Ok(summarize(&records, &self.taxonomy))
    }

    /// Per-group slices of one worker, `None` if the worker does not exist
    pub async fn tab_view(&self, name: &str) -> Result<Option<Vec<GroupSlice>>, StoreError> {
        let record = self.get_worker_by_name(name).await?;
        Ok(record.map(|record| group_slices(&record.skill_levels, &self.taxonomy)))
    }

    pub async fn compare(&self, names: &[String]) -> Result<Vec<WorkerRecord>, StoreError> {
        let records = self.store.get_all().await?;
        Ok(compare(&records, names, &self.taxonomy))
    }

    /// Exporter input for every worker, optionally limited to one group's columns
    pub async fn report_entries(&self, group: Option<&str>) -> Result<Vec<ReportEntry>> {
        let records = self.store.get_all().await?;
        let entries = records
            .iter()
            .map(|record| ReportEntry::from_record(record, &self.taxonomy));

        match group {
            None => Ok(entries.collect()),
            Some(group) => {
                let categories = &self
                    .taxonomy
                    .group(group)
                    .ok_or_else(|| SkillError::UnknownGroup(group.to_string()))?
                    .categories;
                Ok(entries.map(|entry| entry.restricted_to(categories)).collect())
            }
        }
    }

    /// Fresh path for a spreadsheet export; never one that already exists
    pub fn spreadsheet_path(&self) -> PathBuf {
        unused_timestamped_path(&self.output_dir, "skill_matrix", "xlsx", &Local::now())
    }

    pub fn pdf_path(&self) -> PathBuf {
        unused_timestamped_path(&self.output_dir, "skill_report", "pdf", &Local::now())
    }

    /// Write the skill matrix. Failures are logged and reported as `None`.
    pub fn export_to_spreadsheet(&self, entries: &[ReportEntry], path: &Path) -> Option<PathBuf> {
        if let Err(e) = ensure_parent(path) {
            error!("Spreadsheet export failed: {:#}", e);
            return None;
        }
        match self.spreadsheet.export(entries, path) {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Spreadsheet export to {} failed: {}", path.display(), e);
                None
            }
        }
    }

    /// Write the PDF report. Failures are logged and reported as `None`.
    pub fn export_to_pdf(&self, entries: &[ReportEntry], path: &Path) -> Option<PdfReport> {
        if let Err(e) = ensure_parent(path) {
            error!("PDF export failed: {:#}", e);
            return None;
        }
        match self.pdf.export(entries, path) {
            Ok(report) => Some(report),
            Err(e) => {
                error!("PDF export to {} failed: {}", path.display(), e);
                None
            }
        }
    }

    pub async fn backup(&self, destination: &Path) -> Result<(), StoreError> {
        self.store.backup(destination).await
    }

    pub async fn seed(&self, records: &[WorkerRecord]) -> Result<usize, StoreError> {
        self.store.seed_if_empty(records).await
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use skillmap_types::CategoryGroup;
    use tempfile::TempDir;

    pub(crate) fn small_taxonomy() -> Taxonomy {
        Taxonomy::new(vec![
            CategoryGroup::new("Dock", ["Unload", "Scan"]),
            CategoryGroup::new("Floor", ["Stow", "Pick", "Pack"]),
        ])
        .unwrap()
    }

    pub(crate) async fn service(output_dir: &Path) -> SkillService {
        let store = WorkerStore::in_memory().await.unwrap();
        SkillService::new(
            Arc::new(store),
            small_taxonomy(),
            SpreadsheetExporter::default(),
            PdfExporter::default(),
            output_dir.to_path_buf(),
        )
    }

    #[tokio::test]
    async fn test_reads_are_reconciled_to_taxonomy() {
        let dir = TempDir::new().unwrap();
        let service = service(dir.path()).await;
        service.add_worker("short", &[5, 3]).await.unwrap();
        service.add_worker("long", &[5, 3, 4, 2, 1, 2]).await.unwrap();

        let short = service.get_worker_by_name("short").await.unwrap().unwrap();
        assert_eq!(short.skill_levels, vec![5, 3, 1, 1, 1]);
        let long = service.get_worker_by_name("long").await.unwrap().unwrap();
        assert_eq!(long.skill_levels, vec![5, 3, 4, 2, 1]);
    }

    #[tokio::test]
    async fn test_overall_and_tab_view() {
        let dir = TempDir::new().unwrap();
        let service = service(dir.path()).await;
        service.add_worker("a", &[1, 2, 3, 4, 5]).await.unwrap();
        service.add_worker("b", &[5, 4, 3, 2, 1]).await.unwrap();

        let overall = service.overall().await.unwrap();
        assert_eq!(overall.totals, vec![6, 6, 6, 6, 6]);
        assert_eq!(overall.averages, vec![3.0; 5]);

        let tabs = service.tab_view("a").await.unwrap().unwrap();
        assert_eq!(tabs[0].levels, vec![1, 2]);
        assert_eq!(tabs[1].levels, vec![3, 4, 5]);
        assert!(service.tab_view("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overall_empty_store() {
        let dir = TempDir::new().unwrap();
        let service = service(dir.path()).await;
        let overall = service.overall().await.unwrap();
        assert_eq!(overall.worker_count, 0);
        assert_eq!(overall.totals, vec![0; 5]);
        assert_eq!(overall.averages, vec![0.0; 5]);
    }

    #[tokio::test]
    async fn test_group_restricted_entries() {
        let dir = TempDir::new().unwrap();
        let service = service(dir.path()).await;
        service.add_worker("a", &[1, 2, 3, 4, 5]).await.unwrap();

        let entries = service.report_entries(Some("Floor")).await.unwrap();
        assert_eq!(entries[0].categories, ["Stow", "Pick", "Pack"]);
        assert_eq!(entries[0].skill_levels, vec![3, 4, 5]);

        assert!(service.report_entries(Some("Roof")).await.is_err());
    }

    #[tokio::test]
    async fn test_exports_land_in_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reports");
        let service = service(&out).await;
        service.add_worker("a", &[1, 2, 3, 4, 5]).await.unwrap();
        let entries = service.report_entries(None).await.unwrap();

        let xlsx = service.spreadsheet_path();
        assert!(xlsx.starts_with(&out));
        assert_eq!(service.export_to_spreadsheet(&entries, &xlsx), Some(xlsx.clone()));
        assert!(xlsx.exists());

        let pdf = service.pdf_path();
        let report = service.export_to_pdf(&entries, &pdf).unwrap();
        assert_eq!(report.summary.drawn, vec!["a".to_string()]);
        assert!(pdf.exists());
    }

    #[tokio::test]
    async fn test_out_of_range_level_is_rejected() {
        let dir = TempDir::new().unwrap();
        let service = service(dir.path()).await;

        let err = service.add_worker("x", &[0, 3, 3, 3, 3]).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invalid(SkillError::InvalidLevel { level: 0 })
        ));
        assert!(service.get_all_workers().await.unwrap().is_empty());

        service.add_worker("x", &[3; 5]).await.unwrap();
        assert!(service.update_worker("x", "y", &[3, 3, 9]).await.is_err());
        let x = service.get_worker_by_name("x").await.unwrap().unwrap();
        assert_eq!(x.skill_levels, vec![3; 5]);
    }

    #[tokio::test]
    async fn test_back_to_back_exports_keep_both_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reports");
        let service = service(&out).await;
        service.add_worker("a", &[1, 2, 3, 4, 5]).await.unwrap();
        let entries = service.report_entries(None).await.unwrap();

        let first = service
            .export_to_spreadsheet(&entries, &service.spreadsheet_path())
            .unwrap();
        let second = service
            .export_to_spreadsheet(&entries, &service.spreadsheet_path())
            .unwrap();
        assert_ne!(first, second);

        let pdf_first = service.export_to_pdf(&entries, &service.pdf_path()).unwrap();
        let pdf_second = service.export_to_pdf(&entries, &service.pdf_path()).unwrap();
        assert_ne!(pdf_first.path, pdf_second.path);

        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 4);
    }

    #[tokio::test]
    async fn test_failed_export_returns_none() {
        let dir = TempDir::new().unwrap();
        // A file where the output directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let service = service(&blocker).await;

        let path = blocker.join("matrix.xlsx");
        assert_eq!(service.export_to_spreadsheet(&[], &path), None);
        assert!(service.export_to_pdf(&[], &blocker.join("r.pdf")).is_none());
    }
}
