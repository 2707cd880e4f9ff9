//! Asset collaborators: image listing, table extraction and persistence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{ImageAsset, SpanDocument, TableData};

/// Lists the raster images embedded in a page.
///
/// Returning an empty list is normal and not an error.
pub trait PageImages: Send + Sync {
    /// Images of the given page (1-indexed), in source order.
    fn page_images(&self, page: u32) -> Result<Vec<ImageAsset>>;
}

/// Extracts tabular data from a page.
pub trait TableExtractor: Send + Sync {
    /// Tables of the given page (1-indexed), in source order.
    fn extract_tables(&self, page: u32) -> Result<Vec<TableData>>;
}

/// Persists assets and returns a reference recorded as element text.
pub trait AssetSink: Send + Sync {
    /// Persist an image. `index` is 1-based within the page.
    fn persist_image(&self, page: u32, index: usize, image: &ImageAsset) -> Result<String>;

    /// Persist a table. `index` is 1-based within the page.
    fn persist_table(&self, page: u32, index: usize, table: &TableData) -> Result<String>;
}

impl PageImages for SpanDocument {
    fn page_images(&self, page: u32) -> Result<Vec<ImageAsset>> {
        Ok(self
            .get_page(page)
            .map(|p| p.images.clone())
            .unwrap_or_default())
    }
}

impl TableExtractor for SpanDocument {
    fn extract_tables(&self, page: u32) -> Result<Vec<TableData>> {
        Ok(self
            .get_page(page)
            .map(|p| p.tables.clone())
            .unwrap_or_default())
    }
}

/// A collaborator that never finds any assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl PageImages for NoAssets {
    fn page_images(&self, _page: u32) -> Result<Vec<ImageAsset>> {
        Ok(Vec::new())
    }
}

impl TableExtractor for NoAssets {
    fn extract_tables(&self, _page: u32) -> Result<Vec<TableData>> {
        Ok(Vec::new())
    }
}

/// Writes assets as files into an output folder.
///
/// Images are written as `page_{p}_image_{i}.{ext}`, tables as
/// `page_{p}_table_{i}.csv`. The folder is created on first write.
#[derive(Debug, Clone)]
pub struct FolderSink {
    root: PathBuf,
}

impl FolderSink {
    /// Create a sink writing into `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name used for an image.
    pub fn image_file_name(page: u32, index: usize, image: &ImageAsset) -> String {
        format!("page_{}_image_{}.{}", page, index, image.extension())
    }

    /// File name used for a table.
    pub fn table_file_name(page: u32, index: usize) -> String {
        format!("page_{}_table_{}.csv", page, index)
    }

    fn prepare(&self, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        Ok(self.root.join(file_name))
    }
}

impl AssetSink for FolderSink {
    fn persist_image(&self, page: u32, index: usize, image: &ImageAsset) -> Result<String> {
        if image.data.is_empty() {
            return Err(Error::ImageExtract(format!(
                "page {} image {} has no data",
                page, index
            )));
        }

        let path = self.prepare(&Self::image_file_name(page, index, image))?;
        fs::write(&path, &image.data)
            .map_err(|e| Error::ImageExtract(format!("{}: {}", path.display(), e)))?;
        log::debug!("Wrote image {} ({} bytes)", path.display(), image.size());
        Ok(path.display().to_string())
    }

    fn persist_table(&self, page: u32, index: usize, table: &TableData) -> Result<String> {
        if table.is_empty() {
            log::debug!("Page {} table {} has no cells, writing an empty file", page, index);
        }

        let path = self.prepare(&Self::table_file_name(page, index))?;

        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
        if !table.header.is_empty() {
            writer.write_record(&table.header)?;
        }
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        log::debug!("Wrote table {} ({} rows)", path.display(), table.row_count());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourcePage;

    fn png() -> ImageAsset {
        ImageAsset::new(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0], "")
    }

    #[test]
    fn test_span_document_assets() {
        let mut page = SourcePage::new(1);
        page.images.push(png());
        page.tables.push(TableData::new(vec!["a".into()], vec![vec!["1".into()]]));
        let doc = SpanDocument::new().with_page(page);

        assert_eq!(doc.page_images(1).unwrap().len(), 1);
        assert_eq!(doc.extract_tables(1).unwrap().len(), 1);
        assert!(doc.page_images(7).unwrap().is_empty());
    }

    #[test]
    fn test_no_assets() {
        assert!(NoAssets.page_images(1).unwrap().is_empty());
        assert!(NoAssets.extract_tables(1).unwrap().is_empty());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(FolderSink::image_file_name(2, 1, &png()), "page_2_image_1.png");
        let jpeg = ImageAsset::new(vec![0xFF, 0xD8, 0xFF], "jpeg");
        assert_eq!(FolderSink::image_file_name(3, 4, &jpeg), "page_3_image_4.jpeg");
        assert_eq!(FolderSink::table_file_name(5, 2), "page_5_table_2.csv");
    }

    #[test]
    fn test_folder_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FolderSink::new(dir.path().join("out"));

        let image_path = sink.persist_image(1, 1, &png()).unwrap();
        assert!(image_path.ends_with("page_1_image_1.png"));
        assert_eq!(std::fs::read(&image_path).unwrap(), png().data);

        let table = TableData::new(
            vec!["name".into(), "value".into()],
            vec![vec!["a".into(), "1".into()], vec!["b, c".into(), "2".into()]],
        );
        let table_path = sink.persist_table(1, 1, &table).unwrap();
        let csv = std::fs::read_to_string(&table_path).unwrap();
        assert_eq!(csv, "name,value\na,1\n\"b, c\",2\n");
    }

    #[test]
    fn test_folder_sink_empty_assets() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FolderSink::new(dir.path());

        let empty_image = ImageAsset::new(Vec::new(), "png");
        assert!(matches!(
            sink.persist_image(1, 1, &empty_image),
            Err(Error::ImageExtract(_))
        ));

        let table_path = sink.persist_table(1, 1, &TableData::default()).unwrap();
        assert!(table_path.ends_with("page_1_table_1.csv"));
        assert_eq!(std::fs::read_to_string(&table_path).unwrap(), "");
    }

    #[test]
    fn test_folder_sink_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let sink = FolderSink::new(&out);

        let hostile = ImageAsset::new(png().data, "/../../escaped.txt");
        let path = sink.persist_image(1, 1, &hostile).unwrap();

        assert_eq!(std::path::PathBuf::from(&path), out.join("page_1_image_1.png"));
        assert!(!dir.path().join("escaped.txt").exists());
    }
}
