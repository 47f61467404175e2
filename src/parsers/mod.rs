pub mod aac;
pub mod html;
pub mod text;
pub mod tiles;
pub mod vthm;

#[cfg(test)]
mod tests;

use crate::results::ProductRecord;
use serde::{Deserialize, Serialize};

/// Turns one fetched product page into a flat record
///
/// Implementations are stateless; `None` means the page did not look like a
/// product page and the record is dropped.
pub trait RecordExtractor: Send + Sync {
    fn extract(&self, html: &str, url: &str) -> Option<ProductRecord>;
}

/// Sites with a dedicated record extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteId {
    /// viglaceratiles.vn (tiles and roof tiles)
    ViglaceraTiles,
    /// viglacera-aac.vn (Haravan storefront)
    ViglaceraAac,
    /// vthmgroup.vn
    Vthm,
}

impl SiteId {
    /// Look up the extractor for this site
    pub fn extractor(self) -> &'static dyn RecordExtractor {
        match self {
            SiteId::ViglaceraTiles => &tiles::TilesExtractor,
            SiteId::ViglaceraAac => &aac::AacExtractor,
            SiteId::Vthm => &vthm::VthmExtractor,
        }
    }
}

/// Field labels shared by the extractors' output
pub mod fields {
    pub const URL: &str = "URL";
    pub const PRODUCT_CODE: &str = "Mã Sản Phẩm";
    pub const PRODUCT_NAME: &str = "Tên Sản Phẩm";
    pub const COLLECTION: &str = "Bộ Sưu Tập";
    pub const BRAND: &str = "Thương Hiệu";
    pub const PRODUCT_TYPE: &str = "Loại Sản Phẩm";
    pub const MAIN_IMAGE: &str = "Ảnh Đại Diện";
    pub const IMAGES: &str = "Danh Sách Ảnh";
    pub const INFO_PREFIX: &str = "Thông tin";
    pub const MISSING: &str = "N/A";
}
