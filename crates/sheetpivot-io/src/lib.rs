pub mod backends;
pub mod error;
pub mod loader;
pub mod traits;

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;
pub use error::IoError;
pub use loader::{LoadedTable, LoaderStats, TableLoader};
pub use traits::{
    CellData, ChartKind, ChartSeries, ChartSpec, FontSpec, SheetData,
    SpreadsheetReader, SpreadsheetStyler, SpreadsheetWriter,
};

// Re-export for convenience
pub use sheetpivot_common::{CellRef, LiteralValue, RangeAddress};
