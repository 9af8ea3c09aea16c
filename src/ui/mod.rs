pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    cim_type, dangling, dim, error, failure, header, info, muted, section, status, success,
    summary_row, timing, warn,
};
pub use table::{ClassRow, InventoryRow, ModelRow, TableBuilder};
pub use theme::{theme, Theme};
