pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, money, muted, section, success, summary_row, warn};
pub use table::{TableBuilder, fee_table, range_table, visits_table};
pub use theme::{theme, Theme};
