pub mod banner;
pub mod charts;
pub mod confirm_dialog;
pub mod equipment_table;
pub mod header;
pub mod stat_card;
