pub mod daily;
pub mod stock;
