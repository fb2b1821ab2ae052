use std::fmt::Display;

use crate::utils::text::zero_pad;

pub static CODE_WIDTH: usize = 6;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StockRef {
    pub code: String,
    pub name: String,
}

impl StockRef {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: format_code(code),
            name: name.trim().to_string(),
        }
    }
}

impl Display for StockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.code)
    }
}

pub fn format_code(code: &str) -> String {
    zero_pad(code.trim(), CODE_WIDTH)
}
