pub mod sise;
