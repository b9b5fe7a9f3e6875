pub mod app_data_dir;
mod atomic;

pub use atomic::atomic_write;
