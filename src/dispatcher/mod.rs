// 子模組
pub mod types;
pub mod engine;
pub mod worker;

// 重新導出
pub use types::DispatchConfig;
pub use engine::Dispatcher;
