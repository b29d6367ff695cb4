pub mod logs;
pub mod mocks;
