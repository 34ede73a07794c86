//! 客户端模块：格式化请求的调度与入口服务。
//!
//! Dispatcher ([`Formalizer`]) and the never-failing request boundary
//! ([`FormalizeService`]).

mod builder;
mod core;
mod service;

pub use builder::FormalizerBuilder;
pub use self::core::Formalizer;
pub use service::FormalizeService;
