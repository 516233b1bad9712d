//! 缓存层
//!
//! 后端以插件形式注册（`moka` 内存缓存、`redis`），启动时按配置名称选择。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明一个缓存插件，生成 `register()` 函数把构造器加入注册表
///
/// 类型需要提供 `async fn create() -> crate::errors::Result<Self>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::create().await?;
                        Ok::<Box<dyn $crate::cache::ObjectCache>, $crate::errors::SEIOError>(
                            Box::new(cache),
                        )
                    })
                }),
            );
        }
    };
}
