pub mod moka;
pub mod redis;

/// 注册内置缓存后端
pub fn register_builtin_plugins() {
    moka::register();
    redis::register();
}
