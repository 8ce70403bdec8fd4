/// Read-through caching over Redis.
///
/// Looks the key up first; on a miss, runs the given block to compute the
/// value, schedules a non-blocking cache write, and returns the fresh value.
///
/// # Arguments
/// * `$cache`: a `Cache` instance.
/// * `$key`: the `CacheKey` under which the value lives.
/// * `$ttl`: time-to-live for the cached value, in seconds.
/// * `$block`: async block producing the value on a miss.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
