use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// 性能统计 Guard：记录 elapsed_ms + 嵌套深度
///
/// 使用方式：
/// ```ignore
/// let _perf = reserve_planner::perf::PerfGuard::new("pack_trucks");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let current = d.get();
            d.set(current.saturating_add(1));
            current
        });
        Self {
            op,
            start: Instant::now(),
            depth,
        }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            depth = self.depth,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// 当前线程活跃的 PerfGuard 数
pub fn active_depth() -> u32 {
    PERF_DEPTH.with(|d| d.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guards_track_depth() {
        let base = active_depth();
        {
            let outer = PerfGuard::new("outer");
            assert_eq!(outer.op(), "outer");
            assert_eq!(active_depth(), base + 1);
            {
                let _inner = PerfGuard::new("inner");
                assert_eq!(active_depth(), base + 2);
            }
            assert_eq!(active_depth(), base + 1);
        }
        assert_eq!(active_depth(), base);
    }
}
