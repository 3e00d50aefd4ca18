use std::sync::OnceLock;
use std::time::Instant;

static PERF_ENABLED: OnceLock<bool> = OnceLock::new();

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 阶段耗时日志开关
///
/// 开关：
/// - 默认开启
/// - `TRANSIT_STRESS_PERF=0` 关闭
fn perf_enabled() -> bool {
    *PERF_ENABLED.get_or_init(|| match std::env::var("TRANSIT_STRESS_PERF") {
        Ok(v) => is_true(&v),
        Err(_) => true,
    })
}

/// 阶段耗时 Guard：drop 时记录 stage + elapsed_ms
///
/// 使用方式：
/// ```ignore
/// let guard = transit_stress::perf::StageGuard::new("collapse");
/// // do work...
/// let elapsed_ms = guard.finish();
/// ```
pub struct StageGuard {
    stage: &'static str,
    start: Instant,
}

impl StageGuard {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// 结束计时并返回耗时（毫秒）; 日志在 drop 时输出
    pub fn finish(self) -> u64 {
        self.elapsed_ms()
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        if !perf_enabled() {
            return;
        }
        tracing::info!(
            target: "perf",
            stage = self.stage,
            elapsed_ms = self.elapsed_ms(),
            "done"
        );
    }
}
