use seolens_core::record::PerformanceSignals;

use crate::session::PageTiming;

/// Derives performance signals from plain-HTTP fetch timing.
///
/// Without a rendering engine only network timing is observable. Load time
/// and time-to-first-byte are measured; DOM-content-loaded is approximated
/// by total load time and first paint by first byte. Paint metrics that
/// need a renderer (LCP, CLS) stay at their pessimistic defaults so the
/// scorer lands in its lowest tier rather than inventing a good result.
#[must_use]
pub fn derive_performance(timing: &PageTiming) -> PerformanceSignals {
    PerformanceSignals {
        load_time_ms: timing.load_time_ms,
        dom_content_loaded_ms: timing.load_time_ms,
        first_paint_ms: timing.first_byte_ms,
        transfer_size_bytes: timing.transfer_size_bytes,
        lcp_ms: PerformanceSignals::DEFAULT_LCP_MS,
        cls: PerformanceSignals::DEFAULT_CLS,
    }
}
