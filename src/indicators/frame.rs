//! Builds the full indicator frame for a series and reads its latest snapshot.

use crate::indicators::momentum::{macd_series, rsi_series};
use crate::indicators::trend::ema_series;
use crate::indicators::volatility::bollinger_series;
use crate::indicators::volume::{trailing_return, volume_average_series, volume_ratio};
use crate::models::indicators::{AnalyzedSeries, IndicatorFrame, IndicatorParams, IndicatorSnapshot};
use crate::models::price::PriceSeries;

pub fn compute_frame(series: &PriceSeries, params: &IndicatorParams) -> IndicatorFrame {
    let closes = series.closes();
    let volumes = series.volumes();

    let macd = macd_series(
        &closes,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
        params.ema_warmup,
    );
    let bands = bollinger_series(&closes, params.bollinger_period, params.bollinger_std_dev);

    IndicatorFrame {
        rsi: rsi_series(&closes, params.rsi_period),
        ema_short: ema_series(&closes, params.ema_short, params.ema_warmup),
        ema_long: ema_series(&closes, params.ema_long, params.ema_warmup),
        macd_line: macd.line,
        macd_signal: macd.signal,
        macd_histogram: macd.histogram,
        bollinger_mid: bands.middle,
        bollinger_upper: bands.upper,
        bollinger_lower: bands.lower,
        volume_average: volume_average_series(&volumes, params.volume_window),
    }
}

pub fn analyze(series: PriceSeries, params: &IndicatorParams) -> AnalyzedSeries {
    let frame = compute_frame(&series, params);
    AnalyzedSeries {
        series,
        frame,
        params: params.clone(),
    }
}

fn at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

/// Indicator values at the latest bar; `None` for an empty series.
pub fn snapshot(analysis: &AnalyzedSeries) -> Option<IndicatorSnapshot> {
    let latest = analysis.series.latest()?;
    let frame = &analysis.frame;
    let last = analysis.series.len() - 1;
    let volume_average = at(&frame.volume_average, last);

    Some(IndicatorSnapshot {
        price: latest.close,
        rsi: at(&frame.rsi, last),
        ema_short: at(&frame.ema_short, last),
        ema_long: at(&frame.ema_long, last),
        macd_line: at(&frame.macd_line, last),
        macd_signal: at(&frame.macd_signal, last),
        macd_histogram: at(&frame.macd_histogram, last),
        macd_histogram_prev: last.checked_sub(1).and_then(|i| at(&frame.macd_histogram, i)),
        bollinger_mid: at(&frame.bollinger_mid, last),
        bollinger_upper: at(&frame.bollinger_upper, last),
        bollinger_lower: at(&frame.bollinger_lower, last),
        volume: latest.volume,
        volume_average,
        volume_ratio: volume_ratio(latest.volume, volume_average),
        trend_return: trailing_return(&analysis.series.closes(), analysis.params.trend_window),
    })
}
